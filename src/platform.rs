/// Marker names written onto the page representation.
///
/// These are stable identifiers the restriction stylesheet keys off; renaming
/// one orphans whatever a previous version left behind on long-lived tabs.
pub mod marker {
    pub const GRAYSCALE: &str = "curfew-grayscale";

    pub const YOUTUBE_ACTIVE: &str = "curfew-youtube-active";
    pub const YOUTUBE_SHORTS_HIDDEN: &str = "curfew-youtube-shorts-hidden";
    pub const YOUTUBE_RELATED_HIDDEN: &str = "curfew-youtube-related-hidden";
    pub const YOUTUBE_ENDSCREEN_HIDDEN: &str = "curfew-youtube-endscreen-hidden";
    pub const YOUTUBE_COMMENTS_HIDDEN: &str = "curfew-youtube-comments-hidden";

    pub const TWITTER_ACTIVE: &str = "curfew-twitter-active";
    pub const TWITTER_FOLLOWING_DEFAULT: &str = "curfew-twitter-following-default";
    pub const TWITTER_RECOMMENDATIONS_HIDDEN: &str = "curfew-twitter-recommendations-hidden";
    pub const TWITTER_TRENDS_HIDDEN: &str = "curfew-twitter-trends-hidden";
    pub const TWITTER_AUTOPLAY_STOPPED: &str = "curfew-twitter-autoplay-stopped";

    pub const TIKTOK_ACTIVE: &str = "curfew-tiktok-active";
    pub const TIKTOK_BLOCKED: &str = "curfew-tiktok-blocked";
}

/// Platforms the engine knows how to restrict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum Platform {
    Youtube,
    Twitter,
    Tiktok,
}

impl Platform {
    pub const ALL: [Platform; 3] = [Platform::Youtube, Platform::Twitter, Platform::Tiktok];

    /// Settings-section key and display name
    pub fn key(&self) -> &'static str {
        match self {
            Platform::Youtube => "youtube",
            Platform::Twitter => "twitter",
            Platform::Tiktok => "tiktok",
        }
    }

    /// Top-level marker set whenever restrictions are in force.
    pub fn active_marker(&self) -> &'static str {
        match self {
            Platform::Youtube => marker::YOUTUBE_ACTIVE,
            Platform::Twitter => marker::TWITTER_ACTIVE,
            Platform::Tiktok => marker::TIKTOK_ACTIVE,
        }
    }

    /// Every marker this platform may ever set.
    ///
    /// The full-reset path clears exactly this list, so a marker missing here
    /// would survive a schedule window closing.
    pub fn markers(&self) -> &'static [&'static str] {
        match self {
            Platform::Youtube => &[
                marker::YOUTUBE_ACTIVE,
                marker::YOUTUBE_SHORTS_HIDDEN,
                marker::YOUTUBE_RELATED_HIDDEN,
                marker::YOUTUBE_ENDSCREEN_HIDDEN,
                marker::YOUTUBE_COMMENTS_HIDDEN,
                marker::GRAYSCALE,
            ],
            Platform::Twitter => &[
                marker::TWITTER_ACTIVE,
                marker::TWITTER_FOLLOWING_DEFAULT,
                marker::TWITTER_RECOMMENDATIONS_HIDDEN,
                marker::TWITTER_TRENDS_HIDDEN,
                marker::TWITTER_AUTOPLAY_STOPPED,
                marker::GRAYSCALE,
            ],
            Platform::Tiktok => &[
                marker::TIKTOK_ACTIVE,
                marker::TIKTOK_BLOCKED,
                marker::GRAYSCALE,
            ],
        }
    }
}
