use crate::page::FeatureTarget;
use crate::platform::{Platform, marker};
use crate::settings::Settings;

/// Declarative marker state for one platform, derived from settings alone.
///
/// When the cross-platform always-on override forces restrictions while the
/// platform's own section is absent, flags fall back to built-in defaults
/// instead of faulting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestrictionFlags {
    Youtube(YoutubeFlags),
    Twitter(TwitterFlags),
    Tiktok(TiktokFlags),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YoutubeFlags {
    pub grayscale: bool,
    pub hide_shorts: bool,
    pub hide_related: bool,
    pub hide_end_screen: bool,
    pub hide_comments: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TwitterFlags {
    pub grayscale: bool,
    pub default_following: bool,
    pub hide_recommendations: bool,
    pub hide_trends: bool,
    pub stop_autoplay: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TiktokFlags {
    pub grayscale: bool,
    pub block: bool,
}

impl RestrictionFlags {
    pub fn for_platform(settings: &Settings, platform: Platform) -> Self {
        let grayscale = settings.common.grayscale;
        match platform {
            Platform::Youtube => {
                let section = settings.youtube.clone().unwrap_or_default();
                RestrictionFlags::Youtube(YoutubeFlags {
                    grayscale,
                    hide_shorts: section.hide_shorts,
                    hide_related: section.hide_related,
                    hide_end_screen: section.hide_end_screen,
                    hide_comments: section.hide_comments,
                })
            }
            Platform::Twitter => {
                let section = settings.twitter.clone().unwrap_or_default();
                RestrictionFlags::Twitter(TwitterFlags {
                    grayscale,
                    default_following: section.default_following,
                    hide_recommendations: section.hide_recommendations,
                    hide_trends: section.hide_trends,
                    stop_autoplay: section.stop_autoplay,
                })
            }
            Platform::Tiktok => {
                let section = settings.tiktok.clone().unwrap_or_default();
                RestrictionFlags::Tiktok(TiktokFlags {
                    grayscale,
                    block: section.block,
                })
            }
        }
    }

    /// Marker names paired with their desired presence.
    pub fn markers(&self) -> Vec<(&'static str, bool)> {
        match self {
            RestrictionFlags::Youtube(f) => vec![
                (marker::GRAYSCALE, f.grayscale),
                (marker::YOUTUBE_SHORTS_HIDDEN, f.hide_shorts),
                (marker::YOUTUBE_RELATED_HIDDEN, f.hide_related),
                (marker::YOUTUBE_ENDSCREEN_HIDDEN, f.hide_end_screen),
                (marker::YOUTUBE_COMMENTS_HIDDEN, f.hide_comments),
            ],
            RestrictionFlags::Twitter(f) => vec![
                (marker::GRAYSCALE, f.grayscale),
                (marker::TWITTER_FOLLOWING_DEFAULT, f.default_following),
                (marker::TWITTER_RECOMMENDATIONS_HIDDEN, f.hide_recommendations),
                (marker::TWITTER_TRENDS_HIDDEN, f.hide_trends),
                (marker::TWITTER_AUTOPLAY_STOPPED, f.stop_autoplay),
            ],
            RestrictionFlags::Tiktok(f) => vec![
                (marker::GRAYSCALE, f.grayscale),
                (marker::TIKTOK_BLOCKED, f.block),
            ],
        }
    }

    /// Element groups needing a direct hide pass on top of their marker,
    /// because the content re-renders under navigation and lazy loading.
    pub fn reconcile_targets(&self) -> Vec<FeatureTarget> {
        let mut targets = Vec::new();
        match self {
            RestrictionFlags::Youtube(f) => {
                if f.hide_shorts {
                    targets.push(FeatureTarget::ShortsShelf);
                }
                if f.hide_related {
                    targets.push(FeatureTarget::RelatedVideos);
                }
                if f.hide_comments {
                    targets.push(FeatureTarget::Comments);
                }
            }
            RestrictionFlags::Twitter(f) => {
                if f.hide_recommendations {
                    targets.push(FeatureTarget::Recommendations);
                }
                if f.hide_trends {
                    targets.push(FeatureTarget::Trends);
                }
            }
            RestrictionFlags::Tiktok(_) => {}
        }
        targets
    }
}
