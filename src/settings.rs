use serde::{Deserialize, Serialize};

use crate::platform::Platform;
use crate::schedule::{Schedule, TimeSlot};

/// Root settings object, namespaced by scope.
///
/// The wire format is the camelCase JSON the settings editor writes to the
/// sync store and replicates to every open tab. Deserialization is the
/// versioned-defaults merge: fields missing from older stored objects fill
/// from built-in defaults (new feature toggles default to on), while a
/// wholly absent platform section stays absent and evaluates unrestricted.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default)]
    pub common: CommonSettings,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub youtube: Option<YoutubeSettings>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter: Option<TwitterSettings>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tiktok: Option<TiktokSettings>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            common: CommonSettings::default(),
            youtube: Some(YoutubeSettings::default()),
            twitter: Some(TwitterSettings::default()),
            tiktok: Some(TiktokSettings::default()),
        }
    }
}

/// Cross-platform settings: the shared schedule and grayscale.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommonSettings {
    /// Present in the wire format; restriction gating uses the per-platform
    /// enabled flags.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Restrict every platform permanently, ignoring all schedules
    #[serde(default = "default_true")]
    pub always_on: bool,

    #[serde(flatten)]
    pub schedule: Schedule,

    /// Render restricted pages in grayscale
    #[serde(default)]
    pub grayscale: bool,
}

impl Default for CommonSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            always_on: true,
            schedule: default_schedule(),
            grayscale: false,
        }
    }
}

/// YouTube section with feature toggles and an optional own schedule.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YoutubeSettings {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Omitted by older settings editors; omission means scheduled, not
    /// always-on.
    #[serde(default)]
    pub always_on: bool,

    #[serde(flatten)]
    pub schedule: Schedule,

    #[serde(default = "default_true")]
    pub hide_shorts: bool,

    /// Navigation behavior handled by the host shell, not the page applicator
    #[serde(default = "default_true")]
    pub redirect_home: bool,

    #[serde(default = "default_true")]
    pub hide_related: bool,

    #[serde(default = "default_true")]
    pub hide_end_screen: bool,

    #[serde(default = "default_true")]
    pub hide_comments: bool,
}

impl Default for YoutubeSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            always_on: true,
            schedule: default_schedule(),
            hide_shorts: true,
            redirect_home: true,
            hide_related: true,
            hide_end_screen: true,
            hide_comments: true,
        }
    }
}

/// Twitter section with feature toggles and an optional own schedule.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TwitterSettings {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default)]
    pub always_on: bool,

    #[serde(flatten)]
    pub schedule: Schedule,

    #[serde(default = "default_true")]
    pub default_following: bool,

    #[serde(default)]
    pub hide_recommendations: bool,

    #[serde(default = "default_true")]
    pub hide_trends: bool,

    #[serde(default)]
    pub stop_autoplay: bool,
}

impl Default for TwitterSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            always_on: true,
            schedule: Schedule::default(),
            default_following: true,
            hide_recommendations: false,
            hide_trends: true,
            stop_autoplay: false,
        }
    }
}

/// TikTok has a single blanket block instead of per-feature toggles.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TiktokSettings {
    #[serde(default = "default_true")]
    pub block: bool,
}

impl Default for TiktokSettings {
    fn default() -> Self {
        Self { block: true }
    }
}

/// Schedule-relevant view of one platform section.
#[derive(Debug, Clone, Copy)]
pub struct ScopeView<'a> {
    pub enabled: bool,
    pub always_on: bool,
    pub schedule: Option<&'a Schedule>,
}

impl Settings {
    /// View a platform section through its scheduling fields, if present.
    ///
    /// TikTok carries no schedule or enabled flag of its own; the block
    /// toggle gates it and the shared schedule decides when it is in force.
    pub fn scope(&self, platform: Platform) -> Option<ScopeView<'_>> {
        match platform {
            Platform::Youtube => self.youtube.as_ref().map(|s| ScopeView {
                enabled: s.enabled,
                always_on: s.always_on,
                schedule: Some(&s.schedule),
            }),
            Platform::Twitter => self.twitter.as_ref().map(|s| ScopeView {
                enabled: s.enabled,
                always_on: s.always_on,
                schedule: Some(&s.schedule),
            }),
            Platform::Tiktok => self.tiktok.as_ref().map(|s| ScopeView {
                enabled: s.block,
                always_on: false,
                schedule: None,
            }),
        }
    }
}

/// Cross-tab update envelope delivered to every active page instance.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum ChannelMessage {
    #[serde(rename_all = "camelCase")]
    UpdateSettings { settings: Settings },
}

fn default_schedule() -> Schedule {
    Schedule {
        active_days: Vec::new(),
        time_slots: vec![TimeSlot::new("07:00", "12:00")],
    }
}

fn default_true() -> bool {
    true
}
