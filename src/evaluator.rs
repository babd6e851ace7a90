use anyhow::Result;
use chrono::NaiveDateTime;

use crate::platform::Platform;
use crate::settings::Settings;

/// Why a platform is currently restricted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    /// Cross-platform always-on override
    CommonAlwaysOn,
    /// The platform's own always-on flag
    PlatformAlwaysOn,
    /// The shared schedule matched
    CommonSchedule,
    /// The platform's own schedule matched
    PlatformSchedule,
}

impl Activation {
    pub fn describe(&self) -> &'static str {
        match self {
            Activation::CommonAlwaysOn => "always-on, all platforms",
            Activation::PlatformAlwaysOn => "always-on",
            Activation::CommonSchedule => "shared schedule",
            Activation::PlatformSchedule => "own schedule",
        }
    }
}

/// Decide whether restrictions are active for a platform at a local time.
///
/// The decision is recomputed from scratch on every call and never cached.
pub fn is_restricted(settings: &Settings, platform: Platform, now: &NaiveDateTime) -> Result<bool> {
    Ok(activation(settings, platform, now)?.is_some())
}

/// Like [`is_restricted`], but reports which scope turned restrictions on.
///
/// Precedence: the cross-platform always-on override beats everything,
/// including a disabled or absent platform section. Otherwise the platform
/// must be present and enabled, and either its own always-on flag or a
/// schedule match in EITHER scope activates it (matching one schedule is
/// sufficient; the shared and platform schedules are alternatives, not
/// conjuncts).
pub fn activation(
    settings: &Settings,
    platform: Platform,
    now: &NaiveDateTime,
) -> Result<Option<Activation>> {
    if settings.common.always_on {
        return Ok(Some(Activation::CommonAlwaysOn));
    }

    let Some(scope) = settings.scope(platform) else {
        return Ok(None);
    };
    if !scope.enabled {
        return Ok(None);
    }
    if scope.always_on {
        return Ok(Some(Activation::PlatformAlwaysOn));
    }

    if settings.common.schedule.matches_at(now)? {
        return Ok(Some(Activation::CommonSchedule));
    }
    if let Some(schedule) = scope.schedule {
        if schedule.matches_at(now)? {
            return Ok(Some(Activation::PlatformSchedule));
        }
    }

    Ok(None)
}

/// Scan forward for the next minute at which the decision flips.
///
/// Minute granularity matches the evaluation tick. The scan covers eight
/// days, enough for any weekly schedule; `None` means the decision is
/// constant (always-on, or no schedule at all).
pub fn next_transition(
    settings: &Settings,
    platform: Platform,
    from: &NaiveDateTime,
) -> Result<Option<NaiveDateTime>> {
    let current = is_restricted(settings, platform, from)?;

    let mut probe = *from;
    for _ in 0..(8 * 24 * 60) {
        probe += chrono::Duration::minutes(1);
        if is_restricted(settings, platform, &probe)? != current {
            return Ok(Some(probe));
        }
    }

    Ok(None)
}
