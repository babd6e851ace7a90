use anyhow::Result;
use chrono::NaiveDateTime;

use crate::evaluator;
use crate::flags::RestrictionFlags;
use crate::page::Page;
use crate::platform::Platform;
use crate::settings::Settings;

/// Applies the restriction decision to a page as declarative markers.
pub struct Applicator {
    platform: Platform,
}

impl Applicator {
    pub fn new(platform: Platform) -> Self {
        Self { platform }
    }

    /// Recompute the decision and reconcile the page against it.
    ///
    /// Safe to call redundantly: marker state is re-derived from settings
    /// and the decision alone on every call, so back-to-back invocations
    /// from different triggers converge on the same page state. Leaving the
    /// restricted state clears the platform's entire marker list, so nothing
    /// survives a schedule window closing.
    pub fn apply(&self, settings: &Settings, now: &NaiveDateTime, page: &mut dyn Page) -> Result<()> {
        if !evaluator::is_restricted(settings, self.platform, now)? {
            self.clear_all(page);
            return Ok(());
        }

        page.set_marker(self.platform.active_marker());

        let flags = RestrictionFlags::for_platform(settings, self.platform);
        for (marker, on) in flags.markers() {
            toggle_marker(page, marker, on);
        }

        // Content that re-renders under navigation needs a direct pass over
        // whatever is currently present; the next trigger catches the rest.
        for target in flags.reconcile_targets() {
            page.hide_matching(target);
        }

        Ok(())
    }

    /// Remove every marker this platform may have set.
    fn clear_all(&self, page: &mut dyn Page) {
        for marker in self.platform.markers() {
            page.clear_marker(marker);
        }
    }
}

fn toggle_marker(page: &mut dyn Page, marker: &str, on: bool) {
    if on {
        page.set_marker(marker);
    } else {
        page.clear_marker(marker);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::{FeatureTarget, MemoryPage};
    use crate::platform::marker;
    use crate::schedule::Schedule;
    use crate::settings::{TiktokSettings, TwitterSettings, YoutubeSettings};
    use chrono::NaiveDate;

    // 2024-01-01 was a Monday
    fn monday_noon() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn restricted_settings() -> Settings {
        let mut settings = Settings::default();
        settings.common.always_on = true;
        settings
    }

    fn unrestricted_settings() -> Settings {
        Settings {
            common: crate::settings::CommonSettings {
                enabled: true,
                always_on: false,
                schedule: Schedule::default(),
                grayscale: false,
            },
            youtube: Some(YoutubeSettings {
                always_on: false,
                schedule: Schedule::default(),
                ..YoutubeSettings::default()
            }),
            twitter: Some(TwitterSettings {
                always_on: false,
                schedule: Schedule::default(),
                ..TwitterSettings::default()
            }),
            tiktok: Some(TiktokSettings { block: false }),
        }
    }

    #[test]
    fn restricted_sets_active_and_feature_markers() {
        let mut page = MemoryPage::new();
        let applicator = Applicator::new(Platform::Youtube);

        applicator
            .apply(&restricted_settings(), &monday_noon(), &mut page)
            .unwrap();

        assert!(page.has_marker(marker::YOUTUBE_ACTIVE));
        assert!(page.has_marker(marker::YOUTUBE_SHORTS_HIDDEN));
        assert!(page.has_marker(marker::YOUTUBE_RELATED_HIDDEN));
        assert!(page.has_marker(marker::YOUTUBE_ENDSCREEN_HIDDEN));
        assert!(page.has_marker(marker::YOUTUBE_COMMENTS_HIDDEN));
        assert!(!page.has_marker(marker::GRAYSCALE)); // off by default
    }

    #[test]
    fn grayscale_marker_follows_the_common_toggle() {
        let mut page = MemoryPage::new();
        let mut settings = restricted_settings();
        settings.common.grayscale = true;

        Applicator::new(Platform::Youtube)
            .apply(&settings, &monday_noon(), &mut page)
            .unwrap();

        assert!(page.has_marker(marker::GRAYSCALE));
    }

    #[test]
    fn unrestricted_clears_every_marker() {
        let mut page = MemoryPage::new();
        let applicator = Applicator::new(Platform::Youtube);

        applicator
            .apply(&restricted_settings(), &monday_noon(), &mut page)
            .unwrap();
        assert!(!page.markers().is_empty());

        applicator
            .apply(&unrestricted_settings(), &monday_noon(), &mut page)
            .unwrap();
        assert!(page.markers().is_empty());
    }

    #[test]
    fn stale_markers_are_cleared_even_if_set_elsewhere() {
        let mut page = MemoryPage::new();
        page.set_marker(marker::YOUTUBE_SHORTS_HIDDEN);
        page.set_marker(marker::GRAYSCALE);

        Applicator::new(Platform::Youtube)
            .apply(&unrestricted_settings(), &monday_noon(), &mut page)
            .unwrap();

        assert!(page.markers().is_empty());
    }

    #[test]
    fn apply_is_idempotent() {
        let mut page = MemoryPage::new();
        page.insert_elements(FeatureTarget::ShortsShelf, 3);
        let applicator = Applicator::new(Platform::Youtube);
        let settings = restricted_settings();

        applicator.apply(&settings, &monday_noon(), &mut page).unwrap();
        let markers_after_first = page.markers();
        let hidden_after_first = page.hidden_count(FeatureTarget::ShortsShelf);

        applicator.apply(&settings, &monday_noon(), &mut page).unwrap();
        assert_eq!(page.markers(), markers_after_first);
        assert_eq!(page.hidden_count(FeatureTarget::ShortsShelf), hidden_after_first);
    }

    #[test]
    fn feature_toggled_off_while_restricted_drops_its_marker() {
        let mut page = MemoryPage::new();
        let applicator = Applicator::new(Platform::Youtube);

        applicator
            .apply(&restricted_settings(), &monday_noon(), &mut page)
            .unwrap();
        assert!(page.has_marker(marker::YOUTUBE_SHORTS_HIDDEN));

        let mut settings = restricted_settings();
        settings.youtube = Some(YoutubeSettings {
            hide_shorts: false,
            ..YoutubeSettings::default()
        });
        applicator.apply(&settings, &monday_noon(), &mut page).unwrap();

        assert!(!page.has_marker(marker::YOUTUBE_SHORTS_HIDDEN));
        assert!(page.has_marker(marker::YOUTUBE_ACTIVE));
    }

    #[test]
    fn reconciliation_hides_present_elements() {
        let mut page = MemoryPage::new();
        page.insert_elements(FeatureTarget::ShortsShelf, 2);
        page.insert_elements(FeatureTarget::Comments, 1);

        Applicator::new(Platform::Youtube)
            .apply(&restricted_settings(), &monday_noon(), &mut page)
            .unwrap();

        assert_eq!(page.visible_count(FeatureTarget::ShortsShelf), 0);
        assert_eq!(page.visible_count(FeatureTarget::Comments), 0);
    }

    #[test]
    fn reconciliation_catches_late_arrivals_on_the_next_trigger() {
        let mut page = MemoryPage::new();
        let applicator = Applicator::new(Platform::Youtube);
        let settings = restricted_settings();

        applicator.apply(&settings, &monday_noon(), &mut page).unwrap();

        // Lazy-loaded content appears after the first pass
        page.insert_elements(FeatureTarget::ShortsShelf, 4);
        applicator.apply(&settings, &monday_noon(), &mut page).unwrap();

        assert_eq!(page.visible_count(FeatureTarget::ShortsShelf), 0);
    }

    #[test]
    fn reconciliation_on_an_empty_page_is_not_a_fault() {
        let mut page = MemoryPage::new();
        Applicator::new(Platform::Youtube)
            .apply(&restricted_settings(), &monday_noon(), &mut page)
            .unwrap();
        assert!(page.has_marker(marker::YOUTUBE_ACTIVE));
    }

    #[test]
    fn tiktok_block_sets_the_blocked_marker() {
        let mut page = MemoryPage::new();
        Applicator::new(Platform::Tiktok)
            .apply(&restricted_settings(), &monday_noon(), &mut page)
            .unwrap();

        assert!(page.has_marker(marker::TIKTOK_ACTIVE));
        assert!(page.has_marker(marker::TIKTOK_BLOCKED));
    }

    #[test]
    fn twitter_markers_follow_their_toggles() {
        let mut page = MemoryPage::new();
        let mut settings = restricted_settings();
        settings.twitter = Some(TwitterSettings {
            stop_autoplay: true,
            hide_recommendations: true,
            ..TwitterSettings::default()
        });

        Applicator::new(Platform::Twitter)
            .apply(&settings, &monday_noon(), &mut page)
            .unwrap();

        assert!(page.has_marker(marker::TWITTER_ACTIVE));
        assert!(page.has_marker(marker::TWITTER_AUTOPLAY_STOPPED));
        assert!(page.has_marker(marker::TWITTER_RECOMMENDATIONS_HIDDEN));
        assert!(page.has_marker(marker::TWITTER_TRENDS_HIDDEN));
    }

    #[test]
    fn end_to_end_weekday_window() {
        use crate::schedule::TimeSlot;

        let mut settings = unrestricted_settings();
        settings.common.schedule = Schedule {
            active_days: vec![1],
            time_slots: vec![TimeSlot::new("09:00", "17:00")],
        };

        let mut page = MemoryPage::new();
        let applicator = Applicator::new(Platform::Youtube);

        // Monday 10:00: restricted, shorts marker set
        applicator.apply(&settings, &monday_noon(), &mut page).unwrap();
        assert!(page.has_marker(marker::YOUTUBE_SHORTS_HIDDEN));

        // Tuesday 10:00: unrestricted, everything cleared
        let tuesday = NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        applicator.apply(&settings, &tuesday, &mut page).unwrap();
        assert!(page.markers().is_empty());
    }
}
