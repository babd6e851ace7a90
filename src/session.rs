use anyhow::Result;
use chrono::{Local, NaiveDateTime};
use tracing::info;

use crate::applicator::Applicator;
use crate::evaluator;
use crate::page::Page;
use crate::platform::Platform;
use crate::settings::Settings;
use crate::store::{self, SettingsStore};

/// Events that require re-running the applicator.
///
/// Sources are independent and uncoordinated; the engine relies only on
/// the event loop serializing their delivery.
#[derive(Debug, Clone)]
pub enum Trigger {
    /// Periodic evaluation tick
    Tick,
    /// Structural mutation observed in the page content area
    PageMutated,
    /// Cross-tab settings update; replaces the in-memory settings wholesale
    SettingsUpdated(Settings),
}

/// One page's restriction session: the current settings cell, the page, and
/// the platform's applicator.
///
/// Settings have a single writer (this session) and start out absent; until
/// the initial load completes the page is in an explicit no-restrictions-
/// applied state and triggers are dropped.
pub struct Session<P: Page> {
    platform: Platform,
    applicator: Applicator,
    page: P,
    settings: Option<Settings>,
    last_decision: Option<bool>,
}

impl<P: Page> Session<P> {
    pub fn new(platform: Platform, page: P) -> Self {
        Self {
            platform,
            applicator: Applicator::new(platform),
            page,
            settings: None,
            last_decision: None,
        }
    }

    /// Whether the initial settings load has completed.
    pub fn loaded(&self) -> bool {
        self.settings.is_some()
    }

    pub fn settings(&self) -> Option<&Settings> {
        self.settings.as_ref()
    }

    pub fn page(&self) -> &P {
        &self.page
    }

    pub fn page_mut(&mut self) -> &mut P {
        &mut self.page
    }

    /// Complete the initial load from the store and apply once.
    ///
    /// A missing or unreadable store falls back to built-in defaults; that
    /// is a recovery, not a failure.
    pub fn load_from(&mut self, store: &dyn SettingsStore) -> Result<()> {
        self.replace_settings(store::load_or_default(store))
    }

    /// Handle one re-entry trigger.
    pub fn handle(&mut self, trigger: Trigger) -> Result<()> {
        match trigger {
            Trigger::SettingsUpdated(settings) => self.replace_settings(settings),
            Trigger::Tick | Trigger::PageMutated => self.apply_at(&Local::now().naive_local()),
        }
    }

    /// Replace the in-memory settings wholesale and re-apply.
    pub fn replace_settings(&mut self, settings: Settings) -> Result<()> {
        self.settings = Some(settings);
        self.apply_at(&Local::now().naive_local())
    }

    /// Re-apply at an explicit time; tests pin the clock through this.
    pub fn apply_at(&mut self, now: &NaiveDateTime) -> Result<()> {
        let Some(settings) = self.settings.as_ref() else {
            return Ok(());
        };

        let restricted = evaluator::is_restricted(settings, self.platform, now)?;
        if self.last_decision != Some(restricted) {
            if restricted {
                info!("{}: restrictions active", self.platform.key());
            } else {
                info!("{}: restrictions lifted", self.platform.key());
            }
            self.last_decision = Some(restricted);
        }

        self.applicator.apply(settings, now, &mut self.page)
    }
}
