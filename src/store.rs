use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::settings::Settings;

/// Key-value settings storage the engine reads at startup and polls for
/// external edits.
pub trait SettingsStore {
    /// Absent settings are not an error; callers fall back to defaults.
    fn load(&self) -> Result<Option<Settings>>;

    fn save(&self, settings: &Settings) -> Result<()>;
}

/// Load stored settings, degrading to built-in defaults.
///
/// An unreadable or corrupt store is recovered locally and logged; it is
/// never surfaced as a failure.
pub fn load_or_default(store: &dyn SettingsStore) -> Settings {
    match store.load() {
        Ok(Some(settings)) => settings,
        Ok(None) => {
            debug!("no stored settings, using built-in defaults");
            Settings::default()
        }
        Err(e) => {
            warn!("failed to load settings, using built-in defaults: {:#}", e);
            Settings::default()
        }
    }
}

/// JSON file store holding the settings object the editor produces.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsStore for JsonFileStore {
    fn load(&self) -> Result<Option<Settings>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read settings file: {}", self.path.display()))?;

        let settings: Settings = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse settings file: {}", self.path.display()))?;

        Ok(Some(settings))
    }

    fn save(&self, settings: &Settings) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create settings directory: {}", parent.display())
            })?;
        }

        let content =
            serde_json::to_string_pretty(settings).context("Failed to serialize settings")?;

        std::fs::write(&self.path, content)
            .with_context(|| format!("Failed to write settings file: {}", self.path.display()))?;

        Ok(())
    }
}

/// Get the per-user default settings file path.
pub fn default_settings_path() -> Result<PathBuf> {
    let dirs = directories::ProjectDirs::from("", "", "content-curfew")
        .context("Could not determine settings file location")?;
    Ok(dirs.config_dir().join("settings.json"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_and_load_round_trip() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(temp_dir.path().join("settings.json"));

        let mut settings = Settings::default();
        settings.common.always_on = false;
        settings.common.grayscale = true;
        store.save(&settings).unwrap();

        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn load_returns_none_for_absent_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(temp_dir.path().join("settings.json"));

        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn save_creates_missing_parent_directories() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(temp_dir.path().join("nested/dir/settings.json"));

        store.save(&Settings::default()).unwrap();
        assert!(store.load().unwrap().is_some());
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("settings.json");
        std::fs::write(&path, "{not json").unwrap();

        let store = JsonFileStore::new(path);
        assert!(store.load().is_err());
    }

    #[test]
    fn load_or_default_recovers_from_corruption() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("settings.json");
        std::fs::write(&path, "{not json").unwrap();

        let settings = load_or_default(&JsonFileStore::new(path));
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn load_or_default_uses_defaults_for_empty_store() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(temp_dir.path().join("settings.json"));

        let settings = load_or_default(&store);
        assert!(settings.common.always_on);
        assert!(settings.youtube.is_some());
    }
}
