use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use directories::ProjectDirs;

use crate::models::settings::WeekViewSettings;

pub const CONFIG_FILE_NAME: &str = "weekview.toml";

/// Per-user config location, e.g. `~/.config/calendarweekview/weekview.toml`.
pub fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("com", "KenBoyle", "CalendarWeekview")
        .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

pub struct SettingsService {
    path: PathBuf,
}

impl SettingsService {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Service bound to the per-user config file.
    pub fn with_default_path() -> Result<Self> {
        let path = default_config_path().context("Failed to get base directories")?;
        Ok(Self::new(path))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load and validate settings. Keys missing from the file take their
    /// defaults.
    pub fn load(&self) -> Result<WeekViewSettings> {
        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read settings file: {:?}", self.path))?;
        let settings: WeekViewSettings = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse settings file: {:?}", self.path))?;
        settings
            .validate()
            .map_err(|e| anyhow!("Invalid settings in {:?}: {}", self.path, e))?;
        Ok(settings)
    }

    /// Like [`load`](Self::load), falling back to defaults on any failure.
    pub fn load_or_default(&self) -> WeekViewSettings {
        if !self.path.exists() {
            log::debug!("No settings file at {:?}, using defaults", self.path);
            return WeekViewSettings::default();
        }
        match self.load() {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Failed to load settings: {:#}, using defaults", e);
                WeekViewSettings::default()
            }
        }
    }

    pub fn save(&self, settings: &WeekViewSettings) -> Result<()> {
        settings
            .validate()
            .map_err(|e| anyhow!("Invalid settings: {}", e))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        let contents = toml::to_string_pretty(settings).context("Failed to serialize settings")?;
        fs::write(&self.path, contents)
            .with_context(|| format!("Failed to write settings file: {:?}", self.path))?;
        Ok(())
    }

    /// Reset settings to defaults
    pub fn reset(&self) -> Result<()> {
        self.save(&WeekViewSettings::default())
    }
}
