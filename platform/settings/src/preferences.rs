use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{SettingsError, SettingsResult};

/// Environment variable overriding the preferences file location.
pub const PREFS_PATH_ENV: &str = "STAFFBOARD_PREFS";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Fr,
    En,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CursorStyle {
    #[default]
    Default,
    Pointer,
    Crosshair,
}

/// Display preferences handed to the view layer.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Preferences {
    pub theme: Theme,
    pub language: Language,
    pub cursor_style: CursorStyle,
    pub show_data_points: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            language: Language::default(),
            cursor_style: CursorStyle::default(),
            show_data_points: true,
        }
    }
}

/// JSON file holding [`Preferences`].
#[derive(Clone, Debug)]
pub struct PreferencesStore {
    path: PathBuf,
}

impl PreferencesStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `STAFFBOARD_PREFS`, else `~/.staffboard/preferences.json`, else a
    /// `.staffboard` directory under the working directory.
    pub fn from_env() -> Self {
        if let Ok(path) = std::env::var(PREFS_PATH_ENV) {
            return Self::new(path);
        }
        let base = std::env::var_os("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));
        Self::new(base.join(".staffboard").join("preferences.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads stored preferences; a missing file yields the defaults.
    pub fn load(&self) -> SettingsResult<Preferences> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no stored preferences, using defaults");
                return Ok(Preferences::default());
            }
            Err(source) => return Err(self.io_error(source)),
        };
        serde_json::from_str(&raw).map_err(|source| SettingsError::Json {
            location: self.path.display().to_string(),
            source,
        })
    }

    pub fn save(&self, prefs: &Preferences) -> SettingsResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| self.io_error(source))?;
        }
        let body = serde_json::to_string_pretty(prefs).map_err(|source| SettingsError::Json {
            location: self.path.display().to_string(),
            source,
        })?;
        std::fs::write(&self.path, body).map_err(|source| self.io_error(source))?;
        debug!(path = %self.path.display(), "preferences saved");
        Ok(())
    }

    fn io_error(&self, source: std::io::Error) -> SettingsError {
        SettingsError::Io {
            path: self.path.display().to_string(),
            source,
        }
    }
}
