//! Session settings: where the backend lives and how the user likes to see it.

mod preferences;
mod runtime;

pub use preferences::{
    CursorStyle, Language, PREFS_PATH_ENV, Preferences, PreferencesStore, Theme,
};
pub use runtime::{
    API_URL_ENV, BUILD_DEFAULT_API_URL, ConfigSources, ResolvedSettings, RuntimeConfig, UrlSource,
};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("invalid backend url {url:?}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to fetch {location}: {source}")]
    Fetch {
        location: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("malformed settings in {location}: {source}")]
    Json {
        location: String,
        #[source]
        source: serde_json::Error,
    },
}

pub type SettingsResult<T> = Result<T, SettingsError>;
