use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::{SettingsError, SettingsResult};

/// Environment variable holding an explicit backend URL.
pub const API_URL_ENV: &str = "STAFFBOARD_API_URL";

/// Backend URL baked in at compile time, used when nothing else resolves.
pub const BUILD_DEFAULT_API_URL: Option<&str> = option_env!("STAFFBOARD_DEFAULT_API_URL");

/// Contents of the runtime `config.json` resource.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct RuntimeConfig {
    #[serde(rename = "VITE_API_URL", alias = "api_url", default)]
    pub api_url: Option<String>,
}

impl RuntimeConfig {
    /// Loads the resource from a filesystem path or an `http(s)://` URL.
    pub async fn load(location: &str) -> SettingsResult<Self> {
        let body = if location.starts_with("http://") || location.starts_with("https://") {
            let response = reqwest::get(location)
                .await
                .and_then(|resp| resp.error_for_status())
                .map_err(|source| SettingsError::Fetch {
                    location: location.to_string(),
                    source,
                })?;
            response.text().await.map_err(|source| SettingsError::Fetch {
                location: location.to_string(),
                source,
            })?
        } else {
            tokio::fs::read_to_string(location)
                .await
                .map_err(|source| SettingsError::Io {
                    path: location.to_string(),
                    source,
                })?
        };
        serde_json::from_str(&body).map_err(|source| SettingsError::Json {
            location: location.to_string(),
            source,
        })
    }
}

/// Where the resolved backend URL came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UrlSource {
    Override,
    RuntimeConfig,
    BuildDefault,
}

/// Inputs to backend URL resolution, highest priority first.
#[derive(Clone, Debug, Default)]
pub struct ConfigSources {
    pub override_url: Option<String>,
    pub runtime_config: Option<String>,
    pub build_default: Option<String>,
}

impl ConfigSources {
    pub fn new(override_url: Option<String>, runtime_config: Option<String>) -> Self {
        Self {
            override_url,
            runtime_config,
            build_default: BUILD_DEFAULT_API_URL.map(str::to_string),
        }
    }

    /// Resolves the backend URL once for the session.
    ///
    /// An unreadable runtime resource is skipped, not fatal. Nothing resolving
    /// yields `base_url: None`; a value that does not parse as a URL is an error.
    pub async fn resolve(&self) -> SettingsResult<ResolvedSettings> {
        if let Some(url) = non_empty(self.override_url.as_deref()) {
            return ResolvedSettings::parsed(url, UrlSource::Override);
        }

        if let Some(location) = non_empty(self.runtime_config.as_deref()) {
            match RuntimeConfig::load(location).await {
                Ok(config) => {
                    if let Some(url) = non_empty(config.api_url.as_deref()) {
                        return ResolvedSettings::parsed(url, UrlSource::RuntimeConfig);
                    }
                    debug!(%location, "runtime config has no backend url");
                }
                Err(err) => debug!(error = %err, "runtime config unavailable, falling back"),
            }
        }

        if let Some(url) = non_empty(self.build_default.as_deref()) {
            return ResolvedSettings::parsed(url, UrlSource::BuildDefault);
        }

        debug!("no backend url resolvable");
        Ok(ResolvedSettings {
            base_url: None,
            source: None,
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedSettings {
    pub base_url: Option<Url>,
    pub source: Option<UrlSource>,
}

impl ResolvedSettings {
    fn parsed(raw: &str, source: UrlSource) -> SettingsResult<Self> {
        let base_url = Url::parse(raw).map_err(|err| SettingsError::InvalidUrl {
            url: raw.to_string(),
            source: err,
        })?;
        debug!(url = %base_url, ?source, "backend url resolved");
        Ok(Self {
            base_url: Some(base_url),
            source: Some(source),
        })
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
