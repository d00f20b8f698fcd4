use std::path::PathBuf;

use anyhow::Result;
use platform_gateway::{EmployeeGateway, GatewayError};
use platform_settings::{ConfigSources, PreferencesStore, SettingsError};
use tracing::debug;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub sources: ConfigSources,
    pub prefs_store: PreferencesStore,
    pub json: bool,
}

impl AppConfig {
    pub fn new(
        api_url: Option<String>,
        runtime_config: Option<String>,
        prefs_path: Option<PathBuf>,
        json: bool,
    ) -> Self {
        let prefs_store = prefs_path
            .map(PreferencesStore::new)
            .unwrap_or_else(PreferencesStore::from_env);
        Self {
            sources: ConfigSources::new(api_url, runtime_config),
            prefs_store,
            json,
        }
    }

    /// Resolves the backend URL for this session and builds the gateway.
    ///
    /// A missing URL still yields a gateway; its calls report the
    /// configuration error. An unparsable URL is reported here.
    pub async fn gateway(&self) -> Result<EmployeeGateway> {
        let resolved = match self.sources.resolve().await {
            Ok(resolved) => resolved,
            Err(err @ SettingsError::InvalidUrl { .. }) => {
                return Err(GatewayError::Configuration(err.to_string()).into());
            }
            Err(err) => return Err(err.into()),
        };
        debug!(source = ?resolved.source, "session settings resolved");
        Ok(EmployeeGateway::new(resolved.base_url)?)
    }
}
