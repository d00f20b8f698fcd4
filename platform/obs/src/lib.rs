use anyhow::{Result, anyhow};
use once_cell::sync::OnceCell;
use opentelemetry::trace::TracerProvider;
use opentelemetry_otlp::{Protocol, SpanExporter, WithExportConfig};
use opentelemetry_sdk::{Resource, trace::SdkTracerProvider};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

static INIT: OnceCell<()> = OnceCell::new();

/// Checked before `RUST_LOG`.
pub const LOG_FILTER_ENV: &str = "STAFFBOARD_LOG";
/// Checked before `OTLP_ENDPOINT`.
pub const OTLP_ENDPOINT_ENV: &str = "STAFFBOARD_OTLP_ENDPOINT";

/// Command output owns stdout; diagnostics go to stderr and stay quiet
/// unless asked for.
const QUIET_FILTER: &str = "warn";
const VERBOSE_FILTER: &str = "debug,hyper=info,hyper_util=info,reqwest=info,h2=info,rustls=info";

#[derive(Clone, Debug)]
pub struct ObsConfig {
    pub service_name: &'static str,
    pub env_filter: Option<String>,
    pub otlp_endpoint: Option<String>,
}

impl Default for ObsConfig {
    fn default() -> Self {
        Self {
            service_name: "staffboard",
            env_filter: None,
            otlp_endpoint: None,
        }
    }
}

impl ObsConfig {
    /// `--verbose`: debug output for our crates, HTTP internals at info.
    pub fn verbose(mut self, verbose: bool) -> Self {
        if verbose {
            self.env_filter = Some(VERBOSE_FILTER.to_string());
        }
        self
    }

    fn resolved_filter(&self) -> String {
        self.env_filter
            .clone()
            .or_else(|| env_value(LOG_FILTER_ENV))
            .or_else(|| env_value("RUST_LOG"))
            .unwrap_or_else(|| QUIET_FILTER.to_string())
    }

    fn resolved_endpoint(&self) -> Option<String> {
        self.otlp_endpoint
            .clone()
            .or_else(|| env_value(OTLP_ENDPOINT_ENV))
            .or_else(|| env_value("OTLP_ENDPOINT"))
    }
}

fn env_value(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Keeps the OTLP pipeline alive; dropping it flushes pending spans.
#[must_use = "dropping the guard shuts the exporter down"]
#[derive(Debug, Default)]
pub struct ObsGuard {
    provider: Option<SdkTracerProvider>,
}

impl Drop for ObsGuard {
    fn drop(&mut self) {
        if let Some(provider) = self.provider.take() {
            if let Err(err) = provider.shutdown() {
                eprintln!("failed to flush traces: {err}");
            }
        }
    }
}

/// Installs the stderr fmt layer, plus an OTLP exporter when an endpoint is
/// configured. Later calls are no-ops returning an empty guard.
pub fn init_tracing(config: ObsConfig) -> Result<ObsGuard> {
    if INIT.get().is_some() {
        return Ok(ObsGuard::default());
    }

    let env_filter = EnvFilter::try_new(config.resolved_filter())?;
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);
    let registry = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer);

    let provider = match config.resolved_endpoint() {
        Some(endpoint) => {
            let exporter = SpanExporter::builder()
                .with_http()
                .with_protocol(Protocol::HttpBinary)
                .with_endpoint(endpoint)
                .build()?;
            let provider = SdkTracerProvider::builder()
                .with_resource(
                    Resource::builder()
                        .with_service_name(config.service_name)
                        .build(),
                )
                .with_batch_exporter(exporter)
                .build();
            let tracer = provider.tracer(config.service_name);
            registry
                .with(tracing_opentelemetry::layer().with_tracer(tracer))
                .try_init()?;
            Some(provider)
        }
        None => {
            registry.try_init()?;
            None
        }
    };

    INIT.set(())
        .map_err(|_| anyhow!("tracing already initialized"))?;
    Ok(ObsGuard { provider })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbose_overrides_filter_only_when_asked() {
        assert_eq!(ObsConfig::default().verbose(false).env_filter, None);
        let config = ObsConfig::default().verbose(true);
        assert_eq!(config.resolved_filter(), VERBOSE_FILTER);
    }

    #[test]
    fn explicit_endpoint_wins() {
        let config = ObsConfig {
            otlp_endpoint: Some("http://collector:4318/v1/traces".into()),
            ..ObsConfig::default()
        };
        assert_eq!(
            config.resolved_endpoint().as_deref(),
            Some("http://collector:4318/v1/traces")
        );
    }

    #[test]
    fn second_init_is_a_no_op() {
        let _first = init_tracing(ObsConfig::default()).unwrap();
        let second = init_tracing(ObsConfig::default()).unwrap();
        assert!(second.provider.is_none());
    }
}
