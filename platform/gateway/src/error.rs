use thiserror::Error;

pub type GatewayResult<T> = Result<T, GatewayError>;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("validation error: {0}")]
    Validation(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("backend answered {status}: {message}")]
    Status { status: u16, message: String },
    #[error("unexpected {what} payload: {message}")]
    Decode { what: &'static str, message: String },
}

impl GatewayError {
    pub fn code(&self) -> &'static str {
        match self {
            GatewayError::Configuration(_) => "CONFIGURATION",
            GatewayError::Network(_) => "NETWORK",
            GatewayError::Validation(_) => "VALIDATION",
            GatewayError::NotFound(_) => "NOT_FOUND",
            GatewayError::Status { .. } => "BACKEND",
            GatewayError::Decode { .. } => "DECODE",
        }
    }

    pub(crate) fn missing_base_url() -> Self {
        Self::Configuration(
            "backend url not configured; set VITE_API_URL in config.json or STAFFBOARD_API_URL"
                .into(),
        )
    }
}
