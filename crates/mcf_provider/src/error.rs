//! Error types for provider credentials.

use thiserror::Error;

/// Result type alias for provider operations.
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Errors raised while loading or checking provider credentials.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("{provider} provider config is missing '{field}'")]
    MissingField { provider: String, field: String },

    #[error("Invalid {provider} provider config: {detail}")]
    InvalidConfig { provider: String, detail: String },

    #[error("Unknown provider: {0}")]
    UnknownProvider(String),

    #[error("Provider config not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl ProviderError {
    pub(crate) fn missing(provider: &str, field: &str) -> Self {
        ProviderError::MissingField {
            provider: provider.to_string(),
            field: field.to_string(),
        }
    }

    pub(crate) fn invalid(provider: &str, detail: impl Into<String>) -> Self {
        ProviderError::InvalidConfig {
            provider: provider.to_string(),
            detail: detail.into(),
        }
    }
}
