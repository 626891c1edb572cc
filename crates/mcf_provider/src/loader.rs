//! Loading provider config files.

use std::path::Path;

use tracing::debug;

use crate::credentials::ProviderCredential;
use crate::error::{ProviderError, ProviderResult};

/// Parse and validate credentials from YAML.
pub fn parse_provider_config<C: ProviderCredential>(content: &str) -> ProviderResult<C> {
    let config: C = serde_yaml::from_str(content)
        .map_err(|e| ProviderError::invalid(C::PROVIDER.as_str(), e.to_string()))?;
    config.validate()?;
    Ok(config)
}

/// Read, parse and validate a provider config file.
pub fn load_provider_config<C: ProviderCredential>(path: &Path) -> ProviderResult<C> {
    if !path.exists() {
        return Err(ProviderError::NotFound(path.display().to_string()));
    }
    debug!("Loading {} provider config from {}", C::PROVIDER, path.display());
    let content = std::fs::read_to_string(path)?;
    parse_provider_config(&content)
}
