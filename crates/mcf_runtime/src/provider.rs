//! Building engine providers from credential records.

use mcf_provider::{
    catalog_entry, AwsProviderConfig, AzureProviderConfig, CivoProviderConfig,
    CloudflareProviderConfig, ConfluentProviderConfig, DigitalOceanProviderConfig,
    GcpProviderConfig, KubeconfigSource, KubernetesProviderConfig, ProviderCredential,
};
use tracing::{info, warn};

use crate::engine::{Engine, ProviderHandle, ProviderRequest};
use crate::error::{ModuleError, ModuleResult, WrapErr};
use crate::property::{PropertyMap, PropertyValue};

/// A credential record the engine can configure a provider from.
pub trait EngineProvider: ProviderCredential {
    /// Provider arguments, with secrets marked.
    fn provider_args(&self) -> ModuleResult<PropertyMap>;
}

impl EngineProvider for AwsProviderConfig {
    fn provider_args(&self) -> ModuleResult<PropertyMap> {
        Ok(PropertyMap::new()
            .with("accessKey", PropertyValue::secret(&self.access_key_id))
            .with("secretKey", PropertyValue::secret(&self.secret_access_key))
            .with_opt("token", self.session_token.clone().map(PropertyValue::secret))
            .with("region", &self.region))
    }
}

impl EngineProvider for AzureProviderConfig {
    fn provider_args(&self) -> ModuleResult<PropertyMap> {
        Ok(PropertyMap::new()
            .with("clientId", &self.client_id)
            .with("clientSecret", PropertyValue::secret(&self.client_secret))
            .with("subscriptionId", &self.subscription_id)
            .with("tenantId", &self.tenant_id))
    }
}

impl EngineProvider for GcpProviderConfig {
    fn provider_args(&self) -> ModuleResult<PropertyMap> {
        Ok(PropertyMap::new()
            .with("credentials", PropertyValue::secret(self.service_account_key()?))
            .with_opt("project", self.project_id.clone()))
    }
}

impl EngineProvider for DigitalOceanProviderConfig {
    fn provider_args(&self) -> ModuleResult<PropertyMap> {
        Ok(PropertyMap::new()
            .with("token", PropertyValue::secret(&self.api_token))
            .with_opt("spacesAccessId", self.spaces_access_id.clone())
            .with_opt("spacesSecretKey", self.spaces_secret_key.clone().map(PropertyValue::secret)))
    }
}

impl EngineProvider for CloudflareProviderConfig {
    fn provider_args(&self) -> ModuleResult<PropertyMap> {
        Ok(PropertyMap::new().with("apiToken", PropertyValue::secret(&self.api_token)))
    }
}

impl EngineProvider for CivoProviderConfig {
    fn provider_args(&self) -> ModuleResult<PropertyMap> {
        Ok(PropertyMap::new()
            .with("token", PropertyValue::secret(&self.api_key))
            .with("region", &self.region))
    }
}

impl EngineProvider for ConfluentProviderConfig {
    fn provider_args(&self) -> ModuleResult<PropertyMap> {
        Ok(PropertyMap::new()
            .with("cloudApiKey", &self.api_key)
            .with("cloudApiSecret", PropertyValue::secret(&self.api_secret)))
    }
}

impl EngineProvider for KubernetesProviderConfig {
    fn provider_args(&self) -> ModuleResult<PropertyMap> {
        let args = match self.source() {
            KubeconfigSource::Inline(content) => {
                PropertyMap::new().with("kubeconfig", PropertyValue::secret(content))
            }
            KubeconfigSource::Path(path) => {
                PropertyMap::new().with("kubeconfig", path.display().to_string())
            }
        };
        Ok(args.with_opt("context", self.context.clone()))
    }
}

/// Configure the module's provider.
///
/// Without a config, providers that can pick up ambient credentials get a
/// default instance; every other provider fails with `ProviderSetupFailed`.
pub async fn setup_provider<P: EngineProvider>(
    engine: &dyn Engine,
    config: Option<&P>,
) -> ModuleResult<ProviderHandle> {
    let provider = P::PROVIDER;
    let setup_failed = |detail: String| ModuleError::ProviderSetupFailed {
        provider: provider.as_str().to_string(),
        detail,
    };

    let args = match config {
        Some(config) => config
            .validate()
            .map_err(|e| setup_failed(e.to_string()))
            .and_then(|_| config.provider_args().map_err(|e| setup_failed(e.to_string()))),
        None if catalog_entry(provider).supports_ambient_credentials => {
            warn!("No {} provider config supplied; using ambient credentials", provider);
            Ok(PropertyMap::new())
        }
        None => Err(setup_failed("no provider config supplied".to_string())),
    }
    .wrap_err_with(|| format!("failed to setup {} provider", provider))?;

    info!("Configuring {} provider", provider);
    engine
        .register_provider(ProviderRequest {
            provider,
            name: provider.as_str().to_string(),
            args,
        })
        .await
        .wrap_err_with(|| format!("failed to setup {} provider", provider))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recording::RecordingEngine;

    #[tokio::test]
    async fn test_missing_config_fails_for_azure() {
        let engine = RecordingEngine::default();
        let err = setup_provider::<AzureProviderConfig>(&engine, None).await.unwrap_err();
        assert_eq!(err.to_string(), "failed to setup azure provider");
        assert_eq!(err.failed_provider(), Some("azure"));
        assert!(engine.providers().is_empty());
    }

    #[tokio::test]
    async fn test_ambient_credentials_for_aws() {
        let engine = RecordingEngine::default();
        let handle = setup_provider::<AwsProviderConfig>(&engine, None).await.unwrap();
        assert_eq!(handle.name, "aws");
        assert!(engine.providers()[0].args.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_config_is_setup_failure() {
        let engine = RecordingEngine::default();
        let config = CloudflareProviderConfig::default();
        let err = setup_provider(&engine, Some(&config)).await.unwrap_err();
        assert_eq!(err.to_string(), "failed to setup cloudflare provider");
        assert_eq!(err.failed_provider(), Some("cloudflare"));
        assert!(matches!(err.root_cause(), ModuleError::ProviderSetupFailed { .. }));
    }

    #[tokio::test]
    async fn test_secrets_are_marked() {
        let engine = RecordingEngine::default();
        let config = DigitalOceanProviderConfig {
            api_token: "dop_v1_abc".into(),
            default_region: "nyc3".into(),
            ..Default::default()
        };
        setup_provider(&engine, Some(&config)).await.unwrap();
        let yaml = serde_yaml::to_string(&engine.providers()[0].args).unwrap();
        assert!(!yaml.contains("dop_v1_abc"));
        assert!(yaml.contains("[secret]"));
    }
}
