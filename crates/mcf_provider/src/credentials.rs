//! Credential records, one per provider.
//!
//! Config files are accepted in camelCase as well as the snake_case layout
//! shown in the catalog examples.

use std::collections::BTreeMap;
use std::fmt::Debug;
use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use mcf_manifest::CloudResourceProvider;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::ProviderHelp;
use crate::error::{ProviderError, ProviderResult};

/// A provider credential record.
pub trait ProviderCredential:
    ProviderHelp + Serialize + DeserializeOwned + Clone + Debug + Send + Sync + 'static
{
    /// Check that every required field is present and well formed.
    fn validate(&self) -> ProviderResult<()>;

    /// Environment variables the provider SDK reads for these credentials.
    fn to_env_vars(&self) -> ProviderResult<BTreeMap<String, String>>;
}

fn require(provider: CloudResourceProvider, field: &str, value: &str) -> ProviderResult<()> {
    if value.trim().is_empty() {
        return Err(ProviderError::missing(provider.as_str(), field));
    }
    Ok(())
}

fn env_map<const N: usize>(pairs: [(&str, &str); N]) -> BTreeMap<String, String> {
    pairs
        .into_iter()
        .filter(|(_, v)| !v.is_empty())
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AwsProviderConfig {
    #[serde(default, alias = "account_id", skip_serializing_if = "String::is_empty")]
    pub account_id: String,
    #[serde(default, alias = "access_key_id")]
    pub access_key_id: String,
    #[serde(default, alias = "secret_access_key")]
    pub secret_access_key: String,
    #[serde(default, alias = "session_token", skip_serializing_if = "Option::is_none")]
    pub session_token: Option<String>,
    #[serde(default)]
    pub region: String,
}

impl ProviderHelp for AwsProviderConfig {
    const PROVIDER: CloudResourceProvider = CloudResourceProvider::Aws;
}

impl ProviderCredential for AwsProviderConfig {
    fn validate(&self) -> ProviderResult<()> {
        require(Self::PROVIDER, "accessKeyId", &self.access_key_id)?;
        require(Self::PROVIDER, "secretAccessKey", &self.secret_access_key)?;
        require(Self::PROVIDER, "region", &self.region)
    }

    fn to_env_vars(&self) -> ProviderResult<BTreeMap<String, String>> {
        Ok(env_map([
            ("AWS_ACCESS_KEY_ID", self.access_key_id.as_str()),
            ("AWS_SECRET_ACCESS_KEY", self.secret_access_key.as_str()),
            ("AWS_REGION", self.region.as_str()),
            ("AWS_SESSION_TOKEN", self.session_token.as_deref().unwrap_or_default()),
        ]))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AzureProviderConfig {
    #[serde(default, alias = "client_id")]
    pub client_id: String,
    #[serde(default, alias = "client_secret")]
    pub client_secret: String,
    #[serde(default, alias = "subscription_id")]
    pub subscription_id: String,
    #[serde(default, alias = "tenant_id")]
    pub tenant_id: String,
}

impl ProviderHelp for AzureProviderConfig {
    const PROVIDER: CloudResourceProvider = CloudResourceProvider::Azure;
}

impl ProviderCredential for AzureProviderConfig {
    fn validate(&self) -> ProviderResult<()> {
        require(Self::PROVIDER, "clientId", &self.client_id)?;
        require(Self::PROVIDER, "clientSecret", &self.client_secret)?;
        require(Self::PROVIDER, "subscriptionId", &self.subscription_id)?;
        require(Self::PROVIDER, "tenantId", &self.tenant_id)
    }

    fn to_env_vars(&self) -> ProviderResult<BTreeMap<String, String>> {
        Ok(env_map([
            ("ARM_CLIENT_ID", self.client_id.as_str()),
            ("ARM_CLIENT_SECRET", self.client_secret.as_str()),
            ("ARM_SUBSCRIPTION_ID", self.subscription_id.as_str()),
            ("ARM_TENANT_ID", self.tenant_id.as_str()),
        ]))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GcpProviderConfig {
    /// Base64 of the service-account JSON key.
    #[serde(default, alias = "service_account_key_base64")]
    pub service_account_key_base64: String,
    #[serde(default, alias = "project_id", skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
}

impl GcpProviderConfig {
    /// Decoded service-account JSON.
    pub fn service_account_key(&self) -> ProviderResult<String> {
        let bytes = STANDARD
            .decode(self.service_account_key_base64.trim())
            .map_err(|e| ProviderError::invalid(Self::PROVIDER.as_str(), format!("serviceAccountKeyBase64 is not base64: {}", e)))?;
        let key = String::from_utf8(bytes).map_err(|_| {
            ProviderError::invalid(Self::PROVIDER.as_str(), "serviceAccountKeyBase64 does not decode to UTF-8")
        })?;
        // JSON is valid YAML, so the YAML parser doubles as a JSON shape check.
        match serde_yaml::from_str::<serde_yaml::Value>(&key) {
            Ok(serde_yaml::Value::Mapping(_)) => Ok(key),
            _ => Err(ProviderError::invalid(
                Self::PROVIDER.as_str(),
                "serviceAccountKeyBase64 does not decode to a JSON key object",
            )),
        }
    }
}

impl ProviderHelp for GcpProviderConfig {
    const PROVIDER: CloudResourceProvider = CloudResourceProvider::Gcp;
}

impl ProviderCredential for GcpProviderConfig {
    fn validate(&self) -> ProviderResult<()> {
        require(Self::PROVIDER, "serviceAccountKeyBase64", &self.service_account_key_base64)?;
        self.service_account_key().map(|_| ())
    }

    fn to_env_vars(&self) -> ProviderResult<BTreeMap<String, String>> {
        let key = self.service_account_key()?;
        Ok(env_map([
            ("GOOGLE_CREDENTIALS", key.as_str()),
            ("GOOGLE_CLOUD_PROJECT", self.project_id.as_deref().unwrap_or_default()),
        ]))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DigitalOceanProviderConfig {
    #[serde(default, alias = "api_token")]
    pub api_token: String,
    #[serde(default, alias = "default_region")]
    pub default_region: String,
    #[serde(default, alias = "spaces_access_id", skip_serializing_if = "Option::is_none")]
    pub spaces_access_id: Option<String>,
    #[serde(default, alias = "spaces_secret_key", skip_serializing_if = "Option::is_none")]
    pub spaces_secret_key: Option<String>,
}

impl ProviderHelp for DigitalOceanProviderConfig {
    const PROVIDER: CloudResourceProvider = CloudResourceProvider::DigitalOcean;
}

impl ProviderCredential for DigitalOceanProviderConfig {
    fn validate(&self) -> ProviderResult<()> {
        require(Self::PROVIDER, "apiToken", &self.api_token)?;
        require(Self::PROVIDER, "defaultRegion", &self.default_region)?;
        if self.spaces_access_id.is_some() != self.spaces_secret_key.is_some() {
            return Err(ProviderError::invalid(
                Self::PROVIDER.as_str(),
                "spacesAccessId and spacesSecretKey must be set together",
            ));
        }
        Ok(())
    }

    fn to_env_vars(&self) -> ProviderResult<BTreeMap<String, String>> {
        Ok(env_map([
            ("DIGITALOCEAN_TOKEN", self.api_token.as_str()),
            ("SPACES_ACCESS_KEY_ID", self.spaces_access_id.as_deref().unwrap_or_default()),
            ("SPACES_SECRET_ACCESS_KEY", self.spaces_secret_key.as_deref().unwrap_or_default()),
        ]))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloudflareProviderConfig {
    #[serde(default, alias = "api_token")]
    pub api_token: String,
}

impl ProviderHelp for CloudflareProviderConfig {
    const PROVIDER: CloudResourceProvider = CloudResourceProvider::Cloudflare;
}

impl ProviderCredential for CloudflareProviderConfig {
    fn validate(&self) -> ProviderResult<()> {
        require(Self::PROVIDER, "apiToken", &self.api_token)
    }

    fn to_env_vars(&self) -> ProviderResult<BTreeMap<String, String>> {
        Ok(env_map([("CLOUDFLARE_API_TOKEN", self.api_token.as_str())]))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CivoProviderConfig {
    #[serde(default, alias = "api_key", alias = "api_token", alias = "apiToken")]
    pub api_key: String,
    #[serde(default, alias = "default_region")]
    pub region: String,
}

impl ProviderHelp for CivoProviderConfig {
    const PROVIDER: CloudResourceProvider = CloudResourceProvider::Civo;
}

impl ProviderCredential for CivoProviderConfig {
    fn validate(&self) -> ProviderResult<()> {
        require(Self::PROVIDER, "apiKey", &self.api_key)?;
        require(Self::PROVIDER, "region", &self.region)
    }

    fn to_env_vars(&self) -> ProviderResult<BTreeMap<String, String>> {
        Ok(env_map([
            ("CIVO_TOKEN", self.api_key.as_str()),
            ("CIVO_REGION", self.region.as_str()),
        ]))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfluentProviderConfig {
    #[serde(default, alias = "api_key")]
    pub api_key: String,
    #[serde(default, alias = "api_secret")]
    pub api_secret: String,
}

impl ProviderHelp for ConfluentProviderConfig {
    const PROVIDER: CloudResourceProvider = CloudResourceProvider::Confluent;
}

impl ProviderCredential for ConfluentProviderConfig {
    fn validate(&self) -> ProviderResult<()> {
        require(Self::PROVIDER, "apiKey", &self.api_key)?;
        require(Self::PROVIDER, "apiSecret", &self.api_secret)
    }

    fn to_env_vars(&self) -> ProviderResult<BTreeMap<String, String>> {
        Ok(env_map([
            ("CONFLUENT_CLOUD_API_KEY", self.api_key.as_str()),
            ("CONFLUENT_CLOUD_API_SECRET", self.api_secret.as_str()),
        ]))
    }
}

/// Where a kubeconfig lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KubeconfigSource {
    /// Decoded kubeconfig content.
    Inline(String),
    Path(PathBuf),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KubernetesProviderConfig {
    /// Base64 kubeconfig content, or a path to a kubeconfig file.
    #[serde(default)]
    pub kubeconfig: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

impl KubernetesProviderConfig {
    pub fn source(&self) -> KubeconfigSource {
        let raw = self.kubeconfig.trim();
        let decoded = STANDARD
            .decode(raw)
            .ok()
            .and_then(|bytes| String::from_utf8(bytes).ok())
            .filter(|content| content.contains("clusters"));
        match decoded {
            Some(content) => KubeconfigSource::Inline(content),
            None => KubeconfigSource::Path(PathBuf::from(raw)),
        }
    }

    /// Path of a kubeconfig file, writing inline content under `dir` first.
    pub fn materialize(&self, dir: &Path) -> ProviderResult<PathBuf> {
        match self.source() {
            KubeconfigSource::Path(path) => Ok(path),
            KubeconfigSource::Inline(content) => {
                let path = dir.join(uuid::Uuid::new_v4().to_string());
                std::fs::write(&path, content)?;
                debug!("Wrote kubeconfig to {}", path.display());
                Ok(path)
            }
        }
    }
}

impl ProviderHelp for KubernetesProviderConfig {
    const PROVIDER: CloudResourceProvider = CloudResourceProvider::Kubernetes;
}

impl ProviderCredential for KubernetesProviderConfig {
    fn validate(&self) -> ProviderResult<()> {
        require(Self::PROVIDER, "kubeconfig", &self.kubeconfig)
    }

    /// Inline kubeconfigs have no path yet; call [`KubernetesProviderConfig::materialize`]
    /// and export `KUBECONFIG` yourself.
    fn to_env_vars(&self) -> ProviderResult<BTreeMap<String, String>> {
        let path = match self.source() {
            KubeconfigSource::Path(path) => path.display().to_string(),
            KubeconfigSource::Inline(_) => String::new(),
        };
        Ok(env_map([
            ("KUBECONFIG", path.as_str()),
            ("KUBE_CONTEXT", self.context.as_deref().unwrap_or_default()),
        ]))
    }
}
