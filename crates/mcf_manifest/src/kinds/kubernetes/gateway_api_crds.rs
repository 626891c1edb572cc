//! `KubernetesGatewayApiCrds`: installs the Gateway API CRDs into a cluster.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::kind::CloudResourceKind;
use crate::manifest::ResourceSpec;
use crate::schema::{FieldSchema, FieldType, MessageSchema};
use crate::validation::ValidationResult;

pub const DEFAULT_GATEWAY_API_VERSION: &str = "v1.2.1";
const RELEASE_URL_BASE: &str = "https://github.com/kubernetes-sigs/gateway-api/releases/download";

static RELEASE_VERSION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^v\d+\.\d+\.\d+(-rc\.\d+)?$").expect("valid version regex"));

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GatewayApiChannel {
    #[default]
    Standard,
    Experimental,
}

impl GatewayApiChannel {
    pub fn as_str(&self) -> &'static str {
        match self {
            GatewayApiChannel::Standard => "standard",
            GatewayApiChannel::Experimental => "experimental",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KubernetesGatewayApiCrdsSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub install_channel: Option<GatewayApiChannel>,
}

impl KubernetesGatewayApiCrdsSpec {
    pub fn version(&self) -> &str {
        self.version
            .as_deref()
            .filter(|v| !v.is_empty())
            .unwrap_or(DEFAULT_GATEWAY_API_VERSION)
    }

    pub fn channel(&self) -> GatewayApiChannel {
        self.install_channel.unwrap_or_default()
    }

    /// Release manifest for the selected version and channel.
    pub fn manifest_url(&self) -> String {
        format!(
            "{}/{}/{}-install.yaml",
            RELEASE_URL_BASE,
            self.version(),
            self.channel().as_str()
        )
    }
}

impl ResourceSpec for KubernetesGatewayApiCrdsSpec {
    const KIND: CloudResourceKind = CloudResourceKind::KubernetesGatewayApiCrds;

    fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::new();
        if let Some(version) = &self.version {
            result.check_pattern("version", version, &RELEASE_VERSION, "be a release tag such as v1.2.1");
        }
        if self.channel() == GatewayApiChannel::Experimental {
            result.add_warning("experimental channel CRDs are not covered by API guarantees");
        }
        result
    }

    fn schema() -> MessageSchema {
        MessageSchema::new("KubernetesGatewayApiCrdsSpec")
            .field(FieldSchema::optional("version", FieldType::String).with_default(DEFAULT_GATEWAY_API_VERSION))
            .field(
                FieldSchema::optional("installChannel", FieldType::Enum)
                    .with_values(["standard", "experimental"])
                    .with_default("standard"),
            )
    }
}
