//! Cloud providers, resource kinds and GVK extraction.

use serde::{Deserialize, Serialize};

use crate::error::{ManifestError, ManifestResult};

/// Supported cloud providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CloudResourceProvider {
    Aws,
    Azure,
    Gcp,
    DigitalOcean,
    Civo,
    Cloudflare,
    Confluent,
    Kubernetes,
}

impl CloudResourceProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            CloudResourceProvider::Aws => "aws",
            CloudResourceProvider::Azure => "azure",
            CloudResourceProvider::Gcp => "gcp",
            CloudResourceProvider::DigitalOcean => "digitalocean",
            CloudResourceProvider::Civo => "civo",
            CloudResourceProvider::Cloudflare => "cloudflare",
            CloudResourceProvider::Confluent => "confluent",
            CloudResourceProvider::Kubernetes => "kubernetes",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().replace(['-', '_'], "").as_str() {
            "aws" => Some(CloudResourceProvider::Aws),
            "azure" => Some(CloudResourceProvider::Azure),
            "gcp" => Some(CloudResourceProvider::Gcp),
            "digitalocean" => Some(CloudResourceProvider::DigitalOcean),
            "civo" => Some(CloudResourceProvider::Civo),
            "cloudflare" => Some(CloudResourceProvider::Cloudflare),
            "confluent" => Some(CloudResourceProvider::Confluent),
            "kubernetes" | "k8s" => Some(CloudResourceProvider::Kubernetes),
            _ => None,
        }
    }

    pub fn all() -> Vec<Self> {
        vec![
            CloudResourceProvider::Aws,
            CloudResourceProvider::Azure,
            CloudResourceProvider::Gcp,
            CloudResourceProvider::DigitalOcean,
            CloudResourceProvider::Civo,
            CloudResourceProvider::Cloudflare,
            CloudResourceProvider::Confluent,
            CloudResourceProvider::Kubernetes,
        ]
    }

    /// API group that manifests of this provider are published under.
    pub fn api_group(&self) -> &'static str {
        match self {
            CloudResourceProvider::Aws => "aws.openmcf.org",
            CloudResourceProvider::Azure => "azure.openmcf.org",
            CloudResourceProvider::Gcp => "gcp.openmcf.org",
            CloudResourceProvider::DigitalOcean => "digital-ocean.openmcf.org",
            CloudResourceProvider::Civo => "civo.openmcf.org",
            CloudResourceProvider::Cloudflare => "cloudflare.openmcf.org",
            CloudResourceProvider::Confluent => "confluent.openmcf.org",
            CloudResourceProvider::Kubernetes => "kubernetes.openmcf.org",
        }
    }
}

impl std::fmt::Display for CloudResourceProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The closed set of resource kinds this catalog provisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CloudResourceKind {
    AwsRoute53DnsRecord,
    AwsS3Bucket,
    AzureDnsRecord,
    AzureVirtualMachine,
    CivoDnsRecord,
    CloudflareDnsRecord,
    CloudflareDnsZone,
    DigitalOceanDnsRecord,
    DigitalOceanVpc,
    GcpComputeInstance,
    GcpDnsRecord,
    KubernetesGatewayApiCrds,
}

impl CloudResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CloudResourceKind::AwsRoute53DnsRecord => "AwsRoute53DnsRecord",
            CloudResourceKind::AwsS3Bucket => "AwsS3Bucket",
            CloudResourceKind::AzureDnsRecord => "AzureDnsRecord",
            CloudResourceKind::AzureVirtualMachine => "AzureVirtualMachine",
            CloudResourceKind::CivoDnsRecord => "CivoDnsRecord",
            CloudResourceKind::CloudflareDnsRecord => "CloudflareDnsRecord",
            CloudResourceKind::CloudflareDnsZone => "CloudflareDnsZone",
            CloudResourceKind::DigitalOceanDnsRecord => "DigitalOceanDnsRecord",
            CloudResourceKind::DigitalOceanVpc => "DigitalOceanVpc",
            CloudResourceKind::GcpComputeInstance => "GcpComputeInstance",
            CloudResourceKind::GcpDnsRecord => "GcpDnsRecord",
            CloudResourceKind::KubernetesGatewayApiCrds => "KubernetesGatewayApiCrds",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Self::all().into_iter().find(|k| k.as_str() == s)
    }

    pub fn all() -> Vec<Self> {
        vec![
            CloudResourceKind::AwsRoute53DnsRecord,
            CloudResourceKind::AwsS3Bucket,
            CloudResourceKind::AzureDnsRecord,
            CloudResourceKind::AzureVirtualMachine,
            CloudResourceKind::CivoDnsRecord,
            CloudResourceKind::CloudflareDnsRecord,
            CloudResourceKind::CloudflareDnsZone,
            CloudResourceKind::DigitalOceanDnsRecord,
            CloudResourceKind::DigitalOceanVpc,
            CloudResourceKind::GcpComputeInstance,
            CloudResourceKind::GcpDnsRecord,
            CloudResourceKind::KubernetesGatewayApiCrds,
        ]
    }

    /// Provider that owns this kind.
    pub fn provider(&self) -> CloudResourceProvider {
        match self {
            CloudResourceKind::AwsRoute53DnsRecord | CloudResourceKind::AwsS3Bucket => {
                CloudResourceProvider::Aws
            }
            CloudResourceKind::AzureDnsRecord | CloudResourceKind::AzureVirtualMachine => {
                CloudResourceProvider::Azure
            }
            CloudResourceKind::CivoDnsRecord => CloudResourceProvider::Civo,
            CloudResourceKind::CloudflareDnsRecord | CloudResourceKind::CloudflareDnsZone => {
                CloudResourceProvider::Cloudflare
            }
            CloudResourceKind::DigitalOceanDnsRecord | CloudResourceKind::DigitalOceanVpc => {
                CloudResourceProvider::DigitalOcean
            }
            CloudResourceKind::GcpComputeInstance | CloudResourceKind::GcpDnsRecord => {
                CloudResourceProvider::Gcp
            }
            CloudResourceKind::KubernetesGatewayApiCrds => CloudResourceProvider::Kubernetes,
        }
    }

    /// Expected `apiVersion` for manifests of this kind.
    pub fn api_version(&self) -> String {
        format!("{}/v1", self.provider().api_group())
    }
}

impl std::fmt::Display for CloudResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Group/version/kind header of a manifest.
///
/// Only `apiVersion` and `kind` are read; everything else in the document
/// is ignored, so detection works before the spec shape is known.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gvk {
    #[serde(rename = "apiVersion", default)]
    pub api_version: String,
    #[serde(default)]
    pub kind: String,
}

impl Gvk {
    /// Extract the header from manifest YAML.
    pub fn from_yaml(content: &str) -> ManifestResult<Self> {
        let gvk: Gvk = serde_yaml::from_str(content)?;
        if gvk.kind.is_empty() {
            return Err(ManifestError::InvalidManifest(
                "manifest has no 'kind' field".to_string(),
            ));
        }
        Ok(gvk)
    }

    /// Resolve the kind against the catalog.
    pub fn resource_kind(&self) -> ManifestResult<CloudResourceKind> {
        CloudResourceKind::from_str(&self.kind)
            .ok_or_else(|| ManifestError::UnsupportedKind(self.kind.clone()))
    }
}
