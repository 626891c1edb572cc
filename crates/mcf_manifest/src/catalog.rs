//! Kind-erased manifests and the per-kind schema table.

use std::path::Path;

use tracing::debug;

use crate::error::{ManifestError, ManifestResult};
use crate::kind::{CloudResourceKind, Gvk};
use crate::kinds::aws::{AwsRoute53DnsRecordSpec, AwsS3BucketSpec};
use crate::kinds::azure::{AzureDnsRecordSpec, AzureVirtualMachineSpec};
use crate::kinds::civo::CivoDnsRecordSpec;
use crate::kinds::cloudflare::{CloudflareDnsRecordSpec, CloudflareDnsZoneSpec};
use crate::kinds::digitalocean::{DigitalOceanDnsRecordSpec, DigitalOceanVpcSpec};
use crate::kinds::gcp::{GcpComputeInstanceSpec, GcpDnsRecordSpec};
use crate::kinds::kubernetes::KubernetesGatewayApiCrdsSpec;
use crate::manifest::{Manifest, ResourceSpec};
use crate::metadata::CloudResourceMetadata;
use crate::reference::ValueFromRef;
use crate::schema::MessageSchema;
use crate::validation::ValidationResult;

macro_rules! any_manifest {
    ($($kind:ident => $spec:ty),+ $(,)?) => {
        /// A manifest of any catalog kind.
        #[derive(Debug, Clone)]
        pub enum AnyManifest {
            $($kind(Manifest<$spec>),)+
        }

        impl AnyManifest {
            /// Parse YAML, dispatching on its `kind`.
            pub fn from_yaml(content: &str) -> ManifestResult<Self> {
                let kind = Gvk::from_yaml(content)?.resource_kind()?;
                debug!("Detected manifest kind {}", kind);
                match kind {
                    $(CloudResourceKind::$kind => Ok(AnyManifest::$kind(Manifest::from_yaml(content)?)),)+
                }
            }

            pub fn kind(&self) -> CloudResourceKind {
                match self {
                    $(AnyManifest::$kind(_) => CloudResourceKind::$kind,)+
                }
            }

            pub fn metadata(&self) -> &CloudResourceMetadata {
                match self {
                    $(AnyManifest::$kind(m) => &m.metadata,)+
                }
            }

            pub fn validate(&self) -> ValidationResult {
                match self {
                    $(AnyManifest::$kind(m) => m.validate(),)+
                }
            }

            pub fn unresolved_references(&self) -> Vec<(String, ValueFromRef)> {
                match self {
                    $(AnyManifest::$kind(m) => m.unresolved_references(),)+
                }
            }

            pub fn to_yaml(&self) -> ManifestResult<String> {
                match self {
                    $(AnyManifest::$kind(m) => m.to_yaml(),)+
                }
            }
        }

        /// Schema descriptor of a kind's spec.
        pub fn schema_for(kind: CloudResourceKind) -> MessageSchema {
            match kind {
                $(CloudResourceKind::$kind => <$spec as ResourceSpec>::schema(),)+
            }
        }
    };
}

any_manifest! {
    AwsRoute53DnsRecord => AwsRoute53DnsRecordSpec,
    AwsS3Bucket => AwsS3BucketSpec,
    AzureDnsRecord => AzureDnsRecordSpec,
    AzureVirtualMachine => AzureVirtualMachineSpec,
    CivoDnsRecord => CivoDnsRecordSpec,
    CloudflareDnsRecord => CloudflareDnsRecordSpec,
    CloudflareDnsZone => CloudflareDnsZoneSpec,
    DigitalOceanDnsRecord => DigitalOceanDnsRecordSpec,
    DigitalOceanVpc => DigitalOceanVpcSpec,
    GcpComputeInstance => GcpComputeInstanceSpec,
    GcpDnsRecord => GcpDnsRecordSpec,
    KubernetesGatewayApiCrds => KubernetesGatewayApiCrdsSpec,
}

impl AnyManifest {
    /// Read a manifest of any kind from a YAML file.
    pub fn from_path(path: &Path) -> ManifestResult<Self> {
        if !path.exists() {
            return Err(ManifestError::NotFound(path.display().to_string()));
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }
}

/// Schemas of every kind in the catalog.
pub fn all_schemas() -> Vec<(CloudResourceKind, MessageSchema)> {
    CloudResourceKind::all()
        .into_iter()
        .map(|kind| (kind, schema_for(kind)))
        .collect()
}
