//! `GcpComputeInstance`: a Compute Engine VM.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::kind::CloudResourceKind;
use crate::manifest::ResourceSpec;
use crate::reference::StringValueOrRef;
use crate::schema::{FieldSchema, FieldType, MessageSchema};
use crate::validation::ValidationResult;

pub const DEFAULT_SERVICE_ACCOUNT_SCOPE: &str = "https://www.googleapis.com/auth/cloud-platform";
pub const DEFAULT_BOOT_DISK_TYPE: &str = "pd-balanced";
pub const MIN_BOOT_DISK_SIZE_GB: u32 = 10;

static GCP_ZONE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z]+-[a-z]+[0-9]+-[a-z]$").expect("valid zone regex"));
static GCP_LABEL_KEY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z][a-z0-9_-]{0,62}$").expect("valid label key regex"));

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GcpComputeInstanceSpec {
    #[serde(default)]
    pub project_id: StringValueOrRef,
    #[serde(default)]
    pub zone: String,
    #[serde(default)]
    pub machine_type: String,
    #[serde(default)]
    pub boot_disk: GcpBootDisk,
    #[serde(default)]
    pub network_interfaces: Vec<GcpNetworkInterface>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_account: Option<GcpServiceAccount>,
    #[serde(default)]
    pub preemptible: bool,
    #[serde(default)]
    pub spot: bool,
    #[serde(default)]
    pub deletion_protection: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_stopping_for_update: Option<bool>,
    /// Network tags.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub startup_script: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GcpBootDisk {
    #[serde(default)]
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_gb: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disk_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_delete: Option<bool>,
}

impl GcpBootDisk {
    pub fn disk_type(&self) -> &str {
        self.disk_type
            .as_deref()
            .filter(|t| !t.is_empty())
            .unwrap_or(DEFAULT_BOOT_DISK_TYPE)
    }

    pub fn auto_delete(&self) -> bool {
        self.auto_delete.unwrap_or(true)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GcpNetworkInterface {
    #[serde(default)]
    pub network: StringValueOrRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subnetwork: Option<StringValueOrRef>,
    /// One entry attaches an external IP; an empty `natIp` is ephemeral.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub access_configs: Vec<GcpAccessConfig>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alias_ip_ranges: Vec<GcpAliasIpRange>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GcpAccessConfig {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub nat_ip: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub network_tier: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GcpAliasIpRange {
    pub ip_cidr_range: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub subnetwork_range_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GcpServiceAccount {
    #[serde(default)]
    pub email: StringValueOrRef,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub scopes: Vec<String>,
}

impl GcpServiceAccount {
    pub fn effective_scopes(&self) -> Vec<String> {
        if self.scopes.is_empty() {
            vec![DEFAULT_SERVICE_ACCOUNT_SCOPE.to_string()]
        } else {
            self.scopes.clone()
        }
    }
}

impl GcpComputeInstanceSpec {
    pub fn allow_stopping_for_update(&self) -> bool {
        self.allow_stopping_for_update.unwrap_or(true)
    }
}

impl ResourceSpec for GcpComputeInstanceSpec {
    const KIND: CloudResourceKind = CloudResourceKind::GcpComputeInstance;

    fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::new();

        if self.project_id.is_empty() {
            result.add_error("projectId", "is required");
        }
        result.require("zone", &self.zone);
        result.check_pattern("zone", &self.zone, &GCP_ZONE, "be a GCP zone such as us-central1-a");
        result.require("machineType", &self.machine_type);

        result.require("bootDisk.image", &self.boot_disk.image);
        if let Some(size) = self.boot_disk.size_gb {
            if size < MIN_BOOT_DISK_SIZE_GB {
                result.add_error(
                    "bootDisk.sizeGb",
                    format!("must be at least {} GB", MIN_BOOT_DISK_SIZE_GB),
                );
            }
        }

        if self.network_interfaces.is_empty() {
            result.add_error("networkInterfaces", "at least one network interface is required");
        }
        for (i, nic) in self.network_interfaces.iter().enumerate() {
            if nic.network.is_empty() {
                result.add_error(format!("networkInterfaces[{}].network", i), "is required");
            }
            for (j, range) in nic.alias_ip_ranges.iter().enumerate() {
                result.require(
                    &format!("networkInterfaces[{}].aliasIpRanges[{}].ipCidrRange", i, j),
                    &range.ip_cidr_range,
                );
            }
        }

        if let Some(sa) = &self.service_account {
            if sa.email.is_empty() {
                result.add_error("serviceAccount.email", "is required");
            }
        }

        if self.preemptible && self.spot {
            result.add_error("spot", "cannot be combined with preemptible");
        }

        for key in self.labels.keys() {
            if !GCP_LABEL_KEY.is_match(key) {
                result.add_error(
                    format!("labels.{}", key),
                    "keys must start with a lowercase letter and contain only lowercase letters, digits, '_' or '-'",
                );
            }
        }

        if !self.startup_script.is_empty() && self.metadata.contains_key("startup-script") {
            result.add_warning("startupScript overrides metadata.startup-script");
        }

        result
    }

    fn schema() -> MessageSchema {
        MessageSchema::new("GcpComputeInstanceSpec")
            .field(FieldSchema::required("projectId", FieldType::Reference))
            .field(FieldSchema::required("zone", FieldType::String))
            .field(FieldSchema::required("machineType", FieldType::String))
            .field(FieldSchema::required("bootDisk", FieldType::Message))
            .field(FieldSchema::required("networkInterfaces", FieldType::RepeatedMessage))
            .field(FieldSchema::optional("serviceAccount", FieldType::Message))
            .field(FieldSchema::optional("preemptible", FieldType::Bool).with_default(false))
            .field(FieldSchema::optional("spot", FieldType::Bool).with_default(false))
            .field(FieldSchema::optional("deletionProtection", FieldType::Bool).with_default(false))
            .field(FieldSchema::optional("allowStoppingForUpdate", FieldType::Bool).with_default(true))
            .field(FieldSchema::optional("tags", FieldType::RepeatedString))
            .field(FieldSchema::optional("metadata", FieldType::StringMap))
            .field(FieldSchema::optional("startupScript", FieldType::String))
            .field(FieldSchema::optional("labels", FieldType::StringMap))
            .nested(
                MessageSchema::new("bootDisk")
                    .field(FieldSchema::required("image", FieldType::String))
                    .field(FieldSchema::optional("sizeGb", FieldType::Uint32))
                    .field(FieldSchema::optional("diskType", FieldType::String).with_default(DEFAULT_BOOT_DISK_TYPE))
                    .field(FieldSchema::optional("autoDelete", FieldType::Bool).with_default(true)),
            )
            .nested(
                MessageSchema::new("networkInterfaces")
                    .field(FieldSchema::required("network", FieldType::Reference))
                    .field(FieldSchema::optional("subnetwork", FieldType::Reference))
                    .field(FieldSchema::optional("accessConfigs", FieldType::RepeatedMessage))
                    .field(FieldSchema::optional("aliasIpRanges", FieldType::RepeatedMessage)),
            )
            .nested(
                MessageSchema::new("serviceAccount")
                    .field(FieldSchema::required("email", FieldType::Reference))
                    .field(FieldSchema::optional("scopes", FieldType::RepeatedString)),
            )
    }

    fn foreign_keys_mut(&mut self) -> Vec<(String, &mut StringValueOrRef)> {
        let mut keys = vec![("projectId".to_string(), &mut self.project_id)];
        for (i, nic) in self.network_interfaces.iter_mut().enumerate() {
            keys.push((format!("networkInterfaces[{}].network", i), &mut nic.network));
            if let Some(subnetwork) = nic.subnetwork.as_mut() {
                keys.push((format!("networkInterfaces[{}].subnetwork", i), subnetwork));
            }
        }
        if let Some(sa) = self.service_account.as_mut() {
            keys.push(("serviceAccount.email".to_string(), &mut sa.email));
        }
        keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instance() -> GcpComputeInstanceSpec {
        GcpComputeInstanceSpec {
            project_id: "p-123".into(),
            zone: "us-central1-a".to_string(),
            machine_type: "e2-medium".to_string(),
            boot_disk: GcpBootDisk {
                image: "debian-cloud/debian-12".to_string(),
                ..Default::default()
            },
            network_interfaces: vec![GcpNetworkInterface {
                network: "default".into(),
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_minimal_valid() {
        let spec = instance();
        assert!(spec.validate().valid);
        assert!(spec.boot_disk.auto_delete());
        assert!(spec.allow_stopping_for_update());
        assert_eq!(spec.boot_disk.disk_type(), "pd-balanced");
    }

    #[test]
    fn test_zone_format() {
        let mut spec = instance();
        spec.zone = "us-central1".to_string();
        assert_eq!(spec.validate().first_error().unwrap().field, "zone");
    }

    #[test]
    fn test_requires_network_interface() {
        let mut spec = instance();
        spec.network_interfaces.clear();
        assert!(!spec.validate().valid);
    }

    #[test]
    fn test_preemptible_and_spot_exclusive() {
        let mut spec = instance();
        spec.preemptible = true;
        spec.spot = true;
        assert!(!spec.validate().valid);
    }

    #[test]
    fn test_label_keys() {
        let mut spec = instance();
        spec.labels.insert("Team".to_string(), "infra".to_string());
        assert!(!spec.validate().valid);
    }

    #[test]
    fn test_default_scope() {
        let sa = GcpServiceAccount {
            email: "vm@p-123.iam.gserviceaccount.com".into(),
            scopes: Vec::new(),
        };
        assert_eq!(sa.effective_scopes(), vec![DEFAULT_SERVICE_ACCOUNT_SCOPE.to_string()]);
    }

    #[test]
    fn test_foreign_key_paths() {
        let mut spec = instance();
        spec.network_interfaces[0].subnetwork = Some("sub-a".into());
        let paths: Vec<String> = spec.foreign_keys_mut().into_iter().map(|(p, _)| p).collect();
        assert_eq!(
            paths,
            vec![
                "projectId",
                "networkInterfaces[0].network",
                "networkInterfaces[0].subnetwork",
            ]
        );
    }
}
