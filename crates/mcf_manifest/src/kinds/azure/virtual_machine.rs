//! `AzureVirtualMachine`: a Linux VM with its network interface and
//! optional public IP.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::kind::CloudResourceKind;
use crate::manifest::ResourceSpec;
use crate::reference::StringValueOrRef;
use crate::schema::{FieldSchema, FieldType, MessageSchema};
use crate::validation::ValidationResult;

pub const DEFAULT_VM_SIZE: &str = "Standard_D2s_v3";
pub const DEFAULT_ADMIN_USERNAME: &str = "azureuser";
pub const DEFAULT_IMAGE_VERSION: &str = "latest";
pub const OS_DISK_STORAGE_ACCOUNT_TYPE: &str = "Premium_LRS";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AzureVirtualMachineSpec {
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub resource_group: String,
    #[serde(default)]
    pub subnet_id: StringValueOrRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vm_size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_username: Option<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub ssh_public_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_password: Option<StringValueOrRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<AzureVmImage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network: Option<AzureVmNetworkConfig>,
    /// Availability zone, "1" to "3".
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub availability_zone: String,
    #[serde(default)]
    pub enable_system_assigned_identity: bool,
    #[serde(default)]
    pub is_spot_instance: bool,
    /// Maximum hourly price for spot capacity; -1 caps at the on-demand price.
    #[serde(default)]
    pub spot_max_price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_boot_diagnostics: Option<bool>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub tags: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AzureVmImage {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub publisher: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub offer: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub sku: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub custom_image_id: String,
}

impl AzureVmImage {
    pub fn is_custom(&self) -> bool {
        !self.custom_image_id.is_empty()
    }

    pub fn is_marketplace(&self) -> bool {
        !self.publisher.is_empty() && !self.offer.is_empty() && !self.sku.is_empty()
    }

    pub fn effective_version(&self) -> &str {
        self.version
            .as_deref()
            .filter(|v| !v.is_empty())
            .unwrap_or(DEFAULT_IMAGE_VERSION)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AzureVmNetworkConfig {
    #[serde(default)]
    pub enable_public_ip: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_ip_sku: Option<PublicIpSku>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_ip_allocation: Option<PublicIpAllocation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_accelerated_networking: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_security_group_id: Option<StringValueOrRef>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PublicIpSku {
    #[default]
    Standard,
    Basic,
}

impl PublicIpSku {
    pub fn as_str(&self) -> &'static str {
        match self {
            PublicIpSku::Standard => "Standard",
            PublicIpSku::Basic => "Basic",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PublicIpAllocation {
    #[default]
    Static,
    Dynamic,
}

impl PublicIpAllocation {
    pub fn as_str(&self) -> &'static str {
        match self {
            PublicIpAllocation::Static => "Static",
            PublicIpAllocation::Dynamic => "Dynamic",
        }
    }
}

impl AzureVirtualMachineSpec {
    pub fn vm_size(&self) -> &str {
        self.vm_size
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_VM_SIZE)
    }

    pub fn admin_username(&self) -> &str {
        self.admin_username
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_ADMIN_USERNAME)
    }

    pub fn boot_diagnostics_enabled(&self) -> bool {
        self.enable_boot_diagnostics.unwrap_or(true)
    }

    pub fn public_ip_enabled(&self) -> bool {
        self.network.as_ref().map(|n| n.enable_public_ip).unwrap_or(false)
    }

    /// Max price forwarded to the billing profile, if any.
    pub fn spot_billing_max_price(&self) -> Option<f64> {
        if self.is_spot_instance && (self.spot_max_price > 0.0 || self.spot_max_price == -1.0) {
            Some(self.spot_max_price)
        } else {
            None
        }
    }
}

impl ResourceSpec for AzureVirtualMachineSpec {
    const KIND: CloudResourceKind = CloudResourceKind::AzureVirtualMachine;

    fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::new();

        result.require("region", &self.region);
        result.require("resourceGroup", &self.resource_group);
        if self.subnet_id.is_empty() {
            result.add_error("subnetId", "is required");
        }

        match &self.image {
            None => result.add_error("image", "is required"),
            Some(image) if !image.is_custom() && !image.is_marketplace() => result.add_error(
                "image",
                "either publisher, offer and sku or customImageId must be set",
            ),
            Some(image) if image.is_custom() && image.is_marketplace() => {
                result.add_warning("image.customImageId takes precedence over marketplace image fields")
            }
            Some(_) => {}
        }

        let has_password = self
            .admin_password
            .as_ref()
            .map(|p| !p.is_empty())
            .unwrap_or(false);
        if self.ssh_public_key.trim().is_empty() && !has_password {
            result.add_error("sshPublicKey", "an SSH public key or admin password is required");
        }

        if !self.availability_zone.is_empty() && !["1", "2", "3"].contains(&self.availability_zone.as_str()) {
            result.add_error(
                "availabilityZone",
                format!("must be 1, 2 or 3, got '{}'", self.availability_zone),
            );
        }

        if self.spot_max_price != 0.0 {
            if !self.is_spot_instance {
                result.add_error("spotMaxPrice", "requires isSpotInstance");
            } else if self.spot_max_price < 0.0 && self.spot_max_price != -1.0 {
                result.add_error("spotMaxPrice", "must be positive or -1");
            }
        }

        result
    }

    fn schema() -> MessageSchema {
        MessageSchema::new("AzureVirtualMachineSpec")
            .field(FieldSchema::required("region", FieldType::String))
            .field(FieldSchema::required("resourceGroup", FieldType::String))
            .field(FieldSchema::required("subnetId", FieldType::Reference))
            .field(FieldSchema::optional("vmSize", FieldType::String).with_default(DEFAULT_VM_SIZE))
            .field(FieldSchema::optional("adminUsername", FieldType::String).with_default(DEFAULT_ADMIN_USERNAME))
            .field(FieldSchema::optional("sshPublicKey", FieldType::String))
            .field(FieldSchema::optional("adminPassword", FieldType::Reference))
            .field(FieldSchema::required("image", FieldType::Message))
            .field(FieldSchema::optional("network", FieldType::Message))
            .field(FieldSchema::optional("availabilityZone", FieldType::String))
            .field(FieldSchema::optional("enableSystemAssignedIdentity", FieldType::Bool).with_default(false))
            .field(FieldSchema::optional("isSpotInstance", FieldType::Bool).with_default(false))
            .field(FieldSchema::optional("spotMaxPrice", FieldType::Double))
            .field(FieldSchema::optional("enableBootDiagnostics", FieldType::Bool).with_default(true))
            .field(FieldSchema::optional("tags", FieldType::StringMap))
            .nested(
                MessageSchema::new("image")
                    .field(FieldSchema::optional("publisher", FieldType::String))
                    .field(FieldSchema::optional("offer", FieldType::String))
                    .field(FieldSchema::optional("sku", FieldType::String))
                    .field(FieldSchema::optional("version", FieldType::String).with_default(DEFAULT_IMAGE_VERSION))
                    .field(FieldSchema::optional("customImageId", FieldType::String)),
            )
            .nested(
                MessageSchema::new("network")
                    .field(FieldSchema::optional("enablePublicIp", FieldType::Bool).with_default(false))
                    .field(
                        FieldSchema::optional("publicIpSku", FieldType::Enum)
                            .with_values(["standard", "basic"])
                            .with_default("standard"),
                    )
                    .field(
                        FieldSchema::optional("publicIpAllocation", FieldType::Enum)
                            .with_values(["static", "dynamic"])
                            .with_default("static"),
                    )
                    .field(FieldSchema::optional("enableAcceleratedNetworking", FieldType::Bool).with_default(false))
                    .field(FieldSchema::optional("networkSecurityGroupId", FieldType::Reference)),
            )
    }

    fn foreign_keys_mut(&mut self) -> Vec<(String, &mut StringValueOrRef)> {
        let mut keys = vec![("subnetId".to_string(), &mut self.subnet_id)];
        if let Some(password) = self.admin_password.as_mut() {
            keys.push(("adminPassword".to_string(), password));
        }
        if let Some(nsg) = self
            .network
            .as_mut()
            .and_then(|n| n.network_security_group_id.as_mut())
        {
            keys.push(("network.networkSecurityGroupId".to_string(), nsg));
        }
        keys
    }
}
