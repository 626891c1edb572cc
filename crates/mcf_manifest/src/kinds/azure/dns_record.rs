//! `AzureDnsRecord`: a record set in an Azure DNS zone.

use serde::{Deserialize, Serialize};

use crate::dns::DnsRecordType;
use crate::kind::CloudResourceKind;
use crate::kinds::warn_ignored_dns_fields;
use crate::manifest::ResourceSpec;
use crate::reference::StringValueOrRef;
use crate::schema::{FieldSchema, FieldType, MessageSchema};
use crate::validation::ValidationResult;

pub const DEFAULT_TTL_SECONDS: u32 = 300;
/// Preference for MX records and priority for SRV records.
pub const DEFAULT_PRIORITY: u32 = 10;
pub const DEFAULT_SRV_WEIGHT: u32 = 10;
pub const DEFAULT_SRV_PORT: u32 = 80;
pub const DEFAULT_CAA_FLAGS: u32 = 0;
pub const DEFAULT_CAA_TAG: &str = "issue";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AzureDnsRecordSpec {
    #[serde(default)]
    pub resource_group: String,
    #[serde(default)]
    pub zone_name: StringValueOrRef,
    #[serde(rename = "type")]
    pub record_type: DnsRecordType,
    /// Relative record name; `@` for the zone apex.
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub values: Vec<String>,
    #[serde(default)]
    pub ttl_seconds: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flags: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

impl AzureDnsRecordSpec {
    pub fn effective_ttl(&self) -> u32 {
        if self.ttl_seconds == 0 {
            DEFAULT_TTL_SECONDS
        } else {
            self.ttl_seconds
        }
    }

    pub fn effective_priority(&self) -> u32 {
        self.priority.unwrap_or(DEFAULT_PRIORITY)
    }

    pub fn effective_weight(&self) -> u32 {
        self.weight.unwrap_or(DEFAULT_SRV_WEIGHT)
    }

    pub fn effective_port(&self) -> u32 {
        self.port.unwrap_or(DEFAULT_SRV_PORT)
    }

    pub fn effective_flags(&self) -> u32 {
        self.flags.unwrap_or(DEFAULT_CAA_FLAGS)
    }

    pub fn effective_tag(&self) -> &str {
        self.tag.as_deref().filter(|t| !t.is_empty()).unwrap_or(DEFAULT_CAA_TAG)
    }
}

impl ResourceSpec for AzureDnsRecordSpec {
    const KIND: CloudResourceKind = CloudResourceKind::AzureDnsRecord;

    fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::new();

        result.require("resourceGroup", &self.resource_group);
        if self.zone_name.is_empty() {
            result.add_error("zoneName", "is required");
        }
        result.require("name", &self.name);

        if self.values.is_empty() {
            result.add_error("values", "at least one value is required");
        }
        if self.record_type == DnsRecordType::Cname && self.values.len() > 1 {
            result.add_error("values", "a CNAME record holds exactly one value");
        }
        if self.record_type == DnsRecordType::Soa {
            result.add_error("type", "SOA records are managed by the zone");
        }

        result.check_range("ttlSeconds", self.ttl_seconds, 0, 2_147_483_647);
        if let Some(priority) = self.priority {
            result.check_range("priority", priority, 0, 65535);
        }
        if let Some(weight) = self.weight {
            result.check_range("weight", weight, 0, 65535);
        }
        if let Some(port) = self.port {
            result.check_range("port", port, 0, 65535);
        }
        if let Some(flags) = self.flags {
            result.check_range("flags", flags, 0, 255);
        }

        warn_ignored_dns_fields(
            &mut result,
            self.record_type,
            self.priority.is_some(),
            self.weight.is_some() || self.port.is_some(),
            self.flags.is_some() || self.tag.is_some(),
        );
        result
    }

    fn schema() -> MessageSchema {
        MessageSchema::new("AzureDnsRecordSpec")
            .field(FieldSchema::required("resourceGroup", FieldType::String))
            .field(FieldSchema::required("zoneName", FieldType::Reference))
            .field(FieldSchema::required("type", FieldType::Enum).with_values(
                DnsRecordType::all().iter().map(|t| t.as_str()),
            ))
            .field(FieldSchema::required("name", FieldType::String))
            .field(FieldSchema::required("values", FieldType::RepeatedString))
            .field(FieldSchema::optional("ttlSeconds", FieldType::Uint32).with_default(DEFAULT_TTL_SECONDS))
            .field(FieldSchema::optional("priority", FieldType::Uint32).with_default(DEFAULT_PRIORITY))
            .field(FieldSchema::optional("weight", FieldType::Uint32).with_default(DEFAULT_SRV_WEIGHT))
            .field(FieldSchema::optional("port", FieldType::Uint32).with_default(DEFAULT_SRV_PORT))
            .field(FieldSchema::optional("flags", FieldType::Uint32).with_default(DEFAULT_CAA_FLAGS))
            .field(FieldSchema::optional("tag", FieldType::String).with_default(DEFAULT_CAA_TAG))
    }

    fn foreign_keys_mut(&mut self) -> Vec<(String, &mut StringValueOrRef)> {
        vec![("zoneName".to_string(), &mut self.zone_name)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(record_type: DnsRecordType, values: &[&str]) -> AzureDnsRecordSpec {
        AzureDnsRecordSpec {
            resource_group: "rg-dns".to_string(),
            zone_name: "example.com".into(),
            record_type,
            name: "www".to_string(),
            values: values.iter().map(|v| v.to_string()).collect(),
            ttl_seconds: 0,
            priority: None,
            weight: None,
            port: None,
            flags: None,
            tag: None,
        }
    }

    #[test]
    fn test_defaults() {
        let spec = record(DnsRecordType::Mx, &["mail.example.com"]);
        assert!(spec.validate().valid);
        assert_eq!(spec.effective_ttl(), 300);
        assert_eq!(spec.effective_priority(), 10);
        assert_eq!(spec.effective_tag(), "issue");
        assert_eq!(spec.effective_port(), 80);
    }

    #[test]
    fn test_cname_single_value() {
        assert!(!record(DnsRecordType::Cname, &["a.example.com", "b.example.com"]).validate().valid);
        assert!(record(DnsRecordType::Cname, &["a.example.com"]).validate().valid);
    }

    #[test]
    fn test_values_required() {
        let result = record(DnsRecordType::A, &[]).validate();
        assert_eq!(result.first_error().unwrap().field, "values");
    }

    #[test]
    fn test_priority_on_a_record_warns() {
        let mut spec = record(DnsRecordType::A, &["1.2.3.4"]);
        spec.priority = Some(5);
        let result = spec.validate();
        assert!(result.valid);
        assert_eq!(result.warnings.len(), 1);
    }
}
