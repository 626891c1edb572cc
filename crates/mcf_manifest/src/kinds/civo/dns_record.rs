//! `CivoDnsRecord`: a record in a Civo DNS domain.

use serde::{Deserialize, Serialize};

use crate::dns::DnsRecordType;
use crate::kind::CloudResourceKind;
use crate::kinds::warn_ignored_dns_fields;
use crate::manifest::ResourceSpec;
use crate::reference::StringValueOrRef;
use crate::schema::{FieldSchema, FieldType, MessageSchema};
use crate::validation::ValidationResult;

pub const DEFAULT_TTL_SECONDS: u32 = 3600;

/// Record types the Civo DNS API accepts.
pub const SUPPORTED_RECORD_TYPES: [DnsRecordType; 5] = [
    DnsRecordType::A,
    DnsRecordType::Cname,
    DnsRecordType::Mx,
    DnsRecordType::Srv,
    DnsRecordType::Txt,
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CivoDnsRecordSpec {
    #[serde(default)]
    pub zone_id: StringValueOrRef,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub record_type: DnsRecordType,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub ttl: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<u32>,
}

impl CivoDnsRecordSpec {
    pub fn effective_ttl(&self) -> u32 {
        if self.ttl == 0 {
            DEFAULT_TTL_SECONDS
        } else {
            self.ttl
        }
    }
}

impl ResourceSpec for CivoDnsRecordSpec {
    const KIND: CloudResourceKind = CloudResourceKind::CivoDnsRecord;

    fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::new();

        if self.zone_id.is_empty() {
            result.add_error("zoneId", "is required");
        }
        result.require("name", &self.name);
        result.require("value", &self.value);

        if !SUPPORTED_RECORD_TYPES.contains(&self.record_type) {
            result.add_error(
                "type",
                format!("{} records are not supported by Civo DNS", self.record_type),
            );
        }

        if let Some(priority) = self.priority {
            result.check_range("priority", priority, 0, 65535);
        }
        if self.ttl != 0 {
            result.check_range("ttl", self.ttl, 600, 86400);
        }

        warn_ignored_dns_fields(&mut result, self.record_type, self.priority.is_some(), false, false);
        result
    }

    fn schema() -> MessageSchema {
        MessageSchema::new("CivoDnsRecordSpec")
            .field(FieldSchema::required("zoneId", FieldType::Reference))
            .field(FieldSchema::required("name", FieldType::String))
            .field(FieldSchema::required("type", FieldType::Enum).with_values(
                SUPPORTED_RECORD_TYPES.iter().map(|t| t.as_str()),
            ))
            .field(FieldSchema::required("value", FieldType::String))
            .field(FieldSchema::optional("ttl", FieldType::Uint32).with_default(DEFAULT_TTL_SECONDS))
            .field(FieldSchema::optional("priority", FieldType::Uint32))
    }

    fn foreign_keys_mut(&mut self) -> Vec<(String, &mut StringValueOrRef)> {
        vec![("zoneId".to_string(), &mut self.zone_id)]
    }
}
