//! `CloudflareDnsRecord`: a record in an existing Cloudflare zone.

use serde::{Deserialize, Serialize};

use crate::dns::DnsRecordType;
use crate::kind::CloudResourceKind;
use crate::manifest::ResourceSpec;
use crate::reference::StringValueOrRef;
use crate::schema::{FieldSchema, FieldType, MessageSchema};
use crate::validation::ValidationResult;

/// Cloudflare treats a TTL of 1 as "automatic".
pub const AUTOMATIC_TTL: u32 = 1;
pub const MAX_COMMENT_LENGTH: usize = 100;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloudflareDnsRecordSpec {
    #[serde(default)]
    pub zone_id: StringValueOrRef,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub record_type: DnsRecordType,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub proxied: bool,
    #[serde(default)]
    pub ttl: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<u32>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub comment: String,
}

/// TTL forwarded to Cloudflare; zero means automatic.
pub fn effective_cloudflare_ttl(ttl: u32) -> u32 {
    if ttl == 0 {
        AUTOMATIC_TTL
    } else {
        ttl
    }
}

/// Checks shared by standalone records and zone-embedded records.
pub(crate) fn validate_cloudflare_record(
    result: &mut ValidationResult,
    record_type: DnsRecordType,
    proxied: bool,
    ttl: u32,
    priority: Option<u32>,
    comment: &str,
) {
    let ttl = effective_cloudflare_ttl(ttl);
    if ttl != AUTOMATIC_TTL && !(60..=86400).contains(&ttl) {
        result.add_error("ttl", format!("must be 1 (automatic) or between 60 and 86400, got {}", ttl));
    }

    if proxied && !record_type.allows_proxied() {
        result.add_error(
            "proxied",
            format!("{} records cannot be proxied", record_type),
        );
    }

    match priority {
        Some(p) if !record_type.allows_priority() => {
            result.add_warning(format!("priority {} is ignored for {} records", p, record_type));
        }
        Some(p) => result.check_range("priority", p, 0, 65535),
        None if record_type == DnsRecordType::Mx => {
            result.add_error("priority", "is required for MX records");
        }
        None => {}
    }

    if comment.chars().count() > MAX_COMMENT_LENGTH {
        result.add_error(
            "comment",
            format!("must be at most {} characters", MAX_COMMENT_LENGTH),
        );
    }
}

impl CloudflareDnsRecordSpec {
    pub fn effective_ttl(&self) -> u32 {
        effective_cloudflare_ttl(self.ttl)
    }
}

impl ResourceSpec for CloudflareDnsRecordSpec {
    const KIND: CloudResourceKind = CloudResourceKind::CloudflareDnsRecord;

    fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::new();

        if self.zone_id.is_empty() {
            result.add_error("zoneId", "is required");
        }
        result.require("name", &self.name);
        result.require("value", &self.value);

        validate_cloudflare_record(
            &mut result,
            self.record_type,
            self.proxied,
            self.ttl,
            self.priority,
            &self.comment,
        );
        result
    }

    fn schema() -> MessageSchema {
        MessageSchema::new("CloudflareDnsRecordSpec")
            .field(FieldSchema::required("zoneId", FieldType::Reference))
            .field(FieldSchema::required("name", FieldType::String))
            .field(FieldSchema::required("type", FieldType::Enum).with_values(
                DnsRecordType::all().iter().map(|t| t.as_str()),
            ))
            .field(FieldSchema::required("value", FieldType::String))
            .field(FieldSchema::optional("proxied", FieldType::Bool).with_default(false))
            .field(FieldSchema::optional("ttl", FieldType::Uint32).with_default(AUTOMATIC_TTL))
            .field(FieldSchema::optional("priority", FieldType::Uint32))
            .field(FieldSchema::optional("comment", FieldType::String))
    }

    fn foreign_keys_mut(&mut self) -> Vec<(String, &mut StringValueOrRef)> {
        vec![("zoneId".to_string(), &mut self.zone_id)]
    }
}
