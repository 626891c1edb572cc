//! `DigitalOceanDnsRecord`: a record in a DigitalOcean-managed domain.

use serde::{Deserialize, Serialize};

use crate::dns::DnsRecordType;
use crate::kind::CloudResourceKind;
use crate::kinds::warn_ignored_dns_fields;
use crate::manifest::ResourceSpec;
use crate::reference::StringValueOrRef;
use crate::schema::{FieldSchema, FieldType, MessageSchema};
use crate::validation::ValidationResult;

pub const DEFAULT_TTL_SECONDS: u32 = 1800;
pub const CAA_TAGS: [&str; 3] = ["issue", "issuewild", "iodef"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DigitalOceanDnsRecordSpec {
    #[serde(default)]
    pub domain: StringValueOrRef,
    /// Record name relative to the domain; `@` for the apex.
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub record_type: DnsRecordType,
    #[serde(default)]
    pub value: StringValueOrRef,
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

impl DigitalOceanDnsRecordSpec {
    pub fn effective_ttl(&self) -> u32 {
        if self.ttl_seconds == 0 {
            DEFAULT_TTL_SECONDS
        } else {
            self.ttl_seconds
        }
    }
}

/// Fully-qualified hostname of a record.
pub fn digitalocean_hostname(name: &str, domain: &str) -> String {
    if name == "@" || name.is_empty() {
        domain.to_string()
    } else {
        format!("{}.{}", name, domain)
    }
}

impl ResourceSpec for DigitalOceanDnsRecordSpec {
    const KIND: CloudResourceKind = CloudResourceKind::DigitalOceanDnsRecord;

    fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::new();

        if self.domain.is_empty() {
            result.add_error("domain", "is required");
        }
        result.require("name", &self.name);
        if self.value.is_empty() {
            result.add_error("value", "is required");
        }

        if self.ttl_seconds != 0 {
            result.check_range("ttlSeconds", self.ttl_seconds, 30, 86400);
        }
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

        match self.record_type {
            DnsRecordType::Srv if self.port.is_none() => {
                result.add_error("port", "is required for SRV records");
            }
            DnsRecordType::Caa => match self.tag.as_deref() {
                None | Some("") => result.add_error("tag", "is required for CAA records"),
                Some(tag) if !CAA_TAGS.contains(&tag) => result.add_error(
                    "tag",
                    format!("must be one of {}, got '{}'", CAA_TAGS.join(", "), tag),
                ),
                Some(_) => {}
            },
            _ => {}
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
        MessageSchema::new("DigitalOceanDnsRecordSpec")
            .field(FieldSchema::required("domain", FieldType::Reference))
            .field(FieldSchema::required("name", FieldType::String))
            .field(FieldSchema::required("type", FieldType::Enum).with_values(
                DnsRecordType::all().iter().map(|t| t.as_str()),
            ))
            .field(FieldSchema::required("value", FieldType::Reference))
            .field(FieldSchema::optional("ttlSeconds", FieldType::Uint32).with_default(DEFAULT_TTL_SECONDS))
            .field(FieldSchema::optional("priority", FieldType::Uint32))
            .field(FieldSchema::optional("weight", FieldType::Uint32))
            .field(FieldSchema::optional("port", FieldType::Uint32))
            .field(FieldSchema::optional("flags", FieldType::Uint32))
            .field(FieldSchema::optional("tag", FieldType::String).with_values(CAA_TAGS))
    }

    fn foreign_keys_mut(&mut self) -> Vec<(String, &mut StringValueOrRef)> {
        vec![
            ("domain".to_string(), &mut self.domain),
            ("value".to_string(), &mut self.value),
        ]
    }
}
