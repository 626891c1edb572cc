//! `CloudflareDnsZone`: a zone plus the records it should hold.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::dns::DnsRecordType;
use crate::kind::CloudResourceKind;
use crate::kinds::cloudflare::dns_record::{
    effective_cloudflare_ttl, validate_cloudflare_record, AUTOMATIC_TTL,
};
use crate::manifest::ResourceSpec;
use crate::schema::{FieldSchema, FieldType, MessageSchema};
use crate::validation::ValidationResult;

static ZONE_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([a-z0-9]([-a-z0-9]*[a-z0-9])?\.)+[a-z]{2,}$").expect("valid zone name regex")
});

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloudflareDnsZoneSpec {
    #[serde(default)]
    pub zone_name: String,
    #[serde(default)]
    pub account_id: String,
    #[serde(default)]
    pub paused: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub records: Vec<CloudflareDnsZoneRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloudflareDnsZoneRecord {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub record_type: DnsRecordType,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub ttl: u32,
    #[serde(default)]
    pub proxied: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<u32>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub comment: String,
}

impl CloudflareDnsZoneRecord {
    pub fn effective_ttl(&self) -> u32 {
        effective_cloudflare_ttl(self.ttl)
    }

    /// Engine name of the record at `index` within the zone.
    pub fn resource_name(&self, index: usize) -> String {
        format!("{}-{}-{}", self.name, self.record_type, index)
    }
}

impl ResourceSpec for CloudflareDnsZoneSpec {
    const KIND: CloudResourceKind = CloudResourceKind::CloudflareDnsZone;

    fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::new();

        result.require("zoneName", &self.zone_name);
        result.check_pattern("zoneName", &self.zone_name, &ZONE_NAME, "be a lowercase domain name");
        result.require("accountId", &self.account_id);

        for (index, record) in self.records.iter().enumerate() {
            let mut record_result = ValidationResult::new();
            record_result.require("name", &record.name);
            record_result.require("value", &record.value);
            validate_cloudflare_record(
                &mut record_result,
                record.record_type,
                record.proxied,
                record.ttl,
                record.priority,
                &record.comment,
            );
            result.merge_prefixed(&format!("records[{}]", index), record_result);
        }

        if self.records.is_empty() {
            result.add_warning("zone has no records");
        }

        result
    }

    fn schema() -> MessageSchema {
        MessageSchema::new("CloudflareDnsZoneSpec")
            .field(FieldSchema::required("zoneName", FieldType::String))
            .field(FieldSchema::required("accountId", FieldType::String))
            .field(FieldSchema::optional("paused", FieldType::Bool).with_default(false))
            .field(FieldSchema::optional("records", FieldType::RepeatedMessage))
            .nested(
                MessageSchema::new("records")
                    .field(FieldSchema::required("name", FieldType::String))
                    .field(FieldSchema::required("type", FieldType::Enum).with_values(
                        DnsRecordType::all().iter().map(|t| t.as_str()),
                    ))
                    .field(FieldSchema::required("value", FieldType::String))
                    .field(FieldSchema::optional("ttl", FieldType::Uint32).with_default(AUTOMATIC_TTL))
                    .field(FieldSchema::optional("proxied", FieldType::Bool).with_default(false))
                    .field(FieldSchema::optional("priority", FieldType::Uint32))
                    .field(FieldSchema::optional("comment", FieldType::String)),
            )
    }
}
