//! `GcpDnsRecord`: a record set in a Cloud DNS managed zone.

use serde::{Deserialize, Serialize};

use crate::dns::DnsRecordType;
use crate::kind::CloudResourceKind;
use crate::manifest::ResourceSpec;
use crate::reference::StringValueOrRef;
use crate::schema::{FieldSchema, FieldType, MessageSchema};
use crate::validation::ValidationResult;

pub const DEFAULT_TTL_SECONDS: u32 = 300;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GcpDnsRecordSpec {
    #[serde(default)]
    pub project_id: StringValueOrRef,
    #[serde(default)]
    pub managed_zone: StringValueOrRef,
    pub record_type: DnsRecordType,
    /// Fully-qualified name with the trailing dot, e.g. `www.example.com.`.
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub values: Vec<String>,
    #[serde(default)]
    pub ttl_seconds: u32,
}

impl GcpDnsRecordSpec {
    pub fn effective_ttl(&self) -> u32 {
        if self.ttl_seconds == 0 {
            DEFAULT_TTL_SECONDS
        } else {
            self.ttl_seconds
        }
    }
}

impl ResourceSpec for GcpDnsRecordSpec {
    const KIND: CloudResourceKind = CloudResourceKind::GcpDnsRecord;

    fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::new();

        if self.project_id.is_empty() {
            result.add_error("projectId", "is required");
        }
        if self.managed_zone.is_empty() {
            result.add_error("managedZone", "is required");
        }

        result.require("name", &self.name);
        if !self.name.is_empty() && !self.name.ends_with('.') {
            result.add_error("name", format!("must be fully qualified with a trailing dot, got '{}'", self.name));
        }

        if self.values.is_empty() {
            result.add_error("values", "at least one value is required");
        }
        if self.record_type == DnsRecordType::Cname && self.values.len() > 1 {
            result.add_error("values", "a CNAME record holds exactly one value");
        }

        if self.ttl_seconds != 0 {
            result.check_range("ttlSeconds", self.ttl_seconds, 1, 86400);
        }

        result
    }

    fn schema() -> MessageSchema {
        MessageSchema::new("GcpDnsRecordSpec")
            .field(FieldSchema::required("projectId", FieldType::Reference))
            .field(FieldSchema::required("managedZone", FieldType::Reference))
            .field(FieldSchema::required("recordType", FieldType::Enum).with_values(
                DnsRecordType::all().iter().map(|t| t.as_str()),
            ))
            .field(FieldSchema::required("name", FieldType::String))
            .field(FieldSchema::required("values", FieldType::RepeatedString))
            .field(FieldSchema::optional("ttlSeconds", FieldType::Uint32).with_default(DEFAULT_TTL_SECONDS))
    }

    fn foreign_keys_mut(&mut self) -> Vec<(String, &mut StringValueOrRef)> {
        vec![
            ("projectId".to_string(), &mut self.project_id),
            ("managedZone".to_string(), &mut self.managed_zone),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> GcpDnsRecordSpec {
        GcpDnsRecordSpec {
            project_id: "test-project-123".into(),
            managed_zone: "example-zone".into(),
            record_type: DnsRecordType::A,
            name: "www.example.com.".to_string(),
            values: vec!["192.0.2.1".to_string()],
            ttl_seconds: 0,
        }
    }

    #[test]
    fn test_valid_and_default_ttl() {
        let spec = record();
        assert!(spec.validate().valid);
        assert_eq!(spec.effective_ttl(), 300);
    }

    #[test]
    fn test_wildcard_record() {
        let mut spec = record();
        spec.name = "*.example.com.".to_string();
        assert!(spec.validate().valid);
    }

    #[test]
    fn test_missing_project() {
        let mut spec = record();
        spec.project_id = StringValueOrRef::default();
        assert_eq!(spec.validate().first_error().unwrap().field, "projectId");
    }

    #[test]
    fn test_name_must_be_fqdn() {
        let mut spec = record();
        spec.name = "www.example.com".to_string();
        assert!(!spec.validate().valid);
    }

    #[test]
    fn test_reference_counts_as_present() {
        let mut spec = record();
        spec.project_id = StringValueOrRef::reference("GcpProject", "main", "project_id");
        assert!(spec.validate().valid);
    }
}
