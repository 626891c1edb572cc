//! Resource metadata shared by every manifest.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::validation::ValidationResult;

/// Maximum length of `metadata.name`.
pub const MAX_NAME_LENGTH: usize = 63;

static DNS_LABEL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9]([-a-z0-9]*[a-z0-9])?$").expect("valid DNS label regex"));

/// Identity and ownership of a cloud resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloudResourceMetadata {
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub org: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub env: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: BTreeMap<String, String>,
}

impl CloudResourceMetadata {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_org(mut self, org: impl Into<String>) -> Self {
        self.org = org.into();
        self
    }

    pub fn with_env(mut self, env: impl Into<String>) -> Self {
        self.env = env.into();
        self
    }

    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }

    /// Validate the metadata block.
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::new();

        if self.name.is_empty() {
            result.add_error("metadata.name", "is required");
        } else if self.name.len() > MAX_NAME_LENGTH {
            result.add_error(
                "metadata.name",
                format!("must be at most {} characters", MAX_NAME_LENGTH),
            );
        } else if !DNS_LABEL.is_match(&self.name) {
            result.add_error(
                "metadata.name",
                "must be a DNS label (lowercase alphanumerics and '-', starting and ending alphanumeric)",
            );
        }

        if self.env.is_empty() {
            result.add_warning("metadata.env is not set; environment label will be omitted");
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_name() {
        let result = CloudResourceMetadata::new("test-vpc").with_env("dev").validate();
        assert!(result.valid);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_name_rules() {
        let long = "a".repeat(64);
        for bad in ["", "Upper", "-lead", "trail-", "under_score", long.as_str()] {
            let result = CloudResourceMetadata::new(bad).validate();
            assert!(!result.valid, "expected '{}' to be rejected", bad);
            assert_eq!(result.errors[0].field, "metadata.name");
        }
        assert!(CloudResourceMetadata::new("a").validate().valid);
        assert!(CloudResourceMetadata::new("a".repeat(63)).validate().valid);
    }

    #[test]
    fn test_optional_fields_skipped_when_empty() {
        let yaml = serde_yaml::to_string(&CloudResourceMetadata::new("x")).unwrap();
        assert_eq!(yaml.trim(), "name: x");
    }
}
