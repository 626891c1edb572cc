//! `AwsS3Bucket`: an S3 bucket with versioning and public-access settings.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::kind::CloudResourceKind;
use crate::manifest::ResourceSpec;
use crate::schema::{FieldSchema, FieldType, MessageSchema};
use crate::validation::ValidationResult;

static AWS_REGION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z]{2}(-gov)?-[a-z]+-\d$").expect("valid region regex"));

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AwsS3BucketSpec {
    #[serde(default)]
    pub aws_region: String,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default)]
    pub versioning_enabled: bool,
    #[serde(default)]
    pub force_destroy: bool,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub tags: BTreeMap<String, String>,
}

impl ResourceSpec for AwsS3BucketSpec {
    const KIND: CloudResourceKind = CloudResourceKind::AwsS3Bucket;

    fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::new();

        result.require("awsRegion", &self.aws_region);
        result.check_pattern("awsRegion", &self.aws_region, &AWS_REGION, "be an AWS region such as us-east-1");

        if self.is_public {
            result.add_warning("bucket will allow public access");
        }

        for key in self.tags.keys() {
            if key.starts_with("aws:") {
                result.add_error(format!("tags.{}", key), "the 'aws:' prefix is reserved");
            }
        }

        result
    }

    fn schema() -> MessageSchema {
        MessageSchema::new("AwsS3BucketSpec")
            .field(FieldSchema::required("awsRegion", FieldType::String))
            .field(FieldSchema::optional("isPublic", FieldType::Bool).with_default(false))
            .field(FieldSchema::optional("versioningEnabled", FieldType::Bool).with_default(false))
            .field(FieldSchema::optional("forceDestroy", FieldType::Bool).with_default(false))
            .field(FieldSchema::optional("tags", FieldType::StringMap))
    }
}
