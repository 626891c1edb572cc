//! `DigitalOceanVpc`: a private network in one region.

use ipnet::IpNet;
use serde::{Deserialize, Serialize};

use crate::kind::CloudResourceKind;
use crate::manifest::ResourceSpec;
use crate::schema::{FieldSchema, FieldType, MessageSchema};
use crate::validation::{parse_cidr, ValidationResult};

/// Smallest and largest prefix DigitalOcean accepts for a VPC range.
pub const MIN_PREFIX: u8 = 16;
pub const MAX_PREFIX: u8 = 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DigitalOceanRegion {
    Nyc1,
    Nyc2,
    Nyc3,
    Sfo1,
    Sfo2,
    Sfo3,
    Ams2,
    Ams3,
    Sgp1,
    Lon1,
    Fra1,
    Tor1,
    Blr1,
    Syd1,
}

impl DigitalOceanRegion {
    pub fn as_str(&self) -> &'static str {
        match self {
            DigitalOceanRegion::Nyc1 => "nyc1",
            DigitalOceanRegion::Nyc2 => "nyc2",
            DigitalOceanRegion::Nyc3 => "nyc3",
            DigitalOceanRegion::Sfo1 => "sfo1",
            DigitalOceanRegion::Sfo2 => "sfo2",
            DigitalOceanRegion::Sfo3 => "sfo3",
            DigitalOceanRegion::Ams2 => "ams2",
            DigitalOceanRegion::Ams3 => "ams3",
            DigitalOceanRegion::Sgp1 => "sgp1",
            DigitalOceanRegion::Lon1 => "lon1",
            DigitalOceanRegion::Fra1 => "fra1",
            DigitalOceanRegion::Tor1 => "tor1",
            DigitalOceanRegion::Blr1 => "blr1",
            DigitalOceanRegion::Syd1 => "syd1",
        }
    }

    pub fn all() -> Vec<Self> {
        vec![
            DigitalOceanRegion::Nyc1,
            DigitalOceanRegion::Nyc2,
            DigitalOceanRegion::Nyc3,
            DigitalOceanRegion::Sfo1,
            DigitalOceanRegion::Sfo2,
            DigitalOceanRegion::Sfo3,
            DigitalOceanRegion::Ams2,
            DigitalOceanRegion::Ams3,
            DigitalOceanRegion::Sgp1,
            DigitalOceanRegion::Lon1,
            DigitalOceanRegion::Fra1,
            DigitalOceanRegion::Tor1,
            DigitalOceanRegion::Blr1,
            DigitalOceanRegion::Syd1,
        ]
    }
}

impl std::fmt::Display for DigitalOceanRegion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DigitalOceanVpcSpec {
    pub region: DigitalOceanRegion,
    /// Left empty, DigitalOcean allocates a range.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub ip_range_cidr: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
}

impl ResourceSpec for DigitalOceanVpcSpec {
    const KIND: CloudResourceKind = CloudResourceKind::DigitalOceanVpc;

    fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::new();

        if !self.ip_range_cidr.is_empty() {
            match parse_cidr(&self.ip_range_cidr) {
                Err(reason) => result.add_error("ipRangeCidr", reason),
                Ok(IpNet::V6(_)) => result.add_error("ipRangeCidr", "must be an IPv4 range"),
                Ok(IpNet::V4(net)) => {
                    result.check_range("ipRangeCidr", net.prefix_len(), MIN_PREFIX, MAX_PREFIX)
                }
            }
        }

        if self.description.chars().count() > 255 {
            result.add_error("description", "must be at most 255 characters");
        }

        result
    }

    fn schema() -> MessageSchema {
        MessageSchema::new("DigitalOceanVpcSpec")
            .field(FieldSchema::required("region", FieldType::Enum).with_values(
                DigitalOceanRegion::all().iter().map(|r| r.as_str()),
            ))
            .field(FieldSchema::optional("ipRangeCidr", FieldType::String))
            .field(FieldSchema::optional("description", FieldType::String))
    }
}
