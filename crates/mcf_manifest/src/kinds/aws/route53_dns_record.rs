//! `AwsRoute53DnsRecord`: a single Route53 record set.

use serde::{Deserialize, Serialize};

use crate::dns::DnsRecordType;
use crate::kind::CloudResourceKind;
use crate::manifest::ResourceSpec;
use crate::reference::StringValueOrRef;
use crate::schema::{FieldSchema, FieldType, MessageSchema};
use crate::validation::ValidationResult;

/// TTL applied to basic records when the spec leaves it at zero.
pub const DEFAULT_TTL_SECONDS: u32 = 300;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AwsRoute53DnsRecordSpec {
    #[serde(default)]
    pub hosted_zone_id: StringValueOrRef,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub record_type: DnsRecordType,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<String>,
    #[serde(default)]
    pub ttl: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias_target: Option<Route53AliasTarget>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub set_identifier: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub health_check_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub routing_policy: Option<Route53RoutingPolicy>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Route53AliasTarget {
    #[serde(default)]
    pub dns_name: String,
    #[serde(default)]
    pub hosted_zone_id: String,
    #[serde(default)]
    pub evaluate_target_health: bool,
}

/// How Route53 chooses among records that share a name and type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Route53RoutingPolicy {
    Simple(SimpleRoutingPolicy),
    Weighted(WeightedRoutingPolicy),
    Latency(LatencyRoutingPolicy),
    Failover(FailoverRoutingPolicy),
    Geolocation(GeolocationRoutingPolicy),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimpleRoutingPolicy {}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedRoutingPolicy {
    pub weight: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatencyRoutingPolicy {
    #[serde(default)]
    pub region: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FailoverRoutingPolicy {
    pub failover_type: FailoverType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FailoverType {
    Primary,
    Secondary,
}

impl FailoverType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailoverType::Primary => "PRIMARY",
            FailoverType::Secondary => "SECONDARY",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeolocationRoutingPolicy {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub continent: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub country: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub subdivision: String,
}

impl Route53RoutingPolicy {
    pub fn name(&self) -> &'static str {
        match self {
            Route53RoutingPolicy::Simple(_) => "simple",
            Route53RoutingPolicy::Weighted(_) => "weighted",
            Route53RoutingPolicy::Latency(_) => "latency",
            Route53RoutingPolicy::Failover(_) => "failover",
            Route53RoutingPolicy::Geolocation(_) => "geolocation",
        }
    }

    pub fn is_simple(&self) -> bool {
        matches!(self, Route53RoutingPolicy::Simple(_))
    }
}

impl AwsRoute53DnsRecordSpec {
    /// Alias records point at another AWS resource instead of carrying values.
    pub fn is_alias(&self) -> bool {
        self.alias_target
            .as_ref()
            .map(|a| !a.dns_name.is_empty())
            .unwrap_or(false)
    }

    /// TTL forwarded for basic records.
    pub fn effective_ttl(&self) -> u32 {
        if self.ttl == 0 {
            DEFAULT_TTL_SECONDS
        } else {
            self.ttl
        }
    }

    /// The routing policy in effect; an absent policy is simple routing.
    pub fn effective_routing_policy(&self) -> Route53RoutingPolicy {
        self.routing_policy
            .clone()
            .unwrap_or(Route53RoutingPolicy::Simple(SimpleRoutingPolicy {}))
    }
}

impl ResourceSpec for AwsRoute53DnsRecordSpec {
    const KIND: CloudResourceKind = CloudResourceKind::AwsRoute53DnsRecord;

    fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::new();

        if self.hosted_zone_id.is_empty() {
            result.add_error("hostedZoneId", "is required");
        }
        result.require("name", &self.name);

        if let Some(alias) = self.alias_target.as_ref().filter(|_| self.is_alias()) {
            result.require("aliasTarget.hostedZoneId", &alias.hosted_zone_id);
            if !self.values.is_empty() {
                result.add_warning("values are ignored for alias records");
            }
            if self.ttl != 0 {
                result.add_warning("ttl is ignored for alias records");
            }
        } else if self.values.is_empty() {
            result.add_error("values", "at least one value is required for non-alias records");
        }

        let policy = self.effective_routing_policy();
        if policy.is_simple() {
            if !self.set_identifier.is_empty() {
                result.add_error("setIdentifier", "must be empty for simple routing");
            }
        } else if self.set_identifier.is_empty() {
            result.add_error(
                "setIdentifier",
                format!("is required for {} routing", policy.name()),
            );
        }

        match &policy {
            Route53RoutingPolicy::Weighted(w) => {
                result.check_range("routingPolicy.weighted.weight", w.weight, 0, 255);
            }
            Route53RoutingPolicy::Latency(l) => {
                result.require("routingPolicy.latency.region", &l.region);
            }
            Route53RoutingPolicy::Geolocation(g) => {
                if g.continent.is_empty() && g.country.is_empty() && g.subdivision.is_empty() {
                    result.add_error(
                        "routingPolicy.geolocation",
                        "one of continent, country or subdivision is required",
                    );
                }
            }
            Route53RoutingPolicy::Simple(_) | Route53RoutingPolicy::Failover(_) => {}
        }

        result
    }

    fn schema() -> MessageSchema {
        MessageSchema::new("AwsRoute53DnsRecordSpec")
            .field(FieldSchema::required("hostedZoneId", FieldType::Reference))
            .field(FieldSchema::required("name", FieldType::String))
            .field(FieldSchema::required("type", FieldType::Enum).with_values(
                DnsRecordType::all().iter().map(|t| t.as_str()),
            ))
            .field(FieldSchema::optional("values", FieldType::RepeatedString))
            .field(FieldSchema::optional("ttl", FieldType::Uint32).with_default(DEFAULT_TTL_SECONDS))
            .field(FieldSchema::optional("aliasTarget", FieldType::Message))
            .field(FieldSchema::optional("setIdentifier", FieldType::String))
            .field(FieldSchema::optional("healthCheckId", FieldType::String))
            .field(FieldSchema::optional("routingPolicy", FieldType::Message))
            .nested(
                MessageSchema::new("aliasTarget")
                    .field(FieldSchema::required("dnsName", FieldType::String))
                    .field(FieldSchema::required("hostedZoneId", FieldType::String))
                    .field(FieldSchema::optional("evaluateTargetHealth", FieldType::Bool).with_default(false)),
            )
            .nested(
                MessageSchema::new("routingPolicy")
                    .field(FieldSchema::optional("simple", FieldType::Message))
                    .field(FieldSchema::optional("weighted", FieldType::Message))
                    .field(FieldSchema::optional("latency", FieldType::Message))
                    .field(FieldSchema::optional("failover", FieldType::Message))
                    .field(FieldSchema::optional("geolocation", FieldType::Message)),
            )
    }

    fn foreign_keys_mut(&mut self) -> Vec<(String, &mut StringValueOrRef)> {
        vec![("hostedZoneId".to_string(), &mut self.hosted_zone_id)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn basic() -> AwsRoute53DnsRecordSpec {
        AwsRoute53DnsRecordSpec {
            hosted_zone_id: "Z123".into(),
            name: "api.example.com".to_string(),
            record_type: DnsRecordType::A,
            values: vec!["1.2.3.4".to_string()],
            ttl: 0,
            alias_target: None,
            set_identifier: String::new(),
            health_check_id: String::new(),
            routing_policy: None,
        }
    }

    #[test]
    fn test_basic_record_valid() {
        let spec = basic();
        assert!(spec.validate().valid);
        assert_eq!(spec.effective_ttl(), 300);
        assert!(!spec.is_alias());
    }

    #[test]
    fn test_simple_routing_rejects_set_identifier() {
        let mut spec = basic();
        spec.set_identifier = "blue".to_string();
        let result = spec.validate();
        assert_eq!(result.first_error().unwrap().field, "setIdentifier");
    }

    #[test]
    fn test_non_simple_routing_requires_set_identifier() {
        let policies = vec![
            Route53RoutingPolicy::Weighted(WeightedRoutingPolicy { weight: 40 }),
            Route53RoutingPolicy::Latency(LatencyRoutingPolicy {
                region: "us-east-1".to_string(),
            }),
            Route53RoutingPolicy::Failover(FailoverRoutingPolicy {
                failover_type: FailoverType::Primary,
            }),
            Route53RoutingPolicy::Geolocation(GeolocationRoutingPolicy {
                country: "US".to_string(),
                ..Default::default()
            }),
        ];

        for policy in policies {
            let mut spec = basic();
            spec.routing_policy = Some(policy.clone());
            assert!(!spec.validate().valid, "{} without identifier", policy.name());

            spec.set_identifier = "blue".to_string();
            assert!(spec.validate().valid, "{} with identifier", policy.name());
        }
    }

    #[test]
    fn test_weight_range() {
        let mut spec = basic();
        spec.set_identifier = "blue".to_string();
        spec.routing_policy = Some(Route53RoutingPolicy::Weighted(WeightedRoutingPolicy { weight: 256 }));
        let result = spec.validate();
        assert_eq!(result.first_error().unwrap().field, "routingPolicy.weighted.weight");
    }

    #[test]
    fn test_geolocation_needs_a_location() {
        let mut spec = basic();
        spec.set_identifier = "eu".to_string();
        spec.routing_policy = Some(Route53RoutingPolicy::Geolocation(GeolocationRoutingPolicy::default()));
        assert!(!spec.validate().valid);
    }

    #[test]
    fn test_alias_record_needs_no_values() {
        let mut spec = basic();
        spec.values.clear();
        spec.alias_target = Some(Route53AliasTarget {
            dns_name: "d111.cloudfront.net".to_string(),
            hosted_zone_id: "Z2FDTNDATAQYW2".to_string(),
            evaluate_target_health: false,
        });
        assert!(spec.is_alias());
        assert!(spec.validate().valid);
    }

    #[test]
    fn test_empty_alias_target_is_basic() {
        let mut spec = basic();
        spec.alias_target = Some(Route53AliasTarget::default());
        assert!(!spec.is_alias());
    }

    #[test]
    fn test_parse_routing_policy_yaml() {
        let yaml = r#"
hostedZoneId: Z123
name: api.example.com
type: A
values: ["1.2.3.4"]
setIdentifier: primary
routingPolicy:
  failover:
    failoverType: PRIMARY
"#;
        let spec: AwsRoute53DnsRecordSpec = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(
            spec.routing_policy,
            Some(Route53RoutingPolicy::Failover(FailoverRoutingPolicy {
                failover_type: FailoverType::Primary
            }))
        );
        assert!(spec.validate().valid);
    }
}
