//! Lint rules over schema fields.

use mcf_manifest::{FieldSchema, FieldType};
use serde::Serialize;

use crate::error::LintError;

/// Signature of a rule check: a message when the field breaks the rule.
pub type RuleCheck = fn(&FieldSchema) -> Option<String>;

/// A lint rule.
#[derive(Debug, Clone, Copy)]
pub struct RuleSpec {
    pub id: &'static str,
    pub purpose: &'static str,
    pub check: RuleCheck,
}

impl RuleSpec {
    pub const fn new(id: &'static str, purpose: &'static str, check: RuleCheck) -> Self {
        Self { id, purpose, check }
    }

    /// Run the check against one field.
    pub fn apply(&self, location: &str, field: &FieldSchema) -> Option<LintViolation> {
        (self.check)(field).map(|message| LintViolation {
            rule_id: self.id.to_string(),
            location: location.to_string(),
            message,
        })
    }
}

/// A field that broke a rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LintViolation {
    pub rule_id: String,
    /// Dotted path such as `AzureVirtualMachineSpec.network.publicIpSku`.
    pub location: String,
    pub message: String,
}

impl LintViolation {
    pub fn into_error(self) -> LintError {
        LintError::SchemaLintFailed {
            rule: self.rule_id,
            location: self.location,
            message: self.message,
        }
    }
}

impl std::fmt::Display for LintViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}: {}", self.rule_id, self.location, self.message)
    }
}

pub const DEFAULT_REQUIRES_OPTIONAL: RuleSpec = RuleSpec::new(
    "default-requires-optional",
    "A field that declares a default must be optional",
    default_requires_optional,
);

pub const DEFAULT_MATCHES_TYPE: RuleSpec = RuleSpec::new(
    "default-matches-type",
    "A default must parse as the field's scalar type",
    default_matches_type,
);

/// Rules every lint run starts with.
pub fn builtin_rules() -> Vec<RuleSpec> {
    vec![DEFAULT_REQUIRES_OPTIONAL, DEFAULT_MATCHES_TYPE]
}

fn default_requires_optional(field: &FieldSchema) -> Option<String> {
    match &field.default {
        Some(default) if !field.optional => Some(format!(
            "declares default '{}' but is not optional",
            default
        )),
        _ => None,
    }
}

fn default_matches_type(field: &FieldSchema) -> Option<String> {
    let default = field.default.as_deref()?;
    let parses = match field.field_type {
        FieldType::String | FieldType::Reference => true,
        FieldType::Bool => matches!(default, "true" | "false"),
        FieldType::Int32 => default.parse::<i32>().is_ok(),
        FieldType::Uint32 => default.parse::<u32>().is_ok(),
        FieldType::Double => default.parse::<f64>().is_ok(),
        FieldType::Enum if field.values.is_empty() => true,
        FieldType::Enum => field.values.iter().any(|v| v == default),
        FieldType::Message
        | FieldType::RepeatedString
        | FieldType::RepeatedReference
        | FieldType::RepeatedMessage
        | FieldType::StringMap => {
            return Some(format!("{:?} fields cannot declare a default", field.field_type));
        }
    };

    if parses {
        None
    } else if field.field_type == FieldType::Enum {
        Some(format!(
            "default '{}' is not one of: {}",
            default,
            field.values.join(", ")
        ))
    } else {
        Some(format!("default '{}' is not a valid {:?}", default, field.field_type))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_on_required_field() {
        let field = FieldSchema::required("ttl", FieldType::Uint32).with_default(300);
        let violation = DEFAULT_REQUIRES_OPTIONAL.apply("Spec.ttl", &field).unwrap();
        assert_eq!(violation.rule_id, "default-requires-optional");
        assert_eq!(violation.location, "Spec.ttl");

        let field = FieldSchema::optional("ttl", FieldType::Uint32).with_default(300);
        assert!(DEFAULT_REQUIRES_OPTIONAL.apply("Spec.ttl", &field).is_none());
    }

    #[test]
    fn test_default_type_mismatch() {
        let cases = [
            (FieldSchema::optional("ttl", FieldType::Uint32).with_default("-1"), false),
            (FieldSchema::optional("ttl", FieldType::Uint32).with_default("60"), true),
            (FieldSchema::optional("paused", FieldType::Bool).with_default("yes"), false),
            (FieldSchema::optional("price", FieldType::Double).with_default("0.5"), true),
            (
                FieldSchema::optional("sku", FieldType::Enum)
                    .with_values(["standard", "basic"])
                    .with_default("premium"),
                false,
            ),
            (FieldSchema::optional("tags", FieldType::StringMap).with_default("a=b"), false),
        ];
        for (field, ok) in cases {
            assert_eq!(
                DEFAULT_MATCHES_TYPE.apply("Spec.f", &field).is_none(),
                ok,
                "field {:?}",
                field
            );
        }
    }

    #[test]
    fn test_violation_into_error() {
        let field = FieldSchema::required("ttl", FieldType::Uint32).with_default(300);
        let err = DEFAULT_REQUIRES_OPTIONAL
            .apply("Spec.ttl", &field)
            .unwrap()
            .into_error();
        assert!(matches!(err, LintError::SchemaLintFailed { ref rule, .. } if rule == "default-requires-optional"));
    }
}
