//! Foreign-key references between stacks.
//!
//! A [`StringValueOrRef`] either carries a literal value or points at an
//! output of another stack. Modules only ever read literals; an orchestrator
//! replaces references with the referenced output before the module runs.
//!
//! Accepted YAML shapes:
//!
//! ```yaml
//! zoneId: Z123                   # shorthand for {value: Z123}
//! zoneId: {value: Z123}
//! zoneId:
//!   valueFrom:
//!     kind: AwsRoute53Zone
//!     name: main-zone
//!     fieldPath: zone_id
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{ManifestError, ManifestResult};

/// Pointer at an output of another stack.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueFromRef {
    pub kind: String,
    pub name: String,
    /// Output key of the referenced stack.
    #[serde(alias = "field_path")]
    pub field_path: String,
}

impl ValueFromRef {
    pub fn new(kind: impl Into<String>, name: impl Into<String>, field_path: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            name: name.into(),
            field_path: field_path.into(),
        }
    }
}

impl std::fmt::Display for ValueFromRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}#{}", self.kind, self.name, self.field_path)
    }
}

/// A literal string or a reference to another stack's output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "ReferenceRepr")]
pub enum StringValueOrRef {
    Value(String),
    ValueFrom(ValueFromRef),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ReferenceRepr {
    Literal(String),
    Tagged(TaggedReference),
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
enum TaggedReference {
    Value(String),
    #[serde(alias = "value_from")]
    ValueFrom(ValueFromRef),
}

impl From<ReferenceRepr> for StringValueOrRef {
    fn from(repr: ReferenceRepr) -> Self {
        match repr {
            ReferenceRepr::Literal(value) | ReferenceRepr::Tagged(TaggedReference::Value(value)) => {
                StringValueOrRef::Value(value)
            }
            ReferenceRepr::Tagged(TaggedReference::ValueFrom(r)) => StringValueOrRef::ValueFrom(r),
        }
    }
}

impl Default for StringValueOrRef {
    fn default() -> Self {
        StringValueOrRef::Value(String::new())
    }
}

impl From<&str> for StringValueOrRef {
    fn from(value: &str) -> Self {
        StringValueOrRef::Value(value.to_string())
    }
}

impl From<String> for StringValueOrRef {
    fn from(value: String) -> Self {
        StringValueOrRef::Value(value)
    }
}

impl From<ValueFromRef> for StringValueOrRef {
    fn from(reference: ValueFromRef) -> Self {
        StringValueOrRef::ValueFrom(reference)
    }
}

impl StringValueOrRef {
    pub fn literal(value: impl Into<String>) -> Self {
        StringValueOrRef::Value(value.into())
    }

    pub fn reference(kind: impl Into<String>, name: impl Into<String>, field_path: impl Into<String>) -> Self {
        StringValueOrRef::ValueFrom(ValueFromRef::new(kind, name, field_path))
    }

    /// The literal value, or `UnresolvedReference` when this is still a ref.
    pub fn get_value(&self) -> ManifestResult<&str> {
        match self {
            StringValueOrRef::Value(value) => Ok(value),
            StringValueOrRef::ValueFrom(r) => Err(ManifestError::UnresolvedReference {
                kind: r.kind.clone(),
                name: r.name.clone(),
                output_key: r.field_path.clone(),
            }),
        }
    }

    /// The literal value, if any.
    pub fn value(&self) -> Option<&str> {
        match self {
            StringValueOrRef::Value(value) => Some(value),
            StringValueOrRef::ValueFrom(_) => None,
        }
    }

    pub fn value_from(&self) -> Option<&ValueFromRef> {
        match self {
            StringValueOrRef::Value(_) => None,
            StringValueOrRef::ValueFrom(r) => Some(r),
        }
    }

    /// True for an empty literal. References are never empty.
    pub fn is_empty(&self) -> bool {
        matches!(self, StringValueOrRef::Value(v) if v.trim().is_empty())
    }

    /// Replace a reference with the literal returned by `lookup`.
    ///
    /// Returns `true` when a substitution happened.
    pub fn resolve_with<F>(&mut self, lookup: F) -> bool
    where
        F: FnOnce(&ValueFromRef) -> Option<String>,
    {
        let resolved = match self {
            StringValueOrRef::ValueFrom(r) => lookup(r),
            StringValueOrRef::Value(_) => None,
        };
        match resolved {
            Some(value) => {
                *self = StringValueOrRef::Value(value);
                true
            }
            None => false,
        }
    }
}

/// Flatten references into their literal values, skipping empty and
/// unresolved entries.
pub fn to_string_array(values: &[StringValueOrRef]) -> Vec<String> {
    values
        .iter()
        .filter_map(|v| v.value())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    struct Holder {
        zone_id: StringValueOrRef,
    }

    #[test]
    fn test_literal_pass_through() {
        for s in ["", "Z123", "projects/p-123", "with spaces"] {
            assert_eq!(StringValueOrRef::literal(s).get_value().unwrap(), s);
        }
    }

    #[test]
    fn test_accepts_all_shapes() {
        let bare: Holder = serde_yaml::from_str("zoneId: Z123").unwrap();
        assert_eq!(bare.zone_id.get_value().unwrap(), "Z123");

        let tagged: Holder = serde_yaml::from_str("zoneId: {value: Z123}").unwrap();
        assert_eq!(tagged.zone_id, bare.zone_id);

        let reference: Holder = serde_yaml::from_str(
            "zoneId:\n  valueFrom:\n    kind: AwsRoute53Zone\n    name: main\n    fieldPath: zone_id\n",
        )
        .unwrap();
        assert_eq!(
            reference.zone_id.value_from(),
            Some(&ValueFromRef::new("AwsRoute53Zone", "main", "zone_id"))
        );
    }

    #[test]
    fn test_serializes_tagged() {
        let yaml = serde_yaml::to_string(&Holder {
            zone_id: StringValueOrRef::literal("Z1"),
        })
        .unwrap();
        assert!(yaml.contains("value: Z1"));
    }

    #[test]
    fn test_unresolved_reference_error() {
        let r = StringValueOrRef::reference("GcpProject", "main", "project_id");
        match r.get_value() {
            Err(ManifestError::UnresolvedReference { kind, name, output_key }) => {
                assert_eq!(kind, "GcpProject");
                assert_eq!(name, "main");
                assert_eq!(output_key, "project_id");
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_resolve_with() {
        let mut r = StringValueOrRef::reference("GcpProject", "main", "project_id");
        assert!(!r.resolve_with(|_| None));
        assert!(r.resolve_with(|target| Some(format!("{}-resolved", target.name))));
        assert_eq!(r.get_value().unwrap(), "main-resolved");

        let mut literal = StringValueOrRef::literal("x");
        assert!(!literal.resolve_with(|_| Some("y".into())));
    }

    #[test]
    fn test_to_string_array_skips_empty_and_refs() {
        let values = vec![
            StringValueOrRef::literal("a"),
            StringValueOrRef::literal(""),
            StringValueOrRef::reference("K", "n", "f"),
            StringValueOrRef::literal("b"),
        ];
        assert_eq!(to_string_array(&values), vec!["a", "b"]);
    }
}
