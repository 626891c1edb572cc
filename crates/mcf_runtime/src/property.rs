//! Property values passed to and returned by the engine.
//!
//! Resource properties are not known while the graph is being built, so a
//! created resource hands back [`OutputRef`]s that later resources embed in
//! their own args. The engine resolves them when it provisions.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Serialize, Serializer};

/// Deferred reference to a property of a registered resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OutputRef {
    /// URN of the resource that produces the value.
    pub urn: String,
    /// Logical name of that resource.
    pub resource: String,
    pub property: String,
}

impl fmt::Display for OutputRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${{{}.{}}}", self.resource, self.property)
    }
}

impl Serialize for OutputRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A property value: plain data, a deferred output, or a secret.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Array(Vec<PropertyValue>),
    Object(BTreeMap<String, PropertyValue>),
    Output(OutputRef),
    Secret(Box<PropertyValue>),
}

impl PropertyValue {
    pub fn secret(value: impl Into<PropertyValue>) -> Self {
        PropertyValue::Secret(Box::new(value.into()))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, PropertyValue::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PropertyValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            PropertyValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[PropertyValue]> {
        match self {
            PropertyValue::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_output(&self) -> Option<&OutputRef> {
        match self {
            PropertyValue::Output(r) => Some(r),
            _ => None,
        }
    }

    /// Field of an object value.
    pub fn get(&self, key: &str) -> Option<&PropertyValue> {
        match self {
            PropertyValue::Object(map) => map.get(key),
            _ => None,
        }
    }

    /// Every output reference nested in this value.
    pub fn output_refs(&self) -> Vec<&OutputRef> {
        let mut refs = Vec::new();
        self.collect_refs(&mut refs);
        refs
    }

    fn collect_refs<'a>(&'a self, refs: &mut Vec<&'a OutputRef>) {
        match self {
            PropertyValue::Output(r) => refs.push(r),
            PropertyValue::Array(items) => items.iter().for_each(|i| i.collect_refs(refs)),
            PropertyValue::Object(map) => map.values().for_each(|v| v.collect_refs(refs)),
            PropertyValue::Secret(inner) => inner.collect_refs(refs),
            _ => {}
        }
    }
}

impl Serialize for PropertyValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PropertyValue::Null => serializer.serialize_none(),
            PropertyValue::Bool(b) => serializer.serialize_bool(*b),
            PropertyValue::Int(i) => serializer.serialize_i64(*i),
            PropertyValue::Float(f) => serializer.serialize_f64(*f),
            PropertyValue::String(s) => serializer.serialize_str(s),
            PropertyValue::Array(items) => items.serialize(serializer),
            PropertyValue::Object(map) => map.serialize(serializer),
            PropertyValue::Output(r) => r.serialize(serializer),
            PropertyValue::Secret(_) => serializer.serialize_str("[secret]"),
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::String(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        PropertyValue::String(value)
    }
}

impl From<&String> for PropertyValue {
    fn from(value: &String) -> Self {
        PropertyValue::String(value.clone())
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        PropertyValue::Bool(value)
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        PropertyValue::Int(value)
    }
}

impl From<i32> for PropertyValue {
    fn from(value: i32) -> Self {
        PropertyValue::Int(i64::from(value))
    }
}

impl From<u32> for PropertyValue {
    fn from(value: u32) -> Self {
        PropertyValue::Int(i64::from(value))
    }
}

impl From<f64> for PropertyValue {
    fn from(value: f64) -> Self {
        PropertyValue::Float(value)
    }
}

impl From<OutputRef> for PropertyValue {
    fn from(value: OutputRef) -> Self {
        PropertyValue::Output(value)
    }
}

impl From<PropertyMap> for PropertyValue {
    fn from(value: PropertyMap) -> Self {
        PropertyValue::Object(value.0)
    }
}

impl<T: Into<PropertyValue>> From<Vec<T>> for PropertyValue {
    fn from(values: Vec<T>) -> Self {
        PropertyValue::Array(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<PropertyValue>> From<Option<T>> for PropertyValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(PropertyValue::Null)
    }
}

impl From<&BTreeMap<String, String>> for PropertyValue {
    fn from(map: &BTreeMap<String, String>) -> Self {
        PropertyValue::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), PropertyValue::String(v.clone())))
                .collect(),
        )
    }
}

impl From<serde_json::Value> for PropertyValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => PropertyValue::Null,
            serde_json::Value::Bool(b) => PropertyValue::Bool(b),
            serde_json::Value::Number(n) => n
                .as_i64()
                .map(PropertyValue::Int)
                .unwrap_or_else(|| PropertyValue::Float(n.as_f64().unwrap_or_default())),
            serde_json::Value::String(s) => PropertyValue::String(s),
            serde_json::Value::Array(items) => {
                PropertyValue::Array(items.into_iter().map(Into::into).collect())
            }
            serde_json::Value::Object(map) => {
                PropertyValue::Object(map.into_iter().map(|(k, v)| (k, v.into())).collect())
            }
        }
    }
}

/// Named resource or provider arguments.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PropertyMap(BTreeMap<String, PropertyValue>);

impl PropertyMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Set `key` only when `value` is present.
    pub fn with_opt<V: Into<PropertyValue>>(self, key: impl Into<String>, value: Option<V>) -> Self {
        match value {
            Some(v) => self.with(key, v),
            None => self,
        }
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<PropertyValue>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&PropertyValue> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &PropertyValue)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn output_refs(&self) -> Vec<&OutputRef> {
        self.0.values().flat_map(PropertyValue::output_refs).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output(resource: &str, property: &str) -> OutputRef {
        OutputRef {
            urn: format!("urn:mcf:dev::test::{}", resource),
            resource: resource.to_string(),
            property: property.to_string(),
        }
    }

    #[test]
    fn test_output_serializes_as_placeholder() {
        let json = serde_json::to_string(&PropertyValue::from(output("nic", "id"))).unwrap();
        assert_eq!(json, r#""${nic.id}""#);
    }

    #[test]
    fn test_secret_is_redacted() {
        let args = PropertyMap::new().with("token", PropertyValue::secret("dop_v1_abc"));
        let json = serde_json::to_string(&args).unwrap();
        assert_eq!(json, r#"{"token":"[secret]"}"#);
    }

    #[test]
    fn test_with_opt_skips_none() {
        let args = PropertyMap::new()
            .with("name", "www")
            .with_opt("priority", None::<u32>)
            .with_opt("weight", Some(10u32));
        assert_eq!(args.len(), 2);
        assert_eq!(args.get("weight").and_then(PropertyValue::as_i64), Some(10));
    }

    #[test]
    fn test_nested_output_refs() {
        let args = PropertyMap::new()
            .with("zone", output("zone", "id"))
            .with(
                "networkProfile",
                PropertyMap::new().with("ids", vec![PropertyValue::from(output("nic", "id"))]),
            );
        let refs: Vec<_> = args.output_refs().iter().map(|r| r.resource.clone()).collect();
        assert_eq!(refs.len(), 2);
        assert!(refs.contains(&"nic".to_string()));
    }

    #[test]
    fn test_from_json() {
        let value: PropertyValue = serde_json::json!({"a": [1, 2.5, "x", null]}).into();
        let items = value.get("a").and_then(PropertyValue::as_array).unwrap();
        assert_eq!(items[0], PropertyValue::Int(1));
        assert_eq!(items[1], PropertyValue::Float(2.5));
        assert!(items[3].is_null());
    }
}
