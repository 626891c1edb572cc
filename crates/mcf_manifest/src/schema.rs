//! Static schema descriptors for resource specs.
//!
//! Every spec type describes its fields as a [`MessageSchema`]. The
//! descriptors are consumed by the schema linter; they carry the same
//! defaults the spec accessors fall back to.

use serde::{Deserialize, Serialize};

/// Scalar or composite type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    String,
    Bool,
    Int32,
    Uint32,
    Double,
    Enum,
    /// A `StringValueOrRef` foreign key.
    Reference,
    Message,
    RepeatedString,
    RepeatedReference,
    RepeatedMessage,
    StringMap,
}

impl FieldType {
    pub fn is_scalar(&self) -> bool {
        matches!(
            self,
            FieldType::String
                | FieldType::Bool
                | FieldType::Int32
                | FieldType::Uint32
                | FieldType::Double
                | FieldType::Enum
        )
    }
}

/// Description of one spec field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSchema {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default)]
    pub optional: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    /// Allowed values for enum fields.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<String>,
}

impl FieldSchema {
    pub fn required(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            optional: false,
            default: None,
            values: Vec::new(),
        }
    }

    pub fn optional(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            optional: true,
            ..Self::required(name, field_type)
        }
    }

    pub fn with_default(mut self, default: impl ToString) -> Self {
        self.default = Some(default.to_string());
        self
    }

    pub fn with_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.values = values.into_iter().map(Into::into).collect();
        self
    }
}

/// Description of a spec message and the messages nested in it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MessageSchema {
    pub name: String,
    #[serde(default)]
    pub fields: Vec<FieldSchema>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub messages: Vec<MessageSchema>,
}

impl MessageSchema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            messages: Vec::new(),
        }
    }

    pub fn field(mut self, field: FieldSchema) -> Self {
        self.fields.push(field);
        self
    }

    pub fn nested(mut self, message: MessageSchema) -> Self {
        self.messages.push(message);
        self
    }

    pub fn get_field(&self, name: &str) -> Option<&FieldSchema> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Visit every field of this message and its nested messages with a
    /// dotted location such as `AzureVirtualMachineSpec.network.publicIpSku`.
    pub fn walk<F>(&self, visit: &mut F)
    where
        F: FnMut(&str, &FieldSchema),
    {
        self.walk_with_prefix(&self.name, visit);
    }

    fn walk_with_prefix<F>(&self, prefix: &str, visit: &mut F)
    where
        F: FnMut(&str, &FieldSchema),
    {
        for field in &self.fields {
            visit(&format!("{}.{}", prefix, field.name), field);
        }
        for message in &self.messages {
            message.walk_with_prefix(&format!("{}.{}", prefix, message.name), visit);
        }
    }
}
