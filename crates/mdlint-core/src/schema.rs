//! Schema definitions and the frontmatter field type system

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Primitive type a frontmatter field is checked against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// Text value
    String,

    /// Integer or floating point
    Number,

    /// Whole number
    Integer,

    /// true/false
    Boolean,

    /// Sequence of strings
    Array,

    /// Untyped mapping
    Object,

    /// Calendar date (YYYY-MM-DD)
    Date,
}

impl FieldType {
    /// Map a schema type name to a field type, `None` if unrecognized
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "string" => Some(Self::String),
            "number" => Some(Self::Number),
            "integer" => Some(Self::Integer),
            "boolean" => Some(Self::Boolean),
            "array" => Some(Self::Array),
            "object" => Some(Self::Object),
            "date" => Some(Self::Date),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
            Self::Array => "array",
            Self::Object => "object",
            Self::Date => "date",
        }
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

fn default_type_name() -> String {
    "string".to_string()
}

/// A `type` that is null or not a string is treated as `string`
fn type_name_or_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    match Option::<serde_json::Value>::deserialize(deserializer)? {
        Some(serde_json::Value::String(name)) => Ok(name),
        _ => Ok(default_type_name()),
    }
}

/// Declarative spec for one field of a schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Declared type name, kept verbatim so unknown names can be reported
    #[serde(
        rename = "type",
        default = "default_type_name",
        deserialize_with = "type_name_or_string"
    )]
    pub type_name: String,

    /// Human-readable description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Allowed values, if the field is enumerated
    #[serde(rename = "enum", default, skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<serde_json::Value>>,
}

impl FieldSpec {
    /// Create a field spec of the given type
    pub fn new(field_type: FieldType) -> Self {
        Self {
            type_name: field_type.as_str().to_string(),
            description: None,
            enum_values: None,
        }
    }

    /// Restrict the field to an enumerated set of values
    pub fn with_enum(mut self, values: Vec<serde_json::Value>) -> Self {
        self.enum_values = Some(values);
        self
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Declared type, `None` if the type name is not recognized
    pub fn field_type(&self) -> Option<FieldType> {
        FieldType::from_name(&self.type_name)
    }
}

/// One named record type
///
/// `fields` is ordered by field name so that type errors are reported in a
/// stable order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaDefinition {
    /// Unique name within a catalog
    pub name: String,

    /// Human-readable description
    pub description: String,

    /// Field name -> field spec
    pub fields: BTreeMap<String, FieldSpec>,

    /// Field names that must be present
    #[serde(default)]
    pub required: Vec<String>,

    /// Frontmatter key whose value, when equal to `name`, selects this schema
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_field: Option<String>,

    /// Path segment that selects this schema when present in a document path
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subdirectory: Option<String>,
}

impl SchemaDefinition {
    /// Create a schema with no fields
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            fields: BTreeMap::new(),
            required: Vec::new(),
            category_field: None,
            subdirectory: None,
        }
    }

    /// Add an optional field
    pub fn with_field(mut self, name: impl Into<String>, spec: FieldSpec) -> Self {
        self.fields.insert(name.into(), spec);
        self
    }

    /// Add a field and mark it required
    pub fn with_required_field(mut self, name: impl Into<String>, spec: FieldSpec) -> Self {
        let name = name.into();
        self.required.push(name.clone());
        self.fields.insert(name, spec);
        self
    }

    /// Set the category discriminator field
    pub fn with_category_field(mut self, field: impl Into<String>) -> Self {
        self.category_field = Some(field.into());
        self
    }

    /// Set the selecting subdirectory
    pub fn with_subdirectory(mut self, subdirectory: impl Into<String>) -> Self {
        self.subdirectory = Some(subdirectory.into());
        self
    }

    /// Check if a field name is required
    pub fn is_required(&self, field: &str) -> bool {
        self.required.iter().any(|r| r == field)
    }

    /// Check if a field name is declared
    pub fn declares(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Subdirectory segment, ignoring empty values
    pub fn subdirectory_segment(&self) -> Option<&str> {
        self.subdirectory.as_deref().filter(|s| !s.is_empty())
    }

    /// Category field name, ignoring empty values
    pub fn category_key(&self) -> Option<&str> {
        self.category_field.as_deref().filter(|s| !s.is_empty())
    }

    /// Required names that are not declared fields
    ///
    /// These are only ever checked for presence.
    pub fn undeclared_required(&self) -> impl Iterator<Item = &str> {
        self.required
            .iter()
            .filter(|r| !self.fields.contains_key(r.as_str()))
            .map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn type_names() {
        assert_eq!(FieldType::from_name("integer"), Some(FieldType::Integer));
        assert_eq!(FieldType::from_name("date"), Some(FieldType::Date));
        assert_eq!(FieldType::from_name("uuid"), None);
        assert_eq!(FieldType::Array.to_string(), "array");
    }

    #[test]
    fn field_spec_defaults_to_string() {
        let spec: FieldSpec = serde_json::from_value(json!({"description": "Display name"})).unwrap();
        assert_eq!(spec.type_name, "string");
        assert_eq!(spec.field_type(), Some(FieldType::String));
        assert!(spec.enum_values.is_none());
    }

    #[test]
    fn null_or_non_string_type_is_string() {
        let spec: FieldSpec = serde_json::from_value(json!({"type": null})).unwrap();
        assert_eq!(spec.type_name, "string");
        assert_eq!(spec.field_type(), Some(FieldType::String));

        let spec: FieldSpec = serde_json::from_value(json!({"type": 42})).unwrap();
        assert_eq!(spec.field_type(), Some(FieldType::String));

        let spec: FieldSpec = serde_json::from_value(json!({"type": "integer"})).unwrap();
        assert_eq!(spec.field_type(), Some(FieldType::Integer));
    }

    #[test]
    fn schema_deserialization() {
        let schema: SchemaDefinition = serde_json::from_value(json!({
            "name": "Tool",
            "description": "AI tools",
            "fields": {
                "name": {"type": "string"},
                "severity": {"type": "string", "enum": ["low", "medium", "high"]}
            },
            "required": ["name"],
            "subdirectory": "tools"
        }))
        .unwrap();

        assert_eq!(schema.name, "Tool");
        assert!(schema.is_required("name"));
        assert!(!schema.is_required("severity"));
        assert_eq!(schema.subdirectory_segment(), Some("tools"));
        assert_eq!(schema.category_key(), None);
        assert_eq!(schema.fields["severity"].enum_values.as_ref().map(Vec::len), Some(3));
    }

    #[test]
    fn schema_requires_fields_and_description() {
        let missing_fields = serde_json::from_value::<SchemaDefinition>(json!({
            "name": "Tool",
            "description": "AI tools"
        }));
        assert!(missing_fields.is_err());

        let missing_description = serde_json::from_value::<SchemaDefinition>(json!({
            "name": "Tool",
            "fields": {}
        }));
        assert!(missing_description.is_err());
    }

    #[test]
    fn empty_subdirectory_is_ignored() {
        let schema = SchemaDefinition::new("Tool", "").with_subdirectory("");
        assert_eq!(schema.subdirectory_segment(), None);
    }

    #[test]
    fn undeclared_required_names() {
        let mut schema = SchemaDefinition::new("Tool", "")
            .with_required_field("name", FieldSpec::new(FieldType::String));
        schema.required.push("owner".to_string());

        assert_eq!(schema.undeclared_required().collect::<Vec<_>>(), vec!["owner"]);
    }
}
