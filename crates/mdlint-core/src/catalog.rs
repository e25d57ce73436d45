//! Schema catalog loading
//!
//! Parses a schema source (`{"schemas": [...]}`) into an ordered, name-indexed
//! set of [`SchemaDefinition`]s. Source order is preserved and is the order
//! used for first-match schema resolution.

use crate::schema::SchemaDefinition;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// On-disk shape of a schema source
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SchemaSource {
    schemas: Vec<SchemaDefinition>,
}

/// Format of a schema source document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Json,
    Yaml,
}

impl SourceFormat {
    /// Pick a format from a file extension (`.yaml`/`.yml` -> YAML, anything else JSON)
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                Self::Yaml
            }
            _ => Self::Json,
        }
    }
}

/// The full set of schema definitions loaded for a run
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaCatalog {
    /// Definitions in source order
    schemas: Vec<SchemaDefinition>,

    /// Name -> position in `schemas`
    index: HashMap<String, usize>,

    /// Where the catalog was loaded from
    source: Option<PathBuf>,
}

impl SchemaCatalog {
    /// Load a catalog from a schema file
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let contents = std::fs::read_to_string(path).map_err(|e| LoadError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        let source = match SourceFormat::from_path(path) {
            SourceFormat::Json => serde_json::from_str::<SchemaSource>(&contents)
                .map_err(|e| e.to_string()),
            SourceFormat::Yaml => serde_yaml::from_str::<SchemaSource>(&contents)
                .map_err(|e| e.to_string()),
        }
        .map_err(|message| LoadError::Parse {
            path: path.display().to_string(),
            message,
        })?;

        let mut catalog = Self::from_definitions(source.schemas).map_err(|e| match e {
            LoadError::Empty { .. } => LoadError::Empty {
                path: path.display().to_string(),
            },
            other => other,
        })?;
        catalog.source = Some(path.to_path_buf());

        tracing::info!(
            "Loaded {} schema definitions from {}",
            catalog.len(),
            path.display()
        );

        Ok(catalog)
    }

    /// Parse a catalog from a JSON string
    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        let source: SchemaSource = serde_json::from_str(json).map_err(|e| LoadError::Parse {
            path: "<inline>".to_string(),
            message: e.to_string(),
        })?;
        Self::from_definitions(source.schemas)
    }

    /// Parse a catalog from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self, LoadError> {
        let source: SchemaSource = serde_yaml::from_str(yaml).map_err(|e| LoadError::Parse {
            path: "<inline>".to_string(),
            message: e.to_string(),
        })?;
        Self::from_definitions(source.schemas)
    }

    /// Build a catalog from definitions, keeping their order
    pub fn from_definitions(definitions: Vec<SchemaDefinition>) -> Result<Self, LoadError> {
        if definitions.is_empty() {
            return Err(LoadError::Empty {
                path: "<inline>".to_string(),
            });
        }

        let mut index = HashMap::with_capacity(definitions.len());
        for (position, schema) in definitions.iter().enumerate() {
            if index.insert(schema.name.clone(), position).is_some() {
                return Err(LoadError::DuplicateSchema(schema.name.clone()));
            }

            for name in schema.undeclared_required() {
                tracing::debug!(
                    schema = %schema.name,
                    field = name,
                    "required field is not declared in fields; only presence is checked"
                );
            }
        }

        Ok(Self {
            schemas: definitions,
            index,
            source: None,
        })
    }

    /// Reject any field whose type name is not recognized
    pub fn ensure_known_types(&self) -> Result<(), LoadError> {
        for schema in &self.schemas {
            for (field, spec) in &schema.fields {
                if spec.field_type().is_none() {
                    return Err(LoadError::UnknownFieldType {
                        schema: schema.name.clone(),
                        field: field.clone(),
                        type_name: spec.type_name.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Get a schema by name
    pub fn get(&self, name: &str) -> Option<&SchemaDefinition> {
        self.index.get(name).map(|&i| &self.schemas[i])
    }

    /// All schemas in source order
    pub fn iter(&self) -> impl Iterator<Item = &SchemaDefinition> {
        self.schemas.iter()
    }

    /// Schema names in source order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.schemas.iter().map(|s| s.name.as_str())
    }

    /// The single schema, if the catalog holds exactly one
    pub fn sole(&self) -> Option<&SchemaDefinition> {
        match self.schemas.as_slice() {
            [only] => Some(only),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Path the catalog was loaded from, if loaded from a file
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }
}

/// Schema catalog load errors
///
/// All of these are fatal to a run; no partial catalog is ever used.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Failed to read schema file {path}: {message}")]
    Io { path: String, message: String },

    #[error("Invalid schema file {path}: {message}")]
    Parse { path: String, message: String },

    #[error("Schema file {path} defines no schemas")]
    Empty { path: String },

    #[error("Duplicate schema name: '{0}'")]
    DuplicateSchema(String),

    #[error("Schema '{schema}' field '{field}' has unknown type '{type_name}'")]
    UnknownFieldType {
        schema: String,
        field: String,
        type_name: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const TWO_SCHEMAS: &str = r#"{
        "schemas": [
            {
                "name": "Tool",
                "description": "AI tools",
                "fields": {"name": {"type": "string"}},
                "required": ["name"],
                "subdirectory": "tools"
            },
            {
                "name": "Policy",
                "description": "Usage policies",
                "fields": {"title": {"type": "string"}},
                "subdirectory": "policies"
            }
        ]
    }"#;

    #[test]
    fn load_from_json_keeps_source_order() {
        let catalog = SchemaCatalog::from_json(TWO_SCHEMAS).unwrap();

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.names().collect::<Vec<_>>(), vec!["Tool", "Policy"]);
        assert_eq!(catalog.get("Policy").unwrap().description, "Usage policies");
        assert!(catalog.get("Missing").is_none());
        assert!(catalog.sole().is_none());
    }

    #[test]
    fn load_from_yaml() {
        let yaml = r#"
schemas:
  - name: Tool
    description: AI tools
    fields:
      name:
        type: string
    required: [name]
"#;
        let catalog = SchemaCatalog::from_yaml(yaml).unwrap();
        assert_eq!(catalog.sole().map(|s| s.name.as_str()), Some("Tool"));
    }

    #[test]
    fn malformed_source_is_a_parse_error() {
        assert!(matches!(
            SchemaCatalog::from_json("{not json"),
            Err(LoadError::Parse { .. })
        ));

        // Missing `fields`
        let result = SchemaCatalog::from_json(
            r#"{"schemas": [{"name": "Tool", "description": "x"}]}"#,
        );
        assert!(matches!(result, Err(LoadError::Parse { .. })));
    }

    #[test]
    fn empty_catalog_is_rejected() {
        assert!(matches!(
            SchemaCatalog::from_json(r#"{"schemas": []}"#),
            Err(LoadError::Empty { .. })
        ));
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let json = r#"{"schemas": [
            {"name": "Tool", "description": "a", "fields": {}},
            {"name": "Tool", "description": "b", "fields": {}}
        ]}"#;

        match SchemaCatalog::from_json(json) {
            Err(LoadError::DuplicateSchema(name)) => assert_eq!(name, "Tool"),
            other => panic!("expected duplicate error, got {:?}", other),
        }
    }

    #[test]
    fn unknown_types_only_fail_when_checked() {
        let json = r#"{"schemas": [
            {"name": "Tool", "description": "a", "fields": {"id": {"type": "uuid"}}}
        ]}"#;

        let catalog = SchemaCatalog::from_json(json).unwrap();
        assert!(matches!(
            catalog.ensure_known_types(),
            Err(LoadError::UnknownFieldType { ref type_name, .. }) if type_name == "uuid"
        ));
    }

    #[test]
    fn null_field_type_loads_as_string() {
        let json = r#"{"schemas": [
            {"name": "Tool", "description": "a", "fields": {"name": {"type": null}}}
        ]}"#;

        let catalog = SchemaCatalog::from_json(json).unwrap();
        let spec = &catalog.get("Tool").unwrap().fields["name"];
        assert_eq!(spec.field_type(), Some(crate::FieldType::String));
        assert!(catalog.ensure_known_types().is_ok());

        let yaml = "schemas:\n  - name: Tool\n    description: a\n    fields:\n      name:\n        type: ~\n";
        let catalog = SchemaCatalog::from_yaml(yaml).unwrap();
        assert_eq!(catalog.get("Tool").unwrap().fields["name"].type_name, "string");
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schema.json");
        std::fs::write(&path, TWO_SCHEMAS).unwrap();

        let catalog = SchemaCatalog::load(&path).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.source(), Some(path.as_path()));

        let missing = SchemaCatalog::load(&dir.path().join("nope.json"));
        assert!(matches!(missing, Err(LoadError::Io { .. })));
    }

    #[test]
    fn source_format_from_extension() {
        assert_eq!(SourceFormat::from_path(Path::new("s.yml")), SourceFormat::Yaml);
        assert_eq!(SourceFormat::from_path(Path::new("s.YAML")), SourceFormat::Yaml);
        assert_eq!(SourceFormat::from_path(Path::new("s.json")), SourceFormat::Json);
        assert_eq!(SourceFormat::from_path(Path::new("schema")), SourceFormat::Json);
    }
}
