//! Per-document validation
//!
//! For each file: resolve a schema, extract and parse the frontmatter, then
//! check required fields, unknown fields and field types/enums. Structural
//! failures (unreadable file, no frontmatter, unparseable or non-mapping
//! frontmatter) stop with a single error; schema violations accumulate.

use crate::frontmatter::{self, FrontmatterError};
use crate::resolver::{Resolution, SchemaResolver};
use crate::rules::{ValidationRuleSet, ValidatorFactory};
use mdlint_core::{Diagnostic, DiagnosticCode, LoadError, SchemaCatalog, ValidationResult};
use std::collections::HashMap;
use std::path::Path;

/// Validates documents against a compiled catalog
///
/// Holds the catalog and its rule sets read-only, so one validator can be
/// shared across threads.
#[derive(Debug, Clone)]
pub struct DocumentValidator {
    catalog: SchemaCatalog,
    rule_sets: HashMap<String, ValidationRuleSet>,
}

impl DocumentValidator {
    /// Compile a catalog into a validator
    pub fn new(catalog: SchemaCatalog) -> Self {
        let rule_sets = ValidatorFactory::compile(&catalog);
        Self { catalog, rule_sets }
    }

    /// Load a schema file and compile it
    ///
    /// With `strict_types`, unknown field type names fail the load instead of
    /// being validated as strings.
    pub fn from_schema_file(path: &Path, strict_types: bool) -> Result<Self, LoadError> {
        let catalog = SchemaCatalog::load(path)?;
        if strict_types {
            catalog.ensure_known_types()?;
        }
        Ok(Self::new(catalog))
    }

    pub fn catalog(&self) -> &SchemaCatalog {
        &self.catalog
    }

    /// Rule set compiled for a schema
    pub fn rule_set(&self, schema_name: &str) -> Option<&ValidationRuleSet> {
        self.rule_sets.get(schema_name)
    }

    /// Validate a file on disk
    ///
    /// Returns `None` when no schema applies to the file.
    pub fn validate(&self, path: &Path) -> Option<ValidationResult> {
        match std::fs::read_to_string(path) {
            Ok(text) => self.validate_document(path, &text),
            Err(err) => {
                tracing::warn!("Error reading {}: {}", path.display(), err);
                let resolution = SchemaResolver::new(&self.catalog).resolve(path, None)?;
                Some(
                    ValidationResult::new(path, resolution.schema.name.clone()).with_diagnostic(
                        Diagnostic::new(
                            DiagnosticCode::FileReadError,
                            format!("Failed to read file: {}", err),
                        ),
                    ),
                )
            }
        }
    }

    /// Validate a document whose text has already been read
    pub fn validate_document(&self, path: &Path, text: &str) -> Option<ValidationResult> {
        let Some(resolution) = SchemaResolver::new(&self.catalog).resolve(path, Some(text)) else {
            tracing::debug!("No schema applies to {}, skipping", path.display());
            return None;
        };

        tracing::debug!(
            "{} -> schema '{}' (by {})",
            path.display(),
            resolution.schema.name,
            resolution.strategy
        );

        Some(self.check(path, resolution, text))
    }

    fn check(&self, path: &Path, resolution: Resolution<'_>, text: &str) -> ValidationResult {
        let schema = resolution.schema;
        let mut result = ValidationResult::new(path, schema.name.clone());

        let Some(block) = frontmatter::extract(text) else {
            result.push(Diagnostic::new(DiagnosticCode::NoFrontmatter, "No frontmatter found"));
            return result;
        };

        let data = match frontmatter::parse(block) {
            Ok(data) => data,
            Err(err @ FrontmatterError::Yaml(_)) => {
                result.push(Diagnostic::new(DiagnosticCode::FrontmatterParseError, err.to_string()));
                return result;
            }
            Err(err @ FrontmatterError::NotMapping) => {
                result.push(Diagnostic::new(DiagnosticCode::FrontmatterNotMapping, err.to_string()));
                return result;
            }
        };

        for field in &schema.required {
            if !data.contains_key(field.as_str()) {
                result.push(Diagnostic::missing_field(field));
            }
        }

        for key in data.keys() {
            let name = frontmatter::key_name(key);
            if !schema.declares(&name) {
                result.push(Diagnostic::unknown_field(&name));
            }
        }

        if let Some(rules) = self.rule_sets.get(&schema.name) {
            for diagnostic in rules.check(&data) {
                result.push(diagnostic);
            }
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mdlint_core::{FieldSpec, FieldType, SchemaDefinition};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn tool_validator() -> DocumentValidator {
        let catalog = SchemaCatalog::from_definitions(vec![SchemaDefinition::new("Tool", "AI tools")
            .with_required_field("name", FieldSpec::new(FieldType::String))
            .with_required_field("organization", FieldSpec::new(FieldType::String))
            .with_field(
                "severity",
                FieldSpec::new(FieldType::String).with_enum(vec![json!("low"), json!("medium"), json!("high")]),
            )])
        .unwrap();
        DocumentValidator::new(catalog)
    }

    fn validate(text: &str) -> ValidationResult {
        tool_validator()
            .validate_document(Path::new("claude.md"), text)
            .unwrap()
    }

    #[test]
    fn valid_document() {
        let result = validate("---\nname: Claude\norganization: Anthropic\nseverity: low\n---\n# Claude\n");
        assert!(result.is_valid());
        assert!(result.warnings.is_empty());
        assert_eq!(result.schema_name.as_deref(), Some("Tool"));
    }

    #[test]
    fn missing_frontmatter_is_a_single_error() {
        let result = validate("# Claude\n\nNo metadata here.\n");
        assert_eq!(result.error_messages(), vec!["No frontmatter found"]);
        assert_eq!(result.errors[0].code, DiagnosticCode::NoFrontmatter);
        assert!(!result.is_valid());
    }

    #[test]
    fn yaml_error_stops_checks() {
        let result = validate("---\nname: [unclosed\n---\n");
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].code, DiagnosticCode::FrontmatterParseError);
        assert!(result.errors[0].message.starts_with("YAML parsing error:"));
    }

    #[test]
    fn non_mapping_stops_checks() {
        let result = validate("---\n- name\n- organization\n---\n");
        assert_eq!(result.error_messages(), vec!["Frontmatter is not a valid YAML object"]);
    }

    #[test]
    fn missing_required_fields_are_reported_independently() {
        let result = validate("---\nseverity: low\n---\n");
        assert_eq!(
            result.error_messages(),
            vec!["Missing required field: 'name'", "Missing required field: 'organization'"]
        );
    }

    #[test]
    fn unknown_fields_warn_without_invalidating() {
        let result = validate("---\nname: Claude\norganization: Anthropic\nwebsite: claude.ai\n---\n");
        assert!(result.is_valid());
        assert_eq!(result.warning_messages(), vec!["Unknown field: 'website'"]);
    }

    #[test]
    fn errors_and_warnings_accumulate_together() {
        let result = validate("---\norganization: 7\nseverity: extreme\nextra: true\n---\n");
        assert_eq!(
            result.error_messages(),
            vec![
                "Missing required field: 'name'",
                "Field 'organization': Input should be a valid string",
                "Field 'severity': Value 'extreme' is not one of the allowed values: low, medium, high",
            ]
        );
        assert_eq!(result.warning_messages(), vec!["Unknown field: 'extra'"]);
    }

    #[test]
    fn no_schema_means_no_result() {
        let catalog = SchemaCatalog::from_definitions(vec![
            SchemaDefinition::new("Tool", "").with_subdirectory("tools"),
            SchemaDefinition::new("Policy", "").with_subdirectory("policies"),
        ])
        .unwrap();
        let validator = DocumentValidator::new(catalog);

        assert!(validator
            .validate_document(Path::new("notes/x.md"), "---\na: 1\n---\n")
            .is_none());
    }

    #[test]
    fn validation_is_idempotent() {
        let validator = tool_validator();
        let text = "---\norganization: Anthropic\n---\n";
        let first = validator.validate_document(Path::new("claude.md"), text);
        let second = validator.validate_document(Path::new("claude.md"), text);
        assert_eq!(first, second);
    }

    #[test]
    fn unreadable_file_is_scoped_to_that_file() {
        let dir = tempfile::tempdir().unwrap();
        let validator = tool_validator();

        let result = validator.validate(&dir.path().join("missing.md")).unwrap();
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].code, DiagnosticCode::FileReadError);
    }

    #[test]
    fn strict_types_rejects_unknown_type_names() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schema.json");
        std::fs::write(
            &path,
            r#"{"schemas": [{"name": "Tool", "description": "", "fields": {"id": {"type": "uuid"}}}]}"#,
        )
        .unwrap();

        assert!(DocumentValidator::from_schema_file(&path, false).is_ok());
        assert!(matches!(
            DocumentValidator::from_schema_file(&path, true),
            Err(LoadError::UnknownFieldType { .. })
        ));
    }
}
