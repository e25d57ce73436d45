//! Per-document validation outcome

use crate::diagnostic::Diagnostic;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Outcome of validating one document
///
/// `is_valid()` holds exactly when `errors` is empty; warnings never affect it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// Path of the validated document
    pub file_path: PathBuf,

    /// Schema that was applied
    pub schema_name: Option<String>,

    /// Errors in the order they were found
    pub errors: Vec<Diagnostic>,

    /// Warnings in the order they were found
    pub warnings: Vec<Diagnostic>,
}

impl ValidationResult {
    /// Create an empty (valid) result for a file checked against a schema
    pub fn new(file_path: impl Into<PathBuf>, schema_name: impl Into<String>) -> Self {
        Self {
            file_path: file_path.into(),
            schema_name: Some(schema_name.into()),
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Record a diagnostic under errors or warnings by its severity
    pub fn push(&mut self, diagnostic: Diagnostic) {
        if diagnostic.is_error() {
            self.errors.push(diagnostic);
        } else {
            self.warnings.push(diagnostic);
        }
    }

    /// Add a diagnostic (builder style)
    pub fn with_diagnostic(mut self, diagnostic: Diagnostic) -> Self {
        self.push(diagnostic);
        self
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Error messages as plain strings
    pub fn error_messages(&self) -> Vec<&str> {
        self.errors.iter().map(|d| d.message.as_str()).collect()
    }

    /// Warning messages as plain strings
    pub fn warning_messages(&self) -> Vec<&str> {
        self.warnings.iter().map(|d| d.message.as_str()).collect()
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    /// File name without extension, used as the record name by consumers
    pub fn record_name(&self) -> Option<&str> {
        self.file_path.file_stem().and_then(|s| s.to_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::{DiagnosticCode, Diagnostic};

    #[test]
    fn validity_follows_errors_only() {
        let mut result = ValidationResult::new("docs/claude.md", "Tool");
        assert!(result.is_valid());

        result.push(Diagnostic::unknown_field("extra"));
        assert!(result.is_valid());
        assert!(result.has_warnings());

        result.push(Diagnostic::new(DiagnosticCode::NoFrontmatter, "No frontmatter found"));
        assert!(!result.is_valid());
        assert_eq!(result.error_messages(), vec!["No frontmatter found"]);
        assert_eq!(result.warning_messages(), vec!["Unknown field: 'extra'"]);
    }

    #[test]
    fn record_name_is_file_stem() {
        let result = ValidationResult::new("models/gpt-4.md", "Tool");
        assert_eq!(result.record_name(), Some("gpt-4"));
    }
}
