//! Diagnostic codes and per-file error reporting
//!
//! IMPORTANT: Diagnostic codes are versioned and stable.
//! NEVER rename or remove codes - they are part of the JSON report format.
//! Add new codes with new names only.

use serde::{Deserialize, Serialize};

/// Diagnostic code registry (v1)
///
/// These codes are STABLE and VERSIONED.
/// Do NOT rename or remove codes - only add new ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiagnosticCode {
    // Document access
    /// The document could not be read from disk
    FileReadError,

    // Frontmatter structure
    /// No `---` delimited block at the start of the document
    NoFrontmatter,

    /// Frontmatter present but not parseable as YAML
    FrontmatterParseError,

    /// Frontmatter parsed but the top-level value is not a mapping
    FrontmatterNotMapping,

    // Schema violations
    /// A field listed in the schema's `required` set is absent
    MissingRequiredField,

    /// A present value does not coerce to the declared field type
    FieldTypeMismatch,

    /// A present value is outside the field's enumerated set
    FieldEnumMismatch,

    // Warnings
    /// A key in the frontmatter is not declared by the schema
    UnknownField,
}

impl DiagnosticCode {
    /// Get the diagnostic code as a stable string identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FileReadError => "FILE_READ_ERROR",
            Self::NoFrontmatter => "NO_FRONTMATTER",
            Self::FrontmatterParseError => "FRONTMATTER_PARSE_ERROR",
            Self::FrontmatterNotMapping => "FRONTMATTER_NOT_MAPPING",
            Self::MissingRequiredField => "MISSING_REQUIRED_FIELD",
            Self::FieldTypeMismatch => "FIELD_TYPE_MISMATCH",
            Self::FieldEnumMismatch => "FIELD_ENUM_MISMATCH",
            Self::UnknownField => "UNKNOWN_FIELD",
        }
    }

    /// Severity a diagnostic with this code is reported at
    pub fn severity(&self) -> Severity {
        match self {
            Self::UnknownField => Severity::Warn,
            _ => Severity::Error,
        }
    }
}

impl std::fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Diagnostic severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Warning - reported but never affects validity
    Warn,

    /// Error - the file is invalid
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// A diagnostic message with structured metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Stable diagnostic code
    pub code: DiagnosticCode,

    /// Severity level
    pub severity: Severity,

    /// Human-readable message
    pub message: String,

    /// Field path the diagnostic refers to (e.g. `tags.1`), if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl Diagnostic {
    /// Create a new diagnostic; severity follows the code
    pub fn new(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self {
            code,
            severity: code.severity(),
            message: message.into(),
            field: None,
        }
    }

    /// Set the field path
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// `Missing required field: '<field>'`
    pub fn missing_field(field: &str) -> Self {
        Self::new(
            DiagnosticCode::MissingRequiredField,
            format!("Missing required field: '{}'", field),
        )
        .with_field(field)
    }

    /// `Unknown field: '<field>'`
    pub fn unknown_field(field: &str) -> Self {
        Self::new(DiagnosticCode::UnknownField, format!("Unknown field: '{}'", field))
            .with_field(field)
    }

    /// `Field '<path>': <reason>` for a type or enum failure
    pub fn field_violation(code: DiagnosticCode, path: &str, reason: impl std::fmt::Display) -> Self {
        Self::new(code, format!("Field '{}': {}", path, reason)).with_field(path)
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagnostic_code_stability() {
        // Ensure codes are stable strings
        assert_eq!(DiagnosticCode::MissingRequiredField.as_str(), "MISSING_REQUIRED_FIELD");
        assert_eq!(DiagnosticCode::UnknownField.as_str(), "UNKNOWN_FIELD");
        assert_eq!(DiagnosticCode::NoFrontmatter.as_str(), "NO_FRONTMATTER");
    }

    #[test]
    fn only_unknown_field_is_a_warning() {
        assert_eq!(DiagnosticCode::UnknownField.severity(), Severity::Warn);
        assert_eq!(DiagnosticCode::FieldEnumMismatch.severity(), Severity::Error);
        assert_eq!(DiagnosticCode::FileReadError.severity(), Severity::Error);
    }

    #[test]
    fn message_formats() {
        assert_eq!(Diagnostic::missing_field("name").message, "Missing required field: 'name'");
        assert_eq!(Diagnostic::unknown_field("extra").message, "Unknown field: 'extra'");

        let diag = Diagnostic::field_violation(
            DiagnosticCode::FieldTypeMismatch,
            "tags.1",
            "Input should be a valid string",
        );
        assert_eq!(diag.message, "Field 'tags.1': Input should be a valid string");
        assert_eq!(diag.field.as_deref(), Some("tags.1"));
    }

    #[test]
    fn diagnostic_serialization() {
        let diag = Diagnostic::missing_field("organization");

        let json = serde_json::to_string(&diag).unwrap();
        assert!(json.contains("MISSING_REQUIRED_FIELD"));
        assert!(json.contains("\"error\""));
        assert!(json.contains("\"field\":\"organization\""));
    }
}
