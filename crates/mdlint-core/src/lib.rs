//! mdlint Core
//!
//! Core domain model with stable, versioned types.
//! Never rename diagnostic codes - they are part of the JSON report format.

pub mod diagnostic;
pub mod schema;
pub mod catalog;
pub mod result;
pub mod report;
pub mod config;

pub use diagnostic::{Diagnostic, DiagnosticCode, Severity};
pub use schema::{FieldType, FieldSpec, SchemaDefinition};
pub use catalog::{SchemaCatalog, LoadError, SourceFormat};
pub use result::ValidationResult;
pub use report::{ValidationReport, ReportSummary, ReportVersion, SchemaStats};
pub use config::{Config, ConfigError, ScanConfig, SchemaConfig, DEFAULT_PATTERN};
