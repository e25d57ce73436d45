//! Validation report schema (stable v1)
//!
//! This schema is STABLE and VERSIONED.
//! Breaking changes require a new version.

use crate::result::ValidationResult;
use serde::{Deserialize, Serialize};

/// Report schema version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportVersion {
    /// Major version (breaking changes)
    pub major: u32,

    /// Minor version (backward-compatible additions)
    pub minor: u32,
}

impl ReportVersion {
    /// Current report schema version
    pub const CURRENT: ReportVersion = ReportVersion { major: 1, minor: 0 };
}

impl std::fmt::Display for ReportVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// Overall file counts
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    /// Number of files that resolved to a schema
    pub total: usize,

    /// Files with no errors
    pub valid: usize,

    /// Files with one or more errors
    pub invalid: usize,

    /// Files with one or more warnings
    pub with_warnings: usize,
}

/// Counts for one schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaStats {
    /// Schema name (`None` for results without a schema)
    pub schema: Option<String>,

    pub total: usize,
    pub valid: usize,
    pub invalid: usize,
}

impl SchemaStats {
    fn new(schema: Option<String>) -> Self {
        Self {
            schema,
            total: 0,
            valid: 0,
            invalid: 0,
        }
    }

    /// Display label for the schema column
    pub fn label(&self) -> &str {
        self.schema.as_deref().unwrap_or("-")
    }
}

/// Aggregated view of a scan (report.json v1)
///
/// Built by [`ValidationReport::summarize`], which is a pure function of the
/// results. Rendering to a console or file is left to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Schema version
    pub version: ReportVersion,

    /// Timestamp (RFC 3339), stamped by whoever writes the report out
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<String>,

    /// Overall counts
    pub summary: ReportSummary,

    /// Per-schema counts, in order of first appearance in the results
    pub schemas: Vec<SchemaStats>,

    /// Every result, in scan order
    pub results: Vec<ValidationResult>,
}

impl ValidationReport {
    /// Aggregate results into overall and per-schema statistics
    pub fn summarize(results: Vec<ValidationResult>) -> Self {
        let mut summary = ReportSummary::default();
        let mut schemas: Vec<SchemaStats> = Vec::new();

        for result in &results {
            let slot = match schemas.iter().position(|s| s.schema == result.schema_name) {
                Some(i) => i,
                None => {
                    schemas.push(SchemaStats::new(result.schema_name.clone()));
                    schemas.len() - 1
                }
            };
            let stats = &mut schemas[slot];

            stats.total += 1;
            summary.total += 1;

            if result.is_valid() {
                stats.valid += 1;
                summary.valid += 1;
            } else {
                stats.invalid += 1;
                summary.invalid += 1;
            }

            if result.has_warnings() {
                summary.with_warnings += 1;
            }
        }

        Self {
            version: ReportVersion::CURRENT,
            generated_at: None,
            summary,
            schemas,
            results,
        }
    }

    /// Stamp the report with the current time
    pub fn with_timestamp(mut self) -> Self {
        self.generated_at = Some(chrono::Utc::now().to_rfc3339());
        self
    }

    /// Results with at least one error
    pub fn invalid_results(&self) -> impl Iterator<Item = &ValidationResult> {
        self.results.iter().filter(|r| !r.is_valid())
    }

    /// Results with at least one warning
    pub fn results_with_warnings(&self) -> impl Iterator<Item = &ValidationResult> {
        self.results.iter().filter(|r| r.has_warnings())
    }

    /// Check if any file is invalid
    pub fn has_errors(&self) -> bool {
        self.summary.invalid > 0
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Save to file
    pub fn save_to_file(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let json = self.to_json()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
        std::fs::write(path, json)
    }
}
