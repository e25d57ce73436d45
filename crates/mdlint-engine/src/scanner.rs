//! Directory scanning
//!
//! Walks a root directory, selects documents by glob pattern, and validates
//! each one. Matched paths are deduplicated and sorted, and results come back
//! in that order no matter how many worker threads are used.

use crate::validator::DocumentValidator;
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use mdlint_core::{ScanConfig, ValidationResult};
use std::collections::BTreeSet;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Validates every matching document under a root
pub struct DirectoryScanner<'a> {
    validator: &'a DocumentValidator,
    config: ScanConfig,
}

impl<'a> DirectoryScanner<'a> {
    /// Scanner with the default settings (`**/*.md`, single thread)
    pub fn new(validator: &'a DocumentValidator) -> Self {
        Self::with_config(validator, ScanConfig::default())
    }

    pub fn with_config(validator: &'a DocumentValidator, config: ScanConfig) -> Self {
        Self { validator, config }
    }

    /// Replace the include patterns
    pub fn with_patterns(mut self, patterns: Vec<String>) -> Self {
        if !patterns.is_empty() {
            self.config.patterns = patterns;
        }
        self
    }

    /// Set the number of worker threads (at least one)
    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.config.jobs = jobs.max(1);
        self
    }

    /// Find matching documents, sorted and deduplicated
    pub fn discover(&self, root: &Path) -> Result<Vec<PathBuf>, ScanError> {
        if !root.is_dir() {
            return Err(ScanError::RootNotFound(root.display().to_string()));
        }

        let include = build_glob_set(&self.config.patterns)?;
        let exclude = build_glob_set(&self.config.exclude)?;

        let mut matched = BTreeSet::new();

        let walker = WalkDir::new(root)
            .follow_links(self.config.follow_links)
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    tracing::warn!("Skipping unreadable entry under {}: {}", root.display(), err);
                    continue;
                }
            };

            // Symlinked documents count; `path().is_file()` follows the link.
            if !entry.path().is_file() {
                continue;
            }

            let Ok(relative) = entry.path().strip_prefix(root) else {
                continue;
            };

            if include.is_match(relative) && !exclude.is_match(relative) {
                matched.insert(entry.path().to_path_buf());
            }
        }

        Ok(matched.into_iter().collect())
    }

    /// Validate every matching document
    ///
    /// Files no schema applies to are left out of the results.
    pub fn scan(&self, root: &Path) -> Result<Vec<ValidationResult>, ScanError> {
        let files = self.discover(root)?;
        let jobs = self.config.jobs.max(1).min(files.len().max(1));

        tracing::debug!("Validating {} files with {} worker(s)", files.len(), jobs);

        let results = if jobs == 1 {
            files
                .iter()
                .filter_map(|path| validate_isolated(path, || self.validator.validate(path)))
                .collect::<Vec<_>>()
        } else {
            self.scan_parallel(&files, jobs)?
        };

        tracing::info!(
            "Validated {} of {} matched files under {}",
            results.len(),
            files.len(),
            root.display()
        );

        Ok(results)
    }

    /// Each worker takes a contiguous slice of the sorted paths; joining in
    /// spawn order keeps the output sorted.
    fn scan_parallel(&self, files: &[PathBuf], jobs: usize) -> Result<Vec<ValidationResult>, ScanError> {
        let chunk_size = files.len().div_ceil(jobs);
        let validator = self.validator;

        std::thread::scope(|scope| {
            let handles: Vec<_> = files
                .chunks(chunk_size)
                .map(|chunk| {
                    scope.spawn(move || {
                        chunk
                            .iter()
                            .filter_map(|path| validate_isolated(path, || validator.validate(path)))
                            .collect::<Vec<_>>()
                    })
                })
                .collect();

            let mut results = Vec::with_capacity(files.len());
            for handle in handles {
                let chunk = handle.join().map_err(|_| ScanError::WorkerPanicked)?;
                results.extend(chunk);
            }
            Ok(results)
        })
    }
}

/// Run one file's validation; a panic drops that file and the scan goes on
fn validate_isolated<F>(path: &Path, validate: F) -> Option<ValidationResult>
where
    F: FnOnce() -> Option<ValidationResult>,
{
    catch_unwind(AssertUnwindSafe(validate)).unwrap_or_else(|_| {
        tracing::error!("Validation of {} panicked, skipping file", path.display());
        None
    })
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .map_or(false, |name| name.starts_with('.'))
}

/// `*` and `?` never cross a path separator; `**` does
fn build_glob_set(patterns: &[String]) -> Result<GlobSet, ScanError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = GlobBuilder::new(pattern)
            .literal_separator(true)
            .build()
            .map_err(|e| ScanError::InvalidPattern {
                pattern: pattern.clone(),
                message: e.to_string(),
            })?;
        builder.add(glob);
    }
    builder.build().map_err(|e| ScanError::InvalidPattern {
        pattern: patterns.join(", "),
        message: e.to_string(),
    })
}

/// Directory scan errors
///
/// Per-file problems never surface here; they end up in that file's result.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("Directory not found: {0}")]
    RootNotFound(String),

    #[error("Invalid glob pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    /// Per-file panics are caught; this only covers the worker itself
    #[error("A validation worker panicked")]
    WorkerPanicked,
}
