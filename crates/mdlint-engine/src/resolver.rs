//! Schema resolution
//!
//! Decides which schema applies to a document. Strategies are tried in order
//! and the first match wins:
//!
//! 1. **Path**: a schema whose `subdirectory` equals any segment of the path.
//! 2. **Category field**: a schema whose `category_field` key is present in the
//!    frontmatter with a value equal to the schema's name.
//! 3. **Sole schema**: the catalog holds exactly one schema.
//!
//! Within a strategy, schemas are tried in catalog (source) order.

use crate::frontmatter;
use mdlint_core::{SchemaCatalog, SchemaDefinition};
use serde_yaml::Value;
use std::ffi::OsStr;
use std::path::{Component, Path};

/// Which strategy selected a schema
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionStrategy {
    Subdirectory,
    CategoryField,
    SoleSchema,
}

impl std::fmt::Display for ResolutionStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Subdirectory => write!(f, "subdirectory"),
            Self::CategoryField => write!(f, "category field"),
            Self::SoleSchema => write!(f, "sole schema"),
        }
    }
}

/// A resolved schema and how it was chosen
#[derive(Debug, Clone, Copy)]
pub struct Resolution<'a> {
    pub schema: &'a SchemaDefinition,
    pub strategy: ResolutionStrategy,
}

/// Picks the schema for a document
#[derive(Debug, Clone, Copy)]
pub struct SchemaResolver<'a> {
    catalog: &'a SchemaCatalog,
}

impl<'a> SchemaResolver<'a> {
    pub fn new(catalog: &'a SchemaCatalog) -> Self {
        Self { catalog }
    }

    /// Resolve using the path and, if available, the document text
    ///
    /// `document` is `None` when the file could not be read; only the path and
    /// sole-schema strategies can match then.
    pub fn resolve(&self, path: &Path, document: Option<&str>) -> Option<Resolution<'a>> {
        self.by_subdirectory(path)
            .map(|schema| (schema, ResolutionStrategy::Subdirectory))
            .or_else(|| {
                document
                    .and_then(|text| self.by_category_field(text))
                    .map(|schema| (schema, ResolutionStrategy::CategoryField))
            })
            .or_else(|| {
                self.catalog
                    .sole()
                    .map(|schema| (schema, ResolutionStrategy::SoleSchema))
            })
            .map(|(schema, strategy)| Resolution { schema, strategy })
    }

    /// Read the file and resolve
    pub fn resolve_file(&self, path: &Path) -> Option<Resolution<'a>> {
        let document = std::fs::read_to_string(path).ok();
        self.resolve(path, document.as_deref())
    }

    fn by_subdirectory(&self, path: &Path) -> Option<&'a SchemaDefinition> {
        let segments = normalized_segments(path);

        self.catalog.iter().find(|schema| {
            schema
                .subdirectory_segment()
                .map_or(false, |dir| segments.iter().any(|s| *s == dir))
        })
    }

    /// Malformed frontmatter is not an error here; it just doesn't match.
    fn by_category_field(&self, document: &str) -> Option<&'a SchemaDefinition> {
        let data = frontmatter::extract_and_parse(document).ok().flatten()?;

        self.catalog.iter().find(|schema| {
            schema.category_key().map_or(false, |key| {
                matches!(data.get(key), Some(Value::String(value)) if *value == schema.name)
            })
        })
    }
}

/// Path segments after lexical normalization: `.` is dropped and `..`
/// removes the segment before it.
fn normalized_segments(path: &Path) -> Vec<&OsStr> {
    let mut segments = Vec::new();
    for component in path.components() {
        match component {
            Component::Normal(segment) => segments.push(segment),
            Component::ParentDir => {
                segments.pop();
            }
            Component::CurDir | Component::RootDir | Component::Prefix(_) => {}
        }
    }
    segments
}
