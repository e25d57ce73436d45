//! mdlint Engine
//!
//! Frontmatter validation: rule compilation, schema resolution, per-document
//! checks, directory scanning, and record sync for validated documents.

pub mod frontmatter;
pub mod rules;
pub mod resolver;
pub mod validator;
pub mod scanner;
pub mod sync;

pub use frontmatter::FrontmatterError;
pub use rules::{FieldRule, ValidationRuleSet, ValidatorFactory};
pub use resolver::{Resolution, ResolutionStrategy, SchemaResolver};
pub use validator::DocumentValidator;
pub use scanner::{DirectoryScanner, ScanError};
pub use sync::{sync_records, JsonFileStore, MemoryStore, RecordFields, RecordStore, SyncError, SyncSummary};
