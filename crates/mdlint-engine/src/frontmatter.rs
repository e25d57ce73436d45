//! Frontmatter extraction and parsing
//!
//! A frontmatter block is a `---` line at the very start of a document, a
//! YAML body, and a closing `---` line. The document body after the block is
//! never inspected.

use serde_yaml::{Mapping, Value};
use std::sync::OnceLock;

const FRONTMATTER_PATTERN: &str = r"(?s)\A---[ \t]*\r?\n(.*?)\r?\n---[ \t]*(?:\r?\n|\z)";

fn frontmatter_regex() -> &'static regex::Regex {
    static REGEX: OnceLock<regex::Regex> = OnceLock::new();
    REGEX.get_or_init(|| regex::Regex::new(FRONTMATTER_PATTERN).expect("frontmatter pattern is valid"))
}

/// Return the text between the opening and closing delimiters
///
/// `None` when the document does not start with a delimited block, or the
/// block is empty.
pub fn extract(document: &str) -> Option<&str> {
    frontmatter_regex()
        .captures(document)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .filter(|block| !block.is_empty())
}

/// Why a frontmatter block could not be turned into a mapping
#[derive(Debug, thiserror::Error)]
pub enum FrontmatterError {
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Frontmatter is not a valid YAML object")]
    NotMapping,
}

/// Parse a frontmatter block into a key-value mapping
pub fn parse(block: &str) -> Result<Mapping, FrontmatterError> {
    match serde_yaml::from_str::<Value>(block)? {
        Value::Mapping(mapping) => Ok(mapping),
        Value::Tagged(tagged) => match tagged.value {
            Value::Mapping(mapping) => Ok(mapping),
            _ => Err(FrontmatterError::NotMapping),
        },
        _ => Err(FrontmatterError::NotMapping),
    }
}

/// Extract and parse in one step; `Ok(None)` when there is no block
pub fn extract_and_parse(document: &str) -> Result<Option<Mapping>, FrontmatterError> {
    extract(document).map(parse).transpose()
}

/// Render a mapping key as a field name
///
/// Non-string keys (`1: x`, `true: y`) are rendered the way YAML writes them.
pub fn key_name(key: &Value) -> String {
    match key {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn extracts_block_between_delimiters() {
        let doc = "---\nname: Claude\norganization: Anthropic\n---\n# Body\n\n---\nnot frontmatter\n";
        assert_eq!(extract(doc), Some("name: Claude\norganization: Anthropic"));
    }

    #[test]
    fn handles_crlf_and_trailing_whitespace() {
        let doc = "--- \r\nname: Claude\r\n---\r\nbody";
        assert_eq!(extract(doc), Some("name: Claude"));
    }

    #[test]
    fn closing_delimiter_at_end_of_input() {
        assert_eq!(extract("---\nname: x\n---"), Some("name: x"));
    }

    #[test]
    fn block_must_start_the_document() {
        assert_eq!(extract("# Title\n---\nname: x\n---\n"), None);
        assert_eq!(extract("\n---\nname: x\n---\n"), None);
    }

    #[test]
    fn missing_or_empty_block_is_absent() {
        assert_eq!(extract("just a body"), None);
        assert_eq!(extract("---\nname: x\nno closing line"), None);
        assert_eq!(extract("---\n\n---\nbody"), None);
        assert_eq!(extract(""), None);
    }

    #[test]
    fn parse_mapping() {
        let mapping = parse("name: GPT-3\ntags: [a, b]\n").unwrap();
        assert_eq!(mapping.len(), 2);
        assert_eq!(mapping.get("name"), Some(&Value::String("GPT-3".to_string())));
    }

    #[test]
    fn parse_rejects_non_mappings() {
        assert!(matches!(parse("- a\n- b"), Err(FrontmatterError::NotMapping)));
        assert!(matches!(parse("just a string"), Err(FrontmatterError::NotMapping)));
        assert!(matches!(parse("# only a comment"), Err(FrontmatterError::NotMapping)));
    }

    #[test]
    fn parse_reports_yaml_errors() {
        let err = parse("name: [unclosed").unwrap_err();
        assert!(matches!(err, FrontmatterError::Yaml(_)));
        assert!(err.to_string().starts_with("YAML parsing error:"));
    }

    #[test]
    fn extract_and_parse_without_block() {
        assert!(extract_and_parse("no block").unwrap().is_none());
    }

    #[test]
    fn key_names() {
        assert_eq!(key_name(&Value::String("title".into())), "title");
        assert_eq!(key_name(&Value::Bool(true)), "true");
        assert_eq!(key_name(&serde_yaml::from_str::<Value>("12").unwrap()), "12");
    }
}
