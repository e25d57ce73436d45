//! Compiled field-validation rules
//!
//! A [`ValidationRuleSet`] is the executable form of a [`SchemaDefinition`]:
//! one [`FieldRule`] per declared field, each knowing its primitive type,
//! whether it is required, and its enumerated values. Rule sets are built once
//! by [`ValidatorFactory::compile`] and never mutated afterwards.

use mdlint_core::{Diagnostic, DiagnosticCode, FieldType, SchemaCatalog, SchemaDefinition};
use serde_yaml::{Mapping, Value};
use std::collections::HashMap;

/// Check for a single field
#[derive(Debug, Clone, PartialEq)]
pub struct FieldRule {
    /// Field name
    pub name: String,

    /// Expected type (unknown type names compile to `String`)
    pub field_type: FieldType,

    /// Whether the field is in the schema's `required` set
    pub required: bool,

    /// Allowed values, if enumerated
    pub allowed: Option<Vec<serde_json::Value>>,
}

impl FieldRule {
    /// Check one value, appending a diagnostic per failure
    ///
    /// `value` is `None` when the field is absent. Absence is never a type
    /// error; required-field presence is checked separately.
    pub fn check(&self, value: Option<&Value>, out: &mut Vec<Diagnostic>) {
        let value = match value {
            None => return,
            Some(Value::Null) if !self.required => return,
            Some(v) => untag(v),
        };

        if self.field_type == FieldType::Array {
            self.check_array(value, out);
            return;
        }

        match coerce(self.field_type, value) {
            Ok(()) => self.check_enum(&self.name, value, out),
            Err(reason) => out.push(Diagnostic::field_violation(
                DiagnosticCode::FieldTypeMismatch,
                &self.name,
                reason,
            )),
        }
    }

    fn check_array(&self, value: &Value, out: &mut Vec<Diagnostic>) {
        let Value::Sequence(items) = value else {
            out.push(Diagnostic::field_violation(
                DiagnosticCode::FieldTypeMismatch,
                &self.name,
                "Input should be a valid list",
            ));
            return;
        };

        for (index, item) in items.iter().enumerate() {
            let path = format!("{}.{}", self.name, index);
            let item = untag(item);
            match coerce(FieldType::String, item) {
                Ok(()) => self.check_enum(&path, item, out),
                Err(reason) => out.push(Diagnostic::field_violation(
                    DiagnosticCode::FieldTypeMismatch,
                    &path,
                    reason,
                )),
            }
        }
    }

    fn check_enum(&self, path: &str, value: &Value, out: &mut Vec<Diagnostic>) {
        let Some(allowed) = &self.allowed else {
            return;
        };

        if allowed.iter().any(|candidate| enum_matches(value, candidate)) {
            return;
        }

        let listing = allowed
            .iter()
            .map(|v| match v {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join(", ");

        out.push(Diagnostic::field_violation(
            DiagnosticCode::FieldEnumMismatch,
            path,
            format!(
                "Value {} is not one of the allowed values: {}",
                describe(value),
                listing
            ),
        ));
    }
}

/// Compiled counterpart of one schema
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationRuleSet {
    /// Name of the schema this was compiled from
    pub schema_name: String,

    /// One rule per declared field, ordered by field name
    pub rules: Vec<FieldRule>,
}

impl ValidationRuleSet {
    /// Run every rule against a parsed frontmatter mapping
    pub fn check(&self, data: &Mapping) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        for rule in &self.rules {
            rule.check(data.get(rule.name.as_str()), &mut diagnostics);
        }
        diagnostics
    }

    /// Look up the rule for a field
    pub fn rule(&self, field: &str) -> Option<&FieldRule> {
        self.rules.iter().find(|r| r.name == field)
    }
}

/// Builds rule sets from schema definitions
pub struct ValidatorFactory;

impl ValidatorFactory {
    /// Compile every schema in the catalog, keyed by schema name
    pub fn compile(catalog: &SchemaCatalog) -> HashMap<String, ValidationRuleSet> {
        catalog
            .iter()
            .map(|schema| (schema.name.clone(), Self::compile_schema(schema)))
            .collect()
    }

    /// Compile one schema
    pub fn compile_schema(schema: &SchemaDefinition) -> ValidationRuleSet {
        let rules = schema
            .fields
            .iter()
            .map(|(name, spec)| {
                let field_type = spec.field_type().unwrap_or_else(|| {
                    tracing::warn!(
                        schema = %schema.name,
                        field = %name,
                        type_name = %spec.type_name,
                        "unknown field type, validating as string"
                    );
                    FieldType::String
                });

                FieldRule {
                    name: name.clone(),
                    field_type,
                    required: schema.is_required(name),
                    allowed: spec.enum_values.clone(),
                }
            })
            .collect();

        ValidationRuleSet {
            schema_name: schema.name.clone(),
            rules,
        }
    }
}

fn untag(value: &Value) -> &Value {
    match value {
        Value::Tagged(tagged) => untag(&tagged.value),
        other => other,
    }
}

/// Check that a value is acceptable as the given type
fn coerce(field_type: FieldType, value: &Value) -> Result<(), &'static str> {
    let ok = match field_type {
        FieldType::String => matches!(value, Value::String(_)),
        FieldType::Number => match value {
            Value::Number(_) => true,
            Value::String(s) => s.trim().parse::<f64>().is_ok(),
            _ => false,
        },
        FieldType::Integer => match value {
            Value::Number(n) if n.is_i64() || n.is_u64() => true,
            Value::Number(n) => n.as_f64().map_or(false, |f| f.is_finite() && f.fract() == 0.0),
            Value::String(s) => s.trim().parse::<i64>().is_ok(),
            _ => false,
        },
        FieldType::Boolean => match value {
            Value::Bool(_) => true,
            Value::Number(n) => matches!(n.as_i64(), Some(0) | Some(1)),
            Value::String(s) => matches!(
                s.trim().to_ascii_lowercase().as_str(),
                "true" | "false" | "yes" | "no" | "on" | "off" | "y" | "n" | "t" | "f" | "1" | "0"
            ),
            _ => false,
        },
        FieldType::Array => matches!(value, Value::Sequence(_)),
        FieldType::Object => matches!(value, Value::Mapping(_)),
        FieldType::Date => match value {
            Value::String(s) => chrono::NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").is_ok(),
            _ => false,
        },
    };

    if ok {
        Ok(())
    } else {
        Err(match field_type {
            FieldType::String => "Input should be a valid string",
            FieldType::Number => "Input should be a valid number",
            FieldType::Integer => "Input should be a valid integer",
            FieldType::Boolean => "Input should be a valid boolean",
            FieldType::Array => "Input should be a valid list",
            FieldType::Object => "Input should be a valid dictionary",
            FieldType::Date => "Input should be a valid date",
        })
    }
}

/// Compare a frontmatter value against one enum entry
fn enum_matches(value: &Value, candidate: &serde_json::Value) -> bool {
    use serde_json::Value as Json;

    match (value, candidate) {
        (Value::String(a), Json::String(b)) => a == b,
        (Value::Bool(a), Json::Bool(b)) => a == b,
        (Value::Null, Json::Null) => true,
        (Value::Number(a), Json::Number(b)) => a.as_f64() == b.as_f64(),
        (Value::String(a), Json::Number(b)) => {
            a.trim().parse::<f64>().ok() == b.as_f64()
        }
        _ => false,
    }
}

/// Render a value for an error message
fn describe(value: &Value) -> String {
    match value {
        Value::String(s) => format!("'{}'", s),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Sequence(_) => "<list>".to_string(),
        Value::Mapping(_) => "<mapping>".to_string(),
        Value::Tagged(tagged) => describe(&tagged.value),
    }
}
