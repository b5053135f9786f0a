//! Declarative validation schemas.

use crate::path;
use regex::Regex;
use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;

/// Pattern used by [`FieldRules::email`]
const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";

/// Per-field error messages keyed by concrete dot path
pub type ValidationErrors = BTreeMap<String, String>;

/// Errors building a schema
#[derive(Debug, Error)]
pub enum SchemaError {
    /// A pattern rule did not compile
    #[error("Invalid pattern for field {field}: {source}")]
    InvalidPattern {
        /// Field path
        field: String,
        /// Regex error
        #[source]
        source: regex::Error,
    },
}

/// A single validation rule
#[derive(Debug, Clone)]
pub enum Rule {
    /// Value must be present and non-empty
    Required(String),
    /// At least this many characters
    MinLength(usize, String),
    /// At most this many characters
    MaxLength(usize, String),
    /// Text must match
    Pattern(Regex, String),
}

impl Rule {
    /// Message reported when the rule fails on `value`
    fn check(&self, value: Option<&Value>) -> Option<&str> {
        let failed = match self {
            Self::Required(_) => is_empty(value),
            // Optional fields skip the remaining rules while empty
            _ if is_empty(value) => false,
            Self::MinLength(min, _) => char_len(value) < *min,
            Self::MaxLength(max, _) => char_len(value) > *max,
            Self::Pattern(regex, _) => !regex.is_match(&text(value)),
        };
        failed.then(|| self.message())
    }

    fn message(&self) -> &str {
        match self {
            Self::Required(message)
            | Self::MinLength(_, message)
            | Self::MaxLength(_, message)
            | Self::Pattern(_, message) => message,
        }
    }
}

/// Rules of one field, checked in order; the first failure wins.
#[derive(Debug, Clone, Default)]
pub struct FieldRules {
    rules: Vec<Rule>,
    /// Uncompiled patterns with the rule index they precede
    patterns: Vec<(usize, String, String)>,
}

impl FieldRules {
    /// No rules
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Value must be present and non-empty
    #[must_use]
    pub fn required(mut self, message: impl Into<String>) -> Self {
        self.rules.push(Rule::Required(message.into()));
        self
    }

    /// At least `min` characters
    #[must_use]
    pub fn min_length(mut self, min: usize, message: impl Into<String>) -> Self {
        self.rules.push(Rule::MinLength(min, message.into()));
        self
    }

    /// At most `max` characters; also drives the character counter
    #[must_use]
    pub fn max_length(mut self, max: usize, message: impl Into<String>) -> Self {
        self.rules.push(Rule::MaxLength(max, message.into()));
        self
    }

    /// Must look like an email address
    #[must_use]
    pub fn email(self, message: impl Into<String>) -> Self {
        self.pattern(EMAIL_PATTERN, message)
    }

    /// Must match `pattern`. Compiled when the field joins a [`Schema`].
    #[must_use]
    pub fn pattern(mut self, pattern: impl Into<String>, message: impl Into<String>) -> Self {
        self.patterns
            .push((self.rules.len(), pattern.into(), message.into()));
        self
    }

    /// Whether a `Required` rule is present
    #[must_use]
    pub fn is_required(&self) -> bool {
        self.rules.iter().any(|rule| matches!(rule, Rule::Required(_)))
    }

    /// Smallest `MaxLength` bound, if any
    #[must_use]
    pub fn max_len(&self) -> Option<usize> {
        self.rules
            .iter()
            .filter_map(|rule| match rule {
                Rule::MaxLength(max, _) => Some(*max),
                _ => None,
            })
            .min()
    }

    fn compile(mut self, field: &str) -> Result<Self, SchemaError> {
        for (inserted, (position, pattern, message)) in
            std::mem::take(&mut self.patterns).into_iter().enumerate()
        {
            let regex = Regex::new(&pattern).map_err(|source| SchemaError::InvalidPattern {
                field: field.to_string(),
                source,
            })?;
            self.rules.insert(position + inserted, Rule::Pattern(regex, message));
        }
        Ok(self)
    }

    fn first_failure(&self, value: Option<&Value>) -> Option<&str> {
        self.rules.iter().find_map(|rule| rule.check(value))
    }
}

/// A form's validation schema.
///
/// Field paths may contain `*` to apply rules to every element of an array
/// (`contacts.*.email`).
#[derive(Debug, Clone, Default)]
pub struct Schema {
    fields: Vec<(String, FieldRules)>,
}

impl Schema {
    /// Empty schema
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add rules for `path`.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::InvalidPattern`] if a pattern rule does not compile.
    pub fn field(mut self, path: impl Into<String>, rules: FieldRules) -> Result<Self, SchemaError> {
        let path = path.into();
        let rules = rules.compile(&path)?;
        self.fields.push((path, rules));
        Ok(self)
    }

    /// Validate `values`, returning one message per failing field.
    #[must_use]
    pub fn validate(&self, values: &Value) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        for (pattern, rules) in &self.fields {
            for concrete in path::expand(values, pattern) {
                if let Some(message) = rules.first_failure(path::get(values, &concrete)) {
                    errors.entry(concrete).or_insert_with(|| message.to_string());
                }
            }
        }
        errors
    }

    /// Validate only `field` (a concrete path)
    #[must_use]
    pub fn validate_field(&self, values: &Value, field: &str) -> Option<String> {
        self.rules_for(field)
            .find_map(|rules| rules.first_failure(path::get(values, field)))
            .map(str::to_string)
    }

    /// Whether `field` is required
    #[must_use]
    pub fn is_required(&self, field: &str) -> bool {
        self.rules_for(field).any(FieldRules::is_required)
    }

    /// Maximum length of `field`, if bounded
    #[must_use]
    pub fn max_length(&self, field: &str) -> Option<usize> {
        self.rules_for(field).filter_map(FieldRules::max_len).min()
    }

    fn rules_for<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a FieldRules> + 'a {
        self.fields
            .iter()
            .filter(move |(pattern, _)| path::matches(pattern, field))
            .map(|(_, rules)| rules)
    }
}

fn is_empty(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(text)) => text.trim().is_empty(),
        Some(Value::Array(items)) => items.is_empty(),
        Some(_) => false,
    }
}

fn text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
        None => String::new(),
    }
}

/// Character count of a value as shown to the user
pub(crate) fn char_len(value: Option<&Value>) -> usize {
    match value {
        None | Some(Value::Null) => 0,
        Some(Value::String(text)) => text.chars().count(),
        Some(other) => other.to_string().chars().count(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code
mod tests {
    use super::*;
    use serde_json::json;

    fn contact_schema() -> Schema {
        Schema::new()
            .field(
                "email",
                FieldRules::new()
                    .required("Email is required")
                    .email("Enter a valid email"),
            )
            .unwrap()
            .field(
                "notes",
                FieldRules::new().max_length(10, "Notes are too long"),
            )
            .unwrap()
            .field(
                "phones.*.number",
                FieldRules::new().required("Number is required").min_length(6, "Too short"),
            )
            .unwrap()
    }

    #[test]
    fn required_fails_on_missing_and_blank() {
        let schema = contact_schema();
        assert_eq!(
            schema.validate(&json!({})).get("email").map(String::as_str),
            Some("Email is required")
        );
        assert_eq!(
            schema.validate(&json!({"email": "   "})).get("email").map(String::as_str),
            Some("Email is required")
        );
    }

    #[test]
    fn first_failing_rule_wins() {
        let errors = contact_schema().validate(&json!({"email": "not-an-email"}));
        assert_eq!(errors.get("email").map(String::as_str), Some("Enter a valid email"));
    }

    #[test]
    fn optional_empty_field_skips_rules() {
        let errors = contact_schema().validate(&json!({"email": "a@b.io", "notes": ""}));
        assert!(errors.is_empty());
    }

    #[test]
    fn max_length_counts_characters() {
        let schema = contact_schema();
        assert!(schema.validate(&json!({"email": "a@b.io", "notes": "ééééééééé"})).is_empty());
        let errors = schema.validate(&json!({"email": "a@b.io", "notes": "ééééééééééé"}));
        assert_eq!(errors.get("notes").map(String::as_str), Some("Notes are too long"));
    }

    #[test]
    fn wildcard_rules_report_concrete_paths() {
        let errors = contact_schema().validate(&json!({
            "email": "a@b.io",
            "phones": [{"number": "555-0100"}, {"number": ""}, {"number": "12"}]
        }));
        assert_eq!(
            errors,
            ValidationErrors::from([
                ("phones.1.number".to_string(), "Number is required".to_string()),
                ("phones.2.number".to_string(), "Too short".to_string()),
            ])
        );
    }

    #[test]
    fn field_metadata() {
        let schema = contact_schema();
        assert!(schema.is_required("email"));
        assert!(!schema.is_required("notes"));
        assert!(schema.is_required("phones.4.number"));
        assert_eq!(schema.max_length("notes"), Some(10));
        assert_eq!(schema.max_length("email"), None);
        assert_eq!(
            schema.validate_field(&json!({"phones": [{"number": "1"}]}), "phones.0.number"),
            Some("Too short".to_string())
        );
    }

    #[test]
    fn invalid_pattern_is_rejected() {
        let result = Schema::new().field("code", FieldRules::new().pattern("([", "bad"));
        assert!(matches!(result, Err(SchemaError::InvalidPattern { field, .. }) if field == "code"));
    }
}
