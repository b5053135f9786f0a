//! Field bindings derived from a schema and the form state.

use crate::path;
use crate::schema::{Schema, char_len};
use crate::state::FormState;
use std::fmt;

/// Character counter shown under length-bounded inputs.
///
/// Purely informational: `current` may exceed `max`; enforcing the bound
/// is the schema's job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharCount {
    /// Characters entered
    pub current: usize,
    /// Schema maximum
    pub max: usize,
}

impl CharCount {
    /// Whether the value is over the limit
    #[must_use]
    pub const fn is_over(&self) -> bool {
        self.current > self.max
    }
}

impl fmt::Display for CharCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.current, self.max)
    }
}

/// Everything a rendered control needs about one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldBinding {
    /// Dot-path field name
    pub name: String,
    /// Human label
    pub label: String,
    /// Show the required marker
    pub required: bool,
    /// Message to show under the control
    pub error: Option<String>,
    /// Counter, for length-bounded fields
    pub char_count: Option<CharCount>,
}

/// Bind field `name` of `state` under `schema`.
#[must_use]
pub fn bind(schema: &Schema, state: &FormState, name: &str, label: &str) -> FieldBinding {
    FieldBinding {
        name: name.to_string(),
        label: label.to_string(),
        required: schema.is_required(name),
        error: state.errors.get(name).cloned(),
        char_count: schema.max_length(name).map(|max| CharCount {
            current: char_len(path::get(&state.values, name)),
            max,
        }),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code
mod tests {
    use super::*;
    use crate::schema::FieldRules;
    use serde_json::json;

    fn schema() -> Schema {
        Schema::new()
            .field("title", FieldRules::new().required("Title is required").max_length(5, "Too long"))
            .unwrap()
            .field("items.*.note", FieldRules::new().max_length(3, "Too long"))
            .unwrap()
    }

    #[test]
    fn counter_never_truncates() {
        let state = FormState::new(json!({"title": "Lease agreement"}));
        let binding = bind(&schema(), &state, "title", "Title");

        let count = binding.char_count.unwrap();
        assert_eq!(count.current, 15);
        assert!(count.is_over());
        assert_eq!(count.to_string(), "15/5");
        assert_eq!(state.values["title"], json!("Lease agreement"));
    }

    #[test]
    fn binding_reflects_schema_and_errors() {
        let mut state = FormState::new(json!({"items": [{"note": "ab"}]}));
        state.errors.insert("title".into(), "Title is required".into());

        let title = bind(&schema(), &state, "title", "Title");
        assert!(title.required);
        assert_eq!(title.error.as_deref(), Some("Title is required"));

        let note = bind(&schema(), &state, "items.0.note", "Note");
        assert!(!note.required);
        assert!(note.error.is_none());
        assert_eq!(note.char_count, Some(CharCount { current: 2, max: 3 }));

        let free = bind(&schema(), &state, "comment", "Comment");
        assert!(free.char_count.is_none());
    }
}
