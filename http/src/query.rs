//! Query-string construction.
//!
//! Only defined values are appended: `None` and empty strings never produce
//! a key. Keys keep insertion order so the resulting string is deterministic.

use std::fmt::Display;

/// Ordered query parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    /// Create an empty parameter set
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `key=value`, skipping empty values.
    #[must_use]
    pub fn with(mut self, key: &str, value: impl Display) -> Self {
        self.push(key, value);
        self
    }

    /// Append `key=value` when `value` is present and non-empty.
    #[must_use]
    pub fn with_opt<V: Display>(mut self, key: &str, value: Option<V>) -> Self {
        if let Some(value) = value {
            self.push(key, value);
        }
        self
    }

    /// In-place variant of [`with`](Self::with).
    pub fn push(&mut self, key: &str, value: impl Display) {
        let value = value.to_string();
        if !value.is_empty() {
            self.pairs.push((key.to_string(), value));
        }
    }

    /// Append every entry of an already-stringified filter map, in order.
    pub fn extend<I, K, V>(&mut self, entries: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Display,
    {
        for (key, value) in entries {
            self.push(key.as_ref(), value);
        }
    }

    /// Append a JSON value: strings verbatim, numbers and booleans via their
    /// JSON text, `null` skipped, arrays and objects as compact JSON.
    pub fn push_value(&mut self, key: &str, value: &serde_json::Value) {
        match value {
            serde_json::Value::Null => {},
            serde_json::Value::String(s) => self.push(key, s),
            other => self.push(key, other),
        }
    }

    /// Whether no key survived filtering
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Value for `key`, if present
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Borrow the pairs in insertion order
    #[must_use]
    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    /// Render as `application/x-www-form-urlencoded`.
    #[must_use]
    pub fn to_query_string(&self) -> String {
        // Encoding a slice of string pairs cannot fail.
        serde_urlencoded::to_string(&self.pairs).unwrap_or_default()
    }

    /// Append the rendered query to `path`, if there is one.
    #[must_use]
    pub fn apply_to(&self, path: &str) -> String {
        if self.pairs.is_empty() {
            path.to_string()
        } else {
            format!("{path}?{}", self.to_query_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn skips_missing_and_empty_values() {
        let query = QueryParams::new()
            .with("limit", 20)
            .with_opt("page", Some(1))
            .with_opt::<&str>("categoryId", None)
            .with("search", "")
            .with("isBillable", true);

        assert_eq!(query.to_query_string(), "limit=20&page=1&isBillable=true");
        assert_eq!(query.get("categoryId"), None);
    }

    #[test]
    fn encodes_reserved_characters() {
        let query = QueryParams::new().with("search", "smith & co");
        assert_eq!(query.to_query_string(), "search=smith+%26+co");
    }

    #[test]
    fn json_values_are_stringified() {
        let mut query = QueryParams::new();
        query.push_value("status", &serde_json::json!("open"));
        query.push_value("archived", &serde_json::json!(false));
        query.push_value("ownerId", &serde_json::Value::Null);
        query.push_value("amount", &serde_json::json!(12.5));

        assert_eq!(query.to_query_string(), "status=open&archived=false&amount=12.5");
    }

    #[test]
    fn empty_query_leaves_path_untouched() {
        assert_eq!(QueryParams::new().apply_to("/contacts"), "/contacts");
        assert_eq!(
            QueryParams::new().with("page", 2).apply_to("/contacts"),
            "/contacts?page=2"
        );
    }

    proptest! {
        #[test]
        fn only_defined_keys_appear(
            values in proptest::collection::vec(proptest::option::of("[a-z0-9]{0,6}"), 1..8)
        ) {
            let mut query = QueryParams::new();
            for (i, value) in values.iter().enumerate() {
                query = query.with_opt(&format!("k{i}"), value.as_deref());
            }

            let rendered = query.to_query_string();
            for (i, value) in values.iter().enumerate() {
                let key = format!("k{i}=");
                let present = rendered.split('&').any(|pair| pair.starts_with(&key));
                match value.as_deref() {
                    Some(v) if !v.is_empty() => {
                        let pair = format!("k{i}={v}");
                        prop_assert!(rendered.split('&').any(|p| p == pair));
                    },
                    _ => prop_assert!(!present),
                }
            }
        }

        #[test]
        fn booleans_stringify_exactly(flag in any::<bool>()) {
            let query = QueryParams::new().with("isBillable", flag);
            prop_assert_eq!(query.to_query_string(), format!("isBillable={flag}"));
        }
    }
}
