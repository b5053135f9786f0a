//! Response envelopes.
//!
//! The backend may wrap a payload in `{ "data": ... }` (occasionally twice) or
//! return it bare. [`Envelope`] makes that distinction explicit and
//! [`normalize_list`] is the single place list responses are coerced into
//! [`ListPage`].

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A decoded response body, with or without a `data` wrapper.
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope {
    /// `{ "data": payload, ... }`
    Wrapped(Value),
    /// Anything else
    Bare(Value),
}

impl Envelope {
    /// Classify a decoded body.
    #[must_use]
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(mut map) if map.contains_key("data") => {
                Self::Wrapped(map.remove("data").unwrap_or(Value::Null))
            },
            other => Self::Bare(other),
        }
    }

    /// The payload with one `data` layer removed, if there was one.
    #[must_use]
    pub fn into_payload(self) -> Value {
        match self {
            Self::Wrapped(payload) | Self::Bare(payload) => payload,
        }
    }
}

/// Remove the `data` layer if present, else pass the body through unchanged.
#[must_use]
pub fn unwrap_data(body: Value) -> Value {
    Envelope::from_value(body).into_payload()
}

/// One page of a list endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListPage<T = Value> {
    /// Rows on this page; never absent
    pub list: Vec<T>,
    /// Total rows across all pages
    pub total: u64,
}

impl<T> ListPage<T> {
    /// An empty page (`{[], 0}`)
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            list: Vec::new(),
            total: 0,
        }
    }
}

/// Coerce any list response into `{list, total}`.
///
/// Accepted shapes, with or without `data` wrappers:
/// `{list, total}`, `{list, pagination: {total}}`, `{list, count}`, and a
/// bare array. A bare array is treated as a complete list, so its total is
/// its length. Anything missing or malformed becomes `[]` / `0`.
#[must_use]
pub fn normalize_list(raw: Value) -> ListPage {
    let payload = strip_data_layers(raw);

    match payload {
        Value::Array(list) => {
            let total = list.len() as u64;
            ListPage { list, total }
        },
        Value::Object(mut map) => {
            let total = map
                .get("total")
                .and_then(as_total)
                .or_else(|| {
                    map.get("pagination")
                        .and_then(|p| p.get("total"))
                        .and_then(as_total)
                })
                .or_else(|| map.get("count").and_then(as_total))
                .unwrap_or(0);

            let list = match map.remove("list") {
                Some(Value::Array(list)) => list,
                _ => Vec::new(),
            };

            ListPage { list, total }
        },
        _ => ListPage::empty(),
    }
}

fn strip_data_layers(mut value: Value) -> Value {
    while value
        .as_object()
        .is_some_and(|map| !map.contains_key("list") && map.contains_key("data"))
    {
        value = unwrap_data(value);
    }
    value
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // guarded by the filter
fn as_total(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && *f >= 0.0 && f.fract() == 0.0)
                .map(|f| f as u64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rows() -> Value {
        json!([{"id": 1}, {"id": 2}])
    }

    #[test]
    fn all_documented_shapes_agree() {
        let shapes = [
            json!({"data": {"list": rows(), "pagination": {"total": 42}}}),
            json!({"data": {"list": rows(), "total": 42}}),
            json!({"list": rows(), "total": 42}),
            json!({"list": rows(), "count": 42}),
        ];

        let expected = ListPage {
            list: vec![json!({"id": 1}), json!({"id": 2})],
            total: 42,
        };
        for shape in shapes {
            assert_eq!(normalize_list(shape), expected);
        }
    }

    #[test]
    fn missing_list_and_total_yield_empty_page() {
        assert_eq!(normalize_list(json!({"data": {}})), ListPage::empty());
        assert_eq!(normalize_list(json!({})), ListPage::empty());
        assert_eq!(normalize_list(Value::Null), ListPage::empty());
    }

    #[test]
    fn malformed_fields_are_coerced() {
        let page = normalize_list(json!({"list": "nope", "total": -3}));
        assert_eq!(page, ListPage::empty());

        let page = normalize_list(json!({"list": rows(), "total": "7"}));
        assert_eq!(page.total, 7);
        assert_eq!(page.list.len(), 2);
    }

    #[test]
    fn double_wrapped_payload_is_unwrapped() {
        let page = normalize_list(json!({"data": {"data": {"list": rows(), "total": 2}}}));
        assert_eq!(page.total, 2);
    }

    #[test]
    fn bare_array_counts_itself() {
        let page = normalize_list(json!({"data": rows()}));
        assert_eq!(page.total, 2);
    }

    #[test]
    fn unwrap_data_passes_bare_payload_through() {
        assert_eq!(unwrap_data(json!({"id": 5})), json!({"id": 5}));
        assert_eq!(unwrap_data(json!({"data": {"id": 5}})), json!({"id": 5}));
    }
}
