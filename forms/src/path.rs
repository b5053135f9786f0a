//! Dot-path addressing into form values.
//!
//! Field names are dot paths (`address.city`, `contacts.0.email`); numeric
//! segments index arrays. Schema paths may use `*` for "every element".

use serde_json::{Map, Value};

/// Value at `path`, if present
#[must_use]
pub fn get<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(value, |current, segment| match current {
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        Value::Object(map) => map.get(segment),
        _ => None,
    })
}

/// Write `new` at `path`, creating objects and arrays along the way.
///
/// A numeric segment under a missing parent creates an array, padded with
/// nulls up to the index.
pub fn set(value: &mut Value, path: &str, new: Value) {
    let segments: Vec<&str> = path.split('.').collect();
    let mut current = value;

    for (depth, segment) in segments.iter().enumerate() {
        let last = depth + 1 == segments.len();
        let next_is_index = segments
            .get(depth + 1)
            .is_some_and(|next| next.parse::<usize>().is_ok());

        current = match segment.parse::<usize>() {
            Ok(index) if current.is_array() || current.is_null() => {
                if current.is_null() {
                    *current = Value::Array(Vec::new());
                }
                let Value::Array(items) = current else {
                    return;
                };
                if items.len() <= index {
                    items.resize(index + 1, Value::Null);
                }
                &mut items[index]
            },
            _ => {
                if !current.is_object() {
                    *current = Value::Object(Map::new());
                }
                let Value::Object(map) = current else {
                    return;
                };
                map.entry((*segment).to_string()).or_insert(Value::Null)
            },
        };

        if last {
            *current = new;
            return;
        }
        if current.is_null() && !next_is_index {
            *current = Value::Object(Map::new());
        }
    }
}

/// Expand `*` segments of a schema path against `value`.
///
/// `contacts.*.email` over two contacts yields `contacts.0.email` and
/// `contacts.1.email`; a wildcard over a missing or non-array value yields
/// nothing.
#[must_use]
pub fn expand(value: &Value, pattern: &str) -> Vec<String> {
    let mut prefixes = vec![String::new()];

    for segment in pattern.split('.') {
        prefixes = prefixes
            .into_iter()
            .flat_map(|prefix| {
                if segment == "*" {
                    let len = lookup_prefix(value, &prefix)
                        .and_then(Value::as_array)
                        .map_or(0, Vec::len);
                    (0..len).map(|i| join(&prefix, &i.to_string())).collect()
                } else {
                    vec![join(&prefix, segment)]
                }
            })
            .collect();
    }
    prefixes
}

/// Whether concrete `path` is matched by schema `pattern`
#[must_use]
pub fn matches(pattern: &str, path: &str) -> bool {
    let mut pattern_segments = pattern.split('.');
    let mut path_segments = path.split('.');
    loop {
        match (pattern_segments.next(), path_segments.next()) {
            (None, None) => return true,
            (Some("*"), Some(segment)) if segment.parse::<usize>().is_ok() => {},
            (Some(expected), Some(segment)) if expected == segment => {},
            _ => return false,
        }
    }
}

fn lookup_prefix<'a>(value: &'a Value, prefix: &str) -> Option<&'a Value> {
    if prefix.is_empty() {
        Some(value)
    } else {
        get(value, prefix)
    }
}

fn join(prefix: &str, segment: &str) -> String {
    if prefix.is_empty() {
        segment.to_string()
    } else {
        format!("{prefix}.{segment}")
    }
}
