//! Form state.

use crate::schema::ValidationErrors;
use serde_json::Value;
use std::collections::BTreeSet;

/// State of one form instance.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormState {
    /// Current values, addressed by dot path
    pub values: Value,
    /// Values the form was opened with
    pub initial: Value,
    /// Field errors from the last validation
    pub errors: ValidationErrors,
    /// Fields the user has left at least once
    pub touched: BTreeSet<String>,
    /// The submit handler is running
    pub submitting: bool,
    /// Submission attempts, valid or not
    pub submit_count: u32,
    /// Message of the last failed submission
    pub submit_error: Option<String>,
}

impl FormState {
    /// Form opened with `values`
    #[must_use]
    pub fn new(values: Value) -> Self {
        Self {
            initial: values.clone(),
            values,
            ..Self::default()
        }
    }

    /// Whether the last validation found no errors
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Whether any value differs from the initial one
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.values != self.initial
    }
}
