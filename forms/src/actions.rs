//! Form actions.

use serde_json::Value;

/// Everything that can happen to a form.
#[derive(Debug, Clone, PartialEq)]
pub enum FormAction {
    /// A control changed
    SetField {
        /// Dot-path field name
        name: String,
        /// New value
        value: Value,
    },
    /// A control lost focus
    Blur(String),
    /// The user submitted
    Submit,
    /// The submit handler finished; `Err` carries its message
    SubmitFinished(Result<(), String>),
    /// Return to the initial values
    Reset,
}
