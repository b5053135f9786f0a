//! # Lexdesk Forms
//!
//! Form binding layer.
//!
//! A [`Schema`] declares per-field rules keyed by dot path; [`bind`] derives
//! what a control renders (required marker, error, character counter) and
//! [`FormReducer`] guards submission: invalid values never reach the
//! caller's handler, and handler failures are logged rather than propagated.

/// Dot-path helpers
pub mod path;

/// Validation schemas
pub mod schema;

/// Field bindings
pub mod binding;

/// Form state
pub mod state;

/// Form actions
pub mod actions;

/// Form reducer
pub mod reducer;

pub use actions::FormAction;
pub use binding::{CharCount, FieldBinding, bind};
pub use reducer::{FormEnvironment, FormReducer, HANDLER_PANICKED, SubmitHandler};
pub use schema::{FieldRules, Rule, Schema, SchemaError, ValidationErrors};
pub use state::FormState;
