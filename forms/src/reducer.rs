//! Form reducer with guarded submission.
//!
//! `Submit` validates first. An invalid form records its errors and never
//! reaches the handler; a valid one hands its values to the caller's async
//! handler. Handler failures, including panics, are logged and recorded in
//! `submit_error`; they never escape the form.

use crate::actions::FormAction;
use crate::path;
use crate::schema::Schema;
use crate::state::FormState;
use futures::FutureExt;
use lexdesk_core::{BoxFuture, Effect, Reducer, SmallVec, smallvec};
use lexdesk_http::ApiError;
use serde_json::Value;
use std::fmt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

/// Message recorded when the handler panics
pub const HANDLER_PANICKED: &str = "Something went wrong. Please try again.";

/// Caller-supplied submission handler
pub type SubmitHandler = Arc<dyn Fn(Value) -> BoxFuture<'static, Result<(), ApiError>> + Send + Sync>;

/// Environment of a form reducer
#[derive(Clone)]
pub struct FormEnvironment {
    /// Called with the validated values
    pub on_submit: SubmitHandler,
}

impl FormEnvironment {
    /// Environment submitting through `on_submit`
    #[must_use]
    pub fn new(on_submit: SubmitHandler) -> Self {
        Self { on_submit }
    }
}

impl fmt::Debug for FormEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormEnvironment").finish_non_exhaustive()
    }
}

/// Reducer for one form.
#[derive(Debug, Clone)]
pub struct FormReducer {
    name: String,
    schema: Arc<Schema>,
}

impl FormReducer {
    /// Form `name` validated by `schema`
    #[must_use]
    pub fn new(name: impl Into<String>, schema: Schema) -> Self {
        Self {
            name: name.into(),
            schema: Arc::new(schema),
        }
    }

    /// The validation schema
    #[must_use]
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    fn submit(&self, state: &mut FormState, env: &FormEnvironment) -> SmallVec<[Effect<FormAction>; 4]> {
        if state.submitting {
            tracing::debug!(form = %self.name, "Submit ignored while a submission is running");
            return smallvec![];
        }

        state.submit_count += 1;
        state.submit_error = None;

        state.errors = self.schema.validate(&state.values);
        if !state.errors.is_empty() {
            tracing::debug!(
                form = %self.name,
                fields = ?state.errors.keys().collect::<Vec<_>>(),
                "Submission blocked by validation"
            );
            state.touched.extend(state.errors.keys().cloned());
            return smallvec![];
        }

        state.submitting = true;
        let handler = Arc::clone(&env.on_submit);
        let values = state.values.clone();
        let form = self.name.clone();

        smallvec![Effect::Future(Box::pin(async move {
            let outcome = AssertUnwindSafe(async move { handler(values).await })
                .catch_unwind()
                .await;

            let result = match outcome {
                Ok(Ok(())) => Ok(()),
                Ok(Err(error)) => {
                    tracing::error!(form = %form, error = %error, "Form submission failed");
                    Err(error.message())
                },
                Err(_) => {
                    tracing::error!(form = %form, "Form submission handler panicked");
                    Err(HANDLER_PANICKED.to_string())
                },
            };
            Some(FormAction::SubmitFinished(result))
        }))]
    }

    fn revalidate_field(&self, state: &mut FormState, name: &str) {
        match self.schema.validate_field(&state.values, name) {
            Some(message) => state.errors.insert(name.to_string(), message),
            None => state.errors.remove(name),
        };
    }
}

impl Reducer for FormReducer {
    type State = FormState;
    type Action = FormAction;
    type Environment = FormEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            FormAction::SetField { name, value } => {
                path::set(&mut state.values, &name, value);
                // Errors follow edits once the user has seen them
                if state.touched.contains(&name) || state.submit_count > 0 {
                    self.revalidate_field(state, &name);
                }
                smallvec![]
            },
            FormAction::Blur(name) => {
                self.revalidate_field(state, &name);
                state.touched.insert(name);
                smallvec![]
            },
            FormAction::Submit => self.submit(state, env),
            FormAction::SubmitFinished(result) => {
                state.submitting = false;
                match result {
                    Ok(()) => {
                        tracing::info!(form = %self.name, "Form submitted");
                        state.initial = state.values.clone();
                    },
                    Err(message) => state.submit_error = Some(message),
                }
                smallvec![]
            },
            FormAction::Reset => {
                *state = FormState::new(state.initial.clone());
                smallvec![]
            },
        }
    }
}
