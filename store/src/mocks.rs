//! Test doubles for the store environment.

use crate::environment::ReferenceSource;
use lexdesk_core::BoxFuture;
use lexdesk_http::ApiError;
use lexdesk_services::{LabelValue, ReferenceKind};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

/// [`ReferenceSource`] answering from a fixed table.
///
/// Kinds without an entry resolve to an empty list. Every call is counted.
#[derive(Debug, Clone, Default)]
pub struct StaticReferenceSource {
    responses: Arc<Mutex<HashMap<ReferenceKind, Result<Vec<LabelValue>, ApiError>>>>,
    calls: Arc<Mutex<Vec<ReferenceKind>>>,
}

impl StaticReferenceSource {
    /// Source with no configured responses
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `kind` with `items`
    #[must_use]
    pub fn with_items(self, kind: ReferenceKind, items: Vec<LabelValue>) -> Self {
        self.responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(kind, Ok(items));
        self
    }

    /// Answer `kind` with `error`
    #[must_use]
    pub fn with_error(self, kind: ReferenceKind, error: ApiError) -> Self {
        self.responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(kind, Err(error));
        self
    }

    /// Kinds requested so far, oldest first
    #[must_use]
    pub fn calls(&self) -> Vec<ReferenceKind> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl ReferenceSource for StaticReferenceSource {
    fn fetch(&self, kind: ReferenceKind) -> BoxFuture<'static, Result<Vec<LabelValue>, ApiError>> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(kind);

        let response = self
            .responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&kind)
            .cloned()
            .unwrap_or_else(|| Ok(Vec::new()));

        Box::pin(async move { response })
    }
}
