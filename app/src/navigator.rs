//! In-process navigator.

use lexdesk_core::Navigator;
use std::sync::{Mutex, PoisonError};

/// Navigator that tracks the current path in memory.
///
/// Stands in for the browser location when the client core runs outside a
/// browser; redirects are logged.
#[derive(Debug)]
pub struct MemoryNavigator {
    path: Mutex<String>,
}

impl MemoryNavigator {
    /// Start at `path`
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: Mutex::new(path.into()),
        }
    }
}

impl Navigator for MemoryNavigator {
    fn current_path(&self) -> String {
        self.path.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn redirect(&self, path: &str) {
        let mut current = self.path.lock().unwrap_or_else(PoisonError::into_inner);
        tracing::info!(from = %current, to = %path, "Redirecting");
        *current = path.to_string();
    }
}
