//! Table environment: data source and row-action callbacks.

use crate::source::DataSource;
use lexdesk_core::BoxFuture;
use lexdesk_http::ApiError;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Fire-and-forget row callback (navigation to the edit page and similar)
pub type RowCallback = Arc<dyn Fn(Value) + Send + Sync>;

/// Asynchronous row mutation
pub type RowMutation = Arc<dyn Fn(Value) -> BoxFuture<'static, Result<(), ApiError>> + Send + Sync>;

/// Callbacks the page supplies for row actions.
#[derive(Clone, Default)]
pub struct RowHandlers {
    /// Edit
    pub on_edit: Option<RowCallback>,
    /// Permissions editor
    pub on_permissions: Option<RowCallback>,
    /// Delete, called only after confirmation
    pub on_delete: Option<RowMutation>,
    /// Restore
    pub on_restore: Option<RowMutation>,
}

impl fmt::Debug for RowHandlers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RowHandlers")
            .field("on_edit", &self.on_edit.is_some())
            .field("on_permissions", &self.on_permissions.is_some())
            .field("on_delete", &self.on_delete.is_some())
            .field("on_restore", &self.on_restore.is_some())
            .finish()
    }
}

/// Environment of a table reducer
#[derive(Debug, Clone, Default)]
pub struct TableEnvironment {
    /// Where rows come from
    pub source: DataSource,
    /// Row-action callbacks
    pub handlers: RowHandlers,
}

impl TableEnvironment {
    /// Environment with no row handlers
    #[must_use]
    pub fn new(source: DataSource) -> Self {
        Self {
            source,
            handlers: RowHandlers::default(),
        }
    }

    /// Replace the row handlers
    #[must_use]
    pub fn with_handlers(mut self, handlers: RowHandlers) -> Self {
        self.handlers = handlers;
        self
    }
}
