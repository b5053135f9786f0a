//! Table actions.

use crate::capability::RowAction;
use crate::query::QueryChange;
use lexdesk_http::ListPage;
use serde_json::Value;

/// Everything that can happen to a table.
#[derive(Debug, Clone, PartialEq)]
pub enum TableAction {
    /// Table was mounted; issue the first fetch
    Mount,
    /// Widget changed part of the query tuple
    QueryChanged(QueryChange),
    /// Refetch the current tuple
    Refresh,
    /// A fetch completed
    FetchSucceeded {
        /// Sequence number of the fetch
        seq: u64,
        /// Normalized page
        page: ListPage,
    },
    /// A fetch failed
    FetchFailed {
        /// Sequence number of the fetch
        seq: u64,
        /// Message for display
        message: String,
    },

    /// Open the action menu of the row at this in-page index
    OpenRowMenu(usize),
    /// Close the action menu
    CloseRowMenu,
    /// Pick an entry of the open menu
    RequestRowAction(RowAction),
    /// Accept the pending delete
    ConfirmDelete,
    /// Dismiss the pending delete
    CancelDelete,
    /// A row mutation finished
    RowActionCompleted {
        /// Which mutation
        action: RowAction,
        /// `Err` carries the message for display
        result: Result<(), String>,
    },
    /// Clear `action_error`
    DismissActionError,

    /// Open the filter popover with a copy of the committed filters
    OpenFilters,
    /// Edit one working filter; `None` removes it
    SetWorkingFilter {
        /// Filter key, sent as a query parameter
        key: String,
        /// New value
        value: Option<Value>,
    },
    /// Commit the working copy and close
    ApplyFilters,
    /// Commit an empty filter set and close
    ResetFilters,
    /// Close without committing
    CloseFilters,
}
