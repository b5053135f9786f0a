//! Per-instance table state.

use crate::capability::RowAction;
use crate::query::TableQuery;
use serde_json::Value;
use std::collections::BTreeMap;

/// Fetch lifecycle.
///
/// `Idle -> Loading -> Ready | Failed`, re-entering `Loading` on every
/// query change.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FetchStatus {
    /// Nothing fetched yet
    #[default]
    Idle,
    /// A fetch is outstanding
    Loading,
    /// Rows reflect the latest fetch
    Ready,
    /// The latest fetch failed; rows are empty
    Failed,
}

impl FetchStatus {
    /// Whether a fetch is outstanding
    #[must_use]
    pub const fn is_loading(self) -> bool {
        matches!(self, Self::Loading)
    }
}

/// Filter popover with its working copy.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterPopover {
    /// Whether the popover is shown
    pub open: bool,
    /// Uncommitted edits
    pub working: BTreeMap<String, Value>,
}

/// State of one mounted table.
#[derive(Debug, Clone, PartialEq)]
pub struct TableState {
    /// Current query tuple
    pub query: TableQuery,
    /// Fetch lifecycle
    pub status: FetchStatus,
    /// Rows of the current page
    pub rows: Vec<Value>,
    /// Total rows across all pages
    pub total: u64,
    /// Message of the last failed fetch, cleared on success
    pub fetch_error: Option<String>,
    /// Sequence number of the most recently triggered fetch
    pub latest_seq: u64,
    /// In-page index of the row whose action menu is open
    pub open_row: Option<usize>,
    /// Row awaiting delete confirmation
    pub pending_delete: Option<Value>,
    /// Filter popover
    pub filters: FilterPopover,
    /// Server message of the last failed row mutation
    pub action_error: Option<String>,
    /// Row mutation awaiting its result
    pub action_in_flight: Option<RowAction>,
}

impl TableState {
    /// Initial state with `page_size` rows per page
    #[must_use]
    pub fn new(page_size: usize) -> Self {
        Self {
            query: TableQuery::with_page_size(page_size),
            status: FetchStatus::Idle,
            rows: Vec::new(),
            total: 0,
            fetch_error: None,
            latest_seq: 0,
            open_row: None,
            pending_delete: None,
            filters: FilterPopover::default(),
            action_error: None,
            action_in_flight: None,
        }
    }

    /// Row whose action menu is open
    #[must_use]
    pub fn open_row_data(&self) -> Option<&Value> {
        self.open_row.and_then(|index| self.rows.get(index))
    }

    /// Number of pages for the current total
    #[must_use]
    pub fn page_count(&self) -> u64 {
        let size = self.query.page_size.max(1) as u64;
        self.total.div_ceil(size)
    }
}

impl Default for TableState {
    fn default() -> Self {
        Self::new(crate::DEFAULT_PAGE_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn open_row_data_follows_rows() {
        let mut state = TableState::default();
        state.rows = vec![json!({"id": 1}), json!({"id": 2})];

        assert!(state.open_row_data().is_none());
        state.open_row = Some(1);
        assert_eq!(state.open_row_data(), Some(&json!({"id": 2})));
        state.open_row = Some(5);
        assert!(state.open_row_data().is_none());
    }

    #[test]
    fn page_count_rounds_up() {
        let mut state = TableState::new(10);
        assert_eq!(state.page_count(), 0);
        state.total = 25;
        assert_eq!(state.page_count(), 3);
    }
}
