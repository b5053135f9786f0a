//! Render-agnostic bundle consumed by a table widget.

use crate::capability::RowMenu;
use crate::columns::Column;
use crate::query::{ColumnFilter, SortingRule};
use crate::reducer::TableReducer;
use crate::state::TableState;
use serde_json::Value;
use std::collections::BTreeMap;

/// Pagination as the widget sees it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// 0-based page
    pub page_index: usize,
    /// Rows per page
    pub page_size: usize,
    /// Number of pages
    pub page_count: u64,
}

/// The open action menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenRowMenu {
    /// In-page row index
    pub row_index: usize,
    /// Visible entries
    pub menu: RowMenu,
}

/// Everything a widget needs to draw one table.
#[derive(Debug, Clone, PartialEq)]
pub struct TableView {
    /// Columns, including synthesized ones
    pub columns: Vec<Column>,
    /// Raw rows of the current page
    pub data: Vec<Value>,
    /// Cell values, one vector per row in column order
    pub cells: Vec<Vec<Value>>,
    /// Total rows across all pages
    pub row_count: u64,
    /// Whether a fetch is outstanding
    pub is_loading: bool,
    /// Pagination
    pub pagination: Pagination,
    /// Sort rules
    pub sorting: Vec<SortingRule>,
    /// Column filters
    pub column_filters: Vec<ColumnFilter>,
    /// Search text
    pub global_filter: String,
    /// Banner text for a failed fetch
    pub fetch_error: Option<String>,
    /// Alert text for a failed row mutation
    pub action_error: Option<String>,
    /// Open action menu, if any
    pub row_menu: Option<OpenRowMenu>,
    /// Row shown in the delete confirmation dialog
    pub confirm_delete: Option<Value>,
    /// Working filters while the popover is open
    pub filter_popover: Option<BTreeMap<String, Value>>,
}

impl TableView {
    /// Project `state` through `reducer`'s configuration.
    #[must_use]
    pub fn build(reducer: &TableReducer, state: &TableState) -> Self {
        let columns = reducer.synthesized_columns();
        let cells = state
            .rows
            .iter()
            .enumerate()
            .map(|(index, row)| {
                columns
                    .iter()
                    .map(|column| column.cell(row, index, &state.query))
                    .collect()
            })
            .collect();

        let row_menu = state.open_row_data().map(|row| OpenRowMenu {
            row_index: state.open_row.unwrap_or_default(),
            menu: reducer.row_capabilities().menu_for(Some(row)),
        });

        Self {
            columns,
            data: state.rows.clone(),
            cells,
            row_count: state.total,
            is_loading: state.status.is_loading(),
            pagination: Pagination {
                page_index: state.query.page_index,
                page_size: state.query.page_size,
                page_count: state.page_count(),
            },
            sorting: state.query.sorting.clone(),
            column_filters: state.query.column_filters.clone(),
            global_filter: state.query.global_filter.clone(),
            fetch_error: state.fetch_error.clone(),
            action_error: state.action_error.clone(),
            row_menu,
            confirm_delete: state.pending_delete.clone(),
            filter_popover: state
                .filters
                .open
                .then(|| state.filters.working.clone()),
        }
    }
}
