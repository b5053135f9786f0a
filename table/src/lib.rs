//! # Lexdesk Table
//!
//! Server-driven table controller.
//!
//! A [`TableReducer`] owns the query tuple of one list page (pagination,
//! sorting, filters, search), fetches the matching page from a
//! [`DataSource`], and drives the row-action menu, delete confirmation and
//! filter popover. [`TableView::build`] projects the state into the bundle a
//! rendering widget consumes.
//!
//! ```ignore
//! let reducer = TableReducer::new("matters")
//!     .columns(vec![ColumnSpec::new("name", "Name")])
//!     .row_numbers(true);
//! let env = TableEnvironment::new(DataSource::new().with_service(matters::list_service(client)));
//! let store = Store::new(TableState::new(10), reducer.clone(), env);
//!
//! store.send(TableAction::Mount).await.wait().await;
//! let view = store.state(|s| TableView::build(&reducer, s)).await;
//! ```

/// Query tuple
pub mod query;

/// Data source resolution
pub mod source;

/// Row-action capabilities
pub mod capability;

/// Column synthesis
pub mod columns;

/// Table state
pub mod state;

/// Table actions
pub mod actions;

/// Data source and row callbacks
pub mod environment;

/// Table reducer
pub mod reducer;

/// Widget bundle
pub mod view;

/// Rows per page when the page does not choose
pub const DEFAULT_PAGE_SIZE: usize = 10;

pub use actions::TableAction;
pub use capability::{Capability, RowAction, RowCapabilities, RowMenu};
pub use columns::{ACTIONS_COLUMN, Column, ColumnKind, ColumnSpec, ROW_NUMBER_COLUMN, synthesize_columns};
pub use environment::{RowCallback, RowHandlers, RowMutation, TableEnvironment};
pub use query::{ColumnFilter, QueryChange, SortingRule, TableQuery};
pub use reducer::{DEFAULT_SORT, TableReducer};
pub use source::{DataSource, RequestOverride, ResolvedSource};
pub use state::{FetchStatus, FilterPopover, TableState};
pub use view::{OpenRowMenu, Pagination, TableView};
