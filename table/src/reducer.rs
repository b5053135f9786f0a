//! The table controller reducer.
//!
//! Every change to the query tuple re-enters `Loading` and schedules exactly
//! one fetch in the same step. Fetches carry a sequence number; a response
//! whose number is not the latest issued is dropped, so `rows`/`total`
//! always reflect the most recently triggered fetch that has completed.
//! Fetch failures never escape: the table degrades to an empty page and
//! records `fetch_error`.

use crate::actions::TableAction;
use crate::capability::{RowAction, RowCapabilities};
use crate::columns::{Column, ColumnSpec, synthesize_columns};
use crate::environment::{RowMutation, TableEnvironment};
use crate::query::QueryChange;
use crate::state::{FetchStatus, TableState};
use lexdesk_core::{Effect, Reducer, SmallVec, smallvec};
use serde_json::Value;
use std::collections::BTreeMap;

/// Sort key used when the widget has no sort rule
pub const DEFAULT_SORT: &str = "createdAt";

/// Controller for one entity's list page.
#[derive(Debug, Clone)]
pub struct TableReducer {
    entity: String,
    columns: Vec<ColumnSpec>,
    row_numbers: bool,
    default_sort: String,
    capabilities: RowCapabilities,
}

impl TableReducer {
    /// Controller for `entity` with no columns and no row actions
    #[must_use]
    pub fn new(entity: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            columns: Vec::new(),
            row_numbers: false,
            default_sort: DEFAULT_SORT.to_string(),
            capabilities: RowCapabilities::default(),
        }
    }

    /// Data columns
    #[must_use]
    pub fn columns(mut self, columns: Vec<ColumnSpec>) -> Self {
        self.columns = columns;
        self
    }

    /// Show the row-number column
    #[must_use]
    pub const fn row_numbers(mut self, enabled: bool) -> Self {
        self.row_numbers = enabled;
        self
    }

    /// Sort key used without a sort rule
    #[must_use]
    pub fn default_sort(mut self, key: impl Into<String>) -> Self {
        self.default_sort = key.into();
        self
    }

    /// Row-action capabilities
    #[must_use]
    pub fn capabilities(mut self, capabilities: RowCapabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    /// Entity name, used in logs
    #[must_use]
    pub fn entity(&self) -> &str {
        &self.entity
    }

    /// Capabilities of this entity's rows
    #[must_use]
    pub const fn row_capabilities(&self) -> &RowCapabilities {
        &self.capabilities
    }

    /// Columns as handed to the widget
    #[must_use]
    pub fn synthesized_columns(&self) -> Vec<Column> {
        synthesize_columns(&self.columns, self.row_numbers, &self.capabilities)
    }

    fn fetch(&self, state: &mut TableState, env: &TableEnvironment) -> Effect<TableAction> {
        state.latest_seq += 1;
        state.status = FetchStatus::Loading;

        let seq = state.latest_seq;
        let source = env.source.resolve();
        let query = state.query.clone();
        let default_sort = self.default_sort.clone();

        tracing::debug!(
            entity = %self.entity,
            seq,
            source = source.name(),
            page_index = query.page_index,
            page_size = query.page_size,
            "Fetching table page"
        );

        Effect::Future(Box::pin(async move {
            Some(match source.fetch(query, default_sort).await {
                Ok(page) => TableAction::FetchSucceeded { seq, page },
                Err(error) => TableAction::FetchFailed {
                    seq,
                    message: error.message(),
                },
            })
        }))
    }

    fn is_stale(&self, state: &TableState, seq: u64) -> bool {
        if seq == state.latest_seq {
            return false;
        }
        tracing::debug!(
            entity = %self.entity,
            seq,
            latest = state.latest_seq,
            "Discarding stale table response"
        );
        metrics::counter!("table.fetch.stale_discarded").increment(1);
        true
    }

    fn commit_filters(
        &self,
        state: &mut TableState,
        filters: BTreeMap<String, Value>,
        env: &TableEnvironment,
    ) -> SmallVec<[Effect<TableAction>; 4]> {
        state.filters.open = false;
        state.filters.working.clear();

        if state.query.merge(QueryChange::custom_filters(filters)) {
            smallvec![self.fetch(state, env)]
        } else {
            smallvec![]
        }
    }

    fn row_action(
        &self,
        state: &mut TableState,
        action: RowAction,
        env: &TableEnvironment,
    ) -> SmallVec<[Effect<TableAction>; 4]> {
        let Some(row) = state.open_row_data().cloned() else {
            tracing::debug!(entity = %self.entity, ?action, "Row action without an open row");
            return smallvec![];
        };
        if !self.capabilities.get(action).evaluate(Some(&row)) {
            tracing::debug!(entity = %self.entity, ?action, "Row action not permitted for row");
            return smallvec![];
        }
        state.open_row = None;

        let handlers = &env.handlers;
        match action {
            RowAction::Edit | RowAction::Permissions => {
                let callback = if action == RowAction::Edit {
                    handlers.on_edit.clone()
                } else {
                    handlers.on_permissions.clone()
                };
                callback.map_or_else(SmallVec::new, |callback| {
                    smallvec![Effect::Future(Box::pin(async move {
                        callback(row);
                        None
                    }))]
                })
            },
            RowAction::Delete => {
                state.pending_delete = Some(row);
                smallvec![]
            },
            RowAction::Restore => match handlers.on_restore.clone() {
                Some(mutation) => {
                    smallvec![Self::mutate(state, RowAction::Restore, mutation, row)]
                },
                None => smallvec![],
            },
        }
    }

    fn mutate(
        state: &mut TableState,
        action: RowAction,
        mutation: RowMutation,
        row: Value,
    ) -> Effect<TableAction> {
        state.action_in_flight = Some(action);
        state.action_error = None;

        Effect::Future(Box::pin(async move {
            let result = mutation(row).await.map_err(|error| error.message());
            Some(TableAction::RowActionCompleted { action, result })
        }))
    }
}

impl Reducer for TableReducer {
    type State = TableState;
    type Action = TableAction;
    type Environment = TableEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            // ═══════════════════════════════════════════════════════════════
            // Query and fetching
            // ═══════════════════════════════════════════════════════════════
            TableAction::Mount | TableAction::Refresh => smallvec![self.fetch(state, env)],

            TableAction::QueryChanged(change) => {
                if state.query.merge(change) {
                    smallvec![self.fetch(state, env)]
                } else {
                    smallvec![]
                }
            },

            TableAction::FetchSucceeded { seq, page } => {
                if self.is_stale(state, seq) {
                    return smallvec![];
                }
                state.rows = page.list;
                state.total = page.total;
                state.status = FetchStatus::Ready;
                state.fetch_error = None;
                state.open_row = None;
                smallvec![]
            },

            TableAction::FetchFailed { seq, message } => {
                if self.is_stale(state, seq) {
                    return smallvec![];
                }
                tracing::warn!(entity = %self.entity, seq, error = %message, "Table fetch failed");
                metrics::counter!("table.fetch.failed").increment(1);

                state.rows.clear();
                state.total = 0;
                state.status = FetchStatus::Failed;
                state.fetch_error = Some(message);
                state.open_row = None;
                smallvec![]
            },

            // ═══════════════════════════════════════════════════════════════
            // Row actions
            // ═══════════════════════════════════════════════════════════════
            TableAction::OpenRowMenu(index) => {
                if index < state.rows.len() {
                    state.open_row = Some(index);
                }
                smallvec![]
            },

            TableAction::CloseRowMenu => {
                state.open_row = None;
                smallvec![]
            },

            TableAction::RequestRowAction(action) => self.row_action(state, action, env),

            TableAction::ConfirmDelete => {
                let Some(row) = state.pending_delete.take() else {
                    return smallvec![];
                };
                match env.handlers.on_delete.clone() {
                    Some(mutation) => smallvec![Self::mutate(state, RowAction::Delete, mutation, row)],
                    None => smallvec![],
                }
            },

            TableAction::CancelDelete => {
                state.pending_delete = None;
                smallvec![]
            },

            TableAction::RowActionCompleted { action, result } => {
                state.action_in_flight = None;
                match result {
                    Ok(()) => {
                        tracing::info!(entity = %self.entity, ?action, "Row action completed");
                        smallvec![self.fetch(state, env)]
                    },
                    Err(message) => {
                        tracing::warn!(entity = %self.entity, ?action, error = %message, "Row action failed");
                        state.action_error = Some(message);
                        smallvec![]
                    },
                }
            },

            TableAction::DismissActionError => {
                state.action_error = None;
                smallvec![]
            },

            // ═══════════════════════════════════════════════════════════════
            // Filter popover
            // ═══════════════════════════════════════════════════════════════
            TableAction::OpenFilters => {
                state.filters.open = true;
                state.filters.working = state.query.custom_filters.clone();
                smallvec![]
            },

            TableAction::SetWorkingFilter { key, value } => {
                if state.filters.open {
                    match value {
                        Some(value) => state.filters.working.insert(key, value),
                        None => state.filters.working.remove(&key),
                    };
                }
                smallvec![]
            },

            // Apply and reset only act on an open popover
            TableAction::ApplyFilters | TableAction::ResetFilters if !state.filters.open => smallvec![],

            TableAction::ApplyFilters => {
                let working = std::mem::take(&mut state.filters.working);
                self.commit_filters(state, working, env)
            },

            TableAction::ResetFilters => self.commit_filters(state, BTreeMap::new(), env),

            TableAction::CloseFilters => {
                state.filters.open = false;
                state.filters.working.clear();
                smallvec![]
            },
        }
    }
}
