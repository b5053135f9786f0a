//! Column synthesis.

use crate::capability::RowCapabilities;
use crate::query::TableQuery;
use serde_json::Value;

/// Id of the synthesized row-number column
pub const ROW_NUMBER_COLUMN: &str = "rowNumber";

/// Id of the synthesized actions column
pub const ACTIONS_COLUMN: &str = "actions";

/// A data column supplied by the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSpec {
    /// Column id, also the sort key sent to the backend
    pub id: String,
    /// Header text
    pub header: String,
    /// Dot path into the row (`client.name`); defaults to `id`
    pub accessor: Option<String>,
    /// Whether the widget may sort by it
    pub sortable: bool,
}

impl ColumnSpec {
    /// Sortable column reading field `id`
    #[must_use]
    pub fn new(id: impl Into<String>, header: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            header: header.into(),
            accessor: None,
            sortable: true,
        }
    }

    /// Read the value from a dot path instead of `id`
    #[must_use]
    pub fn accessor(mut self, path: impl Into<String>) -> Self {
        self.accessor = Some(path.into());
        self
    }

    /// Disable sorting
    #[must_use]
    pub const fn unsortable(mut self) -> Self {
        self.sortable = false;
        self
    }
}

/// What a rendered column shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnKind {
    /// Absolute row number
    RowNumber,
    /// Page-supplied column
    Data(ColumnSpec),
    /// Action-menu trigger
    Actions,
}

/// A column as handed to the table widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    /// Column id
    pub id: String,
    /// Header text
    pub header: String,
    /// Content
    pub kind: ColumnKind,
}

impl Column {
    /// Cell value for `row`, which sits at `in_page_index` on the current page.
    ///
    /// The actions column has no value; it renders a menu trigger.
    #[must_use]
    pub fn cell(&self, row: &Value, in_page_index: usize, query: &TableQuery) -> Value {
        match &self.kind {
            ColumnKind::RowNumber => Value::from(query.row_number(in_page_index)),
            ColumnKind::Data(spec) => {
                lookup(row, spec.accessor.as_deref().unwrap_or(&spec.id)).clone()
            },
            ColumnKind::Actions => Value::Null,
        }
    }
}

/// Build the widget columns from the page's specs.
///
/// Prepends a row-number column when `row_numbers` is set and appends one
/// actions column when any row action could apply to the entity.
#[must_use]
pub fn synthesize_columns(
    specs: &[ColumnSpec],
    row_numbers: bool,
    capabilities: &RowCapabilities,
) -> Vec<Column> {
    let mut columns = Vec::with_capacity(specs.len() + 2);

    if row_numbers {
        columns.push(Column {
            id: ROW_NUMBER_COLUMN.to_string(),
            header: "#".to_string(),
            kind: ColumnKind::RowNumber,
        });
    }

    columns.extend(specs.iter().map(|spec| Column {
        id: spec.id.clone(),
        header: spec.header.clone(),
        kind: ColumnKind::Data(spec.clone()),
    }));

    if capabilities.any_enabled() {
        columns.push(Column {
            id: ACTIONS_COLUMN.to_string(),
            header: "Actions".to_string(),
            kind: ColumnKind::Actions,
        });
    }

    columns
}

fn lookup<'a>(row: &'a Value, path: &str) -> &'a Value {
    path.split('.')
        .try_fold(row, |value, segment| match value {
            Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            other => other.get(segment),
        })
        .unwrap_or(&Value::Null)
}
