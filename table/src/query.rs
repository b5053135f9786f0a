//! Query tuple driving a single list fetch.

use lexdesk_services::{ListParams, SortOrder};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// One sort rule. Only the first rule is sent to the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortingRule {
    /// Column id
    pub id: String,
    /// Descending
    pub desc: bool,
}

/// Per-column filter from the table widget
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnFilter {
    /// Column id
    pub id: String,
    /// Filter value
    pub value: Value,
}

/// Pagination, sort, filter and search state of one table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableQuery {
    /// 0-based page
    pub page_index: usize,
    /// Rows per page, always at least 1
    pub page_size: usize,
    /// Sort rules
    pub sorting: Vec<SortingRule>,
    /// Widget column filters
    pub column_filters: Vec<ColumnFilter>,
    /// Free-text search
    pub global_filter: String,
    /// Filters committed from the filter popover
    pub custom_filters: BTreeMap<String, Value>,
}

impl TableQuery {
    /// First page with `page_size` rows
    #[must_use]
    pub fn with_page_size(page_size: usize) -> Self {
        Self {
            page_index: 0,
            page_size: page_size.max(1),
            sorting: Vec::new(),
            column_filters: Vec::new(),
            global_filter: String::new(),
            custom_filters: BTreeMap::new(),
        }
    }

    /// Merge `change` in. Returns whether the tuple changed.
    pub fn merge(&mut self, change: QueryChange) -> bool {
        let before = self.clone();

        if let Some(page_index) = change.page_index {
            self.page_index = page_index;
        }
        if let Some(page_size) = change.page_size {
            self.page_size = page_size.max(1);
        }
        if let Some(sorting) = change.sorting {
            self.sorting = sorting;
        }
        if let Some(column_filters) = change.column_filters {
            self.column_filters = column_filters;
        }
        if let Some(global_filter) = change.global_filter {
            self.global_filter = global_filter;
        }
        if let Some(custom_filters) = change.custom_filters {
            self.custom_filters = custom_filters;
        }

        *self != before
    }

    /// Backend parameters for a typed service.
    ///
    /// `page` is 1-based, `sortBy` falls back to `default_sort`, custom
    /// filters are appended verbatim.
    #[must_use]
    pub fn to_list_params(&self, default_sort: &str) -> ListParams {
        let (sort_by, order) = self.sorting.first().map_or_else(
            || (default_sort.to_string(), SortOrder::Asc),
            |rule| (rule.id.clone(), SortOrder::from_desc(rule.desc)),
        );

        let mut params = ListParams::new()
            .limit(u32::try_from(self.page_size).unwrap_or(u32::MAX))
            .page(u32::try_from(self.page_index.saturating_add(1)).unwrap_or(u32::MAX))
            .search(self.global_filter.clone())
            .sort(sort_by, order);

        for (key, value) in &self.custom_filters {
            params = params.filter(key.clone(), value.clone());
        }
        params
    }

    /// 1-based number of the row at `in_page_index` on the current page
    #[must_use]
    pub const fn row_number(&self, in_page_index: usize) -> usize {
        self.page_index
            .saturating_mul(self.page_size)
            .saturating_add(in_page_index)
            .saturating_add(1)
    }
}

/// Partial update of a [`TableQuery`]; `None` fields are kept.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryChange {
    /// New page
    pub page_index: Option<usize>,
    /// New page size
    pub page_size: Option<usize>,
    /// New sort rules
    pub sorting: Option<Vec<SortingRule>>,
    /// New column filters
    pub column_filters: Option<Vec<ColumnFilter>>,
    /// New search text
    pub global_filter: Option<String>,
    /// New committed filters
    pub custom_filters: Option<BTreeMap<String, Value>>,
}

impl QueryChange {
    /// Go to page `index`
    #[must_use]
    pub fn page_index(index: usize) -> Self {
        Self {
            page_index: Some(index),
            ..Self::default()
        }
    }

    /// Change rows per page
    #[must_use]
    pub fn page_size(size: usize) -> Self {
        Self {
            page_size: Some(size),
            ..Self::default()
        }
    }

    /// Replace the sort rules
    #[must_use]
    pub fn sorting(sorting: Vec<SortingRule>) -> Self {
        Self {
            sorting: Some(sorting),
            ..Self::default()
        }
    }

    /// Replace the search text
    #[must_use]
    pub fn global_filter(text: impl Into<String>) -> Self {
        Self {
            global_filter: Some(text.into()),
            ..Self::default()
        }
    }

    /// Replace the committed filters
    #[must_use]
    pub fn custom_filters(filters: BTreeMap<String, Value>) -> Self {
        Self {
            custom_filters: Some(filters),
            ..Self::default()
        }
    }
}
