//! List endpoint parameters.

use chrono::NaiveDate;
use lexdesk_http::QueryParams;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Ascending
    #[default]
    Asc,
    /// Descending
    Desc,
}

impl SortOrder {
    /// `Desc` when `desc` is true
    #[must_use]
    pub const fn from_desc(desc: bool) -> Self {
        if desc { Self::Desc } else { Self::Asc }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Asc => f.write_str("asc"),
            Self::Desc => f.write_str("desc"),
        }
    }
}

/// Parameters accepted by list endpoints.
///
/// Rendered in a fixed key order: `limit, page, search, sortBy, order`,
/// then the entity filters, then `extra` in insertion order. Unset fields
/// never appear in the query string.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    /// Page size
    pub limit: Option<u32>,
    /// 1-based page number
    pub page: Option<u32>,
    /// Free-text search
    pub search: Option<String>,
    /// Column to sort by
    pub sort_by: Option<String>,
    /// Sort direction
    pub order: Option<SortOrder>,
    /// Category filter
    pub category_id: Option<String>,
    /// Inclusive start date filter
    pub start_date: Option<NaiveDate>,
    /// Inclusive end date filter
    pub end_date: Option<NaiveDate>,
    /// Matter filter
    pub matter_id: Option<String>,
    /// Billable filter
    pub is_billable: Option<bool>,
    /// Additional filters, passed through verbatim
    #[serde(default)]
    pub extra: Vec<(String, Value)>,
}

impl ListParams {
    /// Empty parameters
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page size
    #[must_use]
    pub const fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Set the 1-based page number
    #[must_use]
    pub const fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    /// Set the search text
    #[must_use]
    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    /// Set the sort column and direction
    #[must_use]
    pub fn sort(mut self, column: impl Into<String>, order: SortOrder) -> Self {
        self.sort_by = Some(column.into());
        self.order = Some(order);
        self
    }

    /// Append a pass-through filter
    #[must_use]
    pub fn filter(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.push((key.into(), value));
        self
    }

    /// Fill any unset paging/sort field from `defaults`.
    #[must_use]
    pub fn or_defaults(mut self, defaults: &Self) -> Self {
        self.limit = self.limit.or(defaults.limit);
        self.page = self.page.or(defaults.page);
        if self.sort_by.as_deref().is_none_or(str::is_empty) {
            self.sort_by.clone_from(&defaults.sort_by);
        }
        self.order = self.order.or(defaults.order);
        self
    }

    /// Render as query parameters.
    #[must_use]
    pub fn to_query(&self) -> QueryParams {
        let mut query = QueryParams::new()
            .with_opt("limit", self.limit)
            .with_opt("page", self.page)
            .with_opt("search", self.search.as_deref())
            .with_opt("sortBy", self.sort_by.as_deref())
            .with_opt("order", self.order)
            .with_opt("categoryId", self.category_id.as_deref())
            .with_opt("startDate", self.start_date)
            .with_opt("endDate", self.end_date)
            .with_opt("matterId", self.matter_id.as_deref())
            .with_opt("isBillable", self.is_billable);

        for (key, value) in &self.extra {
            query.push_value(key, value);
        }

        query
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn renders_in_fixed_order_and_skips_unset() {
        let params = ListParams {
            search: Some(String::new()),
            matter_id: Some("m-1".into()),
            start_date: NaiveDate::from_ymd_opt(2024, 3, 1),
            is_billable: Some(false),
            ..ListParams::new().page(2).limit(25)
        };

        assert_eq!(
            params.to_query().to_query_string(),
            "limit=25&page=2&startDate=2024-03-01&matterId=m-1&isBillable=false"
        );
    }

    #[test]
    fn extra_filters_follow_entity_filters() {
        let params = ListParams::new()
            .sort("name", SortOrder::Desc)
            .filter("status", json!("active"))
            .filter("ownerId", Value::Null);

        assert_eq!(
            params.to_query().to_query_string(),
            "sortBy=name&order=desc&status=active"
        );
    }

    #[test]
    fn defaults_only_fill_gaps() {
        let defaults = ListParams::new()
            .limit(10)
            .page(1)
            .sort("updatedAt", SortOrder::Desc);
        let params = ListParams::new().limit(20).or_defaults(&defaults);

        assert_eq!(params.limit, Some(20));
        assert_eq!(params.page, Some(1));
        assert_eq!(params.sort_by.as_deref(), Some("updatedAt"));
        assert_eq!(params.order, Some(SortOrder::Desc));
    }
}
