//! Where a table gets its rows from.

use crate::query::TableQuery;
use lexdesk_core::BoxFuture;
use lexdesk_http::{ApiError, HttpClient, ListPage, normalize_list};
use lexdesk_services::ListService;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Caller-supplied fetch that receives the raw query tuple.
pub type RequestOverride =
    Arc<dyn Fn(TableQuery) -> BoxFuture<'static, Result<Value, ApiError>> + Send + Sync>;

/// The candidate data sources of a table.
///
/// Several may be supplied; exactly one is used per fetch, picked in
/// priority order: request override, typed service, raw URL. With none,
/// every fetch yields an empty page.
#[derive(Clone, Default)]
pub struct DataSource {
    request: Option<RequestOverride>,
    service: Option<ListService>,
    url: Option<(HttpClient, String)>,
}

impl fmt::Debug for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataSource")
            .field("request", &self.request.is_some())
            .field("service", &self.service.is_some())
            .field("url", &self.url.as_ref().map(|(_, url)| url))
            .finish()
    }
}

/// The source chosen for one fetch
#[derive(Clone)]
pub enum ResolvedSource {
    /// Request override
    Request(RequestOverride),
    /// Typed service with synthesized parameters
    Service(ListService),
    /// `POST` of the query tuple to a URL
    Url(HttpClient, String),
    /// Nothing configured
    Empty,
}

impl ResolvedSource {
    /// Short name for logs
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Request(_) => "request",
            Self::Service(_) => "service",
            Self::Url(..) => "url",
            Self::Empty => "empty",
        }
    }

    /// Fetch and normalize one page.
    ///
    /// # Errors
    ///
    /// Returns whatever the underlying source failed with.
    pub async fn fetch(self, query: TableQuery, default_sort: String) -> Result<ListPage, ApiError> {
        let raw = match self {
            Self::Request(request) => request(query).await?,
            Self::Service(service) => service(query.to_list_params(&default_sort)).await?,
            Self::Url(client, url) => {
                let body = serde_json::to_value(&query)
                    .map_err(|e| ApiError::InvalidRequest(e.to_string()))?;
                client.post(&url, body).await?
            },
            Self::Empty => return Ok(ListPage::empty()),
        };
        Ok(normalize_list(raw))
    }
}

impl DataSource {
    /// No sources
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `request` for every fetch
    #[must_use]
    pub fn with_request(mut self, request: RequestOverride) -> Self {
        self.request = Some(request);
        self
    }

    /// Call a typed list service
    #[must_use]
    pub fn with_service(mut self, service: ListService) -> Self {
        self.service = Some(service);
        self
    }

    /// `POST` the query tuple to `url`
    #[must_use]
    pub fn with_url(mut self, client: HttpClient, url: impl Into<String>) -> Self {
        self.url = Some((client, url.into()));
        self
    }

    /// Pick the source for the next fetch
    #[must_use]
    pub fn resolve(&self) -> ResolvedSource {
        if let Some(request) = &self.request {
            ResolvedSource::Request(Arc::clone(request))
        } else if let Some(service) = &self.service {
            ResolvedSource::Service(Arc::clone(service))
        } else if let Some((client, url)) = &self.url {
            ResolvedSource::Url(client.clone(), url.clone())
        } else {
            ResolvedSource::Empty
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code
mod tests {
    use super::*;
    use serde_json::json;

    fn request() -> RequestOverride {
        Arc::new(|_query| -> BoxFuture<'static, Result<Value, ApiError>> {
            Box::pin(async { Ok(json!({"list": [{"id": "r"}], "total": 1})) })
        })
    }

    fn service() -> ListService {
        Arc::new(|params: lexdesk_services::ListParams| -> BoxFuture<'static, Result<Value, ApiError>> {
            Box::pin(async move {
                Ok(json!({"data": {"list": [{"page": params.page}], "pagination": {"total": 7}}}))
            })
        })
    }

    #[test]
    fn priority_order() {
        let all = DataSource::new().with_service(service()).with_request(request());
        assert_eq!(all.resolve().name(), "request");

        let service_only = DataSource::new().with_service(service());
        assert_eq!(service_only.resolve().name(), "service");

        assert_eq!(DataSource::new().resolve().name(), "empty");
    }

    #[tokio::test]
    async fn service_receives_one_based_page() {
        let mut query = TableQuery::with_page_size(10);
        query.page_index = 3;

        let page = DataSource::new()
            .with_service(service())
            .resolve()
            .fetch(query, "createdAt".into())
            .await
            .unwrap();

        assert_eq!(page.total, 7);
        assert_eq!(page.list, vec![json!({"page": 4})]);
    }

    #[tokio::test]
    async fn empty_source_yields_empty_page() {
        let page = ResolvedSource::Empty
            .fetch(TableQuery::with_page_size(10), String::new())
            .await
            .unwrap();
        assert_eq!(page, ListPage::empty());
    }
}
