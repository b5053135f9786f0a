//! Generic REST resource.
//!
//! Every entity endpoint follows the same CRUD layout under one base path,
//! so the per-entity modules are thin names over a [`Resource`].

use crate::params::ListParams;
use lexdesk_core::BoxFuture;
use lexdesk_http::{HttpClient, Result, unwrap_data};
use serde_json::Value;
use std::sync::Arc;

/// Typed list function the table controller can call.
pub type ListService = Arc<dyn Fn(ListParams) -> BoxFuture<'static, Result<Value>> + Send + Sync>;

/// CRUD endpoint rooted at `path`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resource {
    path: &'static str,
}

impl Resource {
    /// Resource at `path` (e.g. `/contacts`)
    #[must_use]
    pub const fn new(path: &'static str) -> Self {
        Self { path }
    }

    /// Collection path
    #[must_use]
    pub const fn path(&self) -> &'static str {
        self.path
    }

    /// Path of one record
    #[must_use]
    pub fn item_path(&self, id: &str) -> String {
        format!("{}/{id}", self.path)
    }

    /// `GET path?params`, unwrapped.
    ///
    /// # Errors
    ///
    /// Returns the [`ApiError`](lexdesk_http::ApiError) from the client.
    #[tracing::instrument(skip(self, client, params), fields(path = self.path))]
    pub async fn list(&self, client: &HttpClient, params: &ListParams) -> Result<Value> {
        client
            .get(self.path, &params.to_query())
            .await
            .map(unwrap_data)
    }

    /// `GET path/id`, unwrapped.
    ///
    /// # Errors
    ///
    /// Returns the [`ApiError`](lexdesk_http::ApiError) from the client.
    pub async fn get(&self, client: &HttpClient, id: &str) -> Result<Value> {
        client
            .get(&self.item_path(id), &lexdesk_http::QueryParams::new())
            .await
            .map(unwrap_data)
    }

    /// `POST path` with a JSON body, unwrapped.
    ///
    /// # Errors
    ///
    /// Returns the [`ApiError`](lexdesk_http::ApiError) from the client.
    #[tracing::instrument(skip(self, client, body), fields(path = self.path))]
    pub async fn create(&self, client: &HttpClient, body: Value) -> Result<Value> {
        client.post(self.path, body).await.map(unwrap_data)
    }

    /// `PATCH path/id` with a JSON body, unwrapped.
    ///
    /// # Errors
    ///
    /// Returns the [`ApiError`](lexdesk_http::ApiError) from the client.
    #[tracing::instrument(skip(self, client, body), fields(path = self.path))]
    pub async fn update(&self, client: &HttpClient, id: &str, body: Value) -> Result<Value> {
        client
            .patch(&self.item_path(id), body)
            .await
            .map(unwrap_data)
    }

    /// `DELETE path/id`, unwrapped.
    ///
    /// # Errors
    ///
    /// Returns the [`ApiError`](lexdesk_http::ApiError) from the client.
    #[tracing::instrument(skip(self, client), fields(path = self.path))]
    pub async fn delete(&self, client: &HttpClient, id: &str) -> Result<Value> {
        client.delete(&self.item_path(id)).await.map(unwrap_data)
    }

    /// Bind [`list`](Self::list) to `client` for use as a table data source.
    #[must_use]
    pub fn list_service(self, client: HttpClient) -> ListService {
        Arc::new(move |params: ListParams| -> BoxFuture<'static, Result<Value>> {
            let client = client.clone();
            Box::pin(async move { self.list(&client, &params).await })
        })
    }
}
