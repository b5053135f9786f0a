//! Dependencies injected into the store reducers.

use lexdesk_core::{BoxFuture, DurableStorage};
use lexdesk_http::{ApiError, HttpClient};
use lexdesk_services::{LabelValue, ReferenceKind, reference};
use std::sync::Arc;

/// Source of reference-data lists.
pub trait ReferenceSource: Send + Sync {
    /// Fetch the options for `kind`
    fn fetch(&self, kind: ReferenceKind) -> BoxFuture<'static, Result<Vec<LabelValue>, ApiError>>;
}

/// [`ReferenceSource`] backed by the reference endpoints.
#[derive(Debug, Clone)]
pub struct HttpReferenceSource {
    client: HttpClient,
}

impl HttpReferenceSource {
    /// Fetch through `client`
    #[must_use]
    pub const fn new(client: HttpClient) -> Self {
        Self { client }
    }
}

impl ReferenceSource for HttpReferenceSource {
    fn fetch(&self, kind: ReferenceKind) -> BoxFuture<'static, Result<Vec<LabelValue>, ApiError>> {
        let client = self.client.clone();
        Box::pin(async move { reference::get_reference(&client, kind).await })
    }
}

/// Store environment.
#[derive(Clone)]
pub struct AppEnvironment {
    /// Durable storage for the token mirror and the persisted slice
    pub storage: Arc<dyn DurableStorage>,
    /// Where reference lists come from
    pub reference: Arc<dyn ReferenceSource>,
}

impl AppEnvironment {
    /// Create an environment
    #[must_use]
    pub fn new(storage: Arc<dyn DurableStorage>, reference: Arc<dyn ReferenceSource>) -> Self {
        Self { storage, reference }
    }
}
