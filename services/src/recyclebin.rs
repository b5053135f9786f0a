//! Recycle bin: soft-deleted records across all modules.

use crate::params::{ListParams, SortOrder};
use crate::resource::Resource;
use lexdesk_http::{HttpClient, Result, unwrap_data};
use serde_json::{Value, json};

/// `/recyclebin`
pub const RESOURCE: Resource = Resource::new("/recyclebin");

/// Paging and sort used when the caller leaves them unset
#[must_use]
pub fn default_params() -> ListParams {
    ListParams::new()
        .limit(10)
        .page(1)
        .sort("updatedAt", SortOrder::Desc)
}

/// List deleted records, most recently deleted first by default.
///
/// # Errors
///
/// Returns the [`ApiError`](lexdesk_http::ApiError) from the client.
pub async fn get_recyclebin(client: &HttpClient, params: ListParams) -> Result<Value> {
    let params = params.or_defaults(&default_params());
    RESOURCE.list(client, &params).await
}

/// Restore a deleted record.
///
/// # Errors
///
/// Returns the [`ApiError`](lexdesk_http::ApiError) from the client.
pub async fn restore_recyclebin_item(client: &HttpClient, id: &str) -> Result<Value> {
    client
        .patch(&format!("{}/restore", RESOURCE.item_path(id)), json!({}))
        .await
        .map(unwrap_data)
}

/// Permanently delete a record.
///
/// # Errors
///
/// Returns the [`ApiError`](lexdesk_http::ApiError) from the client.
pub async fn delete_recyclebin_item(client: &HttpClient, id: &str) -> Result<Value> {
    RESOURCE.delete(client, id).await
}
