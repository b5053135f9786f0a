//! Entity endpoints.
//!
//! One module per backend collection. List functions take [`ListParams`];
//! mutations take a JSON body and return the unwrapped payload.

use crate::params::ListParams;
use crate::resource::Resource;
use lexdesk_http::{HttpClient, Method, RequestBody, Result, multipart, unwrap_data};
use serde_json::Value;

/// Contacts (clients, opposing parties, witnesses)
pub mod contacts {
    use super::*;

    /// `/contacts`
    pub const RESOURCE: Resource = Resource::new("/contacts");

    /// List contacts.
    ///
    /// # Errors
    ///
    /// Returns the [`ApiError`](lexdesk_http::ApiError) from the client.
    pub async fn get_contacts(client: &HttpClient, params: &ListParams) -> Result<Value> {
        RESOURCE.list(client, params).await
    }

    /// Fetch one contact.
    ///
    /// # Errors
    ///
    /// Returns the [`ApiError`](lexdesk_http::ApiError) from the client.
    pub async fn get_contact(client: &HttpClient, id: &str) -> Result<Value> {
        RESOURCE.get(client, id).await
    }

    /// Create a contact.
    ///
    /// # Errors
    ///
    /// Returns the [`ApiError`](lexdesk_http::ApiError) from the client.
    pub async fn create_contact(client: &HttpClient, body: Value) -> Result<Value> {
        RESOURCE.create(client, body).await
    }

    /// Update a contact.
    ///
    /// # Errors
    ///
    /// Returns the [`ApiError`](lexdesk_http::ApiError) from the client.
    pub async fn update_contact(client: &HttpClient, id: &str, body: Value) -> Result<Value> {
        RESOURCE.update(client, id, body).await
    }

    /// Move a contact to the recycle bin.
    ///
    /// # Errors
    ///
    /// Returns the [`ApiError`](lexdesk_http::ApiError) from the client.
    pub async fn delete_contact(client: &HttpClient, id: &str) -> Result<Value> {
        RESOURCE.delete(client, id).await
    }
}

/// Matters (cases)
pub mod matters {
    use super::*;

    /// `/matters`
    pub const RESOURCE: Resource = Resource::new("/matters");

    /// List matters.
    ///
    /// # Errors
    ///
    /// Returns the [`ApiError`](lexdesk_http::ApiError) from the client.
    pub async fn get_matters(client: &HttpClient, params: &ListParams) -> Result<Value> {
        RESOURCE.list(client, params).await
    }

    /// Fetch one matter.
    ///
    /// # Errors
    ///
    /// Returns the [`ApiError`](lexdesk_http::ApiError) from the client.
    pub async fn get_matter(client: &HttpClient, id: &str) -> Result<Value> {
        RESOURCE.get(client, id).await
    }

    /// Open a matter.
    ///
    /// # Errors
    ///
    /// Returns the [`ApiError`](lexdesk_http::ApiError) from the client.
    pub async fn create_matter(client: &HttpClient, body: Value) -> Result<Value> {
        RESOURCE.create(client, body).await
    }

    /// Update a matter.
    ///
    /// # Errors
    ///
    /// Returns the [`ApiError`](lexdesk_http::ApiError) from the client.
    pub async fn update_matter(client: &HttpClient, id: &str, body: Value) -> Result<Value> {
        RESOURCE.update(client, id, body).await
    }

    /// Move a matter to the recycle bin.
    ///
    /// # Errors
    ///
    /// Returns the [`ApiError`](lexdesk_http::ApiError) from the client.
    pub async fn delete_matter(client: &HttpClient, id: &str) -> Result<Value> {
        RESOURCE.delete(client, id).await
    }
}

/// Time entries
pub mod time_entries {
    use super::*;

    /// `/time-entries`
    pub const RESOURCE: Resource = Resource::new("/time-entries");

    /// List time entries. Honours `matter_id`, `is_billable`, `start_date`
    /// and `end_date`.
    ///
    /// # Errors
    ///
    /// Returns the [`ApiError`](lexdesk_http::ApiError) from the client.
    pub async fn get_time_entries(client: &HttpClient, params: &ListParams) -> Result<Value> {
        RESOURCE.list(client, params).await
    }

    /// Record time.
    ///
    /// # Errors
    ///
    /// Returns the [`ApiError`](lexdesk_http::ApiError) from the client.
    pub async fn create_time_entry(client: &HttpClient, body: Value) -> Result<Value> {
        RESOURCE.create(client, body).await
    }

    /// Update a time entry.
    ///
    /// # Errors
    ///
    /// Returns the [`ApiError`](lexdesk_http::ApiError) from the client.
    pub async fn update_time_entry(client: &HttpClient, id: &str, body: Value) -> Result<Value> {
        RESOURCE.update(client, id, body).await
    }

    /// Delete a time entry.
    ///
    /// # Errors
    ///
    /// Returns the [`ApiError`](lexdesk_http::ApiError) from the client.
    pub async fn delete_time_entry(client: &HttpClient, id: &str) -> Result<Value> {
        RESOURCE.delete(client, id).await
    }
}

/// Invoice line items
pub mod invoices {
    use super::*;

    /// `/invoice-line-items`
    pub const RESOURCE: Resource = Resource::new("/invoice-line-items");

    /// List line items, usually filtered by matter.
    ///
    /// # Errors
    ///
    /// Returns the [`ApiError`](lexdesk_http::ApiError) from the client.
    pub async fn get_invoice_line_items(client: &HttpClient, params: &ListParams) -> Result<Value> {
        RESOURCE.list(client, params).await
    }

    /// Add a line item.
    ///
    /// # Errors
    ///
    /// Returns the [`ApiError`](lexdesk_http::ApiError) from the client.
    pub async fn create_invoice_line_item(client: &HttpClient, body: Value) -> Result<Value> {
        RESOURCE.create(client, body).await
    }

    /// Update a line item.
    ///
    /// # Errors
    ///
    /// Returns the [`ApiError`](lexdesk_http::ApiError) from the client.
    pub async fn update_invoice_line_item(
        client: &HttpClient,
        id: &str,
        body: Value,
    ) -> Result<Value> {
        RESOURCE.update(client, id, body).await
    }

    /// Remove a line item.
    ///
    /// # Errors
    ///
    /// Returns the [`ApiError`](lexdesk_http::ApiError) from the client.
    pub async fn delete_invoice_line_item(client: &HttpClient, id: &str) -> Result<Value> {
        RESOURCE.delete(client, id).await
    }
}

/// Firm users
pub mod users {
    use super::*;
    use crate::model::Permission;

    /// `/users`
    pub const RESOURCE: Resource = Resource::new("/users");

    /// List users.
    ///
    /// # Errors
    ///
    /// Returns the [`ApiError`](lexdesk_http::ApiError) from the client.
    pub async fn get_users(client: &HttpClient, params: &ListParams) -> Result<Value> {
        RESOURCE.list(client, params).await
    }

    /// Fetch one user.
    ///
    /// # Errors
    ///
    /// Returns the [`ApiError`](lexdesk_http::ApiError) from the client.
    pub async fn get_user(client: &HttpClient, id: &str) -> Result<Value> {
        RESOURCE.get(client, id).await
    }

    /// Invite a user.
    ///
    /// # Errors
    ///
    /// Returns the [`ApiError`](lexdesk_http::ApiError) from the client.
    pub async fn create_user(client: &HttpClient, body: Value) -> Result<Value> {
        RESOURCE.create(client, body).await
    }

    /// Update a user.
    ///
    /// # Errors
    ///
    /// Returns the [`ApiError`](lexdesk_http::ApiError) from the client.
    pub async fn update_user(client: &HttpClient, id: &str, body: Value) -> Result<Value> {
        RESOURCE.update(client, id, body).await
    }

    /// Deactivate a user.
    ///
    /// # Errors
    ///
    /// Returns the [`ApiError`](lexdesk_http::ApiError) from the client.
    pub async fn delete_user(client: &HttpClient, id: &str) -> Result<Value> {
        RESOURCE.delete(client, id).await
    }

    /// Replace a user's module grants.
    ///
    /// # Errors
    ///
    /// Returns the [`ApiError`](lexdesk_http::ApiError) from the client.
    pub async fn update_user_permissions(
        client: &HttpClient,
        id: &str,
        permissions: &[Permission],
    ) -> Result<Value> {
        let body = serde_json::json!({ "permissions": permissions });
        client
            .patch(&format!("{}/permissions", RESOURCE.item_path(id)), body)
            .await
            .map(unwrap_data)
    }

    /// Upload a profile image as multipart form data.
    ///
    /// # Errors
    ///
    /// Returns the [`ApiError`](lexdesk_http::ApiError) from the client.
    pub async fn upload_profile_image(
        client: &HttpClient,
        id: &str,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<Value> {
        let part = multipart::Part::bytes(bytes).file_name(file_name.to_string());
        let form = multipart::Form::new().part("profileImage", part);
        client
            .send(
                Method::PATCH,
                &format!("{}/profile-image", RESOURCE.item_path(id)),
                RequestBody::Multipart(form),
            )
            .await
            .map(unwrap_data)
    }
}

/// Roles and their default grants
pub mod roles {
    use super::*;

    /// `/roles`
    pub const RESOURCE: Resource = Resource::new("/roles");

    /// List roles.
    ///
    /// # Errors
    ///
    /// Returns the [`ApiError`](lexdesk_http::ApiError) from the client.
    pub async fn get_roles(client: &HttpClient, params: &ListParams) -> Result<Value> {
        RESOURCE.list(client, params).await
    }

    /// Default grants attached to a role.
    ///
    /// # Errors
    ///
    /// Returns the [`ApiError`](lexdesk_http::ApiError) from the client.
    pub async fn get_role_permissions(client: &HttpClient, id: &str) -> Result<Value> {
        client
            .get(
                &format!("{}/permissions", RESOURCE.item_path(id)),
                &lexdesk_http::QueryParams::new(),
            )
            .await
            .map(unwrap_data)
    }
}

/// Firm-wide settings
pub mod firm_settings {
    use super::*;

    /// `/firm-settings`
    pub const PATH: &str = "/firm-settings";

    /// Current settings.
    ///
    /// # Errors
    ///
    /// Returns the [`ApiError`](lexdesk_http::ApiError) from the client.
    pub async fn get_firm_settings(client: &HttpClient) -> Result<Value> {
        client
            .get(PATH, &lexdesk_http::QueryParams::new())
            .await
            .map(unwrap_data)
    }

    /// Update settings.
    ///
    /// # Errors
    ///
    /// Returns the [`ApiError`](lexdesk_http::ApiError) from the client.
    pub async fn update_firm_settings(client: &HttpClient, body: Value) -> Result<Value> {
        client.patch(PATH, body).await.map(unwrap_data)
    }
}
