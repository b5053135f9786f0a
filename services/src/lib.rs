//! # Lexdesk Services
//!
//! Thin backend wrappers. Each function issues exactly one request through
//! the shared [`HttpClient`](lexdesk_http::HttpClient), unwraps the `data`
//! envelope when present and returns an
//! [`ApiError`](lexdesk_http::ApiError) on any failure.
//!
//! ```ignore
//! use lexdesk_services::{ListParams, recyclebin};
//!
//! let page = recyclebin::get_recyclebin(&client, ListParams::new().search("invoice")).await?;
//! ```

pub mod auth;
pub mod entities;
pub mod model;
pub mod params;
pub mod recyclebin;
pub mod reference;
pub mod resource;

pub use entities::{contacts, firm_settings, invoices, matters, roles, time_entries, users};
pub use model::{
    AuthPayload, LabelValue, LoginStep, Permission, PermissionAction, PermissionActions,
    UserProfile,
};
pub use params::{ListParams, SortOrder};
pub use reference::ReferenceKind;
pub use resource::{ListService, Resource};
