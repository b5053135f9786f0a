//! # Lexdesk HTTP
//!
//! The HTTP client adapter every service function goes through.
//!
//! - [`HttpClient`] attaches the bearer token from durable storage, enforces
//!   a fixed timeout and handles session expiry (401) globally.
//! - [`ApiError`] is the failure taxonomy surfaced to callers.
//! - [`QueryParams`] builds query strings from optional values.
//! - [`Envelope`] and [`normalize_list`] deal with the backend's
//!   `{ data: ... }` wrappers.
//!
//! ## Example
//!
//! ```ignore
//! use lexdesk_http::{HttpClient, HttpConfig, QueryParams, normalize_list};
//!
//! let client = HttpClient::new(HttpConfig::default(), storage, navigator)?;
//! let body = client.get("/contacts", &QueryParams::new().with("page", 1)).await?;
//! let page = normalize_list(body);
//! ```

pub mod client;
pub mod envelope;
pub mod error;
pub mod query;

pub use client::{HttpClient, HttpConfig, HttpResponse, RequestBody, UnauthorizedHook};
pub use envelope::{Envelope, ListPage, normalize_list, unwrap_data};
pub use error::{ApiError, NETWORK_ERROR_MESSAGE, Result};
pub use query::QueryParams;

pub use reqwest::{Method, multipart};
