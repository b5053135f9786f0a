//! Backend HTTP client

use crate::{
    error::{ApiError, Result},
    query::QueryParams,
};
use lexdesk_core::{DurableStorage, Navigator, TOKEN_KEY};
use reqwest::{Client, Method, StatusCode, multipart::Form};
use serde_json::Value;
use std::{fmt, sync::Arc, time::Duration};

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection settings for [`HttpClient`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpConfig {
    /// Base URL every request path is joined onto
    pub base_url: String,
    /// Fixed per-request timeout
    pub timeout: Duration,
    /// Where to send the user when their session expires
    pub sign_in_path: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:4000/api/v1".to_string(),
            timeout: DEFAULT_TIMEOUT,
            sign_in_path: "/sign-in".to_string(),
        }
    }
}

/// Request payload
#[derive(Debug, Default)]
pub enum RequestBody {
    /// No body
    #[default]
    Empty,
    /// JSON body, sent with `application/json`
    Json(Value),
    /// Multipart body; the transport chooses the content type and boundary
    Multipart(Form),
}

/// A response that made it back from the server, whatever its status
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: u16,
    /// Decoded body: JSON if it parsed, a string otherwise, `Null` if empty
    pub body: Value,
}

impl HttpResponse {
    /// Whether the status is 2xx
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Body on success, [`ApiError`] carrying the server's message otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Unauthorized`] for 401 and [`ApiError::Server`]
    /// for any other non-2xx status.
    pub fn into_result(self) -> Result<Value> {
        if self.is_success() {
            Ok(self.body)
        } else {
            Err(ApiError::from_response(self.status, &self.body))
        }
    }
}

/// Callback run after the adapter has handled a 401
pub type UnauthorizedHook = Arc<dyn Fn() + Send + Sync>;

/// Shared HTTP client for every service function.
///
/// Reads the bearer token from durable storage on each request, so a token
/// written by the store is picked up without rebuilding the client. Every
/// 401 purges the token and redirects to the sign-in page unless the user is
/// already there.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
    timeout: Duration,
    sign_in_path: String,
    storage: Arc<dyn DurableStorage>,
    navigator: Arc<dyn Navigator>,
    on_unauthorized: Option<UnauthorizedHook>,
}

impl fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpClient")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("sign_in_path", &self.sign_in_path)
            .finish_non_exhaustive()
    }
}

impl HttpClient {
    /// Create a client.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidRequest`] if the TLS backend cannot be
    /// initialised.
    pub fn new(
        config: HttpConfig,
        storage: Arc<dyn DurableStorage>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ApiError::InvalidRequest(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout: config.timeout,
            sign_in_path: config.sign_in_path,
            storage,
            navigator,
            on_unauthorized: None,
        })
    }

    /// Run `hook` after every 401 has been handled.
    #[must_use]
    pub fn with_unauthorized_hook(mut self, hook: UnauthorizedHook) -> Self {
        self.on_unauthorized = Some(hook);
        self
    }

    /// Base URL without a trailing slash
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Issue one request.
    ///
    /// Any status that comes back is returned as an [`HttpResponse`]; only
    /// transport failures and timeouts are errors here.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Timeout`] when the fixed timeout elapses and
    /// [`ApiError::Network`] when the transport fails.
    #[tracing::instrument(skip(self, body, headers), fields(method = %method))]
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: RequestBody,
        headers: &[(&str, &str)],
    ) -> Result<HttpResponse> {
        let mut builder = self.client.request(method.clone(), self.url(path));

        if let Some(token) = self.storage.get(TOKEN_KEY).filter(|t| !t.is_empty()) {
            builder = builder.bearer_auth(token);
        }

        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }

        builder = match body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(&value),
            RequestBody::Multipart(form) => builder.multipart(form),
        };

        let response = builder.send().await.map_err(|e| self.transport_error(e))?;
        let status = response.status();

        metrics::counter!(
            "http.requests.total",
            "method" => method.as_str().to_owned(),
            "status" => status.as_u16().to_string()
        )
        .increment(1);

        if status == StatusCode::UNAUTHORIZED {
            self.handle_unauthorized();
        }

        let text = response.text().await.map_err(|e| self.transport_error(e))?;
        tracing::debug!(status = status.as_u16(), "Response received");

        Ok(HttpResponse {
            status: status.as_u16(),
            body: decode_body(&text),
        })
    }

    /// `GET path?query`, failing on non-2xx.
    ///
    /// # Errors
    ///
    /// See [`request`](Self::request) and [`HttpResponse::into_result`].
    pub async fn get(&self, path: &str, query: &QueryParams) -> Result<Value> {
        self.send(Method::GET, &query.apply_to(path), RequestBody::Empty)
            .await
    }

    /// `POST` a JSON body, failing on non-2xx.
    ///
    /// # Errors
    ///
    /// See [`request`](Self::request) and [`HttpResponse::into_result`].
    pub async fn post(&self, path: &str, body: Value) -> Result<Value> {
        self.send(Method::POST, path, RequestBody::Json(body)).await
    }

    /// `PATCH` a JSON body, failing on non-2xx.
    ///
    /// # Errors
    ///
    /// See [`request`](Self::request) and [`HttpResponse::into_result`].
    pub async fn patch(&self, path: &str, body: Value) -> Result<Value> {
        self.send(Method::PATCH, path, RequestBody::Json(body)).await
    }

    /// `DELETE path`, failing on non-2xx.
    ///
    /// # Errors
    ///
    /// See [`request`](Self::request) and [`HttpResponse::into_result`].
    pub async fn delete(&self, path: &str) -> Result<Value> {
        self.send(Method::DELETE, path, RequestBody::Empty).await
    }

    /// Issue a request with any body, failing on non-2xx.
    ///
    /// # Errors
    ///
    /// See [`request`](Self::request) and [`HttpResponse::into_result`].
    pub async fn send(&self, method: Method, path: &str, body: RequestBody) -> Result<Value> {
        self.request(method, path, body, &[]).await?.into_result()
    }

    fn transport_error(&self, error: reqwest::Error) -> ApiError {
        if error.is_timeout() {
            tracing::warn!(timeout = ?self.timeout, "Request timed out");
            ApiError::Timeout(self.timeout)
        } else {
            tracing::warn!(error = %error, "Request failed");
            error.into()
        }
    }

    fn handle_unauthorized(&self) {
        metrics::counter!("http.unauthorized.total").increment(1);
        self.storage.remove(TOKEN_KEY);

        let current = self.navigator.current_path();
        if current == self.sign_in_path {
            tracing::debug!("Unauthorized on sign-in page, not redirecting");
        } else {
            tracing::info!(from = %current, to = %self.sign_in_path, "Session expired, redirecting");
            self.navigator.redirect(&self.sign_in_path);
        }

        if let Some(hook) = &self.on_unauthorized {
            hook();
        }
    }
}

fn decode_body(text: &str) -> Value {
    if text.trim().is_empty() {
        Value::Null
    } else {
        serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_body() {
        assert_eq!(decode_body(""), Value::Null);
        assert_eq!(decode_body("{\"ok\":true}"), json!({"ok": true}));
        assert_eq!(decode_body("Bad Gateway"), json!("Bad Gateway"));
    }

    #[test]
    fn test_response_into_result() {
        let ok = HttpResponse {
            status: 204,
            body: Value::Null,
        };
        assert_eq!(ok.into_result(), Ok(Value::Null));

        let failed = HttpResponse {
            status: 404,
            body: json!({"message": "Matter not found"}),
        };
        assert_eq!(
            failed.into_result().map_err(|e| e.message()),
            Err("Matter not found".to_string())
        );
    }

    #[test]
    fn test_default_config() {
        let config = HttpConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.sign_in_path, "/sign-in");
    }
}
