//! Error types for backend calls.

use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Message surfaced when the server gave us nothing better.
pub const NETWORK_ERROR_MESSAGE: &str = "Network error. Please try again.";

/// Result type alias for backend calls.
pub type Result<T> = std::result::Result<T, ApiError>;

/// Failure of a backend call.
///
/// Service functions always return one of these on failure; the message the
/// server provided is carried verbatim so pages can show it in an alert.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ApiError {
    /// Transport failed before a response arrived.
    #[error("{message}")]
    Network {
        /// Human-readable reason
        message: String,
    },

    /// No response within the fixed request timeout.
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// Authentication expired or missing (HTTP 401).
    ///
    /// The adapter has already purged the token and redirected by the time
    /// the caller sees this.
    #[error("{message}")]
    Unauthorized {
        /// Server-provided message, or the generic one
        message: String,
    },

    /// Any other non-2xx response.
    #[error("{message}")]
    Server {
        /// HTTP status code
        status: u16,
        /// Server-provided message, or the generic one
        message: String,
        /// Structured validation errors, passed through untouched
        errors: Option<Value>,
    },

    /// A 2xx response whose body did not have the expected shape.
    #[error("Failed to decode response: {0}")]
    Decode(String),

    /// The request could not be built.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl ApiError {
    /// Build the error for a non-2xx response from its decoded body.
    #[must_use]
    pub fn from_response(status: u16, body: &Value) -> Self {
        let message = server_message(body).unwrap_or_else(|| NETWORK_ERROR_MESSAGE.to_string());

        if status == 401 {
            return Self::Unauthorized { message };
        }

        let errors = body
            .get("errors")
            .or_else(|| body.get("data").and_then(|d| d.get("errors")))
            .filter(|e| !e.is_null())
            .cloned();

        Self::Server {
            status,
            message,
            errors,
        }
    }

    /// Message suitable for a user-facing alert.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Network { .. } | Self::Timeout(_) | Self::Decode(_) | Self::InvalidRequest(_) => {
                NETWORK_ERROR_MESSAGE.to_string()
            },
            Self::Unauthorized { message } | Self::Server { message, .. } => message.clone(),
        }
    }

    /// HTTP status when a response was received.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized { .. } => Some(401),
            Self::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns `true` for authentication failures.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_builder() {
            Self::InvalidRequest(error.to_string())
        } else if error.is_decode() {
            Self::Decode(error.to_string())
        } else {
            Self::Network {
                message: error.to_string(),
            }
        }
    }
}

fn server_message(body: &Value) -> Option<String> {
    let candidates = [
        body.get("message"),
        body.get("error").and_then(|e| e.get("message")),
        body.get("error"),
        body.get("data").and_then(|d| d.get("message")),
    ];

    candidates
        .into_iter()
        .flatten()
        .find_map(Value::as_str)
        .filter(|m| !m.trim().is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn server_message_is_passed_through() {
        let err = ApiError::from_response(
            422,
            &json!({"message": "Email already exists", "errors": [{"field": "email"}]}),
        );
        assert_eq!(err.message(), "Email already exists");
        assert_eq!(err.status(), Some(422));
        let ApiError::Server { errors, .. } = err else {
            unreachable!("422 is a server error");
        };
        assert_eq!(errors, Some(json!([{"field": "email"}])));
    }

    #[test]
    fn missing_message_falls_back_to_generic() {
        let err = ApiError::from_response(500, &Value::Null);
        assert_eq!(err.message(), NETWORK_ERROR_MESSAGE);
    }

    #[test]
    fn nested_error_message_is_found() {
        let err = ApiError::from_response(400, &json!({"error": {"message": "Bad filter"}}));
        assert_eq!(err.message(), "Bad filter");
    }

    #[test]
    fn unauthorized_is_classified() {
        let err = ApiError::from_response(401, &json!({"message": "Token expired"}));
        assert!(err.is_unauthorized());
        assert_eq!(err.message(), "Token expired");
    }

    #[test]
    fn timeout_uses_generic_message() {
        let err = ApiError::Timeout(Duration::from_secs(30));
        assert_eq!(err.message(), NETWORK_ERROR_MESSAGE);
        assert_eq!(err.status(), None);
    }
}
