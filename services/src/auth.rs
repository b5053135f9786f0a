//! Authentication endpoints.
//!
//! Login is two steps: the password step sends an OTP to the user's email,
//! then the verification step exchanges the OTP for a session.

use crate::model::{AuthPayload, LoginStep};
use lexdesk_http::{ApiError, HttpClient, Result, unwrap_data};
use serde_json::{Value, json};

/// Submit email and password.
///
/// The returned email is the one the OTP went to; callers keep it for the
/// verification page.
///
/// # Errors
///
/// Returns the [`ApiError`] from the client.
#[tracing::instrument(skip(client, password))]
pub async fn login(client: &HttpClient, email: &str, password: &str) -> Result<LoginStep> {
    let data = client
        .post("/auth/login", json!({ "email": email, "password": password }))
        .await
        .map(unwrap_data)?;

    let mut step: LoginStep = match data {
        Value::Object(_) => serde_json::from_value(data).unwrap_or_default(),
        _ => LoginStep::default(),
    };
    if step.email.is_empty() {
        step.email = email.to_string();
    }
    Ok(step)
}

/// Exchange an OTP for a session.
///
/// # Errors
///
/// Returns the [`ApiError`] from the client, or [`ApiError::Decode`] when
/// the response carries no token.
#[tracing::instrument(skip(client, otp))]
pub async fn verify_otp(client: &HttpClient, email: &str, otp: &str) -> Result<AuthPayload> {
    let data = client
        .post("/auth/verify-otp", json!({ "email": email, "otp": otp }))
        .await
        .map(unwrap_data)?;

    let payload: AuthPayload =
        serde_json::from_value(data).map_err(|e| ApiError::Decode(e.to_string()))?;

    if payload.token.is_empty() {
        return Err(ApiError::Decode("response carried no token".to_string()));
    }
    Ok(payload)
}

/// End the session on the server.
///
/// # Errors
///
/// Returns the [`ApiError`] from the client.
pub async fn logout(client: &HttpClient) -> Result<Value> {
    client.post("/auth/logout", json!({})).await.map(unwrap_data)
}

/// Request a password reset email.
///
/// # Errors
///
/// Returns the [`ApiError`] from the client.
pub async fn forgot_password(client: &HttpClient, email: &str) -> Result<Value> {
    client
        .post("/auth/forgot-password", json!({ "email": email }))
        .await
        .map(unwrap_data)
}
