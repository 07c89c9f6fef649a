//! Client wrappers for the auth endpoints. Forms call these through their own
//! adapter so the adapter state reflects the form's request.

use crate::{
    api::{urls, AppError, HttpClient},
    session::types::{AuthResponse, LoginRequest, RegisterRequest},
};
use reqwest::Method;

/// Exchanges credentials for the user profile.
///
/// # Errors
/// Returns the adapter's `AppError` for transport, HTTP or decoding failures.
pub async fn login(client: &HttpClient, request: &LoginRequest<'_>) -> Result<AuthResponse, AppError> {
    client
        .fetch(Method::POST, urls::auth::LOGIN, Some(request))
        .await
}

/// Creates an account and returns its user profile.
///
/// # Errors
/// Returns the adapter's `AppError` for transport, HTTP or decoding failures.
pub async fn register(
    client: &HttpClient,
    request: &RegisterRequest<'_>,
) -> Result<AuthResponse, AppError> {
    client
        .fetch(Method::POST, urls::auth::REGISTER, Some(request))
        .await
}
