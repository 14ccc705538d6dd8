//! OAuth 2.0 Client Credentials Grant against the OpenTrade token endpoint.
//!
//! The service issues application-level access tokens in exchange for the
//! client id and secret. No user interaction is involved.
//!
//! This module performs a single exchange. Caching and single-flight
//! refresh are handled by [`crate::cache::ClientCache`].

use serde::{Deserialize, Serialize};

use crate::auth::AuthError;
use crate::config::OpenTradeConfig;

/// Grant type for client credentials.
const CLIENT_CREDENTIALS_GRANT_TYPE: &str = "client_credentials";

/// Form body for client credentials exchange.
#[derive(Debug, Serialize)]
struct ClientCredentialsRequest<'a> {
    client_id: &'a str,
    client_secret: &'a str,
    grant_type: &'a str,
}

#[derive(Debug, Deserialize)]
struct AccessTokenResponse {
    access_token: String,
}

/// Exchanges the configured client credentials for an access token.
///
/// The grant is sent as a URL-encoded form to [`OpenTradeConfig::auth_url`].
///
/// # Errors
///
/// - [`AuthError::rejected`] when the endpoint answers anything but 200;
///   the response body is kept as debug detail
/// - [`AuthError::network`] when the request cannot be sent
/// - [`AuthError::invalid_token_response`] when a 200 body has no `access_token`
pub async fn exchange_client_credentials(
    client: &reqwest::Client,
    config: &OpenTradeConfig,
) -> Result<String, AuthError> {
    let request_body = ClientCredentialsRequest {
        client_id: config.client_id().as_ref(),
        client_secret: config.client_secret().as_ref(),
        grant_type: CLIENT_CREDENTIALS_GRANT_TYPE,
    };

    tracing::debug!(url = %config.auth_url(), "requesting access token");

    let response = client
        .post(config.auth_url().as_ref())
        .form(&request_body)
        .send()
        .await
        .map_err(|e| AuthError::network(&e))?;

    let status = response.status().as_u16();
    let body = response.text().await.map_err(|e| AuthError::network(&e))?;

    if status != 200 {
        tracing::warn!(status, body = %body, "token endpoint rejected client credentials");
        return Err(AuthError::rejected(status, body));
    }

    let token: AccessTokenResponse = serde_json::from_str(&body)
        .map_err(|e| AuthError::invalid_token_response(format!("{e}: {body}")))?;

    if token.access_token.is_empty() {
        return Err(AuthError::invalid_token_response("empty access_token"));
    }

    Ok(token.access_token)
}

// Verify types are Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ClientCredentialsRequest<'_>>();
};
