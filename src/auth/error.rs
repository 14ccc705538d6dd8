//! Error type for access-token acquisition.

use thiserror::Error;

/// Message shown to users when the token endpoint rejects the client.
pub const AUTH_FAILED_MESSAGE: &str = "Unable to connect to the server";

/// The access token could not be obtained.
///
/// `AuthError` is `Clone` so a single failed refresh can be handed to every
/// caller that was waiting on it.
///
/// # Example
///
/// ```rust
/// use opentrade_api::auth::AuthError;
///
/// let error = AuthError::rejected(401, r#"{"error":"invalid_client"}"#);
/// assert_eq!(error.status(), 401);
/// assert!(error.to_string().contains("401"));
/// assert!(!error.to_string().contains("invalid_client"));
/// ```
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{message} (status {status})")]
pub struct AuthError {
    status: u16,
    message: String,
    debug: String,
}

impl AuthError {
    /// The token endpoint answered with a non-200 status.
    #[must_use]
    pub fn rejected(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            message: AUTH_FAILED_MESSAGE.to_string(),
            debug: body.into(),
        }
    }

    /// The token endpoint could not be reached.
    ///
    /// Uses status `0`, as no HTTP response was received.
    #[must_use]
    pub fn network(error: &reqwest::Error) -> Self {
        Self {
            status: 0,
            message: AUTH_FAILED_MESSAGE.to_string(),
            debug: format!("Network error: {error}"),
        }
    }

    /// The token endpoint answered 200 with an unusable body.
    #[must_use]
    pub fn invalid_token_response(detail: impl Into<String>) -> Self {
        Self {
            status: 200,
            message: "Invalid access token response".to_string(),
            debug: detail.into(),
        }
    }

    /// Returns the HTTP status of the token response, `0` for network errors.
    #[must_use]
    pub const fn status(&self) -> u16 {
        self.status
    }

    /// Returns the user-facing message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the raw response body or underlying error, for logs only.
    #[must_use]
    pub fn debug_detail(&self) -> &str {
        &self.debug
    }
}
