//! Envelope-level error type for the OpenTrade API client.
//!
//! When the service answers with an error envelope such as
//!
//! ```json
//! {"code": 4004, "data": {"message": "Item not found", "httpCode": 404, "debug": "..."}}
//! ```
//!
//! the decoder produces an [`ApiError`] carrying the user-facing message,
//! the HTTP status and the optional debug detail.
//!
//! # Example
//!
//! ```rust
//! use opentrade_api::clients::ApiError;
//!
//! let error = ApiError::new("Item not found", 404, Some("no document".to_string()));
//!
//! assert_eq!(error.to_string(), "Item not found");
//! assert_eq!(error.http_status(), 404);
//! assert_eq!(error.debug_detail(), Some("no document"));
//! ```

use thiserror::Error;

/// An error reported by the service inside a response envelope.
///
/// Built in one step and immutable afterwards. The debug detail is kept out
/// of `Display` so it is never shown to end users by accident.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct ApiError {
    message: String,
    http_status: u16,
    debug: Option<String>,
}

impl ApiError {
    /// Creates an API error.
    #[must_use]
    pub fn new(message: impl Into<String>, http_status: u16, debug: Option<String>) -> Self {
        Self {
            message: message.into(),
            http_status,
            debug,
        }
    }

    /// Returns the user-facing message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the HTTP status reported by the service.
    ///
    /// This is `data.httpCode` when present, otherwise the status line of
    /// the response.
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        self.http_status
    }

    /// Returns the server-side debug detail, if any.
    #[must_use]
    pub fn debug_detail(&self) -> Option<&str> {
        self.debug.as_deref()
    }
}

// Verify error types are Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ApiError>();
};
