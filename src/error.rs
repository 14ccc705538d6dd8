//! Error types for the OpenTrade API client.
//!
//! This module contains the configuration error type and the unified
//! [`Error`] returned by every client operation.
//!
//! # Error Handling
//!
//! Configuration constructors return `Result<T, ConfigError>` to enable
//! fail-fast validation. Client operations return `Result<T, Error>`, where
//! each variant maps to one failure class:
//!
//! - [`Error::InvalidArgument`]: bad caller input, no request was sent
//! - [`Error::Auth`]: the access token could not be obtained
//! - [`Error::Api`]: the service answered with an error envelope
//! - [`Error::MalformedResponse`]: the body was not the expected JSON shape
//! - [`Error::Transport`]: connection, TLS or timeout failure from `reqwest`
//!
//! # Example
//!
//! ```rust
//! use opentrade_api::{ClientId, ConfigError};
//!
//! let result = ClientId::new("");
//! assert!(matches!(result, Err(ConfigError::EmptyClientId)));
//! ```

use thiserror::Error;

use crate::auth::AuthError;
use crate::clients::ApiError;

/// Errors that can occur while configuring the client.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Client id cannot be empty.
    #[error("Client id cannot be empty. Please provide the id of your OpenTrade application.")]
    EmptyClientId,

    /// Client secret cannot be empty.
    #[error("Client secret cannot be empty. Please provide the secret of your OpenTrade application.")]
    EmptyClientSecret,

    /// A service URL is invalid.
    #[error("Invalid URL '{url}'. Please provide an http or https URL (e.g., 'https://api.example.com').")]
    InvalidUrl {
        /// The invalid URL that was provided.
        url: String,
    },

    /// A required field is missing.
    #[error("Missing required field: '{field}'. This field must be set before building the configuration.")]
    MissingRequiredField {
        /// The name of the missing field.
        field: &'static str,
    },

    /// A required environment variable is not set.
    #[error("Missing environment variable: {name}")]
    MissingEnvVar {
        /// The name of the variable.
        name: &'static str,
    },
}

/// Unified error type for client operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The caller passed an argument the service would reject.
    ///
    /// Returned before any network call is made.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The access token could not be obtained.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// The service returned an error envelope.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The response body could not be interpreted.
    #[error("Malformed response: {reason}")]
    MalformedResponse {
        /// What was wrong with the body.
        reason: String,
    },

    /// Network, TLS or timeout failure from the HTTP layer.
    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    /// Invalid client configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl Error {
    pub(crate) fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedResponse {
            reason: reason.into(),
        }
    }

    /// Returns the [`ApiError`] if this is an envelope-level failure.
    #[must_use]
    pub const fn as_api_error(&self) -> Option<&ApiError> {
        match self {
            Self::Api(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_client_id_error_message() {
        let message = ConfigError::EmptyClientId.to_string();
        assert!(message.contains("Client id cannot be empty"));
    }

    #[test]
    fn test_invalid_url_error_message() {
        let error = ConfigError::InvalidUrl {
            url: "ftp:/nowhere".to_string(),
        };
        let message = error.to_string();
        assert!(message.contains("ftp:/nowhere"));
        assert!(message.contains("http or https"));
    }

    #[test]
    fn test_missing_required_field_error_message() {
        let error = ConfigError::MissingRequiredField { field: "rest_url" };
        let message = error.to_string();
        assert!(message.contains("rest_url"));
        assert!(message.contains("must be set"));
    }

    #[test]
    fn test_api_error_display_hides_debug_detail() {
        let error = Error::from(ApiError::new(
            "Item not found",
            404,
            Some("mongo: no document".to_string()),
        ));
        assert_eq!(error.to_string(), "Item not found");
        assert_eq!(error.as_api_error().map(ApiError::http_status), Some(404));
    }

    #[test]
    fn test_invalid_argument_is_not_api_error() {
        let error = Error::invalid_argument("limit must be greater than zero");
        assert!(error.as_api_error().is_none());
        assert!(error.to_string().contains("limit must be greater than zero"));
    }

    #[test]
    fn test_error_implements_std_error() {
        let error = Error::malformed("not json");
        let _: &dyn std::error::Error = &error;
    }
}
