//! Authentication against the OpenTrade token endpoint.
//!
//! - [`exchange_client_credentials`]: one client-credentials grant exchange
//! - [`AuthError`]: the failure returned when no token could be obtained
//!
//! Applications normally never call the exchange directly:
//! [`crate::OpenTradeClient::access_token`] caches the token for
//! [`ACCESS_TOKEN_TTL_MINUTES`] and refreshes it on demand.

mod client_credentials;
mod error;

pub use client_credentials::exchange_client_credentials;
pub use error::{AuthError, AUTH_FAILED_MESSAGE};

/// Lifetime given to a cached access token.
///
/// Two minutes shorter than the lifetime granted upstream.
pub const ACCESS_TOKEN_TTL_MINUTES: i64 = 58;
