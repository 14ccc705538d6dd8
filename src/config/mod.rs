//! Configuration types for the OpenTrade API client.
//!
//! This module provides the credentials and endpoints the client needs to
//! talk to the OpenTrade REST service.
//!
//! # Overview
//!
//! - [`ApiConfigProvider`]: The interface an application implements to hand
//!   its credentials to the client
//! - [`OpenTradeConfig`]: The validated configuration used by the client
//! - [`OpenTradeConfigBuilder`]: A builder for constructing [`OpenTradeConfig`]
//! - [`ClientId`], [`ClientSecret`], [`ApiUrl`]: Validated newtypes
//!
//! # Example
//!
//! ```rust
//! use opentrade_api::{ApiUrl, ClientId, ClientSecret, OpenTradeConfig};
//!
//! let config = OpenTradeConfig::builder()
//!     .client_id(ClientId::new("my-app").unwrap())
//!     .client_secret(ClientSecret::new("my-secret").unwrap())
//!     .rest_url(ApiUrl::new("https://api.example.com").unwrap())
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.auth_url().as_ref(), "https://api.example.com/oauth/authorization");
//! ```

mod newtypes;

pub use newtypes::{ApiUrl, ClientId, ClientSecret};

use std::time::Duration;

use crate::error::ConfigError;

/// Path of the token endpoint, relative to the REST URL, used when no
/// explicit auth URL is configured.
pub const DEFAULT_AUTH_PATH: &str = "/oauth/authorization";

/// Default timeout applied to every request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Supplies the credentials of the client application.
///
/// Every method must return a non-empty string.
pub trait ApiConfigProvider {
    /// Returns the secret of the client application.
    fn secret(&self) -> &str;

    /// Returns the URL of the token endpoint.
    fn url_auth(&self) -> &str;

    /// Returns the base URL of the REST service.
    fn url_rest(&self) -> &str;

    /// Returns the id of the client application.
    fn client_id(&self) -> &str;
}

/// Configuration for the OpenTrade API client.
///
/// `OpenTradeConfig` is immutable once built and is `Clone + Send + Sync`.
#[derive(Clone, Debug)]
pub struct OpenTradeConfig {
    client_id: ClientId,
    client_secret: ClientSecret,
    rest_url: ApiUrl,
    auth_url: ApiUrl,
    timeout: Duration,
    user_agent_prefix: Option<String>,
}

impl OpenTradeConfig {
    /// Creates a new builder for constructing an `OpenTradeConfig`.
    #[must_use]
    pub fn builder() -> OpenTradeConfigBuilder {
        OpenTradeConfigBuilder::new()
    }

    /// Builds a configuration from any [`ApiConfigProvider`].
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if a provided value is empty or not a valid URL.
    pub fn from_provider(provider: &dyn ApiConfigProvider) -> Result<Self, ConfigError> {
        Self::builder()
            .client_id(ClientId::new(provider.client_id())?)
            .client_secret(ClientSecret::new(provider.secret())?)
            .rest_url(ApiUrl::new(provider.url_rest())?)
            .auth_url(ApiUrl::new(provider.url_auth())?)
            .build()
    }

    /// Builds a configuration from the process environment.
    ///
    /// Reads `OPENTRADE_CLIENT_ID`, `OPENTRADE_CLIENT_SECRET`,
    /// `OPENTRADE_REST_URL` and, optionally, `OPENTRADE_AUTH_URL`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingEnvVar`] if a required variable is unset,
    /// or a validation error for an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds a configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Same as [`OpenTradeConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &'static str| {
            lookup(name)
                .filter(|value| !value.is_empty())
                .ok_or(ConfigError::MissingEnvVar { name })
        };

        let mut builder = Self::builder()
            .client_id(ClientId::new(required("OPENTRADE_CLIENT_ID")?)?)
            .client_secret(ClientSecret::new(required("OPENTRADE_CLIENT_SECRET")?)?)
            .rest_url(ApiUrl::new(required("OPENTRADE_REST_URL")?)?);

        if let Some(auth_url) = lookup("OPENTRADE_AUTH_URL").filter(|v| !v.is_empty()) {
            builder = builder.auth_url(ApiUrl::new(auth_url)?);
        }

        builder.build()
    }

    /// Returns the client id.
    #[must_use]
    pub const fn client_id(&self) -> &ClientId {
        &self.client_id
    }

    /// Returns the client secret.
    #[must_use]
    pub const fn client_secret(&self) -> &ClientSecret {
        &self.client_secret
    }

    /// Returns the base URL of the REST service.
    #[must_use]
    pub const fn rest_url(&self) -> &ApiUrl {
        &self.rest_url
    }

    /// Returns the URL of the token endpoint.
    #[must_use]
    pub const fn auth_url(&self) -> &ApiUrl {
        &self.auth_url
    }

    /// Returns the per-request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns the user agent prefix, if configured.
    #[must_use]
    pub fn user_agent_prefix(&self) -> Option<&str> {
        self.user_agent_prefix.as_deref()
    }
}

impl ApiConfigProvider for OpenTradeConfig {
    fn secret(&self) -> &str {
        self.client_secret.as_ref()
    }

    fn url_auth(&self) -> &str {
        self.auth_url.as_ref()
    }

    fn url_rest(&self) -> &str {
        self.rest_url.as_ref()
    }

    fn client_id(&self) -> &str {
        self.client_id.as_ref()
    }
}

// Verify OpenTradeConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<OpenTradeConfig>();
};

/// Builder for constructing [`OpenTradeConfig`] instances.
///
/// Required fields are `client_id`, `client_secret` and `rest_url`.
///
/// # Defaults
///
/// - `auth_url`: `{rest_url}/oauth/authorization`
/// - `timeout`: 30 seconds
/// - `user_agent_prefix`: `None`
#[derive(Debug, Default)]
pub struct OpenTradeConfigBuilder {
    client_id: Option<ClientId>,
    client_secret: Option<ClientSecret>,
    rest_url: Option<ApiUrl>,
    auth_url: Option<ApiUrl>,
    timeout: Option<Duration>,
    user_agent_prefix: Option<String>,
}

impl OpenTradeConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the client id (required).
    #[must_use]
    pub fn client_id(mut self, id: ClientId) -> Self {
        self.client_id = Some(id);
        self
    }

    /// Sets the client secret (required).
    #[must_use]
    pub fn client_secret(mut self, secret: ClientSecret) -> Self {
        self.client_secret = Some(secret);
        self
    }

    /// Sets the base URL of the REST service (required).
    #[must_use]
    pub fn rest_url(mut self, url: ApiUrl) -> Self {
        self.rest_url = Some(url);
        self
    }

    /// Sets the URL of the token endpoint.
    #[must_use]
    pub fn auth_url(mut self, url: ApiUrl) -> Self {
        self.auth_url = Some(url);
        self
    }

    /// Sets the per-request timeout.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the user agent prefix for HTTP requests.
    #[must_use]
    pub fn user_agent_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.user_agent_prefix = Some(prefix.into());
        self
    }

    /// Builds the [`OpenTradeConfig`], validating that required fields are set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequiredField`] if `client_id`,
    /// `client_secret` or `rest_url` are not set.
    pub fn build(self) -> Result<OpenTradeConfig, ConfigError> {
        let client_id = self
            .client_id
            .ok_or(ConfigError::MissingRequiredField { field: "client_id" })?;
        let client_secret = self
            .client_secret
            .ok_or(ConfigError::MissingRequiredField {
                field: "client_secret",
            })?;
        let rest_url = self
            .rest_url
            .ok_or(ConfigError::MissingRequiredField { field: "rest_url" })?;

        let auth_url = match self.auth_url {
            Some(url) => url,
            None => ApiUrl::new(rest_url.join(DEFAULT_AUTH_PATH))?,
        };

        Ok(OpenTradeConfig {
            client_id,
            client_secret,
            rest_url,
            auth_url,
            timeout: self.timeout.unwrap_or(DEFAULT_TIMEOUT),
            user_agent_prefix: self.user_agent_prefix,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn base_builder() -> OpenTradeConfigBuilder {
        OpenTradeConfig::builder()
            .client_id(ClientId::new("app").unwrap())
            .client_secret(ClientSecret::new("secret").unwrap())
            .rest_url(ApiUrl::new("https://api.example.com").unwrap())
    }

    #[test]
    fn test_builder_requires_client_id() {
        let result = OpenTradeConfigBuilder::new()
            .client_secret(ClientSecret::new("secret").unwrap())
            .rest_url(ApiUrl::new("https://api.example.com").unwrap())
            .build();

        assert!(matches!(
            result,
            Err(ConfigError::MissingRequiredField { field: "client_id" })
        ));
    }

    #[test]
    fn test_builder_requires_rest_url() {
        let result = OpenTradeConfigBuilder::new()
            .client_id(ClientId::new("app").unwrap())
            .client_secret(ClientSecret::new("secret").unwrap())
            .build();

        assert!(matches!(
            result,
            Err(ConfigError::MissingRequiredField { field: "rest_url" })
        ));
    }

    #[test]
    fn test_builder_provides_sensible_defaults() {
        let config = base_builder().build().unwrap();

        assert_eq!(
            config.auth_url().as_ref(),
            "https://api.example.com/oauth/authorization"
        );
        assert_eq!(config.timeout(), DEFAULT_TIMEOUT);
        assert!(config.user_agent_prefix().is_none());
    }

    #[test]
    fn test_explicit_auth_url_wins() {
        let config = base_builder()
            .auth_url(ApiUrl::new("https://auth.example.com/token").unwrap())
            .timeout(Duration::from_secs(5))
            .user_agent_prefix("Shop/2.0")
            .build()
            .unwrap();

        assert_eq!(config.auth_url().as_ref(), "https://auth.example.com/token");
        assert_eq!(config.timeout(), Duration::from_secs(5));
        assert_eq!(config.user_agent_prefix(), Some("Shop/2.0"));
    }

    #[test]
    fn test_config_implements_provider() {
        let config = base_builder().build().unwrap();
        let provider: &dyn ApiConfigProvider = &config;

        assert_eq!(provider.client_id(), "app");
        assert_eq!(provider.secret(), "secret");
        assert_eq!(provider.url_rest(), "https://api.example.com");
    }

    struct StaticProvider;

    impl ApiConfigProvider for StaticProvider {
        fn secret(&self) -> &str {
            "s3cret"
        }
        fn url_auth(&self) -> &str {
            "https://auth.example.com/oauth/authorization"
        }
        fn url_rest(&self) -> &str {
            "https://rest.example.com"
        }
        fn client_id(&self) -> &str {
            "legacy-app"
        }
    }

    #[test]
    fn test_from_provider_copies_every_value() {
        let config = OpenTradeConfig::from_provider(&StaticProvider).unwrap();

        assert_eq!(config.client_id().as_ref(), "legacy-app");
        assert_eq!(config.client_secret().as_ref(), "s3cret");
        assert_eq!(config.rest_url().host_name(), "rest.example.com");
        assert_eq!(config.auth_url().host_name(), "auth.example.com");
    }

    #[test]
    fn test_from_lookup_reads_variables() {
        let vars: HashMap<&str, &str> = [
            ("OPENTRADE_CLIENT_ID", "env-app"),
            ("OPENTRADE_CLIENT_SECRET", "env-secret"),
            ("OPENTRADE_REST_URL", "http://localhost:9000"),
        ]
        .into_iter()
        .collect();

        let config =
            OpenTradeConfig::from_lookup(|name| vars.get(name).map(ToString::to_string)).unwrap();

        assert_eq!(config.client_id().as_ref(), "env-app");
        assert_eq!(
            config.auth_url().as_ref(),
            "http://localhost:9000/oauth/authorization"
        );
    }

    #[test]
    fn test_from_lookup_reports_missing_variable() {
        let result = OpenTradeConfig::from_lookup(|name| {
            (name == "OPENTRADE_CLIENT_ID").then(|| "app".to_string())
        });

        assert!(matches!(
            result,
            Err(ConfigError::MissingEnvVar {
                name: "OPENTRADE_CLIENT_SECRET"
            })
        ));
    }

    #[test]
    fn test_config_debug_masks_secret() {
        let config = base_builder().build().unwrap();
        let debug_str = format!("{config:?}");
        assert!(debug_str.contains("OpenTradeConfig"));
        assert!(!debug_str.contains("\"secret\""));
    }
}
