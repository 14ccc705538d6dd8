//! The OpenTrade API client.
//!
//! This module provides [`OpenTradeClient`], the single entry point to the
//! REST service. Domain operations are implemented in the
//! [`crate::rest::resources`] submodules as inherent methods.

use std::sync::Arc;

use serde_json::Value;

use crate::auth::exchange_client_credentials;
use crate::cache::ClientCache;
use crate::clients::{
    decode, HttpClient, HttpMethod, HttpRequest, HttpResponse, RequestBody,
};
use crate::config::{ApiConfigProvider, OpenTradeConfig};
use crate::error::Error;
use crate::rest::Operation;

/// Query parameters, in the order they are sent.
pub type Query = Vec<(String, String)>;

/// Client for the OpenTrade REST service.
///
/// Every domain operation obtains an access token from the cache (running
/// the client-credentials exchange on a miss), sends one request and decodes
/// the response envelope.
///
/// # Thread Safety
///
/// `OpenTradeClient` is `Send + Sync`. Wrap it in an `Arc` to share it
/// between tasks; concurrent operations that find no cached token wait for a
/// single token exchange.
///
/// # Example
///
/// ```rust,no_run
/// use opentrade_api::{ApiUrl, ClientId, ClientSecret, OpenTradeClient, OpenTradeConfig};
///
/// # async fn run() -> Result<(), opentrade_api::Error> {
/// let config = OpenTradeConfig::builder()
///     .client_id(ClientId::new("my-app")?)
///     .client_secret(ClientSecret::new("my-secret")?)
///     .rest_url(ApiUrl::new("https://api.example.com")?)
///     .build()?;
///
/// let client = OpenTradeClient::new(config)?;
/// let categories = client.get_categories().await;
/// println!("{} categories", categories.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct OpenTradeClient {
    http: HttpClient,
    config: OpenTradeConfig,
    cache: Arc<ClientCache>,
}

// Verify OpenTradeClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<OpenTradeClient>();
};

impl OpenTradeClient {
    /// Creates a client with its own cache.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transport`] if the HTTP client cannot be created.
    pub fn new(config: OpenTradeConfig) -> Result<Self, Error> {
        Self::with_cache(config, Arc::new(ClientCache::new()))
    }

    /// Creates a client that uses `cache`, which may be shared with other
    /// clients.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transport`] if the HTTP client cannot be created.
    pub fn with_cache(config: OpenTradeConfig, cache: Arc<ClientCache>) -> Result<Self, Error> {
        let http = HttpClient::new(&config)?;
        Ok(Self {
            http,
            config,
            cache,
        })
    }

    /// Creates a client from any credentials provider.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the provider returns invalid values.
    pub fn from_provider(provider: &dyn ApiConfigProvider) -> Result<Self, Error> {
        Self::new(OpenTradeConfig::from_provider(provider)?)
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &OpenTradeConfig {
        &self.config
    }

    /// Returns the cache used by this client.
    #[must_use]
    pub const fn cache(&self) -> &Arc<ClientCache> {
        &self.cache
    }

    /// Returns a live access token, exchanging the client credentials when
    /// the cached one is missing or expired.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Auth`] if the token endpoint cannot be reached or
    /// does not issue a token.
    pub async fn access_token(&self) -> Result<String, Error> {
        let cache = self.cache.as_ref();
        let http = self.http.inner();
        let config = &self.config;

        let token = cache
            .access_token()
            .get_or_try_refresh(cache.clock(), move || {
                tracing::debug!("access token missing or expired, requesting a new one");
                exchange_client_credentials(http, config)
            })
            .await?;

        Ok(token)
    }

    /// Sends a GET request without adding credentials.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transport`] on network failure.
    pub async fn get(&self, path: &str, query: Query) -> Result<HttpResponse, Error> {
        self.raw(HttpMethod::Get, path, query, None).await
    }

    /// Sends a POST request without adding credentials.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transport`] on network failure.
    pub async fn post(
        &self,
        path: &str,
        body: RequestBody,
        query: Query,
    ) -> Result<HttpResponse, Error> {
        self.raw(HttpMethod::Post, path, query, Some(body)).await
    }

    /// Sends a PUT request without adding credentials.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transport`] on network failure.
    pub async fn put(&self, path: &str, body: RequestBody, query: Query) -> Result<HttpResponse, Error> {
        self.raw(HttpMethod::Put, path, query, Some(body)).await
    }

    /// Sends a DELETE request without adding credentials.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transport`] on network failure.
    pub async fn delete(&self, path: &str, query: Query) -> Result<HttpResponse, Error> {
        self.raw(HttpMethod::Delete, path, query, None).await
    }

    async fn raw(
        &self,
        method: HttpMethod,
        path: &str,
        query: Query,
        body: Option<RequestBody>,
    ) -> Result<HttpResponse, Error> {
        let mut builder = HttpRequest::builder(method, path).query(query);
        if let Some(body) = body {
            builder = builder.body(body);
        }
        self.http.request(builder.build()?).await
    }

    /// Sends an authenticated request for `operation`.
    ///
    /// `access_token`, then `client_id` where the endpoint expects it, are
    /// placed ahead of `query`.
    pub(crate) async fn send(
        &self,
        operation: Operation,
        path: &str,
        query: Query,
        body: Option<RequestBody>,
    ) -> Result<HttpResponse, Error> {
        let token = self.access_token().await?;

        let mut params = Vec::with_capacity(query.len() + 2);
        params.push(("access_token".to_string(), token));
        if operation.sends_client_id() {
            params.push((
                "client_id".to_string(),
                self.config.client_id().as_ref().to_string(),
            ));
        }
        params.extend(query);

        tracing::debug!(?operation, path, "calling endpoint");
        self.raw(operation.http_method(), path, params, body).await
    }

    /// Sends an authenticated request and decodes the envelope.
    pub(crate) async fn call(
        &self,
        operation: Operation,
        path: &str,
        query: Query,
        body: Option<RequestBody>,
    ) -> Result<Value, Error> {
        let response = self.send(operation, path, query, body).await?;
        decode(response.code, &response.body, &operation.rule())
    }
}

/// Builds a [`Query`] from pairs of displayable values.
pub(crate) fn query<const N: usize>(pairs: [(&str, &dyn ToString); N]) -> Query {
    pairs
        .into_iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
}
