//! # OpenTrade API Rust Client
//!
//! An async client for the OpenTrade e-commerce REST service: catalog,
//! items, orders, baskets, comments, user accounts and social network
//! connection.
//!
//! ## Overview
//!
//! This crate provides:
//! - Type-safe configuration via [`OpenTradeConfig`] and [`OpenTradeConfigBuilder`]
//! - Validated newtypes for credentials and service URLs
//! - The OAuth 2.0 client-credentials exchange via [`auth`]
//! - An expiring, single-flight token cache via [`cache`]
//! - A uniform response envelope decoder via [`clients`]
//! - Every domain operation as a method of [`OpenTradeClient`]
//!
//! ## Quick Start
//!
//! ```rust
//! use opentrade_api::{ApiUrl, ClientId, ClientSecret, OpenTradeClient, OpenTradeConfig};
//!
//! let config = OpenTradeConfig::builder()
//!     .client_id(ClientId::new("your-client-id").unwrap())
//!     .client_secret(ClientSecret::new("your-client-secret").unwrap())
//!     .rest_url(ApiUrl::new("https://api.example.com").unwrap())
//!     .build()
//!     .unwrap();
//!
//! let client = OpenTradeClient::new(config).unwrap();
//! ```
//!
//! ## Calling the Service
//!
//! Operations obtain an access token on demand. The token is cached for
//! [`auth::ACCESS_TOKEN_TTL_MINUTES`]; concurrent calls that find it
//! missing share a single exchange.
//!
//! ```rust,no_run
//! use opentrade_api::rest::ItemListOptions;
//! # async fn run(client: opentrade_api::OpenTradeClient) -> Result<(), opentrade_api::Error> {
//! let user = client.login("jane", "secret").await?;
//! let items = client.get_items(0, 20, &ItemListOptions::default()).await?;
//! let order_id = client
//!     .order("5c8a1d5b0190b214360dc031", "https://shop.example.com/paid", serde_json::json!({}))
//!     .await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Operations return [`Error`]. Envelope-level failures carry an
//! [`ApiError`] whose `Display` is the user-facing message; the server debug
//! detail is available through [`ApiError::debug_detail`] and is logged at
//! `warn` level. [`OpenTradeClient::get_categories`] and
//! [`OpenTradeClient::get_payments`] never fail and return empty lists
//! instead.
//!
//! ## Logging
//!
//! The crate emits [`tracing`] events and never installs a subscriber.
//!
//! ## Sharing a Cache
//!
//! ```rust
//! use std::sync::Arc;
//! use opentrade_api::{ApiUrl, ClientCache, ClientId, ClientSecret, OpenTradeClient, OpenTradeConfig};
//!
//! let config = OpenTradeConfig::builder()
//!     .client_id(ClientId::new("your-client-id").unwrap())
//!     .client_secret(ClientSecret::new("your-client-secret").unwrap())
//!     .rest_url(ApiUrl::new("https://api.example.com").unwrap())
//!     .build()
//!     .unwrap();
//!
//! let cache = Arc::new(ClientCache::new());
//! let a = OpenTradeClient::with_cache(config.clone(), Arc::clone(&cache)).unwrap();
//! let b = OpenTradeClient::with_cache(config, cache).unwrap();
//! ```

pub mod auth;
pub mod cache;
pub mod clients;
pub mod config;
pub mod error;
pub mod rest;

// Re-export public types at crate root for convenience
pub use auth::AuthError;
pub use cache::{ClientCache, Clock, ManualClock, SystemClock};
pub use clients::{ApiError, HttpMethod, RequestBody};
pub use config::{
    ApiConfigProvider, ApiUrl, ClientId, ClientSecret, OpenTradeConfig, OpenTradeConfigBuilder,
};
pub use error::{ConfigError, Error};
pub use rest::OpenTradeClient;
