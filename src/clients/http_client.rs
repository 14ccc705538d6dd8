//! HTTP client for OpenTrade REST communication.
//!
//! This module provides the [`HttpClient`] type that sends
//! [`HttpRequest`]s to the configured REST URL and returns the raw
//! [`HttpResponse`]. It never retries: each call is one HTTP exchange.

use reqwest::multipart::{Form, Part};

use crate::clients::http_request::{HttpMethod, HttpRequest, MultipartPart, RequestBody};
use crate::clients::http_response::HttpResponse;
use crate::config::{ApiUrl, OpenTradeConfig};
use crate::error::Error;

/// SDK version from Cargo.toml.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// HTTP client bound to the OpenTrade REST URL.
///
/// The client handles:
/// - URL construction from the configured REST URL
/// - The User-Agent and Accept headers
/// - Form, JSON and multipart body encoding
///
/// # Thread Safety
///
/// `HttpClient` is `Send + Sync`, making it safe to share across async tasks.
///
/// # Example
///
/// ```rust
/// use opentrade_api::{ApiUrl, ClientId, ClientSecret, OpenTradeConfig};
/// use opentrade_api::clients::HttpClient;
///
/// let config = OpenTradeConfig::builder()
///     .client_id(ClientId::new("my-app").unwrap())
///     .client_secret(ClientSecret::new("my-secret").unwrap())
///     .rest_url(ApiUrl::new("https://api.example.com/v1").unwrap())
///     .build()
///     .unwrap();
///
/// let client = HttpClient::new(&config).unwrap();
/// assert_eq!(client.base_url().as_ref(), "https://api.example.com/v1");
/// ```
#[derive(Debug)]
pub struct HttpClient {
    /// The internal reqwest HTTP client.
    client: reqwest::Client,
    /// REST URL every request path is appended to.
    base_url: ApiUrl,
    /// Value sent in the User-Agent header.
    user_agent: String,
}

// Verify HttpClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpClient>();
};

impl HttpClient {
    /// Creates a new HTTP client for the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transport`] if the underlying reqwest client cannot
    /// be created (e.g., TLS initialization failure).
    pub fn new(config: &OpenTradeConfig) -> Result<Self, Error> {
        let user_agent = Self::user_agent(config.user_agent_prefix());

        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .timeout(config.timeout())
            .user_agent(user_agent.clone())
            .build()?;

        Ok(Self {
            client,
            base_url: config.rest_url().clone(),
            user_agent,
        })
    }

    fn user_agent(prefix: Option<&str>) -> String {
        let prefix = prefix.map_or(String::new(), |p| format!("{p} | "));
        let rust_version = env!("CARGO_PKG_RUST_VERSION");
        format!("{prefix}OpenTrade API Client v{SDK_VERSION} | Rust {rust_version}")
    }

    /// Returns the REST URL requests are sent to.
    #[must_use]
    pub const fn base_url(&self) -> &ApiUrl {
        &self.base_url
    }

    /// Returns the User-Agent header value.
    #[must_use]
    pub fn user_agent_header(&self) -> &str {
        &self.user_agent
    }

    /// Returns the underlying reqwest client.
    ///
    /// The token exchange uses it so that both share one connection pool.
    #[must_use]
    pub const fn inner(&self) -> &reqwest::Client {
        &self.client
    }

    /// Sends an HTTP request to the REST service.
    ///
    /// Any status code is returned as a response; interpreting it is left
    /// to the caller.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if the request fails validation,
    /// and [`Error::Transport`] on connection, TLS or timeout failures.
    pub async fn request(&self, request: HttpRequest) -> Result<HttpResponse, Error> {
        request.verify()?;

        let url = self.base_url.join(&request.path);
        tracing::debug!(method = %request.http_method, path = %request.path, "sending request");

        let mut req_builder = match request.http_method {
            HttpMethod::Get => self.client.get(&url),
            HttpMethod::Post => self.client.post(&url),
            HttpMethod::Put => self.client.put(&url),
            HttpMethod::Delete => self.client.delete(&url),
        };

        req_builder = req_builder.header(reqwest::header::ACCEPT, "application/json");

        if !request.query.is_empty() {
            req_builder = req_builder.query(&request.query);
        }

        req_builder = match request.body {
            Some(RequestBody::Form(fields)) => req_builder.form(&fields),
            Some(RequestBody::Json(value)) => req_builder.json(&value),
            Some(RequestBody::Multipart(parts)) => req_builder.multipart(Self::multipart(parts)?),
            None => req_builder,
        };

        let res = req_builder.send().await?;
        let code = res.status().as_u16();
        let body = res.text().await?;

        tracing::debug!(status = code, path = %request.path, "received response");

        Ok(HttpResponse::new(code, body))
    }

    fn multipart(parts: Vec<MultipartPart>) -> Result<Form, Error> {
        let mut form = Form::new();
        for part in parts {
            form = match part {
                MultipartPart::Text { name, value } => form.text(name, value),
                MultipartPart::File {
                    name,
                    file_name,
                    content_type,
                    bytes,
                } => {
                    let mut file = Part::bytes(bytes).file_name(file_name);
                    if let Some(content_type) = content_type {
                        file = file.mime_str(&content_type).map_err(|_| {
                            Error::invalid_argument(format!(
                                "invalid content type '{content_type}' for multipart field '{name}'"
                            ))
                        })?;
                    }
                    form.part(name, file)
                }
            };
        }
        Ok(form)
    }
}
