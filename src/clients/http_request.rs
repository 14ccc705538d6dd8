//! HTTP request types for the OpenTrade API client.
//!
//! This module provides the [`HttpRequest`] type and its builder for
//! constructing requests to the REST service.

use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// HTTP methods used by the REST service.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HttpMethod {
    /// HTTP GET method for retrieving resources.
    Get,
    /// HTTP POST method for creating resources.
    Post,
    /// HTTP PUT method for updating resources.
    Put,
    /// HTTP DELETE method for removing resources.
    Delete,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => write!(f, "get"),
            Self::Post => write!(f, "post"),
            Self::Put => write!(f, "put"),
            Self::Delete => write!(f, "delete"),
        }
    }
}

/// Encoding of a PUT/POST body.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BodyType {
    /// `multipart/form-data`.
    Multipart,
    /// `application/x-www-form-urlencoded`.
    FormParams,
    /// `application/json`.
    Json,
}

impl BodyType {
    /// Returns the name used by the service documentation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Multipart => "multipart",
            Self::FormParams => "form_params",
            Self::Json => "json",
        }
    }
}

impl FromStr for BodyType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "multipart" => Ok(Self::Multipart),
            "form_params" => Ok(Self::FormParams),
            "json" => Ok(Self::Json),
            other => Err(Error::invalid_argument(format!(
                "body type must be one of multipart, form_params or json, got '{other}'"
            ))),
        }
    }
}

/// One field of a multipart body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MultipartPart {
    /// A plain text field.
    Text {
        /// Field name.
        name: String,
        /// Field value.
        value: String,
    },
    /// A file upload.
    File {
        /// Field name.
        name: String,
        /// File name sent to the server.
        file_name: String,
        /// MIME type, when known.
        content_type: Option<String>,
        /// File contents.
        bytes: Vec<u8>,
    },
}

impl MultipartPart {
    /// Creates a text field.
    #[must_use]
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Text {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Creates a file field.
    #[must_use]
    pub fn file(
        name: impl Into<String>,
        file_name: impl Into<String>,
        content_type: Option<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self::File {
            name: name.into(),
            file_name: file_name.into(),
            content_type,
            bytes,
        }
    }

    /// Checks that a file part's content type is a valid MIME type.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] naming the field otherwise.
    pub fn verify(&self) -> Result<(), Error> {
        let Self::File {
            name,
            content_type: Some(content_type),
            ..
        } = self
        else {
            return Ok(());
        };

        reqwest::multipart::Part::bytes(&b""[..])
            .mime_str(content_type)
            .map(drop)
            .map_err(|_| {
                Error::invalid_argument(format!(
                    "invalid content type '{content_type}' for multipart field '{name}'"
                ))
            })
    }
}

/// A PUT/POST request body.
#[derive(Clone, Debug, PartialEq)]
pub enum RequestBody {
    /// URL-encoded form fields, in order.
    Form(Vec<(String, String)>),
    /// A JSON document.
    Json(serde_json::Value),
    /// Multipart fields, in order.
    Multipart(Vec<MultipartPart>),
}

impl RequestBody {
    /// Builds a form body from string pairs.
    #[must_use]
    pub fn form<K, V>(fields: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self::Form(
            fields
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Returns the encoding of this body.
    #[must_use]
    pub const fn body_type(&self) -> BodyType {
        match self {
            Self::Form(_) => BodyType::FormParams,
            Self::Json(_) => BodyType::Json,
            Self::Multipart(_) => BodyType::Multipart,
        }
    }
}

/// Encodes a boolean the way the service reads form fields.
#[must_use]
pub const fn form_bool(value: bool) -> &'static str {
    if value {
        "1"
    } else {
        "0"
    }
}

/// An HTTP request to be sent to the REST service.
///
/// Use [`HttpRequest::builder`] to construct requests.
///
/// # Example
///
/// ```rust
/// use opentrade_api::clients::{HttpMethod, HttpRequest, RequestBody};
///
/// let request = HttpRequest::builder(HttpMethod::Post, "/user/signin")
///     .query_param("access_token", "token")
///     .body(RequestBody::form([("login", "jane"), ("password", "pw")]))
///     .build()
///     .unwrap();
///
/// assert_eq!(request.path, "/user/signin");
/// ```
#[derive(Clone, Debug)]
pub struct HttpRequest {
    /// The HTTP method for this request.
    pub http_method: HttpMethod,
    /// The path, relative to the REST URL.
    pub path: String,
    /// The request body, if any.
    pub body: Option<RequestBody>,
    /// Query parameters, in order.
    pub query: Vec<(String, String)>,
}

impl HttpRequest {
    /// Creates a new builder for constructing an `HttpRequest`.
    #[must_use]
    pub fn builder(method: HttpMethod, path: impl Into<String>) -> HttpRequestBuilder {
        HttpRequestBuilder::new(method, path)
    }

    /// Validates the request.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if the path is empty, if a POST or
    /// PUT has no body, or if a multipart file has an invalid content type.
    pub fn verify(&self) -> Result<(), Error> {
        if self.path.trim().is_empty() {
            return Err(Error::invalid_argument("request path cannot be empty"));
        }

        if matches!(self.http_method, HttpMethod::Post | HttpMethod::Put) && self.body.is_none() {
            return Err(Error::invalid_argument(format!(
                "cannot use {} without specifying data",
                self.http_method
            )));
        }

        if let Some(RequestBody::Multipart(parts)) = &self.body {
            parts.iter().try_for_each(MultipartPart::verify)?;
        }

        Ok(())
    }
}

/// Builder for constructing [`HttpRequest`] instances.
#[derive(Debug)]
pub struct HttpRequestBuilder {
    http_method: HttpMethod,
    path: String,
    body: Option<RequestBody>,
    query: Vec<(String, String)>,
}

impl HttpRequestBuilder {
    fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            http_method: method,
            path: path.into(),
            body: None,
            query: Vec::new(),
        }
    }

    /// Sets the request body.
    #[must_use]
    pub fn body(mut self, body: RequestBody) -> Self {
        self.body = Some(body);
        self
    }

    /// Appends query parameters.
    #[must_use]
    pub fn query(mut self, query: impl IntoIterator<Item = (String, String)>) -> Self {
        self.query.extend(query);
        self
    }

    /// Adds a single query parameter.
    #[must_use]
    pub fn query_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Builds the [`HttpRequest`], validating it in the process.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if the request fails validation.
    pub fn build(self) -> Result<HttpRequest, Error> {
        let request = HttpRequest {
            http_method: self.http_method,
            path: self.path,
            body: self.body,
            query: self.query,
        };
        request.verify()?;
        Ok(request)
    }
}
