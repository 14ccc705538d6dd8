//! HTTP client types for OpenTrade REST communication.
//!
//! This module provides the transport layer under
//! [`OpenTradeClient`](crate::OpenTradeClient): one HTTP exchange per call,
//! and the decoder that turns response envelopes into values or errors.
//!
//! # Overview
//!
//! The main types in this module are:
//!
//! - [`HttpClient`]: The async HTTP client bound to the REST URL
//! - [`HttpRequest`]: A request to be sent to the service
//! - [`HttpResponse`]: The raw status and body of a response
//! - [`HttpMethod`]: Supported HTTP methods (GET, POST, PUT, DELETE)
//! - [`BodyType`], [`RequestBody`], [`MultipartPart`]: Request body encodings
//! - [`decode`], [`ResponseRule`], [`Envelope`]: Envelope interpretation
//! - [`ApiError`]: An error reported inside an envelope
//!
//! # Retry Behavior
//!
//! The client never retries. Each call sends exactly one request and
//! returns the response, whatever its status.

mod envelope;
mod errors;
mod http_client;
mod http_request;
mod http_response;

pub use envelope::{decode, Envelope, ResponseRule, StatusHandler, SuccessCheck};
pub use errors::ApiError;
pub use http_client::{HttpClient, SDK_VERSION};
pub use http_request::{
    form_bool, BodyType, HttpMethod, HttpRequest, HttpRequestBuilder, MultipartPart, RequestBody,
};
pub use http_response::HttpResponse;
