//! Response envelope decoding.
//!
//! Every endpoint of the REST service wraps its payload as
//!
//! ```json
//! {"code": 2000, "status": "success", "data": ...}
//! ```
//!
//! and reports failures as
//!
//! ```json
//! {"code": 4004, "data": {"message": "...", "httpCode": 404, "debug": "..."}}
//! ```
//!
//! Endpoints disagree on how success is signalled: some use a numeric
//! `code`, some a `status` string, some only the HTTP status line and one
//! the `data.httpCode` field. A [`ResponseRule`] captures this per endpoint
//! and [`decode`] applies it.
//!
//! # Example
//!
//! ```rust
//! use opentrade_api::clients::{decode, ResponseRule};
//!
//! const RULE: ResponseRule = ResponseRule::codes(&[2000, 2001]);
//!
//! let data = decode(200, r#"{"code":2000,"data":{"id":"1"}}"#, &RULE).unwrap();
//! assert_eq!(data["id"], "1");
//!
//! let error = decode(200, r#"{"code":4004,"data":{"message":"Not found","httpCode":404}}"#, &RULE)
//!     .unwrap_err();
//! assert_eq!(error.as_api_error().unwrap().http_status(), 404);
//! ```

use serde_json::Value;

use crate::clients::errors::ApiError;
use crate::error::Error;

/// How an endpoint signals success.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SuccessCheck {
    /// `code` is one of the listed values.
    Code(&'static [i64]),
    /// `status` equals `"success"`.
    Status,
    /// The HTTP status is one of the listed values.
    HttpStatus(&'static [u16]),
    /// `data.httpCode` is one of the listed values.
    DataHttpCode(&'static [u16]),
}

/// What to return for a specific HTTP status, before any other check.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusHandler {
    /// An empty JSON array.
    Empty,
    /// The envelope's `data.message`.
    MessageAsData,
    /// The envelope's `data`.
    Payload,
    /// An [`ApiError`] with the given message.
    Fail(&'static str),
}

/// Decoding rule for one endpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResponseRule {
    success: SuccessCheck,
    on_status: &'static [(u16, StatusHandler)],
    empty_body_is_empty: bool,
    status_line_errors: bool,
}

impl ResponseRule {
    /// A rule with the given success check and no special cases.
    #[must_use]
    pub const fn new(success: SuccessCheck) -> Self {
        Self {
            success,
            on_status: &[],
            empty_body_is_empty: false,
            status_line_errors: false,
        }
    }

    /// Success when `code` is one of `codes`.
    #[must_use]
    pub const fn codes(codes: &'static [i64]) -> Self {
        Self::new(SuccessCheck::Code(codes))
    }

    /// Success when `status` is `"success"`.
    #[must_use]
    pub const fn status_success() -> Self {
        Self::new(SuccessCheck::Status)
    }

    /// Success when the HTTP status is one of `statuses`.
    #[must_use]
    pub const fn http_status(statuses: &'static [u16]) -> Self {
        Self::new(SuccessCheck::HttpStatus(statuses))
    }

    /// Success when `data.httpCode` is one of `codes`.
    #[must_use]
    pub const fn data_http_code(codes: &'static [u16]) -> Self {
        Self::new(SuccessCheck::DataHttpCode(codes))
    }

    /// Adds per-status handlers, checked before anything else.
    #[must_use]
    pub const fn with_status_handlers(mut self, handlers: &'static [(u16, StatusHandler)]) -> Self {
        self.on_status = handlers;
        self
    }

    /// Treats an empty body as an empty list instead of a malformed response.
    #[must_use]
    pub const fn empty_body_is_empty(mut self) -> Self {
        self.empty_body_is_empty = true;
        self
    }

    /// Reports a rejected HTTP status as an [`ApiError`] built from the
    /// status line when the body is not an error envelope. The raw body
    /// becomes the debug detail.
    #[must_use]
    pub const fn status_line_errors(mut self) -> Self {
        self.status_line_errors = true;
        self
    }

    /// Returns the success check.
    #[must_use]
    pub const fn success(&self) -> SuccessCheck {
        self.success
    }

    fn accepts_status(&self, status: u16) -> bool {
        match self.success {
            SuccessCheck::HttpStatus(statuses) => statuses.contains(&status),
            _ => (200..300).contains(&status),
        }
    }

    fn handler_for(&self, status: u16) -> Option<StatusHandler> {
        self.on_status
            .iter()
            .find(|(code, _)| *code == status)
            .map(|(_, handler)| *handler)
    }
}

/// A parsed response envelope.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Envelope {
    /// Numeric result code, e.g. `2000`.
    pub code: Option<i64>,
    /// Result status, e.g. `"success"`.
    pub status: Option<String>,
    /// The payload, or the error description.
    pub data: Value,
}

impl Envelope {
    /// Parses a response body.
    ///
    /// `code` is accepted as a number or a numeric string.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedResponse`] if the body is not a JSON object.
    pub fn parse(body: &str) -> Result<Self, Error> {
        let value: Value = serde_json::from_str(body)
            .map_err(|e| Error::malformed(format!("invalid JSON body: {e}")))?;

        let Value::Object(mut object) = value else {
            return Err(Error::malformed("response body is not a JSON object"));
        };

        Ok(Self {
            code: object.get("code").and_then(as_i64),
            status: object
                .get("status")
                .and_then(Value::as_str)
                .map(ToString::to_string),
            data: object.remove("data").unwrap_or(Value::Null),
        })
    }

    fn data_field(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    /// Returns `data.message` when it is a string.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.data_field("message").and_then(Value::as_str)
    }

    /// Returns `data.httpCode` when it is a valid status number.
    #[must_use]
    pub fn http_code(&self) -> Option<u16> {
        self.data_field("httpCode")
            .and_then(as_i64)
            .and_then(|code| u16::try_from(code).ok())
    }

    /// Returns `data.debug` rendered as text.
    #[must_use]
    pub fn debug(&self) -> Option<String> {
        match self.data_field("debug")? {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Converts an error envelope into [`Error::Api`].
    ///
    /// Without a `data.message` the result is [`Error::MalformedResponse`].
    pub fn into_api_error(self, status: u16) -> Error {
        let Some(message) = self.message() else {
            return Error::malformed(format!(
                "error envelope without data.message (status {status})"
            ));
        };

        let error = ApiError::new(message, self.http_code().unwrap_or(status), self.debug());
        tracing::warn!(
            status = error.http_status(),
            message = error.message(),
            debug = error.debug_detail().unwrap_or_default(),
            "service returned an error envelope"
        );
        Error::Api(error)
    }

    fn is_success(&self, status: u16, check: SuccessCheck) -> bool {
        match check {
            SuccessCheck::Code(codes) => self.code.is_some_and(|code| codes.contains(&code)),
            SuccessCheck::Status => self.status.as_deref() == Some("success"),
            SuccessCheck::HttpStatus(statuses) => statuses.contains(&status),
            SuccessCheck::DataHttpCode(codes) => {
                self.http_code().is_some_and(|code| codes.contains(&code))
            }
        }
    }
}

fn status_line_error(status: u16, body: &str) -> Error {
    let message = reqwest::StatusCode::from_u16(status)
        .ok()
        .and_then(|code| code.canonical_reason())
        .map_or_else(|| format!("HTTP {status}"), ToString::to_string);
    let detail = (!is_empty_body(body)).then(|| body.to_string());

    tracing::warn!(status, reason = %message, "service rejected the request without an error envelope");
    Error::Api(ApiError::new(message, status, detail))
}

fn as_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn is_empty_body(body: &str) -> bool {
    let body = body.trim();
    body.is_empty() || body == "null"
}

/// Interprets a response against an endpoint's rule.
///
/// Returns the envelope's `data` on success.
///
/// # Errors
///
/// - [`Error::Api`] for an error envelope or a status mapped to
///   [`StatusHandler::Fail`]
/// - [`Error::MalformedResponse`] when the body cannot be interpreted
pub fn decode(status: u16, body: &str, rule: &ResponseRule) -> Result<Value, Error> {
    if let Some(handler) = rule.handler_for(status) {
        return match handler {
            StatusHandler::Empty => Ok(Value::Array(Vec::new())),
            StatusHandler::Fail(message) => {
                let http_status = Envelope::parse(body)
                    .ok()
                    .and_then(|envelope| envelope.http_code())
                    .unwrap_or(status);
                Err(Error::Api(ApiError::new(message, http_status, None)))
            }
            StatusHandler::MessageAsData => {
                let envelope = Envelope::parse(body)?;
                envelope
                    .message()
                    .map(|message| Value::String(message.to_string()))
                    .ok_or_else(|| Error::malformed(format!("status {status} without data.message")))
            }
            StatusHandler::Payload => Ok(Envelope::parse(body)?.data),
        };
    }

    if rule.status_line_errors && !rule.accepts_status(status) {
        return Err(match Envelope::parse(body) {
            Ok(envelope) if envelope.message().is_some() => envelope.into_api_error(status),
            _ => status_line_error(status, body),
        });
    }

    if is_empty_body(body) {
        if rule.empty_body_is_empty {
            return Ok(Value::Array(Vec::new()));
        }
        if matches!(rule.success, SuccessCheck::HttpStatus(s) if s.contains(&status)) {
            return Ok(Value::Null);
        }
        return Err(Error::malformed(format!("empty body with status {status}")));
    }

    let envelope = Envelope::parse(body)?;

    if envelope.is_success(status, rule.success) {
        return Ok(envelope.data);
    }

    Err(envelope.into_api_error(status))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const CODES: ResponseRule = ResponseRule::codes(&[2000, 2001]);

    fn error_body(code: i64, message: &str, http_code: u16) -> String {
        json!({
            "code": code,
            "data": {"message": message, "httpCode": http_code, "debug": "trace"}
        })
        .to_string()
    }

    #[test]
    fn test_matching_code_returns_data() {
        let body = json!({"code": 2000, "data": [{"id": "a"}]}).to_string();
        assert_eq!(decode(200, &body, &CODES).unwrap(), json!([{"id": "a"}]));
    }

    #[test]
    fn test_string_code_is_accepted() {
        let body = json!({"code": "2001", "data": "ok"}).to_string();
        assert_eq!(decode(200, &body, &CODES).unwrap(), json!("ok"));
    }

    #[test]
    fn test_error_code_builds_api_error() {
        let body = error_body(4004, "Item not found", 404);
        let error = decode(200, &body, &CODES).unwrap_err();

        let api = error.as_api_error().unwrap();
        assert_eq!(api.message(), "Item not found");
        assert_eq!(api.http_status(), 404);
        assert_eq!(api.debug_detail(), Some("trace"));
    }

    #[test]
    fn test_missing_http_code_falls_back_to_status_line() {
        let body = json!({"code": 5000, "data": {"message": "boom"}}).to_string();
        let error = decode(500, &body, &CODES).unwrap_err();
        assert_eq!(error.as_api_error().unwrap().http_status(), 500);
    }

    #[test]
    fn test_error_envelope_without_message_is_malformed() {
        let body = json!({"code": 5000, "data": null}).to_string();
        assert!(matches!(
            decode(500, &body, &CODES),
            Err(Error::MalformedResponse { .. })
        ));
    }

    #[test]
    fn test_invalid_json_is_malformed() {
        assert!(matches!(
            decode(200, "<html>", &CODES),
            Err(Error::MalformedResponse { .. })
        ));
    }

    #[test]
    fn test_non_object_body_is_malformed() {
        assert!(matches!(
            decode(200, "[1,2]", &CODES),
            Err(Error::MalformedResponse { .. })
        ));
    }

    #[test]
    fn test_empty_body_depends_on_rule() {
        assert!(matches!(
            decode(200, "", &CODES),
            Err(Error::MalformedResponse { .. })
        ));

        let lenient = CODES.empty_body_is_empty();
        assert_eq!(decode(200, "", &lenient).unwrap(), json!([]));
        assert_eq!(decode(200, "null", &lenient).unwrap(), json!([]));
    }

    #[test]
    fn test_http_status_success_allows_empty_body() {
        let rule = ResponseRule::http_status(&[204]);
        assert_eq!(decode(204, "", &rule).unwrap(), Value::Null);
    }

    #[test]
    fn test_status_success_check() {
        let rule = ResponseRule::status_success();
        let ok = json!({"status": "success", "data": {"id": 3}}).to_string();
        assert_eq!(decode(200, &ok, &rule).unwrap(), json!({"id": 3}));

        let failed = json!({"status": "error", "data": {"message": "nope", "httpCode": 422}}).to_string();
        assert_eq!(
            decode(200, &failed, &rule).unwrap_err().as_api_error().unwrap().http_status(),
            422
        );
    }

    #[test]
    fn test_data_http_code_check() {
        let rule = ResponseRule::data_http_code(&[202]);
        let ok = json!({"data": {"message": "sent", "httpCode": 202}}).to_string();
        assert_eq!(decode(200, &ok, &rule).unwrap()["message"], "sent");

        let failed = json!({"data": {"message": "bad email", "httpCode": 400}}).to_string();
        assert!(decode(200, &failed, &rule).is_err());
    }

    #[test]
    fn test_status_handlers_run_first() {
        const RULE: ResponseRule = ResponseRule::http_status(&[201]).with_status_handlers(&[
            (204, StatusHandler::Fail("merchant inactive")),
            (404, StatusHandler::MessageAsData),
            (410, StatusHandler::Empty),
            (202, StatusHandler::Payload),
        ]);

        let error = decode(204, "", &RULE).unwrap_err();
        let api = error.as_api_error().unwrap();
        assert_eq!(api.message(), "merchant inactive");
        assert_eq!(api.http_status(), 204);

        let missing = error_body(4004, "Order not found", 404);
        assert_eq!(decode(404, &missing, &RULE).unwrap(), json!("Order not found"));

        assert_eq!(decode(410, "whatever", &RULE).unwrap(), json!([]));

        let accepted = json!({"data": {"queued": true}}).to_string();
        assert_eq!(decode(202, &accepted, &RULE).unwrap(), json!({"queued": true}));
    }

    #[test]
    fn test_fail_handler_prefers_data_http_code() {
        const RULE: ResponseRule =
            ResponseRule::http_status(&[201]).with_status_handlers(&[(204, StatusHandler::Fail("x"))]);
        let body = json!({"data": {"httpCode": 403}}).to_string();
        assert_eq!(
            decode(204, &body, &RULE).unwrap_err().as_api_error().unwrap().http_status(),
            403
        );
    }

    #[test]
    fn test_status_line_error_keeps_raw_body_as_debug() {
        const RULE: ResponseRule = ResponseRule::http_status(&[200]).status_line_errors();

        let error = decode(500, "<html>Internal Server Error</html>", &RULE).unwrap_err();
        let api = error.as_api_error().unwrap();
        assert_eq!(api.message(), "Internal Server Error");
        assert_eq!(api.http_status(), 500);
        assert_eq!(api.debug_detail(), Some("<html>Internal Server Error</html>"));

        let empty = decode(502, "", &RULE).unwrap_err();
        assert_eq!(empty.as_api_error().unwrap().debug_detail(), None);

        let unknown = decode(599, "oops", &RULE).unwrap_err();
        assert_eq!(unknown.to_string(), "HTTP 599");
    }

    #[test]
    fn test_status_line_errors_prefer_error_envelope() {
        const RULE: ResponseRule = ResponseRule::http_status(&[200]).status_line_errors();

        let body = error_body(4003, "Template too long", 400);
        let error = decode(400, &body, &RULE).unwrap_err();
        assert_eq!(error.to_string(), "Template too long");
        assert_eq!(error.as_api_error().unwrap().debug_detail(), Some("trace"));

        let ok = json!({"data": {"template": "Sale"}}).to_string();
        assert_eq!(decode(200, &ok, &RULE).unwrap()["template"], "Sale");
    }

    #[test]
    fn test_envelope_debug_renders_non_string_values() {
        let envelope = Envelope::parse(r#"{"data":{"debug":{"line":12}}}"#).unwrap();
        assert_eq!(envelope.debug().as_deref(), Some(r#"{"line":12}"#));
    }
}
