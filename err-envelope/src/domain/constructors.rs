//! Convenience constructors, one per error code.
//!
//! Each helper fixes the code and status and leaves the message optional:
//! passing `""` yields the code's default message.

use std::collections::BTreeMap;
use std::error::Error as StdError;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use super::code::ErrorCode;
use super::error::Error;

/// Field name to validation message.
pub type FieldErrors = BTreeMap<String, String>;

/// Details payload attached by [`Error::validation`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationDetails {
    /// Per-field validation messages.
    pub fields: FieldErrors,
}

fn with_code(code: ErrorCode, message: impl Into<String>) -> Error {
    Error::new(code, code.default_status(), message).with_retryable(code.default_retryable())
}

fn service_details(service: &str) -> Value {
    let mut details = Map::new();
    if !service.is_empty() {
        details.insert("service".to_owned(), Value::String(service.to_owned()));
    }
    Value::Object(details)
}

impl Error {
    /// `INTERNAL` (500).
    pub fn internal(message: impl Into<String>) -> Self {
        with_code(ErrorCode::Internal, message)
    }

    /// `BAD_REQUEST` (400).
    pub fn bad_request(message: impl Into<String>) -> Self {
        with_code(ErrorCode::BadRequest, message)
    }

    /// `VALIDATION_FAILED` (400) with `{"fields": {...}}` details.
    ///
    /// # Examples
    /// ```
    /// use err_envelope::domain::{Error, FieldErrors};
    ///
    /// let fields = FieldErrors::from([("email".to_owned(), "is required".to_owned())]);
    /// let err = Error::validation(fields);
    /// assert_eq!(err.message(), "Invalid input");
    /// assert_eq!(err.details().expect("details")["fields"]["email"], "is required");
    /// ```
    #[must_use]
    pub fn validation(fields: FieldErrors) -> Self {
        with_code(ErrorCode::ValidationFailed, "").with_details(json!({ "fields": fields }))
    }

    /// `UNAUTHORIZED` (401).
    pub fn unauthorized(message: impl Into<String>) -> Self {
        with_code(ErrorCode::Unauthorized, message)
    }

    /// `FORBIDDEN` (403).
    pub fn forbidden(message: impl Into<String>) -> Self {
        with_code(ErrorCode::Forbidden, message)
    }

    /// `NOT_FOUND` (404).
    pub fn not_found(message: impl Into<String>) -> Self {
        with_code(ErrorCode::NotFound, message)
    }

    /// `METHOD_NOT_ALLOWED` (405).
    pub fn method_not_allowed(message: impl Into<String>) -> Self {
        with_code(ErrorCode::MethodNotAllowed, message)
    }

    /// `REQUEST_TIMEOUT` (408), for clients that were too slow to send.
    pub fn request_timeout(message: impl Into<String>) -> Self {
        with_code(ErrorCode::RequestTimeout, message)
    }

    /// `CONFLICT` (409).
    pub fn conflict(message: impl Into<String>) -> Self {
        with_code(ErrorCode::Conflict, message)
    }

    /// `GONE` (410).
    pub fn gone(message: impl Into<String>) -> Self {
        with_code(ErrorCode::Gone, message)
    }

    /// `PAYLOAD_TOO_LARGE` (413).
    pub fn payload_too_large(message: impl Into<String>) -> Self {
        with_code(ErrorCode::PayloadTooLarge, message)
    }

    /// `UNPROCESSABLE_ENTITY` (422), for semantically invalid requests.
    pub fn unprocessable_entity(message: impl Into<String>) -> Self {
        with_code(ErrorCode::UnprocessableEntity, message)
    }

    /// `RATE_LIMITED` (429). Pair with [`Error::with_retry_after`].
    pub fn rate_limited(message: impl Into<String>) -> Self {
        with_code(ErrorCode::RateLimited, message)
    }

    /// `CANCELED` (499).
    pub fn canceled(message: impl Into<String>) -> Self {
        with_code(ErrorCode::Canceled, message)
    }

    /// `UNAVAILABLE` (503).
    pub fn unavailable(message: impl Into<String>) -> Self {
        with_code(ErrorCode::Unavailable, message)
    }

    /// `TIMEOUT` (504).
    pub fn timeout(message: impl Into<String>) -> Self {
        with_code(ErrorCode::Timeout, message)
    }

    /// `DOWNSTREAM_ERROR` (502) wrapping the dependency's failure.
    ///
    /// Details carry `{"service": service}` when a name is given.
    pub fn downstream<E>(service: &str, cause: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        let code = ErrorCode::Downstream;
        Self::wrap(code, code.default_status(), "", cause)
            .with_details(service_details(service))
            .with_retryable(true)
    }

    /// `DOWNSTREAM_TIMEOUT` (504) wrapping the dependency's failure.
    pub fn downstream_timeout<E>(service: &str, cause: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        let code = ErrorCode::DownstreamTimeout;
        Self::wrap(code, code.default_status(), "", cause)
            .with_details(service_details(service))
            .with_retryable(true)
    }
}
