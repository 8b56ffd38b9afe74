//! Stable error codes and their classification defaults.
//!
//! The tables here are plain `const fn` lookups: they are fixed at compile
//! time and never mutated, so every request sees the same defaults.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable machine-readable error code describing the failure category.
///
/// Codes never change meaning once assigned. Clients branch on the
/// serialised form (for example `"NOT_FOUND"`).
///
/// # Examples
/// ```
/// use err_envelope::domain::ErrorCode;
///
/// assert_eq!(ErrorCode::RateLimited.as_str(), "RATE_LIMITED");
/// assert_eq!(ErrorCode::RateLimited.default_status(), 429);
/// assert!(ErrorCode::RateLimited.default_retryable());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// An unexpected failure inside the server.
    Internal,
    /// The request is malformed.
    BadRequest,
    /// One or more fields failed validation.
    ValidationFailed,
    /// Authentication failed or is missing.
    Unauthorized,
    /// Authenticated but not permitted to perform this action.
    Forbidden,
    /// The requested resource does not exist.
    NotFound,
    /// The HTTP method is not supported for this resource.
    MethodNotAllowed,
    /// The client took too long to send its request.
    RequestTimeout,
    /// The request conflicts with the current resource state.
    Conflict,
    /// The resource existed once and has been removed.
    Gone,
    /// The request body exceeds the accepted size.
    PayloadTooLarge,
    /// The request is well formed but semantically invalid.
    UnprocessableEntity,
    /// The client exceeded its request quota.
    RateLimited,
    /// The client canceled the request.
    Canceled,
    /// The service is temporarily unable to handle the request.
    Unavailable,
    /// The operation ran past its deadline.
    Timeout,
    /// A downstream dependency failed.
    #[serde(rename = "DOWNSTREAM_ERROR")]
    Downstream,
    /// A downstream dependency did not answer in time.
    DownstreamTimeout,
}

impl ErrorCode {
    /// Every code, in declaration order.
    pub const ALL: [Self; 18] = [
        Self::Internal,
        Self::BadRequest,
        Self::ValidationFailed,
        Self::Unauthorized,
        Self::Forbidden,
        Self::NotFound,
        Self::MethodNotAllowed,
        Self::RequestTimeout,
        Self::Conflict,
        Self::Gone,
        Self::PayloadTooLarge,
        Self::UnprocessableEntity,
        Self::RateLimited,
        Self::Canceled,
        Self::Unavailable,
        Self::Timeout,
        Self::Downstream,
        Self::DownstreamTimeout,
    ];

    /// Wire representation of the code.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Internal => "INTERNAL",
            Self::BadRequest => "BAD_REQUEST",
            Self::ValidationFailed => "VALIDATION_FAILED",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Forbidden => "FORBIDDEN",
            Self::NotFound => "NOT_FOUND",
            Self::MethodNotAllowed => "METHOD_NOT_ALLOWED",
            Self::RequestTimeout => "REQUEST_TIMEOUT",
            Self::Conflict => "CONFLICT",
            Self::Gone => "GONE",
            Self::PayloadTooLarge => "PAYLOAD_TOO_LARGE",
            Self::UnprocessableEntity => "UNPROCESSABLE_ENTITY",
            Self::RateLimited => "RATE_LIMITED",
            Self::Canceled => "CANCELED",
            Self::Unavailable => "UNAVAILABLE",
            Self::Timeout => "TIMEOUT",
            Self::Downstream => "DOWNSTREAM_ERROR",
            Self::DownstreamTimeout => "DOWNSTREAM_TIMEOUT",
        }
    }

    /// HTTP status conventionally paired with the code.
    ///
    /// `Canceled` maps to 499, the non-registered "client closed request"
    /// status used by several proxies.
    #[must_use]
    pub const fn default_status(self) -> u16 {
        match self {
            Self::Internal => 500,
            Self::BadRequest | Self::ValidationFailed => 400,
            Self::Unauthorized => 401,
            Self::Forbidden => 403,
            Self::NotFound => 404,
            Self::MethodNotAllowed => 405,
            Self::RequestTimeout => 408,
            Self::Conflict => 409,
            Self::Gone => 410,
            Self::PayloadTooLarge => 413,
            Self::UnprocessableEntity => 422,
            Self::RateLimited => 429,
            Self::Canceled => 499,
            Self::Unavailable => 503,
            Self::Timeout | Self::DownstreamTimeout => 504,
            Self::Downstream => 502,
        }
    }

    /// Whether a client may reasonably retry a request failing with this code.
    #[must_use]
    pub const fn default_retryable(self) -> bool {
        matches!(
            self,
            Self::RequestTimeout
                | Self::RateLimited
                | Self::Unavailable
                | Self::Timeout
                | Self::Downstream
                | Self::DownstreamTimeout
        )
    }

    /// Message substituted when an error is built without one.
    #[must_use]
    pub const fn default_message(self) -> &'static str {
        match self {
            Self::Internal => "Internal error",
            Self::BadRequest => "Bad request",
            Self::ValidationFailed => "Invalid input",
            Self::Unauthorized => "Unauthorized",
            Self::Forbidden => "Forbidden",
            Self::NotFound => "Not found",
            // Named after their status text instead of the generic "Internal error".
            Self::MethodNotAllowed => "Method not allowed",
            Self::RequestTimeout => "Request timeout",
            Self::Conflict => "Conflict",
            Self::Gone => "Resource no longer exists",
            Self::PayloadTooLarge => "Payload too large",
            Self::UnprocessableEntity => "Unprocessable entity",
            Self::RateLimited => "Rate limited",
            Self::Canceled => "Request canceled",
            Self::Unavailable => "Service unavailable",
            Self::Timeout | Self::DownstreamTimeout => "Request timed out",
            Self::Downstream => "Downstream service error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
