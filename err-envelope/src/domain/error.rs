//! The structured error envelope.
//!
//! [`Error`] is transport agnostic: it carries the HTTP status it should be
//! emitted with, but the status never appears in the serialised body. Inbound
//! adapters turn it into responses through [`crate::inbound::http::emit`].
//!
//! Every `with_*` method borrows the receiver and returns a fresh value, so
//! a shared prototype such as `Error::bare(ErrorCode::NotFound)` can be
//! customised per request without being changed itself.

use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use actix_web::http::StatusCode;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use super::chain::walk_chain;
use super::code::ErrorCode;
use super::retry_after::format_retry_after;

/// Boxed failure accepted by the classifier.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Shared handle to a wrapped underlying failure.
pub type Cause = Arc<dyn StdError + Send + Sync + 'static>;

/// Status used whenever none, or an unusable one, was supplied.
pub const DEFAULT_STATUS: u16 = 500;

/// Structured error envelope.
///
/// ## Invariants
/// - `code` is always set; it is the primary key clients branch on.
/// - An empty message reads back as the code's default message.
/// - A zero status reads back as 500.
///
/// # Examples
/// ```
/// use err_envelope::domain::{Error, ErrorCode};
///
/// let err = Error::new(ErrorCode::NotFound, 404, "");
/// assert_eq!(err.message(), "Not found");
/// assert!(!err.retryable());
/// ```
#[derive(Debug, Clone)]
#[expect(
    clippy::error_impl_error,
    reason = "the envelope is the crate's public Error type"
)]
pub struct Error {
    code: ErrorCode,
    message: String,
    details: Option<Value>,
    trace_id: Option<String>,
    retryable: bool,
    retry_after: Option<Duration>,
    status: u16,
    cause: Option<Cause>,
}

impl Error {
    /// Create an error with an explicit status and message.
    ///
    /// A `status` of zero becomes 500 and an empty `message` becomes the
    /// code's default message. Retryability follows the code's default.
    pub fn new(code: ErrorCode, status: u16, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status,
            ..Self::bare(code)
        }
        .with_defaults_filled()
    }

    /// Create an error that wraps an underlying failure.
    ///
    /// The cause is preserved for [`std::error::Error::source`] but never
    /// serialised.
    ///
    /// # Examples
    /// ```
    /// use std::error::Error as _;
    /// use err_envelope::domain::{Error, ErrorCode};
    ///
    /// let io = std::io::Error::other("disk full");
    /// let err = Error::wrap(ErrorCode::Internal, 500, "", io);
    /// assert_eq!(err.to_string(), "INTERNAL: Internal error (disk full)");
    /// assert!(err.source().is_some());
    /// ```
    pub fn wrap<E>(code: ErrorCode, status: u16, message: impl Into<String>, cause: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        let mut error = Self::new(code, status, message);
        error.cause = Some(Arc::new(cause));
        error
    }

    /// Like [`Error::wrap`] for failures that are already boxed.
    pub fn wrap_boxed(
        code: ErrorCode,
        status: u16,
        message: impl Into<String>,
        cause: BoxError,
    ) -> Self {
        let mut error = Self::new(code, status, message);
        error.cause = Some(Arc::from(cause));
        error
    }

    /// Prototype error for `code` with no status and no message.
    ///
    /// Usable in `const` and `static` items. Status and message are resolved
    /// when read and when the error passes through the classifier.
    ///
    /// # Examples
    /// ```
    /// use err_envelope::domain::{Error, ErrorCode};
    ///
    /// static NOT_FOUND: Error = Error::bare(ErrorCode::NotFound);
    ///
    /// let customised = NOT_FOUND.with_trace_id("abc");
    /// assert!(NOT_FOUND.trace_id().is_none());
    /// assert_eq!(customised.trace_id(), Some("abc"));
    /// ```
    #[must_use]
    pub const fn bare(code: ErrorCode) -> Self {
        Self {
            code,
            message: String::new(),
            details: None,
            trace_id: None,
            retryable: code.default_retryable(),
            retry_after: None,
            status: 0,
            cause: None,
        }
    }

    /// Stable machine-readable error code.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        self.code
    }

    /// Human-readable message, falling back to the code's default.
    #[must_use]
    pub fn message(&self) -> &str {
        if self.message.is_empty() {
            self.code.default_message()
        } else {
            self.message.as_str()
        }
    }

    /// Opaque structured details, if any.
    #[must_use]
    pub const fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }

    /// Correlation identifier, if one has been attached.
    #[must_use]
    pub fn trace_id(&self) -> Option<&str> {
        self.trace_id.as_deref()
    }

    /// Whether the client may retry the request.
    #[must_use]
    pub const fn retryable(&self) -> bool {
        self.retryable
    }

    /// Positive retry delay hint, if any.
    #[must_use]
    pub fn retry_after(&self) -> Option<Duration> {
        self.retry_after.filter(|delay| !delay.is_zero())
    }

    /// Status as supplied, zero when unset.
    #[must_use]
    pub const fn raw_status(&self) -> u16 {
        self.status
    }

    /// Transport status, defaulting to 500 when unset or out of range.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Wrapped underlying failure, if any.
    #[must_use]
    pub fn cause(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        self.cause.as_deref()
    }

    /// Return a copy carrying `details`. A JSON `null` clears them.
    ///
    /// # Examples
    /// ```
    /// use err_envelope::domain::{Error, ErrorCode};
    /// use serde_json::json;
    ///
    /// let base = Error::new(ErrorCode::BadRequest, 400, "bad");
    /// let detailed = base.with_details(json!({ "field": "name" }));
    /// assert!(base.details().is_none());
    /// assert!(detailed.details().is_some());
    /// ```
    #[must_use]
    pub fn with_details(&self, details: Value) -> Self {
        let mut clone = self.clone();
        clone.details = match details {
            Value::Null => None,
            other => Some(other),
        };
        clone
    }

    /// Return a copy carrying the trace identifier. An empty id clears it.
    #[must_use]
    pub fn with_trace_id(&self, id: impl Into<String>) -> Self {
        let mut clone = self.clone();
        let trace_id: String = id.into();
        clone.trace_id = (!trace_id.is_empty()).then_some(trace_id);
        clone
    }

    /// Return a copy with retryability overridden.
    #[must_use]
    pub fn with_retryable(&self, retryable: bool) -> Self {
        let mut clone = self.clone();
        clone.retryable = retryable;
        clone
    }

    /// Return a copy with the status overridden. Zero leaves it unchanged.
    #[must_use]
    pub fn with_status(&self, status: u16) -> Self {
        let mut clone = self.clone();
        if status != 0 {
            clone.status = status;
        }
        clone
    }

    /// Return a copy carrying a retry delay hint.
    ///
    /// The hint becomes a `Retry-After` header and a `retry_after` body field
    /// when emitted. A zero duration is treated as no hint.
    #[must_use]
    pub fn with_retry_after(&self, delay: Duration) -> Self {
        let mut clone = self.clone();
        clone.retry_after = Some(delay);
        clone
    }

    /// Whether this error carries `code`.
    #[must_use]
    pub fn has_code(&self, code: ErrorCode) -> bool {
        self.code == code
    }

    /// Resolve an unset status and an empty message in place.
    ///
    /// Other fields are left untouched.
    pub(crate) fn with_defaults_filled(mut self) -> Self {
        if self.status == 0 {
            self.status = DEFAULT_STATUS;
        }
        if self.message.is_empty() {
            self.message = self.code.default_message().to_owned();
        }
        self
    }

    /// Wire representation of this error.
    #[must_use]
    pub fn to_body(&self) -> ErrorBody {
        ErrorBody {
            code: self.code,
            message: self.message().to_owned(),
            details: self.details.clone(),
            trace_id: self.trace_id.clone(),
            retryable: self.retryable,
            retry_after: self.retry_after().map(format_retry_after),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(cause) = &self.cause else {
            return write!(f, "{}: {}", self.code, self.message());
        };
        write!(f, "{}: {} ({cause})", self.code, self.message())
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.cause
            .as_deref()
            .map(|cause| cause as &(dyn StdError + 'static))
    }
}

impl Serialize for Error {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_body().serialize(serializer)
    }
}

/// Render an optional error, using `"<nil>"` when there is none.
///
/// # Examples
/// ```
/// use err_envelope::domain::{display_opt, Error, ErrorCode};
///
/// assert_eq!(display_opt(None), "<nil>");
/// let err = Error::new(ErrorCode::Conflict, 409, "taken");
/// assert_eq!(display_opt(Some(&err)), "CONFLICT: taken");
/// ```
#[must_use]
pub fn display_opt(error: Option<&Error>) -> String {
    error.map_or_else(|| "<nil>".to_owned(), ToString::to_string)
}

/// Report whether any [`Error`] reachable from `error` carries `code`.
///
/// The walk follows [`std::error::Error::source`] links and the members of
/// [`super::Joined`] failures.
///
/// # Examples
/// ```
/// use err_envelope::domain::{is_code, Error, ErrorCode};
///
/// let err = Error::new(ErrorCode::NotFound, 404, "");
/// assert!(is_code(Some(&err), ErrorCode::NotFound));
/// assert!(!is_code(Some(&err), ErrorCode::Conflict));
/// assert!(!is_code(None, ErrorCode::NotFound));
/// ```
#[must_use]
pub fn is_code(error: Option<&(dyn StdError + 'static)>, code: ErrorCode) -> bool {
    error.is_some_and(|root| {
        walk_chain(root, |link| {
            link.downcast_ref::<Error>()
                .is_some_and(|found| found.has_code(code))
        })
    })
}

/// JSON body written for an [`Error`].
///
/// `status` and `cause` are never serialised: the status drives the
/// transport envelope and the cause stays server-side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Stable machine-readable error code.
    pub code: ErrorCode,
    /// Human-readable message.
    pub message: String,
    /// Opaque structured details.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    /// Correlation identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
    /// Whether the client may retry.
    pub retryable: bool,
    /// Human-readable retry delay such as `"30s"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_after: Option<String>,
}
