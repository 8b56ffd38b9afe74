//! Structured-log projection of an [`Error`].
//!
//! `code`, `message`, `status` and `retryable` are always present; the trace
//! id, details, retry delay and cause only when set.

use std::fmt;

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use tracing::Level;

use super::error::Error;
use super::retry_after::format_retry_after;

/// Key/value view of an error for log sinks.
///
/// # Examples
/// ```
/// use err_envelope::domain::Error;
///
/// let err = Error::not_found("").with_trace_id("abc");
/// assert_eq!(
///     err.log_fields().to_string(),
///     "code=NOT_FOUND message=\"Not found\" status=404 retryable=false trace_id=abc"
/// );
/// ```
#[derive(Debug, Clone, Copy)]
pub struct LogFields<'a> {
    error: &'a Error,
}

impl Error {
    /// Project this error for structured logging.
    #[must_use]
    pub fn log_fields(&self) -> LogFields<'_> {
        LogFields { error: self }
    }
}

impl LogFields<'_> {
    fn cause_text(&self) -> Option<String> {
        self.error.cause().map(ToString::to_string)
    }

    /// Emit a `tracing` event at `level` carrying the projection.
    pub fn record(&self, level: Level, message: &str) {
        let error = self.error;
        let code = error.code().as_str();
        let status = error.status().as_u16();
        let trace_id = error.trace_id().unwrap_or_default();
        let details = error.details().map(ToString::to_string);
        let retry_after = error.retry_after().map(format_retry_after);
        let cause = self.cause_text();

        macro_rules! emit {
            ($lvl:expr) => {
                tracing::event!(
                    $lvl,
                    code,
                    error_message = error.message(),
                    status,
                    retryable = error.retryable(),
                    trace_id,
                    details = details.as_deref(),
                    retry_after = retry_after.as_deref(),
                    cause = cause.as_deref(),
                    "{message}"
                )
            };
        }

        if level == Level::ERROR {
            emit!(Level::ERROR);
        } else if level == Level::WARN {
            emit!(Level::WARN);
        } else if level == Level::INFO {
            emit!(Level::INFO);
        } else if level == Level::DEBUG {
            emit!(Level::DEBUG);
        } else {
            emit!(Level::TRACE);
        }
    }
}

impl fmt::Display for LogFields<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let error = self.error;
        write!(
            f,
            "code={} message={:?} status={} retryable={}",
            error.code(),
            error.message(),
            error.status().as_u16(),
            error.retryable()
        )?;
        if let Some(trace_id) = error.trace_id() {
            write!(f, " trace_id={trace_id}")?;
        }
        if let Some(details) = error.details() {
            write!(f, " details={details}")?;
        }
        if let Some(delay) = error.retry_after() {
            write!(f, " retry_after={}", format_retry_after(delay))?;
        }
        if let Some(cause) = self.cause_text() {
            write!(f, " cause={cause:?}")?;
        }
        Ok(())
    }
}

impl Serialize for LogFields<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let error = self.error;
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("code", &error.code())?;
        map.serialize_entry("message", error.message())?;
        map.serialize_entry("status", &error.status().as_u16())?;
        map.serialize_entry("retryable", &error.retryable())?;
        if let Some(trace_id) = error.trace_id() {
            map.serialize_entry("trace_id", trace_id)?;
        }
        if let Some(details) = error.details() {
            map.serialize_entry("details", details)?;
        }
        if let Some(delay) = error.retry_after() {
            map.serialize_entry("retry_after", &format_retry_after(delay))?;
        }
        if let Some(cause) = self.cause_text() {
            map.serialize_entry("cause", &cause)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    fn minimal_projection_has_the_four_mandatory_keys() {
        let err = Error::conflict("taken");
        let value = serde_json::to_value(err.log_fields()).expect("serialises");
        assert_eq!(
            value,
            json!({
                "code": "CONFLICT",
                "message": "taken",
                "status": 409,
                "retryable": false,
            })
        );
    }

    #[rstest]
    fn optional_keys_appear_when_set() {
        let err = Error::downstream("billing", std::io::Error::other("refused"))
            .with_trace_id("t-1")
            .with_retry_after(Duration::from_secs(90));
        let value = serde_json::to_value(err.log_fields()).expect("serialises");

        assert_eq!(value["trace_id"], "t-1");
        assert_eq!(value["details"], json!({"service": "billing"}));
        assert_eq!(value["retry_after"], "1m30s");
        assert_eq!(value["cause"], "refused");
    }

    #[rstest]
    fn display_quotes_free_text() {
        let err = Error::internal("").with_retry_after(Duration::ZERO);
        assert_eq!(
            err.log_fields().to_string(),
            "code=INTERNAL message=\"Internal error\" status=500 retryable=false"
        );
    }

    #[rstest]
    fn record_does_not_panic_without_a_subscriber() {
        Error::unavailable("").log_fields().record(Level::WARN, "dependency down");
    }
}
