//! Response emission for failures.
//!
//! Purpose: turn any failure into exactly one status line, a bounded set of
//! headers and one JSON body. The transport is reached through two small
//! ports, [`TraceSource`] for the inbound request and [`ResponseSink`] for
//! the outgoing response, so the same rules apply to any HTTP stack.

use actix_web::http::StatusCode;
use tracing::Level;

use crate::domain::{
    BoxError, RequestContext, TRACE_ID_HEADER, normalize, retry_after_header_seconds,
};

/// Header advertising the minimum wait before retrying.
pub const RETRY_AFTER_HEADER: &str = "Retry-After";

/// Header naming the body media type.
pub const CONTENT_TYPE_HEADER: &str = "Content-Type";

/// Media type of the error body.
pub const JSON_MEDIA_TYPE: &str = "application/json";

/// Read access to the inbound request.
pub trait TraceSource {
    /// Value of the header `name`, if present and valid text.
    fn header(&self, name: &str) -> Option<&str>;

    /// Context attached to the request by the trace middleware, if any.
    fn context(&self) -> Option<RequestContext>;
}

/// Write access to the outgoing response.
///
/// [`emit`] calls `set_header` zero or more times, then `write_status` once,
/// then `write_body` at most once.
#[cfg_attr(test, mockall::automock)]
pub trait ResponseSink {
    /// Set a response header, replacing any previous value.
    fn set_header(&mut self, name: &'static str, value: &str);

    /// Commit the response status.
    fn write_status(&mut self, status: StatusCode);

    /// Write the complete response body.
    fn write_body(&mut self, body: &[u8]);
}

/// Resolve the trace identifier for `request`.
///
/// Prefers a non-empty trace header, then the context attached by the trace
/// middleware, then the empty string.
pub fn extract_trace_id(request: Option<&dyn TraceSource>) -> String {
    let Some(source) = request else {
        return String::new();
    };
    if let Some(id) = source.header(TRACE_ID_HEADER).filter(|id| !id.is_empty()) {
        return id.to_owned();
    }
    source
        .context()
        .and_then(|context| context.trace_id().map(|id| id.as_str().to_owned()))
        .unwrap_or_default()
}

/// Write `failure` to `sink`.
///
/// No failure writes `204 No Content` and nothing else. Otherwise the
/// failure is normalised, its trace id resolved against `request`, and the
/// headers, status and body are written in that order. A body that cannot
/// be encoded is logged and dropped; the status is already committed.
///
/// Server errors log at `ERROR` once a trace id is known or the request is
/// at hand. An untraced error rendered without a request logs at `DEBUG`:
/// the trace middleware renders it again against the request.
pub fn emit(
    sink: &mut dyn ResponseSink,
    request: Option<&dyn TraceSource>,
    failure: Option<BoxError>,
) {
    let Some(normalized) = normalize(failure) else {
        sink.write_status(StatusCode::NO_CONTENT);
        return;
    };

    let error = if normalized.trace_id().is_none() {
        normalized.with_trace_id(extract_trace_id(request))
    } else {
        normalized
    };

    if let Some(trace_id) = error.trace_id() {
        sink.set_header(TRACE_ID_HEADER, trace_id);
    }

    if let Some(delay) = error.retry_after() {
        let seconds = retry_after_header_seconds(delay).to_string();
        sink.set_header(RETRY_AFTER_HEADER, &seconds);
    }

    let status = error.status();
    let final_render = request.is_some() || error.trace_id().is_some();
    let level = log_level(status, final_render);
    error.log_fields().record(level, "emitting error response");

    sink.set_header(CONTENT_TYPE_HEADER, JSON_MEDIA_TYPE);
    sink.write_status(status);

    match serde_json::to_vec(&error) {
        Ok(body) => sink.write_body(&body),
        Err(err) => {
            tracing::error!(error = %err, code = %error.code(), "failed to encode error body");
        }
    }
}

fn log_level(status: StatusCode, final_render: bool) -> Level {
    if status.is_server_error() && final_render {
        Level::ERROR
    } else {
        Level::DEBUG
    }
}
