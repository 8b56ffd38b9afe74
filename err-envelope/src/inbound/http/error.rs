//! Actix integration for the error envelope.
//!
//! Purpose: let handlers return [`Error`] directly, or hand any failure to
//! [`respond`] together with the request so the trace id falls back to the
//! inbound header or the middleware context.

use actix_web::{HttpRequest, HttpResponse, ResponseError, http::StatusCode};
use tracing::{debug, error};

use super::emit::{TraceSource, emit};
use super::sink::HttpResponseSink;
use crate::domain::{BoxError, Error, ErrorCode};

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

/// Render `failure` as the response to `req`.
///
/// `None` renders `204 No Content`.
///
/// # Examples
/// ```
/// use actix_web::{HttpRequest, HttpResponse};
/// use err_envelope::{Error, inbound::http::respond};
///
/// async fn handler(req: HttpRequest) -> HttpResponse {
///     respond(&req, Some(Box::new(Error::not_found("user not found"))))
/// }
/// ```
pub fn respond(req: &HttpRequest, failure: Option<BoxError>) -> HttpResponse {
    let mut sink = HttpResponseSink::new();
    emit(&mut sink, Some(req as &dyn TraceSource), failure);
    sink.into_response()
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        self.status()
    }

    /// Without the request only the error's own trace id is available; wrap
    /// handlers with [`respond`] when the header fallback matters.
    fn error_response(&self) -> HttpResponse {
        let mut sink = HttpResponseSink::new();
        emit(&mut sink, None, Some(Box::new(self.clone())));
        sink.into_response()
    }
}

/// Keeps the status actix chose. Client errors keep their text; server
/// errors fall back to the code's default message.
impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        // actix errors are not `Send`, so only their text survives.
        let status = err.as_response_error().status_code();
        let code = code_for_status(status.as_u16());
        if status.is_client_error() {
            debug!(error = %err, %status, "actix client error promoted to envelope");
            Self::new(code, status.as_u16(), err.to_string())
        } else {
            error!(error = %err, %status, "actix error promoted to envelope");
            Self::new(code, status.as_u16(), "")
        }
    }
}

const fn code_for_status(status: u16) -> ErrorCode {
    match status {
        401 => ErrorCode::Unauthorized,
        403 => ErrorCode::Forbidden,
        404 => ErrorCode::NotFound,
        405 => ErrorCode::MethodNotAllowed,
        408 => ErrorCode::RequestTimeout,
        409 => ErrorCode::Conflict,
        410 => ErrorCode::Gone,
        413 => ErrorCode::PayloadTooLarge,
        422 => ErrorCode::UnprocessableEntity,
        429 => ErrorCode::RateLimited,
        400..=499 => ErrorCode::BadRequest,
        502 => ErrorCode::Downstream,
        503 => ErrorCode::Unavailable,
        504 => ErrorCode::Timeout,
        _ => ErrorCode::Internal,
    }
}
