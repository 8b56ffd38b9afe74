//! Uniform JSON error envelopes for HTTP services.
//!
//! Handlers build or return an [`Error`]; [`normalize`] classifies any other
//! failure; [`emit`] or [`respond`] render it with the trace id, optional
//! `Retry-After` header and a JSON body. [`Trace`] attaches a per-request
//! [`RequestContext`].
//!
//! Timeout detection on transport failures goes through [`TimeoutIndicator`].
//! Only `io::Error`, `reqwest::Error` and [`TransportError`] are recognised,
//! so wrap failure types of your own with [`TransportError::new`].

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod server;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::{
    BoxError, ContextError, Error, ErrorBody, ErrorCode, FieldErrors, Joined, RequestContext,
    TRACE_ID_HEADER, TimeoutIndicator, TraceId, TransportError, normalize,
};
pub use inbound::http::{ApiResult, emit, extract_trace_id, respond};
pub use middleware::Trace;
