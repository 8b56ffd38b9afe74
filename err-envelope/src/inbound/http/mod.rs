//! HTTP inbound adapter.
//!
//! Emission is written against the [`TraceSource`] and [`ResponseSink`]
//! ports; the Actix adapters for both live alongside it.

pub mod emit;
pub mod error;
pub mod request;
pub mod schemas;
pub mod sink;

pub use emit::{
    CONTENT_TYPE_HEADER, JSON_MEDIA_TYPE, RETRY_AFTER_HEADER, ResponseSink, TraceSource, emit,
    extract_trace_id,
};
pub use error::{ApiResult, respond};
pub use sink::HttpResponseSink;
