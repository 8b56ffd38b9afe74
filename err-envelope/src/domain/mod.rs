//! Transport-agnostic error envelope and classification.
//!
//! Purpose: define the canonical [`Error`] value, the closed set of
//! [`ErrorCode`]s with their defaults, the classifier that maps arbitrary
//! failures onto them, and the per-request trace identifier.
//!
//! Public surface:
//! - Error / `ErrorBody`: the envelope and its JSON wire shape.
//! - `ErrorCode`: stable codes with default status, retryability, message.
//! - normalize: total classifier from any failure to an envelope.
//! - `TraceId` / `RequestContext`: per-request correlation.

pub mod chain;
pub mod classify;
pub mod code;
pub mod constructors;
pub mod error;
pub mod log_fields;
pub mod retry_after;
pub mod trace_id;

pub use self::chain::{Joined, find_in_chain, walk_chain};
pub use self::classify::{ContextError, TimeoutIndicator, TransportError, normalize};
pub use self::code::ErrorCode;
pub use self::constructors::{FieldErrors, ValidationDetails};
pub use self::error::{BoxError, Cause, DEFAULT_STATUS, Error, ErrorBody, display_opt, is_code};
pub use self::log_fields::LogFields;
pub use self::retry_after::{format_retry_after, retry_after_header_seconds};
pub use self::trace_id::{
    RequestContext, TRACE_ID_HEADER, TraceId, attach_trace_id, generate_trace_id,
};
