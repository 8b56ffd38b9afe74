//! Request-scoped trace identifier for correlation across logs and errors.
//!
//! A [`TraceId`] is derived once per inbound request and carried in an
//! immutable [`RequestContext`] that downstream code receives explicitly.
//! Nothing here is ambient: concurrent requests each own their context.

use std::fmt;

use rand::RngCore;
use rand::rngs::OsRng;

/// Header carrying the trace identifier in both directions.
pub const TRACE_ID_HEADER: &str = "X-Request-Id";

/// Number of random bytes behind a generated identifier.
const TRACE_ID_BYTES: usize = 16;

/// Per-request correlation identifier.
///
/// Inbound identifiers are accepted verbatim; generated ones are 32
/// lowercase hex characters.
///
/// # Examples
/// ```
/// use err_envelope::TraceId;
///
/// let id = TraceId::generate();
/// assert_eq!(id.as_str().len(), 32);
/// assert!(id.as_str().chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TraceId(String);

impl TraceId {
    /// Generate a fresh identifier from the operating system's CSPRNG.
    #[must_use]
    pub fn generate() -> Self {
        let mut bytes = [0_u8; TRACE_ID_BYTES];
        OsRng.fill_bytes(&mut bytes);
        Self(hex::encode(bytes))
    }

    /// Accept an externally supplied identifier. Empty values are rejected.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        (!value.is_empty()).then(|| Self(value.to_owned()))
    }

    /// Borrow the identifier text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Consume the identifier, returning its text.
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Generate a trace identifier as plain text.
#[must_use]
pub fn generate_trace_id() -> String {
    TraceId::generate().into_string()
}

/// Immutable per-request context.
///
/// Deriving a context with [`RequestContext::with_trace_id`] leaves the
/// parent untouched.
///
/// # Examples
/// ```
/// use err_envelope::{RequestContext, TraceId};
///
/// let parent = RequestContext::default();
/// let child = parent.with_trace_id(TraceId::parse("abc-123").expect("non-empty"));
/// assert!(parent.trace_id().is_none());
/// assert_eq!(child.trace_id().map(TraceId::as_str), Some("abc-123"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    trace_id: Option<TraceId>,
}

impl RequestContext {
    /// Derive a context carrying `id`.
    #[must_use]
    pub fn with_trace_id(&self, id: TraceId) -> Self {
        let mut derived = self.clone();
        derived.trace_id = Some(id);
        derived
    }

    /// Trace identifier carried by this context, if any.
    #[must_use]
    pub const fn trace_id(&self) -> Option<&TraceId> {
        self.trace_id.as_ref()
    }
}

/// Derive a context carrying `id` from `parent`.
///
/// Empty identifiers produce an unchanged copy of `parent`.
#[must_use]
pub fn attach_trace_id(parent: &RequestContext, id: &str) -> RequestContext {
    TraceId::parse(id).map_or_else(|| parent.clone(), |trace_id| parent.with_trace_id(trace_id))
}
