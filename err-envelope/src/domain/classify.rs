//! Classification of arbitrary failures into [`Error`] envelopes.
//!
//! [`normalize`] applies a fixed precedence and stops at the first rule that
//! matches:
//!
//! 1. an [`Error`] (directly or anywhere in the chain) passes through;
//! 2. a deadline signal becomes `TIMEOUT` (504, retryable);
//! 3. a cancellation signal becomes `CANCELED` (499, not retryable);
//! 4. a failure whose [`TimeoutIndicator`] reports a timeout becomes `TIMEOUT`;
//! 5. anything else is wrapped as `INTERNAL` (500) with the original kept as
//!    the cause.

use std::error::Error as StdError;
use std::fmt;
use std::io;

use super::chain::{find_in_chain, walk_chain};
use super::code::ErrorCode;
use super::error::{BoxError, Error};

/// Request lifecycle signals produced by whatever enforces deadlines and
/// cancellation upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ContextError {
    /// The request ran past its deadline.
    #[error("context deadline exceeded")]
    DeadlineExceeded,
    /// The request was abandoned, usually by the client.
    #[error("context canceled")]
    Canceled,
}

/// Timeout capability, recognised only on failures wrapped in a
/// [`TransportError`].
///
/// The classifier checks for the capability rather than for concrete types.
/// Besides [`TransportError`] it knows `io::Error` and `reqwest::Error`; a
/// type of your own that implements this trait is classified as `INTERNAL`
/// unless it travels inside [`TransportError::new`].
pub trait TimeoutIndicator: StdError + Send + Sync + 'static {
    /// Whether the failure was caused by a timeout.
    fn is_timeout(&self) -> bool;
}

impl TimeoutIndicator for io::Error {
    fn is_timeout(&self) -> bool {
        self.kind() == io::ErrorKind::TimedOut
    }
}

impl TimeoutIndicator for reqwest::Error {
    fn is_timeout(&self) -> bool {
        reqwest::Error::is_timeout(self)
    }
}

/// Transport-layer failure carrying a [`TimeoutIndicator`].
///
/// # Examples
/// ```
/// use err_envelope::domain::{normalize, ErrorCode, TimeoutIndicator, TransportError};
///
/// #[derive(Debug, thiserror::Error)]
/// #[error("dial tcp: i/o timeout")]
/// struct DialTimeout;
///
/// impl TimeoutIndicator for DialTimeout {
///     fn is_timeout(&self) -> bool {
///         true
///     }
/// }
///
/// let err = normalize(Some(Box::new(TransportError::new(DialTimeout)))).expect("classified");
/// assert_eq!(err.code(), ErrorCode::Timeout);
/// ```
#[derive(Debug)]
pub struct TransportError {
    inner: BoxError,
    timed_out: bool,
}

impl TransportError {
    /// Wrap a transport failure, asking it once whether it timed out.
    #[must_use]
    pub fn new<E: TimeoutIndicator>(inner: E) -> Self {
        let timed_out = inner.is_timeout();
        Self {
            inner: Box::new(inner),
            timed_out,
        }
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.inner, f)
    }
}

impl StdError for TransportError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        Some(self.inner.as_ref())
    }
}

impl TimeoutIndicator for TransportError {
    fn is_timeout(&self) -> bool {
        self.timed_out
    }
}

/// Map any failure to an [`Error`].
///
/// `None` means "no failure" and yields `None`. Every other input yields an
/// envelope; this function cannot fail.
///
/// # Examples
/// ```
/// use err_envelope::domain::{normalize, ContextError, ErrorCode};
///
/// assert!(normalize(None).is_none());
///
/// let err = normalize(Some(Box::new(ContextError::Canceled))).expect("classified");
/// assert_eq!(err.code(), ErrorCode::Canceled);
/// assert_eq!(err.status().as_u16(), 499);
///
/// let err = normalize(Some("boom".into())).expect("classified");
/// assert_eq!(err.code(), ErrorCode::Internal);
/// assert_eq!(err.message(), "Internal error");
/// ```
#[must_use]
pub fn normalize(failure: Option<BoxError>) -> Option<Error> {
    failure.map(classify)
}

fn classify(failure: BoxError) -> Error {
    match failure.downcast::<Error>() {
        Ok(envelope) => envelope.with_defaults_filled(),
        Err(other) => classify_foreign(other),
    }
}

fn classify_foreign(failure: BoxError) -> Error {
    let root: &(dyn StdError + 'static) = failure.as_ref();
    if let Some(envelope) = find_in_chain::<Error>(root) {
        return envelope.clone().with_defaults_filled();
    }
    if is_deadline_exceeded(root) {
        return timeout();
    }
    if is_canceled(root) {
        return canceled();
    }
    if reports_timeout(root) {
        return timeout();
    }

    Error::wrap_boxed(ErrorCode::Internal, 500, "", failure).with_retryable(false)
}

fn timeout() -> Error {
    Error::new(ErrorCode::Timeout, 504, "").with_retryable(true)
}

fn canceled() -> Error {
    Error::new(ErrorCode::Canceled, 499, "").with_retryable(false)
}

fn is_deadline_exceeded(root: &(dyn StdError + 'static)) -> bool {
    walk_chain(root, |link| {
        matches!(
            link.downcast_ref::<ContextError>(),
            Some(ContextError::DeadlineExceeded)
        ) || link.is::<tokio::time::error::Elapsed>()
    })
}

fn is_canceled(root: &(dyn StdError + 'static)) -> bool {
    walk_chain(root, |link| {
        matches!(
            link.downcast_ref::<ContextError>(),
            Some(ContextError::Canceled)
        )
    })
}

fn reports_timeout(root: &(dyn StdError + 'static)) -> bool {
    walk_chain(root, |link| {
        indicator(link).is_some_and(|found| found.is_timeout())
    })
}

fn indicator<'a>(link: &'a (dyn StdError + 'static)) -> Option<&'a dyn TimeoutIndicator> {
    if let Some(transport) = link.downcast_ref::<TransportError>() {
        return Some(transport as &dyn TimeoutIndicator);
    }
    if let Some(io) = link.downcast_ref::<io::Error>() {
        return Some(io as &dyn TimeoutIndicator);
    }
    link.downcast_ref::<reqwest::Error>()
        .map(|err| err as &dyn TimeoutIndicator)
}

#[cfg(test)]
mod tests;
