//! Tests for failure classification.

use std::time::Duration;

use super::*;
use crate::domain::Joined;
use rstest::rstest;
use serde_json::json;

#[derive(Debug, thiserror::Error)]
#[error("opaque failure")]
struct Opaque;

#[derive(Debug, thiserror::Error)]
#[error("loading profile")]
struct Context(#[source] BoxError);

#[derive(Debug, thiserror::Error)]
#[error("upstream said {0}")]
struct Upstream(&'static str, #[source] Option<io::Error>);

#[derive(Debug, thiserror::Error)]
#[error("network hiccup")]
struct NetHiccup {
    timed_out: bool,
}

impl TimeoutIndicator for NetHiccup {
    fn is_timeout(&self) -> bool {
        self.timed_out
    }
}

fn boxed<E: StdError + Send + Sync + 'static>(err: E) -> Option<BoxError> {
    Some(Box::new(err))
}

#[rstest]
fn absent_failure_stays_absent() {
    assert!(normalize(None).is_none());
}

#[rstest]
fn structured_error_passes_through_with_fields_intact() {
    let original = Error::new(ErrorCode::Conflict, 409, "already exists")
        .with_trace_id("trace-1")
        .with_details(json!({"id": 7}))
        .with_retryable(true)
        .with_retry_after(Duration::from_secs(3));

    let normalized = normalize(boxed(original)).expect("classified");

    assert_eq!(normalized.code(), ErrorCode::Conflict);
    assert_eq!(normalized.status().as_u16(), 409);
    assert_eq!(normalized.message(), "already exists");
    assert_eq!(normalized.trace_id(), Some("trace-1"));
    assert_eq!(normalized.details(), Some(&json!({"id": 7})));
    assert!(normalized.retryable());
    assert_eq!(normalized.retry_after(), Some(Duration::from_secs(3)));
}

#[rstest]
fn bare_prototype_gets_status_and_message_filled() {
    let prototype = Error::bare(ErrorCode::NotFound).with_trace_id("t");
    assert_eq!(prototype.raw_status(), 0);

    let normalized = normalize(boxed(prototype)).expect("classified");

    assert_eq!(normalized.raw_status(), 500);
    assert_eq!(normalized.message(), "Not found");
    assert_eq!(normalized.trace_id(), Some("t"));
    assert_eq!(normalized.code(), ErrorCode::NotFound);
}

#[rstest]
fn structured_error_is_found_behind_a_wrapper() {
    let inner = Error::new(ErrorCode::Forbidden, 403, "nope").with_trace_id("inner");
    let normalized = normalize(boxed(Context(Box::new(inner)))).expect("classified");

    assert_eq!(normalized.code(), ErrorCode::Forbidden);
    assert_eq!(normalized.trace_id(), Some("inner"));
}

#[rstest]
fn structured_error_is_found_inside_io_other() {
    let failure = io::Error::other(Error::not_found("user 7"));
    let normalized = normalize(boxed(failure)).expect("classified");

    assert_eq!(normalized.code(), ErrorCode::NotFound);
    assert_eq!(normalized.status().as_u16(), 404);
    assert_eq!(normalized.message(), "user 7");
}

#[rstest]
#[case::direct(boxed(ContextError::DeadlineExceeded))]
#[case::wrapped(boxed(Context(Box::new(ContextError::DeadlineExceeded))))]
#[case::io_other(boxed(io::Error::other(ContextError::DeadlineExceeded)))]
#[case::joined(boxed(Joined::new(vec![
    Box::new(Opaque) as BoxError,
    Box::new(ContextError::DeadlineExceeded),
])))]
fn deadline_signals_become_timeouts(#[case] failure: Option<BoxError>) {
    let err = normalize(failure).expect("classified");
    assert_eq!(err.code(), ErrorCode::Timeout);
    assert_eq!(err.status().as_u16(), 504);
    assert!(err.retryable());
}

#[rstest]
#[tokio::test]
async fn elapsed_tokio_timeouts_become_timeouts() {
    let elapsed = tokio::time::timeout(Duration::from_millis(1), std::future::pending::<()>())
        .await
        .expect_err("pending future never completes");

    let err = normalize(boxed(elapsed)).expect("classified");
    assert_eq!(err.code(), ErrorCode::Timeout);
}

#[rstest]
#[case::direct(boxed(ContextError::Canceled))]
#[case::wrapped(boxed(Context(Box::new(ContextError::Canceled))))]
#[case::io_other(boxed(io::Error::other(Context(Box::new(ContextError::Canceled)))))]
fn cancellation_becomes_canceled(#[case] failure: Option<BoxError>) {
    let err = normalize(failure).expect("classified");
    assert_eq!(err.code(), ErrorCode::Canceled);
    assert_eq!(err.status().as_u16(), 499);
    assert!(!err.retryable());
}

#[rstest]
fn deadline_wins_over_cancellation_when_both_are_joined() {
    let failure = Joined::new(vec![
        Box::new(ContextError::Canceled) as BoxError,
        Box::new(ContextError::DeadlineExceeded),
    ]);
    let err = normalize(boxed(failure)).expect("classified");
    assert_eq!(err.code(), ErrorCode::Timeout);
}

#[rstest]
#[case::io(boxed(io::Error::new(io::ErrorKind::TimedOut, "read timed out")))]
#[case::custom(boxed(TransportError::new(NetHiccup { timed_out: true })))]
#[case::nested(boxed(Upstream(
    "slow",
    Some(io::Error::new(io::ErrorKind::TimedOut, "deadline")),
)))]
fn network_timeouts_become_timeouts(#[case] failure: Option<BoxError>) {
    let err = normalize(failure).expect("classified");
    assert_eq!(err.code(), ErrorCode::Timeout);
    assert_eq!(err.status().as_u16(), 504);
    assert!(err.retryable());
}

#[rstest]
fn transport_error_exposes_the_wrapped_failure() {
    let transport = TransportError::new(NetHiccup { timed_out: false });
    let inner = transport.source().expect("wrapped failure is the source");
    assert!(inner.is::<NetHiccup>());
}

#[rstest]
fn user_indicators_need_the_transport_wrapper() {
    let bare = normalize(boxed(NetHiccup { timed_out: true })).expect("classified");
    assert_eq!(bare.code(), ErrorCode::Internal);

    let wrapped = normalize(boxed(TransportError::new(NetHiccup { timed_out: true })))
        .expect("classified");
    assert_eq!(wrapped.code(), ErrorCode::Timeout);
}

#[rstest]
fn structured_error_behind_a_transport_wrapper_passes_through() {
    let failure = TransportError::new(io::Error::other(Error::unavailable("maintenance")));
    let normalized = normalize(boxed(failure)).expect("classified");
    assert_eq!(normalized.code(), ErrorCode::Unavailable);
}

#[rstest]
fn transport_errors_without_timeout_are_internal() {
    let err = normalize(boxed(TransportError::new(NetHiccup { timed_out: false })))
        .expect("classified");
    assert_eq!(err.code(), ErrorCode::Internal);
}

#[rstest]
fn opaque_failures_are_wrapped_as_internal() {
    let err = normalize(boxed(Opaque)).expect("classified");

    assert_eq!(err.code(), ErrorCode::Internal);
    assert_eq!(err.status().as_u16(), 500);
    assert!(!err.retryable());
    assert_eq!(err.message(), "Internal error");
    let cause = err.cause().expect("cause preserved");
    assert!(cause.downcast_ref::<Opaque>().is_some());
    assert_eq!(err.to_string(), "INTERNAL: Internal error (opaque failure)");
}

#[rstest]
fn internal_wrap_does_not_leak_original_text_into_the_body() {
    let err = normalize(Some("password=hunter2 rejected".into())).expect("classified");
    let body = serde_json::to_value(&err).expect("serialises");
    assert_eq!(body["message"], "Internal error");
    assert!(!body.to_string().contains("hunter2"));
}

#[rstest]
fn non_timeout_io_errors_are_internal() {
    let err = normalize(boxed(io::Error::other("disk full"))).expect("classified");
    assert_eq!(err.code(), ErrorCode::Internal);
}
