//! Request middleware.
//!
//! Purpose: attach the per-request trace context before handlers run.

pub mod trace;

pub use trace::Trace;
