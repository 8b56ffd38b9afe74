//! Inbound adapters that turn failures into transport responses.

pub mod http;
