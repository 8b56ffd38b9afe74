//! Demo server settings and endpoints.

mod config;
pub mod routes;

pub use config::ServerSettings;
pub use routes::configure;
