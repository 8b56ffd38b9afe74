//! Demo server settings loaded via OrthoConfig.

use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;

/// Bind address and logging format for the demo server.
///
/// Environment variables use the `ENVELOPE_` prefix, for example
/// `ENVELOPE_PORT=9090`.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "ENVELOPE")]
pub struct ServerSettings {
    /// Host name or address to bind.
    pub host: Option<String>,
    /// TCP port to bind.
    pub port: Option<u16>,
    /// Emit logs as JSON lines rather than human-readable text.
    pub json_logs: Option<bool>,
}

impl ServerSettings {
    /// Host to bind, falling back to `0.0.0.0`.
    #[must_use]
    pub fn host(&self) -> &str {
        self.host.as_deref().unwrap_or(DEFAULT_HOST)
    }

    /// Port to bind, falling back to 8080.
    #[must_use]
    pub fn port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_PORT)
    }

    /// Whether logs are JSON lines, on unless switched off.
    #[must_use]
    pub fn json_logs(&self) -> bool {
        self.json_logs.unwrap_or(true)
    }
}
