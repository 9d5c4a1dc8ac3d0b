// HTTP client construction for `AuthSession`.
//
// Keydom servers are installed on site and usually answer on HTTPS with a
// certificate generated at install time, so the default client accepts it.
// Deployments with a proper chain pick `TlsMode::System` or pin their own CA.

use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::ClientBuilder;

use crate::error::Error;

const USER_AGENT: &str = concat!("keydom-api/", env!("CARGO_PKG_VERSION"));
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// How the server certificate is checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TlsMode {
    /// Platform trust store.
    System,
    /// Trust the PEM-encoded CA at this path in addition to the platform store.
    CustomCa(PathBuf),
    /// No verification. Matches what a fresh on-premise install needs.
    DangerAcceptInvalid,
}

/// Settings for the `reqwest::Client` behind a session.
///
/// The default is a 30 second timeout with certificate checks off.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub tls: TlsMode,
    pub timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            tls: TlsMode::DangerAcceptInvalid,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl TransportConfig {
    /// Override the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Override the TLS verification mode.
    pub fn with_tls(mut self, tls: TlsMode) -> Self {
        self.tls = tls;
        self
    }

    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        let builder = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(USER_AGENT);

        apply_tls(builder, &self.tls)?
            .build()
            .map_err(|e| Error::Tls(format!("failed to build HTTP client: {e}")))
    }
}

fn apply_tls(builder: ClientBuilder, tls: &TlsMode) -> Result<ClientBuilder, Error> {
    Ok(match tls {
        TlsMode::System => builder,
        TlsMode::CustomCa(path) => builder.add_root_certificate(load_ca(path)?),
        TlsMode::DangerAcceptInvalid => builder.danger_accept_invalid_certs(true),
    })
}

fn load_ca(path: &Path) -> Result<reqwest::Certificate, Error> {
    let pem = std::fs::read(path)
        .map_err(|e| Error::Tls(format!("failed to read CA cert {}: {e}", path.display())))?;
    reqwest::Certificate::from_pem(&pem).map_err(|e| Error::Tls(format!("invalid CA cert: {e}")))
}
