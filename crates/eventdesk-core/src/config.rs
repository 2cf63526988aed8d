// ── Runtime connection configuration ──
//
// Describes how to reach the event service. Carries credentials and
// connection tuning, but never touches disk: the CLI/TUI build a
// `ClientConfig` and hand it in.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use url::Url;

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification (local development servers).
    DangerAcceptInvalid,
}

/// Everything needed to talk to the event service as one organiser.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Service root (e.g., `https://events.example.com`).
    pub url: Url,
    /// Organiser whose events are listed.
    pub organiser_id: String,
    /// Optional bearer token.
    pub token: Option<SecretString>,
    pub tls: TlsVerification,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(url: Url, organiser_id: impl Into<String>) -> Self {
        Self {
            url,
            organiser_id: organiser_id.into(),
            token: None,
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
        }
    }
}
