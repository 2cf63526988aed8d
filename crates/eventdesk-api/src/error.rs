use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for the `eventdesk-api` crate.
///
/// Splits failures into two families: transport problems (network, TLS,
/// timeouts, non-2xx responses) and application rejections where the
/// server answered `success: false`. `eventdesk-core` maps both into
/// user-facing diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// The configured token cannot be sent as a header value.
    #[error("Invalid API token: {message}")]
    InvalidToken { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Request timed out.
    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// TLS handshake or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    /// The server answered with a non-2xx status.
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    // ── Application ─────────────────────────────────────────────────
    /// The server answered 2xx with `success: false`.
    #[error("{message}")]
    Application { message: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    /// The poster file could not be read from disk.
    #[error("Cannot read poster file {}: {source}", .path.display())]
    PosterFile {
        path: PathBuf,
        source: std::io::Error,
    },
}
