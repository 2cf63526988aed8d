// ── Core error types ──
//
// User-facing errors from eventdesk-core. Consumers never see raw HTTP
// status codes or JSON parse failures; the `From<eventdesk_api::Error>` impl
// translates them. Server rejections (`success: false`) stay distinguishable
// from transport failures through `Rejected`.

use thiserror::Error;

use crate::model::EventStatus;

/// Unified error type for the core crate.
#[derive(Debug, Clone, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach event service at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Event not found: {identifier}")]
    EventNotFound { identifier: String },

    #[error("Not found: {message}")]
    NotFound { message: String },

    // ── Operation errors ─────────────────────────────────────────────
    #[error("{message}")]
    Rejected { message: String },

    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },

    #[error("Ticket details can only be changed while an event is upcoming (event is {status})")]
    TicketsLocked { status: EventStatus },

    #[error("Ticket details have not loaded yet")]
    TicketsNotLoaded,

    #[error("A {tab} save is already in progress")]
    SaveInProgress { tab: String },

    #[error("No poster file selected")]
    NoPendingPoster,

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("API error: {message}")]
    Api {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::ValidationFailed {
            message: message.into(),
        }
    }

    /// `true` when the server answered but refused the request.
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::Rejected { .. })
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<eventdesk_api::Error> for CoreError {
    fn from(err: eventdesk_api::Error) -> Self {
        use eventdesk_api::Error as ApiError;

        match err {
            ApiError::InvalidToken { message } => CoreError::AuthenticationFailed { message },
            ApiError::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout { timeout_secs: 0 }
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            ApiError::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            ApiError::Timeout { timeout_secs } => CoreError::Timeout { timeout_secs },
            ApiError::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            ApiError::Http {
                status: 401 | 403,
                message,
            } => CoreError::AuthenticationFailed { message },
            ApiError::Http {
                status: 404,
                message,
            } => CoreError::NotFound { message },
            ApiError::Http { status, message } => CoreError::Api {
                message,
                status: Some(status),
            },
            ApiError::Application { message } => CoreError::Rejected { message },
            ApiError::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Unexpected response: {message}"))
            }
            ApiError::PosterFile { path, source } => CoreError::ValidationFailed {
                message: format!("cannot read poster file {}: {source}", path.display()),
            },
        }
    }
}
