//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and a stable process exit code.

use miette::Diagnostic;
use thiserror::Error;

use eventdesk_config::ConfigError;
use eventdesk_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const REJECTED: i32 = 5;
    pub const VALIDATION: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the event service at {url}")]
    #[diagnostic(
        code(eventdesk::connection_failed),
        help(
            "Check that the service is running and reachable.\n\
             URL: {url}\n\
             Self-signed certificate? Try --insecure (-k)."
        )
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out after {seconds}s")]
    #[diagnostic(
        code(eventdesk::timeout),
        help("Increase the timeout with --timeout or check service responsiveness.")
    )]
    Timeout { seconds: u64 },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(eventdesk::auth_failed),
        help(
            "Verify the bearer token for this profile.\n\
             Run: eventdesk config set-token --profile {profile}\n\
             Or set EVENTDESK_TOKEN."
        )
    )]
    AuthFailed { profile: String, message: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("Event '{identifier}' not found")]
    #[diagnostic(
        code(eventdesk::not_found),
        help("List available events with: eventdesk events list")
    )]
    NotFound { identifier: String },

    // ── Server decisions ─────────────────────────────────────────────
    #[error("The event service rejected the request: {message}")]
    #[diagnostic(code(eventdesk::rejected))]
    Rejected { message: String },

    #[error("Event service error: {message}")]
    #[diagnostic(code(eventdesk::api_error))]
    ApiError { message: String, status: Option<u16> },

    // ── Input ────────────────────────────────────────────────────────
    #[error("Invalid {field}: {reason}")]
    #[diagnostic(code(eventdesk::validation))]
    Validation { field: String, reason: String },

    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(eventdesk::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found")]
    #[diagnostic(
        code(eventdesk::profile_not_found),
        help("Available profiles: {available}\nCreate one with: eventdesk config init")
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No event service configured")]
    #[diagnostic(
        code(eventdesk::no_config),
        help(
            "Create a profile with: eventdesk config init\n\
             Or pass --server and --organiser (EVENTDESK_SERVER, EVENTDESK_ORGANISER).\n\
             Expected config at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(eventdesk::config))]
    Config(#[from] ConfigError),

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Internal(String),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::AuthFailed { .. } => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Rejected { .. } => exit_code::REJECTED,
            Self::Validation { .. } => exit_code::VALIDATION,
            Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }

    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => CliError::ConnectionFailed { url, reason },

            CoreError::Timeout { timeout_secs } => CliError::Timeout {
                seconds: timeout_secs,
            },

            CoreError::AuthenticationFailed { message } => CliError::AuthFailed {
                profile: "current".into(),
                message,
            },

            CoreError::EventNotFound { identifier } => CliError::NotFound { identifier },

            CoreError::NotFound { message } => CliError::ApiError {
                message,
                status: Some(404),
            },

            CoreError::Rejected { message } => CliError::Rejected { message },

            CoreError::ValidationFailed { message } => CliError::Validation {
                field: "input".into(),
                reason: message,
            },

            e @ (CoreError::TicketsLocked { .. }
            | CoreError::TicketsNotLoaded
            | CoreError::SaveInProgress { .. }
            | CoreError::NoPendingPoster) => CliError::Validation {
                field: "request".into(),
                reason: e.to_string(),
            },

            CoreError::Api { message, status } => CliError::ApiError { message, status },

            CoreError::Config { message } => CliError::validation("configuration", message),

            CoreError::Internal(message) => CliError::Internal(message),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use eventdesk_core::EventStatus;

    use super::*;

    #[test]
    fn core_errors_map_to_distinct_exit_codes() {
        let cases = [
            (
                CoreError::ConnectionFailed {
                    url: "http://x".into(),
                    reason: "refused".into(),
                },
                exit_code::CONNECTION,
            ),
            (CoreError::Timeout { timeout_secs: 30 }, exit_code::TIMEOUT),
            (
                CoreError::AuthenticationFailed {
                    message: "bad token".into(),
                },
                exit_code::AUTH,
            ),
            (
                CoreError::EventNotFound {
                    identifier: "evt-9".into(),
                },
                exit_code::NOT_FOUND,
            ),
            (
                CoreError::Rejected {
                    message: "Event has bookings".into(),
                },
                exit_code::REJECTED,
            ),
            (
                CoreError::TicketsLocked {
                    status: EventStatus::Ongoing,
                },
                exit_code::VALIDATION,
            ),
            (CoreError::Internal("boom".into()), exit_code::GENERAL),
        ];

        for (core, expected) in cases {
            let cli = CliError::from(core);
            assert_eq!(cli.exit_code(), expected, "{cli:?}");
        }
    }

    #[test]
    fn rejection_keeps_server_message() {
        let cli = CliError::from(CoreError::Rejected {
            message: "Event has bookings".into(),
        });
        assert!(cli.to_string().contains("Event has bookings"));
    }
}
