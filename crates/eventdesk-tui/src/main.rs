//! `eventdesk-tui` — terminal front end for an organiser's events.
//!
//! Built on [ratatui](https://ratatui.rs). The events screen lists every
//! event with its derived status; the edit dialog saves basic details,
//! ticket pricing and the poster independently.
//!
//! Logs are written to a file (default `/tmp/eventdesk-tui.log`) so they never
//! corrupt the terminal. Network calls run on background tasks and report
//! back into the action loop.
//!
//! Entry point: CLI argument parsing, tracing setup, panic hooks, and app launch.

mod action;
mod app;
mod component;
mod event;
mod screens;
mod theme;
mod tui;
mod widgets;

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr, eyre};
use secrecy::SecretString;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use eventdesk_config::{Config, Profile, profile_to_client_config};
use eventdesk_core::{ClientConfig, Controller};

use crate::app::App;

/// Terminal UI for browsing and editing events.
#[derive(Parser, Debug)]
#[command(name = "eventdesk-tui", version, about)]
struct Cli {
    /// Profile from the shared eventdesk config file
    #[arg(short = 'p', long, env = "EVENTDESK_PROFILE")]
    profile: Option<String>,

    /// Event service URL (overrides profile)
    #[arg(short = 's', long, env = "EVENTDESK_SERVER")]
    server: Option<String>,

    /// Organiser whose events are shown (overrides profile)
    #[arg(long, env = "EVENTDESK_ORGANISER")]
    organiser: Option<String>,

    /// Bearer token (overrides profile and keyring)
    #[arg(long, env = "EVENTDESK_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Accept invalid TLS certificates
    #[arg(short = 'k', long, env = "EVENTDESK_INSECURE")]
    insecure: bool,

    /// Request timeout in seconds
    #[arg(long, env = "EVENTDESK_TIMEOUT")]
    timeout: Option<u64>,

    /// Log file path (defaults to /tmp/eventdesk-tui.log)
    #[arg(long, default_value = "/tmp/eventdesk-tui.log")]
    log_file: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Set up file-based tracing. Logging to stdout/stderr would corrupt the
/// terminal. The returned guard must be held until exit so logs flush.
fn setup_tracing(cli: &Cli) -> WorkerGuard {
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "eventdesk_tui={log_level},eventdesk_core={log_level},eventdesk_api={log_level}"
        ))
    });

    let log_dir = cli
        .log_file
        .parent()
        .unwrap_or(std::path::Path::new("/tmp"));
    let log_filename = cli
        .log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("eventdesk-tui.log"));

    let file_appender = tracing_appender::rolling::never(log_dir, log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true),
        )
        .init();

    guard
}

/// Resolve the client configuration: flags over the selected profile.
fn build_client_config(cli: &Cli) -> Result<ClientConfig> {
    resolve_client_config(cli, &eventdesk_config::load_config_or_default())
}

fn resolve_client_config(cli: &Cli, cfg: &Config) -> Result<ClientConfig> {
    let profile_name = cfg.active_profile_name(cli.profile.as_deref());
    let mut profile = match cfg.profiles.get(&profile_name) {
        Some(profile) => profile.clone(),
        None if cli.profile.is_some() => {
            return Err(eyre!("profile '{profile_name}' not found in the config file"));
        }
        None => Profile::default(),
    };

    if let Some(ref server) = cli.server {
        profile.server.clone_from(server);
    }
    if profile.server.is_empty() {
        return Err(eyre!(
            "no event service configured; run `eventdesk config init` or pass --server"
        ));
    }
    if let Some(ref organiser) = cli.organiser {
        profile.organiser_id.clone_from(organiser);
    }
    profile.insecure |= cli.insecure;
    profile.timeout = cli.timeout.or(profile.timeout);

    let mut config = profile_to_client_config(&profile, &profile_name, &cfg.defaults)
        .wrap_err_with(|| format!("profile '{profile_name}' is incomplete"))?;
    if let Some(ref token) = cli.token {
        config.token = Some(SecretString::from(token.clone()));
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Hooks go in before the terminal is touched so init panics print cleanly
    tui::install_hooks()?;

    let _log_guard = setup_tracing(&cli);

    let config = build_client_config(&cli)?;
    info!(
        url = %config.url,
        organiser = %config.organiser_id,
        "starting eventdesk-tui"
    );

    let controller = Controller::new(config)?;
    let mut app = App::new(controller);
    app.run().await?;

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn config_with_profile() -> Config {
        let mut cfg = Config::default();
        cfg.defaults.timeout = 75;
        cfg.profiles.insert(
            "default".into(),
            Profile {
                server: "https://events.example.com".into(),
                organiser_id: "org-1".into(),
                ..Profile::default()
            },
        );
        cfg
    }

    #[test]
    fn flags_override_the_profile() {
        let cli = Cli::try_parse_from([
            "eventdesk-tui",
            "--organiser",
            "org-9",
            "--timeout",
            "5",
            "--token",
            "flag-token",
        ])
        .unwrap();
        let config = resolve_client_config(&cli, &config_with_profile()).unwrap();
        assert_eq!(config.url.as_str(), "https://events.example.com/");
        assert_eq!(config.organiser_id, "org-9");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert!(config.token.is_some());
    }

    #[test]
    fn profile_timeout_falls_back_to_global_default() {
        let cli = Cli::try_parse_from(["eventdesk-tui"]).unwrap();
        let config = resolve_client_config(&cli, &config_with_profile()).unwrap();
        assert_eq!(config.timeout, Duration::from_secs(75));
    }

    #[test]
    fn missing_server_and_unknown_profile_are_reported() {
        let cli = Cli::try_parse_from(["eventdesk-tui"]).unwrap();
        let err = resolve_client_config(&cli, &Config::default()).unwrap_err();
        assert!(err.to_string().contains("no event service configured"));

        let cli = Cli::try_parse_from(["eventdesk-tui", "--profile", "work"]).unwrap();
        let err = resolve_client_config(&cli, &config_with_profile()).unwrap_err();
        assert!(err.to_string().contains("profile 'work' not found"));
    }
}
