//! CLI configuration: thin wrapper around `eventdesk_config`.
//!
//! Adds resolution that respects `GlobalOpts` flag overrides
//! (--server, --organiser, --token, --insecure, --timeout).

use clap::ValueEnum;
use secrecy::SecretString;
use tracing::warn;

use eventdesk_config::{ConfigError, profile_to_client_config};
use eventdesk_core::ClientConfig;

use crate::cli::{ColorMode, GlobalOpts, OutputFormat};
use crate::error::CliError;

pub use eventdesk_config::{
    Config, Defaults, Profile, config_path, load_config_or_default, save_config, store_token,
};

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    config.active_profile_name(global.profile.as_deref())
}

/// Build a `ClientConfig` from the config file, profile and CLI overrides.
///
/// Without a matching profile, `--server` and `--organiser` alone suffice.
pub fn build_client_config(global: &GlobalOpts) -> Result<ClientConfig, CliError> {
    let cfg = load_config_or_default();
    let profile_name = active_profile_name(global, &cfg);

    match cfg.profiles.get(&profile_name) {
        Some(profile) => resolve_profile(profile, &profile_name, &cfg.defaults, global),
        None if global.profile.is_some() => Err(CliError::ProfileNotFound {
            name: profile_name,
            available: available_profiles(&cfg),
        }),
        None => {
            if global.server.is_none() {
                return Err(CliError::NoConfig {
                    path: config_path().display().to_string(),
                });
            }
            resolve_profile(&Profile::default(), &profile_name, &cfg.defaults, global)
        }
    }
}

/// Translate a `Profile` + global flags into a `ClientConfig`.
///
/// Flags (and their env vars) take priority over profile values.
pub fn resolve_profile(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
    global: &GlobalOpts,
) -> Result<ClientConfig, CliError> {
    let mut effective = profile.clone();
    if let Some(ref server) = global.server {
        effective.server.clone_from(server);
    }
    if let Some(ref organiser) = global.organiser {
        effective.organiser_id.clone_from(organiser);
    }
    effective.insecure |= global.insecure;
    if global.timeout.is_some() {
        effective.timeout = global.timeout;
    }

    let mut config =
        profile_to_client_config(&effective, profile_name, defaults).map_err(|e| match e {
            ConfigError::Validation { field, reason } => CliError::validation(field, reason),
            other => CliError::Config(other),
        })?;
    if let Some(ref token) = global.token {
        config.token = Some(SecretString::from(token.clone()));
    }
    Ok(config)
}

/// Fill `--output` and `--color` from `[defaults]` when neither a flag nor
/// an env var chose them.
pub fn apply_defaults(global: &mut GlobalOpts, defaults: &Defaults) {
    if global.output.is_none() {
        global.output = OutputFormat::from_str(&defaults.output, true)
            .inspect_err(|_| warn!(value = %defaults.output, "ignoring unknown default output"))
            .ok();
    }
    if global.color.is_none() {
        global.color = ColorMode::from_str(&defaults.color, true)
            .inspect_err(|_| warn!(value = %defaults.color, "ignoring unknown default color"))
            .ok();
    }
}

pub fn available_profiles(cfg: &Config) -> String {
    if cfg.profiles.is_empty() {
        "(none)".into()
    } else {
        cfg.profiles.keys().cloned().collect::<Vec<_>>().join(", ")
    }
}
