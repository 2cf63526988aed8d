//! Config subcommand handlers.

use std::collections::BTreeMap;

use clap::ValueEnum;
use dialoguer::{Input, Select};
use secrecy::SecretString;

use eventdesk_config::Defaults;

use crate::cli::{ColorMode, ConfigArgs, ConfigCommand, GlobalOpts, OutputFormat};
use crate::config::{self, Config, Profile};
use crate::error::CliError;
use crate::output;

const MASK: &str = "****";

// ── Helpers ─────────────────────────────────────────────────────────

/// Copy of `cfg` with plaintext tokens masked.
fn redacted(cfg: &Config) -> Config {
    Config {
        default_profile: cfg.default_profile.clone(),
        defaults: Defaults {
            output: cfg.defaults.output.clone(),
            color: cfg.defaults.color.clone(),
            timeout: cfg.defaults.timeout,
        },
        profiles: cfg
            .profiles
            .iter()
            .map(|(name, p)| {
                let mut p = p.clone();
                if p.token.is_some() {
                    p.token = Some(MASK.into());
                }
                (name.clone(), p)
            })
            .collect(),
    }
}

/// TOML-like rendering for the table output format.
fn format_config(cfg: &Config) -> String {
    use std::fmt::Write;
    let mut out = String::new();

    if let Some(ref default) = cfg.default_profile {
        let _ = writeln!(out, "default_profile = \"{default}\"");
    }
    let _ = writeln!(out, "\n[defaults]");
    let _ = writeln!(out, "output = \"{}\"", cfg.defaults.output);
    let _ = writeln!(out, "color = \"{}\"", cfg.defaults.color);
    let _ = writeln!(out, "timeout = {}", cfg.defaults.timeout);

    for (name, p) in &cfg.profiles {
        let _ = writeln!(out, "\n[profiles.{name}]");
        let _ = writeln!(out, "server = \"{}\"", p.server);
        let _ = writeln!(out, "organiser_id = \"{}\"", p.organiser_id);
        if let Some(ref token) = p.token {
            let _ = writeln!(out, "token = \"{token}\"");
        }
        if let Some(ref env) = p.token_env {
            let _ = writeln!(out, "token_env = \"{env}\"");
        }
        if let Some(ref ca) = p.ca_cert {
            let _ = writeln!(out, "ca_cert = \"{}\"", ca.display());
        }
        if p.insecure {
            let _ = writeln!(out, "insecure = true");
        }
        if let Some(timeout) = p.timeout {
            let _ = writeln!(out, "timeout = {timeout}");
        }
    }

    out.trim_end().to_owned()
}

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::validation("interactive", format!("prompt failed: {e}"))
}

fn profile_not_found(cfg: &Config, name: String) -> CliError {
    CliError::ProfileNotFound {
        name,
        available: config::available_profiles(cfg),
    }
}

/// Ask for a token and store it in the keyring or (on request) in plaintext.
///
/// Returns the plaintext value to write into the profile, if any.
fn prompt_token(profile_name: &str) -> Result<Option<String>, CliError> {
    let token = rpassword::prompt_password("Bearer token (empty for none): ").map_err(prompt_err)?;
    if token.is_empty() {
        return Ok(None);
    }

    let choices = &[
        "Store in system keyring (recommended)",
        "Save to config file (plaintext)",
    ];
    let selection = Select::new()
        .with_prompt("Where should the token be kept?")
        .items(choices)
        .default(0)
        .interact()
        .map_err(prompt_err)?;

    if selection == 0 {
        config::store_token(profile_name, &SecretString::from(token))?;
        eprintln!("   ✓ token stored in system keyring");
        Ok(None)
    } else {
        Ok(Some(token))
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Init => {
            let config_path = config::config_path();
            eprintln!("eventdesk configuration wizard");
            eprintln!("   Config path: {}\n", config_path.display());

            let mut cfg = config::load_config_or_default();

            let profile_name: String = Input::new()
                .with_prompt("Profile name")
                .default("default".into())
                .interact_text()
                .map_err(prompt_err)?;

            let server: String = Input::new()
                .with_prompt("Event service URL")
                .default("http://localhost:5000".into())
                .validate_with(|s: &String| {
                    s.parse::<url::Url>()
                        .map(|_| ())
                        .map_err(|e| format!("invalid URL: {e}"))
                })
                .interact_text()
                .map_err(prompt_err)?;

            let organiser_id: String = Input::new()
                .with_prompt("Organiser ID")
                .validate_with(|s: &String| {
                    if s.trim().is_empty() {
                        Err("organiser ID must not be empty")
                    } else {
                        Ok(())
                    }
                })
                .interact_text()
                .map_err(prompt_err)?;

            let token = prompt_token(&profile_name)?;

            cfg.profiles.insert(
                profile_name.clone(),
                Profile {
                    server,
                    organiser_id: organiser_id.trim().to_owned(),
                    token,
                    ..Profile::default()
                },
            );
            cfg.default_profile = Some(profile_name.clone());

            let written = config::save_config(&cfg)?;
            eprintln!("\n✓ Configuration written to {}", written.display());
            eprintln!("  Active profile: {profile_name}");
            eprintln!("\n  Test it: eventdesk events list");
            Ok(())
        }

        ConfigCommand::Show => {
            let cfg = redacted(&config::load_config_or_default());
            let out = output::render_single(global.output(), &cfg, format_config, |_| {
                config::config_path().display().to_string()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Set { key, value } => {
            let mut cfg = config::load_config_or_default();
            if let Some(name) = key.strip_prefix("defaults.") {
                set_default(&mut cfg.defaults, name, value)?;
                config::save_config(&cfg)?;
                eprintln!("✓ Set {key}");
                return Ok(());
            }

            let profile_name = config::active_profile_name(global, &cfg);
            let profile = cfg.profiles.entry(profile_name.clone()).or_default();

            match key.as_str() {
                "server" => {
                    value
                        .parse::<url::Url>()
                        .map_err(|e| CliError::validation("server", format!("invalid URL: {e}")))?;
                    profile.server = value;
                }
                "organiser_id" | "organiser-id" => profile.organiser_id = value,
                "token_env" | "token-env" => profile.token_env = Some(value),
                "ca_cert" | "ca-cert" => profile.ca_cert = Some(value.into()),
                "insecure" => {
                    profile.insecure = value
                        .parse()
                        .map_err(|_| CliError::validation("insecure", "must be 'true' or 'false'"))?;
                }
                "timeout" => {
                    profile.timeout = Some(
                        value
                            .parse()
                            .map_err(|_| CliError::validation("timeout", "must be a number (seconds)"))?,
                    );
                }
                other => {
                    return Err(CliError::validation(
                        other,
                        "unknown config key. Valid keys: server, organiser_id, token_env, \
                         ca_cert, insecure, timeout, defaults.output, defaults.color, \
                         defaults.timeout",
                    ));
                }
            }

            config::save_config(&cfg)?;
            eprintln!("✓ Set {key} on profile '{profile_name}'");
            Ok(())
        }

        ConfigCommand::Profiles => {
            let cfg = config::load_config_or_default();
            let default = cfg.default_profile.as_deref().unwrap_or("default");
            if cfg.profiles.is_empty() {
                eprintln!("No profiles configured. Run: eventdesk config init");
            } else {
                let listing: BTreeMap<&str, &str> = cfg
                    .profiles
                    .iter()
                    .map(|(name, p)| (name.as_str(), p.server.as_str()))
                    .collect();
                for (name, server) in listing {
                    let marker = if name == default { " *" } else { "" };
                    println!("{name}{marker}\t{server}");
                }
            }
            Ok(())
        }

        ConfigCommand::Use { name } => {
            let mut cfg = config::load_config_or_default();
            if !cfg.profiles.contains_key(&name) {
                return Err(profile_not_found(&cfg, name));
            }
            cfg.default_profile = Some(name.clone());
            config::save_config(&cfg)?;
            eprintln!("✓ Default profile set to '{name}'");
            Ok(())
        }

        ConfigCommand::SetToken { profile } => {
            let cfg = config::load_config_or_default();
            let profile_name = profile.unwrap_or_else(|| config::active_profile_name(global, &cfg));
            if !cfg.profiles.contains_key(&profile_name) {
                return Err(profile_not_found(&cfg, profile_name));
            }

            let token = rpassword::prompt_password("Bearer token: ").map_err(prompt_err)?;
            if token.is_empty() {
                return Err(CliError::validation("token", "value cannot be empty"));
            }
            config::store_token(&profile_name, &SecretString::from(token))?;
            eprintln!("✓ Token stored in system keyring for profile '{profile_name}'");
            Ok(())
        }
    }
}

/// Set one `[defaults]` value, checking it the way the flag would.
fn set_default(defaults: &mut Defaults, name: &str, value: String) -> Result<(), CliError> {
    match name {
        "output" => {
            OutputFormat::from_str(&value, true).map_err(|_| {
                CliError::validation(
                    "defaults.output",
                    "must be table, json, json-compact, yaml or plain",
                )
            })?;
            defaults.output = value;
        }
        "color" => {
            ColorMode::from_str(&value, true).map_err(|_| {
                CliError::validation("defaults.color", "must be auto, always or never")
            })?;
            defaults.color = value;
        }
        "timeout" => {
            defaults.timeout = value.parse().map_err(|_| {
                CliError::validation("defaults.timeout", "must be a number (seconds)")
            })?;
        }
        other => {
            return Err(CliError::validation(
                format!("defaults.{other}"),
                "unknown default. Valid keys: defaults.output, defaults.color, defaults.timeout",
            ));
        }
    }
    Ok(())
}
