//! Shared helpers for command handlers.

use std::io::IsTerminal;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use crate::error::CliError;

/// Prompt for confirmation, auto-approving if `--yes` was passed.
///
/// Without a terminal to ask on, refuses instead of blocking.
pub fn confirm(message: &str, yes_flag: bool, action: &str) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: action.into(),
        });
    }
    dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))
}

/// Stderr spinner for long requests; hidden in quiet mode.
pub fn spinner(message: &str, quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.magenta} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.to_owned());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

/// Split a `key=value` assignment.
pub fn parse_assignment(raw: &str) -> Result<(&str, &str), CliError> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| CliError::validation("set", format!("expected KEY=VALUE, got {raw:?}")))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(CliError::validation("set", format!("missing key in {raw:?}")));
    }
    Ok((key, value))
}

/// One `TYPE:PRICE:COUNT` price tier as raw text fields.
///
/// The type may itself contain colons; price and count are taken from the end.
pub fn parse_category(raw: &str) -> Result<(&str, &str, &str), CliError> {
    let mut parts = raw.rsplitn(3, ':');
    let count = parts.next();
    let price = parts.next();
    let name = parts.next();
    match (name, price, count) {
        (Some(name), Some(price), Some(count)) => Ok((name, price, count)),
        _ => Err(CliError::validation(
            "category",
            format!("expected TYPE:PRICE:COUNT, got {raw:?}"),
        )),
    }
}
