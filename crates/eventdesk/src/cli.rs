//! Clap derive structures for the `eventdesk` CLI.
//!
//! Only clap types live here; build.rs includes this file to render man pages.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// eventdesk -- manage an organiser's events from the command line
#[derive(Debug, Parser)]
#[command(
    name = "eventdesk",
    version,
    about = "Manage organiser events from the command line",
    long_about = "List, inspect, edit and delete the events of one organiser.\n\n\
        Basic details, ticket pricing and the poster are saved independently,\n\
        mirroring the tabs of the eventdesk-tui edit dialog.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Service profile to use
    #[arg(long, short = 'p', env = "EVENTDESK_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Event service URL (overrides profile)
    #[arg(long, short = 's', env = "EVENTDESK_SERVER", global = true)]
    pub server: Option<String>,

    /// Organiser whose events are managed (overrides profile)
    #[arg(long, env = "EVENTDESK_ORGANISER", global = true)]
    pub organiser: Option<String>,

    /// Bearer token
    #[arg(long, env = "EVENTDESK_TOKEN", global = true, hide_env_values = true)]
    pub token: Option<String>,

    /// Output format [default: table, or `[defaults] output`]
    #[arg(long, short = 'o', env = "EVENTDESK_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// When to use color output [default: auto, or `[defaults] color`]
    #[arg(long, global = true)]
    pub color: Option<ColorMode>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept invalid TLS certificates
    #[arg(long, short = 'k', env = "EVENTDESK_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "EVENTDESK_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

impl GlobalOpts {
    pub fn output(&self) -> OutputFormat {
        self.output.unwrap_or(OutputFormat::Table)
    }

    pub fn color(&self) -> ColorMode {
        self.color.unwrap_or(ColorMode::Auto)
    }
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List, inspect and edit events
    #[command(alias = "ev", alias = "e")]
    Events(EventsArgs),

    /// Manage configuration profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  EVENTS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct EventsArgs {
    #[command(subcommand)]
    pub command: EventsCommand,
}

#[derive(Debug, Subcommand)]
pub enum EventsCommand {
    /// List events, most relevant first (ongoing, upcoming, completed)
    #[command(alias = "ls")]
    List {
        /// Only events of this type
        #[arg(long = "type", short = 't')]
        event_type: Option<EventTypeArg>,

        /// Only events in this status
        #[arg(long, short = 'S')]
        status: Option<StatusArg>,
    },

    /// Show one event with every field the server sent
    Get {
        /// Event ID
        id: String,
    },

    /// Permanently delete an event
    #[command(alias = "rm")]
    Delete {
        /// Event ID
        id: String,
    },

    /// Change basic details (name, type, schedule, and other scalar fields)
    Edit {
        /// Event ID
        id: String,

        /// Field assignment, e.g. `name="Spring Gala"` or
        /// `scheduleStart=2030-05-01T19:30` (local time). Repeatable.
        #[arg(long = "set", value_name = "KEY=VALUE", required = true)]
        set: Vec<String>,
    },

    /// Show ticket pricing
    Tickets {
        /// Event ID
        id: String,
    },

    /// Replace ticket pricing (upcoming events only)
    #[command(group(
        clap::ArgGroup::new("pricing").required(true).args(["flat", "category"])
    ))]
    SetTickets {
        /// Event ID
        id: String,

        /// Single price for every ticket
        #[arg(long)]
        flat: Option<f64>,

        /// Price tier as TYPE:PRICE:COUNT (repeatable)
        #[arg(long, value_name = "TYPE:PRICE:COUNT")]
        category: Vec<String>,
    },

    /// Upload a poster image and attach it to an event
    Poster {
        /// Event ID
        id: String,

        /// Image file to upload
        file: PathBuf,
    },
}

/// Event type filter values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EventTypeArg {
    Seating,
    Online,
    Open,
    Register,
}

/// Derived status filter values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StatusArg {
    Upcoming,
    Ongoing,
    Completed,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create a profile with guided setup
    Init,

    /// Display the configuration with secrets masked
    Show,

    /// Set a value on the active profile
    Set {
        /// Profile key: server, organiser_id, token_env, ca_cert, insecure, timeout
        key: String,

        /// Value to set
        value: String,
    },

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },

    /// Store a bearer token in the system keyring
    SetToken {
        /// Profile name (defaults to the active profile)
        #[arg(long)]
        profile: Option<String>,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
