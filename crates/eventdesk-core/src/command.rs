// ── Command API ──
//
// Every write against the event service flows through `Command`. The
// controller routes each variant to its endpoint(s); the poster save is the
// only multi-request command.

use std::path::PathBuf;

use serde_json::{Map, Value};

use eventdesk_api::UpdateTicketDetailsRequest;

/// All write operations the organiser can perform.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Submit the whole basic-details draft.
    UpdateBasicDetails {
        event_id: String,
        details: Map<String, Value>,
    },
    /// Replace the ticket pricing.
    UpdateTicketDetails(UpdateTicketDetailsRequest),
    /// Upload a poster file, then attach the stored URL to the event.
    SavePoster { event_id: String, file: PathBuf },
    /// Permanently delete the event and everything recorded against it.
    DeleteEvent { event_id: String },
}

impl Command {
    pub fn event_id(&self) -> &str {
        match self {
            Self::UpdateBasicDetails { event_id, .. }
            | Self::SavePoster { event_id, .. }
            | Self::DeleteEvent { event_id } => event_id,
            Self::UpdateTicketDetails(req) => &req.event_id,
        }
    }
}

/// Result of a successful command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandResult {
    Ok,
    /// The poster was uploaded and associated; carries its new URL.
    PosterSaved { poster_url: String },
}
