//! All possible UI actions. Actions are the sole mechanism for state mutation.

use std::fmt;
use std::sync::Arc;

use eventdesk_core::{Command, CommandResult, CoreError, Event, ModalTab, TicketDetails};

/// Notification severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Error,
    Info,
}

/// A transient toast notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub level: NotificationLevel,
}

impl Notification {
    pub fn success(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Success,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Error,
        }
    }

    pub fn info(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Info,
        }
    }
}

/// Pending confirmation action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmAction {
    DeleteEvent { id: String, name: String },
}

impl fmt::Display for ConfirmAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DeleteEvent { name, .. } => write!(f, "Delete \"{name}\"?"),
        }
    }
}

impl ConfirmAction {
    /// Extra lines shown under the question.
    pub fn warning(&self) -> &'static str {
        match self {
            Self::DeleteEvent { .. } => {
                "Tickets, bookings, financial and analytics records are removed too. This cannot be undone."
            }
        }
    }
}

/// Every state change flows through one of these.
#[derive(Debug, Clone)]
pub enum Action {
    // ── Lifecycle ─────────────────────────────────────────────────
    Quit,
    Tick,
    Render,
    Resize(u16, u16),

    // ── Overlays ──────────────────────────────────────────────────
    ToggleHelp,
    Notify(Notification),
    DismissNotification,
    ShowConfirm(ConfirmAction),
    ConfirmYes,
    ConfirmNo,

    // ── Event list ────────────────────────────────────────────────
    RefreshEvents,
    /// A list fetch finished. `generation` identifies which refresh asked
    /// for it; only the newest one is applied.
    EventsLoaded {
        generation: u64,
        result: Result<Vec<Event>, CoreError>,
    },

    // ── Edit dialog ───────────────────────────────────────────────
    OpenEditor(Arc<Event>),
    CloseEditor,
    TicketsLoaded {
        event_id: String,
        result: Result<TicketDetails, CoreError>,
    },
    /// Run a save the dialog has already validated.
    ExecuteSave { tab: ModalTab, command: Command },
    SaveFinished {
        event_id: String,
        tab: ModalTab,
        result: Result<CommandResult, CoreError>,
    },
}
