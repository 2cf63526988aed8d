// eventdesk-core: Event list state, edit drafts, and save flows between
// eventdesk-api and its consumers (CLI/TUI).
//
// - `model`: domain event, derived status, ticket types
// - `listing`: filtering, status-priority sorting, empty-state policy
// - `store`: the list view's wholesale-replaced event collection
// - `draft`: basic-details, ticket and poster drafts
// - `modal`: the edit modal state machine
// - `controller`: API access and the `Command` pipeline

pub mod command;
pub mod config;
pub mod controller;
pub mod convert;
pub mod draft;
pub mod error;
pub mod listing;
pub mod localtime;
pub mod modal;
pub mod model;
pub mod store;

// ── Primary re-exports ──────────────────────────────────────────────
pub use command::{Command, CommandResult};
pub use config::{ClientConfig, TlsVerification};
pub use controller::Controller;
pub use draft::{BasicDetailsDraft, CategoryField, PosterDraft, PosterPreview, TicketDraft};
pub use error::CoreError;
pub use listing::{EmptyState, EventFilter, ListView, filter, sort, view};
pub use modal::{EditModal, ModalState, ModalTab, SaveOutcome, TicketLoad};
pub use model::{
    CategorizedPrice, Event, EventStatus, EventType, PricingOption, TicketDetails, derive_status,
};
pub use store::{EventStore, LoadState};
