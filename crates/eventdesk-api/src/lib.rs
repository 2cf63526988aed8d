// eventdesk-api: Async Rust client for the event-management REST API
//
// Every endpoint lives under `/api/event/` and answers with the
// `{ success, message?, data? }` envelope. The client strips the envelope
// and turns `success: false` into `Error::Application`.

pub mod client;
pub mod error;
pub mod events;
pub mod models;
pub mod poster;
pub mod tickets;
pub mod transport;

pub use client::EventClient;
pub use error::Error;
pub use models::{
    ApiResponse, CategorizedPrice, EventDocument, EventRecord, PricingOption, TicketDetails,
    UpdateTicketDetailsRequest,
};
pub use transport::{TlsMode, TransportConfig};
