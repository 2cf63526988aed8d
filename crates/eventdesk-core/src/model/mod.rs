// ── Domain model ──
//
// Canonical representations consumed by the CLI and TUI. Wire types from
// eventdesk-api are converted in `crate::convert`; ticket pricing is used
// as-is because its wire shape is already the domain shape.

pub mod event;
pub mod ticket;

// ── Re-exports ──────────────────────────────────────────────────────
pub use event::{Event, EventStatus, EventType, derive_status};
pub use ticket::{CategorizedPrice, PricingOption, TicketDetails};
