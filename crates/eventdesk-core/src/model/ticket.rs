// ── Ticket pricing ──

pub use eventdesk_api::{CategorizedPrice, PricingOption, TicketDetails};
