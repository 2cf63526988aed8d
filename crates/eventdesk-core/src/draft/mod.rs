// ── Edit drafts ──
//
// Modal-local editable copies of an event's field groups. Drafts are never
// merged back into the list's collection; they are submitted whole and the
// list converges through a re-fetch.

pub mod basic;
pub mod poster;
pub mod ticket;

pub use basic::{BasicDetailsDraft, EXCLUDED_FIELDS, SCHEDULE_FIELDS, editable_fields};
pub use poster::{PosterDraft, PosterPreview};
pub use ticket::{CategoryField, TicketDraft};
