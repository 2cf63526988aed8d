pub mod edit_modal;
pub mod events;

pub use edit_modal::EditModalScreen;
pub use events::EventsScreen;
