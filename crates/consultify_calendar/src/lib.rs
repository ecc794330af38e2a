// --- File: crates/consultify_calendar/src/lib.rs ---

pub mod logic;

// Re-export for the booking flow
pub use logic::{build_calendar_link, event_window, EventSource, EventWindow, EMPTY_LINK};
