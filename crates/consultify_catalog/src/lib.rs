// --- File: crates/consultify_catalog/src/lib.rs ---

pub mod doc;
pub mod handlers;
pub mod logic;
pub mod routes;

// Re-export for main backend
pub use logic::{
    candidate_dates, find_offering, offerings, parse_slot_label, time_slots, CatalogError,
    Offering, TimeSlot,
};
pub use routes::routes;
