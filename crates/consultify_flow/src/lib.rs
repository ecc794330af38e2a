// --- File: crates/consultify_flow/src/lib.rs ---

pub mod auth;
pub mod doc;
pub mod error;
pub mod handlers;
pub mod logic;
pub mod notifier;
pub mod routes;
pub mod selection;
pub mod store;

// Re-export for main backend and tests
pub use auth::AuthContext;
pub use error::FlowError;
pub use handlers::FlowState;
pub use logic::{
    calendar_link, cancel_payment, complete_payment, fail_payment, initiate_payment,
    BookingSession, CheckoutHandoff, CompletionOutcome, PaymentAttempt,
};
pub use notifier::{StatusKind, StatusNotifier, StatusView};
pub use routes::routes;
pub use selection::{BookingFlow, ContactDetails, Selection, Step, StepView};
pub use store::SessionStore;
