// --- File: crates/consultify_razorpay/src/lib.rs ---

pub mod doc;
pub mod error;
pub mod handlers;
pub mod logic;
pub mod routes;
pub mod service;

// Re-export for main backend
pub use error::RazorpayError;
pub use handlers::RazorpayState;
pub use logic::{
    build_checkout_options, verify_payment_signature, CheckoutOptions, CheckoutPrefill,
};
pub use routes::routes;
pub use service::RazorpayGateway;
