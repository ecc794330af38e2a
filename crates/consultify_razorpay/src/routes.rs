// --- File: crates/consultify_razorpay/src/routes.rs ---

use crate::handlers::{create_order_handler, verify_payment_handler, RazorpayState};
use axum::{routing::post, Router};
use consultify_config::AppConfig;
use std::sync::Arc;

/// Creates a router containing all routes for the Razorpay feature.
pub fn routes(config: Arc<AppConfig>) -> Router {
    let razorpay_state = Arc::new(RazorpayState { config });

    Router::new()
        .route("/razorpay/create-order", post(create_order_handler))
        .route("/razorpay/verify", post(verify_payment_handler))
        .with_state(razorpay_state)
}
