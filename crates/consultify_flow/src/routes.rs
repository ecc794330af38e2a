// --- File: crates/consultify_flow/src/routes.rs ---

use crate::handlers::{
    abandon_session_handler, back_handler, calendar_link_handler, choose_date_handler,
    choose_offering_handler, choose_time_handler, complete_payment_handler,
    create_session_handler, dismiss_status_handler, get_session_handler,
    initiate_payment_handler, payment_dismissed_handler, payment_failed_handler,
    set_details_handler, FlowState,
};
use crate::store::SessionStore;
use axum::{
    routing::{get, post},
    Router,
};
use consultify_common::services::ServiceFactory;
use consultify_config::AppConfig;
use std::sync::Arc;

/// Creates a router containing all routes for the booking flow.
pub fn routes(config: Arc<AppConfig>, services: Arc<dyn ServiceFactory>) -> Router {
    let flow_state = Arc::new(FlowState {
        config,
        store: SessionStore::new(),
        services,
    });

    Router::new()
        .route("/booking/sessions", post(create_session_handler))
        .route(
            "/booking/sessions/{id}",
            get(get_session_handler).delete(abandon_session_handler),
        )
        .route(
            "/booking/sessions/{id}/offering",
            post(choose_offering_handler),
        )
        .route("/booking/sessions/{id}/date", post(choose_date_handler))
        .route("/booking/sessions/{id}/time", post(choose_time_handler))
        .route("/booking/sessions/{id}/details", post(set_details_handler))
        .route("/booking/sessions/{id}/back", post(back_handler))
        .route("/booking/sessions/{id}/pay", post(initiate_payment_handler))
        .route(
            "/booking/sessions/{id}/payment/complete",
            post(complete_payment_handler),
        )
        .route(
            "/booking/sessions/{id}/payment/failed",
            post(payment_failed_handler),
        )
        .route(
            "/booking/sessions/{id}/payment/dismissed",
            post(payment_dismissed_handler),
        )
        .route(
            "/booking/sessions/{id}/status/dismiss",
            post(dismiss_status_handler),
        )
        .route(
            "/booking/sessions/{id}/calendar-link",
            get(calendar_link_handler),
        )
        .with_state(flow_state)
}
