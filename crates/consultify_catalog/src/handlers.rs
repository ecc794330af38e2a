// --- File: crates/consultify_catalog/src/handlers.rs ---
use crate::logic::{
    candidate_dates, offerings, time_slots, AvailabilityResponse, OfferingsResponse,
};
use axum::{extract::State, Json};
use chrono::Utc;
use chrono_tz::Tz;
use consultify_config::AppConfig;
use std::sync::Arc;
use tracing::debug;

// --- State for Catalog Handlers ---
#[derive(Clone)]
pub struct CatalogState {
    pub config: Arc<AppConfig>,
}

/// Axum handler returning the static offering catalog.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/catalog/offerings", // Path relative to /api
    responses(
        (status = 200, description = "Purchasable offerings", body = OfferingsResponse)
    ),
    tag = "Catalog"
))]
pub async fn get_offerings_handler(
    State(_state): State<Arc<CatalogState>>,
) -> Json<OfferingsResponse> {
    Json(OfferingsResponse {
        offerings: offerings().to_vec(),
    })
}

/// Axum handler returning candidate dates and the fixed slot sequence.
///
/// "Today" is taken in the configured booking timezone so the date window
/// rolls over at local midnight, not UTC midnight.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/catalog/availability", // Path relative to /api
    responses(
        (status = 200, description = "Bookable dates and time slots", body = AvailabilityResponse)
    ),
    tag = "Catalog"
))]
pub async fn get_availability_handler(
    State(state): State<Arc<CatalogState>>,
) -> Json<AvailabilityResponse> {
    let zone = state
        .config
        .calendar
        .as_ref()
        .and_then(|c| c.time_zone.as_deref())
        .and_then(|tz| tz.parse::<Tz>().ok())
        .unwrap_or(chrono_tz::Asia::Kolkata);

    let today = Utc::now().with_timezone(&zone).date_naive();
    debug!("Generating availability window from {}", today);

    Json(AvailabilityResponse {
        dates: candidate_dates(today),
        slots: time_slots(),
    })
}
