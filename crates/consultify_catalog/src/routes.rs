// --- File: crates/consultify_catalog/src/routes.rs ---

use crate::handlers::{get_availability_handler, get_offerings_handler, CatalogState};
use axum::{routing::get, Router};
use consultify_config::AppConfig;
use std::sync::Arc;

/// Creates a router containing all routes for the catalog feature.
pub fn routes(config: Arc<AppConfig>) -> Router {
    let catalog_state = Arc::new(CatalogState { config });

    Router::new()
        .route("/catalog/offerings", get(get_offerings_handler))
        .route("/catalog/availability", get(get_availability_handler))
        .with_state(catalog_state)
}
