// --- File: crates/consultify_catalog/src/doc.rs ---
#![allow(dead_code)]
#![cfg(feature = "openapi")]
use utoipa::OpenApi;

use crate::logic::{AvailabilityResponse, Offering, OfferingsResponse, TimeSlot};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::get_offerings_handler,
        crate::handlers::get_availability_handler,
    ),
    components(schemas(
        Offering,
        TimeSlot,
        OfferingsResponse,
        AvailabilityResponse,
    )),
    tags((name = "Catalog", description = "Offerings and slot availability"))
)]
pub struct CatalogApiDoc;
