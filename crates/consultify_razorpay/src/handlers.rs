// --- File: crates/consultify_razorpay/src/handlers.rs ---
use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
};
use consultify_common::services::{GatewayOrder, PaymentClaim};
use consultify_config::AppConfig;
use std::sync::Arc;
use tracing::error;

use crate::logic::{
    create_order, verify_payment, CreateOrderRequest, VerifyPaymentResponse,
};
use crate::error::RazorpayError;

// --- State for Razorpay Handlers ---
// Only needs AppConfig as reqwest::Client is static in consultify_common.
#[derive(Clone)]
pub struct RazorpayState {
    pub config: Arc<AppConfig>,
}

fn map_razorpay_error(err: RazorpayError) -> (StatusCode, String) {
    match err {
        RazorpayError::ConfigError => {
            error!("Razorpay configuration error.");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Razorpay configuration error on server.".to_string(),
            )
        }
        RazorpayError::RequestError(e) => {
            error!("Razorpay request error: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to communicate with payment provider.".to_string(),
            )
        }
        RazorpayError::ParseError(e) => {
            error!("Razorpay parse error: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to understand payment provider response.".to_string(),
            )
        }
        RazorpayError::ApiError {
            status_code,
            message,
        } => {
            error!("Razorpay API error ({}): {}", status_code, message);
            (
                StatusCode::from_u16(status_code).unwrap_or(StatusCode::BAD_GATEWAY),
                message,
            )
        }
        RazorpayError::SignatureMismatch => (
            StatusCode::BAD_REQUEST,
            "Payment signature verification failed.".to_string(),
        ),
        RazorpayError::InternalError(msg) => {
            error!("Razorpay internal logic error: {}", msg);
            (StatusCode::INTERNAL_SERVER_ERROR, msg)
        }
    }
}

/// Axum handler to create a Razorpay order.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/razorpay/create-order", // Path relative to /api
    request_body = CreateOrderRequest,
    responses(
        (status = 200, description = "Order created"),
        (status = 400, description = "Bad Request"),
        (status = 500, description = "Internal Server Error or Razorpay API error")
    ),
    tag = "Razorpay"
))]
pub async fn create_order_handler(
    State(state): State<Arc<RazorpayState>>,
    Json(payload): Json<CreateOrderRequest>,
) -> Result<Json<GatewayOrder>, (StatusCode, String)> {
    if !state.config.use_razorpay {
        return Err((
            StatusCode::SERVICE_UNAVAILABLE,
            "Razorpay service is disabled.".to_string(),
        ));
    }

    let razorpay_config = state.config.razorpay.as_ref().ok_or((
        StatusCode::INTERNAL_SERVER_ERROR,
        "Razorpay configuration not loaded.".to_string(),
    ))?;

    let currency = payload
        .currency_override
        .or_else(|| razorpay_config.currency.clone())
        .unwrap_or_else(|| "INR".to_string());
    let receipt = payload
        .receipt
        .unwrap_or_else(|| "consultify-order".to_string());

    create_order(razorpay_config, payload.amount, &currency, &receipt)
        .await
        .map(Json)
        .map_err(map_razorpay_error)
}

/// Axum handler to verify a gateway-reported payment.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/razorpay/verify", // Path relative to /api
    responses(
        (status = 200, description = "Payment verified", body = VerifyPaymentResponse),
        (status = 400, description = "Signature or order mismatch"),
        (status = 500, description = "Internal Server Error")
    ),
    tag = "Razorpay"
))]
pub async fn verify_payment_handler(
    State(state): State<Arc<RazorpayState>>,
    Json(claim): Json<PaymentClaim>,
) -> Result<Json<VerifyPaymentResponse>, (StatusCode, String)> {
    if !state.config.use_razorpay {
        return Err((
            StatusCode::SERVICE_UNAVAILABLE,
            "Razorpay service is disabled.".to_string(),
        ));
    }

    verify_payment(&claim)
        .map(|outcome| {
            Json(VerifyPaymentResponse {
                message: outcome.message,
            })
        })
        .map_err(map_razorpay_error)
}
