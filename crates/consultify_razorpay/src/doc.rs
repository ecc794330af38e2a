// --- File: crates/consultify_razorpay/src/doc.rs ---
#![allow(dead_code)]
#![cfg(feature = "openapi")]
use utoipa::OpenApi;

use crate::logic::{
    CheckoutOptions, CheckoutPrefill, CheckoutTheme, CreateOrderRequest, VerifyPaymentResponse,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::create_order_handler,
        crate::handlers::verify_payment_handler,
    ),
    components(schemas(
        CreateOrderRequest,
        CheckoutOptions,
        CheckoutPrefill,
        CheckoutTheme,
        VerifyPaymentResponse,
    )),
    tags((name = "Razorpay", description = "Payment order creation and verification"))
)]
pub struct RazorpayApiDoc;
