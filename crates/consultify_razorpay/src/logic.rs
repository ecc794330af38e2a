// --- File: crates/consultify_razorpay/src/logic.rs ---

use consultify_config::RazorpayConfig;
use serde::{Deserialize, Serialize};
use std::env;
use tracing::{error, info};

// Signature verification imports
use constant_time_eq::constant_time_eq;
use hmac::{Hmac, Mac};
use sha2::Sha256;

// Import the RazorpayError from the error module
use crate::error::RazorpayError;

// Import the HTTP client and gateway data shapes from consultify_common
use consultify_common::services::{GatewayOrder, PaymentClaim, VerificationOutcome};
use consultify_common::HTTP_CLIENT;

// Conditionally import ToSchema if openapi feature is enabled
#[cfg(feature = "openapi")]
use utoipa::ToSchema;

const ORDERS_API_URL: &str = "https://api.razorpay.com/v1/orders";

// --- Data Structures ---

/// Request from our frontend to create a payment order.
#[derive(Deserialize, Debug)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct CreateOrderRequest {
    /// Amount in minor currency units (paise).
    #[cfg_attr(feature = "openapi", schema(example = 299900))]
    pub amount: i64,
    #[cfg_attr(feature = "openapi", schema(example = "INR"))]
    pub currency_override: Option<String>,
    /// Internal reference attached to the order.
    #[cfg_attr(feature = "openapi", schema(example = "booking-42"))]
    pub receipt: Option<String>,
}

/// Body sent to the Razorpay Orders API.
#[derive(Serialize, Debug)]
struct RazorpayOrderPayload<'a> {
    amount: i64,
    currency: &'a str,
    receipt: &'a str,
    // Auto-capture the payment once authorized.
    payment_capture: u8,
}

/// Response from the Razorpay Orders API.
#[derive(Deserialize, Debug)]
struct RazorpayOrderApiResponse {
    id: String,
    amount: i64,
    currency: String,
}

/// Buyer details pre-filled into the checkout UI.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct CheckoutPrefill {
    pub name: String,
    pub email: String,
    pub contact: String,
}

#[derive(Serialize, Debug, Clone)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct CheckoutTheme {
    #[cfg_attr(feature = "openapi", schema(example = "#d97706"))]
    pub color: String,
}

/// The options handed to the Razorpay checkout UI.
///
/// Amount and currency are echoed from the server-issued order, never
/// recomputed locally, so the checkout is scoped to exactly that order.
#[derive(Serialize, Debug, Clone)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct CheckoutOptions {
    #[cfg_attr(feature = "openapi", schema(example = "rzp_test_abc123"))]
    pub key: String,
    pub amount: i64,
    pub currency: String,
    #[cfg_attr(feature = "openapi", schema(example = "Consultify"))]
    pub name: String,
    #[cfg_attr(feature = "openapi", schema(example = "Career & Business Consultation"))]
    pub description: String,
    pub order_id: String,
    pub prefill: CheckoutPrefill,
    pub theme: CheckoutTheme,
}

/// Response to a successful verification call.
#[derive(Serialize, Debug)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct VerifyPaymentResponse {
    #[cfg_attr(feature = "openapi", schema(example = "Payment verified successfully"))]
    pub message: String,
}

// --- Core Logic Functions ---

/// Creates an order with the Razorpay Orders API.
///
/// Every call issues a fresh order; failed attempts are retried by creating
/// a new order, never by reusing one.
pub async fn create_order(
    config: &RazorpayConfig,
    amount_minor: i64,
    currency: &str,
    receipt: &str,
) -> Result<GatewayOrder, RazorpayError> {
    info!(
        "[Razorpay Logic] Creating order: amount={} currency={}",
        amount_minor, currency
    );

    let key_secret = env::var("RAZORPAY_KEY_SECRET").map_err(|_| RazorpayError::ConfigError)?;

    let payload = RazorpayOrderPayload {
        amount: amount_minor,
        currency,
        receipt,
        payment_capture: 1,
    };

    let response = HTTP_CLIENT
        .post(ORDERS_API_URL)
        .basic_auth(&config.key_id, Some(&key_secret))
        .json(&payload)
        .send()
        .await?;

    let status = response.status();
    let body_text = response.text().await?;

    if status.is_success() {
        let order: RazorpayOrderApiResponse = serde_json::from_str(&body_text)?;
        info!("[Razorpay Logic] Order created: {}", order.id);
        Ok(GatewayOrder {
            id: order.id,
            amount: order.amount,
            currency: order.currency,
        })
    } else {
        let error_message = match serde_json::from_str::<serde_json::Value>(&body_text) {
            Ok(json_body) => json_body
                .get("error")
                .and_then(|e| e.get("description"))
                .and_then(|m| m.as_str())
                .unwrap_or(&body_text)
                .to_string(),
            Err(_) => body_text,
        };
        error!(
            "[Razorpay Logic] Order creation failed with HTTP status: {}. Message: {}",
            status, error_message
        );
        Err(RazorpayError::ApiError {
            status_code: status.as_u16(),
            message: error_message,
        })
    }
}

/// Recomputes the payment signature and compares it in constant time.
///
/// Razorpay signs `"{order_id}|{payment_id}"` with the key secret
/// (HMAC-SHA256, hex). A mismatch after a gateway-reported success is a
/// trust boundary problem, so callers must not retry this automatically.
pub fn verify_payment_signature(
    claim: &PaymentClaim,
    key_secret: &str,
) -> Result<(), RazorpayError> {
    type HmacSha256 = Hmac<Sha256>;
    let mut mac = HmacSha256::new_from_slice(key_secret.as_bytes())
        .map_err(|_| RazorpayError::InternalError("Invalid key secret for HMAC".to_string()))?;
    mac.update(format!("{}|{}", claim.order_id, claim.payment_id).as_bytes());
    let expected_hex = hex::encode(mac.finalize().into_bytes());

    if constant_time_eq(expected_hex.as_bytes(), claim.signature.as_bytes()) {
        Ok(())
    } else {
        error!(
            "[Razorpay Logic] Signature mismatch for order {}",
            claim.order_id
        );
        Err(RazorpayError::SignatureMismatch)
    }
}

/// Verifies a gateway-reported payment using the configured key secret.
pub fn verify_payment(claim: &PaymentClaim) -> Result<VerificationOutcome, RazorpayError> {
    let key_secret = env::var("RAZORPAY_KEY_SECRET").map_err(|_| RazorpayError::ConfigError)?;
    verify_payment_signature(claim, &key_secret)?;
    info!(
        "[Razorpay Logic] Payment {} verified for order {}",
        claim.payment_id, claim.order_id
    );
    Ok(VerificationOutcome {
        message: "Payment verified successfully".to_string(),
    })
}

/// Builds the checkout UI options for a server-issued order.
pub fn build_checkout_options(
    config: &RazorpayConfig,
    order: &GatewayOrder,
    description: &str,
    prefill: CheckoutPrefill,
) -> CheckoutOptions {
    CheckoutOptions {
        key: config.key_id.clone(),
        amount: order.amount,
        currency: order.currency.clone(),
        name: config
            .merchant_name
            .clone()
            .unwrap_or_else(|| "Consultify".to_string()),
        description: description.to_string(),
        order_id: order.id.clone(),
        prefill,
        theme: CheckoutTheme {
            color: config
                .theme_color
                .clone()
                .unwrap_or_else(|| "#d97706".to_string()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claim_with_signature(key_secret: &str) -> PaymentClaim {
        type HmacSha256 = Hmac<Sha256>;
        let order_id = "order_Nxt9c2Yz".to_string();
        let payment_id = "pay_LqW8vKj1".to_string();
        let mut mac = HmacSha256::new_from_slice(key_secret.as_bytes()).unwrap();
        mac.update(format!("{}|{}", order_id, payment_id).as_bytes());
        PaymentClaim {
            order_id,
            payment_id,
            signature: hex::encode(mac.finalize().into_bytes()),
        }
    }

    #[test]
    fn accepts_a_correctly_signed_claim() {
        let claim = claim_with_signature("shhh-secret");
        assert!(verify_payment_signature(&claim, "shhh-secret").is_ok());
    }

    #[test]
    fn rejects_a_tampered_signature() {
        let mut claim = claim_with_signature("shhh-secret");
        claim.signature = format!("{}00", &claim.signature[..claim.signature.len() - 2]);
        assert!(matches!(
            verify_payment_signature(&claim, "shhh-secret"),
            Err(RazorpayError::SignatureMismatch)
        ));
    }

    #[test]
    fn rejects_a_claim_signed_with_another_secret() {
        let claim = claim_with_signature("shhh-secret");
        assert!(verify_payment_signature(&claim, "other-secret").is_err());
    }

    #[test]
    fn checkout_options_echo_the_server_issued_order() {
        let config = RazorpayConfig {
            key_id: "rzp_test_abc123".to_string(),
            currency: None,
            merchant_name: None,
            theme_color: None,
        };
        let order = GatewayOrder {
            id: "order_Nxt9c2Yz".to_string(),
            amount: 299_900,
            currency: "INR".to_string(),
        };
        let options = build_checkout_options(
            &config,
            &order,
            "Career & Business Consultation",
            CheckoutPrefill {
                name: "Asha Rao".to_string(),
                email: "asha@example.com".to_string(),
                contact: "+911234567890".to_string(),
            },
        );
        assert_eq!(options.order_id, order.id);
        assert_eq!(options.amount, order.amount);
        assert_eq!(options.currency, order.currency);
        assert_eq!(options.key, "rzp_test_abc123");
    }
}
