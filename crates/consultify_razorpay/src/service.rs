// --- File: crates/consultify_razorpay/src/service.rs ---
//! PaymentGateway implementation backed by the Razorpay API.

use consultify_common::services::{
    BoxFuture, BoxedError, GatewayOrder, PaymentClaim, PaymentGateway, VerificationOutcome,
};
use consultify_config::RazorpayConfig;

use crate::logic;

/// Payment gateway backed by Razorpay.
///
/// Order creation goes to the Orders API; verification recomputes the
/// payment signature server-side with the key secret.
pub struct RazorpayGateway {
    config: RazorpayConfig,
}

impl RazorpayGateway {
    pub fn new(config: RazorpayConfig) -> Self {
        Self { config }
    }
}

impl PaymentGateway for RazorpayGateway {
    type Error = BoxedError;

    fn create_order(
        &self,
        amount_minor: i64,
        currency: String,
        receipt: String,
    ) -> BoxFuture<'_, GatewayOrder, Self::Error> {
        Box::pin(async move {
            logic::create_order(&self.config, amount_minor, &currency, &receipt)
                .await
                .map_err(|e| BoxedError(Box::new(e)))
        })
    }

    fn verify_payment(
        &self,
        claim: PaymentClaim,
    ) -> BoxFuture<'_, VerificationOutcome, Self::Error> {
        Box::pin(async move {
            logic::verify_payment(&claim).map_err(|e| BoxedError(Box::new(e)))
        })
    }
}
