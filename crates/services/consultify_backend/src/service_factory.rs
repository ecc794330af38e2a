// --- File: crates/services/consultify_backend/src/service_factory.rs ---
//! Service factory implementation.
//!
//! This module wires the real service implementations behind the trait
//! abstractions the booking flow depends on. Services are initialized based
//! on the application configuration and runtime flags, so a deployment
//! without payment credentials simply runs without a gateway.

use consultify_common::services::{
    AlwaysFreeSlots, BoxedError, PaymentGateway, ServiceFactory, SlotAvailability,
};
use consultify_config::AppConfig;
use std::sync::Arc;
#[allow(unused_imports)] // only certain features reach for these
use {consultify_common::is_razorpay_enabled, tracing::info, tracing::warn};

#[cfg(feature = "razorpay")]
use consultify_razorpay::RazorpayGateway;

/// Service factory for the Consultify backend.
pub struct ConsultifyServiceFactory {
    #[allow(dead_code)]
    config: Arc<AppConfig>,
    payment_gateway: Option<Arc<dyn PaymentGateway<Error = BoxedError>>>,
    slot_availability: Arc<dyn SlotAvailability<Error = BoxedError>>,
}

impl ConsultifyServiceFactory {
    /// Create a new service factory.
    pub fn new(config: Arc<AppConfig>) -> Self {
        #[allow(unused_mut)]
        let mut payment_gateway: Option<Arc<dyn PaymentGateway<Error = BoxedError>>> = None;

        #[cfg(feature = "razorpay")]
        {
            if is_razorpay_enabled(&config) {
                info!("Initializing Razorpay payment gateway...");
                payment_gateway = config
                    .razorpay
                    .clone()
                    .map(|cfg| {
                        Arc::new(RazorpayGateway::new(cfg))
                            as Arc<dyn PaymentGateway<Error = BoxedError>>
                    });
            } else {
                warn!("Razorpay disabled or unconfigured; payments unavailable.");
            }
        }

        // No reservation backend exists; every slot reads as free.
        let slot_availability: Arc<dyn SlotAvailability<Error = BoxedError>> =
            Arc::new(AlwaysFreeSlots);

        Self {
            config,
            payment_gateway,
            slot_availability,
        }
    }
}

impl ServiceFactory for ConsultifyServiceFactory {
    fn payment_gateway(&self) -> Option<Arc<dyn PaymentGateway<Error = BoxedError>>> {
        self.payment_gateway.clone()
    }

    fn slot_availability(&self) -> Arc<dyn SlotAvailability<Error = BoxedError>> {
        self.slot_availability.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use consultify_config::ServerConfig;

    fn config_without_razorpay() -> AppConfig {
        AppConfig {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8086,
            },
            use_razorpay: false,
            use_booking: true,
            razorpay: None,
            calendar: None,
            booking: None,
        }
    }

    #[test]
    fn factory_without_razorpay_has_no_gateway() {
        let factory = ConsultifyServiceFactory::new(Arc::new(config_without_razorpay()));
        assert!(factory.payment_gateway().is_none());
    }

    #[tokio::test]
    async fn slot_availability_is_always_wired() {
        let factory = ConsultifyServiceFactory::new(Arc::new(config_without_razorpay()));
        let slots = factory.slot_availability();
        let date = chrono::NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
        assert!(slots
            .is_slot_free(date, "10:00 AM".to_string())
            .await
            .unwrap());
    }
}
