// --- File: crates/consultify_common/src/services.rs ---
//! Service abstractions for external services.
//!
//! This module provides trait definitions for the external services the
//! booking flow depends on. These traits allow for dependency injection and
//! easier testing by decoupling the orchestration logic from specific
//! implementations (the real payment gateway, a real reservation backend).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::error::Error as StdError;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Type alias for a boxed future that returns a Result
pub type BoxFuture<'a, T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'a>>;

/// A wrapper error type that implements std::error::Error for Box<dyn std::error::Error + Send + Sync>
#[derive(Debug)]
pub struct BoxedError(pub Box<dyn StdError + Send + Sync>);

impl fmt::Display for BoxedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl StdError for BoxedError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.0.source()
    }
}

impl From<Box<dyn StdError + Send + Sync>> for BoxedError {
    fn from(err: Box<dyn StdError + Send + Sync>) -> Self {
        BoxedError(err)
    }
}

/// A trait for payment gateway operations.
///
/// The orchestrator creates exactly one order per payment attempt through
/// this trait and verifies gateway-reported payments server-side before
/// treating a booking as committed.
pub trait PaymentGateway: Send + Sync {
    /// Error type returned by gateway operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Request a server-issued order for the given amount in minor currency
    /// units. A fresh order is created per call; orders are never reused.
    fn create_order(
        &self,
        amount_minor: i64,
        currency: String,
        receipt: String,
    ) -> BoxFuture<'_, GatewayOrder, Self::Error>;

    /// Verify a gateway-reported payment result. Only a successful return
    /// makes the payment trustworthy; the claim itself never is.
    fn verify_payment(
        &self,
        claim: PaymentClaim,
    ) -> BoxFuture<'_, VerificationOutcome, Self::Error>;
}

/// A capability the orchestrator queries before creating an order.
///
/// The shipped implementation answers "free" unconditionally; a real
/// reservation backend would slot in behind this trait.
pub trait SlotAvailability: Send + Sync {
    /// Error type returned by availability checks.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Whether the (date, time-of-day label) pair can still be booked.
    fn is_slot_free(
        &self,
        date: NaiveDate,
        slot_label: String,
    ) -> BoxFuture<'_, bool, Self::Error>;
}

/// A factory for creating service instances.
///
/// This trait provides methods for accessing the services the booking flow
/// needs. It's used by the backend to wire real implementations and by tests
/// to inject mocks.
pub trait ServiceFactory: Send + Sync {
    /// Get a payment gateway instance, if one is configured.
    fn payment_gateway(&self) -> Option<Arc<dyn PaymentGateway<Error = BoxedError>>>;

    /// Get the slot availability capability.
    fn slot_availability(&self) -> Arc<dyn SlotAvailability<Error = BoxedError>>;
}

/// A server-issued payment order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayOrder {
    /// The gateway's order identifier.
    pub id: String,
    /// The order amount in minor currency units, echoed by the server.
    pub amount: i64,
    /// The ISO currency code.
    pub currency: String,
}

/// A gateway-reported payment result, untrusted until verified.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct PaymentClaim {
    /// The order the payment claims to settle.
    pub order_id: String,
    /// The gateway's payment identifier.
    pub payment_id: String,
    /// The gateway signature over (order, payment).
    pub signature: String,
}

/// The result of a successful server-side verification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationOutcome {
    /// Human-readable confirmation message.
    pub message: String,
}

/// Slot availability that treats every slot as free.
///
/// Matches the observed behavior: no reservation backend exists, slots carry
/// a static "available" flag.
#[derive(Debug, Default, Clone)]
pub struct AlwaysFreeSlots;

impl SlotAvailability for AlwaysFreeSlots {
    type Error = BoxedError;

    fn is_slot_free(
        &self,
        _date: NaiveDate,
        _slot_label: String,
    ) -> BoxFuture<'_, bool, Self::Error> {
        Box::pin(async { Ok(true) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn always_free_slots_reports_free() {
        let slots = AlwaysFreeSlots;
        let date = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
        assert!(slots
            .is_slot_free(date, "10:00 AM".to_string())
            .await
            .unwrap());
    }
}
