// --- File: crates/consultify_flow/src/error.rs ---
use consultify_common::{external_service_error, ConsultifyError, HttpStatusCode};
use thiserror::Error;

use crate::selection::Step;

/// Booking-flow error taxonomy.
///
/// Every variant is surfaced to the user through the status notifier as a
/// message plus a success/failure flag; none of them abort the flow.
#[derive(Error, Debug)]
pub enum FlowError {
    /// Not authenticated or missing required fields. Fixable by the user;
    /// no remote call was made.
    #[error("Precondition failed: {0}")]
    PreconditionFailed(String),

    /// A forward transition was blocked by empty required input; the step
    /// pointer did not move.
    #[error("Validation rejected: {0}")]
    ValidationRejected(String),

    /// The availability capability reported the slot as taken.
    #[error("Requested slot is not available")]
    SlotUnavailable,

    /// Order creation failed. Transient; retryable by re-initiating.
    #[error("Payment setup failed: {0}")]
    PaymentSetupFailed(String),

    /// The server rejected a gateway-reported success. The booking stays
    /// unconfirmed and is never retried automatically.
    #[error("Payment verification failed: {0}")]
    PaymentVerificationFailed(String),

    /// Gateway-reported payment failure. Retryable.
    #[error("Payment failed: {0}")]
    PaymentFailed(String),

    /// The user dismissed the checkout UI. Terminal for the attempt.
    #[error("Payment cancelled")]
    PaymentCancelled,

    /// A payment attempt is already in flight for this session.
    #[error("A payment attempt is already in flight")]
    AttemptInFlight,

    /// Completion callback carried an unknown or stale attempt token.
    #[error("Unknown or stale payment attempt")]
    UnknownAttempt,

    /// No booking session with the given identifier.
    #[error("Booking session not found")]
    SessionNotFound,

    /// The operation is not valid at the session's current step.
    #[error("Operation not valid at step {0:?}")]
    WrongStep(Step),
}

impl FlowError {
    /// The message shown to the user through the status notifier.
    pub fn user_message(&self) -> String {
        match self {
            FlowError::PreconditionFailed(msg) => msg.clone(),
            FlowError::ValidationRejected(msg) => msg.clone(),
            FlowError::SlotUnavailable => {
                "This slot was just booked. Please pick another time.".to_string()
            }
            FlowError::PaymentSetupFailed(_) => {
                "Something went wrong. Please try again.".to_string()
            }
            FlowError::PaymentVerificationFailed(_) => {
                "Payment verification failed. Please contact support.".to_string()
            }
            FlowError::PaymentFailed(description) if !description.is_empty() => {
                description.clone()
            }
            FlowError::PaymentFailed(_) => "Payment failed. Please try again.".to_string(),
            FlowError::PaymentCancelled => "Payment cancelled.".to_string(),
            FlowError::AttemptInFlight => {
                "A payment is already being processed. Please wait.".to_string()
            }
            FlowError::UnknownAttempt => "This payment attempt is no longer active.".to_string(),
            FlowError::SessionNotFound => "Booking session not found.".to_string(),
            FlowError::WrongStep(_) => "That action is not available right now.".to_string(),
        }
    }
}

/// Convert FlowError to ConsultifyError
impl From<FlowError> for ConsultifyError {
    fn from(err: FlowError) -> Self {
        match err {
            FlowError::PreconditionFailed(msg) => ConsultifyError::ValidationError(msg),
            FlowError::ValidationRejected(msg) => ConsultifyError::ValidationError(msg),
            FlowError::SlotUnavailable => {
                ConsultifyError::ConflictError("Requested slot is not available".to_string())
            }
            FlowError::PaymentSetupFailed(msg) => external_service_error("Payment gateway", msg),
            FlowError::PaymentVerificationFailed(msg) => ConsultifyError::AuthError(msg),
            FlowError::PaymentFailed(msg) => external_service_error("Payment gateway", msg),
            FlowError::PaymentCancelled => {
                ConsultifyError::ConflictError("Payment cancelled".to_string())
            }
            FlowError::AttemptInFlight => {
                ConsultifyError::ConflictError("Payment attempt already in flight".to_string())
            }
            FlowError::UnknownAttempt => {
                ConsultifyError::NotFoundError("Unknown payment attempt".to_string())
            }
            FlowError::SessionNotFound => {
                ConsultifyError::NotFoundError("Booking session not found".to_string())
            }
            FlowError::WrongStep(step) => {
                ConsultifyError::ValidationError(format!("Operation not valid at step {:?}", step))
            }
        }
    }
}

impl HttpStatusCode for FlowError {
    fn status_code(&self) -> u16 {
        match self {
            FlowError::PreconditionFailed(_) => 400,
            FlowError::ValidationRejected(_) => 400,
            FlowError::SlotUnavailable => 409,
            FlowError::PaymentSetupFailed(_) => 502,
            FlowError::PaymentVerificationFailed(_) => 401,
            FlowError::PaymentFailed(_) => 502,
            FlowError::PaymentCancelled => 409,
            FlowError::AttemptInFlight => 409,
            FlowError::UnknownAttempt => 404,
            FlowError::SessionNotFound => 404,
            FlowError::WrongStep(_) => 400,
        }
    }
}
