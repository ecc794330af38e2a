// --- File: crates/consultify_flow/src/logic.rs ---
//! Order/payment orchestration for one booking session.
//!
//! `initiate_payment` creates exactly one gateway order per attempt and
//! hands back the checkout options; the completion callbacks resolve the
//! attempt with exactly one of {verified success, verification failure,
//! gateway failure, cancellation}. No local state is mutated until
//! verification succeeds.

use chrono::{DateTime, Utc};
use consultify_calendar::{build_calendar_link, EventSource, EMPTY_LINK};
use consultify_common::services::{
    BoxFuture, BoxedError, GatewayOrder, PaymentClaim, PaymentGateway, SlotAvailability,
};
use consultify_config::AppConfig;
use consultify_razorpay::{build_checkout_options, CheckoutOptions, CheckoutPrefill};
use serde::Serialize;
use std::time::Duration;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::FlowError;
use crate::notifier::{StatusKind, StatusNotifier};
use crate::selection::{BookingFlow, Step};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// Fallback bound on each remote gateway call.
const DEFAULT_REMOTE_TIMEOUT_SECS: u64 = 30;

// --- Data Structures ---

/// One payment attempt against the gateway.
///
/// The token is the idempotency handle: completion callbacks must present
/// it, and a completed attempt absorbs duplicate callbacks without
/// re-running side effects.
#[derive(Debug, Clone)]
pub struct PaymentAttempt {
    pub token: Uuid,
    pub order: GatewayOrder,
    pub completed: bool,
}

/// Server-side state for one booking flow.
#[derive(Debug)]
pub struct BookingSession {
    pub id: Uuid,
    pub flow: BookingFlow,
    pub notifier: StatusNotifier,
    pub attempt: Option<PaymentAttempt>,
}

impl BookingSession {
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            flow: BookingFlow::new(),
            notifier: StatusNotifier::new(),
            attempt: None,
        }
    }

    /// Whether a payment attempt is currently awaiting its outcome.
    /// Acts as the session's mutual-exclusion flag: selection mutation and
    /// re-initiation are blocked while this is true.
    pub fn in_flight(&self) -> bool {
        matches!(&self.attempt, Some(attempt) if !attempt.completed)
    }
}

/// What the client needs to open the gateway checkout UI.
#[derive(Serialize, Debug, Clone)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct CheckoutHandoff {
    /// Idempotency token the completion callbacks must echo.
    #[cfg_attr(feature = "openapi", schema(value_type = String))]
    pub attempt_token: Uuid,
    pub checkout: CheckoutOptions,
}

/// Result of a (possibly repeated) completion callback.
#[derive(Serialize, Debug, Clone)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct CompletionOutcome {
    pub message: String,
    /// True when this callback was a duplicate of an already-settled attempt.
    pub already_completed: bool,
}

// --- Helpers ---

/// Surfaces an error through the session's status notifier and hands it back.
pub fn surface(session: &mut BookingSession, err: FlowError, now: DateTime<Utc>) -> FlowError {
    session
        .notifier
        .show(StatusKind::Error, err.user_message(), now);
    err
}

fn remote_timeout(config: &AppConfig) -> Duration {
    Duration::from_secs(
        config
            .booking
            .as_ref()
            .and_then(|b| b.remote_timeout_secs)
            .unwrap_or(DEFAULT_REMOTE_TIMEOUT_SECS),
    )
}

/// Awaits a gateway call under the configured bound. A hung remote call
/// resolves to an error instead of leaving the attempt pending forever.
async fn bounded<T>(
    limit: Duration,
    fut: BoxFuture<'_, T, BoxedError>,
) -> Result<T, String> {
    match tokio::time::timeout(limit, fut).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(err)) => Err(err.to_string()),
        Err(_) => Err(format!("timed out after {}s", limit.as_secs())),
    }
}

/// Renders the calendar invite link for a session's current selection.
///
/// Callable before or after confirmation; returns the placeholder link for
/// an incomplete selection. Never fails.
pub fn calendar_link(session: &BookingSession, config: &AppConfig) -> String {
    let selection = session.flow.selection();
    let (offering, date, time, details) = match (
        selection.offering,
        selection.date,
        selection.time.as_deref(),
        selection.details.as_ref(),
    ) {
        (Some(o), Some(d), Some(t), Some(c)) => (o, d, t, c),
        _ => return EMPTY_LINK.to_string(),
    };

    let calendar_config = match config.calendar.as_ref() {
        Some(cfg) => cfg,
        None => {
            warn!("Calendar configuration missing, returning placeholder link");
            return EMPTY_LINK.to_string();
        }
    };

    build_calendar_link(
        &EventSource {
            offering_name: offering.name,
            duration_minutes: offering.duration_minutes,
            date,
            slot_label: time,
            client_name: &details.name,
            email: &details.email,
            phone: &details.phone,
            topic: Some(details.topic.as_str()),
        },
        calendar_config,
    )
}

// --- Orchestration ---

/// Initiates one payment attempt for the session's committed selection.
///
/// Preconditions checked before any remote call: the caller holds an auth
/// context and all required contact fields are present. Exactly one order
/// is created per initiated attempt; retrying a failed attempt creates a
/// new order.
pub async fn initiate_payment(
    session: &mut BookingSession,
    auth: Option<crate::auth::AuthContext>,
    gateway: &dyn PaymentGateway<Error = BoxedError>,
    availability: &dyn SlotAvailability<Error = BoxedError>,
    config: &AppConfig,
    now: DateTime<Utc>,
) -> Result<CheckoutHandoff, FlowError> {
    let step = session.flow.step();
    if step != Step::EnteringDetails {
        return Err(surface(session, FlowError::WrongStep(step), now));
    }
    if auth.is_none() {
        return Err(surface(
            session,
            FlowError::PreconditionFailed("Please sign in to book a consultation".to_string()),
            now,
        ));
    }
    let details_present = session
        .flow
        .selection()
        .details
        .as_ref()
        .is_some_and(|d| d.required_present());
    if !details_present {
        return Err(surface(
            session,
            FlowError::PreconditionFailed("Please fill in all required fields".to_string()),
            now,
        ));
    }
    if session.in_flight() {
        return Err(surface(session, FlowError::AttemptInFlight, now));
    }

    let selection = session.flow.selection();
    let offering = selection.offering.expect("recorded before details step");
    let date = selection.date.expect("recorded before details step");
    let time = selection.time.clone().expect("recorded before details step");
    let details = selection.details.clone().expect("checked above");

    let limit = remote_timeout(config);

    // Reservation capability check; the static implementation always says
    // free, a real backend may not.
    match bounded(limit, availability.is_slot_free(date, time.clone())).await {
        Ok(true) => {}
        Ok(false) => return Err(surface(session, FlowError::SlotUnavailable, now)),
        Err(reason) => {
            warn!("Slot availability check failed: {}", reason);
            return Err(surface(session, FlowError::SlotUnavailable, now));
        }
    }

    let razorpay_config = match config.razorpay.as_ref() {
        Some(cfg) => cfg,
        None => {
            return Err(surface(
                session,
                FlowError::PaymentSetupFailed("Payment gateway not configured".to_string()),
                now,
            ))
        }
    };

    let currency = razorpay_config
        .currency
        .clone()
        .unwrap_or_else(|| "INR".to_string());
    let receipt = format!("consultify-{}", session.id);

    let order = match bounded(
        limit,
        gateway.create_order(offering.price_minor, currency, receipt),
    )
    .await
    {
        Ok(order) => order,
        Err(reason) => {
            return Err(surface(session, FlowError::PaymentSetupFailed(reason), now))
        }
    };

    info!(
        "[Flow Logic] Order {} created for session {} ({})",
        order.id, session.id, offering.id
    );

    let checkout = build_checkout_options(
        razorpay_config,
        &order,
        &format!("{} Consultation", offering.name),
        CheckoutPrefill {
            name: details.name.clone(),
            email: details.email.clone(),
            contact: details.phone.clone(),
        },
    );

    let token = Uuid::new_v4();
    session.attempt = Some(PaymentAttempt {
        token,
        order,
        completed: false,
    });

    Ok(CheckoutHandoff {
        attempt_token: token,
        checkout,
    })
}

/// Resolves a gateway-reported success by verifying it server-side.
///
/// Only a verified response commits the booking; a rejected verification
/// leaves the selection at `EnteringDetails` and is not retried
/// automatically. Duplicate callbacks for a settled attempt are absorbed.
pub async fn complete_payment(
    session: &mut BookingSession,
    attempt_token: Uuid,
    claim: PaymentClaim,
    gateway: &dyn PaymentGateway<Error = BoxedError>,
    config: &AppConfig,
    now: DateTime<Utc>,
) -> Result<CompletionOutcome, FlowError> {
    let attempt = match session.attempt.as_ref() {
        Some(attempt) if attempt.token == attempt_token => attempt,
        _ => return Err(FlowError::UnknownAttempt),
    };

    if attempt.completed {
        return Ok(CompletionOutcome {
            message: "Payment already confirmed".to_string(),
            already_completed: true,
        });
    }

    if claim.order_id != attempt.order.id {
        session.attempt = None;
        return Err(surface(
            session,
            FlowError::PaymentVerificationFailed(format!(
                "order mismatch: {}",
                claim.order_id
            )),
            now,
        ));
    }

    let limit = remote_timeout(config);
    let outcome = match bounded(limit, gateway.verify_payment(claim)).await {
        Ok(outcome) => outcome,
        Err(reason) => {
            // The gateway said success but the server disagrees; terminal
            // for this attempt, and the booking stays unconfirmed.
            session.attempt = None;
            return Err(surface(
                session,
                FlowError::PaymentVerificationFailed(reason),
                now,
            ));
        }
    };

    if let Some(attempt) = session.attempt.as_mut() {
        attempt.completed = true;
    }
    session.flow.confirm()?;
    session.notifier.show(
        StatusKind::Success,
        "Payment successful! Redirecting to schedule your meeting...",
        now,
    );

    info!("[Flow Logic] Session {} confirmed", session.id);
    Ok(CompletionOutcome {
        message: outcome.message,
        already_completed: false,
    })
}

/// Records a gateway-reported payment failure. The selection is left
/// untouched so the user can retry without re-entering earlier steps.
pub fn fail_payment(
    session: &mut BookingSession,
    attempt_token: Uuid,
    description: Option<String>,
    now: DateTime<Utc>,
) -> Result<(), FlowError> {
    if !attempt_matches_in_flight(session, attempt_token) {
        return Err(FlowError::UnknownAttempt);
    }
    session.attempt = None;
    surface(
        session,
        FlowError::PaymentFailed(description.unwrap_or_default()),
        now,
    );
    Ok(())
}

/// Records a checkout-UI dismissal. Terminal for the attempt, not a
/// retryable pending state.
pub fn cancel_payment(
    session: &mut BookingSession,
    attempt_token: Uuid,
    now: DateTime<Utc>,
) -> Result<(), FlowError> {
    if !attempt_matches_in_flight(session, attempt_token) {
        return Err(FlowError::UnknownAttempt);
    }
    session.attempt = None;
    surface(session, FlowError::PaymentCancelled, now);
    Ok(())
}

fn attempt_matches_in_flight(session: &BookingSession, attempt_token: Uuid) -> bool {
    matches!(
        session.attempt.as_ref(),
        Some(attempt) if attempt.token == attempt_token && !attempt.completed
    )
}
