// Orchestrator tests against mock gateway and availability services.
// The service traits exist so these paths can run without the real
// Razorpay API; every scenario here mirrors an observable flow outcome.

use chrono::{NaiveDate, Utc};
use consultify_common::services::{
    BoxFuture, BoxedError, GatewayOrder, PaymentClaim, PaymentGateway, SlotAvailability,
    VerificationOutcome,
};
use consultify_config::{AppConfig, BookingConfig, CalendarConfig, RazorpayConfig, ServerConfig};
use consultify_flow::{
    cancel_payment, complete_payment, fail_payment, initiate_payment, AuthContext,
    BookingSession, ContactDetails, FlowError, Step,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use uuid::Uuid;

// --- Mocks ---

#[derive(Default)]
struct MockGateway {
    create_calls: AtomicUsize,
    verify_calls: AtomicUsize,
    fail_create: bool,
    hang_create: bool,
    fail_verify: bool,
}

fn simulated(msg: &str) -> BoxedError {
    BoxedError(msg.to_string().into())
}

impl PaymentGateway for MockGateway {
    type Error = BoxedError;

    fn create_order(
        &self,
        amount_minor: i64,
        currency: String,
        _receipt: String,
    ) -> BoxFuture<'_, GatewayOrder, Self::Error> {
        Box::pin(async move {
            let call = self.create_calls.fetch_add(1, Ordering::SeqCst) + 1;
            if self.hang_create {
                tokio::time::sleep(Duration::from_secs(3600)).await;
            }
            if self.fail_create {
                return Err(simulated("connection reset by peer"));
            }
            Ok(GatewayOrder {
                id: format!("order_test_{}", call),
                amount: amount_minor,
                currency,
            })
        })
    }

    fn verify_payment(
        &self,
        _claim: PaymentClaim,
    ) -> BoxFuture<'_, VerificationOutcome, Self::Error> {
        Box::pin(async move {
            self.verify_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_verify {
                return Err(simulated("signature mismatch"));
            }
            Ok(VerificationOutcome {
                message: "Payment verified successfully".to_string(),
            })
        })
    }
}

struct FreeSlots;

impl SlotAvailability for FreeSlots {
    type Error = BoxedError;

    fn is_slot_free(
        &self,
        _date: NaiveDate,
        _slot_label: String,
    ) -> BoxFuture<'_, bool, Self::Error> {
        Box::pin(async { Ok(true) })
    }
}

struct BusySlots;

impl SlotAvailability for BusySlots {
    type Error = BoxedError;

    fn is_slot_free(
        &self,
        _date: NaiveDate,
        _slot_label: String,
    ) -> BoxFuture<'_, bool, Self::Error> {
        Box::pin(async { Ok(false) })
    }
}

// --- Fixtures ---

fn test_config() -> AppConfig {
    AppConfig {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8086,
        },
        use_razorpay: true,
        use_booking: true,
        razorpay: Some(RazorpayConfig {
            key_id: "rzp_test_abc123".to_string(),
            currency: Some("INR".to_string()),
            merchant_name: Some("Consultify".to_string()),
            theme_color: None,
        }),
        calendar: Some(CalendarConfig {
            organizer_email: "advisor@consultify.example".to_string(),
            event_title_prefix: Some("Consultation".to_string()),
            time_zone: Some("Asia/Kolkata".to_string()),
        }),
        booking: Some(BookingConfig {
            remote_timeout_secs: Some(2),
        }),
    }
}

fn details() -> ContactDetails {
    ContactDetails {
        name: "Asha Rao".to_string(),
        email: "asha@example.com".to_string(),
        phone: "+911234567890".to_string(),
        topic: "Should I switch jobs this year?".to_string(),
    }
}

fn session_at_details() -> BookingSession {
    let mut session = BookingSession::new(Uuid::new_v4());
    session.flow.choose_offering(Some("career")).unwrap();
    session
        .flow
        .choose_date(NaiveDate::from_ymd_opt(2025, 6, 3))
        .unwrap();
    session.flow.choose_time(Some("02:00 PM")).unwrap();
    session.flow.set_details(details()).unwrap();
    session
}

fn auth() -> Option<AuthContext> {
    Some(AuthContext {
        token: "tok-123".to_string(),
    })
}

fn claim_for(order_id: &str) -> PaymentClaim {
    PaymentClaim {
        order_id: order_id.to_string(),
        payment_id: "pay_test_1".to_string(),
        signature: "deadbeef".to_string(),
    }
}

// --- Scenarios ---

#[tokio::test]
async fn unauthenticated_initiate_makes_no_remote_call() {
    let mut session = session_at_details();
    let gateway = MockGateway::default();
    let config = test_config();

    let result =
        initiate_payment(&mut session, None, &gateway, &FreeSlots, &config, Utc::now()).await;

    assert!(matches!(result, Err(FlowError::PreconditionFailed(_))));
    assert_eq!(gateway.create_calls.load(Ordering::SeqCst), 0);
    let status = session.notifier.current(Utc::now()).unwrap();
    assert!(!status.success);
    assert_eq!(status.message, "Please sign in to book a consultation");
}

#[tokio::test]
async fn missing_required_fields_make_no_remote_call() {
    let mut session = session_at_details();
    session
        .flow
        .set_details(ContactDetails {
            name: "Asha Rao".to_string(),
            email: String::new(),
            phone: "+911234567890".to_string(),
            topic: String::new(),
        })
        .unwrap();
    let gateway = MockGateway::default();
    let config = test_config();

    let result =
        initiate_payment(&mut session, auth(), &gateway, &FreeSlots, &config, Utc::now()).await;

    assert!(matches!(result, Err(FlowError::PreconditionFailed(_))));
    assert_eq!(gateway.create_calls.load(Ordering::SeqCst), 0);
    assert_eq!(
        session.notifier.current(Utc::now()).unwrap().message,
        "Please fill in all required fields"
    );
}

#[tokio::test]
async fn order_creation_failure_is_surfaced_and_leaves_selection_for_retry() {
    let mut session = session_at_details();
    let gateway = MockGateway {
        fail_create: true,
        ..Default::default()
    };
    let config = test_config();

    let result =
        initiate_payment(&mut session, auth(), &gateway, &FreeSlots, &config, Utc::now()).await;

    assert!(matches!(result, Err(FlowError::PaymentSetupFailed(_))));
    assert_eq!(gateway.create_calls.load(Ordering::SeqCst), 1);
    // Loading indicator clears: nothing left in flight.
    assert!(!session.in_flight());
    // Selection stays populated at the details step for a retry.
    assert_eq!(session.flow.step(), Step::EnteringDetails);
    assert_eq!(session.flow.selection().details, Some(details()));
    let status = session.notifier.current(Utc::now()).unwrap();
    assert!(!status.success);
    assert_eq!(status.message, "Something went wrong. Please try again.");
}

#[tokio::test]
async fn slot_unavailable_blocks_order_creation() {
    let mut session = session_at_details();
    let gateway = MockGateway::default();
    let config = test_config();

    let result =
        initiate_payment(&mut session, auth(), &gateway, &BusySlots, &config, Utc::now()).await;

    assert!(matches!(result, Err(FlowError::SlotUnavailable)));
    assert_eq!(gateway.create_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn verified_success_confirms_the_booking() {
    let mut session = session_at_details();
    let gateway = MockGateway::default();
    let config = test_config();

    let handoff = initiate_payment(&mut session, auth(), &gateway, &FreeSlots, &config, Utc::now())
        .await
        .unwrap();

    // Checkout is scoped to the server-issued order, amount echoed.
    assert_eq!(handoff.checkout.order_id, "order_test_1");
    assert_eq!(handoff.checkout.amount, 299_900);
    assert_eq!(handoff.checkout.currency, "INR");
    assert!(session.in_flight());

    let outcome = complete_payment(
        &mut session,
        handoff.attempt_token,
        claim_for(&handoff.checkout.order_id),
        &gateway,
        &config,
        Utc::now(),
    )
    .await
    .unwrap();

    assert!(!outcome.already_completed);
    assert_eq!(session.flow.step(), Step::Confirmed);
    assert!(!session.in_flight());
    let status = session.notifier.current(Utc::now()).unwrap();
    assert!(status.success);
    assert_eq!(
        status.message,
        "Payment successful! Redirecting to schedule your meeting..."
    );

    let link = consultify_flow::calendar_link(&session, &config);
    assert!(link.starts_with("https://calendar.google.com/calendar/render?"));
}

#[tokio::test]
async fn verification_failure_leaves_booking_unconfirmed() {
    let mut session = session_at_details();
    let gateway = MockGateway {
        fail_verify: true,
        ..Default::default()
    };
    let config = test_config();

    let handoff = initiate_payment(&mut session, auth(), &gateway, &FreeSlots, &config, Utc::now())
        .await
        .unwrap();
    let result = complete_payment(
        &mut session,
        handoff.attempt_token,
        claim_for(&handoff.checkout.order_id),
        &gateway,
        &config,
        Utc::now(),
    )
    .await;

    assert!(matches!(result, Err(FlowError::PaymentVerificationFailed(_))));
    // Gateway said success, server disagreed: booking stays unconfirmed.
    assert_eq!(session.flow.step(), Step::EnteringDetails);
    assert!(!session.in_flight());
    assert_eq!(
        session.notifier.current(Utc::now()).unwrap().message,
        "Payment verification failed. Please contact support."
    );
}

#[tokio::test]
async fn completion_callback_is_idempotent() {
    let mut session = session_at_details();
    let gateway = MockGateway::default();
    let config = test_config();

    let handoff = initiate_payment(&mut session, auth(), &gateway, &FreeSlots, &config, Utc::now())
        .await
        .unwrap();
    let claim = claim_for(&handoff.checkout.order_id);

    let first = complete_payment(
        &mut session,
        handoff.attempt_token,
        claim.clone(),
        &gateway,
        &config,
        Utc::now(),
    )
    .await
    .unwrap();
    let second = complete_payment(
        &mut session,
        handoff.attempt_token,
        claim,
        &gateway,
        &config,
        Utc::now(),
    )
    .await
    .unwrap();

    assert!(!first.already_completed);
    assert!(second.already_completed);
    // Exactly one verification, one confirmation side effect.
    assert_eq!(gateway.verify_calls.load(Ordering::SeqCst), 1);
    assert_eq!(session.flow.step(), Step::Confirmed);
}

#[tokio::test]
async fn verification_never_runs_without_a_created_order() {
    let mut session = session_at_details();
    let gateway = MockGateway::default();
    let config = test_config();

    let result = complete_payment(
        &mut session,
        Uuid::new_v4(),
        claim_for("order_test_1"),
        &gateway,
        &config,
        Utc::now(),
    )
    .await;

    assert!(matches!(result, Err(FlowError::UnknownAttempt)));
    assert_eq!(gateway.verify_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn order_mismatch_is_a_verification_failure() {
    let mut session = session_at_details();
    let gateway = MockGateway::default();
    let config = test_config();

    let handoff = initiate_payment(&mut session, auth(), &gateway, &FreeSlots, &config, Utc::now())
        .await
        .unwrap();
    let result = complete_payment(
        &mut session,
        handoff.attempt_token,
        claim_for("order_someone_elses"),
        &gateway,
        &config,
        Utc::now(),
    )
    .await;

    assert!(matches!(result, Err(FlowError::PaymentVerificationFailed(_))));
    assert_eq!(gateway.verify_calls.load(Ordering::SeqCst), 0);
    assert_eq!(session.flow.step(), Step::EnteringDetails);
}

#[tokio::test]
async fn second_initiate_is_rejected_while_in_flight() {
    let mut session = session_at_details();
    let gateway = MockGateway::default();
    let config = test_config();

    initiate_payment(&mut session, auth(), &gateway, &FreeSlots, &config, Utc::now())
        .await
        .unwrap();
    let result =
        initiate_payment(&mut session, auth(), &gateway, &FreeSlots, &config, Utc::now()).await;

    assert!(matches!(result, Err(FlowError::AttemptInFlight)));
    assert_eq!(gateway.create_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn dismissal_is_terminal_and_retry_creates_a_new_order() {
    let mut session = session_at_details();
    let gateway = MockGateway::default();
    let config = test_config();

    let first = initiate_payment(&mut session, auth(), &gateway, &FreeSlots, &config, Utc::now())
        .await
        .unwrap();
    cancel_payment(&mut session, first.attempt_token, Utc::now()).unwrap();

    assert!(!session.in_flight());
    assert_eq!(
        session.notifier.current(Utc::now()).unwrap().message,
        "Payment cancelled."
    );
    // Selection untouched; retry goes through a fresh order and token.
    assert_eq!(session.flow.step(), Step::EnteringDetails);
    let second = initiate_payment(&mut session, auth(), &gateway, &FreeSlots, &config, Utc::now())
        .await
        .unwrap();
    assert_eq!(gateway.create_calls.load(Ordering::SeqCst), 2);
    assert_eq!(second.checkout.order_id, "order_test_2");
    assert_ne!(first.attempt_token, second.attempt_token);

    // The dismissed attempt's token no longer resolves.
    let stale = complete_payment(
        &mut session,
        first.attempt_token,
        claim_for(&first.checkout.order_id),
        &gateway,
        &config,
        Utc::now(),
    )
    .await;
    assert!(matches!(stale, Err(FlowError::UnknownAttempt)));
}

#[tokio::test]
async fn gateway_failure_event_shows_its_description() {
    let mut session = session_at_details();
    let gateway = MockGateway::default();
    let config = test_config();

    let handoff = initiate_payment(&mut session, auth(), &gateway, &FreeSlots, &config, Utc::now())
        .await
        .unwrap();
    fail_payment(
        &mut session,
        handoff.attempt_token,
        Some("Card declined by issuing bank".to_string()),
        Utc::now(),
    )
    .unwrap();

    assert!(!session.in_flight());
    assert_eq!(session.flow.step(), Step::EnteringDetails);
    assert_eq!(
        session.notifier.current(Utc::now()).unwrap().message,
        "Card declined by issuing bank"
    );

    // Without a description the generic retry message is shown.
    let handoff = initiate_payment(&mut session, auth(), &gateway, &FreeSlots, &config, Utc::now())
        .await
        .unwrap();
    fail_payment(&mut session, handoff.attempt_token, None, Utc::now()).unwrap();
    assert_eq!(
        session.notifier.current(Utc::now()).unwrap().message,
        "Payment failed. Please try again."
    );
}

#[tokio::test(start_paused = true)]
async fn hung_order_creation_times_out_as_setup_failure() {
    let mut session = session_at_details();
    let gateway = MockGateway {
        hang_create: true,
        ..Default::default()
    };
    let config = test_config();

    let result =
        initiate_payment(&mut session, auth(), &gateway, &FreeSlots, &config, Utc::now()).await;

    match result {
        Err(FlowError::PaymentSetupFailed(reason)) => {
            assert!(reason.contains("timed out"), "reason: {}", reason)
        }
        other => panic!("expected setup failure, got {:?}", other.map(|_| ())),
    }
    assert!(!session.in_flight());
}
