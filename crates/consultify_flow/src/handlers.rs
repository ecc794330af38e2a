// --- File: crates/consultify_flow/src/handlers.rs ---
use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};
use chrono::{NaiveDate, Utc};
use consultify_common::services::{PaymentClaim, ServiceFactory};
use consultify_common::{config_error, is_booking_enabled, map_json_error, ConsultifyError};
use consultify_config::AppConfig;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

use crate::auth::AuthContext;
use crate::error::FlowError;
use crate::logic::{
    calendar_link, cancel_payment, complete_payment, fail_payment, initiate_payment, surface,
    BookingSession, CheckoutHandoff,
};
use crate::notifier::StatusView;
use crate::selection::{BookingFlow, ContactDetails, StepView};
use crate::store::SessionStore;

// --- State for Flow Handlers ---
#[derive(Clone)]
pub struct FlowState {
    pub config: Arc<AppConfig>,
    pub store: SessionStore,
    pub services: Arc<dyn ServiceFactory>,
}

// --- Request/Response Payloads ---

#[derive(Deserialize, Debug)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct ChooseOfferingRequest {
    #[cfg_attr(feature = "openapi", schema(example = "career"))]
    pub offering_id: Option<String>,
}

#[derive(Deserialize, Debug)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct ChooseDateRequest {
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "date"))]
    pub date: Option<NaiveDate>,
}

#[derive(Deserialize, Debug)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct ChooseTimeRequest {
    #[cfg_attr(feature = "openapi", schema(example = "02:00 PM"))]
    pub time: Option<String>,
}

#[derive(Deserialize, Debug)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct CompletePaymentRequest {
    #[cfg_attr(feature = "openapi", schema(value_type = String))]
    pub attempt_token: Uuid,
    pub order_id: String,
    pub payment_id: String,
    pub signature: String,
}

#[derive(Deserialize, Debug)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct PaymentFailedRequest {
    #[cfg_attr(feature = "openapi", schema(value_type = String))]
    pub attempt_token: Uuid,
    /// Human-readable description from the gateway's failure event.
    pub description: Option<String>,
}

#[derive(Deserialize, Debug)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct PaymentDismissedRequest {
    #[cfg_attr(feature = "openapi", schema(value_type = String))]
    pub attempt_token: Uuid,
}

/// The session as the client sees it: step view plus any visible status.
#[derive(Serialize, Debug)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct SessionView {
    #[cfg_attr(feature = "openapi", schema(value_type = String))]
    pub session_id: Uuid,
    #[serde(flatten)]
    #[cfg_attr(feature = "openapi", schema(value_type = Object))]
    pub view: StepView,
    #[cfg_attr(feature = "openapi", schema(value_type = Object))]
    pub status: Option<StatusView>,
}

#[derive(Serialize, Debug)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct PaymentCompletedResponse {
    pub message: String,
    pub already_completed: bool,
    /// Invite link for the committed selection.
    pub calendar_link: String,
}

#[derive(Serialize, Debug)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct CalendarLinkResponse {
    pub url: String,
}

// --- Helpers ---

fn view_of(session: &BookingSession) -> SessionView {
    SessionView {
        session_id: session.id,
        view: session.flow.view(),
        status: session.notifier.current(Utc::now()),
    }
}

/// Applies a selection transition under the in-flight guard, surfacing any
/// rejection through the session's status notifier.
fn apply_transition<F>(session: &mut BookingSession, f: F) -> Result<SessionView, FlowError>
where
    F: FnOnce(&mut BookingFlow) -> Result<(), FlowError>,
{
    let now = Utc::now();
    if session.in_flight() {
        return Err(surface(session, FlowError::AttemptInFlight, now));
    }
    match f(&mut session.flow) {
        Ok(()) => Ok(view_of(session)),
        Err(err) => Err(surface(session, err, now)),
    }
}

// --- Handlers ---

/// Opens a new booking session with an empty selection.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/booking/sessions", // Path relative to /api
    responses((status = 200, description = "Session opened", body = SessionView)),
    tag = "Booking"
))]
pub async fn create_session_handler(State(state): State<Arc<FlowState>>) -> Json<SessionView> {
    let (_, session) = state.store.create().await;
    let guard = session.lock().await;
    Json(view_of(&guard))
}

/// Returns the current step view and any visible status.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/booking/sessions/{id}",
    responses(
        (status = 200, description = "Current session state", body = SessionView),
        (status = 404, description = "Session not found")
    ),
    tag = "Booking"
))]
pub async fn get_session_handler(
    State(state): State<Arc<FlowState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, Response> {
    let session = fetch(&state, id).await?;
    let guard = session.lock().await;
    Ok(Json(view_of(&guard)))
}

/// Records the chosen offering and advances the flow.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/booking/sessions/{id}/offering",
    request_body = ChooseOfferingRequest,
    responses(
        (status = 200, description = "Offering recorded", body = SessionView),
        (status = 400, description = "Empty or unknown offering")
    ),
    tag = "Booking"
))]
pub async fn choose_offering_handler(
    State(state): State<Arc<FlowState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ChooseOfferingRequest>,
) -> Result<Json<SessionView>, Response> {
    let session = fetch(&state, id).await?;
    let mut guard = session.lock().await;
    map_json_error(
        apply_transition(&mut guard, |flow| {
            flow.choose_offering(payload.offering_id.as_deref())
        }),
        ConsultifyError::from,
    )
}

/// Records the chosen date and advances the flow.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/booking/sessions/{id}/date",
    request_body = ChooseDateRequest,
    responses(
        (status = 200, description = "Date recorded", body = SessionView),
        (status = 400, description = "Missing date")
    ),
    tag = "Booking"
))]
pub async fn choose_date_handler(
    State(state): State<Arc<FlowState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ChooseDateRequest>,
) -> Result<Json<SessionView>, Response> {
    let session = fetch(&state, id).await?;
    let mut guard = session.lock().await;
    map_json_error(
        apply_transition(&mut guard, |flow| flow.choose_date(payload.date)),
        ConsultifyError::from,
    )
}

/// Records the chosen time slot and advances the flow.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/booking/sessions/{id}/time",
    request_body = ChooseTimeRequest,
    responses(
        (status = 200, description = "Time recorded", body = SessionView),
        (status = 400, description = "Empty or malformed slot label")
    ),
    tag = "Booking"
))]
pub async fn choose_time_handler(
    State(state): State<Arc<FlowState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ChooseTimeRequest>,
) -> Result<Json<SessionView>, Response> {
    let session = fetch(&state, id).await?;
    let mut guard = session.lock().await;
    map_json_error(
        apply_transition(&mut guard, |flow| flow.choose_time(payload.time.as_deref())),
        ConsultifyError::from,
    )
}

/// Records buyer contact details at the detail-entry step.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/booking/sessions/{id}/details",
    responses(
        (status = 200, description = "Details recorded", body = SessionView),
        (status = 400, description = "Wrong step")
    ),
    tag = "Booking"
))]
pub async fn set_details_handler(
    State(state): State<Arc<FlowState>>,
    Path(id): Path<Uuid>,
    Json(details): Json<ContactDetails>,
) -> Result<Json<SessionView>, Response> {
    let session = fetch(&state, id).await?;
    let mut guard = session.lock().await;
    map_json_error(
        apply_transition(&mut guard, |flow| flow.set_details(details)),
        ConsultifyError::from,
    )
}

/// Moves the flow one step back, keeping later values.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/booking/sessions/{id}/back",
    responses(
        (status = 200, description = "Step pointer moved back", body = SessionView),
        (status = 400, description = "Nothing to go back to")
    ),
    tag = "Booking"
))]
pub async fn back_handler(
    State(state): State<Arc<FlowState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, Response> {
    let session = fetch(&state, id).await?;
    let mut guard = session.lock().await;
    map_json_error(
        apply_transition(&mut guard, |flow| flow.back()),
        ConsultifyError::from,
    )
}

/// Initiates one payment attempt: creates a gateway order and returns the
/// checkout options scoped to it.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/booking/sessions/{id}/pay",
    responses(
        (status = 200, description = "Checkout handoff", body = CheckoutHandoff),
        (status = 400, description = "Precondition failed"),
        (status = 409, description = "Attempt already in flight or slot taken"),
        (status = 502, description = "Order creation failed")
    ),
    tag = "Booking"
))]
pub async fn initiate_payment_handler(
    State(state): State<Arc<FlowState>>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<Json<CheckoutHandoff>, Response> {
    if !is_booking_enabled(&state.config) {
        return Err(
            (StatusCode::SERVICE_UNAVAILABLE, "Booking flow is disabled.").into_response(),
        );
    }
    let gateway = state
        .services
        .payment_gateway()
        .ok_or_else(|| config_error("Payment gateway not configured").into_response())?;
    let availability = state.services.slot_availability();

    let auth = AuthContext::from_headers(&headers);
    let session = fetch(&state, id).await?;
    let mut guard = session.lock().await;
    map_json_error(
        initiate_payment(
            &mut guard,
            auth,
            gateway.as_ref(),
            availability.as_ref(),
            &state.config,
            Utc::now(),
        )
        .await,
        ConsultifyError::from,
    )
}

/// Completion callback for a gateway-reported success: verifies the payment
/// server-side and, only then, confirms the booking.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/booking/sessions/{id}/payment/complete",
    request_body = CompletePaymentRequest,
    responses(
        (status = 200, description = "Booking confirmed", body = PaymentCompletedResponse),
        (status = 401, description = "Verification rejected"),
        (status = 404, description = "Unknown attempt")
    ),
    tag = "Booking"
))]
pub async fn complete_payment_handler(
    State(state): State<Arc<FlowState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CompletePaymentRequest>,
) -> Result<Json<PaymentCompletedResponse>, Response> {
    if !is_booking_enabled(&state.config) {
        return Err(
            (StatusCode::SERVICE_UNAVAILABLE, "Booking flow is disabled.").into_response(),
        );
    }
    let gateway = state
        .services
        .payment_gateway()
        .ok_or_else(|| config_error("Payment gateway not configured").into_response())?;

    let claim = PaymentClaim {
        order_id: payload.order_id,
        payment_id: payload.payment_id,
        signature: payload.signature,
    };

    let session = fetch(&state, id).await?;
    let mut guard = session.lock().await;
    let outcome = complete_payment(
        &mut guard,
        payload.attempt_token,
        claim,
        gateway.as_ref(),
        &state.config,
        Utc::now(),
    )
    .await
    .map_err(|err| ConsultifyError::from(err).into_response())?;

    let link = calendar_link(&guard, &state.config);
    Ok(Json(PaymentCompletedResponse {
        message: outcome.message,
        already_completed: outcome.already_completed,
        calendar_link: link,
    }))
}

/// Records a gateway-reported payment failure; the selection stays intact
/// for a retry.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/booking/sessions/{id}/payment/failed",
    request_body = PaymentFailedRequest,
    responses(
        (status = 200, description = "Failure recorded", body = SessionView),
        (status = 404, description = "Unknown attempt")
    ),
    tag = "Booking"
))]
pub async fn payment_failed_handler(
    State(state): State<Arc<FlowState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<PaymentFailedRequest>,
) -> Result<Json<SessionView>, Response> {
    let session = fetch(&state, id).await?;
    let mut guard = session.lock().await;
    map_json_error(
        fail_payment(
            &mut guard,
            payload.attempt_token,
            payload.description,
            Utc::now(),
        )
        .map(|()| view_of(&guard)),
        ConsultifyError::from,
    )
}

/// Records a checkout-UI dismissal; terminal for the attempt.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/booking/sessions/{id}/payment/dismissed",
    request_body = PaymentDismissedRequest,
    responses(
        (status = 200, description = "Cancellation recorded", body = SessionView),
        (status = 404, description = "Unknown attempt")
    ),
    tag = "Booking"
))]
pub async fn payment_dismissed_handler(
    State(state): State<Arc<FlowState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<PaymentDismissedRequest>,
) -> Result<Json<SessionView>, Response> {
    let session = fetch(&state, id).await?;
    let mut guard = session.lock().await;
    map_json_error(
        cancel_payment(&mut guard, payload.attempt_token, Utc::now())
            .map(|()| view_of(&guard)),
        ConsultifyError::from,
    )
}

/// Dismisses the currently visible status.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/booking/sessions/{id}/status/dismiss",
    responses((status = 200, description = "Status dismissed", body = SessionView)),
    tag = "Booking"
))]
pub async fn dismiss_status_handler(
    State(state): State<Arc<FlowState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, Response> {
    let session = fetch(&state, id).await?;
    let mut guard = session.lock().await;
    guard.notifier.dismiss();
    Ok(Json(view_of(&guard)))
}

/// Returns the calendar invite link for the session's selection; a
/// placeholder when the selection is incomplete.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/booking/sessions/{id}/calendar-link",
    responses((status = 200, description = "Invite link", body = CalendarLinkResponse)),
    tag = "Booking"
))]
pub async fn calendar_link_handler(
    State(state): State<Arc<FlowState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<CalendarLinkResponse>, Response> {
    let session = fetch(&state, id).await?;
    let guard = session.lock().await;
    Ok(Json(CalendarLinkResponse {
        url: calendar_link(&guard, &state.config),
    }))
}

/// Abandons the session from any non-terminal state.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    delete,
    path = "/booking/sessions/{id}",
    responses(
        (status = 204, description = "Session discarded"),
        (status = 404, description = "Session not found")
    ),
    tag = "Booking"
))]
pub async fn abandon_session_handler(
    State(state): State<Arc<FlowState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, Response> {
    state
        .store
        .remove(id)
        .await
        .map(|()| StatusCode::NO_CONTENT)
        .map_err(|err| ConsultifyError::from(err).into_response())
}

async fn fetch(state: &FlowState, id: Uuid) -> Result<crate::store::SharedSession, Response> {
    state
        .store
        .get(id)
        .await
        .map_err(|err| ConsultifyError::from(err).into_response())
}
