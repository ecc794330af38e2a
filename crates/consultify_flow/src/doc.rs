// --- File: crates/consultify_flow/src/doc.rs ---
#![allow(dead_code)]
#![cfg(feature = "openapi")]
use utoipa::OpenApi;

use crate::handlers::{
    CalendarLinkResponse, ChooseDateRequest, ChooseOfferingRequest, ChooseTimeRequest,
    CompletePaymentRequest, PaymentCompletedResponse, PaymentDismissedRequest,
    PaymentFailedRequest, SessionView,
};
use crate::logic::{CheckoutHandoff, CompletionOutcome};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::create_session_handler,
        crate::handlers::get_session_handler,
        crate::handlers::choose_offering_handler,
        crate::handlers::choose_date_handler,
        crate::handlers::choose_time_handler,
        crate::handlers::set_details_handler,
        crate::handlers::back_handler,
        crate::handlers::initiate_payment_handler,
        crate::handlers::complete_payment_handler,
        crate::handlers::payment_failed_handler,
        crate::handlers::payment_dismissed_handler,
        crate::handlers::dismiss_status_handler,
        crate::handlers::calendar_link_handler,
        crate::handlers::abandon_session_handler,
    ),
    components(schemas(
        ChooseOfferingRequest,
        ChooseDateRequest,
        ChooseTimeRequest,
        CompletePaymentRequest,
        PaymentFailedRequest,
        PaymentDismissedRequest,
        SessionView,
        PaymentCompletedResponse,
        CalendarLinkResponse,
        CheckoutHandoff,
        CompletionOutcome,
    )),
    tags((name = "Booking", description = "Selection flow and payment orchestration"))
)]
pub struct FlowApiDoc;
