// --- File: crates/consultify_razorpay/src/error.rs ---
use consultify_common::{external_service_error, ConsultifyError, HttpStatusCode};
use thiserror::Error;

/// Razorpay-specific error types.
#[derive(Error, Debug)]
pub enum RazorpayError {
    /// Error occurred during a Razorpay API request
    #[error("Razorpay API request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    /// Error returned by the Razorpay API
    #[error("Razorpay API returned an error: {message} (Status: {status_code})")]
    ApiError { status_code: u16, message: String },

    /// Error parsing Razorpay API response
    #[error("Failed to parse Razorpay API response: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Missing or incomplete Razorpay configuration
    #[error("Razorpay configuration missing or incomplete")]
    ConfigError,

    /// The payment signature did not match the server-side recomputation
    #[error("Payment signature verification failed")]
    SignatureMismatch,

    /// Internal processing error
    #[error("Internal processing error: {0}")]
    InternalError(String),
}

/// Convert RazorpayError to ConsultifyError
impl From<RazorpayError> for ConsultifyError {
    fn from(err: RazorpayError) -> Self {
        match err {
            RazorpayError::RequestError(e) => {
                ConsultifyError::HttpError(format!("Razorpay request error: {}", e))
            }
            RazorpayError::ApiError {
                status_code,
                message,
            } => external_service_error(
                "Razorpay API",
                format!("Status: {}, Message: {}", status_code, message),
            ),
            RazorpayError::ParseError(e) => {
                ConsultifyError::ParseError(format!("Razorpay response parse error: {}", e))
            }
            RazorpayError::ConfigError => ConsultifyError::ConfigError(
                "Razorpay configuration missing or incomplete".to_string(),
            ),
            RazorpayError::SignatureMismatch => {
                ConsultifyError::AuthError("Payment signature verification failed".to_string())
            }
            RazorpayError::InternalError(msg) => {
                ConsultifyError::InternalError(format!("Razorpay internal error: {}", msg))
            }
        }
    }
}

/// Implement HttpStatusCode for RazorpayError to provide a consistent way to
/// convert RazorpayError to HTTP status codes.
impl HttpStatusCode for RazorpayError {
    fn status_code(&self) -> u16 {
        match self {
            RazorpayError::RequestError(_) => 500,
            RazorpayError::ApiError { status_code, .. } => *status_code,
            RazorpayError::ParseError(_) => 400,
            RazorpayError::ConfigError => 500,
            RazorpayError::SignatureMismatch => 400,
            RazorpayError::InternalError(_) => 500,
        }
    }
}
