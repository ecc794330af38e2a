// --- File: crates/consultify_config/src/models.rs ---

use serde::{Deserialize, Serialize};

// --- General Server Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

// --- Razorpay Config ---
// Holds non-secret Razorpay config. The key secret is loaded directly from
// the RAZORPAY_KEY_SECRET env var.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct RazorpayConfig {
    pub key_id: String, // Overridable via APP_RAZORPAY__KEY_ID
    pub currency: Option<String>,
    pub merchant_name: Option<String>,
    pub theme_color: Option<String>,
    // Secret loaded directly from env var: RAZORPAY_KEY_SECRET
}

// --- Calendar Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CalendarConfig {
    /// Service-side attendee added to every invite.
    pub organizer_email: String,
    /// Prefix for generated event titles, e.g. "Consultation".
    pub event_title_prefix: Option<String>,
    /// IANA zone the booked slot labels are interpreted in, e.g. "Asia/Kolkata".
    pub time_zone: Option<String>,
}

// --- Booking Flow Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct BookingConfig {
    /// Upper bound on each remote gateway call (order creation, verification).
    pub remote_timeout_secs: Option<u64>,
}

// --- Unified App Configuration ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    // Server config is mandatory
    pub server: ServerConfig,

    // --- Runtime Flags (optional in config file, default to false) ---
    #[serde(default)]
    pub use_razorpay: bool,
    #[serde(default)]
    pub use_booking: bool,

    // --- Optional Feature Configurations ---
    #[serde(default)]
    pub razorpay: Option<RazorpayConfig>,
    #[serde(default)]
    pub calendar: Option<CalendarConfig>,
    #[serde(default)]
    pub booking: Option<BookingConfig>,
}
