//! Feature flag handling for the Consultify application.
//!
//! Feature flags are used in two ways:
//!
//! 1. Compile-time cargo features using `#[cfg(feature = "...")]`
//! 2. Runtime flags using configuration values (`use_razorpay`, `use_booking`)
//!
//! This module provides helper functions for checking if features are enabled
//! at runtime based on configuration values.

use consultify_config::AppConfig;
use std::sync::Arc;

/// Check if a feature is enabled at runtime based on configuration.
///
/// A feature counts as enabled when its runtime flag is set and its
/// configuration section is present.
pub fn is_feature_enabled<T>(
    _config: &Arc<AppConfig>,
    use_feature: bool,
    feature_config: Option<&T>,
) -> bool {
    use_feature && feature_config.is_some()
}

/// Check if the Razorpay feature is enabled at runtime.
pub fn is_razorpay_enabled(config: &Arc<AppConfig>) -> bool {
    is_feature_enabled(config, config.use_razorpay, config.razorpay.as_ref())
}

/// Check if the booking flow is enabled at runtime.
pub fn is_booking_enabled(config: &Arc<AppConfig>) -> bool {
    is_feature_enabled(config, config.use_booking, config.booking.as_ref())
}
