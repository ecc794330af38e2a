// --- File: crates/consultify_flow/src/notifier.rs ---
//! Transient, auto-hiding user-facing status channel.
//!
//! At most one status is visible at a time; a new status preempts the
//! current one rather than queuing. A status hides after a fixed duration
//! or on explicit dismissal, whichever comes first. Expiry is computed
//! against a passed-in "now" so the behavior stays deterministic under test.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

/// How long a status stays visible before auto-hiding.
const STATUS_TTL_SECS: i64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Status {
    pub kind: StatusKind,
    pub message: String,
    shown_at: DateTime<Utc>,
}

/// What the client sees: a message plus a success/failure flag.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StatusView {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Clone, Default)]
pub struct StatusNotifier {
    current: Option<Status>,
}

impl StatusNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shows a status, replacing whatever is currently visible.
    pub fn show(&mut self, kind: StatusKind, message: impl Into<String>, now: DateTime<Utc>) {
        self.current = Some(Status {
            kind,
            message: message.into(),
            shown_at: now,
        });
    }

    /// Hides the current status immediately.
    pub fn dismiss(&mut self) {
        self.current = None;
    }

    /// The currently visible status, if it has not expired.
    pub fn current(&self, now: DateTime<Utc>) -> Option<StatusView> {
        self.current
            .as_ref()
            .filter(|status| now - status.shown_at < Duration::seconds(STATUS_TTL_SECS))
            .map(|status| StatusView {
                success: status.kind == StatusKind::Success,
                message: status.message.clone(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_750_000_000 + secs, 0).unwrap()
    }

    #[test]
    fn status_auto_hides_after_five_seconds() {
        let mut notifier = StatusNotifier::new();
        notifier.show(StatusKind::Success, "Payment successful!", at(0));
        assert!(notifier.current(at(4)).is_some());
        assert!(notifier.current(at(5)).is_none());
    }

    #[test]
    fn new_status_preempts_the_current_one() {
        let mut notifier = StatusNotifier::new();
        notifier.show(StatusKind::Error, "Payment failed. Please try again.", at(0));
        notifier.show(StatusKind::Success, "Payment successful!", at(2));
        let view = notifier.current(at(3)).unwrap();
        assert!(view.success);
        assert_eq!(view.message, "Payment successful!");
        // The replacement restarts the clock.
        assert!(notifier.current(at(6)).is_some());
        assert!(notifier.current(at(7)).is_none());
    }

    #[test]
    fn dismissal_hides_immediately() {
        let mut notifier = StatusNotifier::new();
        notifier.show(StatusKind::Error, "Please sign in to book a consultation", at(0));
        notifier.dismiss();
        assert!(notifier.current(at(0)).is_none());
    }
}
