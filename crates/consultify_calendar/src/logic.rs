// --- File: crates/consultify_calendar/src/logic.rs ---

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;
use consultify_catalog::parse_slot_label;
use consultify_config::CalendarConfig;
use tracing::debug;

const CALENDAR_RENDER_URL: &str = "https://calendar.google.com/calendar/render";

/// Placeholder returned for an incomplete selection; renders as a harmless
/// empty anchor.
pub const EMPTY_LINK: &str = "#";

/// Zone the slot labels are interpreted in when none is configured.
const DEFAULT_TIME_ZONE: Tz = chrono_tz::Asia::Kolkata;

/// Everything the link builder needs from a committed selection.
#[derive(Debug, Clone, PartialEq)]
pub struct EventSource<'a> {
    pub offering_name: &'a str,
    pub duration_minutes: i64,
    pub date: NaiveDate,
    /// 12-hour slot label, e.g. "02:00 PM".
    pub slot_label: &'a str,
    pub client_name: &'a str,
    pub email: &'a str,
    pub phone: &'a str,
    pub topic: Option<&'a str>,
}

/// The computed event window, in UTC.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EventWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Computes the UTC event window for a selection.
///
/// The slot label is interpreted in the configured zone; the end is start
/// plus the offering duration.
pub fn event_window(source: &EventSource<'_>, config: &CalendarConfig) -> Option<EventWindow> {
    let zone = config
        .time_zone
        .as_deref()
        .and_then(|tz| tz.parse::<Tz>().ok())
        .unwrap_or(DEFAULT_TIME_ZONE);

    let time = parse_slot_label(source.slot_label).ok()?;
    let local = zone
        .from_local_datetime(&source.date.and_time(time))
        .earliest()?;
    let start = local.with_timezone(&Utc);
    let end = start + Duration::minutes(source.duration_minutes);
    Some(EventWindow { start, end })
}

fn format_for_calendar(ts: DateTime<Utc>) -> String {
    // ISO basic form, no punctuation: 20250603T083000Z
    ts.format("%Y%m%dT%H%M%SZ").to_string()
}

/// Renders a selection into a Google Calendar invite deep link.
///
/// Pure: identical input yields byte-identical output. Returns [`EMPTY_LINK`]
/// when the selection cannot produce a valid event window.
pub fn build_calendar_link(source: &EventSource<'_>, config: &CalendarConfig) -> String {
    let window = match event_window(source, config) {
        Some(w) => w,
        None => {
            debug!("Selection incomplete or unparsable, returning placeholder link");
            return EMPTY_LINK.to_string();
        }
    };

    let title_prefix = config
        .event_title_prefix
        .as_deref()
        .unwrap_or("Consultation");
    let title = format!("{}: {}", title_prefix, source.offering_name);

    let details = format!(
        "📌 Consultation Type: {}\n\
         👤 Client: {}\n\
         📧 Email: {}\n\
         📱 Phone: {}\n\n\
         ❓ Questions/Topics:\n{}\n\n\
         ⏰ Duration: {} minutes\n\
         💰 Payment: Completed via Razorpay",
        source.offering_name,
        source.client_name,
        source.email,
        source.phone,
        source.topic.filter(|t| !t.is_empty()).unwrap_or("General consultation"),
        source.duration_minutes,
    );

    let dates = format!(
        "{}/{}",
        format_for_calendar(window.start),
        format_for_calendar(window.end)
    );
    let attendees = format!("{},{}", source.email, config.organizer_email);

    let params: Vec<(&str, &str)> = vec![
        ("action", "TEMPLATE"),
        ("text", title.as_str()),
        ("dates", dates.as_str()),
        ("details", details.as_str()),
        ("add", attendees.as_str()),
        ("sf", "true"),
    ];
    let query = serde_urlencoded::to_string(params).expect("string pairs always encode");

    format!("{}?{}", CALENDAR_RENDER_URL, query)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> CalendarConfig {
        CalendarConfig {
            organizer_email: "advisor@consultify.example".to_string(),
            event_title_prefix: Some("Consultation".to_string()),
            time_zone: Some("Asia/Kolkata".to_string()),
        }
    }

    fn test_source() -> EventSource<'static> {
        EventSource {
            offering_name: "Career & Business",
            duration_minutes: 45,
            date: NaiveDate::from_ymd_opt(2025, 6, 3).unwrap(),
            slot_label: "02:00 PM",
            client_name: "Asha Rao",
            email: "asha@example.com",
            phone: "+911234567890",
            topic: Some("Should I switch jobs this year?"),
        }
    }

    #[test]
    fn window_converts_local_slot_to_utc() {
        // 02:00 PM IST is 08:30 UTC; 45 minutes later is 09:15 UTC.
        let window = event_window(&test_source(), &test_config()).unwrap();
        assert_eq!(format_for_calendar(window.start), "20250603T083000Z");
        assert_eq!(format_for_calendar(window.end), "20250603T091500Z");
    }

    #[test]
    fn window_end_is_start_plus_duration() {
        let window = event_window(&test_source(), &test_config()).unwrap();
        assert_eq!(window.end - window.start, Duration::minutes(45));
        assert!(window.start < window.end);
    }

    #[test]
    fn link_is_deterministic() {
        let first = build_calendar_link(&test_source(), &test_config());
        let second = build_calendar_link(&test_source(), &test_config());
        assert_eq!(first, second);
        assert!(first.starts_with(CALENDAR_RENDER_URL));
        assert!(first.contains("dates=20250603T083000Z%2F20250603T091500Z"));
        assert!(first.contains("action=TEMPLATE"));
    }

    #[test]
    fn attendees_join_buyer_and_organizer() {
        let link = build_calendar_link(&test_source(), &test_config());
        // Comma is percent-encoded inside the query value.
        assert!(link.contains("asha%40example.com%2Cadvisor%40consultify.example"));
    }

    #[test]
    fn empty_topic_falls_back_to_general_consultation() {
        let mut source = test_source();
        source.topic = Some("");
        let link = build_calendar_link(&source, &test_config());
        assert!(link.contains("General+consultation"));
    }

    #[test]
    fn unparsable_slot_label_yields_placeholder() {
        let mut source = test_source();
        source.slot_label = "half past never";
        assert_eq!(build_calendar_link(&source, &test_config()), EMPTY_LINK);
    }
}
