// --- File: crates/consultify_catalog/src/logic.rs ---
use chrono::{Datelike, Duration, NaiveDate, NaiveTime, Weekday};
use serde::Serialize;
use thiserror::Error;

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

// --- Error Handling ---
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Unknown offering: {0}")]
    UnknownOffering(String),
    #[error("Failed to parse time slot label: {0}")]
    SlotLabelParse(String),
}

// --- Data Structures ---

/// A purchasable consultation offering. Immutable, defined at build time.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct Offering {
    #[cfg_attr(feature = "openapi", schema(example = "career"))]
    pub id: &'static str,
    #[cfg_attr(feature = "openapi", schema(example = "Career & Business"))]
    pub name: &'static str,
    /// Category icon name rendered by the client.
    #[cfg_attr(feature = "openapi", schema(example = "ph:briefcase-fill"))]
    pub icon: &'static str,
    pub description: &'static str,
    #[cfg_attr(feature = "openapi", schema(example = 45))]
    pub duration_minutes: i64,
    /// Price in minor currency units (paise).
    #[cfg_attr(feature = "openapi", schema(example = 299900))]
    pub price_minor: i64,
}

/// A time-of-day slot offered on every candidate date.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct TimeSlot {
    #[cfg_attr(feature = "openapi", schema(example = "02:00 PM"))]
    pub label: &'static str,
    pub available: bool,
}

#[derive(Serialize, Debug)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct AvailabilityResponse {
    #[cfg_attr(feature = "openapi", schema(value_type = Vec<String>))]
    pub dates: Vec<NaiveDate>,
    pub slots: Vec<TimeSlot>,
}

#[derive(Serialize, Debug)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct OfferingsResponse {
    pub offerings: Vec<Offering>,
}

// --- Catalog Data ---

/// Standard consultation price: Rs. 2,999 in paise.
const CONSULTATION_PRICE_MINOR: i64 = 299_900;

static OFFERINGS: &[Offering] = &[
    Offering {
        id: "career",
        name: "Career & Business",
        icon: "ph:briefcase-fill",
        description: "Job changes, promotions, business decisions",
        duration_minutes: 45,
        price_minor: CONSULTATION_PRICE_MINOR,
    },
    Offering {
        id: "relationship",
        name: "Relationships & Marriage",
        icon: "ph:heart-fill",
        description: "Love life, marriage timing, compatibility",
        duration_minutes: 45,
        price_minor: CONSULTATION_PRICE_MINOR,
    },
    Offering {
        id: "finance",
        name: "Finance & Investments",
        icon: "ph:currency-inr-fill",
        description: "Wealth, investments, financial planning",
        duration_minutes: 45,
        price_minor: CONSULTATION_PRICE_MINOR,
    },
    Offering {
        id: "health",
        name: "Health & Wellness",
        icon: "ph:heartbeat-fill",
        description: "Health concerns, recovery, wellness guidance",
        duration_minutes: 45,
        price_minor: CONSULTATION_PRICE_MINOR,
    },
    Offering {
        id: "general",
        name: "General Life Guidance",
        icon: "ph:compass-fill",
        description: "Overall life direction, yearly predictions",
        duration_minutes: 60,
        price_minor: CONSULTATION_PRICE_MINOR,
    },
    Offering {
        id: "remedies",
        name: "Remedies & Solutions",
        icon: "ph:sparkle-fill",
        description: "Gemstones, mantras, rituals for specific issues",
        duration_minutes: 30,
        price_minor: CONSULTATION_PRICE_MINOR,
    },
];

/// All purchasable offerings.
pub fn offerings() -> &'static [Offering] {
    OFFERINGS
}

/// Look up an offering by identifier.
pub fn find_offering(id: &str) -> Result<&'static Offering, CatalogError> {
    OFFERINGS
        .iter()
        .find(|o| o.id == id)
        .ok_or_else(|| CatalogError::UnknownOffering(id.to_string()))
}

// --- Availability Logic ---

/// Calendar days scanned ahead of "today" when generating candidates.
const LOOKAHEAD_DAYS: i64 = 21;
/// Upper bound on the number of candidate dates returned.
const MAX_CANDIDATES: usize = 14;
/// Weekday on which no consultations take place.
const BLACKOUT_WEEKDAY: Weekday = Weekday::Sun;

static SLOT_LABELS: &[&str] = &[
    "10:00 AM", "11:00 AM", "12:00 PM", "02:00 PM", "03:00 PM", "04:00 PM", "05:00 PM",
    "06:00 PM", "07:00 PM", "08:00 PM",
];

/// Generates upcoming candidate dates, skipping the blackout weekday.
///
/// Scans from tomorrow up to `LOOKAHEAD_DAYS` ahead and stops early once
/// `MAX_CANDIDATES` dates are collected. Pure function of `today`.
pub fn candidate_dates(today: NaiveDate) -> Vec<NaiveDate> {
    let mut dates = Vec::with_capacity(MAX_CANDIDATES);
    for offset in 1..=LOOKAHEAD_DAYS {
        if dates.len() >= MAX_CANDIDATES {
            break;
        }
        let date = today + Duration::days(offset);
        if date.weekday() != BLACKOUT_WEEKDAY {
            dates.push(date);
        }
    }
    dates
}

/// The fixed time-of-day slot sequence offered on every candidate date.
pub fn time_slots() -> Vec<TimeSlot> {
    SLOT_LABELS
        .iter()
        .map(|label| TimeSlot {
            label,
            available: true,
        })
        .collect()
}

/// Parses a 12-hour slot label like "02:00 PM" into a 24-hour time.
pub fn parse_slot_label(label: &str) -> Result<NaiveTime, CatalogError> {
    let mut parts = label.split_whitespace();
    let (hour_min, period) = match (parts.next(), parts.next(), parts.next()) {
        (Some(hm), Some(p), None) => (hm, p),
        _ => return Err(CatalogError::SlotLabelParse(label.to_string())),
    };

    let mut hm = hour_min.split(':');
    let (hours, minutes) = match (hm.next(), hm.next(), hm.next()) {
        (Some(h), Some(m), None) => (
            h.parse::<u32>()
                .map_err(|_| CatalogError::SlotLabelParse(label.to_string()))?,
            m.parse::<u32>()
                .map_err(|_| CatalogError::SlotLabelParse(label.to_string()))?,
        ),
        _ => return Err(CatalogError::SlotLabelParse(label.to_string())),
    };

    let hours = match period {
        "PM" if hours != 12 => hours + 12,
        "AM" if hours == 12 => 0,
        "AM" | "PM" => hours,
        _ => return Err(CatalogError::SlotLabelParse(label.to_string())),
    };

    NaiveTime::from_hms_opt(hours, minutes, 0)
        .ok_or_else(|| CatalogError::SlotLabelParse(label.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn candidates_never_include_sunday() {
        // A Monday; the following three weeks each contain a Sunday.
        let today = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
        let dates = candidate_dates(today);
        assert!(dates.iter().all(|d| d.weekday() != Weekday::Sun));
    }

    #[test]
    fn candidates_capped_at_fourteen() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
        let dates = candidate_dates(today);
        assert_eq!(dates.len(), 14);
        // First candidate is tomorrow, never today.
        assert_eq!(dates[0], today + Duration::days(1));
    }

    #[test]
    fn candidates_stay_inside_lookahead_window() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
        for date in candidate_dates(today) {
            assert!(date <= today + Duration::days(LOOKAHEAD_DAYS));
        }
    }

    #[test]
    fn slot_sequence_is_fixed_and_available() {
        let slots = time_slots();
        assert_eq!(slots.len(), 10);
        assert!(slots.iter().all(|s| s.available));
        assert_eq!(slots[0].label, "10:00 AM");
        assert_eq!(slots[9].label, "08:00 PM");
    }

    #[test]
    fn parses_afternoon_labels_to_24_hour() {
        assert_eq!(
            parse_slot_label("02:00 PM").unwrap(),
            NaiveTime::from_hms_opt(14, 0, 0).unwrap()
        );
        assert_eq!(
            parse_slot_label("12:00 PM").unwrap(),
            NaiveTime::from_hms_opt(12, 0, 0).unwrap()
        );
        assert_eq!(
            parse_slot_label("12:30 AM").unwrap(),
            NaiveTime::from_hms_opt(0, 30, 0).unwrap()
        );
    }

    #[test]
    fn rejects_malformed_labels() {
        assert!(parse_slot_label("14:00").is_err());
        assert!(parse_slot_label("02:00 XM").is_err());
        assert!(parse_slot_label("two PM").is_err());
    }

    #[test]
    fn catalog_lookup_by_id() {
        let general = find_offering("general").unwrap();
        assert_eq!(general.duration_minutes, 60);
        let remedies = find_offering("remedies").unwrap();
        assert_eq!(remedies.duration_minutes, 30);
        assert!(find_offering("astral-projection").is_err());
    }
}
