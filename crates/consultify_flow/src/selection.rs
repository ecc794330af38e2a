// --- File: crates/consultify_flow/src/selection.rs ---
//! The ordered selection state machine driving one booking attempt.
//!
//! Steps advance strictly one at a time with non-empty input; going back
//! keeps values already recorded for later steps, so revisiting shows prior
//! choices. The terminal `Confirmed` step is reachable only through the
//! payment orchestrator's verified-success path.

use chrono::NaiveDate;
use consultify_catalog::{find_offering, parse_slot_label, Offering};
use serde::{Deserialize, Serialize};

use crate::error::FlowError;

/// The current step of the booking flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    ChoosingOffering,
    ChoosingDate,
    ChoosingTime,
    EnteringDetails,
    Confirmed,
}

/// Buyer contact details collected at the final input step.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ContactDetails {
    pub name: String,
    pub email: String,
    pub phone: String,
    /// Free-text questions/topics; optional.
    #[serde(default)]
    pub topic: String,
}

impl ContactDetails {
    /// Presence check only; no format validation.
    pub fn required_present(&self) -> bool {
        !self.name.trim().is_empty()
            && !self.email.trim().is_empty()
            && !self.phone.trim().is_empty()
    }
}

/// The monotonically populated selection aggregate.
///
/// Fields are set strictly in step order; a later field is never set while
/// an earlier one is empty. Values survive backward navigation.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    pub offering: Option<&'static Offering>,
    pub date: Option<NaiveDate>,
    pub time: Option<String>,
    pub details: Option<ContactDetails>,
}

/// A view of the flow carrying exactly the data valid at the current step.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum StepView {
    ChoosingOffering,
    ChoosingDate {
        offering: &'static Offering,
    },
    ChoosingTime {
        offering: &'static Offering,
        date: NaiveDate,
    },
    EnteringDetails {
        offering: &'static Offering,
        date: NaiveDate,
        time: String,
        details: Option<ContactDetails>,
    },
    Confirmed {
        offering: &'static Offering,
        date: NaiveDate,
        time: String,
        details: ContactDetails,
    },
}

/// The selection state machine for one booking session.
#[derive(Debug, Clone, Default)]
pub struct BookingFlow {
    step: Step,
    selection: Selection,
}

impl Default for Step {
    fn default() -> Self {
        Step::ChoosingOffering
    }
}

impl BookingFlow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Records the chosen offering and advances to date selection.
    pub fn choose_offering(&mut self, offering_id: Option<&str>) -> Result<(), FlowError> {
        if self.step != Step::ChoosingOffering {
            return Err(FlowError::WrongStep(self.step));
        }
        let id = match offering_id {
            Some(id) if !id.trim().is_empty() => id,
            _ => {
                return Err(FlowError::ValidationRejected(
                    "Please choose a consultation type".to_string(),
                ))
            }
        };
        let offering = find_offering(id)
            .map_err(|e| FlowError::ValidationRejected(e.to_string()))?;
        self.selection.offering = Some(offering);
        self.step = Step::ChoosingDate;
        Ok(())
    }

    /// Records the chosen date and advances to time selection.
    pub fn choose_date(&mut self, date: Option<NaiveDate>) -> Result<(), FlowError> {
        if self.step != Step::ChoosingDate {
            return Err(FlowError::WrongStep(self.step));
        }
        let date = date.ok_or_else(|| {
            FlowError::ValidationRejected("Please choose a date".to_string())
        })?;
        self.selection.date = Some(date);
        self.step = Step::ChoosingTime;
        Ok(())
    }

    /// Records the chosen time slot and advances to detail entry.
    pub fn choose_time(&mut self, time: Option<&str>) -> Result<(), FlowError> {
        if self.step != Step::ChoosingTime {
            return Err(FlowError::WrongStep(self.step));
        }
        let label = match time {
            Some(label) if !label.trim().is_empty() => label,
            _ => {
                return Err(FlowError::ValidationRejected(
                    "Please choose a time slot".to_string(),
                ))
            }
        };
        parse_slot_label(label)
            .map_err(|e| FlowError::ValidationRejected(e.to_string()))?;
        self.selection.time = Some(label.to_string());
        self.step = Step::EnteringDetails;
        Ok(())
    }

    /// Records contact details at the detail-entry step without advancing;
    /// the only way out of `EnteringDetails` is the orchestrator.
    pub fn set_details(&mut self, details: ContactDetails) -> Result<(), FlowError> {
        if self.step != Step::EnteringDetails {
            return Err(FlowError::WrongStep(self.step));
        }
        self.selection.details = Some(details);
        Ok(())
    }

    /// Moves one step back. Values recorded for steps ahead of the new
    /// position are kept.
    pub fn back(&mut self) -> Result<(), FlowError> {
        self.step = match self.step {
            Step::ChoosingOffering => return Err(FlowError::WrongStep(self.step)),
            Step::ChoosingDate => Step::ChoosingOffering,
            Step::ChoosingTime => Step::ChoosingDate,
            Step::EnteringDetails => Step::ChoosingTime,
            Step::Confirmed => return Err(FlowError::WrongStep(self.step)),
        };
        Ok(())
    }

    /// Marks the booking confirmed. Crate-private: only the orchestrator's
    /// verified-success path may call this.
    pub(crate) fn confirm(&mut self) -> Result<(), FlowError> {
        if self.step != Step::EnteringDetails {
            return Err(FlowError::WrongStep(self.step));
        }
        self.step = Step::Confirmed;
        Ok(())
    }

    /// The tagged view of the current step.
    pub fn view(&self) -> StepView {
        match self.step {
            Step::ChoosingOffering => StepView::ChoosingOffering,
            Step::ChoosingDate => StepView::ChoosingDate {
                offering: self.selection.offering.expect("recorded at previous step"),
            },
            Step::ChoosingTime => StepView::ChoosingTime {
                offering: self.selection.offering.expect("recorded at previous step"),
                date: self.selection.date.expect("recorded at previous step"),
            },
            Step::EnteringDetails => StepView::EnteringDetails {
                offering: self.selection.offering.expect("recorded at previous step"),
                date: self.selection.date.expect("recorded at previous step"),
                time: self.selection.time.clone().expect("recorded at previous step"),
                details: self.selection.details.clone(),
            },
            Step::Confirmed => StepView::Confirmed {
                offering: self.selection.offering.expect("recorded at previous step"),
                date: self.selection.date.expect("recorded at previous step"),
                time: self.selection.time.clone().expect("recorded at previous step"),
                details: self
                    .selection
                    .details
                    .clone()
                    .expect("required before payment"),
            },
        }
    }
}
