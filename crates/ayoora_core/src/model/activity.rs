//! Activity domain model.
//!
//! # Responsibility
//! - Define the logged-activity record and its pre-persistence draft shape.
//! - Validate the `HH:MM` / `YYYY-MM-DD` wire formats before they reach SQL.
//!
//! # Invariants
//! - `id` is assigned by the store only and never reused.
//! - `time` and `date` are canonical zero-padded strings; non-canonical input
//!   (for example `9:00`) is rejected instead of silently reformatted.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Storage format for activity clock times.
pub const TIME_FORMAT: &str = "%H:%M";
/// Storage format for activity calendar dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Row identifier assigned by the store on insertion.
///
/// Monotonically increasing in insertion order, which the UI relies on as a
/// stable list key.
pub type ActivityId = i64;

/// One logged activity as persisted in the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    /// Store-assigned identifier.
    pub id: ActivityId,
    /// User-chosen category label. The UI offers a fixed set, the store only
    /// requires it to be non-empty.
    pub category: String,
    /// Wall-clock time of day, `HH:MM`, 24-hour.
    pub time: String,
    /// Optional free text. Absent and empty are both allowed.
    pub description: Option<String>,
    /// Local calendar date, `YYYY-MM-DD`. No timezone normalization.
    pub date: String,
}

/// An activity the UI wants to persist; identical to [`Activity`] minus the
/// store-assigned `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityDraft {
    pub category: String,
    pub time: String,
    pub description: Option<String>,
    pub date: String,
}

impl ActivityDraft {
    /// Creates a draft for the given slot.
    pub fn new(
        category: impl Into<String>,
        date: impl Into<String>,
        time: impl Into<String>,
        description: Option<String>,
    ) -> Self {
        Self {
            category: category.into(),
            time: time.into(),
            description,
            date: date.into(),
        }
    }

    /// Checks the draft against the storage contract.
    ///
    /// # Errors
    /// - [`ActivityValidationError::EmptyCategory`] when `category` is blank.
    /// - [`ActivityValidationError::InvalidTime`] when `time` is not canonical
    ///   zero-padded `HH:MM`.
    /// - [`ActivityValidationError::InvalidDate`] when `date` is not canonical
    ///   `YYYY-MM-DD`.
    pub fn validate(&self) -> Result<(), ActivityValidationError> {
        if self.category.trim().is_empty() {
            return Err(ActivityValidationError::EmptyCategory);
        }
        validate_time_text(&self.time)?;
        validate_date_text(&self.date)?;
        Ok(())
    }

    /// Promotes the draft to a persisted activity with a store-assigned id.
    pub(crate) fn into_activity(self, id: ActivityId) -> Activity {
        Activity {
            id,
            category: self.category,
            time: self.time,
            description: self.description,
            date: self.date,
        }
    }
}

/// Validates canonical `HH:MM` text.
///
/// Round-trips through [`NaiveTime`] so `24:00`, `9:00` and `09:5` all fail
/// while `09:05` passes.
pub fn validate_time_text(value: &str) -> Result<(), ActivityValidationError> {
    let parsed = NaiveTime::parse_from_str(value, TIME_FORMAT)
        .map_err(|_| ActivityValidationError::InvalidTime(value.to_string()))?;
    if parsed.format(TIME_FORMAT).to_string() != value {
        return Err(ActivityValidationError::InvalidTime(value.to_string()));
    }
    Ok(())
}

/// Validates canonical `YYYY-MM-DD` text.
pub fn validate_date_text(value: &str) -> Result<(), ActivityValidationError> {
    let parsed = NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|_| ActivityValidationError::InvalidDate(value.to_string()))?;
    if parsed.format(DATE_FORMAT).to_string() != value {
        return Err(ActivityValidationError::InvalidDate(value.to_string()));
    }
    Ok(())
}

/// Validation failures for activity drafts and persisted rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivityValidationError {
    /// Category is empty or whitespace-only.
    EmptyCategory,
    /// Time text is not canonical `HH:MM`.
    InvalidTime(String),
    /// Date text is not canonical `YYYY-MM-DD`.
    InvalidDate(String),
}

impl Display for ActivityValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyCategory => write!(f, "activity category must not be empty"),
            Self::InvalidTime(value) => {
                write!(f, "invalid activity time `{value}`; expected HH:MM")
            }
            Self::InvalidDate(value) => {
                write!(f, "invalid activity date `{value}`; expected YYYY-MM-DD")
            }
        }
    }
}

impl Error for ActivityValidationError {}
