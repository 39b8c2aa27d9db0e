//! Reminder configuration model.
//!
//! # Responsibility
//! - Define the persisted reminder settings blob shared with the UI.
//! - Extract local arm times from the stored RFC3339 instants.
//!
//! # Invariants
//! - At most one logical configuration per reminder kind (daily, weekly).
//! - `day` uses the locale-first-day convention: 1 = Sunday .. 7 = Saturday.
//! - Stored `time` values are full RFC3339 instants; only their local
//!   hour/minute matter for scheduling.

use chrono::{DateTime, Local, Timelike};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Smallest weekday index accepted for weekly reminders (Sunday).
pub const WEEKDAY_MIN: u8 = 1;
/// Largest weekday index accepted for weekly reminders (Saturday).
pub const WEEKDAY_MAX: u8 = 7;

/// Daily reminder toggle and picked time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyReminder {
    pub enabled: bool,
    /// RFC3339 instant captured from the UI time picker.
    pub time: String,
}

/// Weekly reminder toggle, picked time and weekday.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyReminder {
    pub enabled: bool,
    /// RFC3339 instant captured from the UI time picker.
    pub time: String,
    /// 1 = Sunday .. 7 = Saturday.
    pub day: u8,
}

/// The last-applied reminder configuration, persisted as one JSON blob.
///
/// This record restores the settings screen on next launch. It is not the
/// source of truth for what is actually armed; the notification facility owns
/// that state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderSettings {
    pub daily: DailyReminder,
    pub weekly: WeeklyReminder,
}

impl ReminderSettings {
    /// Checks both reminder entries against the persistence contract.
    pub fn validate(&self) -> Result<(), ReminderValidationError> {
        parse_instant(&self.daily.time)?;
        parse_instant(&self.weekly.time)?;
        if !(WEEKDAY_MIN..=WEEKDAY_MAX).contains(&self.weekly.day) {
            return Err(ReminderValidationError::InvalidDay(self.weekly.day));
        }
        Ok(())
    }
}

impl DailyReminder {
    /// Local wall-clock hour/minute to arm the daily trigger with.
    pub fn local_hour_minute(&self) -> Result<(u32, u32), ReminderValidationError> {
        local_hour_minute(&self.time)
    }
}

impl WeeklyReminder {
    /// Local wall-clock hour/minute to arm the weekly trigger with.
    pub fn local_hour_minute(&self) -> Result<(u32, u32), ReminderValidationError> {
        local_hour_minute(&self.time)
    }
}

fn parse_instant(value: &str) -> Result<DateTime<chrono::FixedOffset>, ReminderValidationError> {
    DateTime::parse_from_rfc3339(value)
        .map_err(|_| ReminderValidationError::InvalidTime(value.to_string()))
}

fn local_hour_minute(value: &str) -> Result<(u32, u32), ReminderValidationError> {
    let local = parse_instant(value)?.with_timezone(&Local);
    Ok((local.hour(), local.minute()))
}

/// Validation failures for reminder settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReminderValidationError {
    /// Time text is not a parseable RFC3339 instant.
    InvalidTime(String),
    /// Weekly day index falls outside 1..=7.
    InvalidDay(u8),
}

impl Display for ReminderValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidTime(value) => {
                write!(f, "invalid reminder time `{value}`; expected RFC3339")
            }
            Self::InvalidDay(day) => {
                write!(f, "invalid reminder weekday {day}; expected 1 (Sunday) to 7 (Saturday)")
            }
        }
    }
}

impl Error for ReminderValidationError {}

#[cfg(test)]
mod tests {
    use super::{DailyReminder, ReminderSettings, ReminderValidationError, WeeklyReminder};

    fn settings(day: u8) -> ReminderSettings {
        ReminderSettings {
            daily: DailyReminder {
                enabled: true,
                time: "2024-05-10T07:00:00+00:00".to_string(),
            },
            weekly: WeeklyReminder {
                enabled: false,
                time: "2024-05-10T18:30:00+00:00".to_string(),
                day,
            },
        }
    }

    #[test]
    fn valid_settings_pass() {
        settings(1).validate().expect("day 1 is Sunday");
        settings(7).validate().expect("day 7 is Saturday");
    }

    #[test]
    fn out_of_range_day_is_rejected() {
        assert_eq!(
            settings(0).validate().unwrap_err(),
            ReminderValidationError::InvalidDay(0)
        );
        assert_eq!(
            settings(8).validate().unwrap_err(),
            ReminderValidationError::InvalidDay(8)
        );
    }

    #[test]
    fn unparseable_time_is_rejected() {
        let mut broken = settings(1);
        broken.daily.time = "07:00".to_string();
        assert_eq!(
            broken.validate().unwrap_err(),
            ReminderValidationError::InvalidTime("07:00".to_string())
        );
    }

    #[test]
    fn settings_blob_uses_expected_wire_fields() {
        let value = serde_json::to_value(settings(3)).unwrap();
        assert_eq!(value["daily"]["enabled"], true);
        assert_eq!(value["daily"]["time"], "2024-05-10T07:00:00+00:00");
        assert_eq!(value["weekly"]["day"], 3);
        assert!(value["daily"].get("day").is_none());
    }
}
