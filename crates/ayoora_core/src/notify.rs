//! Notification facility contract.
//!
//! # Responsibility
//! - Define the capability interface the reminder scheduler drives.
//! - Keep the core testable against a fake facility; the real one lives in
//!   the platform shell and is injected at construction time.
//!
//! # Invariants
//! - Triggers recur indefinitely until canceled.
//! - `cancel` of an identifier with no live trigger is a successful no-op.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Notification permission state as reported by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    Granted,
    Denied,
    Undetermined,
}

impl PermissionStatus {
    /// Stable string id used across the FFI boundary.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Granted => "granted",
            Self::Denied => "denied",
            Self::Undetermined => "undetermined",
        }
    }
}

/// Recurring schedule for a reminder notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReminderTrigger {
    /// Fires every day at the given local wall-clock time.
    Daily { hour: u32, minute: u32 },
    /// Fires every week on `weekday` (1 = Sunday .. 7 = Saturday) at the
    /// given local wall-clock time.
    Weekly { weekday: u8, hour: u32, minute: u32 },
}

/// One scheduling request handed to the facility.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationRequest {
    /// Fixed identifier; scheduling under a live identifier replaces nothing
    /// by itself, which is why the scheduler cancels first.
    pub identifier: &'static str,
    pub title: &'static str,
    pub body: &'static str,
    pub trigger: ReminderTrigger,
}

/// Scheduling failures surfaced to the settings flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchedulingError {
    /// Permission is not `granted`; nothing was armed.
    PermissionMissing(PermissionStatus),
    /// Trigger time fields are out of range.
    InvalidTime { hour: u32, minute: u32 },
    /// Weekly weekday index falls outside 1..=7.
    InvalidWeekday(u8),
    /// The facility rejected the request (for example permission was revoked
    /// between check and use).
    Facility { identifier: String, message: String },
}

impl Display for SchedulingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PermissionMissing(status) => {
                write!(f, "notification permission is {}, not granted", status.as_str())
            }
            Self::InvalidTime { hour, minute } => {
                write!(f, "invalid reminder time {hour:02}:{minute:02}")
            }
            Self::InvalidWeekday(day) => {
                write!(f, "invalid reminder weekday {day}; expected 1 (Sunday) to 7 (Saturday)")
            }
            Self::Facility {
                identifier,
                message,
            } => write!(f, "notification facility rejected `{identifier}`: {message}"),
        }
    }
}

impl Error for SchedulingError {}

/// Injected capability over the platform's local notification system.
///
/// Implementations own schedule persistence: a trigger armed here survives
/// process restarts until canceled, which is why the settings record is never
/// used to re-arm anything on launch.
pub trait NotificationGateway {
    /// Current permission state without prompting the user.
    fn permission_status(&self) -> PermissionStatus;

    /// Prompts the user when undetermined and returns the resulting state.
    fn request_permission(&mut self) -> PermissionStatus;

    /// Arms a recurring trigger under `request.identifier`.
    fn schedule_recurring(&mut self, request: NotificationRequest) -> Result<(), SchedulingError>;

    /// Removes the trigger under `identifier`; succeeds when absent.
    fn cancel(&mut self, identifier: &str) -> Result<(), SchedulingError>;
}
