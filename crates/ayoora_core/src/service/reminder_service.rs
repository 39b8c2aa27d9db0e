//! Reminder scheduling use-case service.
//!
//! # Responsibility
//! - Drive the injected notification gateway through the idempotent
//!   arm/disarm state machine for the two reminder kinds.
//! - Run the save flow: daily, then weekly, then persist settings.
//!
//! # Invariants
//! - At most one live trigger per reminder kind; re-arm is cancel-then-arm
//!   under the same fixed identifier with no window where both triggers are
//!   live (the scheduler is driven through `&mut self`).
//! - Nothing is armed while permission is not `granted`.

use crate::model::reminder::{ReminderSettings, ReminderValidationError};
use crate::notify::{
    NotificationGateway, NotificationRequest, PermissionStatus, ReminderTrigger, SchedulingError,
};
use crate::repo::settings_repo::SettingsError;
use crate::service::settings_service::SettingsService;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Fixed identifier for the recurring daily logging prompt.
pub const DAILY_REMINDER_ID: &str = "daily-activity-reminder";
/// Fixed identifier for the recurring weekly summary announcement.
pub const WEEKLY_REMINDER_ID: &str = "weekly-summary-reminder";

const DAILY_TITLE: &str = "Time to log your day";
const DAILY_BODY: &str = "Take a minute to record what you have done today.";
const WEEKLY_TITLE: &str = "Your weekly summary is ready";
const WEEKLY_BODY: &str = "See what you accomplished over the last seven days.";

/// Scheduler for the two fixed local reminders.
pub struct ReminderScheduler<G: NotificationGateway> {
    gateway: G,
}

impl<G: NotificationGateway> ReminderScheduler<G> {
    /// Creates a scheduler over the injected notification facility.
    pub fn new(gateway: G) -> Self {
        Self { gateway }
    }

    /// Current permission state without prompting.
    pub fn permission_status(&self) -> PermissionStatus {
        self.gateway.permission_status()
    }

    /// Prompts the user when undetermined and returns the resulting state.
    pub fn request_permission(&mut self) -> PermissionStatus {
        self.gateway.request_permission()
    }

    /// Idempotently (re-)arms the daily reminder at `hour:minute`.
    pub fn arm_daily(&mut self, hour: u32, minute: u32) -> Result<(), SchedulingError> {
        validate_clock(hour, minute)?;
        self.ensure_permission()?;
        self.gateway.cancel(DAILY_REMINDER_ID)?;
        self.gateway.schedule_recurring(NotificationRequest {
            identifier: DAILY_REMINDER_ID,
            title: DAILY_TITLE,
            body: DAILY_BODY,
            trigger: ReminderTrigger::Daily { hour, minute },
        })?;
        info!("event=reminder_arm module=service status=ok kind=daily hour={hour} minute={minute}");
        Ok(())
    }

    /// Removes the daily reminder; succeeds when none is armed.
    pub fn disarm_daily(&mut self) -> Result<(), SchedulingError> {
        self.gateway.cancel(DAILY_REMINDER_ID)?;
        info!("event=reminder_disarm module=service status=ok kind=daily");
        Ok(())
    }

    /// Idempotently (re-)arms the weekly reminder on `weekday`
    /// (1 = Sunday .. 7 = Saturday) at `hour:minute`.
    pub fn arm_weekly(
        &mut self,
        weekday: u8,
        hour: u32,
        minute: u32,
    ) -> Result<(), SchedulingError> {
        if !(1..=7).contains(&weekday) {
            return Err(SchedulingError::InvalidWeekday(weekday));
        }
        validate_clock(hour, minute)?;
        self.ensure_permission()?;
        self.gateway.cancel(WEEKLY_REMINDER_ID)?;
        self.gateway.schedule_recurring(NotificationRequest {
            identifier: WEEKLY_REMINDER_ID,
            title: WEEKLY_TITLE,
            body: WEEKLY_BODY,
            trigger: ReminderTrigger::Weekly {
                weekday,
                hour,
                minute,
            },
        })?;
        info!(
            "event=reminder_arm module=service status=ok kind=weekly weekday={weekday} hour={hour} minute={minute}"
        );
        Ok(())
    }

    /// Removes the weekly reminder; succeeds when none is armed.
    pub fn disarm_weekly(&mut self) -> Result<(), SchedulingError> {
        self.gateway.cancel(WEEKLY_REMINDER_ID)?;
        info!("event=reminder_disarm module=service status=ok kind=weekly");
        Ok(())
    }

    /// Releases the underlying gateway, mainly so tests can inspect the
    /// triggers it holds.
    pub fn into_gateway(self) -> G {
        self.gateway
    }

    fn ensure_permission(&self) -> Result<(), SchedulingError> {
        match self.gateway.permission_status() {
            PermissionStatus::Granted => Ok(()),
            status => Err(SchedulingError::PermissionMissing(status)),
        }
    }
}

fn validate_clock(hour: u32, minute: u32) -> Result<(), SchedulingError> {
    if hour > 23 || minute > 59 {
        return Err(SchedulingError::InvalidTime { hour, minute });
    }
    Ok(())
}

/// The reminder save flow: daily arm-or-disarm, then weekly, then persist the
/// settings blob.
///
/// # Contract
/// - Steps run in order with no rollback. When the weekly step fails, the
///   daily reminder keeps whatever state the first step reached and the blob
///   is not written; the caller retries the whole save.
pub fn apply_reminder_settings<G: NotificationGateway>(
    scheduler: &mut ReminderScheduler<G>,
    settings_service: &SettingsService,
    settings: &ReminderSettings,
) -> Result<(), ApplyError> {
    settings.validate()?;

    if settings.daily.enabled {
        let (hour, minute) = settings.daily.local_hour_minute()?;
        scheduler.arm_daily(hour, minute)?;
    } else {
        scheduler.disarm_daily()?;
    }

    if settings.weekly.enabled {
        let (hour, minute) = settings.weekly.local_hour_minute()?;
        scheduler.arm_weekly(settings.weekly.day, hour, minute)?;
    } else {
        scheduler.disarm_weekly()?;
    }

    if let Err(err) = settings_service.save(settings) {
        warn!("event=reminder_apply module=service status=error step=persist error={err}");
        return Err(err.into());
    }

    info!("event=reminder_apply module=service status=ok");
    Ok(())
}

/// Failures of the sequential reminder save flow.
#[derive(Debug)]
pub enum ApplyError {
    /// Settings failed validation; nothing was armed or disarmed.
    Validation(ReminderValidationError),
    /// An arm/disarm step failed; earlier steps are not rolled back.
    Scheduling(SchedulingError),
    /// Persisting the blob failed after both scheduling steps succeeded.
    Settings(SettingsError),
}

impl Display for ApplyError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Scheduling(err) => write!(f, "{err}"),
            Self::Settings(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ApplyError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Scheduling(err) => Some(err),
            Self::Settings(err) => Some(err),
        }
    }
}

impl From<ReminderValidationError> for ApplyError {
    fn from(value: ReminderValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<SchedulingError> for ApplyError {
    fn from(value: SchedulingError) -> Self {
        Self::Scheduling(value)
    }
}

impl From<SettingsError> for ApplyError {
    fn from(value: SettingsError) -> Self {
        Self::Settings(value)
    }
}
