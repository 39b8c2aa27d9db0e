//! Core domain logic for Ayoora, a personal activity log.
//! This crate is the single source of truth for business invariants:
//! slot-unique activity persistence, the rolling weekly summary, reminder
//! scheduling and reminder settings persistence.

pub mod db;
pub mod logging;
pub mod model;
pub mod notify;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::activity::{Activity, ActivityDraft, ActivityId, ActivityValidationError};
pub use model::reminder::{
    DailyReminder, ReminderSettings, ReminderValidationError, WeeklyReminder,
};
pub use notify::{
    NotificationGateway, NotificationRequest, PermissionStatus, ReminderTrigger, SchedulingError,
};
pub use repo::activity_repo::{ActivityRepository, RepoError, RepoResult, SqliteActivityRepository};
pub use repo::settings_repo::{
    SettingsError, SettingsRepository, SettingsResult, SqliteSettingsRepository,
    REMINDER_SETTINGS_KEY,
};
pub use service::activity_service::{ActivityService, DaySummary};
pub use service::reminder_service::{
    apply_reminder_settings, ApplyError, ReminderScheduler, DAILY_REMINDER_ID, WEEKLY_REMINDER_ID,
};
pub use service::settings_service::SettingsService;
pub use service::storage::Storage;

/// Minimal health-check API for early shell integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
