//! Reminder settings use-case service.
//!
//! # Responsibility
//! - Persist and restore the last-applied reminder configuration blob.
//!
//! # Invariants
//! - The record only restores UI state on launch; armed reminders live in
//!   the notification facility and may lawfully disagree after an abnormal
//!   termination (the user re-saves to reconcile).

use crate::model::reminder::ReminderSettings;
use crate::repo::settings_repo::{SettingsRepository, SettingsResult, SqliteSettingsRepository};
use crate::service::storage::Storage;

/// Use-case service for the reminder settings record.
#[derive(Clone)]
pub struct SettingsService {
    storage: Storage,
}

impl SettingsService {
    pub(crate) fn new(storage: Storage) -> Self {
        Self { storage }
    }

    /// Validates and persists the configuration blob.
    pub fn save(&self, settings: &ReminderSettings) -> SettingsResult<()> {
        self.storage.with_conn(|conn| {
            let repo = SqliteSettingsRepository::try_new(conn)?;
            repo.save_reminder_settings(settings)
        })
    }

    /// Loads the last-saved configuration, or `None` when never saved.
    pub fn load(&self) -> SettingsResult<Option<ReminderSettings>> {
        self.storage.with_conn(|conn| {
            let repo = SqliteSettingsRepository::try_new(conn)?;
            repo.load_reminder_settings()
        })
    }
}
