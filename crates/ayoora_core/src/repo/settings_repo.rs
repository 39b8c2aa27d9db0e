//! Reminder settings repository: one JSON blob under a fixed key.
//!
//! # Responsibility
//! - Persist and restore the last-applied reminder configuration.
//! - Keep serialization details out of callers.
//!
//! # Invariants
//! - The blob is validated both before save and after load; a corrupt blob
//!   surfaces as an error instead of a silently defaulted configuration.
//! - This record is not consulted to re-arm reminders; the notification
//!   facility persists its own schedules.

use crate::db::DbError;
use crate::model::reminder::{ReminderSettings, ReminderValidationError};
use crate::repo::{check_schema, SchemaIssue};
use log::info;
use rusqlite::{params, Connection, OptionalExtension};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Fixed key the reminder configuration blob is stored under.
pub const REMINDER_SETTINGS_KEY: &str = "notification_settings";

const SETTINGS_COLUMNS: &[&str] = &["key", "value"];

pub type SettingsResult<T> = Result<T, SettingsError>;

/// Persistence errors for the settings record.
#[derive(Debug)]
pub enum SettingsError {
    /// Settings failed domain validation.
    Validation(ReminderValidationError),
    /// Storage transport failure.
    Db(DbError),
    /// The stored blob could not be encoded or decoded.
    Serialization(serde_json::Error),
    /// Connection was not migrated by [`crate::db`].
    UninitializedConnection { expected_version: u32, actual_version: u32 },
    /// Migrated version is current but the settings table is absent.
    MissingRequiredTable(&'static str),
}

impl Display for SettingsError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::Serialization(err) => write!(f, "settings blob is not valid JSON: {err}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "required table `{table}` is missing")
            }
        }
    }
}

impl Error for SettingsError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::Serialization(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ReminderValidationError> for SettingsError {
    fn from(value: ReminderValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for SettingsError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for SettingsError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<serde_json::Error> for SettingsError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization(value)
    }
}

impl From<SchemaIssue> for SettingsError {
    fn from(value: SchemaIssue) -> Self {
        match value {
            SchemaIssue::StaleVersion { expected, actual } => Self::UninitializedConnection {
                expected_version: expected,
                actual_version: actual,
            },
            // The settings guard lists no columns beyond key/value, so a
            // column issue collapses into the table case.
            SchemaIssue::MissingTable(table)
            | SchemaIssue::MissingColumn { table, .. } => Self::MissingRequiredTable(table),
        }
    }
}

/// Repository contract for the reminder settings record.
pub trait SettingsRepository {
    /// Validates and upserts the configuration blob.
    fn save_reminder_settings(&self, settings: &ReminderSettings) -> SettingsResult<()>;

    /// Loads the configuration blob, or `None` when never saved.
    fn load_reminder_settings(&self) -> SettingsResult<Option<ReminderSettings>>;
}

/// SQLite-backed settings repository.
#[derive(Debug)]
pub struct SqliteSettingsRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteSettingsRepository<'conn> {
    /// Wraps a migrated connection, rejecting one whose schema is stale or
    /// incomplete.
    pub fn try_new(conn: &'conn Connection) -> SettingsResult<Self> {
        if let Some(issue) = check_schema(conn, "settings", SETTINGS_COLUMNS)? {
            return Err(issue.into());
        }
        Ok(Self { conn })
    }
}

impl SettingsRepository for SqliteSettingsRepository<'_> {
    fn save_reminder_settings(&self, settings: &ReminderSettings) -> SettingsResult<()> {
        settings.validate()?;
        let blob = serde_json::to_string(settings)?;

        self.conn.execute(
            "INSERT INTO settings (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value;",
            params![REMINDER_SETTINGS_KEY, blob],
        )?;

        info!(
            "event=settings_save module=repo status=ok daily_enabled={} weekly_enabled={}",
            settings.daily.enabled, settings.weekly.enabled
        );
        Ok(())
    }

    fn load_reminder_settings(&self) -> SettingsResult<Option<ReminderSettings>> {
        let blob: Option<String> = self
            .conn
            .query_row(
                "SELECT value FROM settings WHERE key = ?1;",
                [REMINDER_SETTINGS_KEY],
                |row| row.get(0),
            )
            .optional()?;

        let Some(blob) = blob else {
            return Ok(None);
        };

        let settings: ReminderSettings = serde_json::from_str(&blob)?;
        settings.validate()?;
        Ok(Some(settings))
    }
}
