//! Activity repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist activity batches with all-or-nothing conflict checking.
//! - Serve the per-date, first-date and date-range count queries.
//!
//! # Invariants
//! - A batch commits only when every draft passes the `(date, time)` slot
//!   check; the check re-reads state inside the open transaction, so drafts
//!   earlier in the same batch count as occupants too.
//! - Per-date listings are ordered ascending by `time`.

use crate::db::DbError;
use crate::model::activity::{
    validate_date_text, Activity, ActivityDraft, ActivityValidationError,
};
use crate::repo::{check_schema, SchemaIssue};
use log::{info, warn};
use rusqlite::{params, Connection, Row};
use std::collections::HashMap;

const ACTIVITY_SELECT_SQL: &str = "SELECT id, category, time, description, date FROM activities";

const ACTIVITY_COLUMNS: &[&str] = &["id", "category", "time", "description", "date"];

pub type RepoResult<T> = Result<T, RepoError>;

/// Persistence and query errors for the activity store.
#[derive(Debug)]
pub enum RepoError {
    /// Draft failed domain validation before any SQL ran.
    Validation(ActivityValidationError),
    /// Storage transport failure.
    Db(DbError),
    /// A draft targets an occupied `(date, time)` slot. The whole batch was
    /// rolled back.
    Conflict { date: String, time: String },
    /// A persisted row violates the storage contract.
    InvalidData(String),
    /// Connection was not migrated by [`crate::db`].
    UninitializedConnection { expected_version: u32, actual_version: u32 },
    /// Migrated version is current but a required table is absent.
    MissingRequiredTable(&'static str),
    /// Migrated version is current but a required column is absent.
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl std::fmt::Display for RepoError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::Conflict { date, time } => {
                write!(f, "schedule conflict: an activity already exists on {date} at {time}")
            }
            Self::InvalidData(message) => {
                write!(f, "invalid persisted activity data: {message}")
            }
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
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column `{table}.{column}` is missing")
            }
        }
    }
}

impl std::error::Error for RepoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ActivityValidationError> for RepoError {
    fn from(value: ActivityValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<SchemaIssue> for RepoError {
    fn from(value: SchemaIssue) -> Self {
        match value {
            SchemaIssue::StaleVersion { expected, actual } => Self::UninitializedConnection {
                expected_version: expected,
                actual_version: actual,
            },
            SchemaIssue::MissingTable(table) => Self::MissingRequiredTable(table),
            SchemaIssue::MissingColumn { table, column } => {
                Self::MissingRequiredColumn { table, column }
            }
        }
    }
}

/// Repository contract for activity persistence and queries.
pub trait ActivityRepository {
    /// Persists the drafts as one all-or-nothing batch and returns the
    /// committed rows with their assigned ids, in input order.
    fn insert_batch(&self, drafts: &[ActivityDraft]) -> RepoResult<Vec<Activity>>;

    /// Lists all activities on `date`, ordered ascending by `time`.
    fn activities_on(&self, date: &str) -> RepoResult<Vec<Activity>>;

    /// Earliest `date` ever recorded, or `None` for an empty store.
    fn first_recorded_date(&self) -> RepoResult<Option<String>>;

    /// Activity counts per date for `start..=end` (dates with no rows are
    /// simply absent from the map).
    fn counts_between(&self, start: &str, end: &str) -> RepoResult<HashMap<String, u32>>;
}

/// SQLite-backed activity repository.
pub struct SqliteActivityRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteActivityRepository<'conn> {
    /// Wraps a migrated connection, rejecting one whose schema is stale or
    /// incomplete.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        if let Some(issue) = check_schema(conn, "activities", ACTIVITY_COLUMNS)? {
            return Err(issue.into());
        }
        Ok(Self { conn })
    }

    fn slot_occupied(&self, conn: &Connection, date: &str, time: &str) -> RepoResult<bool> {
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM activities WHERE date = ?1 AND time = ?2;",
            params![date, time],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }
}

impl ActivityRepository for SqliteActivityRepository<'_> {
    fn insert_batch(&self, drafts: &[ActivityDraft]) -> RepoResult<Vec<Activity>> {
        for draft in drafts {
            draft.validate()?;
        }

        let tx = self.conn.unchecked_transaction()?;
        let mut committed = Vec::with_capacity(drafts.len());

        for draft in drafts {
            // The re-read runs inside the transaction, so a duplicate slot
            // earlier in this very batch is caught as well.
            if self.slot_occupied(&tx, &draft.date, &draft.time)? {
                warn!(
                    "event=activity_insert module=repo status=conflict date={} time={}",
                    draft.date, draft.time
                );
                return Err(RepoError::Conflict {
                    date: draft.date.clone(),
                    time: draft.time.clone(),
                });
            }

            tx.execute(
                "INSERT INTO activities (category, time, description, date)
                 VALUES (?1, ?2, ?3, ?4);",
                params![
                    draft.category,
                    draft.time,
                    draft.description.as_deref(),
                    draft.date
                ],
            )?;
            committed.push(draft.clone().into_activity(tx.last_insert_rowid()));
        }

        tx.commit()?;
        info!(
            "event=activity_insert module=repo status=ok rows={}",
            committed.len()
        );
        Ok(committed)
    }

    fn activities_on(&self, date: &str) -> RepoResult<Vec<Activity>> {
        validate_date_text(date)?;

        let mut stmt = self
            .conn
            .prepare(&format!("{ACTIVITY_SELECT_SQL} WHERE date = ?1 ORDER BY time ASC;"))?;
        let mut rows = stmt.query([date])?;
        let mut activities = Vec::new();

        while let Some(row) = rows.next()? {
            activities.push(parse_activity_row(row)?);
        }

        Ok(activities)
    }

    fn first_recorded_date(&self) -> RepoResult<Option<String>> {
        let date: Option<String> =
            self.conn
                .query_row("SELECT MIN(date) FROM activities;", [], |row| row.get(0))?;
        Ok(date)
    }

    fn counts_between(&self, start: &str, end: &str) -> RepoResult<HashMap<String, u32>> {
        validate_date_text(start)?;
        validate_date_text(end)?;

        let mut stmt = self.conn.prepare(
            "SELECT date, COUNT(*)
             FROM activities
             WHERE date BETWEEN ?1 AND ?2
             GROUP BY date;",
        )?;
        let mut rows = stmt.query(params![start, end])?;
        let mut counts = HashMap::new();

        while let Some(row) = rows.next()? {
            counts.insert(row.get::<_, String>(0)?, row.get::<_, u32>(1)?);
        }

        Ok(counts)
    }
}

fn parse_activity_row(row: &Row<'_>) -> RepoResult<Activity> {
    let activity = Activity {
        id: row.get("id")?,
        category: row.get("category")?,
        time: row.get("time")?,
        description: row.get("description")?,
        date: row.get("date")?,
    };

    if activity.category.trim().is_empty() {
        return Err(RepoError::InvalidData(format!(
            "empty category in activities row {}",
            activity.id
        )));
    }
    crate::model::activity::validate_time_text(&activity.time).map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid time `{}` in activities row {}",
            activity.time, activity.id
        ))
    })?;
    validate_date_text(&activity.date).map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid date `{}` in activities row {}",
            activity.date, activity.id
        ))
    })?;

    Ok(activity)
}
