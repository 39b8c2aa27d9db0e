//! Activity log use-case service.
//!
//! # Responsibility
//! - Expose batch insert, per-date lookup, first-date lookup and the rolling
//!   7-day summary to UI-facing callers.
//! - Map calendar window arithmetic onto the repository's string-keyed
//!   queries.
//!
//! # Invariants
//! - The summary always returns exactly 7 entries, oldest day first, with
//!   zero-count days present.

use crate::model::activity::{Activity, ActivityDraft, DATE_FORMAT};
use crate::repo::activity_repo::{ActivityRepository, RepoResult, SqliteActivityRepository};
use crate::service::storage::Storage;
use chrono::{Days, NaiveDate};

/// Activity count for one calendar day of the rolling window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaySummary {
    /// Calendar date, `YYYY-MM-DD`.
    pub date: String,
    /// Short weekday label for chart axes, e.g. `Fri`.
    pub label: String,
    /// Number of activities recorded on that day.
    pub count: u32,
}

/// Use-case service for the activity log.
#[derive(Clone)]
pub struct ActivityService {
    storage: Storage,
}

impl ActivityService {
    pub(crate) fn new(storage: Storage) -> Self {
        Self { storage }
    }

    /// Persists the drafts as one all-or-nothing batch.
    ///
    /// # Contract
    /// - On the first occupied `(date, time)` slot the whole batch fails with
    ///   [`crate::repo::activity_repo::RepoError::Conflict`] naming that slot
    ///   and no row is committed.
    /// - Two drafts in the same batch sharing a slot are rejected the same
    ///   way.
    pub fn log_batch(&self, drafts: &[ActivityDraft]) -> RepoResult<Vec<Activity>> {
        self.storage.with_conn(|conn| {
            let repo = SqliteActivityRepository::try_new(conn)?;
            repo.insert_batch(drafts)
        })
    }

    /// All activities on `date`, ordered ascending by time.
    pub fn activities_on(&self, date: &str) -> RepoResult<Vec<Activity>> {
        self.storage.with_conn(|conn| {
            let repo = SqliteActivityRepository::try_new(conn)?;
            repo.activities_on(date)
        })
    }

    /// Earliest recorded date, used to bound backward calendar navigation.
    pub fn first_recorded_date(&self) -> RepoResult<Option<String>> {
        self.storage.with_conn(|conn| {
            let repo = SqliteActivityRepository::try_new(conn)?;
            repo.first_recorded_date()
        })
    }

    /// Activity counts for the 7 calendar days ending at `reference`,
    /// oldest day first.
    ///
    /// The caller anchors the window to "now" (the FFI layer passes the local
    /// date); taking the reference as a parameter keeps the window
    /// deterministic under test.
    pub fn weekly_summary(&self, reference: NaiveDate) -> RepoResult<Vec<DaySummary>> {
        let start = reference - Days::new(6);
        let counts = self.storage.with_conn(|conn| {
            let repo = SqliteActivityRepository::try_new(conn)?;
            repo.counts_between(
                &start.format(DATE_FORMAT).to_string(),
                &reference.format(DATE_FORMAT).to_string(),
            )
        })?;

        let summary = (0..7)
            .map(|offset| {
                let day = start + Days::new(offset);
                let date = day.format(DATE_FORMAT).to_string();
                let count = counts.get(&date).copied().unwrap_or(0);
                DaySummary {
                    label: day.format("%a").to_string(),
                    date,
                    count,
                }
            })
            .collect();

        Ok(summary)
    }
}
