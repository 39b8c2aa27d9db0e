//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose stable, use-case-level functions to Dart via FRB.
//! - Keep error semantics simple for UI integration: every fallible call
//!   returns an envelope with a human-readable message.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - The store is opened once per process by `init_store` and shared
//!   afterwards.

use ayoora_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    Activity, ActivityDraft, DailyReminder, DaySummary, ReminderSettings, Storage, WeeklyReminder,
};
use chrono::Local;
use log::info;
use std::path::PathBuf;
use std::sync::OnceLock;

static STORE: OnceLock<StoreHandle> = OnceLock::new();

struct StoreHandle {
    path: PathBuf,
    storage: Storage,
}

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Sync call; may perform small file-system setup work.
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Reconfiguration attempts with different level or directory return error.
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Opens (creating if needed) and migrates the activity database.
///
/// # FFI contract
/// - Sync call; performs file-system and migration work on first use.
/// - Safe to call repeatedly with the same `db_path` (idempotent).
/// - A second call with a different path returns an error; the first store
///   stays live.
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_store(db_path: String) -> String {
    let path = PathBuf::from(db_path.trim());
    if path.as_os_str().is_empty() {
        return "init_store failed: db_path must not be empty".to_string();
    }

    if STORE.get().is_none() {
        match Storage::open(&path) {
            Ok(storage) => {
                // A concurrent init may have won the race; the path check
                // below treats that like any repeated call.
                let _ = STORE.set(StoreHandle {
                    path: path.clone(),
                    storage,
                });
                info!("event=ffi_init_store status=ok path={}", path.display());
            }
            Err(err) => return format!("init_store failed: {err}"),
        }
    }

    match STORE.get() {
        Some(handle) if handle.path == path => String::new(),
        Some(handle) => format!(
            "init_store failed: store already open at {}",
            handle.path.display()
        ),
        None => "init_store failed: store initialization raced and lost".to_string(),
    }
}

/// One logged activity as shown in the Dart UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityItem {
    pub id: i64,
    pub category: String,
    /// `HH:MM`, 24-hour.
    pub time: String,
    pub description: Option<String>,
    /// `YYYY-MM-DD`.
    pub date: String,
}

/// Draft shape the Dart UI submits for persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityDraftInput {
    pub category: String,
    pub time: String,
    pub description: Option<String>,
    pub date: String,
}

/// Response envelope for the batch save flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityBatchResponse {
    /// Whether the whole batch was committed.
    pub ok: bool,
    /// Persisted activities with assigned ids; empty on failure.
    pub items: Vec<ActivityItem>,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

/// Response envelope for list queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityListResponse {
    pub ok: bool,
    pub items: Vec<ActivityItem>,
    pub message: String,
}

/// Response envelope for the earliest-date query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirstDateResponse {
    pub ok: bool,
    /// `YYYY-MM-DD`, or `None` for an empty store.
    pub date: Option<String>,
    pub message: String,
}

/// One chart bucket of the rolling 7-day summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryDay {
    pub date: String,
    /// Short weekday label for the chart axis, e.g. `Fri`.
    pub label: String,
    pub count: u32,
}

/// Response envelope for the weekly summary query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeeklySummaryResponse {
    pub ok: bool,
    /// Exactly 7 entries on success, oldest day first.
    pub days: Vec<SummaryDay>,
    pub message: String,
}

/// Reminder configuration blob as edited on the Dart settings screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderSettingsInput {
    pub daily_enabled: bool,
    /// RFC3339 instant from the time picker.
    pub daily_time: String,
    pub weekly_enabled: bool,
    /// RFC3339 instant from the time picker.
    pub weekly_time: String,
    /// 1 = Sunday .. 7 = Saturday.
    pub weekly_day: u8,
}

/// Generic action response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    pub ok: bool,
    pub message: String,
}

/// Response envelope for the settings restore flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderSettingsResponse {
    pub ok: bool,
    /// `None` when nothing was ever saved.
    pub settings: Option<ReminderSettingsInput>,
    pub message: String,
}

/// Persists a batch of activities as one all-or-nothing transaction.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - On any invalid draft or occupied `(date, time)` slot nothing is
///   committed and the message names the failure.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn add_activities(drafts: Vec<ActivityDraftInput>) -> ActivityBatchResponse {
    let storage = match store() {
        Ok(storage) => storage,
        Err(message) => {
            return ActivityBatchResponse {
                ok: false,
                items: Vec::new(),
                message,
            }
        }
    };

    let drafts: Vec<ActivityDraft> = drafts.into_iter().map(to_core_draft).collect();
    match storage.activities().log_batch(&drafts) {
        Ok(saved) => ActivityBatchResponse {
            ok: true,
            message: format!("Saved {} activit(y/ies).", saved.len()),
            items: saved.into_iter().map(to_activity_item).collect(),
        },
        Err(err) => ActivityBatchResponse {
            ok: false,
            items: Vec::new(),
            message: format!("add_activities failed: {err}"),
        },
    }
}

/// All activities on `date` (`YYYY-MM-DD`), ordered ascending by time.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn activities_for_date(date: String) -> ActivityListResponse {
    let storage = match store() {
        Ok(storage) => storage,
        Err(message) => {
            return ActivityListResponse {
                ok: false,
                items: Vec::new(),
                message,
            }
        }
    };

    match storage.activities().activities_on(date.trim()) {
        Ok(items) => ActivityListResponse {
            ok: true,
            message: format!("Found {} activit(y/ies).", items.len()),
            items: items.into_iter().map(to_activity_item).collect(),
        },
        Err(err) => ActivityListResponse {
            ok: false,
            items: Vec::new(),
            message: format!("activities_for_date failed: {err}"),
        },
    }
}

/// Earliest recorded date, bounding backward calendar navigation in the UI.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - `date` is `None` for an empty store.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn first_activity_date() -> FirstDateResponse {
    let storage = match store() {
        Ok(storage) => storage,
        Err(message) => {
            return FirstDateResponse {
                ok: false,
                date: None,
                message,
            }
        }
    };

    match storage.activities().first_recorded_date() {
        Ok(date) => FirstDateResponse {
            ok: true,
            date,
            message: String::new(),
        },
        Err(err) => FirstDateResponse {
            ok: false,
            date: None,
            message: format!("first_activity_date failed: {err}"),
        },
    }
}

/// Activity counts for the 7 calendar days ending today (local time),
/// oldest day first.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Always 7 buckets on success, zero-count days included.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn weekly_summary() -> WeeklySummaryResponse {
    let storage = match store() {
        Ok(storage) => storage,
        Err(message) => {
            return WeeklySummaryResponse {
                ok: false,
                days: Vec::new(),
                message,
            }
        }
    };

    match storage
        .activities()
        .weekly_summary(Local::now().date_naive())
    {
        Ok(days) => WeeklySummaryResponse {
            ok: true,
            days: days.into_iter().map(to_summary_day).collect(),
            message: String::new(),
        },
        Err(err) => WeeklySummaryResponse {
            ok: false,
            days: Vec::new(),
            message: format!("weekly_summary failed: {err}"),
        },
    }
}

/// Persists the reminder configuration blob.
///
/// The platform shell arms/disarms the actual notification triggers before
/// calling this; the stored record only restores the settings screen on the
/// next launch.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Invalid settings (unparseable time, day outside 1..=7) are rejected
///   without writing.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn save_reminder_settings(settings: ReminderSettingsInput) -> ActionResponse {
    let storage = match store() {
        Ok(storage) => storage,
        Err(message) => return ActionResponse { ok: false, message },
    };

    match storage.settings().save(&to_core_settings(&settings)) {
        Ok(()) => ActionResponse {
            ok: true,
            message: "Settings saved.".to_string(),
        },
        Err(err) => ActionResponse {
            ok: false,
            message: format!("save_reminder_settings failed: {err}"),
        },
    }
}

/// Loads the last-saved reminder configuration.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - `settings` is `None` when nothing was ever saved.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn load_reminder_settings() -> ReminderSettingsResponse {
    let storage = match store() {
        Ok(storage) => storage,
        Err(message) => {
            return ReminderSettingsResponse {
                ok: false,
                settings: None,
                message,
            }
        }
    };

    match storage.settings().load() {
        Ok(settings) => ReminderSettingsResponse {
            ok: true,
            settings: settings.as_ref().map(to_settings_output),
            message: String::new(),
        },
        Err(err) => ReminderSettingsResponse {
            ok: false,
            settings: None,
            message: format!("load_reminder_settings failed: {err}"),
        },
    }
}

fn store() -> Result<&'static Storage, String> {
    STORE
        .get()
        .map(|handle| &handle.storage)
        .ok_or_else(|| "store is not initialized; call init_store first".to_string())
}

fn to_core_draft(input: ActivityDraftInput) -> ActivityDraft {
    ActivityDraft::new(
        input.category.trim(),
        input.date.trim(),
        input.time.trim(),
        input.description,
    )
}

fn to_activity_item(activity: Activity) -> ActivityItem {
    ActivityItem {
        id: activity.id,
        category: activity.category,
        time: activity.time,
        description: activity.description,
        date: activity.date,
    }
}

fn to_summary_day(day: DaySummary) -> SummaryDay {
    SummaryDay {
        date: day.date,
        label: day.label,
        count: day.count,
    }
}

fn to_core_settings(input: &ReminderSettingsInput) -> ReminderSettings {
    ReminderSettings {
        daily: DailyReminder {
            enabled: input.daily_enabled,
            time: input.daily_time.clone(),
        },
        weekly: WeeklyReminder {
            enabled: input.weekly_enabled,
            time: input.weekly_time.clone(),
            day: input.weekly_day,
        },
    }
}

fn to_settings_output(settings: &ReminderSettings) -> ReminderSettingsInput {
    ReminderSettingsInput {
        daily_enabled: settings.daily.enabled,
        daily_time: settings.daily.time.clone(),
        weekly_enabled: settings.weekly.enabled,
        weekly_time: settings.weekly.time.clone(),
        weekly_day: settings.weekly.day,
    }
}

#[cfg(test)]
mod tests {
    use super::{
        activities_for_date, add_activities, core_version, first_activity_date, init_logging,
        init_store, load_reminder_settings, ping, save_reminder_settings, weekly_summary,
        ActivityDraftInput, ReminderSettingsInput,
    };
    use std::path::PathBuf;
    use std::sync::OnceLock;
    use std::time::{SystemTime, UNIX_EPOCH};

    // Every test shares the one process-wide store; seeding with unique dates
    // keeps them independent of each other.
    fn ensure_store() {
        static PATH: OnceLock<PathBuf> = OnceLock::new();
        let path = PATH.get_or_init(|| {
            let nanos = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .expect("time went backwards")
                .as_nanos();
            std::env::temp_dir().join(format!("ayoora-ffi-test-{nanos}.sqlite3"))
        });
        let error = init_store(path.display().to_string());
        assert!(error.is_empty(), "{error}");
    }

    fn draft(category: &str, date: &str, time: &str) -> ActivityDraftInput {
        ActivityDraftInput {
            category: category.to_string(),
            time: time.to_string(),
            description: None,
            date: date.to_string(),
        }
    }

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_empty_log_dir() {
        let error = init_logging("info".to_string(), String::new());
        assert!(!error.is_empty());
    }

    #[test]
    fn init_store_rejects_a_second_path() {
        ensure_store();
        let error = init_store("/tmp/some-other-ayoora.sqlite3".to_string());
        assert!(error.contains("already open"), "{error}");
    }

    #[test]
    fn batch_save_and_queries_round_trip() {
        ensure_store();

        let saved = add_activities(vec![
            draft("Olahraga", "2031-01-05", "07:00"),
            draft("Belajar", "2031-01-05", "19:30"),
        ]);
        assert!(saved.ok, "{}", saved.message);
        assert_eq!(saved.items.len(), 2);

        let listed = activities_for_date("2031-01-05".to_string());
        assert!(listed.ok, "{}", listed.message);
        let times: Vec<&str> = listed.items.iter().map(|item| item.time.as_str()).collect();
        assert_eq!(times, vec!["07:00", "19:30"]);

        let first = first_activity_date();
        assert!(first.ok, "{}", first.message);
        assert!(first.date.is_some());

        let summary = weekly_summary();
        assert!(summary.ok, "{}", summary.message);
        assert_eq!(summary.days.len(), 7);
    }

    #[test]
    fn conflicting_batch_is_rejected_whole() {
        ensure_store();

        let first = add_activities(vec![draft("Makan", "2031-02-01", "12:00")]);
        assert!(first.ok, "{}", first.message);

        let second = add_activities(vec![
            draft("Belajar", "2031-02-02", "09:00"),
            draft("Olahraga", "2031-02-01", "12:00"),
        ]);
        assert!(!second.ok);
        assert!(second.message.contains("schedule conflict"), "{}", second.message);

        let listed = activities_for_date("2031-02-02".to_string());
        assert!(listed.items.is_empty());
    }

    #[test]
    fn invalid_draft_is_named_in_the_message() {
        ensure_store();

        let response = add_activities(vec![draft("Olahraga", "2031-03-01", "7:00")]);
        assert!(!response.ok);
        assert!(response.message.contains("invalid activity time"), "{}", response.message);
    }

    #[test]
    fn reminder_settings_round_trip_over_ffi() {
        ensure_store();

        let saved = save_reminder_settings(ReminderSettingsInput {
            daily_enabled: true,
            daily_time: "2024-05-10T07:00:00+07:00".to_string(),
            weekly_enabled: true,
            weekly_time: "2024-05-10T18:30:00+07:00".to_string(),
            weekly_day: 1,
        });
        assert!(saved.ok, "{}", saved.message);

        let loaded = load_reminder_settings();
        assert!(loaded.ok, "{}", loaded.message);
        let settings = loaded.settings.expect("settings were just saved");
        assert!(settings.daily_enabled);
        assert_eq!(settings.weekly_day, 1);
    }

    #[test]
    fn out_of_range_weekday_is_rejected() {
        ensure_store();

        let response = save_reminder_settings(ReminderSettingsInput {
            daily_enabled: false,
            daily_time: "2024-05-10T07:00:00+07:00".to_string(),
            weekly_enabled: false,
            weekly_time: "2024-05-10T18:30:00+07:00".to_string(),
            weekly_day: 8,
        });
        assert!(!response.ok);
        assert!(response.message.contains("weekday"), "{}", response.message);
    }
}
