use ayoora_core::db::open_db_in_memory;
use ayoora_core::{
    ActivityDraft, ActivityRepository, ActivityValidationError, RepoError,
    SqliteActivityRepository,
};
use rusqlite::Connection;

fn draft(category: &str, date: &str, time: &str) -> ActivityDraft {
    ActivityDraft::new(category, date, time, None)
}

fn row_count(conn: &Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM activities;", [], |row| row.get(0))
        .unwrap()
}

#[test]
fn batch_insert_assigns_fresh_increasing_ids() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteActivityRepository::try_new(&conn).unwrap();

    let committed = repo
        .insert_batch(&[
            draft("Olahraga", "2024-05-10", "07:00"),
            draft("Belajar", "2024-05-10", "09:30"),
        ])
        .unwrap();

    assert_eq!(committed.len(), 2);
    assert!(committed[0].id < committed[1].id);
    assert_eq!(committed[0].category, "Olahraga");
    assert_eq!(committed[1].time, "09:30");
}

#[test]
fn conflicting_insert_names_the_slot_and_leaves_store_unchanged() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteActivityRepository::try_new(&conn).unwrap();

    repo.insert_batch(&[draft("Olahraga", "2024-05-10", "07:00")])
        .unwrap();
    assert_eq!(row_count(&conn), 1);

    let err = repo
        .insert_batch(&[draft("Belajar", "2024-05-10", "07:00")])
        .unwrap_err();
    match err {
        RepoError::Conflict { date, time } => {
            assert_eq!(date, "2024-05-10");
            assert_eq!(time, "07:00");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(row_count(&conn), 1);
}

#[test]
fn batch_is_all_or_nothing_when_a_middle_draft_conflicts() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteActivityRepository::try_new(&conn).unwrap();

    repo.insert_batch(&[draft("Tidur", "2024-05-09", "22:00")])
        .unwrap();

    let err = repo
        .insert_batch(&[
            draft("Olahraga", "2024-05-09", "06:00"),
            draft("Belajar", "2024-05-09", "22:00"),
            draft("Makan", "2024-05-09", "12:00"),
        ])
        .unwrap_err();
    assert!(matches!(err, RepoError::Conflict { .. }));

    // None of the three drafts committed, not even the valid first one.
    assert_eq!(row_count(&conn), 1);
    let remaining = repo.activities_on("2024-05-09").unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].time, "22:00");
}

#[test]
fn duplicate_slot_within_one_batch_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteActivityRepository::try_new(&conn).unwrap();

    let err = repo
        .insert_batch(&[
            draft("Olahraga", "2024-05-10", "07:00"),
            draft("Belajar", "2024-05-10", "07:00"),
        ])
        .unwrap_err();

    match err {
        RepoError::Conflict { date, time } => {
            assert_eq!(date, "2024-05-10");
            assert_eq!(time, "07:00");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(row_count(&conn), 0);
}

#[test]
fn activities_on_returns_ascending_time_order() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteActivityRepository::try_new(&conn).unwrap();

    repo.insert_batch(&[
        draft("Makan", "2024-05-10", "14:00"),
        draft("Olahraga", "2024-05-10", "09:00"),
        draft("Tidur", "2024-05-11", "22:00"),
    ])
    .unwrap();

    let times: Vec<String> = repo
        .activities_on("2024-05-10")
        .unwrap()
        .into_iter()
        .map(|activity| activity.time)
        .collect();
    assert_eq!(times, vec!["09:00", "14:00"]);

    assert!(repo.activities_on("2024-05-12").unwrap().is_empty());
}

#[test]
fn first_recorded_date_is_the_minimum_ever_inserted() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteActivityRepository::try_new(&conn).unwrap();

    assert_eq!(repo.first_recorded_date().unwrap(), None);

    repo.insert_batch(&[
        draft("Olahraga", "2024-05-05", "07:00"),
        draft("Belajar", "2024-05-01", "09:00"),
        draft("Makan", "2024-05-12", "12:00"),
    ])
    .unwrap();

    assert_eq!(
        repo.first_recorded_date().unwrap().as_deref(),
        Some("2024-05-01")
    );
}

#[test]
fn invalid_drafts_fail_validation_before_any_write() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteActivityRepository::try_new(&conn).unwrap();

    let cases = [
        (
            draft("", "2024-05-10", "07:00"),
            ActivityValidationError::EmptyCategory,
        ),
        (
            draft("Olahraga", "2024-05-10", "7:00"),
            ActivityValidationError::InvalidTime("7:00".to_string()),
        ),
        (
            draft("Olahraga", "2024-5-10", "07:00"),
            ActivityValidationError::InvalidDate("2024-5-10".to_string()),
        ),
    ];

    for (bad, expected) in cases {
        let err = repo
            .insert_batch(&[draft("Tidur", "2024-05-10", "21:00"), bad])
            .unwrap_err();
        match err {
            RepoError::Validation(actual) => assert_eq!(actual, expected),
            other => panic!("unexpected error: {other}"),
        }
    }
    assert_eq!(row_count(&conn), 0);
}

#[test]
fn description_survives_the_round_trip_including_absence() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteActivityRepository::try_new(&conn).unwrap();

    repo.insert_batch(&[
        ActivityDraft::new(
            "Belajar",
            "2024-05-10",
            "09:00",
            Some("chapter three".to_string()),
        ),
        ActivityDraft::new("Olahraga", "2024-05-10", "07:00", None),
    ])
    .unwrap();

    let activities = repo.activities_on("2024-05-10").unwrap();
    assert_eq!(activities[0].description, None);
    assert_eq!(activities[1].description.as_deref(), Some("chapter three"));
}

#[test]
fn repository_rejects_unmigrated_connection() {
    let conn = Connection::open_in_memory().unwrap();

    match SqliteActivityRepository::try_new(&conn) {
        Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert!(expected_version > 0),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn repository_rejects_connection_without_activities_table() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!(
        "PRAGMA user_version = {};",
        ayoora_core::db::migrations::latest_version()
    ))
    .unwrap();

    assert!(matches!(
        SqliteActivityRepository::try_new(&conn),
        Err(RepoError::MissingRequiredTable("activities"))
    ));
}

#[test]
fn repository_rejects_connection_missing_required_column() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE activities (
            id INTEGER PRIMARY KEY,
            category TEXT NOT NULL,
            time TEXT NOT NULL,
            date TEXT NOT NULL
        );",
    )
    .unwrap();
    conn.execute_batch(&format!(
        "PRAGMA user_version = {};",
        ayoora_core::db::migrations::latest_version()
    ))
    .unwrap();

    assert!(matches!(
        SqliteActivityRepository::try_new(&conn),
        Err(RepoError::MissingRequiredColumn {
            table: "activities",
            column: "description"
        })
    ));
}
