//! Repository layer: persistence contracts and SQLite implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts for activities and
//!   settings.
//! - Keep SQL details out of the service/orchestration layer.
//!
//! # Invariants
//! - Write paths validate domain records before any SQL mutation.
//! - Read paths reject malformed persisted state instead of masking it.
//! - Repositories refuse to operate on connections whose schema was not
//!   migrated by [`crate::db`].

use crate::db::migrations::latest_version;
use rusqlite::Connection;

pub mod activity_repo;
pub mod settings_repo;

/// Schema guard outcome shared by the per-table repositories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SchemaIssue {
    StaleVersion { expected: u32, actual: u32 },
    MissingTable(&'static str),
    MissingColumn {
        table: &'static str,
        column: &'static str,
    },
}

/// Verifies the connection carries the migrated schema for `table` with the
/// listed columns.
pub(crate) fn check_schema(
    conn: &Connection,
    table: &'static str,
    columns: &[&'static str],
) -> Result<Option<SchemaIssue>, rusqlite::Error> {
    let actual: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    let expected = latest_version();
    if actual != expected {
        return Ok(Some(SchemaIssue::StaleVersion { expected, actual }));
    }

    let table_exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    if table_exists == 0 {
        return Ok(Some(SchemaIssue::MissingTable(table)));
    }

    for column in columns {
        let column_exists: i64 = conn.query_row(
            "SELECT EXISTS(
                SELECT 1 FROM pragma_table_info(?1) WHERE name = ?2
            );",
            [table, column],
            |row| row.get(0),
        )?;
        if column_exists == 0 {
            return Ok(Some(SchemaIssue::MissingColumn { table, column }));
        }
    }

    Ok(None)
}
