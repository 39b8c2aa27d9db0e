//! Shared store handle with an explicit lifetime.
//!
//! # Responsibility
//! - Own the single per-process SQLite connection and hand out services
//!   bound to it.
//!
//! # Invariants
//! - Opened once by the process entry point and reused; the backing file is
//!   released only at process exit.
//! - Every operation takes the connection lock, so no two write transactions
//!   interleave.

use crate::db::{open_db, open_db_in_memory, DbResult};
use crate::service::activity_service::ActivityService;
use crate::service::settings_service::SettingsService;
use rusqlite::Connection;
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Handle to the process-wide activity database.
///
/// Cloning is cheap and shares the same underlying connection.
#[derive(Clone)]
pub struct Storage {
    conn: Arc<Mutex<Connection>>,
}

impl Storage {
    /// Opens (creating if needed) and migrates the database file.
    pub fn open(path: impl AsRef<Path>) -> DbResult<Self> {
        Ok(Self::from_connection(open_db(path)?))
    }

    /// Opens a migrated in-memory database, mainly for tests.
    pub fn open_in_memory() -> DbResult<Self> {
        Ok(Self::from_connection(open_db_in_memory()?))
    }

    fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    /// Activity log operations over this store.
    pub fn activities(&self) -> ActivityService {
        ActivityService::new(self.clone())
    }

    /// Reminder settings operations over this store.
    pub fn settings(&self) -> SettingsService {
        SettingsService::new(self.clone())
    }

    /// Runs `f` while holding the connection lock.
    pub(crate) fn with_conn<T>(&self, f: impl FnOnce(&Connection) -> T) -> T {
        let guard = match self.conn.lock() {
            Ok(guard) => guard,
            // A poisoned lock means some caller panicked mid-operation; the
            // connection itself stays usable because SQLite rolls back an
            // open transaction when it is dropped.
            Err(poisoned) => poisoned.into_inner(),
        };
        f(&guard)
    }
}
