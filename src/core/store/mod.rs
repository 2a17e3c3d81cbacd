//! SQLite-backed entity store
//!
//! Holds the five primary record kinds and the three association kinds.
//! Every write runs inside an immediate transaction so the referential
//! integrity check and the write it guards are observed as one unit, and
//! concurrent writers to the same composite key are serialized by SQLite.
//!
//! There are no foreign keys: deletes never cascade and are never blocked.

mod disasters;
mod donations;
mod links;
mod parties;
mod products;
mod records;
mod schema;
mod totals;

pub use records::Record;

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use rusqlite::{ffi, Connection, ErrorCode, Transaction, TransactionBehavior};
use tracing::{debug, warn};

use crate::core::error::{LedgerError, LedgerResult};

/// Database file name inside the project directory
pub const DATABASE_FILE: &str = "ledger.db";

/// Current schema version, recorded in the `schema_version` table
const SCHEMA_VERSION: i32 = 1;

/// The ledger store
pub struct Store {
    conn: Connection,
    path: Option<PathBuf>,
}

impl Store {
    /// Open or create a store at `path`
    pub fn open(path: impl AsRef<Path>) -> LedgerResult<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        conn.busy_timeout(std::time::Duration::from_secs(5))?;

        let mut store = Self {
            conn,
            path: Some(path.to_path_buf()),
        };
        store.init_schema()?;
        debug!(path = %path.display(), "opened ledger store");
        Ok(store)
    }

    /// Open a private store that lives only as long as this value
    pub fn open_in_memory() -> LedgerResult<Self> {
        let mut store = Self {
            conn: Connection::open_in_memory()?,
            path: None,
        };
        store.init_schema()?;
        Ok(store)
    }

    /// Underlying connection, for read-only collaborators
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Database file, or None for an in-memory store
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Run `f` inside an immediate transaction, committing on success
    fn write<T>(&mut self, f: impl FnOnce(&Transaction<'_>) -> LedgerResult<T>) -> LedgerResult<T> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let out = f(&tx)?;
        tx.commit()?;
        Ok(out)
    }
}

/// Turn a primary-key violation into a conflict on `key`
fn conflict_on_duplicate(err: rusqlite::Error, kind: &'static str, key: impl fmt::Display) -> LedgerError {
    match &err {
        rusqlite::Error::SqliteFailure(e, _)
            if e.code == ErrorCode::ConstraintViolation
                && e.extended_code == ffi::SQLITE_CONSTRAINT_PRIMARYKEY =>
        {
            warn!(kind, key = %key, "rejecting duplicate key");
            LedgerError::conflict(kind, key)
        }
        _ => err.into(),
    }
}

/// `?, ?, ?` for `n` parameters
fn placeholders(n: usize) -> String {
    vec!["?"; n].join(", ")
}
