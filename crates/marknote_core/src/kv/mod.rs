//! Persistent key-value backend contract and implementations.
//!
//! # Responsibility
//! - Define the get/set slot contract the note store persists through.
//! - Provide an in-memory backend and a SQLite-backed backend.
//!
//! # Invariants
//! - Values are opaque UTF-8 strings; JSON encoding happens in `repo`.
//! - `get` on a never-written key returns `Ok(None)`, not an error.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod memory;
mod sqlite;

pub use memory::MemoryKvBackend;
pub use sqlite::SqliteKvBackend;

pub type KvResult<T> = Result<T, KvError>;

/// Backend errors, including opening and migrating the SQLite slot file.
#[derive(Debug)]
pub enum KvError {
    Sqlite(rusqlite::Error),
    /// Slot file was written by a newer build.
    UnsupportedSchemaVersion { found: u32, supported: u32 },
    /// Connection was handed over without the slot table.
    MissingTable(&'static str),
    /// Backend refused the operation (quota, read-only, injected failure).
    Unavailable(String),
}

impl Display for KvError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "slot storage error: {err}"),
            Self::UnsupportedSchemaVersion { found, supported } => write!(
                f,
                "slot schema version {found} is newer than supported {supported}"
            ),
            Self::MissingTable(table) => write!(f, "missing required table: {table}"),
            Self::Unavailable(message) => write!(f, "key-value backend unavailable: {message}"),
        }
    }
}

impl Error for KvError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            _ => None,
        }
    }
}

impl From<rusqlite::Error> for KvError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

/// Named-slot storage used by the note store.
pub trait KvBackend {
    /// Reads one slot. Missing slots are `Ok(None)`.
    fn get(&self, key: &str) -> KvResult<Option<String>>;
    /// Writes one slot, replacing any previous value.
    fn set(&mut self, key: &str, value: &str) -> KvResult<()>;
}
