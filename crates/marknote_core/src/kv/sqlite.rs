//! SQLite-backed key-value backend.
//!
//! # Invariants
//! - One row per slot in `kv_slots`; `set` upserts and bumps `updated_at`.
//! - Construction fails fast when the connection was not migrated.

use super::{KvBackend, KvError, KvResult};
use rusqlite::{params, Connection, OptionalExtension};

const SLOT_TABLE: &str = "kv_slots";

/// Slot storage over a migrated connection (see `db::open_db`).
pub struct SqliteKvBackend<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteKvBackend<'conn> {
    /// Constructs a backend from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> KvResult<Self> {
        let exists: i64 = conn.query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [SLOT_TABLE],
            |row| row.get(0),
        )?;
        if exists != 1 {
            return Err(KvError::MissingTable(SLOT_TABLE));
        }
        Ok(Self { conn })
    }
}

impl KvBackend for SqliteKvBackend<'_> {
    fn get(&self, key: &str) -> KvResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_slots WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&mut self, key: &str, value: &str) -> KvResult<()> {
        self.conn.execute(
            "INSERT INTO kv_slots (key, value, updated_at)
             VALUES (?1, ?2, strftime('%s', 'now') * 1000)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, value],
        )?;
        Ok(())
    }
}
