//! SQLite file bootstrap for `SqliteKvBackend`.
//!
//! Opening a connection always brings the `kv_slots` schema up to date;
//! failures surface as `KvError` since the slot backend is the only user.

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};
