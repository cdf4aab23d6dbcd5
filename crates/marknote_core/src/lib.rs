//! Core domain logic for MarkNote.
//! This crate owns the note/tag collections, their persistence slots and
//! the enriched note projection.

pub mod config;
pub mod db;
pub mod id;
pub mod kv;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{ConfigError, CoreConfig, LogLevel};
pub use id::{IdSupplier, SequentialIdSupplier, UuidIdSupplier};
pub use kv::{KvBackend, KvError, KvResult, MemoryKvBackend, SqliteKvBackend};
pub use logging::{init_logging, LoggingError};
pub use model::note::{EnrichedNote, NoteData, NoteFilter, NoteId, StoredNote};
pub use model::tag::{Tag, TagId};
pub use repo::slot_repo::{RepoError, RepoResult, SlotRepository, NOTES_SLOT, TAGS_SLOT};
pub use service::note_store::{NoteStore, StoreError, StoreResult};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
