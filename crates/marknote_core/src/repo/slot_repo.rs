//! Typed JSON slot repository.
//!
//! # Responsibility
//! - Load/save note and tag collections through any `KvBackend`.
//!
//! # Invariants
//! - Slot names are `NOTES` and `TAGS`; values are JSON arrays.
//! - Collection order is preserved across save/load.

use crate::kv::{KvBackend, KvError};
use crate::model::note::StoredNote;
use crate::model::tag::Tag;
use log::{debug, error};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Slot holding the JSON array of `StoredNote`.
pub const NOTES_SLOT: &str = "NOTES";
/// Slot holding the JSON array of `Tag`.
pub const TAGS_SLOT: &str = "TAGS";

pub type RepoResult<T> = Result<T, RepoError>;

/// Slot load/save errors.
#[derive(Debug)]
pub enum RepoError {
    Kv(KvError),
    /// Stored value is not a JSON array of the expected record shape.
    MalformedSlot {
        slot: &'static str,
        message: String,
    },
    Encode {
        slot: &'static str,
        message: String,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Kv(err) => write!(f, "{err}"),
            Self::MalformedSlot { slot, message } => {
                write!(f, "malformed persisted slot `{slot}`: {message}")
            }
            Self::Encode { slot, message } => {
                write!(f, "failed to encode slot `{slot}`: {message}")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Kv(err) => Some(err),
            Self::MalformedSlot { .. } | Self::Encode { .. } => None,
        }
    }
}

impl From<KvError> for RepoError {
    fn from(value: KvError) -> Self {
        Self::Kv(value)
    }
}

/// Repository reading/writing the two persisted collections.
pub struct SlotRepository<B: KvBackend> {
    backend: B,
}

impl<B: KvBackend> SlotRepository<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn into_backend(self) -> B {
        self.backend
    }

    pub fn load_notes(&self) -> RepoResult<Vec<StoredNote>> {
        self.load_slot(NOTES_SLOT)
    }

    pub fn load_tags(&self) -> RepoResult<Vec<Tag>> {
        self.load_slot(TAGS_SLOT)
    }

    pub fn save_notes(&mut self, notes: &[StoredNote]) -> RepoResult<()> {
        self.save_slot(NOTES_SLOT, notes)
    }

    pub fn save_tags(&mut self, tags: &[Tag]) -> RepoResult<()> {
        self.save_slot(TAGS_SLOT, tags)
    }

    fn load_slot<T: DeserializeOwned>(&self, slot: &'static str) -> RepoResult<Vec<T>> {
        let Some(raw) = self.backend.get(slot)? else {
            debug!("event=slot_load module=repo status=empty slot={slot}");
            return Ok(Vec::new());
        };

        serde_json::from_str(&raw).map_err(|err| {
            error!(
                "event=slot_load module=repo status=error slot={slot} error_code=malformed_slot line={} column={}",
                err.line(),
                err.column()
            );
            RepoError::MalformedSlot {
                slot,
                message: err.to_string(),
            }
        })
    }

    fn save_slot<T: Serialize>(&mut self, slot: &'static str, items: &[T]) -> RepoResult<()> {
        let encoded = serde_json::to_string(items).map_err(|err| RepoError::Encode {
            slot,
            message: err.to_string(),
        })?;
        self.backend.set(slot, &encoded)?;
        debug!(
            "event=slot_save module=repo status=ok slot={slot} items={} bytes={}",
            items.len(),
            encoded.len()
        );
        Ok(())
    }
}
