//! Domain model for notes, tags and their derived projections.
//!
//! # Responsibility
//! - Define the persisted shapes (`StoredNote`, `Tag`) shared with storage.
//! - Define caller input (`NoteData`) and read projections (`EnrichedNote`).
//!
//! # Invariants
//! - Notes reference tags by id only; the join lives in `StoredNote::tag_ids`.
//! - `EnrichedNote` is derived on read and never persisted.

pub mod note;
pub mod tag;
