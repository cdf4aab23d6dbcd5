//! Core use-case services.
//!
//! # Responsibility
//! - Own the authoritative note/tag collections (`NoteStore`).
//! - Derive enriched note projections from the two collections.

pub mod enrich;
pub mod note_store;
