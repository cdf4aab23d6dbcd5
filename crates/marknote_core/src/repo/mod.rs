//! Repository layer over the key-value backend.
//!
//! # Responsibility
//! - Encode/decode the `NOTES` and `TAGS` slots as JSON arrays.
//! - Keep serialization details out of the note store.
//!
//! # Invariants
//! - A missing slot loads as an empty collection.
//! - A malformed slot is reported, never silently replaced.

pub mod slot_repo;
