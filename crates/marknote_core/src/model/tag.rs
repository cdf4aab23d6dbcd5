//! Tag domain model.
//!
//! # Invariants
//! - `id` is unique within the tag collection and never reassigned.
//! - `label` may be renamed in place without touching referencing notes.

use serde::{Deserialize, Serialize};

/// Stable identifier for a tag.
///
/// Kept as plain string because ids are minted outside core (or by an
/// `IdSupplier`) and must round-trip through the persisted JSON unchanged.
pub type TagId = String;

/// Labeled category attached to notes by id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tag {
    pub id: TagId,
    pub label: String,
}

impl Tag {
    pub fn new(id: impl Into<TagId>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}
