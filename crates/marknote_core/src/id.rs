//! Id supplier contract and implementations.
//!
//! # Invariants
//! - Suppliers are expected, not guaranteed, to return unique ids; the
//!   note store re-asks on collision.

use uuid::Uuid;

/// Produces identifier strings on demand.
pub trait IdSupplier {
    fn next_id(&mut self) -> String;
}

/// Random UUID v4 ids in hyphenated lowercase form.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIdSupplier;

impl IdSupplier for UuidIdSupplier {
    fn next_id(&mut self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Deterministic `{prefix}-{n}` ids, starting at 1.
///
/// Used by tests and bulk imports where stable ids matter more than
/// global uniqueness.
#[derive(Debug, Clone)]
pub struct SequentialIdSupplier {
    prefix: String,
    next: u64,
}

impl SequentialIdSupplier {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 1,
        }
    }
}

impl IdSupplier for SequentialIdSupplier {
    fn next_id(&mut self) -> String {
        let id = format!("{}-{}", self.prefix, self.next);
        self.next += 1;
        id
    }
}
