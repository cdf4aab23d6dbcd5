//! In-memory key-value backend.

use super::{KvBackend, KvError, KvResult};
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

/// Process-local slot map.
///
/// Clones share the same slots, so a caller can keep a handle and inspect
/// what a store persisted, or reopen a second store over the same data.
#[derive(Debug, Clone, Default)]
pub struct MemoryKvBackend {
    slots: Rc<RefCell<BTreeMap<String, String>>>,
    reject_writes: Rc<Cell<bool>>,
}

impl MemoryKvBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds one slot without going through a store.
    pub fn with_slot(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.slots.borrow_mut().insert(key.into(), value.into());
        self
    }

    /// Fault-injection seam: makes every subsequent `set` fail with
    /// `KvError::Unavailable` so callers can exercise failed writes.
    pub fn set_reject_writes(&self, reject: bool) {
        self.reject_writes.set(reject);
    }

    pub fn keys(&self) -> Vec<String> {
        self.slots.borrow().keys().cloned().collect()
    }
}

impl KvBackend for MemoryKvBackend {
    fn get(&self, key: &str) -> KvResult<Option<String>> {
        Ok(self.slots.borrow().get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> KvResult<()> {
        if self.reject_writes.get() {
            return Err(KvError::Unavailable(format!("writes rejected for `{key}`")));
        }
        self.slots
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}
