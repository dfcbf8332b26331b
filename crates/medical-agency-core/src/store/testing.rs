//! Store doubles for tests.

use std::cell::RefCell;
use std::collections::HashSet;

use super::{KeyValueStore, MemoryStore, StoreError, StoreResult};

/// In-memory store whose writes to chosen keys fail.
#[derive(Default)]
pub(crate) struct FailingStore {
    inner: MemoryStore,
    failing: RefCell<HashSet<String>>,
}

impl FailingStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Make every later `set` on `key` fail.
    pub(crate) fn fail_writes_to(&self, key: &str) {
        self.failing.borrow_mut().insert(key.to_string());
    }
}

impl KeyValueStore for FailingStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        if self.failing.borrow().contains(key) {
            return Err(StoreError::Unavailable(format!("write to {} rejected", key)));
        }
        self.inner.set(key, value)
    }

    fn keys(&self) -> StoreResult<Vec<String>> {
        self.inner.keys()
    }

    fn remove(&self, key: &str) -> StoreResult<bool> {
        self.inner.remove(key)
    }
}
