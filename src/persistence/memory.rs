use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use super::{PersistenceError, PersistenceResult, SnapshotStore};

/// In-process snapshot store.
///
/// Clones share one map, the way every page of an origin sees the same storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: Rc<RefCell<HashMap<String, String>>>,
    capacity: Option<usize>,
    disabled: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store that rejects writes once keys plus values exceed `bytes`.
    pub fn with_capacity_limit(bytes: usize) -> Self {
        Self {
            capacity: Some(bytes),
            ..Self::new()
        }
    }

    /// Store whose every operation fails, like storage disabled by the user agent.
    pub fn unavailable() -> Self {
        Self {
            disabled: true,
            ..Self::default()
        }
    }

    pub fn len(&self) -> usize {
        self.values.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.borrow().is_empty()
    }

    fn ensure_available(&self) -> PersistenceResult<()> {
        if self.disabled {
            return Err(PersistenceError::Unavailable(
                "in-memory storage is disabled".into(),
            ));
        }
        Ok(())
    }
}

impl SnapshotStore for MemoryStore {
    fn read(&self, key: &str) -> PersistenceResult<Option<String>> {
        self.ensure_available()?;
        Ok(self.values.borrow().get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> PersistenceResult<()> {
        self.ensure_available()?;
        let mut values = self.values.borrow_mut();
        if let Some(limit) = self.capacity {
            let others: usize = values
                .iter()
                .filter(|(existing, _)| existing.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum();
            let needed = others + key.len() + value.len();
            if needed > limit {
                return Err(PersistenceError::QuotaExceeded { needed, limit });
            }
        }
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> PersistenceResult<()> {
        self.ensure_available()?;
        self.values.borrow_mut().remove(key);
        Ok(())
    }
}
