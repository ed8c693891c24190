//! In-memory store backend for tests and ephemeral sessions.

use std::collections::HashMap;

use super::Store;
use crate::error::StoreError;

/// HashMap-backed [`Store`]; nothing survives the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Store for MemoryStore {
    fn get_raw(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.values.get(key).cloned())
    }

    fn set_raw(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_returns_default_for_missing_key() {
        let store = MemoryStore::new();
        let value: u32 = store.get("missing", 7).unwrap();
        assert_eq!(value, 7);
    }

    #[test]
    fn set_then_get_roundtrips() {
        let mut store = MemoryStore::new();
        store.set("answer", &vec![1u32, 2, 3]).unwrap();
        let value: Vec<u32> = store.get("answer", vec![]).unwrap();
        assert_eq!(value, vec![1, 2, 3]);
    }

    #[test]
    fn last_write_wins() {
        let mut store = MemoryStore::new();
        store.set("k", &"first").unwrap();
        store.set("k", &"second").unwrap();
        let value: String = store.get("k", String::new()).unwrap();
        assert_eq!(value, "second");
    }

    #[test]
    fn corrupt_value_is_reported() {
        let mut store = MemoryStore::new();
        store.set_raw("k", "not json at all").unwrap();
        let result: Result<u32, _> = store.get("k", 0);
        assert!(matches!(result, Err(StoreError::CorruptValue { .. })));
    }
}
