//! In-memory backend.
//!
//! Not persistent; data is lost when the process exits.

use std::cell::RefCell;
use std::collections::BTreeMap;

use super::Backend;
use crate::error::{BackendError, Result};

/// Process-local secret store.
pub struct MemoryBackend {
    name: String,
    data: RefCell<BTreeMap<String, String>>,
}

impl MemoryBackend {
    /// Create a new empty memory store.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            data: RefCell::new(BTreeMap::new()),
        }
    }

    /// Create a memory store with initial data.
    pub fn with_data<K, V>(name: &str, data: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            name: name.to_string(),
            data: RefCell::new(
                data.into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }
}

impl std::fmt::Debug for MemoryBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryBackend")
            .field("name", &self.name)
            .field("keys_count", &self.data.borrow().len())
            .finish()
    }
}

impl Backend for MemoryBackend {
    fn name(&self) -> &str {
        &self.name
    }

    fn get(&self, key: &str) -> Result<String> {
        self.data
            .borrow()
            .get(key)
            .cloned()
            .ok_or_else(|| BackendError::not_found(&self.name, key).into())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.data
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<()> {
        match self.data.borrow_mut().remove(key) {
            Some(_) => Ok(()),
            None => Err(BackendError::not_found(&self.name, key).into()),
        }
    }

    fn list(&self) -> Result<Vec<String>> {
        Ok(self.data.borrow().keys().cloned().collect())
    }
}
