use std::{cell::RefCell, collections::BTreeMap, rc::Rc};

use super::KeyValueBackend;
use crate::errors::BackendError;

#[derive(Debug, Default)]
struct MemoryState {
    entries: BTreeMap<String, String>,
    quota_bytes: Option<usize>,
    unavailable: bool,
}

/// In-process key/value store. Clones share the same entries, so several
/// gateways can sit on top of one medium the way browser tabs share storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    state: Rc<RefCell<MemoryState>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Caps the total size of keys plus values, in bytes.
    pub fn with_quota(quota_bytes: usize) -> Self {
        let backend = Self::new();
        backend.state.borrow_mut().quota_bytes = Some(quota_bytes);
        backend
    }

    /// Simulates a medium that rejects every operation.
    pub fn set_available(&self, available: bool) {
        self.state.borrow_mut().unavailable = !available;
    }

    pub fn used_bytes(&self) -> usize {
        self.state
            .borrow()
            .entries
            .iter()
            .map(|(key, value)| key.len() + value.len())
            .sum()
    }

    fn ensure_available(state: &MemoryState) -> Result<(), BackendError> {
        if state.unavailable {
            Err(BackendError::Unavailable("memory backend disabled".into()))
        } else {
            Ok(())
        }
    }
}

impl KeyValueBackend for MemoryBackend {
    fn get(&self, key: &str) -> Result<Option<String>, BackendError> {
        let state = self.state.borrow();
        Self::ensure_available(&state)?;
        Ok(state.entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), BackendError> {
        let mut state = self.state.borrow_mut();
        Self::ensure_available(&state)?;
        if let Some(quota) = state.quota_bytes {
            let others: usize = state
                .entries
                .iter()
                .filter(|(existing, _)| existing.as_str() != key)
                .map(|(existing, stored)| existing.len() + stored.len())
                .sum();
            if others + key.len() + value.len() > quota {
                return Err(BackendError::QuotaExceeded);
            }
        }
        state.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), BackendError> {
        let mut state = self.state.borrow_mut();
        Self::ensure_available(&state)?;
        state.entries.remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, BackendError> {
        let state = self.state.borrow();
        Self::ensure_available(&state)?;
        Ok(state.entries.keys().cloned().collect())
    }
}
