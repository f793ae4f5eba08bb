pub mod json_backend;
pub mod memory_backend;

use std::rc::Rc;

use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use crate::errors::{BackendError, Result, TrackerError};

pub use json_backend::JsonFileBackend;
pub use memory_backend::MemoryBackend;

pub const DEFAULT_NAMESPACE: &str = "office-tracker:";
const PROBE_KEY: &str = "__office_tracker_probe__";

/// Raw string key/value medium, shared by every gateway namespace.
pub trait KeyValueBackend {
    fn get(&self, key: &str) -> std::result::Result<Option<String>, BackendError>;
    fn set(&self, key: &str, value: &str) -> std::result::Result<(), BackendError>;
    fn remove(&self, key: &str) -> std::result::Result<(), BackendError>;
    fn keys(&self) -> std::result::Result<Vec<String>, BackendError>;
}

/// Namespaced JSON persistence over a [`KeyValueBackend`].
///
/// Reads never fail: absent or undecodable entries load as `None`, and
/// undecodable ones are purged. Writes retry once after evicting a quarter of
/// this namespace's other entries when the backend reports a full quota.
#[derive(Clone)]
pub struct StorageGateway {
    backend: Rc<dyn KeyValueBackend>,
    namespace: String,
}

impl StorageGateway {
    pub fn new<B>(backend: B) -> Self
    where
        B: KeyValueBackend + 'static,
    {
        Self::with_namespace(backend, DEFAULT_NAMESPACE)
    }

    pub fn with_namespace<B>(backend: B, namespace: impl Into<String>) -> Self
    where
        B: KeyValueBackend + 'static,
    {
        Self {
            backend: Rc::new(backend),
            namespace: namespace.into(),
        }
    }

    /// Gateway over a fresh, unshared in-memory backend.
    pub fn in_memory() -> Self {
        Self::new(MemoryBackend::new())
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    fn full_key(&self, key: &str) -> String {
        format!("{}{}", self.namespace, key)
    }

    pub fn save<T>(&self, key: &str, value: &T) -> Result<()>
    where
        T: Serialize + ?Sized,
    {
        let json = serde_json::to_string(value)?;
        let full_key = self.full_key(key);
        match self.backend.set(&full_key, &json) {
            Ok(()) => {
                debug!(key, bytes = json.len(), "stored entry");
                Ok(())
            }
            Err(BackendError::QuotaExceeded) => {
                let evicted = self.evict_fraction(&full_key);
                warn!(key, evicted, "storage quota exceeded; retrying after eviction");
                self.backend
                    .set(&full_key, &json)
                    .map_err(TrackerError::from)
            }
            Err(err) => Err(err.into()),
        }
    }

    pub fn load<T>(&self, key: &str) -> Option<T>
    where
        T: DeserializeOwned,
    {
        let full_key = self.full_key(key);
        let raw = match self.backend.get(&full_key) {
            Ok(raw) => raw?,
            Err(err) => {
                warn!(key, error = %err, "failed to read stored entry");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(err) => {
                let corrupted = TrackerError::StorageReadCorrupted {
                    key: key.to_string(),
                    reason: err.to_string(),
                };
                warn!(error = %corrupted, "discarding corrupted entry");
                if let Err(err) = self.backend.remove(&full_key) {
                    warn!(key, error = %err, "failed to purge corrupted entry");
                }
                None
            }
        }
    }

    pub fn remove(&self, key: &str) -> Result<()> {
        self.backend.remove(&self.full_key(key))?;
        Ok(())
    }

    /// Non-destructive write check that round-trips an entry in this namespace.
    pub fn is_available(&self) -> bool {
        let key = self.full_key(PROBE_KEY);
        let outcome = self
            .backend
            .set(&key, "1")
            .and_then(|()| self.backend.remove(&key));
        if let Err(err) = &outcome {
            debug!(namespace = %self.namespace, error = %err, "storage availability check failed");
        }
        outcome.is_ok()
    }

    /// Keys written through this namespace, without the prefix, sorted.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .namespaced_keys()
            .into_iter()
            .filter_map(|key| key.strip_prefix(&self.namespace).map(str::to_string))
            .collect();
        keys.sort();
        keys
    }

    /// Removes every entry in this namespace; other namespaces are untouched.
    pub fn clear(&self) -> Result<()> {
        for key in self.namespaced_keys() {
            self.backend.remove(&key)?;
        }
        Ok(())
    }

    fn namespaced_keys(&self) -> Vec<String> {
        match self.backend.keys() {
            Ok(keys) => keys
                .into_iter()
                .filter(|key| key.starts_with(&self.namespace))
                .collect(),
            Err(err) => {
                warn!(error = %err, "failed to list stored keys");
                Vec::new()
            }
        }
    }

    fn evict_fraction(&self, keep: &str) -> usize {
        let mut candidates: Vec<String> = self
            .namespaced_keys()
            .into_iter()
            .filter(|key| key != keep)
            .collect();
        if candidates.is_empty() {
            return 0;
        }
        candidates.sort();
        let count = candidates.len().div_ceil(4);
        candidates
            .iter()
            .take(count)
            .filter(|key| self.backend.remove(key).is_ok())
            .count()
    }
}
