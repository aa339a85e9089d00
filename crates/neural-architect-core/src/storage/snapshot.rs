use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::KeyValueStore;
use crate::error::StorageError;

/// One aggregate's slot in a [`KeyValueStore`].
///
/// Reads treat malformed values as absent (the key is cleared), but a failed
/// read is returned to the caller so nothing is saved over data that could
/// not be seen. Writes are fire-and-forget: a failed write is logged and the
/// caller carries on.
#[derive(Clone)]
pub struct SnapshotSlot {
    store: Arc<dyn KeyValueStore>,
    key: &'static str,
}

impl SnapshotSlot {
    pub fn new(store: Arc<dyn KeyValueStore>, key: &'static str) -> Self {
        Self { store, key }
    }

    /// Raw JSON value, or `None` when absent or not JSON.
    ///
    /// # Errors
    /// Returns the store's error when the read itself fails.
    pub fn load_value(&self) -> Result<Option<serde_json::Value>, StorageError> {
        let raw = match self.store.get(self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Ok(None),
            Err(e) => {
                tracing::warn!(key = self.key, error = %e, "failed to read snapshot");
                return Err(e);
            }
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                self.discard(&e);
                Ok(None)
            }
        }
    }

    /// Typed snapshot, or `None` when absent or malformed.
    ///
    /// # Errors
    /// Returns the store's error when the read itself fails.
    pub fn load<T: DeserializeOwned>(&self) -> Result<Option<T>, StorageError> {
        let Some(value) = self.load_value()? else {
            return Ok(None);
        };
        match serde_json::from_value(value) {
            Ok(snapshot) => Ok(Some(snapshot)),
            Err(e) => {
                self.discard(&e);
                Ok(None)
            }
        }
    }

    pub fn save<T: Serialize>(&self, snapshot: &T) {
        let json = match serde_json::to_string(snapshot) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!(key = self.key, error = %e, "failed to serialize snapshot");
                return;
            }
        };
        if let Err(e) = self.store.set(self.key, &json) {
            tracing::warn!(key = self.key, error = %e, "failed to persist snapshot");
        }
    }

    pub fn clear(&self) {
        if let Err(e) = self.store.remove(self.key) {
            tracing::warn!(key = self.key, error = %e, "failed to clear snapshot");
        }
    }

    fn discard(&self, reason: &dyn std::fmt::Display) {
        tracing::warn!(key = self.key, error = %reason, "discarding malformed snapshot");
        self.clear();
    }
}
