//! Injected configuration capability.
//!
//! Settings live in a keyed store with JSON-blob values. Components that
//! need configuration (the aggregator, the token broker, the transfer
//! manager) take the store as a constructor parameter; there is no global
//! preferences object, and tests inject [`MemoryConfigStore`].

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::CoreError;

/// Well-known configuration keys.
pub mod keys {
    pub const SELECTED_PROVIDER: &str = "selected_provider";
    pub const SELECTED_SOURCE: &str = "selected_source";
    pub const MERGE_WATCHING: &str = "merge_watching";
    pub const MAX_RETRIES: &str = "max_retries";
    pub const FAVORITES: &str = "favorites";
    pub const CONTINUE_WATCHING: &str = "continue_watching";
}

/// Keyed configuration store with JSON-blob-by-key semantics.
pub trait ConfigStore: Send + Sync {
    fn get_raw(&self, key: &str) -> Option<String>;
    fn set_raw(&self, key: &str, value: &str) -> Result<(), CoreError>;
    fn remove(&self, key: &str) -> Result<(), CoreError>;
    /// All keys currently present (backup export walks these).
    fn keys(&self) -> Vec<String>;

    /// Decode the JSON blob under `key`. A malformed blob degrades to
    /// `None`; cached state is never worth failing a call over.
    fn get_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.get_raw(key)?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(key, error = %e, "discarding malformed config value");
                None
            }
        }
    }

    fn set_json<T: Serialize>(&self, key: &str, value: &T) -> Result<(), CoreError> {
        let raw = serde_json::to_string(value)?;
        self.set_raw(key, &raw)
    }

    /// The user's active listing provider, if one has been chosen.
    fn selected_provider(&self) -> Option<String> {
        self.get_json(keys::SELECTED_PROVIDER)
    }

    fn set_selected_provider(&self, provider: &str) -> Result<(), CoreError> {
        self.set_json(keys::SELECTED_PROVIDER, &provider)
    }

    /// The user's active streaming site, if one has been chosen.
    fn selected_source(&self) -> Option<String> {
        self.get_json(keys::SELECTED_SOURCE)
    }

    /// Collapse continue-watching entries per series. Off by default.
    fn merge_watching(&self) -> bool {
        self.get_json(keys::MERGE_WATCHING).unwrap_or(false)
    }

    fn set_merge_watching(&self, enabled: bool) -> Result<(), CoreError> {
        self.set_json(keys::MERGE_WATCHING, &enabled)
    }

    /// Retry budget for listing fetches. Zero by default.
    fn max_retries(&self) -> u32 {
        self.get_json(keys::MAX_RETRIES).unwrap_or(0)
    }
}

impl<C: ConfigStore + ?Sized> ConfigStore for Arc<C> {
    fn get_raw(&self, key: &str) -> Option<String> {
        (**self).get_raw(key)
    }

    fn set_raw(&self, key: &str, value: &str) -> Result<(), CoreError> {
        (**self).set_raw(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), CoreError> {
        (**self).remove(key)
    }

    fn keys(&self) -> Vec<String> {
        (**self).keys()
    }
}

/// In-memory store for tests and previews.
#[derive(Debug, Default)]
pub struct MemoryConfigStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryConfigStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ConfigStore for MemoryConfigStore {
    fn get_raw(&self, key: &str) -> Option<String> {
        self.values.lock().unwrap().get(key).cloned()
    }

    fn set_raw(&self, key: &str, value: &str) -> Result<(), CoreError> {
        self.values
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), CoreError> {
        self.values.lock().unwrap().remove(key);
        Ok(())
    }

    fn keys(&self) -> Vec<String> {
        self.values.lock().unwrap().keys().cloned().collect()
    }
}
