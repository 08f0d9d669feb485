//! Opaque credential storage.
//!
//! Bearer tokens live in a secure keyed store scoped by `(service, account)`.
//! Re-authentication replaces a credential by deleting the old entry and
//! inserting the new one; entries are never updated in place, so a stale
//! duplicate can't survive a re-auth.
//!
//! The store expects at most one in-flight auth exchange at a time; the UI
//! serializes re-auth by disabling the action while one is outstanding.
//! Concurrent writers racing on the same account are not defended against
//! here.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::error::CoreError;

/// Addresses one credential in the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CredentialKey {
    pub service: String,
    pub account: String,
}

impl CredentialKey {
    pub fn new(service: impl Into<String>, account: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            account: account.into(),
        }
    }
}

pub trait CredentialStore: Send + Sync {
    fn get(&self, key: &CredentialKey) -> Result<Option<String>, CoreError>;
    fn insert(&self, key: &CredentialKey, secret: &str) -> Result<(), CoreError>;
    /// Deleting an absent credential is not an error.
    fn delete(&self, key: &CredentialKey) -> Result<(), CoreError>;
}

impl<S: CredentialStore + ?Sized> CredentialStore for Arc<S> {
    fn get(&self, key: &CredentialKey) -> Result<Option<String>, CoreError> {
        (**self).get(key)
    }

    fn insert(&self, key: &CredentialKey, secret: &str) -> Result<(), CoreError> {
        (**self).insert(key, secret)
    }

    fn delete(&self, key: &CredentialKey) -> Result<(), CoreError> {
        (**self).delete(key)
    }
}

/// In-memory credential store for tests.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    secrets: Mutex<HashMap<CredentialKey, String>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn get(&self, key: &CredentialKey) -> Result<Option<String>, CoreError> {
        Ok(self.secrets.lock().unwrap().get(key).cloned())
    }

    fn insert(&self, key: &CredentialKey, secret: &str) -> Result<(), CoreError> {
        self.secrets
            .lock()
            .unwrap()
            .insert(key.clone(), secret.to_string());
        Ok(())
    }

    fn delete(&self, key: &CredentialKey) -> Result<(), CoreError> {
        self.secrets.lock().unwrap().remove(key);
        Ok(())
    }
}
