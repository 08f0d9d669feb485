//! SQLite-backed key-value storage.
//!
//! One database file holds both the configuration blobs and the credential
//! rows; [`SqliteStore`] implements both store traits so the host app can
//! open a single handle at startup and hand clones of an `Arc` to each
//! component.

use std::path::Path;
use std::sync::Mutex;

use rusqlite::{params, Connection, OptionalExtension};

use crate::config::ConfigStore;
use crate::credentials::{CredentialKey, CredentialStore};
use crate::error::CoreError;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS config (
    key   TEXT PRIMARY KEY,
    value TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS credentials (
    service TEXT NOT NULL,
    account TEXT NOT NULL,
    secret  TEXT NOT NULL,
    PRIMARY KEY (service, account)
);
";

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) the database at the given path.
    pub fn open(path: &Path) -> Result<Self, CoreError> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory database (for tests).
    pub fn open_memory() -> Result<Self, CoreError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

impl ConfigStore for SqliteStore {
    fn get_raw(&self, key: &str) -> Option<String> {
        let conn = self.conn.lock().unwrap();
        conn.query_row(
            "SELECT value FROM config WHERE key = ?1",
            params![key],
            |row| row.get(0),
        )
        .optional()
        .unwrap_or_else(|e| {
            tracing::warn!(key, error = %e, "config read failed");
            None
        })
    }

    fn set_raw(&self, key: &str, value: &str) -> Result<(), CoreError> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO config (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), CoreError> {
        let conn = self.conn.lock().unwrap();
        conn.execute("DELETE FROM config WHERE key = ?1", params![key])?;
        Ok(())
    }

    fn keys(&self) -> Vec<String> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = match conn.prepare("SELECT key FROM config ORDER BY key") {
            Ok(stmt) => stmt,
            Err(e) => {
                tracing::warn!(error = %e, "config key listing failed");
                return Vec::new();
            }
        };
        stmt.query_map([], |row| row.get(0))
            .map(|rows| rows.filter_map(|r| r.ok()).collect())
            .unwrap_or_default()
    }
}

impl CredentialStore for SqliteStore {
    fn get(&self, key: &CredentialKey) -> Result<Option<String>, CoreError> {
        let conn = self.conn.lock().unwrap();
        conn.query_row(
            "SELECT secret FROM credentials WHERE service = ?1 AND account = ?2",
            params![key.service, key.account],
            |row| row.get(0),
        )
        .optional()
        .map_err(Into::into)
    }

    fn insert(&self, key: &CredentialKey, secret: &str) -> Result<(), CoreError> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO credentials (service, account, secret) VALUES (?1, ?2, ?3)",
            params![key.service, key.account, secret],
        )?;
        Ok(())
    }

    fn delete(&self, key: &CredentialKey) -> Result<(), CoreError> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "DELETE FROM credentials WHERE service = ?1 AND account = ?2",
            params![key.service, key.account],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_roundtrip() {
        let store = SqliteStore::open_memory().unwrap();
        assert!(store.get_raw("selected_provider").is_none());

        store.set_raw("selected_provider", "\"kitsu\"").unwrap();
        assert_eq!(
            store.get_raw("selected_provider").as_deref(),
            Some("\"kitsu\"")
        );

        // overwrite in place
        store.set_raw("selected_provider", "\"jikan\"").unwrap();
        assert_eq!(
            store.get_raw("selected_provider").as_deref(),
            Some("\"jikan\"")
        );

        store.remove("selected_provider").unwrap();
        assert!(store.get_raw("selected_provider").is_none());
    }

    #[test]
    fn test_keys_listing() {
        let store = SqliteStore::open_memory().unwrap();
        store.set_raw("b", "2").unwrap();
        store.set_raw("a", "1").unwrap();
        assert_eq!(store.keys(), vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_credential_delete_then_insert() {
        let store = SqliteStore::open_memory().unwrap();
        let key = CredentialKey::new("taiga.AniListToken", "AniListAccessToken");

        store.insert(&key, "old-token").unwrap();
        // re-auth discipline: delete the stale row, then insert the new one
        store.delete(&key).unwrap();
        store.insert(&key, "new-token").unwrap();
        assert_eq!(store.get(&key).unwrap().as_deref(), Some("new-token"));
    }

    #[test]
    fn test_credential_duplicate_insert_fails() {
        let store = SqliteStore::open_memory().unwrap();
        let key = CredentialKey::new("taiga.KitsuToken", "KitsuAccessToken");

        store.insert(&key, "token").unwrap();
        // no update-in-place: a second insert without a delete is an error
        assert!(store.insert(&key, "token-2").is_err());
        assert_eq!(store.get(&key).unwrap().as_deref(), Some("token"));
    }

    #[test]
    fn test_open_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("taiga.db");
        {
            let store = SqliteStore::open(&path).unwrap();
            store.set_raw("merge_watching", "true").unwrap();
        }
        let store = SqliteStore::open(&path).unwrap();
        assert_eq!(store.get_raw("merge_watching").as_deref(), Some("true"));
    }
}
