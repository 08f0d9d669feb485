//! Whole-store backup blobs.
//!
//! A backup is the entire config store serialized as one JSON object and
//! base64-encoded. Values stay opaque at this layer; whatever nested
//! binary/date conventions the producing collaborator uses ride along
//! unchanged.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::config::ConfigStore;
use crate::error::CoreError;

/// Serialize every key of the store into a base64 JSON blob.
pub fn export<C: ConfigStore>(store: &C) -> Result<String, CoreError> {
    let mut map = serde_json::Map::new();
    for key in store.keys() {
        if let Some(raw) = store.get_raw(&key) {
            let value = serde_json::from_str(&raw).unwrap_or(serde_json::Value::String(raw));
            map.insert(key, value);
        }
    }
    let json = serde_json::to_string(&serde_json::Value::Object(map))?;
    Ok(STANDARD.encode(json))
}

/// Decode a backup blob and write every key back into the store.
pub fn import<C: ConfigStore>(store: &C, blob: &str) -> Result<(), CoreError> {
    let bytes = STANDARD
        .decode(blob.trim())
        .map_err(|e| CoreError::Config(format!("invalid backup encoding: {e}")))?;
    let json: serde_json::Value = serde_json::from_slice(&bytes)?;
    let map = json
        .as_object()
        .ok_or_else(|| CoreError::Config("backup root is not an object".into()))?;

    for (key, value) in map {
        store.set_raw(key, &serde_json::to_string(value)?)?;
    }
    tracing::info!(keys = map.len(), "backup imported");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MemoryConfigStore;

    #[test]
    fn test_roundtrip() {
        let source = MemoryConfigStore::new();
        source.set_json("selected_provider", &"kitsu").unwrap();
        source.set_json("max_retries", &3u32).unwrap();
        source
            .set_json("favorites", &vec!["https://example.com/a"])
            .unwrap();

        let blob = export(&source).unwrap();

        let target = MemoryConfigStore::new();
        import(&target, &blob).unwrap();

        assert_eq!(target.selected_provider().as_deref(), Some("kitsu"));
        assert_eq!(target.max_retries(), 3);
        let favorites: Vec<String> = target.get_json("favorites").unwrap();
        assert_eq!(favorites, vec!["https://example.com/a"]);
    }

    #[test]
    fn test_import_rejects_garbage() {
        let store = MemoryConfigStore::new();
        assert!(import(&store, "not base64 at all!!!").is_err());
        assert!(store.keys().is_empty());
    }

    #[test]
    fn test_import_rejects_non_object_root() {
        let store = MemoryConfigStore::new();
        let blob = STANDARD.encode("[1,2,3]");
        assert!(import(&store, &blob).is_err());
    }
}
