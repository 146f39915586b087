//! Persistent state capability.
//!
//! The engine's two stateful components (preference store and context
//! manager) persist opaque JSON blobs into named slots. The concrete
//! medium is a collaborator's concern; the engine only requires that a
//! blob saved under a slot name comes back unchanged. Implementations are
//! not expected to interpret blob contents.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

/// Slot-addressed blob storage.
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Load the blob stored under `slot`, or `None` when nothing was ever
    /// saved there.
    async fn load(&self, slot: &str) -> Result<Option<Value>, anyhow::Error>;

    /// Save `blob` under `slot`, replacing any previous value.
    async fn save(&self, slot: &str, blob: &Value) -> Result<(), anyhow::Error>;
}

/// Non-durable in-process store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    slots: Mutex<HashMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StateStore for MemoryStore {
    async fn load(&self, slot: &str) -> Result<Option<Value>, anyhow::Error> {
        let slots = self
            .slots
            .lock()
            .map_err(|_| anyhow::anyhow!("memory store poisoned"))?;
        Ok(slots.get(slot).cloned())
    }

    async fn save(&self, slot: &str, blob: &Value) -> Result<(), anyhow::Error> {
        let mut slots = self
            .slots
            .lock()
            .map_err(|_| anyhow::anyhow!("memory store poisoned"))?;
        slots.insert(slot.to_string(), blob.clone());
        Ok(())
    }
}

/// Durable store keeping one pretty-printed JSON file per slot.
#[derive(Debug, Clone)]
pub struct FileStore {
    /// Directory holding the slot files; created on first save.
    pub directory: PathBuf,
}

impl FileStore {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    fn slot_path(&self, slot: &str) -> PathBuf {
        self.directory.join(format!("{}.json", slot))
    }
}

#[async_trait]
impl StateStore for FileStore {
    async fn load(&self, slot: &str) -> Result<Option<Value>, anyhow::Error> {
        let path = self.slot_path(slot);
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&path)?;
        Ok(Some(serde_json::from_str(&content)?))
    }

    async fn save(&self, slot: &str, blob: &Value) -> Result<(), anyhow::Error> {
        let dir = Path::new(&self.directory);
        if !dir.exists() {
            std::fs::create_dir_all(dir)?;
        }
        let content = serde_json::to_string_pretty(blob)?;
        std::fs::write(self.slot_path(slot), content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_memory_store_round_trip() {
        let store = MemoryStore::new();
        assert!(store.load("preferences").await.unwrap().is_none());

        let blob = json!({ "preferences": [["voiceSpeed", "slow"]], "lastUpdated": 1 });
        store.save("preferences", &blob).await.unwrap();
        assert_eq!(store.load("preferences").await.unwrap(), Some(blob));
    }

    #[tokio::test]
    async fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("state"));

        assert!(store.load("context-manager-state").await.unwrap().is_none());

        let blob = json!({ "userPreferences": [], "history": [], "lastSaved": 7 });
        store.save("context-manager-state", &blob).await.unwrap();
        assert_eq!(
            store.load("context-manager-state").await.unwrap(),
            Some(blob)
        );
    }

    #[tokio::test]
    async fn test_file_store_corrupt_slot_errors() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        std::fs::write(dir.path().join("preferences.json"), "not json").unwrap();
        assert!(store.load("preferences").await.is_err());
    }
}
