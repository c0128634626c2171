//! File-based flags store
//!
//! Persists all flags as one JSON object (`{"token": "...", ...}`) in the
//! application data directory. Writes go to a temporary sibling file that is
//! then renamed over the target, so a crash never leaves a half-written store.

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::Context;
use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{debug, warn};
use uuid::Uuid;

use sj_core::ports::FlagsStorePort;
use sj_core::FlagKey;

pub const DEFAULT_FLAGS_FILE: &str = "flags.json";

type FlagMap = BTreeMap<String, String>;

pub struct FileFlagsStore {
    path: PathBuf,
    /// Serializes read-modify-write cycles within this process.
    lock: Mutex<()>,
}

impl FileFlagsStore {
    /// Create store with custom file path
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            lock: Mutex::new(()),
        }
    }

    /// Create store with defaults
    pub fn with_defaults(base_dir: PathBuf) -> Self {
        Self::new(base_dir.join(DEFAULT_FLAGS_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn ensure_parent_dir(&self) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }
        Ok(())
    }

    async fn read_map(&self) -> anyhow::Result<FlagMap> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(FlagMap::new()),
            Err(err) => {
                return Err(err).with_context(|| {
                    format!("Failed to read flags file {}", self.path.display())
                })
            }
        };

        if content.trim().is_empty() {
            return Ok(FlagMap::new());
        }

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse flags file {}", self.path.display()))
    }

    /// Read for a write cycle: a corrupt file is replaced rather than
    /// blocking every later write.
    async fn read_map_for_update(&self) -> anyhow::Result<FlagMap> {
        match self.read_map().await {
            Ok(map) => Ok(map),
            Err(err) if err.downcast_ref::<serde_json::Error>().is_some() => {
                warn!(error = %err, "flags file is corrupt, starting from an empty store");
                Ok(FlagMap::new())
            }
            Err(err) => Err(err),
        }
    }

    async fn write_map(&self, map: &FlagMap) -> anyhow::Result<()> {
        self.ensure_parent_dir().await?;

        let json = serde_json::to_string_pretty(map).context("Failed to serialize flags")?;
        let tmp_path = self
            .path
            .with_extension(format!("{}.tmp", Uuid::new_v4().simple()));

        let mut file = fs::File::create(&tmp_path)
            .await
            .with_context(|| format!("Failed to create {}", tmp_path.display()))?;
        file.write_all(json.as_bytes())
            .await
            .context("Failed to write flags file")?;
        file.sync_all().await.context("Failed to sync flags file")?;
        drop(file);

        if let Err(err) = fs::rename(&tmp_path, &self.path).await {
            let _ = fs::remove_file(&tmp_path).await;
            return Err(err).with_context(|| {
                format!("Failed to replace flags file {}", self.path.display())
            });
        }
        Ok(())
    }
}

#[async_trait]
impl FlagsStorePort for FileFlagsStore {
    async fn get(&self, key: FlagKey) -> anyhow::Result<Option<String>> {
        let _guard = self.lock.lock().await;
        Ok(self.read_map().await?.get(key.as_str()).cloned())
    }

    async fn set(&self, key: FlagKey, value: &str) -> anyhow::Result<()> {
        let _guard = self.lock.lock().await;
        let mut map = self.read_map_for_update().await?;
        map.insert(key.as_str().to_string(), value.to_string());
        self.write_map(&map).await?;
        debug!(key = %key, "flag written");
        Ok(())
    }

    async fn remove(&self, key: FlagKey) -> anyhow::Result<()> {
        self.remove_many(&[key]).await
    }

    async fn remove_many(&self, keys: &[FlagKey]) -> anyhow::Result<()> {
        let _guard = self.lock.lock().await;
        let mut map = self.read_map_for_update().await?;
        let before = map.len();
        for key in keys {
            map.remove(key.as_str());
        }
        if map.len() != before {
            self.write_map(&map).await?;
            debug!(keys = ?keys, "flags removed");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_get_returns_none_when_file_not_exists() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileFlagsStore::new(temp_dir.path().join("missing.json"));

        assert_eq!(store.get(FlagKey::Token).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_then_get_uses_legacy_key_names() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileFlagsStore::with_defaults(temp_dir.path().join("nested"));

        store.set(FlagKey::HasSeenWelcome, "true").await.unwrap();
        store.set(FlagKey::Token, "abc123").await.unwrap();

        assert_eq!(
            store.get(FlagKey::Token).await.unwrap().as_deref(),
            Some("abc123")
        );
        let raw = std::fs::read_to_string(store.path()).unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(json["hasSeenWelcome"], "true");
        assert_eq!(json["token"], "abc123");
    }

    #[tokio::test]
    async fn test_empty_file_is_empty_store() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("flags.json");
        std::fs::write(&path, "  \n").unwrap();
        let store = FileFlagsStore::new(path);

        assert_eq!(store.get(FlagKey::ColorId).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_corrupt_file_fails_reads_but_is_replaced_on_write() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("flags.json");
        std::fs::write(&path, "{not json").unwrap();
        let store = FileFlagsStore::new(path);

        assert!(store.get(FlagKey::Token).await.is_err());

        store.set(FlagKey::Token, "fresh").await.unwrap();
        assert_eq!(
            store.get(FlagKey::Token).await.unwrap().as_deref(),
            Some("fresh")
        );
    }

    #[tokio::test]
    async fn test_remove_many_keeps_other_keys() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileFlagsStore::new(temp_dir.path().join("flags.json"));
        store.set(FlagKey::Token, "abc123").await.unwrap();
        store.set(FlagKey::CachedUserDetails, "{}").await.unwrap();
        store.set(FlagKey::HasSeenWelcome, "true").await.unwrap();

        store
            .remove_many(&FlagKey::SESSION_SCOPED)
            .await
            .unwrap();

        assert_eq!(store.get(FlagKey::Token).await.unwrap(), None);
        assert_eq!(store.get(FlagKey::CachedUserDetails).await.unwrap(), None);
        assert_eq!(
            store.get(FlagKey::HasSeenWelcome).await.unwrap().as_deref(),
            Some("true")
        );
    }

    #[tokio::test]
    async fn test_remove_absent_key_is_ok_and_creates_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileFlagsStore::new(temp_dir.path().join("flags.json"));

        store.remove(FlagKey::Token).await.unwrap();

        assert!(!store.path().exists());
    }

    #[tokio::test]
    async fn test_no_temp_files_left_behind() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileFlagsStore::new(temp_dir.path().join("flags.json"));

        for i in 0..5 {
            store
                .set(FlagKey::ProfileSelected, &i.to_string())
                .await
                .unwrap();
        }

        let entries = std::fs::read_dir(temp_dir.path()).unwrap().count();
        assert_eq!(entries, 1);
    }
}
