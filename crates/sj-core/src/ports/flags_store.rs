//! Persisted flags store port
//!
//! Small string key-value store that survives restarts. Every operation may
//! fail (storage unavailable); how a failure is treated is decided by the
//! caller, not by the implementation.

use async_trait::async_trait;

use crate::flags::FlagKey;

#[async_trait]
pub trait FlagsStorePort: Send + Sync {
    /// Read a value. `Ok(None)` when the key was never written.
    async fn get(&self, key: FlagKey) -> anyhow::Result<Option<String>>;

    /// Write a value, overwriting any previous one.
    async fn set(&self, key: FlagKey, value: &str) -> anyhow::Result<()>;

    /// Remove a key. Removing an absent key is not an error.
    async fn remove(&self, key: FlagKey) -> anyhow::Result<()>;

    /// Remove several keys in one write.
    async fn remove_many(&self, keys: &[FlagKey]) -> anyhow::Result<()> {
        for key in keys {
            self.remove(*key).await?;
        }
        Ok(())
    }
}
