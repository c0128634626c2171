use std::sync::Arc;

use tracing::warn;

use sj_core::flags::{bool_flag, parse_bool_flag};
use sj_core::ports::FlagsStorePort;
use sj_core::FlagKey;

use super::warm_cache::CachedUserDetails;

/// Flags store with the session failure policy applied.
///
/// Local flags are a non-critical cache: a failed read is reported as absent
/// and a failed write is logged and dropped. Callers that must tell "absent"
/// from "unreadable" use [`SessionFlags::try_get`].
#[derive(Clone)]
pub struct SessionFlags {
    store: Arc<dyn FlagsStorePort>,
}

impl SessionFlags {
    pub fn new(store: Arc<dyn FlagsStorePort>) -> Self {
        Self { store }
    }

    /// Raw read, errors included.
    pub async fn try_get(&self, key: FlagKey) -> anyhow::Result<Option<String>> {
        self.store.get(key).await
    }

    pub async fn get(&self, key: FlagKey) -> Option<String> {
        match self.store.get(key).await {
            Ok(value) => value,
            Err(err) => {
                warn!(key = %key, error = %err, "flags read failed, treating as absent");
                None
            }
        }
    }

    pub async fn set(&self, key: FlagKey, value: &str) {
        if let Err(err) = self.store.set(key, value).await {
            warn!(key = %key, error = %err, "flags write failed, ignoring");
        }
    }

    pub async fn remove(&self, key: FlagKey) {
        if let Err(err) = self.store.remove(key).await {
            warn!(key = %key, error = %err, "flags remove failed, ignoring");
        }
    }

    pub async fn remove_many(&self, keys: &[FlagKey]) {
        if let Err(err) = self.store.remove_many(keys).await {
            warn!(keys = ?keys, error = %err, "flags remove failed, ignoring");
        }
    }

    pub async fn get_bool(&self, key: FlagKey) -> bool {
        parse_bool_flag(self.get(key).await.as_deref())
    }

    pub async fn set_bool(&self, key: FlagKey, value: bool) {
        self.set(key, bool_flag(value)).await;
    }

    /// Selected profile index; unreadable or malformed values count as 0.
    pub async fn selected_profile(&self) -> usize {
        self.get(FlagKey::ProfileSelected)
            .await
            .and_then(|raw| raw.trim().parse().ok())
            .unwrap_or(0)
    }

    /// User snapshot written by the last cache warm, if it still decodes.
    pub async fn cached_user(&self) -> Option<CachedUserDetails> {
        let raw = self.get(FlagKey::CachedUserDetails).await?;
        match serde_json::from_str(&raw) {
            Ok(cached) => Some(cached),
            Err(err) => {
                warn!(error = %err, "cached user details are unreadable, ignoring");
                None
            }
        }
    }
}
