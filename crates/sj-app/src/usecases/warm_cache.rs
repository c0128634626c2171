use std::sync::Arc;

use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info_span, warn, Instrument};

use sj_core::ports::AccountApiPort;
use sj_core::{FlagKey, UserSnapshot};

use super::flags::SessionFlags;
use super::navigation::RunGuard;

/// User snapshot as stored under `cachedUserDetails`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedUserDetails {
    pub cached_at: DateTime<Utc>,
    pub user: UserSnapshot,
}

/// Best-effort prefetch of the data the home screen shows first.
///
/// Runs after a decision has been mounted. Nothing it does can change that
/// decision: every failure is logged and swallowed. Each write is dropped
/// once `guard` is superseded, so a sign-out or newer bootstrap that lands
/// mid-warm is never overwritten with the old user's data.
pub struct WarmSessionCache {
    flags: SessionFlags,
    api: Arc<dyn AccountApiPort>,
}

impl WarmSessionCache {
    pub fn new(flags: SessionFlags, api: Arc<dyn AccountApiPort>) -> Self {
        Self { flags, api }
    }

    pub async fn execute(&self, user: &UserSnapshot, guard: &RunGuard) {
        let span = info_span!(
            "usecase.warm_session_cache.execute",
            generation = guard.ticket().value()
        );
        if let Err(err) = self.warm(user, guard).instrument(span).await {
            warn!(error = %err, "cache warming failed");
        }
    }

    async fn warm(&self, user: &UserSnapshot, guard: &RunGuard) -> anyhow::Result<()> {
        let cached = CachedUserDetails {
            cached_at: Utc::now(),
            user: user.clone(),
        };
        let json = serde_json::to_string(&cached).context("failed to encode user details")?;
        if !guard.is_current() {
            debug!("superseded before caching user details");
            return Ok(());
        }
        self.flags.set(FlagKey::CachedUserDetails, &json).await;

        let selected = self.flags.selected_profile().await;
        let Some(index) = user.clamp_profile_index(selected) else {
            debug!("user has no profile, skipping transactions");
            return Ok(());
        };
        let profile = user
            .profile_at(index)
            .context("clamped profile index out of range")?;

        let page = self
            .api
            .list_transactions(&profile.id)
            .await
            .with_context(|| format!("failed to list transactions of profile {}", profile.id))?;
        let json = serde_json::to_string(&page).context("failed to encode transactions")?;
        if !guard.is_current() {
            debug!("superseded while fetching transactions, dropping them");
            return Ok(());
        }
        self.flags.set(FlagKey::CachedTransactions, &json).await;
        debug!(
            profile_index = index,
            count = page.data.len(),
            "session cache warmed"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecases::navigation::BootstrapGeneration;
    use crate::usecases::test_support::{user_with_profiles, MemoryFlagsStore, ScriptedAccountApi};
    use sj_core::ports::ApiError;
    use sj_core::TransactionPage;
    use std::sync::atomic::Ordering;

    fn current_guard() -> RunGuard {
        let generation = Arc::new(BootstrapGeneration::new());
        RunGuard::new(generation.clone(), generation.advance())
    }

    fn page(count: u64) -> TransactionPage {
        TransactionPage {
            success: true,
            count,
            data: Vec::new(),
        }
    }

    #[tokio::test]
    async fn warm_stores_user_and_transactions_of_clamped_profile() {
        let store = Arc::new(MemoryFlagsStore::default());
        store.set_now(FlagKey::ProfileSelected, "5");
        let api = Arc::new(ScriptedAccountApi::default());
        api.push_transactions(Ok(page(3)));
        let warm = WarmSessionCache::new(SessionFlags::new(store.clone()), api.clone());
        let user = user_with_profiles(&["p-1", "p-2"]);

        warm.execute(&user, &current_guard()).await;

        let cached = SessionFlags::new(store.clone()).cached_user().await.unwrap();
        assert_eq!(cached.user, user);
        let stored: TransactionPage =
            serde_json::from_str(&store.value(FlagKey::CachedTransactions).unwrap()).unwrap();
        assert_eq!(stored.count, 3);
        assert_eq!(api.transactions_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn warm_without_profiles_skips_transaction_fetch() {
        let store = Arc::new(MemoryFlagsStore::default());
        let api = Arc::new(ScriptedAccountApi::default());
        let warm = WarmSessionCache::new(SessionFlags::new(store.clone()), api.clone());

        warm.execute(&user_with_profiles(&[]), &current_guard()).await;

        assert!(store.value(FlagKey::CachedUserDetails).is_some());
        assert_eq!(store.value(FlagKey::CachedTransactions), None);
        assert_eq!(api.total_calls(), 0);
    }

    #[tokio::test]
    async fn warm_swallows_transaction_failure() {
        let store = Arc::new(MemoryFlagsStore::default());
        let api = Arc::new(ScriptedAccountApi::default());
        api.push_transactions(Err(ApiError::Timeout));
        let warm = WarmSessionCache::new(SessionFlags::new(store.clone()), api);

        warm.execute(&user_with_profiles(&["p-1"]), &current_guard()).await;

        assert!(store.value(FlagKey::CachedUserDetails).is_some());
        assert_eq!(store.value(FlagKey::CachedTransactions), None);
    }

    #[tokio::test]
    async fn superseded_warm_writes_nothing() {
        let store = Arc::new(MemoryFlagsStore::default());
        let api = Arc::new(ScriptedAccountApi::default());
        api.push_transactions(Ok(page(1)));
        let warm = WarmSessionCache::new(SessionFlags::new(store.clone()), api);
        let generation = Arc::new(BootstrapGeneration::new());
        let guard = RunGuard::new(generation.clone(), generation.advance());
        generation.advance();

        warm.execute(&user_with_profiles(&["p-1"]), &guard).await;

        assert_eq!(store.value(FlagKey::CachedUserDetails), None);
        assert_eq!(store.value(FlagKey::CachedTransactions), None);
    }
}
