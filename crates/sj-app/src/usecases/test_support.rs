//! Shared fakes for the use case unit tests.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use mockall::mock;

use sj_core::ports::{AccountApiPort, ApiError, FlagsStorePort, LoginGrant, ScreenRouterPort};
use sj_core::{
    AccessToken, FlagKey, MasterPasswordState, MasterPin, RoutingDecision, TransactionPage,
    UserSnapshot,
};

/// In-memory flags store with switchable failures.
#[derive(Default)]
pub struct MemoryFlagsStore {
    values: Mutex<HashMap<FlagKey, String>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl MemoryFlagsStore {
    pub fn with_token(token: &str) -> Self {
        let store = Self::default();
        store.set_now(FlagKey::Token, token);
        store
    }

    pub fn set_now(&self, key: FlagKey, value: &str) {
        self.values.lock().unwrap().insert(key, value.to_string());
    }

    pub fn value(&self, key: FlagKey) -> Option<String> {
        self.values.lock().unwrap().get(&key).cloned()
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl FlagsStorePort for MemoryFlagsStore {
    async fn get(&self, key: FlagKey) -> anyhow::Result<Option<String>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            anyhow::bail!("storage unavailable");
        }
        Ok(self.value(key))
    }

    async fn set(&self, key: FlagKey, value: &str) -> anyhow::Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            anyhow::bail!("storage unavailable");
        }
        self.set_now(key, value);
        Ok(())
    }

    async fn remove(&self, key: FlagKey) -> anyhow::Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            anyhow::bail!("storage unavailable");
        }
        self.values.lock().unwrap().remove(&key);
        Ok(())
    }
}

/// Router that records what it was asked to do.
#[derive(Default)]
pub struct RecordingRouter {
    pub splash_hidden: AtomicUsize,
    pub mounted: Mutex<Vec<RoutingDecision>>,
}

impl RecordingRouter {
    pub fn mounted(&self) -> Vec<RoutingDecision> {
        self.mounted.lock().unwrap().clone()
    }
}

#[async_trait]
impl ScreenRouterPort for RecordingRouter {
    async fn hide_splash(&self) -> anyhow::Result<()> {
        self.splash_hidden.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn mount(&self, decision: RoutingDecision) -> anyhow::Result<()> {
        self.mounted.lock().unwrap().push(decision);
        Ok(())
    }
}

/// Account API that replays queued responses per endpoint and counts calls.
///
/// An endpoint with an empty queue answers with a transport error.
#[derive(Default)]
pub struct ScriptedAccountApi {
    pub user_details: Mutex<VecDeque<Result<UserSnapshot, ApiError>>>,
    pub master_password: Mutex<VecDeque<Result<MasterPasswordState, ApiError>>>,
    pub refresh: Mutex<VecDeque<Result<AccessToken, ApiError>>>,
    pub transactions: Mutex<VecDeque<Result<TransactionPage, ApiError>>>,
    pub user_details_calls: AtomicUsize,
    pub master_password_calls: AtomicUsize,
    pub refresh_calls: AtomicUsize,
    pub transactions_calls: AtomicUsize,
}

impl ScriptedAccountApi {
    pub fn push_user(&self, response: Result<UserSnapshot, ApiError>) -> &Self {
        self.user_details.lock().unwrap().push_back(response);
        self
    }

    pub fn push_master_password(&self, response: Result<MasterPasswordState, ApiError>) -> &Self {
        self.master_password.lock().unwrap().push_back(response);
        self
    }

    pub fn push_refresh(&self, response: Result<AccessToken, ApiError>) -> &Self {
        self.refresh.lock().unwrap().push_back(response);
        self
    }

    pub fn push_transactions(&self, response: Result<TransactionPage, ApiError>) -> &Self {
        self.transactions.lock().unwrap().push_back(response);
        self
    }

    pub fn total_calls(&self) -> usize {
        self.user_details_calls.load(Ordering::SeqCst)
            + self.master_password_calls.load(Ordering::SeqCst)
            + self.refresh_calls.load(Ordering::SeqCst)
            + self.transactions_calls.load(Ordering::SeqCst)
    }
}

fn next<T>(queue: &Mutex<VecDeque<Result<T, ApiError>>>, calls: &AtomicUsize) -> Result<T, ApiError> {
    calls.fetch_add(1, Ordering::SeqCst);
    queue
        .lock()
        .unwrap()
        .pop_front()
        .unwrap_or_else(|| Err(ApiError::Network("no scripted response".into())))
}

#[async_trait]
impl AccountApiPort for ScriptedAccountApi {
    async fn get_user_details(&self) -> Result<UserSnapshot, ApiError> {
        next(&self.user_details, &self.user_details_calls)
    }

    async fn is_master_password_set(&self) -> Result<MasterPasswordState, ApiError> {
        next(&self.master_password, &self.master_password_calls)
    }

    async fn refresh_token(&self) -> Result<AccessToken, ApiError> {
        next(&self.refresh, &self.refresh_calls)
    }

    async fn request_login_otp(&self, _email: &str) -> Result<(), ApiError> {
        Err(ApiError::Network("not scripted".into()))
    }

    async fn verify_login_otp(&self, _email: &str, _otp: &str) -> Result<LoginGrant, ApiError> {
        Err(ApiError::Network("not scripted".into()))
    }

    async fn validate_master_password(&self, _pin: &MasterPin) -> Result<(), ApiError> {
        Err(ApiError::Network("not scripted".into()))
    }

    async fn set_master_password(&self, _pin: &MasterPin) -> Result<(), ApiError> {
        Err(ApiError::Network("not scripted".into()))
    }

    async fn list_transactions(&self, _profile_id: &str) -> Result<TransactionPage, ApiError> {
        next(&self.transactions, &self.transactions_calls)
    }
}

mock! {
    pub AccountApi {}

    #[async_trait]
    impl AccountApiPort for AccountApi {
        async fn get_user_details(&self) -> Result<UserSnapshot, ApiError>;
        async fn is_master_password_set(&self) -> Result<MasterPasswordState, ApiError>;
        async fn refresh_token(&self) -> Result<AccessToken, ApiError>;
        async fn request_login_otp(&self, email: &str) -> Result<(), ApiError>;
        async fn verify_login_otp(&self, email: &str, otp: &str) -> Result<LoginGrant, ApiError>;
        async fn validate_master_password(&self, pin: &MasterPin) -> Result<(), ApiError>;
        async fn set_master_password(&self, pin: &MasterPin) -> Result<(), ApiError>;
        async fn list_transactions(&self, profile_id: &str) -> Result<TransactionPage, ApiError>;
    }
}

/// User with the given profile ids.
pub fn user_with_profiles(ids: &[&str]) -> UserSnapshot {
    let profiles = ids
        .iter()
        .map(|id| {
            serde_json::json!({
                "_id": id,
                "userId": "u-1",
                "profileName": format!("profile {id}"),
            })
        })
        .collect::<Vec<_>>();
    serde_json::from_value(serde_json::json!({
        "user_id": "u-1",
        "user_name": "Asha",
        "profile": profiles,
    }))
    .unwrap()
}
