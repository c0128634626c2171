use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info, info_span, warn, Instrument};

use sj_core::ports::{AccountApiPort, ApiError};
use sj_core::{AccessToken, FlagKey, Session};

use super::flags::SessionFlags;

/// Single writer of the persisted session token.
///
/// Sign-in, sign-out and refresh all run under the same lock, so two token
/// writes never interleave and the last completed write is the one on disk.
pub struct SessionManager {
    flags: SessionFlags,
    api: Arc<dyn AccountApiPort>,
    session: Mutex<Session>,
}

impl SessionManager {
    pub fn new(flags: SessionFlags, api: Arc<dyn AccountApiPort>) -> Self {
        Self {
            flags,
            api,
            session: Mutex::new(Session::default()),
        }
    }

    /// Read the persisted token into memory.
    ///
    /// Unlike other flag reads, a storage failure is returned so the resolver
    /// can classify it. The in-memory session is left signed out in that case.
    pub async fn load(&self) -> anyhow::Result<Session> {
        let mut session = self.session.lock().await;
        let stored = self.flags.try_get(FlagKey::Token).await;
        session.is_loading = false;
        match stored {
            Ok(value) => {
                session.token = value.and_then(AccessToken::from_stored);
                debug!(authenticated = session.is_authenticated(), "session loaded");
                Ok(session.clone())
            }
            Err(err) => {
                session.token = None;
                Err(err)
            }
        }
    }

    pub async fn current(&self) -> Session {
        self.session.lock().await.clone()
    }

    pub async fn sign_in(&self, token: AccessToken) {
        let mut session = self.session.lock().await;
        self.flags.set(FlagKey::Token, token.expose()).await;
        session.token = Some(token);
        session.is_loading = false;
        info!("signed in");
    }

    /// Drop the token and every cache tied to it.
    pub async fn sign_out(&self) {
        let mut session = self.session.lock().await;
        self.flags.remove_many(&FlagKey::SESSION_SCOPED).await;
        session.token = None;
        session.is_loading = false;
        info!("signed out");
    }

    /// Sign out only if `expected` is still the session token.
    ///
    /// A run that loaded or refreshed `expected` uses this to clear its own
    /// session without touching a token written by a later sign-in.
    pub async fn sign_out_if(&self, expected: &AccessToken) -> bool {
        let mut session = self.session.lock().await;
        if session.token.as_ref() != Some(expected) {
            debug!("session token replaced since it was read, keeping it");
            return false;
        }
        self.flags.remove_many(&FlagKey::SESSION_SCOPED).await;
        session.token = None;
        session.is_loading = false;
        info!("signed out");
        true
    }

    /// Exchange the current token for a new one.
    ///
    /// The new token is persisted only on success. On failure nothing is
    /// written; deciding whether to sign out is up to the caller.
    pub async fn refresh(&self) -> Result<AccessToken, ApiError> {
        let span = info_span!("usecase.session.refresh");
        async {
            let mut session = self.session.lock().await;
            match self.api.refresh_token().await {
                Ok(token) => {
                    self.flags.set(FlagKey::Token, token.expose()).await;
                    session.token = Some(token.clone());
                    info!("token refreshed");
                    Ok(token)
                }
                Err(err) => {
                    warn!(error = %err, "token refresh failed");
                    Err(err)
                }
            }
        }
        .instrument(span)
        .await
    }
}
