//! Master password gate.
//!
//! Both use cases validate the PIN shape locally, call the server with one
//! refresh-and-retry on 401, and route home on success. An expired session
//! that cannot be refreshed is signed out and routed to login.

use std::sync::Arc;

use tracing::{info, info_span, warn, Instrument};

use sj_core::ports::{AccountApiPort, ApiError};
use sj_core::{MasterPin, MasterPinError, RoutingDecision};

use super::navigation::ScreenNavigator;
use super::session::SessionManager;

const DEFAULT_REJECTION: &str = "Verification failed";

#[derive(Debug, thiserror::Error)]
pub enum MasterPasswordError {
    #[error(transparent)]
    InvalidPin(#[from] MasterPinError),
    /// The server refused the PIN. Carries the server message when present.
    #[error("{message}")]
    Rejected { status: u16, message: String },
    #[error("session expired, sign in again")]
    SessionExpired,
    #[error("master password request failed: {0}")]
    Api(ApiError),
    #[error("failed to route after master password: {0}")]
    Routing(#[source] anyhow::Error),
}

#[derive(Debug, Clone, Copy)]
enum GateOp {
    Unlock,
    Set,
}

struct MasterPasswordGate {
    api: Arc<dyn AccountApiPort>,
    session: Arc<SessionManager>,
    navigator: Arc<ScreenNavigator>,
}

impl MasterPasswordGate {
    async fn submit(
        &self,
        op: GateOp,
        raw: &str,
    ) -> Result<RoutingDecision, MasterPasswordError> {
        let pin = MasterPin::parse(raw)?;

        let result = match self.call(op, &pin).await {
            Err(ApiError::Unauthorized) => {
                if let Err(err) = self.session.refresh().await {
                    warn!(error = %err, "refresh failed during master password check");
                    return Err(self.expire().await);
                }
                self.call(op, &pin).await
            }
            other => other,
        };

        match result {
            Ok(()) => {
                info!(op = ?op, "master password accepted");
                self.navigator
                    .route_now(RoutingDecision::ShowHome)
                    .await
                    .map_err(MasterPasswordError::Routing)?;
                Ok(RoutingDecision::ShowHome)
            }
            Err(ApiError::Unauthorized) => Err(self.expire().await),
            Err(ApiError::Rejected { status, message }) => Err(MasterPasswordError::Rejected {
                status,
                message: message.unwrap_or_else(|| DEFAULT_REJECTION.to_string()),
            }),
            Err(err) => Err(MasterPasswordError::Api(err)),
        }
    }

    async fn call(&self, op: GateOp, pin: &MasterPin) -> Result<(), ApiError> {
        match op {
            GateOp::Unlock => self.api.validate_master_password(pin).await,
            GateOp::Set => self.api.set_master_password(pin).await,
        }
    }

    async fn expire(&self) -> MasterPasswordError {
        let ticket = self.navigator.begin();
        self.session.sign_out().await;
        if let Err(err) = self.navigator.commit(ticket, RoutingDecision::ShowLogin).await {
            warn!(error = %err, "failed to route to login after session expiry");
        }
        MasterPasswordError::SessionExpired
    }
}

/// Check the PIN of an account that already has one.
pub struct UnlockWithMasterPassword {
    gate: MasterPasswordGate,
}

impl UnlockWithMasterPassword {
    pub fn new(
        api: Arc<dyn AccountApiPort>,
        session: Arc<SessionManager>,
        navigator: Arc<ScreenNavigator>,
    ) -> Self {
        Self {
            gate: MasterPasswordGate {
                api,
                session,
                navigator,
            },
        }
    }

    pub async fn execute(&self, raw: &str) -> Result<RoutingDecision, MasterPasswordError> {
        self.gate
            .submit(GateOp::Unlock, raw)
            .instrument(info_span!("usecase.unlock_with_master_password.execute"))
            .await
    }
}

/// Register a PIN for an account that has none.
pub struct SetMasterPassword {
    gate: MasterPasswordGate,
}

impl SetMasterPassword {
    pub fn new(
        api: Arc<dyn AccountApiPort>,
        session: Arc<SessionManager>,
        navigator: Arc<ScreenNavigator>,
    ) -> Self {
        Self {
            gate: MasterPasswordGate {
                api,
                session,
                navigator,
            },
        }
    }

    pub async fn execute(&self, raw: &str) -> Result<RoutingDecision, MasterPasswordError> {
        self.gate
            .submit(GateOp::Set, raw)
            .instrument(info_span!("usecase.set_master_password.execute"))
            .await
    }
}
