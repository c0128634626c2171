//! Bootstrap state machine.
//!
//! Pure transition function for the session bootstrap resolver. The
//! orchestrator in the application layer executes the returned actions and
//! feeds their outcome back as events until a `Done` state is reached.

use crate::bootstrap::RoutingDecision;
use crate::master_password::MasterPasswordState;
use crate::ports::ApiError;

/// Which fetch attempt is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum FetchPass {
    /// Fetch with the token read at start.
    First,
    /// Fetch after one successful token refresh. A 401 here is terminal.
    Retry,
}

/// Resolver-internal state. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum BootstrapState {
    /// Waiting for the persisted session to be read.
    Start,
    /// User details and master password state requested.
    FetchingUser { pass: FetchPass },
    /// Token refresh requested after a 401.
    Refreshing,
    /// Terminal state carrying the decision and, for failure paths, why.
    Done {
        decision: RoutingDecision,
        failure: Option<BootstrapFailure>,
    },
}

impl BootstrapState {
    pub fn decision(&self) -> Option<RoutingDecision> {
        match self {
            BootstrapState::Done { decision, .. } => Some(*decision),
            _ => None,
        }
    }
}

/// Outcomes fed back into the machine.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum BootstrapEvent {
    /// Persisted session read.
    SessionLoaded {
        token_present: bool,
        welcome_seen: bool,
    },
    /// The token could not be read at all.
    StorageUnavailable,
    /// Both remote reads succeeded.
    FetchSucceeded {
        master_password: MasterPasswordState,
    },
    /// At least one remote read failed.
    FetchFailed { failure: BootstrapFailure },
    /// A new token was obtained and persisted.
    RefreshSucceeded,
    RefreshFailed,
}

/// Side effects requested by a transition.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum BootstrapAction {
    /// Read the token and the welcome flag.
    LoadSession,
    /// Call the user details and master password endpoints concurrently.
    FetchUserAndMasterPassword,
    /// Refresh the token once and persist it on success.
    RefreshToken,
    /// Sign out: drop the persisted token and session caches.
    ClearSession,
}

/// Why a bootstrap ended somewhere other than the master password gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum BootstrapFailure {
    /// 401 from the server. Triggers a single refresh.
    AuthExpired,
    /// Refresh failed, or the refreshed token was rejected.
    AuthInvalid,
    /// Timeout, transport error or unexpected response.
    TransientNetwork,
    /// Persisted storage could not be read.
    StorageUnavailable,
}

impl BootstrapFailure {
    pub fn classify(error: &ApiError) -> Self {
        match error {
            ApiError::Unauthorized => BootstrapFailure::AuthExpired,
            ApiError::Rejected { .. }
            | ApiError::Timeout
            | ApiError::Network(_)
            | ApiError::Decode(_) => BootstrapFailure::TransientNetwork,
        }
    }

    /// Combine the outcome of the two concurrent fetches.
    ///
    /// A 401 on either side wins so that the refresh path is taken
    /// regardless of which call completed first.
    pub fn merge(a: Option<Self>, b: Option<Self>) -> Option<Self> {
        match (a, b) {
            (Some(BootstrapFailure::AuthExpired), _) | (_, Some(BootstrapFailure::AuthExpired)) => {
                Some(BootstrapFailure::AuthExpired)
            }
            (Some(f), _) | (_, Some(f)) => Some(f),
            (None, None) => None,
        }
    }
}

impl From<&ApiError> for BootstrapFailure {
    fn from(error: &ApiError) -> Self {
        Self::classify(error)
    }
}

/// Pure bootstrap state machine.
pub struct BootstrapStateMachine;

impl BootstrapStateMachine {
    /// Initial state and the action that kicks off a run.
    pub fn start() -> (BootstrapState, Vec<BootstrapAction>) {
        (BootstrapState::Start, vec![BootstrapAction::LoadSession])
    }

    pub fn transition(
        state: BootstrapState,
        event: BootstrapEvent,
    ) -> (BootstrapState, Vec<BootstrapAction>) {
        match (state, event) {
            (
                BootstrapState::Start,
                BootstrapEvent::SessionLoaded {
                    token_present: false,
                    welcome_seen,
                },
            ) => {
                let decision = if welcome_seen {
                    RoutingDecision::ShowLogin
                } else {
                    RoutingDecision::ShowWelcome
                };
                (
                    BootstrapState::Done {
                        decision,
                        failure: None,
                    },
                    Vec::new(),
                )
            }
            (
                BootstrapState::Start,
                BootstrapEvent::SessionLoaded {
                    token_present: true,
                    ..
                },
            ) => (
                BootstrapState::FetchingUser {
                    pass: FetchPass::First,
                },
                vec![BootstrapAction::FetchUserAndMasterPassword],
            ),
            (BootstrapState::Start, BootstrapEvent::StorageUnavailable) => (
                BootstrapState::Done {
                    decision: RoutingDecision::ShowWelcome,
                    failure: Some(BootstrapFailure::StorageUnavailable),
                },
                Vec::new(),
            ),
            (
                BootstrapState::FetchingUser { .. },
                BootstrapEvent::FetchSucceeded { master_password },
            ) => (
                BootstrapState::Done {
                    decision: decide(master_password),
                    failure: None,
                },
                Vec::new(),
            ),
            (
                BootstrapState::FetchingUser {
                    pass: FetchPass::First,
                },
                BootstrapEvent::FetchFailed {
                    failure: BootstrapFailure::AuthExpired,
                },
            ) => (
                BootstrapState::Refreshing,
                vec![BootstrapAction::RefreshToken],
            ),
            (
                BootstrapState::FetchingUser {
                    pass: FetchPass::Retry,
                },
                BootstrapEvent::FetchFailed {
                    failure: BootstrapFailure::AuthExpired,
                },
            ) => (
                BootstrapState::Done {
                    decision: RoutingDecision::ShowLogin,
                    failure: Some(BootstrapFailure::AuthInvalid),
                },
                vec![BootstrapAction::ClearSession],
            ),
            (BootstrapState::FetchingUser { .. }, BootstrapEvent::FetchFailed { failure }) => (
                BootstrapState::Done {
                    decision: RoutingDecision::ShowWelcome,
                    failure: Some(failure),
                },
                Vec::new(),
            ),
            (BootstrapState::Refreshing, BootstrapEvent::RefreshSucceeded) => (
                BootstrapState::FetchingUser {
                    pass: FetchPass::Retry,
                },
                vec![BootstrapAction::FetchUserAndMasterPassword],
            ),
            (BootstrapState::Refreshing, BootstrapEvent::RefreshFailed) => (
                BootstrapState::Done {
                    decision: RoutingDecision::ShowWelcome,
                    failure: Some(BootstrapFailure::AuthInvalid),
                },
                vec![BootstrapAction::ClearSession],
            ),
            (state, event) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(state = ?state, event = ?event, "ignored bootstrap event");
                #[cfg(not(feature = "tracing"))]
                let _ = event;
                (state, Vec::new())
            }
        }
    }
}

fn decide(master_password: MasterPasswordState) -> RoutingDecision {
    if master_password.is_set() {
        RoutingDecision::ShowMasterPasswordEntry
    } else {
        RoutingDecision::ShowSetMasterPassword
    }
}
