//! Bootstrap resolver.
//!
//! Drives [`BootstrapStateMachine`] to completion: executes each action the
//! machine asks for and feeds the outcome back as an event. A run always ends
//! with a decision; remote and storage failures only change which one.
//!
//! A guarded run re-checks its generation before every session write, so a
//! superseded run never refreshes or clears a session a newer run owns.

use std::collections::VecDeque;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, info, info_span, warn, Instrument};
use uuid::Uuid;

use sj_core::ports::{AccountApiPort, ApiError};
use sj_core::{
    AccessToken, BootstrapAction, BootstrapEvent, BootstrapFailure, BootstrapState,
    BootstrapStateMachine, FlagKey, RoutingDecision, UserSnapshot,
};

use crate::usecases::flags::SessionFlags;
use crate::usecases::navigation::RunGuard;
use crate::usecases::session::SessionManager;

/// Outcome of one resolver run.
#[derive(Debug, Clone, PartialEq)]
pub struct BootstrapResolution {
    pub decision: RoutingDecision,
    /// Why the run fell back to welcome/login, if it did.
    pub failure: Option<BootstrapFailure>,
    /// User fetched on the way, used for cache warming.
    pub user: Option<UserSnapshot>,
}

/// One-shot resolver. Holds no state between runs.
pub struct ResolveBootstrap {
    session: Arc<SessionManager>,
    flags: SessionFlags,
    api: Arc<dyn AccountApiPort>,
    step_timeout: Duration,
}

impl ResolveBootstrap {
    pub fn new(
        session: Arc<SessionManager>,
        flags: SessionFlags,
        api: Arc<dyn AccountApiPort>,
        step_timeout: Duration,
    ) -> Self {
        Self {
            session,
            flags,
            api,
            step_timeout,
        }
    }

    /// Resolve without a generation; every session write goes through.
    pub async fn execute(&self) -> BootstrapResolution {
        self.resolve(None).await
    }

    /// Resolve on behalf of `guard`'s generation.
    pub async fn execute_guarded(&self, guard: &RunGuard) -> BootstrapResolution {
        self.resolve(Some(guard)).await
    }

    async fn resolve(&self, guard: Option<&RunGuard>) -> BootstrapResolution {
        let span = info_span!("usecase.resolve_bootstrap.execute", run_id = %Uuid::new_v4());
        async {
            let (mut state, actions) = BootstrapStateMachine::start();
            let mut pending: VecDeque<BootstrapAction> = actions.into();
            let mut run = RunContext {
                guard,
                user: None,
                token: None,
            };

            while let Some(action) = pending.pop_front() {
                debug!(?action, "bootstrap executing action");
                let Some(event) = self.execute_action(action, &mut run).await else {
                    continue;
                };
                let from = state.clone();
                let (next, follow_up) = BootstrapStateMachine::transition(state, event);
                info!(from = ?from, to = ?next, "bootstrap state transition");
                state = next;
                pending.extend(follow_up);
            }

            match state {
                BootstrapState::Done { decision, failure } => {
                    info!(decision = %decision, failure = ?failure, "bootstrap resolved");
                    BootstrapResolution {
                        decision,
                        failure,
                        user: if failure.is_none() { run.user } else { None },
                    }
                }
                other => {
                    error!(state = ?other, "bootstrap stopped before reaching a decision");
                    BootstrapResolution {
                        decision: RoutingDecision::ShowWelcome,
                        failure: Some(BootstrapFailure::TransientNetwork),
                        user: None,
                    }
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn execute_action(
        &self,
        action: BootstrapAction,
        run: &mut RunContext<'_>,
    ) -> Option<BootstrapEvent> {
        match action {
            BootstrapAction::LoadSession => Some(match self.session.load().await {
                Ok(session) => {
                    run.token = session.token.clone();
                    BootstrapEvent::SessionLoaded {
                        token_present: session.is_authenticated(),
                        welcome_seen: self.flags.get_bool(FlagKey::HasSeenWelcome).await,
                    }
                }
                Err(err) => {
                    warn!(error = %err, "session storage unavailable");
                    BootstrapEvent::StorageUnavailable
                }
            }),
            BootstrapAction::FetchUserAndMasterPassword => {
                let (details, master_password) = tokio::join!(
                    self.bounded(self.api.get_user_details()),
                    self.bounded(self.api.is_master_password_set()),
                );
                Some(match (details, master_password) {
                    (Ok(details), Ok(master_password)) => {
                        run.user = Some(details);
                        BootstrapEvent::FetchSucceeded { master_password }
                    }
                    (details, master_password) => {
                        let details_err = details.err();
                        let master_err = master_password.err();
                        warn!(
                            user_details = ?details_err,
                            master_password = ?master_err,
                            "bootstrap fetch failed"
                        );
                        let failure = BootstrapFailure::merge(
                            details_err.as_ref().map(BootstrapFailure::classify),
                            master_err.as_ref().map(BootstrapFailure::classify),
                        )
                        .unwrap_or(BootstrapFailure::TransientNetwork);
                        BootstrapEvent::FetchFailed { failure }
                    }
                })
            }
            BootstrapAction::RefreshToken => {
                if run.is_superseded() {
                    info!("bootstrap superseded, skipping token refresh");
                    return Some(BootstrapEvent::RefreshFailed);
                }
                Some(match self.bounded(self.session.refresh()).await {
                    Ok(token) => {
                        run.token = Some(token);
                        BootstrapEvent::RefreshSucceeded
                    }
                    Err(_) => BootstrapEvent::RefreshFailed,
                })
            }
            BootstrapAction::ClearSession => {
                if run.is_superseded() {
                    info!("bootstrap superseded, keeping session");
                    return None;
                }
                match run.token.as_ref() {
                    Some(token) => {
                        self.session.sign_out_if(token).await;
                    }
                    None => self.session.sign_out().await,
                }
                None
            }
        }
    }

    /// Bound a remote step so a hung call still lets the run finish.
    async fn bounded<T>(&self, call: impl Future<Output = Result<T, ApiError>>) -> Result<T, ApiError> {
        tokio::time::timeout(self.step_timeout, call)
            .await
            .unwrap_or(Err(ApiError::Timeout))
    }
}

/// Per-run bookkeeping: the generation it runs for, the user it fetched and
/// the token it last saw.
struct RunContext<'a> {
    guard: Option<&'a RunGuard>,
    user: Option<UserSnapshot>,
    token: Option<AccessToken>,
}

impl RunContext<'_> {
    fn is_superseded(&self) -> bool {
        self.guard.is_some_and(|guard| !guard.is_current())
    }
}
