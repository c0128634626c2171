use std::sync::Arc;

use tracing::{error, info, info_span, Instrument};

use sj_core::{BootstrapTrigger, RoutingDecision};

use super::resolver::ResolveBootstrap;
use crate::usecases::navigation::ScreenNavigator;
use crate::usecases::warm_cache::WarmSessionCache;

/// Runs one resolver per trigger and mounts only the latest result.
pub struct BootstrapCoordinator {
    resolver: Arc<ResolveBootstrap>,
    navigator: Arc<ScreenNavigator>,
    warm_cache: Arc<WarmSessionCache>,
}

impl BootstrapCoordinator {
    pub fn new(
        resolver: Arc<ResolveBootstrap>,
        navigator: Arc<ScreenNavigator>,
        warm_cache: Arc<WarmSessionCache>,
    ) -> Self {
        Self {
            resolver,
            navigator,
            warm_cache,
        }
    }

    /// Start a new bootstrap generation.
    ///
    /// Returns the mounted decision, or `None` when a newer trigger
    /// superseded this one (or the router refused the mount).
    pub async fn trigger(&self, trigger: BootstrapTrigger) -> Option<RoutingDecision> {
        let ticket = self.navigator.begin();
        let guard = self.navigator.guard(ticket);
        let span = info_span!(
            "usecase.bootstrap_coordinator.trigger",
            trigger = ?trigger,
            generation = ticket.value()
        );
        async {
            let resolution = self.resolver.execute_guarded(&guard).await;

            match self.navigator.commit(ticket, resolution.decision).await {
                Ok(true) => {}
                Ok(false) => {
                    info!(decision = %resolution.decision, "bootstrap superseded, discarding result");
                    return None;
                }
                Err(err) => {
                    error!(error = %err, decision = %resolution.decision, "failed to mount decision");
                    return None;
                }
            }

            if resolution.decision.is_authenticated() {
                if let Some(user) = resolution.user.as_ref() {
                    self.warm_cache.execute(user, &guard).await;
                }
            }

            Some(resolution.decision)
        }
        .instrument(span)
        .await
    }
}
