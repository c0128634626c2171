//! Generation-checked access to the screen router.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use sj_core::ports::ScreenRouterPort;
use sj_core::RoutingDecision;

/// Monotonic bootstrap counter.
///
/// Every trigger takes a ticket; only the holder of the latest ticket may
/// reach the router.
#[derive(Debug, Default)]
pub struct BootstrapGeneration {
    current: AtomicU64,
}

/// A generation number handed out by [`BootstrapGeneration::advance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct GenerationTicket(u64);

impl GenerationTicket {
    pub fn value(self) -> u64 {
        self.0
    }
}

impl BootstrapGeneration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new generation, superseding every outstanding ticket.
    pub fn advance(&self) -> GenerationTicket {
        GenerationTicket(self.current.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn current(&self) -> u64 {
        self.current.load(Ordering::SeqCst)
    }

    pub fn is_current(&self, ticket: GenerationTicket) -> bool {
        self.current() == ticket.0
    }
}

/// A ticket bound to the generation counter it was taken from.
///
/// Work that outlives a mount (session writes, cache writes) checks the
/// guard before each side effect and drops the effect once superseded.
#[derive(Debug, Clone)]
pub struct RunGuard {
    generation: Arc<BootstrapGeneration>,
    ticket: GenerationTicket,
}

impl RunGuard {
    pub fn new(generation: Arc<BootstrapGeneration>, ticket: GenerationTicket) -> Self {
        Self { generation, ticket }
    }

    pub fn ticket(&self) -> GenerationTicket {
        self.ticket
    }

    pub fn is_current(&self) -> bool {
        self.generation.is_current(self.ticket)
    }
}

/// Screen router guarded by the bootstrap generation.
///
/// The staleness check and the mount happen under one lock, so a superseded
/// run can never slip a mount in after a newer one.
pub struct ScreenNavigator {
    router: Arc<dyn ScreenRouterPort>,
    generation: Arc<BootstrapGeneration>,
    mount_lock: Mutex<()>,
}

impl ScreenNavigator {
    pub fn new(router: Arc<dyn ScreenRouterPort>, generation: Arc<BootstrapGeneration>) -> Self {
        Self {
            router,
            generation,
            mount_lock: Mutex::new(()),
        }
    }

    /// Bind `ticket` to this navigator's generation counter.
    pub fn guard(&self, ticket: GenerationTicket) -> RunGuard {
        RunGuard::new(self.generation.clone(), ticket)
    }

    pub fn begin(&self) -> GenerationTicket {
        self.generation.advance()
    }

    pub fn is_current(&self, ticket: GenerationTicket) -> bool {
        self.generation.is_current(ticket)
    }

    /// Hide the splash and mount `decision` if `ticket` is still current.
    ///
    /// Returns `Ok(false)` without touching the router when the ticket is
    /// stale.
    pub async fn commit(
        &self,
        ticket: GenerationTicket,
        decision: RoutingDecision,
    ) -> anyhow::Result<bool> {
        let _guard = self.mount_lock.lock().await;
        if !self.generation.is_current(ticket) {
            debug!(
                generation = ticket.value(),
                current = self.generation.current(),
                "stale generation, not mounting"
            );
            return Ok(false);
        }

        if let Err(err) = self.router.hide_splash().await {
            warn!(error = %err, "failed to hide splash");
        }
        self.router.mount(decision).await?;
        info!(generation = ticket.value(), route = %decision, "screen mounted");
        Ok(true)
    }

    /// Route immediately, superseding any bootstrap still in flight.
    pub async fn route_now(&self, decision: RoutingDecision) -> anyhow::Result<()> {
        let ticket = self.begin();
        self.commit(ticket, decision).await.map(|_| ())
    }
}
