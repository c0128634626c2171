//! Terminal screen router.
//!
//! Stands in for the navigation stack of a graphical client: every mounted
//! decision is logged and its route path written as one line to the output.

use std::io::{self, Write};
use std::sync::Mutex;

use async_trait::async_trait;
use sj_core::ports::ScreenRouterPort;
use sj_core::RoutingDecision;
use tracing::{debug, info};

pub struct TerminalScreenRouter<W: Write + Send = io::Stdout> {
    out: Mutex<W>,
}

impl TerminalScreenRouter<io::Stdout> {
    pub fn stdout() -> Self {
        Self::with_writer(io::stdout())
    }
}

impl<W: Write + Send> TerminalScreenRouter<W> {
    pub fn with_writer(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    pub fn into_inner(self) -> anyhow::Result<W> {
        self.out
            .into_inner()
            .map_err(|_| anyhow::anyhow!("router output lock poisoned"))
    }
}

#[async_trait]
impl<W: Write + Send> ScreenRouterPort for TerminalScreenRouter<W> {
    async fn hide_splash(&self) -> anyhow::Result<()> {
        debug!("splash hidden");
        Ok(())
    }

    async fn mount(&self, decision: RoutingDecision) -> anyhow::Result<()> {
        info!(decision = ?decision, route = decision.route_path(), "mounting screen");
        let mut out = self
            .out
            .lock()
            .map_err(|_| anyhow::anyhow!("router output lock poisoned"))?;
        writeln!(out, "{}", decision.route_path())?;
        out.flush()?;
        Ok(())
    }
}
