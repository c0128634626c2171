use std::sync::Arc;

use tracing::{info_span, Instrument};

use sj_core::RoutingDecision;

use super::navigation::ScreenNavigator;
use super::session::SessionManager;

/// User-initiated sign-out: drop the session and show the login screen.
///
/// The generation advances before the session is dropped, so a bootstrap
/// or cache warm still in flight stops writing before the keys go.
pub struct SignOut {
    session: Arc<SessionManager>,
    navigator: Arc<ScreenNavigator>,
}

impl SignOut {
    pub fn new(session: Arc<SessionManager>, navigator: Arc<ScreenNavigator>) -> Self {
        Self { session, navigator }
    }

    pub async fn execute(&self) -> anyhow::Result<RoutingDecision> {
        async {
            let ticket = self.navigator.begin();
            self.session.sign_out().await;
            self.navigator
                .commit(ticket, RoutingDecision::ShowLogin)
                .await?;
            Ok(RoutingDecision::ShowLogin)
        }
        .instrument(info_span!("usecase.sign_out.execute"))
        .await
    }
}
