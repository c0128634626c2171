use async_trait::async_trait;

use crate::bootstrap::RoutingDecision;

/// Whatever displays screens.
///
/// Called once per bootstrap run, and only with decisions of the current
/// bootstrap generation.
#[async_trait]
pub trait ScreenRouterPort: Send + Sync {
    /// Dismiss the splash / loading indicator.
    async fn hide_splash(&self) -> anyhow::Result<()>;

    /// Mount the screen stack of `decision`.
    async fn mount(&self, decision: RoutingDecision) -> anyhow::Result<()>;
}
