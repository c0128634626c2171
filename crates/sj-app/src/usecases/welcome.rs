use tracing::debug;

use sj_core::FlagKey;

use super::flags::SessionFlags;

/// Bookkeeping of the `hasSeenWelcome` flag.
///
/// Entering the welcome screen clears it; leaving toward login or register
/// sets it, so the next cold start without a session goes straight to login.
pub struct WelcomeFlow {
    flags: SessionFlags,
}

impl WelcomeFlow {
    pub fn new(flags: SessionFlags) -> Self {
        Self { flags }
    }

    pub async fn enter(&self) {
        debug!("welcome entered");
        self.flags.set_bool(FlagKey::HasSeenWelcome, false).await;
    }

    pub async fn leave(&self) {
        debug!("welcome left");
        self.flags.set_bool(FlagKey::HasSeenWelcome, true).await;
    }
}
