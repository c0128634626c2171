use std::fmt;

use serde::{Deserialize, Serialize};

/// The screen stack the user lands on.
///
/// Ephemeral: recomputed on every bootstrap, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoutingDecision {
    ShowWelcome,
    ShowLogin,
    ShowSetMasterPassword,
    ShowMasterPasswordEntry,
    ShowHome,
}

impl RoutingDecision {
    /// Route path of the destination screen.
    pub const fn route_path(self) -> &'static str {
        match self {
            RoutingDecision::ShowWelcome => "/welcome",
            RoutingDecision::ShowLogin => "/login",
            RoutingDecision::ShowSetMasterPassword => "/masterPass/setPass",
            RoutingDecision::ShowMasterPasswordEntry => "/masterPass/entryPass",
            RoutingDecision::ShowHome => "/home",
        }
    }

    /// Whether the destination needs a live session.
    pub const fn is_authenticated(self) -> bool {
        matches!(
            self,
            RoutingDecision::ShowSetMasterPassword
                | RoutingDecision::ShowMasterPasswordEntry
                | RoutingDecision::ShowHome
        )
    }
}

impl fmt::Display for RoutingDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.route_path())
    }
}

/// Discrete events that start a new bootstrap run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BootstrapTrigger {
    AppStart,
    SignInCompleted,
    MasterPasswordSetCompleted,
}
