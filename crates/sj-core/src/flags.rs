//! Keys of the persisted flags store.

use std::fmt;

/// Every key the application reads or writes in local storage.
///
/// The string forms are the exact keys the mobile client used, so an existing
/// device store keeps working.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlagKey {
    /// Bearer token of the current session.
    Token,
    /// `"true"` once the user moved past the welcome screen.
    HasSeenWelcome,
    /// Index of the selected profile (cache only).
    ProfileSelected,
    /// Legacy theme selector.
    ColorId,
    /// JSON snapshot of the user written by cache warming.
    CachedUserDetails,
    /// JSON transaction page of the selected profile.
    CachedTransactions,
}

impl FlagKey {
    pub const fn as_str(self) -> &'static str {
        match self {
            FlagKey::Token => "token",
            FlagKey::HasSeenWelcome => "hasSeenWelcome",
            FlagKey::ProfileSelected => "profileSelected",
            FlagKey::ColorId => "colorId",
            FlagKey::CachedUserDetails => "cachedUserDetails",
            FlagKey::CachedTransactions => "cachedTransactions",
        }
    }

    /// Keys dropped together with the session on sign-out.
    pub const SESSION_SCOPED: [FlagKey; 3] = [
        FlagKey::Token,
        FlagKey::CachedUserDetails,
        FlagKey::CachedTransactions,
    ];
}

impl fmt::Display for FlagKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Serialized form of a boolean flag.
pub fn bool_flag(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

/// Only the literal `"true"` counts as set; anything else is unset.
pub fn parse_bool_flag(value: Option<&str>) -> bool {
    matches!(value, Some("true"))
}
