//! Session domain model.
//!
//! A session is the bearer token obtained from OTP sign-in plus the loading
//! flag the shell shows while the token is being read from storage.

mod token;

pub use token::AccessToken;

/// In-memory view of the persisted session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: Option<AccessToken>,
    pub is_loading: bool,
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}

impl Default for Session {
    /// A freshly booted session: nothing read yet, still loading.
    fn default() -> Self {
        Self {
            token: None,
            is_loading: true,
        }
    }
}
