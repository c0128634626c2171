//! Master password domain model.
//!
//! The master password is a six-digit PIN that gates the authenticated area
//! after OTP sign-in. It is validated and stored server-side; locally we only
//! check its shape and learn whether one has been set.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of digits in a master password.
pub const MASTER_PIN_LEN: usize = 6;

/// Whether the account has a master password, as reported by the server.
///
/// Never persisted; re-derived on every bootstrap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MasterPasswordState {
    Unknown,
    Set,
    NotSet,
}

impl MasterPasswordState {
    /// Ambiguous answers are treated as "not set".
    pub fn is_set(self) -> bool {
        matches!(self, MasterPasswordState::Set)
    }
}

/// Shape errors caught before any network call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MasterPinError {
    #[error("master password cannot be empty")]
    Empty,
    #[error("master password must contain only digits")]
    NotNumeric,
    #[error("master password must be {expected} digits, got {actual}")]
    WrongLength { expected: usize, actual: usize },
}

/// A well-formed master password.
#[derive(Clone, PartialEq, Eq)]
pub struct MasterPin(String);

impl MasterPin {
    pub fn parse(raw: &str) -> Result<Self, MasterPinError> {
        let digits = raw.trim();
        if digits.is_empty() {
            return Err(MasterPinError::Empty);
        }
        if !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(MasterPinError::NotNumeric);
        }
        let actual = digits.chars().count();
        if actual != MASTER_PIN_LEN {
            return Err(MasterPinError::WrongLength {
                expected: MASTER_PIN_LEN,
                actual,
            });
        }
        Ok(Self(digits.to_string()))
    }

    /// Digits as entered, leading zeros included.
    pub fn as_digits(&self) -> &str {
        &self.0
    }

    /// Numeric form expected by the validation endpoint.
    ///
    /// Leading zeros are lost, exactly as the server expects.
    pub fn as_number(&self) -> u32 {
        self.0
            .bytes()
            .fold(0u32, |acc, b| acc * 10 + u32::from(b - b'0'))
    }
}

impl fmt::Debug for MasterPin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("MasterPin([REDACTED])")
    }
}
