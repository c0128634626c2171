//! Remote account API port
//!
//! Every call returns a tagged result: the typed payload, or an [`ApiError`]
//! that says how the call failed. The bearer token is attached by the
//! implementation.

use async_trait::async_trait;

use crate::account::{TransactionPage, UserSnapshot};
use crate::master_password::{MasterPasswordState, MasterPin};
use crate::session::AccessToken;

/// Classified failure of a remote call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// HTTP 401: the token is missing, expired or revoked.
    #[error("unauthorized")]
    Unauthorized,

    /// Any other non-success status.
    #[error("request rejected with status {status}{}", message_suffix(.message))]
    Rejected {
        status: u16,
        message: Option<String>,
    },

    #[error("request timed out")]
    Timeout,

    #[error("network error: {0}")]
    Network(String),

    /// The response body did not match the expected shape.
    #[error("unexpected response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Server-provided message of a rejection, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Rejected { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}

fn message_suffix(message: &Option<String>) -> String {
    message
        .as_deref()
        .map(|m| format!(": {m}"))
        .unwrap_or_default()
}

/// Result of a successful OTP verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginGrant {
    pub token: AccessToken,
    pub message: Option<String>,
}

#[async_trait]
pub trait AccountApiPort: Send + Sync {
    /// `GET /user/details`
    async fn get_user_details(&self) -> Result<UserSnapshot, ApiError>;

    /// `GET /auth/is-Master-Pass`
    ///
    /// Non-401 rejections are reported as [`MasterPasswordState::NotSet`],
    /// not as errors.
    async fn is_master_password_set(&self) -> Result<MasterPasswordState, ApiError>;

    /// `GET /user/refreshToken`
    async fn refresh_token(&self) -> Result<AccessToken, ApiError>;

    /// `POST /auth/login`: send a one-time password to `email`.
    async fn request_login_otp(&self, email: &str) -> Result<(), ApiError>;

    /// `POST /auth/verify-login-otp`
    async fn verify_login_otp(&self, email: &str, otp: &str) -> Result<LoginGrant, ApiError>;

    /// `POST /auth/validate-master-password`
    async fn validate_master_password(&self, pin: &MasterPin) -> Result<(), ApiError>;

    /// `POST /auth/set-master-password`
    async fn set_master_password(&self, pin: &MasterPin) -> Result<(), ApiError>;

    /// `POST /transaction/transactions`
    async fn list_transactions(&self, profile_id: &str) -> Result<TransactionPage, ApiError>;
}
