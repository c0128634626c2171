use std::sync::Arc;

use tracing::{info, info_span, Instrument};

use sj_core::ports::{AccountApiPort, ApiError};
use sj_core::{BootstrapTrigger, FlagKey, RoutingDecision};

use super::bootstrap::BootstrapCoordinator;
use super::flags::SessionFlags;
use super::session::SessionManager;

/// Theme selector written on every fresh sign-in.
const DEFAULT_COLOR_ID: &str = "1";

#[derive(Debug, thiserror::Error)]
pub enum SignInError {
    #[error("email cannot be empty")]
    EmptyEmail,
    #[error("one-time password cannot be empty")]
    EmptyOtp,
    #[error("sign-in request failed: {0}")]
    Api(#[from] ApiError),
}

/// E-mail OTP sign-in.
///
/// A verified OTP yields a token; storing it starts a new bootstrap run
/// whose decision is returned.
pub struct SignInWithOtp {
    api: Arc<dyn AccountApiPort>,
    session: Arc<SessionManager>,
    flags: SessionFlags,
    coordinator: Arc<BootstrapCoordinator>,
}

impl SignInWithOtp {
    pub fn new(
        api: Arc<dyn AccountApiPort>,
        session: Arc<SessionManager>,
        flags: SessionFlags,
        coordinator: Arc<BootstrapCoordinator>,
    ) -> Self {
        Self {
            api,
            session,
            flags,
            coordinator,
        }
    }

    /// Ask the server to e-mail a one-time password.
    pub async fn request(&self, email: &str) -> Result<(), SignInError> {
        let email = non_empty(email).ok_or(SignInError::EmptyEmail)?;
        self.api
            .request_login_otp(email)
            .instrument(info_span!("usecase.sign_in.request"))
            .await?;
        info!("login otp requested");
        Ok(())
    }

    /// Verify the OTP, persist the session and re-run bootstrap.
    pub async fn verify(
        &self,
        email: &str,
        otp: &str,
    ) -> Result<Option<RoutingDecision>, SignInError> {
        let email = non_empty(email).ok_or(SignInError::EmptyEmail)?;
        let otp = non_empty(otp).ok_or(SignInError::EmptyOtp)?;

        let span = info_span!("usecase.sign_in.verify");
        async {
            let grant = self.api.verify_login_otp(email, otp).await?;
            if let Some(message) = grant.message.as_deref() {
                info!(server_message = message, "otp verified");
            }

            self.session.sign_in(grant.token).await;
            self.flags.set(FlagKey::ColorId, DEFAULT_COLOR_ID).await;
            self.flags.set(FlagKey::ProfileSelected, "0").await;

            Ok(self
                .coordinator
                .trigger(BootstrapTrigger::SignInCompleted)
                .await)
        }
        .instrument(span)
        .await
    }
}

fn non_empty(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}
