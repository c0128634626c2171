//! Command line surface.
//!
//! Each subcommand maps onto one use case. Screens reached by a command are
//! printed by the terminal router; everything else goes to stderr.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use sj_core::BootstrapTrigger;
use tracing::{info_span, warn, Instrument};

use crate::bootstrap::AppServices;

#[derive(Debug, Parser)]
#[command(name = "sarajod", version, about = "Sarajod session bootstrap")]
pub struct Cli {
    /// Path to a TOML config file (default: <data_dir>/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Resolve the initial screen from the stored session
    Bootstrap {
        #[arg(long, value_enum, default_value_t = TriggerArg::AppStart)]
        trigger: TriggerArg,
    },
    /// Request a one-time password by e-mail
    Login { email: String },
    /// Verify the one-time password and sign in
    VerifyOtp { email: String, otp: String },
    /// Unlock with the master password
    Unlock { pin: String },
    /// Set the master password of an account that has none
    SetPin { pin: String },
    /// Drop the stored session
    SignOut,
    /// Track the welcome screen
    Welcome {
        #[command(subcommand)]
        action: WelcomeAction,
    },
    /// Select the active profile by index
    SelectProfile { index: usize },
}

#[derive(Debug, Subcommand)]
pub enum WelcomeAction {
    Enter,
    Leave,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TriggerArg {
    AppStart,
    SignInCompleted,
    MasterPasswordSetCompleted,
}

impl From<TriggerArg> for BootstrapTrigger {
    fn from(arg: TriggerArg) -> Self {
        match arg {
            TriggerArg::AppStart => BootstrapTrigger::AppStart,
            TriggerArg::SignInCompleted => BootstrapTrigger::SignInCompleted,
            TriggerArg::MasterPasswordSetCompleted => BootstrapTrigger::MasterPasswordSetCompleted,
        }
    }
}

/// Run one command against the wired services.
pub async fn run(command: Command, services: &AppServices) -> anyhow::Result<()> {
    let span = info_span!("cli.command", command = command_name(&command));
    async move {
        match command {
            Command::Bootstrap { trigger } => {
                if services.coordinator.trigger(trigger.into()).await.is_none() {
                    warn!("bootstrap result was superseded or could not be mounted");
                }
            }
            Command::Login { email } => {
                services.sign_in.request(&email).await?;
                eprintln!("One-time password sent to {}", email.trim());
            }
            Command::VerifyOtp { email, otp } => {
                if services.sign_in.verify(&email, &otp).await?.is_none() {
                    warn!("signed in, but the bootstrap result was not mounted");
                }
            }
            Command::Unlock { pin } => {
                services.unlock.execute(&pin).await?;
            }
            Command::SetPin { pin } => {
                services.set_master_password.execute(&pin).await?;
            }
            Command::SignOut => {
                services.sign_out.execute().await?;
            }
            Command::Welcome { action } => match action {
                WelcomeAction::Enter => services.welcome.enter().await,
                WelcomeAction::Leave => services.welcome.leave().await,
            },
            Command::SelectProfile { index } => {
                services.select_profile.execute(index).await?;
                eprintln!("Profile {index} selected");
            }
        }
        Ok(())
    }
    .instrument(span)
    .await
}

fn command_name(command: &Command) -> &'static str {
    match command {
        Command::Bootstrap { .. } => "bootstrap",
        Command::Login { .. } => "login",
        Command::VerifyOtp { .. } => "verify-otp",
        Command::Unlock { .. } => "unlock",
        Command::SetPin { .. } => "set-pin",
        Command::SignOut => "sign-out",
        Command::Welcome { .. } => "welcome",
        Command::SelectProfile { .. } => "select-profile",
    }
}
