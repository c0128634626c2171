//! # sj-core
//!
//! Core domain models and session bootstrap logic for Sarajod.
//!
//! This crate contains pure business logic without any infrastructure dependencies.

pub mod account;
pub mod bootstrap;
pub mod config;
pub mod flags;
pub mod master_password;
pub mod ports;
pub mod session;

// Re-export commonly used types at the crate root
pub use account::{LedgerTransaction, Profile, TransactionCollection, TransactionPage, UserSnapshot};
pub use bootstrap::{
    BootstrapAction, BootstrapEvent, BootstrapFailure, BootstrapState, BootstrapStateMachine,
    BootstrapTrigger, FetchPass, RoutingDecision,
};
pub use config::AppConfig;
pub use flags::FlagKey;
pub use master_password::{MasterPasswordState, MasterPin, MasterPinError};
pub use ports::{AccountApiPort, ApiError, FlagsStorePort, LoginGrant, ScreenRouterPort};
pub use session::{AccessToken, Session};
