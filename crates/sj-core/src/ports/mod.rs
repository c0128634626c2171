//! Port interfaces for the application layer
//!
//! Ports define the contract between the session use cases and the
//! infrastructure that backs them: local key-value storage, the remote
//! account API and whatever renders screens. Use cases only ever hold
//! `Arc<dyn ...Port>`, so tests substitute in-memory fakes.

mod account_api;
mod flags_store;
mod screen_router;

pub use account_api::{AccountApiPort, ApiError, LoginGrant};
pub use flags_store::FlagsStorePort;
pub use screen_router::ScreenRouterPort;
