//! Sarajod infrastructure adapters
//!
//! Implementations of the core ports: a JSON file backed flags store and a
//! `reqwest` client for the account REST API.

pub mod flags_store;
pub mod http;

pub use flags_store::FileFlagsStore;
pub use http::HttpAccountApi;
