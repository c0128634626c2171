//! Session bootstrap: the resolver that computes a routing decision and the
//! coordinator that mounts it for the current generation only.

mod coordinator;
mod resolver;

pub use coordinator::BootstrapCoordinator;
pub use resolver::{BootstrapResolution, ResolveBootstrap};
