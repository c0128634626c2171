//! Session bootstrap domain module.
//!
//! This module defines the routing decision produced at cold start (and after
//! authentication events) and the pure state machine that computes it.

mod decision;
pub mod state_machine;

pub use decision::{BootstrapTrigger, RoutingDecision};
pub use state_machine::{
    BootstrapAction, BootstrapEvent, BootstrapFailure, BootstrapState, BootstrapStateMachine,
    FetchPass,
};
