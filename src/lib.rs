//! sarajod shell
//!
//! Configuration, tracing and wiring around the sj-* crates, plus the
//! terminal screen router and the command line surface.

pub mod bootstrap;
pub mod cli;
pub mod router;

pub use router::TerminalScreenRouter;
