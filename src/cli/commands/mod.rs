//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait, which provides a uniform
//! interface for executing commands and reporting results.
//!
//! # Architecture
//!
//! Commands are dispatched via [`CommandDispatcher`], which routes CLI
//! subcommands to their implementations. `check` and `fix` share the
//! project loading in [`project`].

pub mod check;
pub mod completions;
pub mod dispatcher;
pub mod fix;
pub mod project;
pub mod rules;

pub use dispatcher::{Command, CommandDispatcher, CommandResult};
