//! Command-line interface for contentsync.
//!
//! - [`args`] - Argument definitions using clap derive macros
//! - [`commands`] - Command implementations

pub mod args;
pub mod commands;

pub use args::{Cli, Commands, GetArgs, PrecacheArgs, StatusArgs};
pub use commands::{Command, CommandDispatcher, CommandResult};
