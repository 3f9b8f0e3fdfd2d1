//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait, which provides a uniform
//! interface for executing commands and reporting results. Commands are
//! routed by [`CommandDispatcher`], which owns the shared
//! [`ContentService`](crate::fallback::ContentService).

pub mod cache;
pub mod dispatcher;
pub mod get;
pub mod locales;
pub mod precache;
pub mod rate_limit;
pub mod status;

pub use dispatcher::{Command, CommandDispatcher, CommandResult};
