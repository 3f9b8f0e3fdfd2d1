//! Persistent application state.
//!
//! Holds the process-wide rate-limit reset time so that a cooldown survives
//! a restart of the host application.

pub mod store;

pub use store::{AppState, StateStore, STATE_FILE_NAME};
