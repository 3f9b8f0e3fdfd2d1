//! contentsync - Versioned remote resources for a game launcher.
//!
//! Locale strings, the README and two sets of terms of use live in hosted
//! git repositories (GitHub or Gitea). This crate downloads a resource only
//! when a newer, settled commit exists, keeps one version per
//! (kind, language) on disk, shares a persisted rate-limit cooldown between
//! all callers, and always returns something displayable.
//!
//! # Modules
//!
//! - [`bundled`] - Resources packaged with the application
//! - [`cache`] - On-disk content cache keyed by commit hash
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Configuration loading, parsing, and validation
//! - [`discovery`] - Locale discovery
//! - [`error`] - Error types and result aliases
//! - [`fallback`] - [`ContentService`], the ordered fallback chain
//! - [`freshness`] - Staleness decisions and grace periods
//! - [`rate_limit`] - Shared rate limiter
//! - [`repository`] - GitHub and Gitea clients
//! - [`resource`] - Resource kinds and remote paths
//! - [`state`] - Persisted application state
//! - [`ui`] - Terminal output
//!
//! # Example
//!
//! ```
//! use contentsync::resource::ResourceKind;
//!
//! assert_eq!(
//!     ResourceKind::LauncherTerms.remote_path("fr-FR"),
//!     "Languages/fr-FR/launcher-terms.md"
//! );
//! assert_eq!(ResourceKind::Readme.remote_path("fr-FR"), "fr_FR-README.md");
//! ```
//!
//! For a service talking to a mock server, see the integration tests.

pub mod bundled;
pub mod cache;
pub mod cli;
pub mod config;
pub mod discovery;
pub mod error;
pub mod fallback;
pub mod freshness;
pub mod rate_limit;
pub mod repository;
pub mod resource;
pub mod state;
pub mod ui;

pub use error::{ContentError, Result};
pub use fallback::{ContentService, Tier, ERROR_PLACEHOLDER};
