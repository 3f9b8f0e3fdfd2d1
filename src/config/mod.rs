//! Configuration loading, parsing, and validation.
//!
//! - Schema definitions in [`schema`]
//! - File discovery and loading in [`loader`]
//! - Validation in [`validator`]
//! - Duration strings in [`duration`]
//!
//! # Example
//!
//! ```
//! use contentsync::config::{parse_config, validate};
//! use std::path::Path;
//!
//! let yaml = "settings:\n  language: fr-FR\ngrace_periods:\n  readme: 5m\n";
//! let config = parse_config(yaml, Path::new("config.yml")).unwrap();
//! validate(&config).unwrap();
//! assert_eq!(config.settings.language, "fr-FR");
//! ```

pub mod duration;
pub mod loader;
pub mod schema;
pub mod validator;

pub use duration::{format_duration, parse_duration};
pub use loader::{default_config_path, load_config, load_config_file, parse_config};
pub use schema::{
    CacheConfig, ContentConfig, HttpConfig, ProviderKind, RepositoryDescriptor, Settings,
};
pub use validator::{validate, validate_config, ValidationError};
