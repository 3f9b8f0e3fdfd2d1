//! Configuration file discovery and loading.

use crate::config::schema::ContentConfig;
use crate::error::{ContentError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Default config location: `<config dir>/contentsync/config.yml`.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("contentsync").join("config.yml"))
}

/// Load configuration.
///
/// An explicit path must exist. Without one, the default location is used
/// when present and built-in defaults otherwise.
pub fn load_config(explicit: Option<&Path>) -> Result<ContentConfig> {
    if let Some(path) = explicit {
        return load_config_file(path);
    }

    match default_config_path() {
        Some(path) if path.exists() => load_config_file(&path),
        _ => {
            tracing::debug!("No config file found, using defaults");
            Ok(ContentConfig::default())
        }
    }
}

/// Load a single configuration file.
pub fn load_config_file(path: &Path) -> Result<ContentConfig> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ContentError::ConfigNotFound {
                path: path.to_path_buf(),
            }
        } else {
            ContentError::Io(e)
        }
    })?;

    parse_config(&content, path)
}

/// Parse YAML content into [`ContentConfig`].
///
/// `source_path` is only used for error reporting.
pub fn parse_config(content: &str, source_path: &Path) -> Result<ContentConfig> {
    if content.trim().is_empty() {
        return Ok(ContentConfig::default());
    }

    serde_yaml::from_str(content).map_err(|e| ContentError::ConfigParseError {
        path: source_path.to_path_buf(),
        message: e.to_string(),
    })
}
