//! Durable application state.
//!
//! The state file (`appstate.json`) is shared with the rest of the host
//! application, so fields this crate does not know about are preserved
//! verbatim on every save.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ContentError, Result};

/// File name of the state document inside the cache directory.
pub const STATE_FILE_NAME: &str = "appstate.json";

/// Persisted application state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    /// Time until which provider requests are suspended.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate_limit_reset_time: Option<DateTime<Utc>>,

    /// Fields owned by other parts of the application.
    #[serde(flatten)]
    pub other: serde_json::Map<String, serde_json::Value>,
}

impl AppState {
    /// Reset time, or the far past when no limit was ever recorded.
    pub fn rate_limit_reset_at(&self) -> DateTime<Utc> {
        self.rate_limit_reset_time
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }
}

/// Reads and writes [`AppState`] at a fixed path.
#[derive(Debug, Clone)]
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    /// Store backed by an explicit file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at `<dir>/appstate.json`.
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(STATE_FILE_NAME))
    }

    /// Path of the state file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load state from disk; a missing file yields the default state.
    pub fn load(&self) -> Result<AppState> {
        if !self.path.exists() {
            return Ok(AppState::default());
        }

        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(AppState::default());
        }

        serde_json::from_str(&content).map_err(|e| ContentError::StateParseError {
            path: self.path.clone(),
            message: e.to_string(),
        })
    }

    /// Load state, falling back to the default when the file is unreadable.
    pub fn load_or_default(&self) -> AppState {
        self.load().unwrap_or_else(|e| {
            tracing::warn!("Ignoring unreadable application state: {}", e);
            AppState::default()
        })
    }

    /// Save state to disk using atomic write.
    ///
    /// Uses the write-to-temp-then-rename pattern to prevent corruption.
    pub fn save(&self, state: &AppState) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }

        let content = serde_json::to_string_pretty(state).map_err(anyhow::Error::from)?;

        let temp_path = self.path.with_extension("json.tmp");
        fs::write(&temp_path, &content)?;
        fs::rename(&temp_path, &self.path)?;

        Ok(())
    }

    /// Load, modify and save in one step.
    pub fn update(&self, f: impl FnOnce(&mut AppState)) -> Result<AppState> {
        let mut state = self.load_or_default();
        f(&mut state);
        self.save(&state)?;
        Ok(state)
    }
}
