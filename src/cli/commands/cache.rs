//! Cache command implementation.
//!
//! Provides `contentsync cache list` and `contentsync cache clear`.

use anyhow::Result;
use clap::{Args, Subcommand};
use std::collections::BTreeSet;

use crate::cache::ContentCacheStore;
use crate::resource::ResourceKind;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// Arguments for the cache command.
#[derive(Debug, Clone, Args)]
pub struct CacheArgs {
    #[command(subcommand)]
    pub command: CacheSubcommand,
}

/// Cache subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum CacheSubcommand {
    /// List cached entries.
    List {
        /// Show detailed information.
        #[arg(long)]
        verbose: bool,
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Delete cached entries.
    Clear {
        /// Only entries of this kind.
        #[arg(long, value_enum)]
        kind: Option<ResourceKind>,
        /// Only entries in this language.
        #[arg(long)]
        lang: Option<String>,
    },
}

/// The cache command implementation.
pub struct CacheCommand<'a> {
    store: &'a ContentCacheStore,
    args: CacheArgs,
}

impl<'a> CacheCommand<'a> {
    /// Create a new cache command.
    pub fn new(store: &'a ContentCacheStore, args: CacheArgs) -> Self {
        Self { store, args }
    }
}

impl Command for CacheCommand<'_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> crate::error::Result<CommandResult> {
        let exit_code = match &self.args.command {
            CacheSubcommand::List { verbose, json } => list_cache(self.store, *verbose, *json, ui)?,
            CacheSubcommand::Clear { kind, lang } => {
                clear_cache(self.store, *kind, lang.as_deref(), ui)?
            }
        };

        Ok(if exit_code == 0 {
            CommandResult::success()
        } else {
            CommandResult::failure(exit_code)
        })
    }
}

fn list_cache(
    store: &ContentCacheStore,
    verbose: bool,
    json: bool,
    ui: &mut dyn UserInterface,
) -> Result<i32> {
    let entries = store.list()?;

    if json {
        let output = serde_json::to_string_pretty(&entries)?;
        ui.output(&output);
        return Ok(0);
    }

    if entries.is_empty() {
        ui.message("Cache is empty");
        return Ok(0);
    }

    ui.message(&format!("{} cached entries:\n", entries.len()));

    for entry in entries {
        let status = if entry.is_complete() {
            "ok"
        } else {
            "incomplete"
        };

        if verbose {
            ui.output(&format!("  {} ({})", entry.kind, entry.language));
            ui.output(&format!("    Status: {}", status));
            ui.output(&format!("    File: {}", entry.content_path.display()));
            ui.output(&format!("    Size: {} bytes", entry.size_bytes));
            if let Some(info) = &entry.info {
                ui.output(&format!("    Commit: {}", info.commit_hash));
                ui.output(&format!("    Date: {}", info.commit_date.to_rfc3339()));
            }
            ui.output("");
        } else {
            ui.output(&format!(
                "  {} ({}) {} [{}]",
                entry.kind,
                entry.language,
                entry.short_hash,
                status
            ));
        }
    }

    Ok(0)
}

fn clear_cache(
    store: &ContentCacheStore,
    kind: Option<ResourceKind>,
    language: Option<&str>,
    ui: &mut dyn UserInterface,
) -> Result<i32> {
    if kind.is_none() && language.is_none() {
        let removed = store.clear()?;
        if removed == 0 {
            ui.message("Cache is already empty");
        } else {
            ui.success(&format!("Removed {} cached files", removed));
        }
        return Ok(0);
    }

    let targets: BTreeSet<(ResourceKind, String)> = store
        .list()?
        .into_iter()
        .filter(|e| kind.is_none_or(|k| e.kind == k))
        .filter(|e| language.is_none_or(|l| e.language == l))
        .map(|e| (e.kind, e.language))
        .collect();

    let mut removed = 0;
    for (kind, language) in &targets {
        removed += store.remove(*kind, language)?;
    }

    if removed == 0 {
        ui.message("No matching cache entries");
    } else {
        ui.success(&format!("Removed {} cached files", removed));
    }
    Ok(0)
}
