//! Command dispatching.
//!
//! This module provides the core command infrastructure:
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`CommandDispatcher`] for routing CLI subcommands

use crate::cli::args::{Cli, Commands};
use crate::config::ContentConfig;
use crate::error::Result;
use crate::fallback::ContentService;
use crate::ui::UserInterface;

/// Trait for command implementations.
///
/// Each CLI subcommand implements this trait to provide its execution logic.
pub trait Command {
    /// Execute the command.
    ///
    /// # Arguments
    ///
    /// * `ui` - User interface for displaying output
    ///
    /// # Returns
    ///
    /// A [`CommandResult`] indicating success/failure and exit code.
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }
}

/// Dispatches CLI commands to their implementations.
pub struct CommandDispatcher {
    service: ContentService,
    language: String,
}

impl CommandDispatcher {
    /// Create a dispatcher serving `language` unless a command overrides it.
    pub fn new(service: ContentService, language: impl Into<String>) -> Self {
        Self {
            service,
            language: language.into(),
        }
    }

    /// Build the service described by `config`.
    pub fn from_config(config: &ContentConfig) -> Result<Self> {
        let service = ContentService::from_config(config)?;
        Ok(Self::new(service, &config.settings.language))
    }

    pub fn service(&self) -> &ContentService {
        &self.service
    }

    fn language(&self, requested: &Option<String>) -> String {
        requested.clone().unwrap_or_else(|| self.language.clone())
    }

    /// Dispatch and execute a command.
    pub fn dispatch(&self, cli: &Cli, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        match &cli.command {
            Commands::Get(args) => {
                let cmd = super::get::GetCommand::new(
                    &self.service,
                    self.language(&args.lang),
                    args.clone(),
                );
                cmd.execute(ui)
            }
            Commands::Precache(args) => {
                let cmd = super::precache::PrecacheCommand::new(
                    &self.service,
                    self.language(&args.lang),
                    args.clone(),
                );
                cmd.execute(ui)
            }
            Commands::Status(args) => {
                let cmd = super::status::StatusCommand::new(
                    &self.service,
                    self.language(&args.lang),
                    args.clone(),
                );
                cmd.execute(ui)
            }
            Commands::Locales => {
                let cmd = super::locales::LocalesCommand::new(&self.service, &self.language);
                cmd.execute(ui)
            }
            Commands::Cache(args) => {
                let cmd = super::cache::CacheCommand::new(self.service.cache(), args.clone());
                cmd.execute(ui)
            }
            Commands::RateLimit(args) => {
                let cmd =
                    super::rate_limit::RateLimitCommand::new(self.service.limiter(), args.clone());
                cmd.execute(ui)
            }
        }
    }
}
