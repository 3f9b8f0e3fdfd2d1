//! Rate-limit command implementation.

use chrono::Utc;
use clap::{Args, Subcommand};
use std::sync::Arc;

use crate::config::format_duration;
use crate::error::Result;
use crate::rate_limit::RateLimiter;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// Arguments for the rate-limit command.
#[derive(Debug, Clone, Args)]
pub struct RateLimitArgs {
    #[command(subcommand)]
    pub command: RateLimitSubcommand,
}

/// Rate-limit subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum RateLimitSubcommand {
    /// Show whether remote requests are suspended.
    Show,
    /// Resume remote requests immediately.
    Clear,
}

pub struct RateLimitCommand<'a> {
    limiter: &'a Arc<RateLimiter>,
    args: RateLimitArgs,
}

impl<'a> RateLimitCommand<'a> {
    pub fn new(limiter: &'a Arc<RateLimiter>, args: RateLimitArgs) -> Self {
        Self { limiter, args }
    }
}

impl Command for RateLimitCommand<'_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        match self.args.command {
            RateLimitSubcommand::Show => match self.limiter.reset_at() {
                Some(reset_at) => {
                    ui.warning(&format!(
                        "Rate limited until {} ({} left)",
                        reset_at.to_rfc3339(),
                        format_duration(reset_at - Utc::now())
                    ));
                    ui.output(&reset_at.to_rfc3339());
                }
                None => ui.success("Not rate limited"),
            },
            RateLimitSubcommand::Clear => {
                self.limiter.clear_rate_limit();
                ui.success("Rate limit cleared");
            }
        }

        Ok(CommandResult::success())
    }
}
