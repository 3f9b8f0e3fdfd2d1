//! CLI argument definitions.
//!
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use super::commands::cache::CacheArgs;
use super::commands::rate_limit::RateLimitArgs;
use crate::resource::ResourceKind;

/// contentsync - Versioned locale strings, docs and terms for the launcher.
#[derive(Debug, Parser)]
#[command(name = "contentsync")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to config file (overrides the default location)
    #[arg(short, long, global = true, env = "CONTENTSYNC_CONFIG")]
    pub config: Option<PathBuf>,

    /// Cache directory (overrides the configured one)
    #[arg(long, global = true, env = "CONTENTSYNC_CACHE_DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print a resource from the best available source
    Get(GetArgs),

    /// Download newer versions of resources into the cache
    Precache(PrecacheArgs),

    /// Show cached versions and rate-limit state
    Status(StatusArgs),

    /// List locales published in the translations repository
    Locales,

    /// Inspect or clear the content cache
    Cache(CacheArgs),

    /// Inspect or clear the shared rate limit
    RateLimit(RateLimitArgs),
}

/// Arguments for the `get` command.
#[derive(Debug, Clone, clap::Args)]
pub struct GetArgs {
    /// Resource to print
    #[arg(value_enum)]
    pub kind: ResourceKind,

    /// Language (defaults to the configured language)
    #[arg(short, long, env = "CONTENTSYNC_LANGUAGE")]
    pub lang: Option<String>,

    /// Report which source served the content
    #[arg(long)]
    pub show_tier: bool,
}

/// Arguments for the `precache` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct PrecacheArgs {
    /// Language (defaults to the configured language)
    #[arg(short, long, env = "CONTENTSYNC_LANGUAGE")]
    pub lang: Option<String>,

    /// Only this resource
    #[arg(short, long, value_enum)]
    pub kind: Option<ResourceKind>,

    /// Every published locale (ignores --lang)
    #[arg(long)]
    pub all_locales: bool,
}

/// Arguments for the `status` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct StatusArgs {
    /// Language (defaults to the configured language)
    #[arg(short, long, env = "CONTENTSYNC_LANGUAGE")]
    pub lang: Option<String>,

    /// Compare with the latest remote commits
    #[arg(long)]
    pub check_remote: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_get_with_language() {
        let cli = Cli::parse_from(["contentsync", "get", "launcher-terms", "--lang", "fr-FR"]);
        match cli.command {
            Commands::Get(args) => {
                assert_eq!(args.kind, ResourceKind::LauncherTerms);
                assert_eq!(args.lang.as_deref(), Some("fr-FR"));
                assert!(!args.show_tier);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn parses_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["contentsync", "status", "--quiet", "--cache-dir", "/tmp/c"]);
        assert!(cli.quiet);
        assert_eq!(cli.cache_dir, Some(PathBuf::from("/tmp/c")));
    }

    #[test]
    fn rejects_unknown_kind() {
        assert!(Cli::try_parse_from(["contentsync", "get", "changelog"]).is_err());
    }

    #[test]
    fn parses_precache_kind() {
        let cli = Cli::parse_from(["contentsync", "precache", "--kind", "readme", "--all-locales"]);
        match cli.command {
            Commands::Precache(args) => {
                assert_eq!(args.kind, Some(ResourceKind::Readme));
                assert!(args.all_locales);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
