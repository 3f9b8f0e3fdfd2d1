//! Configuration schema types.
//!
//! The top-level type is [`ContentConfig`]. Every section has defaults so an
//! empty (or missing) config file yields a working setup.

use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

use super::duration::parse_duration;
use crate::resource::{RepositoryRole, ResourceKind, DEFAULT_LANGUAGE};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    /// Settings read from the host application.
    pub settings: Settings,

    /// Cache location.
    pub cache: CacheConfig,

    /// HTTP behaviour shared by every repository client.
    pub http: HttpConfig,

    /// Repository holding locale strings and terms.
    pub translations: RepositoryDescriptor,

    /// Repository holding the README documentation.
    pub documentation: RepositoryDescriptor,

    /// Per-kind grace periods (e.g. `locale: 15m`).
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub grace_periods: HashMap<ResourceKind, String>,
}

impl ContentConfig {
    /// Descriptor for the repository a resource lives in.
    pub fn repository(&self, role: RepositoryRole) -> &RepositoryDescriptor {
        match role {
            RepositoryRole::Translations => &self.translations,
            RepositoryRole::Documentation => &self.documentation,
        }
    }

    /// Grace period for a kind, falling back to the kind's default when
    /// unset or unparsable.
    pub fn grace_period(&self, kind: ResourceKind) -> Duration {
        self.grace_periods
            .get(&kind)
            .and_then(|s| parse_duration(s).ok())
            .unwrap_or_else(|| kind.default_grace_period())
    }
}

/// Application settings consumed (never written) by this crate.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Current UI language.
    pub language: String,

    /// Language every resource falls back to.
    pub default_language: String,

    /// Keep the launcher open after starting the product.
    #[serde(skip_serializing_if = "is_false")]
    pub keep_open: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            language: DEFAULT_LANGUAGE.to_string(),
            default_language: DEFAULT_LANGUAGE.to_string(),
            keep_open: false,
        }
    }
}

/// Cache directory settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Override for the cache directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

impl CacheConfig {
    /// The configured cache directory, or the platform default.
    pub fn dir(&self) -> PathBuf {
        self.dir.clone().unwrap_or_else(crate::cache::default_cache_dir)
    }
}

/// HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Request timeout (e.g. `30s`).
    pub timeout: String,

    /// User-Agent sent with every request.
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: "30s".to_string(),
            user_agent: format!("contentsync/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl HttpConfig {
    /// Parsed timeout, 30 seconds when invalid.
    pub fn timeout(&self) -> std::time::Duration {
        parse_duration(&self.timeout)
            .ok()
            .and_then(|d| d.to_std().ok())
            .unwrap_or(std::time::Duration::from_secs(30))
    }
}

/// Which hosted-git API a repository speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    /// github.com style API with a separate raw-content host.
    GitHub,
    /// Self-hosted Gitea/Forgejo style API.
    Gitea,
}

/// Static description of one remote repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryDescriptor {
    /// Owner (user or organisation).
    pub owner: String,

    /// Repository name.
    pub repository: String,

    /// Branch resources are read from.
    #[serde(default = "default_branch")]
    pub branch: String,

    /// Web host of the provider (e.g. `https://github.com`).
    #[serde(default = "default_host")]
    pub host: String,

    /// Override for the API base URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    /// Override for the raw-content base URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_url: Option<String>,

    /// Environment variable holding an API token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_env: Option<String>,
}

impl RepositoryDescriptor {
    /// Create a github.com descriptor on `main`.
    pub fn github(owner: impl Into<String>, repository: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repository: repository.into(),
            branch: default_branch(),
            host: default_host(),
            api_url: None,
            raw_url: None,
            token_env: None,
        }
    }

    /// Provider selected from the host URL.
    pub fn provider(&self) -> ProviderKind {
        let host = self.host.trim_end_matches('/').to_lowercase();
        if host.ends_with("github.com") {
            ProviderKind::GitHub
        } else {
            ProviderKind::Gitea
        }
    }

    /// `owner/repository` for log output.
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.repository)
    }
}

impl Default for RepositoryDescriptor {
    fn default() -> Self {
        Self::github("umbraprior", "FikaLauncher-Documentation")
    }
}

fn default_branch() -> String {
    "main".to_string()
}

fn default_host() -> String {
    "https://github.com".to_string()
}

fn is_false(b: &bool) -> bool {
    !*b
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_yaml_uses_defaults() {
        let config: ContentConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config.settings.language, "en-US");
        assert_eq!(config.settings.default_language, "en-US");
        assert_eq!(config.translations.branch, "main");
        assert_eq!(config.http.timeout(), std::time::Duration::from_secs(30));
    }

    #[test]
    fn parses_repository_descriptor() {
        let yaml = r#"
documentation:
  owner: docs-org
  repository: docs
  branch: stable
  host: https://git.example.org
  token_env: DOCS_TOKEN
"#;
        let config: ContentConfig = serde_yaml::from_str(yaml).unwrap();
        let docs = config.repository(RepositoryRole::Documentation);
        assert_eq!(docs.full_name(), "docs-org/docs");
        assert_eq!(docs.branch, "stable");
        assert_eq!(docs.provider(), ProviderKind::Gitea);
        assert_eq!(docs.token_env.as_deref(), Some("DOCS_TOKEN"));
    }

    #[test]
    fn github_hosts_select_github_provider() {
        let mut repo = RepositoryDescriptor::github("o", "r");
        assert_eq!(repo.provider(), ProviderKind::GitHub);
        repo.host = "https://GitHub.com/".to_string();
        assert_eq!(repo.provider(), ProviderKind::GitHub);
        repo.host = "https://codeberg.org".to_string();
        assert_eq!(repo.provider(), ProviderKind::Gitea);
    }

    #[test]
    fn grace_period_override() {
        let yaml = "grace_periods:\n  readme: 2m\n";
        let config: ContentConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(
            config.grace_period(ResourceKind::Readme),
            Duration::minutes(2)
        );
        assert_eq!(
            config.grace_period(ResourceKind::LauncherTerms),
            Duration::minutes(10)
        );
    }

    #[test]
    fn invalid_grace_period_falls_back_to_default() {
        let yaml = "grace_periods:\n  locale: soon\n";
        let config: ContentConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(
            config.grace_period(ResourceKind::Locale),
            Duration::minutes(15)
        );
    }

    #[test]
    fn cache_dir_override() {
        let yaml = "cache:\n  dir: /tmp/contentsync-test\n";
        let config: ContentConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.cache.dir(), PathBuf::from("/tmp/contentsync-test"));
    }
}
