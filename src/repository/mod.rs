//! Hosted-git repository access.
//!
//! The [`RepositoryClient`] trait hides which provider a repository lives on.
//! Two implementations exist, [`GitHubClient`] and [`GiteaClient`]; the
//! [`create_client`] factory picks one from the descriptor's host URL.
//!
//! Every method reports ordinary failures (non-success status, timeout,
//! unparsable payload) as "absent". The only error a caller should expect is
//! [`ContentError::RateLimited`](crate::ContentError::RateLimited).

#[cfg(test)]
pub(crate) mod fake;
pub mod gitea;
pub mod github;
pub mod http;

pub use gitea::GiteaClient;
pub use github::GitHubClient;
pub use http::{AuthHeader, HttpTransport};

use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::sync::Arc;

use crate::config::schema::{HttpConfig, ProviderKind, RepositoryDescriptor};
use crate::config::validator::validate_repository;
use crate::error::{ContentError, Result};

/// The newest commit touching a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitInfo {
    pub commit_hash: String,
    pub commit_date: DateTime<Utc>,
}

impl CommitInfo {
    pub fn new(commit_hash: impl Into<String>, commit_date: DateTime<Utc>) -> Self {
        Self {
            commit_hash: commit_hash.into(),
            commit_date,
        }
    }

    /// First seven characters of the hash.
    pub fn short_hash(&self) -> &str {
        short_hash(&self.commit_hash)
    }
}

/// First seven characters of a commit hash (the whole hash if shorter).
pub fn short_hash(hash: &str) -> &str {
    match hash.char_indices().nth(7) {
        Some((idx, _)) => &hash[..idx],
        None => hash,
    }
}

/// Read access to one remote repository.
pub trait RepositoryClient: Send + Sync {
    /// Latest commit touching `path` on the configured branch.
    fn latest_commit_info(&self, path: &str) -> Result<Option<CommitInfo>>;

    /// Whether `path` exists on the configured branch.
    fn file_exists(&self, path: &str) -> Result<bool>;

    /// Raw content of `path`.
    fn download_content(&self, path: &str) -> Result<Option<String>>;

    /// Entry names in directory `path`.
    fn directory_contents(&self, path: &str) -> Result<Option<Vec<String>>>;

    /// Reset time of a rate-limit budget that ran out on an otherwise
    /// successful call. Consumed on read.
    fn observed_rate_limit(&self) -> Option<DateTime<Utc>> {
        None
    }
}

/// Build a client for a repository descriptor.
///
/// Fails only for misconfigured descriptors.
pub fn create_client(
    repo: &RepositoryDescriptor,
    http: &HttpConfig,
) -> Result<Arc<dyn RepositoryClient>> {
    let errors = validate_repository(&repo.full_name(), repo);
    if !errors.is_empty() {
        let messages: Vec<_> = errors.into_iter().map(|e| e.message).collect();
        return Err(ContentError::ConfigValidationError {
            message: messages.join("; "),
        });
    }

    let auth = repo.token_env.as_deref().and_then(AuthHeader::from_env);
    let transport = HttpTransport::new(&http.user_agent, http.timeout(), auth)?;

    let client: Arc<dyn RepositoryClient> = match repo.provider() {
        ProviderKind::GitHub => Arc::new(GitHubClient::new(repo, transport)),
        ProviderKind::Gitea => Arc::new(GiteaClient::new(repo, transport)),
    };

    tracing::debug!(
        "Created {:?} client for {} ({})",
        repo.provider(),
        repo.full_name(),
        repo.branch
    );

    Ok(client)
}

#[derive(Debug, Deserialize)]
struct CommitEntry {
    sha: String,
    commit: CommitDetail,
}

#[derive(Debug, Deserialize)]
struct CommitDetail {
    committer: Option<Signature>,
    author: Option<Signature>,
}

#[derive(Debug, Deserialize)]
struct Signature {
    date: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct ContentItem {
    name: String,
}

/// Parse a commits-list payload and take its first entry.
///
/// Both providers return `[{"sha": ..., "commit": {"committer": {"date": ...}}}]`.
pub(crate) fn parse_latest_commit(body: &str) -> Option<CommitInfo> {
    let entries: Vec<CommitEntry> = match serde_json::from_str(body) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!("Failed to parse commit list: {}", e);
            return None;
        }
    };

    let first = entries.into_iter().next()?;
    if first.sha.is_empty() {
        return None;
    }

    let date = first
        .commit
        .committer
        .or(first.commit.author)
        .map(|s| s.date)?;

    Some(CommitInfo::new(first.sha, date))
}

/// Parse a directory-listing payload into entry names.
pub(crate) fn parse_directory(body: &str) -> Option<Vec<String>> {
    match serde_json::from_str::<Vec<ContentItem>>(body) {
        Ok(items) => Some(items.into_iter().map(|i| i.name).collect()),
        Err(e) => {
            tracing::warn!("Failed to parse directory listing: {}", e);
            None
        }
    }
}
