//! Rate-limit aware repository decorator.

use chrono::{DateTime, Utc};
use std::sync::Arc;

use super::is_rate_limit_message;
use super::limiter::RateLimiter;
use crate::error::{ContentError, Result};
use crate::repository::{CommitInfo, RepositoryClient};

/// Wraps a [`RepositoryClient`] so that every call consults the shared
/// [`RateLimiter`] first and reports refusals back to it.
///
/// While the limit is active no request reaches the inner client and every
/// call fails with [`ContentError::RateLimited`]. Errors whose message
/// mentions a rate limit are treated as typed refusals.
pub struct GuardedRepository {
    inner: Arc<dyn RepositoryClient>,
    limiter: Arc<RateLimiter>,
}

impl GuardedRepository {
    pub fn new(inner: Arc<dyn RepositoryClient>, limiter: Arc<RateLimiter>) -> Self {
        Self { inner, limiter }
    }

    pub fn limiter(&self) -> &Arc<RateLimiter> {
        &self.limiter
    }

    fn guard<T>(
        &self,
        endpoint: &str,
        call: impl FnOnce(&dyn RepositoryClient) -> Result<T>,
    ) -> Result<T> {
        if !self.limiter.can_make_request(endpoint) {
            return Err(ContentError::RateLimited {
                reset_at: self.limiter.reset_at(),
            });
        }

        match call(self.inner.as_ref()) {
            Err(e) if e.is_rate_limited() || is_rate_limit_message(&e.to_string()) => {
                match e {
                    ContentError::RateLimited {
                        reset_at: Some(reset),
                    } => self.limiter.handle_rate_limit_until(reset),
                    _ => self.limiter.handle_rate_limit(),
                }
                Err(ContentError::RateLimited {
                    reset_at: self.limiter.reset_at(),
                })
            }
            result => {
                if let Some(reset) = self.inner.observed_rate_limit() {
                    tracing::debug!("Rate-limit budget exhausted after {}", endpoint);
                    self.limiter.handle_rate_limit_until(reset);
                }
                result
            }
        }
    }
}

impl RepositoryClient for GuardedRepository {
    fn latest_commit_info(&self, path: &str) -> Result<Option<CommitInfo>> {
        self.guard("commits", |c| c.latest_commit_info(path))
    }

    fn file_exists(&self, path: &str) -> Result<bool> {
        self.guard("contents", |c| c.file_exists(path))
    }

    fn download_content(&self, path: &str) -> Result<Option<String>> {
        self.guard("raw", |c| c.download_content(path))
    }

    fn directory_contents(&self, path: &str) -> Result<Option<Vec<String>>> {
        self.guard("contents", |c| c.directory_contents(path))
    }

    fn observed_rate_limit(&self) -> Option<DateTime<Utc>> {
        None
    }
}
