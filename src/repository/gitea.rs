//! Gitea (and Forgejo) backend.
//!
//! The API lives under `{host}/api/v1` and raw files are served by the web
//! host itself, so one base URL covers both unless overridden.

use chrono::{DateTime, Utc};
use reqwest::Url;

use super::http::HttpTransport;
use super::{parse_directory, parse_latest_commit, CommitInfo, RepositoryClient};
use crate::config::schema::RepositoryDescriptor;
use crate::error::Result;

const ACCEPT: &str = "application/json";

pub struct GiteaClient {
    transport: HttpTransport,
    api_url: String,
    raw_url: String,
    owner: String,
    repo: String,
    branch: String,
}

impl GiteaClient {
    pub fn new(descriptor: &RepositoryDescriptor, transport: HttpTransport) -> Self {
        let host = descriptor.host.trim_end_matches('/');
        Self {
            transport,
            api_url: descriptor
                .api_url
                .clone()
                .unwrap_or_else(|| format!("{}/api/v1", host))
                .trim_end_matches('/')
                .to_string(),
            raw_url: descriptor
                .raw_url
                .clone()
                .unwrap_or_else(|| host.to_string())
                .trim_end_matches('/')
                .to_string(),
            owner: descriptor.owner.clone(),
            repo: descriptor.repository.clone(),
            branch: descriptor.branch.clone(),
        }
    }

    fn repo_url(&self, rest: &str) -> Option<Url> {
        Url::parse(&format!(
            "{}/repos/{}/{}/{}",
            self.api_url, self.owner, self.repo, rest
        ))
        .ok()
    }

    fn commits_url(&self, path: &str) -> Option<Url> {
        let mut url = self.repo_url("commits")?;
        url.query_pairs_mut()
            .append_pair("path", path)
            .append_pair("sha", &self.branch)
            .append_pair("limit", "1");
        Some(url)
    }

    fn contents_url(&self, path: &str) -> Option<Url> {
        let mut url = self.repo_url(&format!("contents/{}", path.trim_matches('/')))?;
        url.query_pairs_mut().append_pair("ref", &self.branch);
        Some(url)
    }

    fn raw_content_url(&self, path: &str) -> String {
        format!(
            "{}/{}/{}/raw/branch/{}/{}",
            self.raw_url,
            self.owner,
            self.repo,
            self.branch,
            path.trim_start_matches('/')
        )
    }
}

impl RepositoryClient for GiteaClient {
    fn latest_commit_info(&self, path: &str) -> Result<Option<CommitInfo>> {
        let Some(url) = self.commits_url(path) else {
            return Ok(None);
        };
        let body = self.transport.get_text(url.as_str(), Some(ACCEPT))?;
        Ok(body.as_deref().and_then(parse_latest_commit))
    }

    fn file_exists(&self, path: &str) -> Result<bool> {
        match self.contents_url(path) {
            Some(url) => self.transport.exists(url.as_str(), Some(ACCEPT)),
            None => Ok(false),
        }
    }

    fn download_content(&self, path: &str) -> Result<Option<String>> {
        let url = self.raw_content_url(path);
        tracing::debug!("Downloading from: {}", url);
        self.transport.get_text(&url, None)
    }

    fn directory_contents(&self, path: &str) -> Result<Option<Vec<String>>> {
        let Some(url) = self.contents_url(path) else {
            return Ok(None);
        };
        let body = self.transport.get_text(url.as_str(), Some(ACCEPT))?;
        Ok(body.as_deref().and_then(parse_directory))
    }

    fn observed_rate_limit(&self) -> Option<DateTime<Utc>> {
        self.transport.take_exhausted_until()
    }
}
