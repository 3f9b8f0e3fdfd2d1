//! GitHub backend.
//!
//! API calls go to `api.github.com`; file content comes from the separate
//! `raw.githubusercontent.com` host with the same auth header.

use chrono::{DateTime, Utc};
use reqwest::Url;

use super::http::HttpTransport;
use super::{parse_directory, parse_latest_commit, CommitInfo, RepositoryClient};
use crate::config::schema::RepositoryDescriptor;
use crate::error::Result;

const API_URL: &str = "https://api.github.com";
const RAW_URL: &str = "https://raw.githubusercontent.com";
const ACCEPT: &str = "application/vnd.github.v3+json";

pub struct GitHubClient {
    transport: HttpTransport,
    api_url: String,
    raw_url: String,
    owner: String,
    repo: String,
    branch: String,
}

impl GitHubClient {
    pub fn new(descriptor: &RepositoryDescriptor, transport: HttpTransport) -> Self {
        Self {
            transport,
            api_url: descriptor
                .api_url
                .clone()
                .unwrap_or_else(|| API_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            raw_url: descriptor
                .raw_url
                .clone()
                .unwrap_or_else(|| RAW_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            owner: descriptor.owner.clone(),
            repo: descriptor.repository.clone(),
            branch: descriptor.branch.clone(),
        }
    }

    fn commits_url(&self, path: &str) -> Option<Url> {
        let mut url = Url::parse(&format!(
            "{}/repos/{}/{}/commits",
            self.api_url, self.owner, self.repo
        ))
        .ok()?;
        url.query_pairs_mut()
            .append_pair("path", path)
            .append_pair("sha", &self.branch)
            .append_pair("per_page", "1");
        Some(url)
    }

    fn contents_url(&self, path: &str) -> Option<Url> {
        let mut url = Url::parse(&format!(
            "{}/repos/{}/{}/contents/{}",
            self.api_url,
            self.owner,
            self.repo,
            path.trim_matches('/')
        ))
        .ok()?;
        url.query_pairs_mut().append_pair("ref", &self.branch);
        Some(url)
    }

    fn raw_content_url(&self, path: &str) -> String {
        format!(
            "{}/{}/{}/{}/{}",
            self.raw_url,
            self.owner,
            self.repo,
            self.branch,
            path.trim_start_matches('/')
        )
    }
}

impl RepositoryClient for GitHubClient {
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

        let content = self.transport.get_text(&url, None)?;
        if let Some(content) = &content {
            tracing::debug!("Downloaded {} ({} bytes)", path, content.len());
        }
        Ok(content)
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
