//! In-memory [`RepositoryClient`] for unit tests.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use super::{CommitInfo, RepositoryClient};
use crate::error::{ContentError, Result};

#[derive(Default)]
pub(crate) struct FakeRepository {
    files: Mutex<HashMap<String, (CommitInfo, String)>>,
    rate_limited: Mutex<Option<Option<DateTime<Utc>>>>,
    exhausted_until: Mutex<Option<DateTime<Utc>>>,
    delay: Mutex<Option<Duration>>,
    calls: AtomicUsize,
    downloads: AtomicUsize,
}

impl FakeRepository {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_file(
        self,
        path: &str,
        hash: &str,
        date: DateTime<Utc>,
        content: &str,
    ) -> Self {
        self.set_file(path, hash, date, content);
        self
    }

    pub(crate) fn set_file(&self, path: &str, hash: &str, date: DateTime<Utc>, content: &str) {
        self.files.lock().unwrap().insert(
            path.to_string(),
            (CommitInfo::new(hash, date), content.to_string()),
        );
    }

    /// `Some(reset)` makes every call fail as rate limited.
    pub(crate) fn set_rate_limited(&self, state: Option<Option<DateTime<Utc>>>) {
        *self.rate_limited.lock().unwrap() = state;
    }

    pub(crate) fn set_exhausted_until(&self, reset: DateTime<Utc>) {
        *self.exhausted_until.lock().unwrap() = Some(reset);
    }

    pub(crate) fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = Some(delay);
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(crate) fn downloads(&self) -> usize {
        self.downloads.load(Ordering::SeqCst)
    }

    fn enter(&self) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = *self.delay.lock().unwrap() {
            std::thread::sleep(delay);
        }
        match *self.rate_limited.lock().unwrap() {
            Some(reset_at) => Err(ContentError::RateLimited { reset_at }),
            None => Ok(()),
        }
    }
}

impl RepositoryClient for FakeRepository {
    fn latest_commit_info(&self, path: &str) -> Result<Option<CommitInfo>> {
        self.enter()?;
        Ok(self.files.lock().unwrap().get(path).map(|(c, _)| c.clone()))
    }

    fn file_exists(&self, path: &str) -> Result<bool> {
        self.enter()?;
        Ok(self.files.lock().unwrap().contains_key(path))
    }

    fn download_content(&self, path: &str) -> Result<Option<String>> {
        self.enter()?;
        self.downloads.fetch_add(1, Ordering::SeqCst);
        Ok(self.files.lock().unwrap().get(path).map(|(_, s)| s.clone()))
    }

    fn directory_contents(&self, path: &str) -> Result<Option<Vec<String>>> {
        self.enter()?;
        let prefix = format!("{}/", path.trim_end_matches('/'));
        let mut names: Vec<String> = self
            .files
            .lock()
            .unwrap()
            .keys()
            .filter_map(|k| k.strip_prefix(&prefix))
            .filter_map(|rest| rest.split('/').next())
            .map(str::to_string)
            .collect();
        if names.is_empty() {
            return Ok(None);
        }
        names.sort();
        names.dedup();
        Ok(Some(names))
    }

    fn observed_rate_limit(&self) -> Option<DateTime<Utc>> {
        self.exhausted_until.lock().unwrap().take()
    }
}
