//! File-backed content cache.
//!
//! Every cached version is a pair of files in one flat directory:
//!
//! ```text
//! locale-fr-FR-abc1234.json        content
//! locale-fr-FR-abc1234.json.info   {"commitHash": ..., "commitDate": ...}
//! ```
//!
//! Content is written before its sidecar, so an interrupted save leaves a
//! content file without sidecar, which reads as a miss. Files are never
//! rewritten; a newer version supersedes older ones and they are deleted.

use anyhow::Context;
use chrono::{DateTime, Utc};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use super::entry::{CacheInfo, CachedEntry};
use crate::error::Result;
use crate::repository::short_hash;
use crate::resource::ResourceKind;

const INFO_SUFFIX: &str = ".info";
const TEMP_SUFFIX: &str = ".tmp";

/// Versioned content cache rooted at one directory.
///
/// Saves for the same (kind, language) must be serialised by the caller,
/// see [`KeyLocks`](super::KeyLocks).
#[derive(Debug, Clone)]
pub struct ContentCacheStore {
    root: PathBuf,
}

impl ContentCacheStore {
    /// Create a store rooted at `root`. The directory is created lazily.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Get the cache root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn ensure_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.root)
            .with_context(|| format!("Failed to create cache directory {:?}", self.root))?;
        Ok(())
    }

    /// File name of the content for one version.
    pub fn content_file_name(kind: ResourceKind, language: &str, commit_hash: &str) -> String {
        format!(
            "{}-{}-{}.{}",
            kind.slug(),
            language,
            short_hash(commit_hash),
            kind.extension()
        )
    }

    /// Path of the content for one version.
    pub fn content_path(&self, kind: ResourceKind, language: &str, commit_hash: &str) -> PathBuf {
        self.root
            .join(Self::content_file_name(kind, language, commit_hash))
    }

    /// Save content downloaded at `commit_hash` and drop every other version
    /// of the same resource.
    pub fn save_to_cache(
        &self,
        kind: ResourceKind,
        language: &str,
        content: &str,
        commit_hash: &str,
        commit_date: DateTime<Utc>,
    ) -> Result<CacheInfo> {
        self.ensure_dir()?;

        let info = CacheInfo::new(commit_hash, commit_date);
        let content_path = self.content_path(kind, language, commit_hash);
        let info_path = info_path(&content_path);

        if self.read_info(&info_path).as_ref() == Some(&info) && content_path.exists() {
            tracing::debug!(
                "Cache for {}/{} at {} already present",
                kind,
                language,
                short_hash(commit_hash)
            );
        } else {
            write_atomic(&content_path, content.as_bytes())?;
            let sidecar = serde_json::to_string_pretty(&info).map_err(anyhow::Error::from)?;
            write_atomic(&info_path, sidecar.as_bytes())?;
            tracing::debug!("Cached {} ({} bytes)", content_path.display(), content.len());
        }

        let keep = [content_path, info_path];
        let removed = self.remove_matching(kind, language, |path| !keep.iter().any(|k| k == path))?;
        if removed > 0 {
            tracing::debug!(
                "Removed {} superseded cache file(s) for {}/{}",
                removed,
                kind,
                language
            );
        }

        Ok(info)
    }

    /// Cached content for exactly `commit_hash`.
    ///
    /// A missing or mismatched sidecar, or a sidecar without content, is a
    /// miss.
    pub fn get_cached(
        &self,
        kind: ResourceKind,
        language: &str,
        commit_hash: &str,
    ) -> Option<(String, CacheInfo)> {
        let content_path = self.content_path(kind, language, commit_hash);
        let info = self.read_info(&info_path(&content_path))?;

        if info.commit_hash != commit_hash {
            tracing::debug!(
                "Cache sidecar for {} names commit {}, wanted {}",
                content_path.display(),
                info.commit_hash,
                commit_hash
            );
            return None;
        }

        match fs::read_to_string(&content_path) {
            Ok(content) => Some((content, info)),
            Err(e) => {
                tracing::debug!("Cache miss for {}: {}", content_path.display(), e);
                None
            }
        }
    }

    /// Content of the newest complete cached version, by commit date.
    pub fn read_latest_cached(&self, kind: ResourceKind, language: &str) -> Option<String> {
        let entry = self.latest_entry(kind, language)?;
        match fs::read_to_string(&entry.content_path) {
            Ok(content) => Some(content),
            Err(e) => {
                tracing::warn!(
                    "Failed to read cached {}: {}",
                    entry.content_path.display(),
                    e
                );
                None
            }
        }
    }

    /// Sidecar of the newest complete cached version, by commit date.
    pub fn latest_cached_info(&self, kind: ResourceKind, language: &str) -> Option<CacheInfo> {
        self.latest_entry(kind, language)?.info
    }

    /// All content files in the cache, newest commit first.
    pub fn list(&self) -> Result<Vec<CachedEntry>> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }

        let mut entries = Vec::new();

        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            let path = entry.path();
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            let Some(parsed) = parse_file_name(name) else {
                continue;
            };
            if parsed.is_info {
                continue;
            }

            let size_bytes = entry.metadata().map(|m| m.len()).unwrap_or(0);
            entries.push(CachedEntry {
                kind: parsed.kind,
                language: parsed.language,
                short_hash: parsed.short_hash,
                info: self.read_info(&info_path(&path)),
                content_path: path,
                size_bytes,
            });
        }

        entries.sort_by(|a, b| {
            let a_date = a.info.as_ref().map(|i| i.commit_date);
            let b_date = b.info.as_ref().map(|i| i.commit_date);
            b_date.cmp(&a_date)
        });
        Ok(entries)
    }

    /// Delete every cached file for one resource. Returns the number of
    /// files removed.
    pub fn remove(&self, kind: ResourceKind, language: &str) -> Result<usize> {
        self.remove_matching(kind, language, |_| true)
    }

    /// Delete every cached file. Returns the number of files removed.
    ///
    /// Files that do not follow the cache naming scheme are left alone.
    pub fn clear(&self) -> Result<usize> {
        if !self.root.exists() {
            return Ok(0);
        }

        let mut removed = 0;
        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            let recognised = path
                .file_name()
                .and_then(|n| n.to_str())
                .and_then(parse_file_name)
                .is_some();
            if recognised {
                delete_file(&path)?;
                removed += 1;
            }
        }

        Ok(removed)
    }

    fn latest_entry(&self, kind: ResourceKind, language: &str) -> Option<CachedEntry> {
        let entries = match self.list() {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!("Failed to scan cache {}: {}", self.root.display(), e);
                return None;
            }
        };

        entries
            .into_iter()
            .filter(|e| e.kind == kind && e.language == language)
            .filter(|e| {
                let complete = e.is_complete();
                if !complete {
                    tracing::debug!("Ignoring incomplete cache entry {}", e.content_path.display());
                }
                complete
            })
            .max_by_key(|e| e.info.as_ref().map(|i| i.commit_date))
    }

    fn read_info(&self, path: &Path) -> Option<CacheInfo> {
        let raw = fs::read_to_string(path).ok()?;
        match serde_json::from_str(&raw) {
            Ok(info) => Some(info),
            Err(e) => {
                tracing::warn!("Unreadable cache sidecar {}: {}", path.display(), e);
                None
            }
        }
    }

    fn remove_matching(
        &self,
        kind: ResourceKind,
        language: &str,
        predicate: impl Fn(&Path) -> bool,
    ) -> Result<usize> {
        if !self.root.exists() {
            return Ok(0);
        }

        let mut removed = 0;
        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            let Some(parsed) = path
                .file_name()
                .and_then(|n| n.to_str())
                .and_then(parse_file_name)
            else {
                continue;
            };

            if parsed.kind == kind && parsed.language == language && predicate(&path) {
                delete_file(&path)?;
                removed += 1;
            }
        }

        Ok(removed)
    }
}

/// Components of a cache file name.
#[derive(Debug, PartialEq, Eq)]
struct ParsedName {
    kind: ResourceKind,
    language: String,
    short_hash: String,
    is_info: bool,
}

/// Parse `{slug}-{language}-{short}.{ext}[.info]`.
///
/// The language is everything between the slug and the last dash, so `en`
/// and `en-US` files never match each other.
fn parse_file_name(name: &str) -> Option<ParsedName> {
    if name.ends_with(TEMP_SUFFIX) {
        return None;
    }

    let (name, is_info) = match name.strip_suffix(INFO_SUFFIX) {
        Some(base) => (base, true),
        None => (name, false),
    };

    ResourceKind::ALL.iter().find_map(|&kind| {
        let rest = name.strip_prefix(kind.slug())?.strip_prefix('-')?;
        let stem = rest
            .strip_suffix(kind.extension())?
            .strip_suffix('.')?;
        let (language, short) = stem.rsplit_once('-')?;

        if language.is_empty() || short.is_empty() || short.contains('.') {
            return None;
        }

        Some(ParsedName {
            kind,
            language: language.to_string(),
            short_hash: short.to_string(),
            is_info,
        })
    })
}

fn info_path(content_path: &Path) -> PathBuf {
    let mut name = OsString::from(content_path.as_os_str());
    name.push(INFO_SUFFIX);
    PathBuf::from(name)
}

/// Write via a temp file and rename so readers never see partial content.
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let mut temp = OsString::from(path.as_os_str());
    temp.push(TEMP_SUFFIX);
    let temp = PathBuf::from(temp);

    fs::write(&temp, bytes).with_context(|| format!("Failed to write {:?}", temp))?;
    fs::rename(&temp, path).with_context(|| format!("Failed to move {:?} into place", path))?;
    Ok(())
}

/// Delete a cache file, clearing a read-only flag left by older versions.
#[allow(clippy::permissions_set_readonly_false)]
fn delete_file(path: &Path) -> Result<()> {
    if let Ok(metadata) = fs::metadata(path) {
        let mut permissions = metadata.permissions();
        if permissions.readonly() {
            permissions.set_readonly(false);
            fs::set_permissions(path, permissions)?;
        }
    }

    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}
