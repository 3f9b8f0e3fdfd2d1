//! Cache metadata types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::repository::CommitInfo;
use crate::resource::ResourceKind;

/// Sidecar metadata stored next to every cached content file.
///
/// Serialised as `{"commitHash": "...", "commitDate": "<RFC3339>"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheInfo {
    /// Full commit hash the content was downloaded at.
    pub commit_hash: String,
    /// Date of that commit.
    pub commit_date: DateTime<Utc>,
}

impl CacheInfo {
    pub fn new(commit_hash: impl Into<String>, commit_date: DateTime<Utc>) -> Self {
        Self {
            commit_hash: commit_hash.into(),
            commit_date,
        }
    }
}

impl From<CommitInfo> for CacheInfo {
    fn from(commit: CommitInfo) -> Self {
        Self::new(commit.commit_hash, commit.commit_date)
    }
}

/// One content file found in the cache directory.
#[derive(Debug, Clone, Serialize)]
pub struct CachedEntry {
    /// Resource kind parsed from the file name.
    pub kind: ResourceKind,
    /// Language parsed from the file name.
    pub language: String,
    /// Short hash parsed from the file name.
    pub short_hash: String,
    /// Path of the content file.
    pub content_path: PathBuf,
    /// Parsed sidecar, `None` when missing or unreadable.
    pub info: Option<CacheInfo>,
    /// Size of the content file in bytes.
    pub size_bytes: u64,
}

impl CachedEntry {
    /// Whether the entry has a sidecar matching its file name.
    pub fn is_complete(&self) -> bool {
        self.info
            .as_ref()
            .is_some_and(|i| i.commit_hash.starts_with(&self.short_hash))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn sidecar_json_uses_camel_case() {
        let info = CacheInfo::new(
            "abc1234def",
            Utc.with_ymd_and_hms(2024, 6, 1, 8, 30, 0).unwrap(),
        );
        let json = serde_json::to_string(&info).unwrap();

        assert_eq!(
            json,
            r#"{"commitHash":"abc1234def","commitDate":"2024-06-01T08:30:00Z"}"#
        );
    }

    #[test]
    fn reads_offset_dates() {
        let info: CacheInfo = serde_json::from_str(
            r#"{"commitHash": "abc", "commitDate": "2024-06-01T10:30:00+02:00"}"#,
        )
        .unwrap();
        assert_eq!(
            info.commit_date,
            Utc.with_ymd_and_hms(2024, 6, 1, 8, 30, 0).unwrap()
        );
    }

    #[test]
    fn entry_completeness_checks_hash_prefix() {
        let mut entry = CachedEntry {
            kind: ResourceKind::Locale,
            language: "fr-FR".to_string(),
            short_hash: "abc1234".to_string(),
            content_path: PathBuf::from("locale-fr-FR-abc1234.json"),
            info: None,
            size_bytes: 0,
        };
        assert!(!entry.is_complete());

        entry.info = Some(CacheInfo::new("abc1234ffff", Utc::now()));
        assert!(entry.is_complete());

        entry.info = Some(CacheInfo::new("0000000", Utc::now()));
        assert!(!entry.is_complete());
    }
}
