//! Staleness decisions.
//!
//! A resource needs an update when the repository has a commit for it that
//! is older than the kind's grace period and differs from the newest cached
//! version. A freshly pushed commit is left alone until it has settled, so a
//! quick follow-up fix is not downloaded twice.

use chrono::{Duration, Utc};
use std::collections::HashMap;
use std::sync::Arc;

use crate::cache::ContentCacheStore;
use crate::repository::{CommitInfo, RepositoryClient};
use crate::resource::{RepositoryRole, ResourceKind};

/// Outcome of comparing the remote commit with the cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Freshness {
    /// No commit information (missing file, network failure, rate limit).
    Unknown,
    /// The latest commit is still inside its grace period.
    TooRecent(CommitInfo),
    /// The cache already holds the latest commit.
    Current(CommitInfo),
    /// The latest commit is settled and not cached yet.
    Stale(CommitInfo),
}

impl Freshness {
    /// Whether the remote version should be downloaded.
    pub fn should_update(&self) -> bool {
        matches!(self, Freshness::Stale(_))
    }

    /// The commit the decision was based on.
    pub fn commit(&self) -> Option<&CommitInfo> {
        match self {
            Freshness::Unknown => None,
            Freshness::TooRecent(c) | Freshness::Current(c) | Freshness::Stale(c) => Some(c),
        }
    }
}

/// Decides whether cached resources are out of date.
pub struct FreshnessResolver {
    repositories: HashMap<RepositoryRole, Arc<dyn RepositoryClient>>,
    cache: ContentCacheStore,
    grace_periods: HashMap<ResourceKind, Duration>,
}

impl FreshnessResolver {
    /// Create a resolver using each kind's default grace period.
    pub fn new(
        repositories: HashMap<RepositoryRole, Arc<dyn RepositoryClient>>,
        cache: ContentCacheStore,
    ) -> Self {
        let grace_periods = ResourceKind::ALL
            .iter()
            .map(|&k| (k, k.default_grace_period()))
            .collect();

        Self {
            repositories,
            cache,
            grace_periods,
        }
    }

    /// Override the grace period for one kind.
    pub fn with_grace_period(mut self, kind: ResourceKind, grace: Duration) -> Self {
        self.grace_periods.insert(kind, grace);
        self
    }

    pub fn grace_period(&self, kind: ResourceKind) -> Duration {
        self.grace_periods
            .get(&kind)
            .copied()
            .unwrap_or_else(|| kind.default_grace_period())
    }

    /// Whether `commit` is old enough to be trusted for `kind`.
    pub fn is_settled(&self, kind: ResourceKind, commit: &CommitInfo) -> bool {
        Utc::now() - commit.commit_date >= self.grace_period(kind)
    }

    /// Compare the latest remote commit with the newest cached version.
    pub fn evaluate(&self, kind: ResourceKind, language: &str) -> Freshness {
        let Some(repository) = self.repositories.get(&kind.repository()) else {
            tracing::warn!("No repository configured for {}", kind);
            return Freshness::Unknown;
        };

        let path = kind.remote_path(language);
        let commit = match repository.latest_commit_info(&path) {
            Ok(Some(commit)) => commit,
            Ok(None) => {
                tracing::debug!("No commit information for {}", path);
                return Freshness::Unknown;
            }
            Err(e) => {
                tracing::debug!("Commit lookup for {} failed: {}", path, e);
                return Freshness::Unknown;
            }
        };

        if !self.is_settled(kind, &commit) {
            tracing::debug!(
                "Commit {} for {}/{} is inside its grace period",
                commit.short_hash(),
                kind,
                language
            );
            return Freshness::TooRecent(commit);
        }

        match self.cache.latest_cached_info(kind, language) {
            Some(cached) if cached.commit_hash == commit.commit_hash => Freshness::Current(commit),
            _ => Freshness::Stale(commit),
        }
    }

    /// Whether a new version of the resource should be downloaded.
    pub fn should_update(&self, kind: ResourceKind, language: &str) -> bool {
        self.evaluate(kind, language).should_update()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::fake::FakeRepository;
    use tempfile::TempDir;

    const PATH: &str = "Languages/fr-FR/launcher-terms.md";

    fn resolver(temp: &TempDir, fake: &Arc<FakeRepository>) -> FreshnessResolver {
        let client: Arc<dyn RepositoryClient> = fake.clone();
        let repositories = HashMap::from([
            (RepositoryRole::Translations, Arc::clone(&client)),
            (RepositoryRole::Documentation, client),
        ]);
        FreshnessResolver::new(repositories, ContentCacheStore::new(temp.path()))
    }

    #[test]
    fn settled_new_commit_is_stale() {
        let temp = TempDir::new().unwrap();
        let fake = Arc::new(FakeRepository::new().with_file(
            PATH,
            "def4567",
            Utc::now() - Duration::minutes(20),
            "terms",
        ));
        let resolver = resolver(&temp, &fake);

        assert!(resolver.should_update(ResourceKind::LauncherTerms, "fr-FR"));
    }

    #[test]
    fn commit_inside_grace_period_is_not_fetched() {
        let temp = TempDir::new().unwrap();
        let fake = Arc::new(FakeRepository::new().with_file(
            PATH,
            "def4567",
            Utc::now() - Duration::minutes(5),
            "terms",
        ));
        ContentCacheStore::new(temp.path())
            .save_to_cache(
                ResourceKind::LauncherTerms,
                "fr-FR",
                "old terms",
                "abc1234",
                Utc::now() - Duration::days(3),
            )
            .unwrap();
        let resolver = resolver(&temp, &fake);

        let freshness = resolver.evaluate(ResourceKind::LauncherTerms, "fr-FR");
        assert!(matches!(freshness, Freshness::TooRecent(_)));
        assert!(!freshness.should_update());
    }

    #[test]
    fn matching_cache_is_current() {
        let temp = TempDir::new().unwrap();
        let date = Utc::now() - Duration::hours(2);
        let fake = Arc::new(FakeRepository::new().with_file(PATH, "abc1234", date, "terms"));
        ContentCacheStore::new(temp.path())
            .save_to_cache(ResourceKind::LauncherTerms, "fr-FR", "terms", "abc1234", date)
            .unwrap();
        let resolver = resolver(&temp, &fake);

        assert!(matches!(
            resolver.evaluate(ResourceKind::LauncherTerms, "fr-FR"),
            Freshness::Current(_)
        ));
    }

    #[test]
    fn differing_cache_hash_is_stale() {
        let temp = TempDir::new().unwrap();
        let fake = Arc::new(FakeRepository::new().with_file(
            PATH,
            "def4567",
            Utc::now() - Duration::minutes(20),
            "new",
        ));
        ContentCacheStore::new(temp.path())
            .save_to_cache(
                ResourceKind::LauncherTerms,
                "fr-FR",
                "old",
                "abc1234",
                Utc::now() - Duration::days(1),
            )
            .unwrap();
        let resolver = resolver(&temp, &fake);

        let freshness = resolver.evaluate(ResourceKind::LauncherTerms, "fr-FR");
        assert_eq!(freshness.commit().unwrap().commit_hash, "def4567");
        assert!(freshness.should_update());
    }

    #[test]
    fn missing_commit_is_unknown() {
        let temp = TempDir::new().unwrap();
        let fake = Arc::new(FakeRepository::new());
        let resolver = resolver(&temp, &fake);

        assert_eq!(
            resolver.evaluate(ResourceKind::Locale, "fr-FR"),
            Freshness::Unknown
        );
    }

    #[test]
    fn rate_limited_lookup_is_unknown() {
        let temp = TempDir::new().unwrap();
        let fake = Arc::new(FakeRepository::new().with_file(
            PATH,
            "def4567",
            Utc::now() - Duration::hours(1),
            "x",
        ));
        fake.set_rate_limited(Some(None));
        let resolver = resolver(&temp, &fake);

        assert!(!resolver.should_update(ResourceKind::LauncherTerms, "fr-FR"));
    }

    #[test]
    fn answer_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let fake = Arc::new(FakeRepository::new().with_file(
            PATH,
            "def4567",
            Utc::now() - Duration::minutes(30),
            "x",
        ));
        let resolver = resolver(&temp, &fake);

        let first = resolver.should_update(ResourceKind::LauncherTerms, "fr-FR");
        let second = resolver.should_update(ResourceKind::LauncherTerms, "fr-FR");
        assert_eq!(first, second);
    }

    #[test]
    fn grace_period_is_configurable_per_kind() {
        let temp = TempDir::new().unwrap();
        let fake = Arc::new(FakeRepository::new().with_file(
            PATH,
            "def4567",
            Utc::now() - Duration::minutes(20),
            "x",
        ));
        let resolver = resolver(&temp, &fake)
            .with_grace_period(ResourceKind::LauncherTerms, Duration::hours(1));

        assert_eq!(
            resolver.grace_period(ResourceKind::LauncherTerms),
            Duration::hours(1)
        );
        assert_eq!(
            resolver.grace_period(ResourceKind::Locale),
            Duration::minutes(15)
        );
        assert!(!resolver.should_update(ResourceKind::LauncherTerms, "fr-FR"));
    }

    #[test]
    fn readme_uses_documentation_path() {
        let temp = TempDir::new().unwrap();
        let fake = Arc::new(FakeRepository::new().with_file(
            "fr_FR-README.md",
            "1234567",
            Utc::now() - Duration::hours(1),
            "# Lisez-moi",
        ));
        let resolver = resolver(&temp, &fake);

        assert!(resolver.should_update(ResourceKind::Readme, "fr-FR"));
    }
}
