//! Content retrieval with ordered fallbacks.
//!
//! [`ContentService::get_content`] always returns displayable text. It tries,
//! in order:
//!
//! 1. **Live**: download when the remote commit is newer than the cache and
//!    settled (skipped while rate limited)
//! 2. **Cached**: newest cached version for the requested language
//! 3. **Embedded**: bundled resource for the requested language
//! 4. **Default cached / embedded**: the same two tiers for the default
//!    language, never a live fetch
//! 5. **Placeholder**: [`ERROR_PLACEHOLDER`]

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::bundled::{BundledResources, EmbeddedResources};
use crate::cache::{ContentCacheStore, KeyLocks};
use crate::config::{validate, ContentConfig};
use crate::error::Result;
use crate::freshness::{Freshness, FreshnessResolver};
use crate::rate_limit::{GuardedRepository, RateLimiter};
use crate::repository::{create_client, RepositoryClient};
use crate::resource::{LogicalKey, RepositoryRole, ResourceKind, DEFAULT_LANGUAGE};
use crate::state::StateStore;

/// Text returned when no tier produced content.
pub const ERROR_PLACEHOLDER: &str = "Error loading content.";

/// Which tier satisfied a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    Live,
    Cached,
    Embedded,
    DefaultCached,
    DefaultEmbedded,
    Placeholder,
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Tier::Live => "live",
            Tier::Cached => "cached",
            Tier::Embedded => "embedded",
            Tier::DefaultCached => "default-language cached",
            Tier::DefaultEmbedded => "default-language embedded",
            Tier::Placeholder => "placeholder",
        };
        f.write_str(name)
    }
}

/// Entry point for versioned remote resources.
///
/// Shared between threads behind an `Arc`. Requests for the same resource
/// are serialised during the live tier; other resources proceed in parallel.
pub struct ContentService {
    repositories: HashMap<RepositoryRole, Arc<dyn RepositoryClient>>,
    limiter: Arc<RateLimiter>,
    cache: ContentCacheStore,
    freshness: FreshnessResolver,
    bundled: Arc<dyn BundledResources>,
    locks: KeyLocks,
    default_language: String,
}

impl ContentService {
    /// Assemble a service from its collaborators.
    ///
    /// Every repository client is wrapped so that it honours `limiter`.
    pub fn new(
        repositories: HashMap<RepositoryRole, Arc<dyn RepositoryClient>>,
        limiter: Arc<RateLimiter>,
        cache: ContentCacheStore,
        bundled: Arc<dyn BundledResources>,
    ) -> Self {
        let repositories: HashMap<RepositoryRole, Arc<dyn RepositoryClient>> = repositories
            .into_iter()
            .map(|(role, client)| {
                let guarded: Arc<dyn RepositoryClient> =
                    Arc::new(GuardedRepository::new(client, Arc::clone(&limiter)));
                (role, guarded)
            })
            .collect();

        let freshness = FreshnessResolver::new(repositories.clone(), cache.clone());

        Self {
            repositories,
            limiter,
            cache,
            freshness,
            bundled,
            locks: KeyLocks::new(),
            default_language: DEFAULT_LANGUAGE.to_string(),
        }
    }

    /// Build a service from configuration.
    ///
    /// This is the only place configuration problems surface as errors.
    pub fn from_config(config: &ContentConfig) -> Result<Self> {
        validate(config)?;

        let cache_dir = config.cache.dir();
        let limiter = Arc::new(RateLimiter::new(StateStore::in_dir(&cache_dir)));

        let mut repositories = HashMap::new();
        for role in [RepositoryRole::Translations, RepositoryRole::Documentation] {
            repositories.insert(role, create_client(config.repository(role), &config.http)?);
        }

        let mut service = Self::new(
            repositories,
            limiter,
            ContentCacheStore::new(cache_dir),
            Arc::new(EmbeddedResources::new()),
        )
        .with_default_language(&config.settings.default_language);

        for kind in ResourceKind::ALL {
            service = service.with_grace_period(kind, config.grace_period(kind));
        }

        Ok(service)
    }

    /// Set the language used for the default tiers.
    pub fn with_default_language(mut self, language: impl Into<String>) -> Self {
        self.default_language = language.into();
        self
    }

    /// Override the grace period for one kind.
    pub fn with_grace_period(mut self, kind: ResourceKind, grace: Duration) -> Self {
        self.freshness = self.freshness.with_grace_period(kind, grace);
        self
    }

    pub fn default_language(&self) -> &str {
        &self.default_language
    }

    pub fn cache(&self) -> &ContentCacheStore {
        &self.cache
    }

    pub fn freshness(&self) -> &FreshnessResolver {
        &self.freshness
    }

    pub fn limiter(&self) -> &Arc<RateLimiter> {
        &self.limiter
    }

    pub fn bundled(&self) -> &Arc<dyn BundledResources> {
        &self.bundled
    }

    /// Rate-limit aware client for a repository.
    pub fn repository(&self, role: RepositoryRole) -> Option<&Arc<dyn RepositoryClient>> {
        self.repositories.get(&role)
    }

    /// Whether remote requests are currently suspended.
    pub fn is_rate_limited(&self) -> bool {
        self.limiter.is_rate_limited()
    }

    /// When remote requests resume, if currently suspended.
    pub fn rate_limit_reset_at(&self) -> Option<DateTime<Utc>> {
        self.limiter.reset_at()
    }

    /// Text of a resource, from the best available tier.
    pub fn get_content(&self, kind: ResourceKind, language: &str) -> String {
        self.get_content_with_tier(kind, language).0
    }

    /// Text of a resource and the tier that produced it.
    pub fn get_content_with_tier(&self, kind: ResourceKind, language: &str) -> (String, Tier) {
        let key = LogicalKey::new(kind, language);

        if self.limiter.is_rate_limited() {
            tracing::info!("Rate limited; skipping live fetch for {}", key);
        } else if let Some(content) = self.fetch_live(&key) {
            return served(&key, content, Tier::Live);
        }

        if let Some(content) = self.cache.read_latest_cached(kind, language) {
            return served(&key, content, Tier::Cached);
        }

        if let Some(content) = self.bundled.get(kind, language) {
            return served(&key, content, Tier::Embedded);
        }

        if language != self.default_language {
            tracing::debug!(
                "No {} content for {}, trying {}",
                kind,
                language,
                self.default_language
            );

            if let Some(content) = self.cache.read_latest_cached(kind, &self.default_language) {
                return served(&key, content, Tier::DefaultCached);
            }

            if let Some(content) = self.bundled.get(kind, &self.default_language) {
                return served(&key, content, Tier::DefaultEmbedded);
            }
        }

        tracing::warn!("No content available for {}", key);
        (ERROR_PLACEHOLDER.to_string(), Tier::Placeholder)
    }

    /// Refresh the cache for one resource if a newer settled version exists.
    ///
    /// Best effort: failures are logged and otherwise ignored.
    pub fn pre_cache(&self, kind: ResourceKind, language: &str) {
        let key = LogicalKey::new(kind, language);

        if self.limiter.is_rate_limited() {
            tracing::debug!("Rate limited; not pre-caching {}", key);
            return;
        }

        if self.fetch_live(&key).is_some() {
            tracing::info!("Pre-cached {}", key);
        }
    }

    /// Pre-cache every resource kind for `language`.
    pub fn pre_cache_all(&self, language: &str) {
        for kind in ResourceKind::ALL {
            self.pre_cache(kind, language);
        }
    }

    /// The live tier: download and cache a stale resource.
    fn fetch_live(&self, key: &LogicalKey) -> Option<String> {
        self.locks.with_lock(key, || self.download_if_stale(key))
    }

    fn download_if_stale(&self, key: &LogicalKey) -> Option<String> {
        let commit = match self.freshness.evaluate(key.kind, &key.language) {
            Freshness::Stale(commit) => commit,
            Freshness::Current(commit) => {
                tracing::debug!("{} is current at {}", key, commit.short_hash());
                return None;
            }
            Freshness::TooRecent(_) | Freshness::Unknown => return None,
        };

        let repository = self.repositories.get(&key.kind.repository())?;
        let path = key.kind.remote_path(&key.language);

        let content = match repository.download_content(&path) {
            Ok(Some(content)) => content,
            Ok(None) => {
                tracing::debug!("Download of {} returned nothing", path);
                return None;
            }
            Err(e) => {
                tracing::debug!("Download of {} failed: {}", path, e);
                return None;
            }
        };

        if let Err(e) = self.cache.save_to_cache(
            key.kind,
            &key.language,
            &content,
            &commit.commit_hash,
            commit.commit_date,
        ) {
            tracing::warn!("Failed to cache {}: {}", key, e);
        }

        Some(content)
    }
}

fn served(key: &LogicalKey, content: String, tier: Tier) -> (String, Tier) {
    tracing::info!("Serving {} from {} tier", key, tier);
    (content, tier)
}
