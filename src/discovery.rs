//! Locale discovery.
//!
//! A locale is available when its folder under `Languages/` in the
//! translations repository carries every file the launcher needs. The
//! default language is always available since it is bundled.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::fallback::ContentService;
use crate::repository::RepositoryClient;
use crate::resource::{RepositoryRole, ResourceKind, LOCALE_DIRECTORY};

/// Kinds a locale folder must provide to count as available.
pub const REQUIRED_KINDS: [ResourceKind; 3] = [
    ResourceKind::Locale,
    ResourceKind::LauncherTerms,
    ResourceKind::ProductTerms,
];

/// Finds the locales published in the translations repository.
pub struct LocaleDiscovery {
    repository: Arc<dyn RepositoryClient>,
    default_language: String,
}

impl LocaleDiscovery {
    pub fn new(repository: Arc<dyn RepositoryClient>, default_language: impl Into<String>) -> Self {
        Self {
            repository,
            default_language: default_language.into(),
        }
    }

    /// Discovery using a service's rate-limit aware translations client.
    pub fn for_service(service: &ContentService) -> Option<Self> {
        let repository = service.repository(RepositoryRole::Translations)?;
        Some(Self::new(Arc::clone(repository), service.default_language()))
    }

    /// Available locales, sorted. Never empty.
    ///
    /// Lookup failures (including rate limits) leave only what was found so
    /// far plus the default language.
    pub fn discover(&self) -> Vec<String> {
        let mut locales = BTreeSet::from([self.default_language.clone()]);

        let directories = match self.repository.directory_contents(LOCALE_DIRECTORY) {
            Ok(Some(directories)) => directories,
            Ok(None) => {
                tracing::debug!("No locale directory listing available");
                return locales.into_iter().collect();
            }
            Err(e) => {
                tracing::warn!("Locale discovery failed: {}", e);
                return locales.into_iter().collect();
            }
        };

        for locale in directories {
            if locale == self.default_language || locale.starts_with('.') {
                continue;
            }

            match self.has_required_files(&locale) {
                Ok(true) => {
                    tracing::debug!("Discovered locale: {}", locale);
                    locales.insert(locale);
                }
                Ok(false) => tracing::debug!("Skipping incomplete locale {}", locale),
                Err(e) => {
                    tracing::warn!("Stopping locale discovery: {}", e);
                    break;
                }
            }
        }

        locales.into_iter().collect()
    }

    fn has_required_files(&self, locale: &str) -> crate::Result<bool> {
        for kind in REQUIRED_KINDS {
            if !self.repository.file_exists(&kind.remote_path(locale))? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}
