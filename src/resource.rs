//! Resource kinds and logical cache keys.
//!
//! A [`ResourceKind`] knows where its file lives in the remote repository,
//! how its cache files are named, which bundled file backs it and how long
//! a fresh commit must settle before it is trusted.

use chrono::Duration;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The language every resource is guaranteed to exist in.
pub const DEFAULT_LANGUAGE: &str = "en-US";

/// Directory in the translations repository holding one folder per locale.
pub const LOCALE_DIRECTORY: &str = "Languages";

/// Which configured repository a resource is published in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RepositoryRole {
    /// The launcher's own repository (locale strings and terms).
    Translations,
    /// The documentation repository (README).
    Documentation,
}

/// A kind of versioned text resource.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum ResourceKind {
    /// UI strings (`strings.json`).
    Locale,
    /// README documentation.
    Readme,
    /// Terms of use for the launcher itself.
    LauncherTerms,
    /// Terms of use for the product the launcher starts.
    ProductTerms,
}

impl ResourceKind {
    /// All kinds, in pre-cache order.
    pub const ALL: [ResourceKind; 4] = [
        ResourceKind::Locale,
        ResourceKind::Readme,
        ResourceKind::LauncherTerms,
        ResourceKind::ProductTerms,
    ];

    /// Prefix used in cache file names.
    pub fn slug(self) -> &'static str {
        match self {
            ResourceKind::Locale => "locale",
            ResourceKind::Readme => "readme",
            ResourceKind::LauncherTerms => "launcher-terms",
            ResourceKind::ProductTerms => "product-terms",
        }
    }

    /// Extension of cached content files.
    pub fn extension(self) -> &'static str {
        match self {
            ResourceKind::Locale => "json",
            _ => "md",
        }
    }

    /// File name inside a locale folder, both remote and bundled.
    pub fn file_name(self) -> &'static str {
        match self {
            ResourceKind::Locale => "strings.json",
            ResourceKind::Readme => "README.md",
            ResourceKind::LauncherTerms => "launcher-terms.md",
            ResourceKind::ProductTerms => "product-terms.md",
        }
    }

    /// Path of the resource in its repository for the given language.
    ///
    /// The README lives at the repository root: `README.md` for the default
    /// language and `de_DE-README.md` style names for the others.
    pub fn remote_path(self, language: &str) -> String {
        match self {
            ResourceKind::Readme if language == DEFAULT_LANGUAGE => "README.md".to_string(),
            ResourceKind::Readme => format!("{}-README.md", language.replace('-', "_")),
            _ => format!("{}/{}/{}", LOCALE_DIRECTORY, language, self.file_name()),
        }
    }

    /// Repository the resource is published in.
    pub fn repository(self) -> RepositoryRole {
        match self {
            ResourceKind::Readme => RepositoryRole::Documentation,
            _ => RepositoryRole::Translations,
        }
    }

    /// Minimum commit age before a new version is downloaded.
    pub fn default_grace_period(self) -> Duration {
        match self {
            ResourceKind::Locale | ResourceKind::Readme => Duration::minutes(15),
            ResourceKind::LauncherTerms | ResourceKind::ProductTerms => Duration::minutes(10),
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// The (kind, language) pair identifying one cacheable resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LogicalKey {
    pub kind: ResourceKind,
    pub language: String,
}

impl LogicalKey {
    pub fn new(kind: ResourceKind, language: impl Into<String>) -> Self {
        Self {
            kind,
            language: language.into(),
        }
    }
}

impl fmt::Display for LogicalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.kind, self.language)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locale_paths() {
        assert_eq!(
            ResourceKind::Locale.remote_path("fr-FR"),
            "Languages/fr-FR/strings.json"
        );
        assert_eq!(ResourceKind::Locale.extension(), "json");
    }

    #[test]
    fn readme_path_for_default_language() {
        assert_eq!(ResourceKind::Readme.remote_path("en-US"), "README.md");
    }

    #[test]
    fn readme_path_uses_underscored_language() {
        assert_eq!(ResourceKind::Readme.remote_path("pt-BR"), "pt_BR-README.md");
    }

    #[test]
    fn terms_paths() {
        assert_eq!(
            ResourceKind::LauncherTerms.remote_path("de-DE"),
            "Languages/de-DE/launcher-terms.md"
        );
        assert_eq!(
            ResourceKind::ProductTerms.remote_path("de-DE"),
            "Languages/de-DE/product-terms.md"
        );
    }

    #[test]
    fn readme_uses_documentation_repository() {
        assert_eq!(
            ResourceKind::Readme.repository(),
            RepositoryRole::Documentation
        );
        assert_eq!(
            ResourceKind::Locale.repository(),
            RepositoryRole::Translations
        );
    }

    #[test]
    fn grace_periods_differ_by_kind() {
        assert_eq!(
            ResourceKind::Locale.default_grace_period(),
            Duration::minutes(15)
        );
        assert_eq!(
            ResourceKind::ProductTerms.default_grace_period(),
            Duration::minutes(10)
        );
    }

    #[test]
    fn slugs_are_unique() {
        let mut slugs: Vec<_> = ResourceKind::ALL.iter().map(|k| k.slug()).collect();
        slugs.sort();
        slugs.dedup();
        assert_eq!(slugs.len(), ResourceKind::ALL.len());
    }

    #[test]
    fn logical_key_display() {
        let key = LogicalKey::new(ResourceKind::Readme, "fr-FR");
        assert_eq!(key.to_string(), "readme/fr-FR");
    }

    #[test]
    fn kind_serializes_kebab_case() {
        let json = serde_json::to_string(&ResourceKind::LauncherTerms).unwrap();
        assert_eq!(json, "\"launcher-terms\"");
    }
}
