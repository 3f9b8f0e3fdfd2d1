//! Resources packaged with the application.
//!
//! The last tier before the placeholder is content that needs neither
//! network nor cache. [`EmbeddedResources`] serves the files compiled into
//! the binary from `resources/<language>/`; [`StaticResources`] is an
//! in-memory table for hosts that ship their own assets.

use include_dir::{include_dir, Dir};
use std::collections::HashMap;

use crate::resource::ResourceKind;

/// Embedded resources directory.
static RESOURCES_DIR: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/resources");

/// Reader for packaged resources.
pub trait BundledResources: Send + Sync {
    /// Text of `kind` for `language`, if packaged.
    fn get(&self, kind: ResourceKind, language: &str) -> Option<String>;

    /// Whether `kind` is packaged for `language`.
    fn contains(&self, kind: ResourceKind, language: &str) -> bool {
        self.get(kind, language).is_some()
    }
}

/// Resources compiled into the binary.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedResources;

impl EmbeddedResources {
    pub fn new() -> Self {
        Self
    }

    /// Languages with at least one embedded resource.
    pub fn languages(&self) -> Vec<String> {
        let mut languages: Vec<String> = RESOURCES_DIR
            .dirs()
            .filter_map(|d| d.path().file_name())
            .filter_map(|n| n.to_str())
            .map(str::to_string)
            .collect();
        languages.sort();
        languages
    }
}

impl BundledResources for EmbeddedResources {
    fn get(&self, kind: ResourceKind, language: &str) -> Option<String> {
        let path = format!("{}/{}", language, kind.file_name());
        let file = RESOURCES_DIR.get_file(&path)?;

        match file.contents_utf8() {
            Some(content) => Some(content.to_string()),
            None => {
                tracing::warn!("Embedded resource {} is not valid UTF-8", path);
                None
            }
        }
    }
}

/// Resources held in memory.
#[derive(Debug, Clone, Default)]
pub struct StaticResources {
    entries: HashMap<(ResourceKind, String), String>,
}

impl StaticResources {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a resource, replacing any previous text for the same key.
    pub fn with(
        mut self,
        kind: ResourceKind,
        language: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        self.entries.insert((kind, language.into()), content.into());
        self
    }
}

impl BundledResources for StaticResources {
    fn get(&self, kind: ResourceKind, language: &str) -> Option<String> {
        self.entries.get(&(kind, language.to_string())).cloned()
    }
}
