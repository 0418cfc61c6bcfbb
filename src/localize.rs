//! # Localization Seams
//!
//! The reconciliation engine never stores display strings of its own: names,
//! descriptions, and groups come from a resource lookup service, and the set
//! of additional locales for a multi-language site comes from a variation
//! service. Both are external collaborators, so they are expressed as traits
//! here, with map-backed implementations for tests and embedding callers.
//!
//! This mirrors how repository management is split behind `GitOperations` /
//! `CacheOperations` style traits: the engine depends only on the interface,
//! and tests observe interactions through lightweight implementations.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// A language/region identifier under which display metadata may be
/// independently resolved (e.g. `en-US`, `fr-FR`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Locale(String);

impl Locale {
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Locale {
    fn from(tag: &str) -> Self {
        Self(tag.to_string())
    }
}

/// Resolves a resource key to a display string for a given locale.
///
/// Implementations must return a stable, non-empty string for the default
/// locale of any key the provisioner is asked to apply, or the provisioner's
/// precondition check fails with `InvalidArgument`. Returning `None` for a
/// non-default locale simply leaves that locale unresolved.
pub trait LocalizationResolver {
    fn resolve(&self, resource_file: &str, key: &str, locale: &Locale) -> Option<String>;
}

/// An additional locale declared by the variation service for a
/// multi-language site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariationLabel {
    /// The locale the label resolves content under.
    pub language: Locale,
    /// Human-readable label of the variation (e.g. "French (France)").
    pub label: String,
}

/// Enumerates additional locales for a multi-language site.
pub trait VariationService {
    /// Whether localization variations are enabled for the site.
    fn is_variation_enabled(&self) -> bool;

    /// The variation labels declared for the site. Only meaningful when
    /// [`is_variation_enabled`](Self::is_variation_enabled) returns true.
    fn labels(&self) -> Vec<VariationLabel>;
}

/// Map-backed [`LocalizationResolver`] keyed by (resource file, key, locale).
#[derive(Debug, Clone, Default)]
pub struct StaticResources {
    entries: HashMap<(String, String, String), String>,
}

impl StaticResources {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a resolution for (resource file, key, locale).
    pub fn insert(
        &mut self,
        resource_file: impl Into<String>,
        key: impl Into<String>,
        locale: impl Into<String>,
        value: impl Into<String>,
    ) {
        self.entries.insert(
            (resource_file.into(), key.into(), locale.into()),
            value.into(),
        );
    }
}

impl LocalizationResolver for StaticResources {
    fn resolve(&self, resource_file: &str, key: &str, locale: &Locale) -> Option<String> {
        self.entries
            .get(&(
                resource_file.to_string(),
                key.to_string(),
                locale.as_str().to_string(),
            ))
            .cloned()
    }
}

/// Fixed-answer [`VariationService`].
#[derive(Debug, Clone, Default)]
pub struct StaticVariations {
    enabled: bool,
    labels: Vec<VariationLabel>,
}

impl StaticVariations {
    /// A service reporting variations as disabled.
    pub fn disabled() -> Self {
        Self::default()
    }

    /// A service reporting variations as enabled with the given labels.
    pub fn enabled(labels: Vec<VariationLabel>) -> Self {
        Self {
            enabled: true,
            labels,
        }
    }
}

impl VariationService for StaticVariations {
    fn is_variation_enabled(&self) -> bool {
        self.enabled
    }

    fn labels(&self) -> Vec<VariationLabel> {
        self.labels.clone()
    }
}
