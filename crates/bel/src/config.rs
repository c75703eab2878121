//! Configuration types for the BEL engine.
//!
//! This module provides configuration structures that control specification
//! selection, collaborator lookups, validation and the term rewrites. All
//! types implement [`serde::Deserialize`] for loading from external sources;
//! every section may be omitted.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining all sections.
//! - [`SpecificationConfig`] - Requested specification version and where to find documents.
//! - [`LookupConfig`] - Timeout and concurrency of collaborator calls.
//! - [`ValidationConfig`] - Strictness and the error level that counts as failure.
//! - [`NamespaceTargets`] - Preferred target namespaces per source namespace.
//! - [`OrthologizeConfig`] - Default target species and orthologizable entity types.
//! - [`ComputedEdgesConfig`] - Subset of computed-edge rules to evaluate.
//!
//! # Example
//!
//! ```
//! # use bel::config::AppConfig;
//! // Use default configuration
//! let config = AppConfig::default();
//! assert_eq!(config.specification().version(), "2.0.0");
//! assert!(config.validation().error_level().is_ok());
//! ```

use std::{collections::BTreeSet, path::PathBuf, time::Duration};

use indexmap::IndexMap;
use serde::Deserialize;

use bel_core::terms::LookupOptions;
use bel_parser::{ErrorLevel, ValidationOptions};

const DEFAULT_VERSION: &str = "2.0.0";
const DEFAULT_TIMEOUT_MS: u64 = 5000;
const DEFAULT_ORTHOLOGIZABLE: [&str; 4] = ["Gene", "RNA", "Protein", "Micro_RNA"];

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    specification: SpecificationConfig,

    #[serde(default)]
    lookup: LookupConfig,

    #[serde(default)]
    validation: ValidationConfig,

    /// Targets used by canonicalization.
    #[serde(default)]
    canonicalize: NamespaceTargets,

    /// Targets used by decanonicalization.
    #[serde(default)]
    decanonicalize: NamespaceTargets,

    #[serde(default)]
    orthologize: OrthologizeConfig,

    #[serde(default)]
    computed_edges: ComputedEdgesConfig,
}

impl AppConfig {
    pub fn specification(&self) -> &SpecificationConfig {
        &self.specification
    }

    pub fn lookup(&self) -> &LookupConfig {
        &self.lookup
    }

    pub fn validation(&self) -> &ValidationConfig {
        &self.validation
    }

    pub fn canonicalize(&self) -> &NamespaceTargets {
        &self.canonicalize
    }

    pub fn decanonicalize(&self) -> &NamespaceTargets {
        &self.decanonicalize
    }

    pub fn orthologize(&self) -> &OrthologizeConfig {
        &self.orthologize
    }

    pub fn computed_edges(&self) -> &ComputedEdgesConfig {
        &self.computed_edges
    }

    /// Validation options combining the lookup policy and strictness.
    pub fn validation_options(&self) -> ValidationOptions {
        ValidationOptions::new(
            self.lookup.options(),
            self.validation.strict_entity_types(),
        )
    }

    /// Replace the canonicalization targets.
    pub fn with_canonicalize(mut self, targets: NamespaceTargets) -> Self {
        self.canonicalize = targets;
        self
    }

    /// Replace the decanonicalization targets.
    pub fn with_decanonicalize(mut self, targets: NamespaceTargets) -> Self {
        self.decanonicalize = targets;
        self
    }

    /// Replace the lookup policy.
    pub fn with_lookup(mut self, lookup: LookupConfig) -> Self {
        self.lookup = lookup;
        self
    }
}

/// Requested specification version and document location.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SpecificationConfig {
    #[serde(default)]
    version: Option<String>,

    #[serde(default)]
    directory: Option<PathBuf>,
}

impl SpecificationConfig {
    /// The requested version, `2.0.0` unless configured.
    pub fn version(&self) -> &str {
        self.version.as_deref().unwrap_or(DEFAULT_VERSION)
    }

    /// Directory holding the specification documents, if configured.
    pub fn directory(&self) -> Option<&PathBuf> {
        self.directory.as_ref()
    }
}

/// Timeout and concurrency of collaborator calls.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct LookupConfig {
    /// Milliseconds per call; `0` calls collaborators inline.
    #[serde(default = "default_timeout_ms")]
    timeout_ms: u64,

    #[serde(default = "default_true")]
    concurrent: bool,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_TIMEOUT_MS,
            concurrent: true,
        }
    }
}

impl LookupConfig {
    pub fn new(timeout_ms: u64, concurrent: bool) -> Self {
        Self {
            timeout_ms,
            concurrent,
        }
    }

    pub fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }

    pub fn concurrent(&self) -> bool {
        self.concurrent
    }

    /// The dispatch policy for [`bel_core::terms::lookup_all`].
    pub fn options(&self) -> LookupOptions {
        let timeout = (self.timeout_ms > 0).then(|| Duration::from_millis(self.timeout_ms));
        LookupOptions::new(timeout, self.concurrent)
    }
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

fn default_true() -> bool {
    true
}

/// Validation strictness and failure threshold.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ValidationConfig {
    #[serde(default)]
    strict_entity_types: bool,

    /// `errors` or `warnings`, as a string.
    #[serde(default)]
    error_level: Option<String>,
}

impl ValidationConfig {
    pub fn strict_entity_types(&self) -> bool {
        self.strict_entity_types
    }

    /// Returns the parsed [`ErrorLevel`], [`ErrorLevel::Errors`] when none is
    /// configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured level is neither `errors` nor
    /// `warnings`.
    pub fn error_level(&self) -> Result<ErrorLevel, String> {
        self.error_level
            .as_deref()
            .map(str::parse)
            .transpose()
            .map(Option::unwrap_or_default)
            .map_err(|err| format!("Invalid error level in config: {err}"))
    }
}

/// Preferred target namespaces keyed by source namespace, in preference
/// order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct NamespaceTargets(IndexMap<String, Vec<String>>);

impl NamespaceTargets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add targets for a source namespace, replacing earlier ones.
    pub fn with(mut self, namespace: impl Into<String>, targets: &[&str]) -> Self {
        self.0.insert(
            namespace.into(),
            targets.iter().map(|t| t.to_string()).collect(),
        );
        self
    }

    /// Targets for a namespace; empty when none are configured.
    pub fn targets(&self, namespace: &str) -> &[String] {
        match self.0.get(namespace) {
            Some(targets) => targets,
            None => &[],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(ns, targets)| (ns.as_str(), targets.as_slice()))
    }
}

impl FromIterator<(String, Vec<String>)> for NamespaceTargets {
    fn from_iter<I: IntoIterator<Item = (String, Vec<String>)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Orthologization defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct OrthologizeConfig {
    /// Target species used when a call names none, e.g. `TAX:10090`.
    #[serde(default)]
    species: Option<String>,

    /// Entity types eligible for orthologization.
    #[serde(default = "default_orthologizable")]
    entity_types: BTreeSet<String>,
}

impl Default for OrthologizeConfig {
    fn default() -> Self {
        Self {
            species: None,
            entity_types: default_orthologizable(),
        }
    }
}

impl OrthologizeConfig {
    pub fn species(&self) -> Option<&str> {
        self.species.as_deref()
    }

    pub fn entity_types(&self) -> &BTreeSet<String> {
        &self.entity_types
    }
}

fn default_orthologizable() -> BTreeSet<String> {
    DEFAULT_ORTHOLOGIZABLE.iter().map(|t| t.to_string()).collect()
}

/// Computed-edge rule selection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ComputedEdgesConfig {
    /// Rule names to evaluate; all rules when absent.
    #[serde(default)]
    rules: Option<Vec<String>>,
}

impl ComputedEdgesConfig {
    pub fn rules(&self) -> Option<&[String]> {
        self.rules.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();

        assert_eq!(config.specification().version(), "2.0.0");
        assert!(config.specification().directory().is_none());
        assert_eq!(
            config.lookup().options(),
            LookupOptions::new(Some(Duration::from_secs(5)), true)
        );
        assert_eq!(config.validation().error_level(), Ok(ErrorLevel::Errors));
        assert!(config.canonicalize().is_empty());
        assert!(config.orthologize().entity_types().contains("Micro_RNA"));
        assert!(config.computed_edges().rules().is_none());
    }

    #[test]
    fn test_full_document() {
        let config: AppConfig = toml::from_str(
            r#"
            [specification]
            version = "2.1"
            directory = "specs"

            [lookup]
            timeout_ms = 0
            concurrent = false

            [validation]
            strict_entity_types = true
            error_level = "warnings"

            [canonicalize]
            HGNC = ["EG", "SP"]
            MGI = ["EG"]

            [decanonicalize]
            EG = ["HGNC", "MGI", "RGD"]

            [orthologize]
            species = "TAX:10090"
            entity_types = ["Gene"]

            [computed_edges]
            rules = ["hasComponent"]
            "#,
        )
        .unwrap();

        assert_eq!(config.specification().version(), "2.1");
        assert_eq!(config.lookup().options(), LookupOptions::inline());
        assert!(config.validation_options().strict_entity_types());
        assert_eq!(config.validation().error_level(), Ok(ErrorLevel::Warnings));
        assert_eq!(config.canonicalize().targets("HGNC"), ["EG", "SP"]);
        assert!(config.canonicalize().targets("CHEBI").is_empty());
        let order: Vec<&str> = config.canonicalize().iter().map(|(ns, _)| ns).collect();
        assert_eq!(order, ["HGNC", "MGI"]);
        assert_eq!(config.decanonicalize().targets("EG").len(), 3);
        assert_eq!(config.orthologize().species(), Some("TAX:10090"));
        assert_eq!(config.orthologize().entity_types().len(), 1);
        assert_eq!(config.computed_edges().rules(), Some(&["hasComponent".to_string()][..]));
    }

    #[test]
    fn test_partial_lookup_section_keeps_defaults() {
        let config: AppConfig = toml::from_str("[lookup]\nconcurrent = false\n").unwrap();

        assert_eq!(config.lookup().timeout_ms(), 5000);
        assert!(!config.lookup().concurrent());
    }

    #[test]
    fn test_invalid_error_level() {
        let config: AppConfig = toml::from_str("[validation]\nerror_level = \"fatal\"\n").unwrap();

        assert!(config.validation().error_level().is_err());
    }

    #[test]
    fn test_namespace_targets_builder() {
        let targets = NamespaceTargets::new().with("HGNC", &["EG", "SP"]);

        assert_eq!(targets.targets("HGNC"), ["EG", "SP"]);
        assert!(targets.targets("EG").is_empty());
    }
}
