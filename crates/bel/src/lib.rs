//! BEL - Parse, validate and transform BEL statements.
//!
//! The statement pipeline over a loaded specification: parsing and semantic
//! validation, namespace rewrites (canonicalization, decanonicalization,
//! orthologization), computed edges and rendering. Terminology lives behind
//! the lookup collaborators of [`bel_core::terms`].

pub mod config;

mod edges;
mod error;
mod resolve;
mod store;
#[cfg(test)]
mod test_utils;

pub use bel_core::{Specification, SpecificationCatalog, TermId, terms};
pub use bel_parser::{Diagnostic, ErrorLevel, Format, Statement};

pub use edges::{ComputedEdge, compute_edges};
pub use error::BelError;
pub use resolve::{orthologize, rewrite_equivalents};
pub use store::MemoryTermStore;

use std::sync::Arc;

use log::{debug, info, trace};

use bel_core::terms::{EntityTypeLookup, EquivalenceLookup, NoTerms, OrthologLookup};

use config::AppConfig;

/// Engine for processing BEL statements.
///
/// Bundles the specification, the configuration and the three lookup
/// collaborators. Without collaborators every lookup misses.
///
/// # Examples
///
/// ```rust,no_run
/// use std::sync::Arc;
///
/// use bel::{BelEngine, Format, MemoryTermStore, SpecificationCatalog, config::AppConfig};
///
/// let catalog = SpecificationCatalog::from_dir("specs").expect("Failed to load specifications");
/// let terms = Arc::new(MemoryTermStore::from_path("terms.json").expect("Failed to load terms"));
///
/// let engine = BelEngine::from_catalog(&catalog, AppConfig::default())
///     .expect("No compatible specification")
///     .with_terms(terms);
///
/// let mut statement = engine.parse("p(HGNC:AKT1) increases p(HGNC:EGF)")
///     .expect("Failed to parse");
/// engine.validate(&mut statement).expect("Lookup failed");
/// engine.canonicalize(&mut statement).expect("Lookup failed");
///
/// println!("{}", engine.render(&statement, Format::Short));
/// ```
#[derive(Clone)]
pub struct BelEngine {
    spec: Arc<Specification>,
    config: AppConfig,
    entity_types: Arc<dyn EntityTypeLookup>,
    equivalents: Arc<dyn EquivalenceLookup>,
    orthologs: Arc<dyn OrthologLookup>,
}

impl BelEngine {
    /// Create an engine over a loaded specification.
    pub fn new(spec: Arc<Specification>, config: AppConfig) -> Self {
        Self {
            spec,
            config,
            entity_types: Arc::new(NoTerms),
            equivalents: Arc::new(NoTerms),
            orthologs: Arc::new(NoTerms),
        }
    }

    /// Create an engine for the specification version the configuration
    /// requests.
    ///
    /// # Errors
    ///
    /// Returns [`BelError::Configuration`] when no compatible version is
    /// available or the selected document is invalid.
    pub fn from_catalog(
        catalog: &SpecificationCatalog,
        config: AppConfig,
    ) -> Result<Self, BelError> {
        let requested = config.specification().version();
        let spec = catalog.load(requested)?;
        info!(requested, version:% = spec.version(); "Specification loaded");
        Ok(Self::new(Arc::new(spec), config))
    }

    pub fn with_entity_types(mut self, lookup: Arc<dyn EntityTypeLookup>) -> Self {
        self.entity_types = lookup;
        self
    }

    pub fn with_equivalents(mut self, lookup: Arc<dyn EquivalenceLookup>) -> Self {
        self.equivalents = lookup;
        self
    }

    pub fn with_orthologs(mut self, lookup: Arc<dyn OrthologLookup>) -> Self {
        self.orthologs = lookup;
        self
    }

    /// Use one collaborator for all three lookups.
    pub fn with_terms<T>(self, terms: Arc<T>) -> Self
    where
        T: EntityTypeLookup + EquivalenceLookup + OrthologLookup + 'static,
    {
        self.with_entity_types(terms.clone())
            .with_equivalents(terms.clone())
            .with_orthologs(terms)
    }

    pub fn specification(&self) -> &Arc<Specification> {
        &self.spec
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    // ============================================================================
    // Statement Pipeline
    // ============================================================================

    /// Parse statement text.
    ///
    /// # Errors
    ///
    /// Returns [`BelError::Parse`] with every structural diagnostic.
    pub fn parse(&self, text: &str) -> Result<Statement, BelError> {
        trace!(text; "Parsing statement");
        let statement =
            bel_parser::parse(text, &self.spec).map_err(|err| BelError::new_parse_error(err, text))?;
        debug!(nodes = statement.len(); "Statement parsed");
        Ok(statement)
    }

    /// Validate a statement in place against the specification.
    ///
    /// # Errors
    ///
    /// Returns [`BelError::Lookup`] when the entity-type collaborator fails
    /// outside its miss/timeout contract.
    pub fn validate(&self, statement: &mut Statement) -> Result<(), BelError> {
        bel_parser::validate(
            statement,
            &self.spec,
            &self.entity_types,
            &self.config.validation_options(),
        )?;
        debug!(
            diagnostics = statement.diagnostics().len(),
            errors = statement.has_errors();
            "Statement validated"
        );
        Ok(())
    }

    /// Parse and validate in one step.
    pub fn parse_and_validate(&self, text: &str) -> Result<Statement, BelError> {
        let mut statement = self.parse(text)?;
        self.validate(&mut statement)?;
        Ok(statement)
    }

    /// Whether a statement passes under the configured error level.
    ///
    /// # Errors
    ///
    /// Returns [`BelError::InvalidConfig`] when the configured error level
    /// is not recognised.
    pub fn passes(&self, statement: &Statement) -> Result<bool, BelError> {
        let level = self
            .config
            .validation()
            .error_level()
            .map_err(BelError::InvalidConfig)?;
        Ok(statement.diagnostics_at(level).next().is_none())
    }

    /// Rewrite terms to their canonical namespaces. Returns the number of
    /// rewrites.
    pub fn canonicalize(&self, statement: &mut Statement) -> Result<usize, BelError> {
        let rewrites = rewrite_equivalents(
            statement,
            self.config.canonicalize(),
            &self.equivalents,
            &self.config.lookup().options(),
        )?;
        Ok(rewrites)
    }

    /// Rewrite terms back to their preferred display namespaces. Returns the
    /// number of rewrites.
    pub fn decanonicalize(&self, statement: &mut Statement) -> Result<usize, BelError> {
        let rewrites = rewrite_equivalents(
            statement,
            self.config.decanonicalize(),
            &self.equivalents,
            &self.config.lookup().options(),
        )?;
        Ok(rewrites)
    }

    /// Rewrite terms to their orthologs in `species`, or in the configured
    /// default species. Returns the number of rewrites.
    pub fn orthologize(
        &self,
        statement: &mut Statement,
        species: Option<&str>,
    ) -> Result<usize, BelError> {
        let orthologize_config = self.config.orthologize();
        let rewrites = orthologize(
            statement,
            species.or(orthologize_config.species()),
            orthologize_config.entity_types(),
            &self.orthologs,
            &self.config.lookup().options(),
        )?;
        Ok(rewrites)
    }

    /// Computed edges of a statement, restricted to `rules` or to the
    /// configured rule subset.
    pub fn compute_edges(
        &self,
        statement: &Statement,
        rules: Option<&[String]>,
        format: Format,
    ) -> Vec<ComputedEdge> {
        let rules = rules.or(self.config.computed_edges().rules());
        compute_edges(statement, &self.spec, rules, format)
    }

    pub fn render(&self, statement: &Statement, format: Format) -> String {
        statement.render(format)
    }
}
