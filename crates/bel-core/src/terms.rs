//! Namespace term identifiers and the lookup collaborators the engine
//! depends on.
//!
//! The engine never stores terminology itself. It asks three collaborators:
//!
//! - [`EntityTypeLookup`] for the entity types of a term (validation)
//! - [`EquivalenceLookup`] for an equivalent term in preferred namespaces
//!   (canonicalization and decanonicalization)
//! - [`OrthologLookup`] for the same gene in another species
//!   (orthologization)
//!
//! Misses are ordinary results (empty set, `None`, empty list). `Err` is
//! reserved for failures outside that contract and aborts the pipeline.

mod dispatch;

pub use dispatch::{LookupOptions, lookup_all};

use std::{collections::BTreeSet, fmt, str::FromStr};

use serde::Deserialize;

use crate::error::LookupError;

/// A namespace-qualified term such as `HGNC:AKT1`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(try_from = "String")]
pub struct TermId {
    namespace: String,
    value: String,
}

impl TermId {
    pub fn new(namespace: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            value: value.into(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// The unquoted value.
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for TermId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.value)
    }
}

impl TryFrom<String> for TermId {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl FromStr for TermId {
    type Err = String;

    /// Split on the first `:`; the value is taken verbatim.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(':') {
            Some((namespace, value)) if !namespace.is_empty() && !value.is_empty() => {
                Ok(Self::new(namespace, value))
            }
            _ => Err(format!("`{s}` is not a namespace term")),
        }
    }
}

pub trait EntityTypeLookup: Send + Sync {
    /// Entity types of a term; an empty set means the term is unknown.
    fn lookup_entity_types(&self, term: &TermId) -> Result<BTreeSet<String>, LookupError>;
}

pub trait EquivalenceLookup: Send + Sync {
    /// The best-ranked equivalent of `term` among `targets`, in target order.
    fn lookup_equivalent(
        &self,
        term: &TermId,
        targets: &[String],
    ) -> Result<Option<TermId>, LookupError>;
}

pub trait OrthologLookup: Send + Sync {
    /// Orthologs of `term` in the target species, best candidate first.
    fn lookup_orthologs(&self, term: &TermId, species: &str)
    -> Result<Vec<TermId>, LookupError>;
}

/// A collaborator that knows no terms at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTerms;

impl EntityTypeLookup for NoTerms {
    fn lookup_entity_types(&self, _term: &TermId) -> Result<BTreeSet<String>, LookupError> {
        Ok(BTreeSet::new())
    }
}

impl EquivalenceLookup for NoTerms {
    fn lookup_equivalent(
        &self,
        _term: &TermId,
        _targets: &[String],
    ) -> Result<Option<TermId>, LookupError> {
        Ok(None)
    }
}

impl OrthologLookup for NoTerms {
    fn lookup_orthologs(
        &self,
        _term: &TermId,
        _species: &str,
    ) -> Result<Vec<TermId>, LookupError> {
        Ok(Vec::new())
    }
}
