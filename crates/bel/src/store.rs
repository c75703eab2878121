//! In-memory term table implementing the lookup collaborators.
//!
//! A [`MemoryTermStore`] holds entity types per term, equivalence classes of
//! terms across namespaces and ortholog lists per target species. It is
//! loaded from JSON:
//!
//! ```json
//! {
//!   "entity_types": {"HGNC:AKT1": ["Gene", "Protein", "RNA"]},
//!   "equivalences": [["HGNC:AKT1", "EG:207", "SP:P31749"]],
//!   "orthologs": {"TAX:10090": {"HGNC:AKT1": ["MGI:Akt1"]}}
//! }
//! ```

use std::{
    collections::{BTreeSet, HashMap},
    fs,
    path::Path,
};

use log::{debug, trace};
use serde::Deserialize;

use bel_core::{
    LookupError, TermId,
    terms::{EntityTypeLookup, EquivalenceLookup, OrthologLookup},
};

use crate::BelError;

/// Term table as written in JSON.
#[derive(Debug, Default, Deserialize)]
struct TermTable {
    #[serde(default)]
    entity_types: HashMap<TermId, BTreeSet<String>>,

    #[serde(default)]
    equivalences: Vec<Vec<TermId>>,

    #[serde(default)]
    orthologs: HashMap<String, HashMap<TermId, Vec<TermId>>>,
}

/// Lookup collaborators over an in-memory table.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(from = "TermTable")]
pub struct MemoryTermStore {
    entity_types: HashMap<TermId, BTreeSet<String>>,
    /// Equivalence classes, members in declaration order.
    classes: Vec<Vec<TermId>>,
    class_of: HashMap<TermId, usize>,
    /// Orthologs keyed by target species, then by source term.
    orthologs: HashMap<String, HashMap<TermId, Vec<TermId>>>,
}

impl From<TermTable> for MemoryTermStore {
    fn from(table: TermTable) -> Self {
        let mut store = Self {
            entity_types: table.entity_types,
            orthologs: table.orthologs,
            ..Self::default()
        };
        for class in table.equivalences {
            store.insert_class(class);
        }
        store
    }
}

impl MemoryTermStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a term table from JSON text.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Read and decode a term table file.
    ///
    /// # Errors
    ///
    /// Returns [`BelError::Io`] if the file cannot be read and
    /// [`BelError::Terms`] if it is not a valid term table.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, BelError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)?;
        let store = Self::from_json(&json).map_err(|source| BelError::Terms {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(
            path:? = path,
            terms = store.entity_types.len(),
            classes = store.classes.len();
            "Loaded term table"
        );
        Ok(store)
    }

    pub fn with_entity_types(mut self, term: TermId, types: &[&str]) -> Self {
        self.entity_types
            .insert(term, types.iter().map(|t| t.to_string()).collect());
        self
    }

    /// Declare terms equivalent to each other.
    pub fn with_equivalents(mut self, terms: impl IntoIterator<Item = TermId>) -> Self {
        self.insert_class(terms.into_iter().collect());
        self
    }

    pub fn with_orthologs(
        mut self,
        species: impl Into<String>,
        term: TermId,
        orthologs: impl IntoIterator<Item = TermId>,
    ) -> Self {
        self.orthologs
            .entry(species.into())
            .or_default()
            .insert(term, orthologs.into_iter().collect());
        self
    }

    /// Add a class, merging it with every class that shares a member.
    ///
    /// The merged class keeps the members of the oldest class first.
    fn insert_class(&mut self, class: Vec<TermId>) {
        let mut touched: Vec<usize> = class
            .iter()
            .filter_map(|term| self.class_of.get(term).copied())
            .collect();
        touched.sort_unstable();
        touched.dedup();

        let index = match touched.first() {
            Some(&index) => index,
            None => {
                self.classes.push(Vec::new());
                self.classes.len() - 1
            }
        };

        for &other in touched.iter().skip(1) {
            let members = std::mem::take(&mut self.classes[other]);
            for term in members {
                self.class_of.insert(term.clone(), index);
                self.classes[index].push(term);
            }
        }

        for term in class {
            if self.class_of.contains_key(&term) {
                continue;
            }
            self.class_of.insert(term.clone(), index);
            self.classes[index].push(term);
        }
    }
}

impl EntityTypeLookup for MemoryTermStore {
    fn lookup_entity_types(&self, term: &TermId) -> Result<BTreeSet<String>, LookupError> {
        Ok(self.entity_types.get(term).cloned().unwrap_or_default())
    }
}

impl EquivalenceLookup for MemoryTermStore {
    fn lookup_equivalent(
        &self,
        term: &TermId,
        targets: &[String],
    ) -> Result<Option<TermId>, LookupError> {
        let Some(&index) = self.class_of.get(term) else {
            return Ok(None);
        };
        let class = &self.classes[index];
        let equivalent = targets.iter().find_map(|target| {
            class
                .iter()
                .find(|member| member.namespace() == target.as_str() && *member != term)
        });
        trace!(term:% = term, equivalent:? = equivalent; "Equivalence lookup");
        Ok(equivalent.cloned())
    }
}

impl OrthologLookup for MemoryTermStore {
    fn lookup_orthologs(&self, term: &TermId, species: &str) -> Result<Vec<TermId>, LookupError> {
        Ok(self
            .orthologs
            .get(species)
            .and_then(|by_term| by_term.get(term))
            .cloned()
            .unwrap_or_default())
    }
}
