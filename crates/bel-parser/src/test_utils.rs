//! Shared fixtures for unit tests.

use std::collections::{BTreeSet, HashMap};

use bel_core::{
    LookupError, Specification, SpecificationCatalog, SpecificationDocument, TermId,
    terms::EntityTypeLookup,
};

const BEL_2_0_0: &str = include_str!("../../bel-core/tests/fixtures/bel_2_0_0.json");

/// The BEL 2.0.0 fixture specification.
pub fn fixture() -> Specification {
    let document: SpecificationDocument =
        serde_json::from_str(BEL_2_0_0).expect("fixture is valid JSON");
    SpecificationCatalog::from_documents([document])
        .and_then(|catalog| catalog.load("2.0.0"))
        .expect("fixture is a valid specification")
}

/// Entity types for a handful of well-known terms.
pub struct TypeTable(HashMap<TermId, BTreeSet<String>>);

impl Default for TypeTable {
    fn default() -> Self {
        let entries: &[(&str, &[&str])] = &[
            ("HGNC:AKT1", &["Gene", "Protein", "RNA"]),
            ("HGNC:EGF", &["Gene", "Protein", "RNA"]),
            ("CHEBI:glucose", &["Abundance"]),
            ("GO:cytoplasm", &["Location"]),
            ("GO:nucleus", &["Location"]),
            ("GO:apoptosis", &["BiologicalProcess"]),
        ];
        Self(
            entries
                .iter()
                .map(|(term, types)| {
                    let term: TermId = term.parse().expect("valid term");
                    (term, types.iter().map(|t| t.to_string()).collect())
                })
                .collect(),
        )
    }
}

impl EntityTypeLookup for TypeTable {
    fn lookup_entity_types(&self, term: &TermId) -> Result<BTreeSet<String>, LookupError> {
        Ok(self.0.get(term).cloned().unwrap_or_default())
    }
}
