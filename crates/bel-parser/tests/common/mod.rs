#![allow(dead_code)]

use std::{
    collections::{BTreeSet, HashMap},
    sync::Arc,
};

use bel_core::{
    LookupError, Specification, SpecificationCatalog, SpecificationDocument, TermId,
    terms::{EntityTypeLookup, LookupOptions},
};
use bel_parser::{Statement, ValidationOptions, parse, validate};

const BEL_2_0_0: &str = include_str!("../../../bel-core/tests/fixtures/bel_2_0_0.json");

pub fn spec() -> Specification {
    let document: SpecificationDocument =
        serde_json::from_str(BEL_2_0_0).expect("fixture is valid JSON");
    SpecificationCatalog::from_documents([document])
        .and_then(|catalog| catalog.load("2.0.0"))
        .expect("fixture is a valid specification")
}

pub struct TypeTable(HashMap<TermId, BTreeSet<String>>);

impl TypeTable {
    pub fn new(entries: &[(&str, &[&str])]) -> Self {
        Self(
            entries
                .iter()
                .map(|(term, types)| {
                    (
                        term.parse().expect("valid term"),
                        types.iter().map(|t| t.to_string()).collect(),
                    )
                })
                .collect(),
        )
    }

    pub fn standard() -> Self {
        Self::new(&[
            ("HGNC:AKT1", &["Gene", "Protein", "RNA"]),
            ("HGNC:EGF", &["Gene", "Protein", "RNA"]),
            ("HGNC:A", &["Gene", "Protein", "RNA"]),
            ("HGNC:B", &["Gene", "Protein", "RNA"]),
            ("CHEBI:nitric oxide", &["Abundance"]),
            ("GO:cytoplasm", &["Location"]),
            ("GO:nucleus", &["Location"]),
            ("GO:apoptosis", &["BiologicalProcess"]),
        ])
    }
}

impl EntityTypeLookup for TypeTable {
    fn lookup_entity_types(&self, term: &TermId) -> Result<BTreeSet<String>, LookupError> {
        Ok(self.0.get(term).cloned().unwrap_or_default())
    }
}

/// Parse and validate with the standard type table, inline lookups.
pub fn parse_validated(text: &str, strict: bool) -> Statement {
    let spec = spec();
    let mut statement = parse(text, &spec).expect("statement parses");
    let lookup: Arc<dyn EntityTypeLookup> = Arc::new(TypeTable::standard());
    let options = ValidationOptions::new(LookupOptions::inline(), strict);
    validate(&mut statement, &spec, &lookup, &options).expect("lookups succeed");
    statement
}
