#![allow(dead_code)]

use std::sync::Arc;

use bel::{BelEngine, MemoryTermStore, Specification, SpecificationCatalog, config::AppConfig};
use bel_core::SpecificationDocument;

const BEL_2_0_0: &str = include_str!("../../../bel-core/tests/fixtures/bel_2_0_0.json");

pub fn catalog() -> SpecificationCatalog {
    let document: SpecificationDocument =
        serde_json::from_str(BEL_2_0_0).expect("fixture is valid JSON");
    SpecificationCatalog::from_documents([document]).expect("fixture is a valid document")
}

pub fn spec() -> Arc<Specification> {
    Arc::new(catalog().load("2.0.0").expect("fixture is a valid specification"))
}

pub fn config(text: &str) -> AppConfig {
    toml::from_str(text).expect("valid config")
}

/// A small term table covering the human genes used across tests.
pub fn terms() -> Arc<MemoryTermStore> {
    let store = MemoryTermStore::from_json(
        r#"{
            "entity_types": {
                "HGNC:AKT1": ["Gene", "Protein", "RNA"],
                "HGNC:EGF": ["Gene", "Protein", "RNA"],
                "HGNC:TP53": ["Gene", "Protein", "RNA"],
                "GO:nucleus": ["Location"],
                "GO:apoptosis": ["BiologicalProcess"]
            },
            "equivalences": [
                ["HGNC:AKT1", "EG:207", "SP:P31749"],
                ["HGNC:EGF", "EG:1950", "SP:P01133"],
                ["HGNC:TP53", "EG:7157"]
            ],
            "orthologs": {
                "TAX:10090": {
                    "HGNC:AKT1": ["MGI:Akt1"],
                    "HGNC:TP53": ["MGI:Trp53"]
                }
            }
        }"#,
    )
    .expect("valid term table");
    Arc::new(store)
}

pub fn engine(config_text: &str) -> BelEngine {
    BelEngine::new(spec(), config(config_text)).with_terms(terms())
}
