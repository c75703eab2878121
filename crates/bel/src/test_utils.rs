//! Shared fixtures for unit tests.

use bel_core::{Specification, SpecificationCatalog, SpecificationDocument};

const BEL_2_0_0: &str = include_str!("../../bel-core/tests/fixtures/bel_2_0_0.json");

/// The BEL 2.0.0 fixture specification.
pub fn fixture() -> Specification {
    let document: SpecificationDocument =
        serde_json::from_str(BEL_2_0_0).expect("fixture is valid JSON");
    SpecificationCatalog::from_documents([document])
        .and_then(|catalog| catalog.load("2.0.0"))
        .expect("fixture is a valid specification")
}
