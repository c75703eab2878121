mod common;

use bel::{BelEngine, BelError, Format};
use bel_parser::ErrorCode;

const CANONICAL: &str = r#"
[canonicalize]
HGNC = ["EG", "SP"]

[decanonicalize]
EG = ["HGNC"]
SP = ["HGNC"]
"#;

#[test]
fn test_canonicalize_statement() {
    let engine = common::engine(CANONICAL);
    let mut statement = engine.parse("p(HGNC:AKT1)").unwrap();

    let rewrites = engine.canonicalize(&mut statement).unwrap();

    assert_eq!(rewrites, 1);
    assert_eq!(engine.render(&statement, Format::Short), "p(EG:207)");
}

#[test]
fn test_decanonicalize_restores_display_namespace() {
    let engine = common::engine(CANONICAL);
    let mut statement = engine
        .parse("p(HGNC:AKT1) increases p(HGNC:EGF)")
        .unwrap();

    engine.canonicalize(&mut statement).unwrap();
    assert_eq!(
        engine.render(&statement, Format::Medium),
        "p(EG:207) increases p(EG:1950)"
    );

    engine.decanonicalize(&mut statement).unwrap();
    assert_eq!(
        engine.render(&statement, Format::Medium),
        "p(HGNC:AKT1) increases p(HGNC:EGF)"
    );
}

#[test]
fn test_unconfigured_namespaces_untouched() {
    let engine = common::engine(CANONICAL);
    let mut statement = engine.parse("a(CHEBI:glucose) -> p(MGI:Akt1)").unwrap();

    assert_eq!(engine.canonicalize(&mut statement).unwrap(), 0);
    assert_eq!(
        engine.render(&statement, Format::Short),
        "a(CHEBI:glucose) -> p(MGI:Akt1)"
    );
}

#[test]
fn test_complex_components() {
    let engine = common::engine("[computed_edges]\nrules = [\"hasComponent\"]\n");
    let statement = engine
        .parse("complex(p(HGNC:AKT1, pmod(Ph)), p(HGNC:EGF))")
        .unwrap();

    let edges: Vec<String> = engine
        .compute_edges(&statement, None, Format::Short)
        .iter()
        .map(ToString::to_string)
        .collect();

    assert_eq!(
        edges,
        [
            "complex(p(HGNC:AKT1,pmod(Ph)),p(HGNC:EGF)) hasComponent p(HGNC:AKT1,pmod(Ph))",
            "complex(p(HGNC:AKT1,pmod(Ph)),p(HGNC:EGF)) hasComponent p(HGNC:EGF)",
        ]
    );
}

#[test]
fn test_explicit_rules_override_config() {
    let engine = common::engine("[computed_edges]\nrules = [\"hasComponent\"]\n");
    let statement = engine.parse("complex(p(HGNC:AKT1, pmod(Ph)))").unwrap();
    let rules = ["modifies".to_string()];

    let edges = engine.compute_edges(&statement, Some(&rules[..]), Format::Medium);

    assert_eq!(edges.len(), 1);
    assert_eq!(edges[0].rule(), "modifies");
    assert_eq!(edges[0].object(), "p(HGNC:AKT1, pmod(Ph))");
}

#[test]
fn test_orthologize_skips_locations() {
    let engine = common::engine("[orthologize]\nspecies = \"TAX:10090\"\n");
    let mut statement = engine
        .parse_and_validate("p(HGNC:AKT1, loc(GO:nucleus))")
        .unwrap();
    assert!(statement.diagnostics().is_empty());

    let rewrites = engine.orthologize(&mut statement, None).unwrap();

    assert_eq!(rewrites, 1);
    assert_eq!(
        engine.render(&statement, Format::Short),
        "p(MGI:Akt1,loc(GO:nucleus))"
    );
    assert!(statement.diagnostics().is_empty());
}

#[test]
fn test_orthologize_miss_warns() {
    let engine = common::engine("");
    let mut statement = engine
        .parse_and_validate("p(HGNC:EGF) -> bp(GO:apoptosis)")
        .unwrap();

    let rewrites = engine.orthologize(&mut statement, Some("TAX:10090")).unwrap();

    assert_eq!(rewrites, 0);
    let codes: Vec<_> = statement.diagnostics().iter().map(|d| d.code()).collect();
    assert_eq!(codes, [Some(ErrorCode::W400)]);
}

#[test]
fn test_orthologize_without_species() {
    let engine = common::engine("");
    let mut statement = engine.parse("p(HGNC:AKT1)").unwrap();

    assert_eq!(engine.orthologize(&mut statement, None).unwrap(), 0);
    assert_eq!(statement.diagnostics()[0].code(), Some(ErrorCode::W401));
}

#[test]
fn test_error_level_threshold() {
    let statement_text = "p(HGNC:EGF)";

    let lenient = common::engine("");
    let mut statement = lenient.parse_and_validate(statement_text).unwrap();
    lenient.orthologize(&mut statement, Some("TAX:10090")).unwrap();
    assert!(lenient.passes(&statement).unwrap());

    let strict = common::engine("[validation]\nerror_level = \"warnings\"\n");
    assert!(!strict.passes(&statement).unwrap());
}

#[test]
fn test_invalid_error_level() {
    let engine = common::engine("[validation]\nerror_level = \"fatal\"\n");
    let statement = engine.parse("p(HGNC:AKT1)").unwrap();

    let err = engine.passes(&statement).unwrap_err();
    assert!(matches!(err, BelError::InvalidConfig(_)), "{err}");
}

#[test]
fn test_validation_errors_are_diagnostics() {
    let engine = common::engine("");
    let statement = engine.parse_and_validate("act(GO:nucleus)").unwrap();

    assert!(statement.has_errors());
    assert!(!engine.passes(&statement).unwrap());
}

#[test]
fn test_parse_error_keeps_source() {
    let engine = common::engine("");
    let text = "p(HGNC:AKT1)) -> p(HGNC:EGF)";

    let err = engine.parse(text).unwrap_err();
    match err {
        BelError::Parse { err, src } => {
            assert_eq!(src, text);
            assert!(!err.diagnostics().is_empty());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_from_catalog() {
    let catalog = common::catalog();

    let engine =
        BelEngine::from_catalog(&catalog, common::config("[specification]\nversion = \"2.0\"\n"))
            .unwrap();
    assert_eq!(engine.specification().version().to_string(), "2.0.0");

    let err =
        BelEngine::from_catalog(&catalog, common::config("[specification]\nversion = \"3.0\"\n"))
            .err()
            .unwrap();
    assert!(matches!(err, BelError::Configuration(_)), "{err}");
}

#[test]
fn test_validate_twice_keeps_one_set_of_findings() {
    let engine = common::engine("");
    let mut statement = engine
        .parse("p(HGNC:EGF) increases p(HGNC:NOPE)")
        .unwrap();
    engine.orthologize(&mut statement, Some("TAX:10090")).unwrap();

    engine.validate(&mut statement).unwrap();
    engine.validate(&mut statement).unwrap();

    let codes: Vec<_> = statement
        .diagnostics()
        .iter()
        .filter_map(|d| d.code())
        .collect();
    assert_eq!(codes, [ErrorCode::W400, ErrorCode::W400, ErrorCode::W402]);
}
