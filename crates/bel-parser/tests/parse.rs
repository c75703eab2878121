mod common;

use std::{
    collections::BTreeSet,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    thread,
    time::Duration,
};

use bel_core::{
    LookupError, TermId,
    specification::SlotClass,
    terms::{EntityTypeLookup, LookupOptions},
};
use bel_parser::{
    ErrorCode, ErrorLevel, Format, NodeData, Object, ValidationOptions, parse, scan, validate,
};

use common::{TypeTable, parse_validated, spec};

#[test]
fn test_simple_statement_shape() {
    let spec = spec();
    let statement = parse("p(HGNC:AKT1) increases p(HGNC:EGF)", &spec).expect("Failed to parse");

    let subject = statement.function(statement.subject()).unwrap();
    assert_eq!(subject.name(), "proteinAbundance");
    assert_eq!(subject.short_name(), Some("p"));
    assert_eq!(subject.args().len(), 1);
    let term = statement.ns_arg(subject.args()[0]).unwrap();
    assert_eq!((term.namespace(), term.value()), ("HGNC", "AKT1"));

    assert_eq!(statement.relation().unwrap().name(), "increases");

    match statement.object() {
        Some(Object::Function(id)) => {
            let object = statement.function(*id).unwrap();
            assert_eq!(object.name(), "proteinAbundance");
            let term = statement.ns_arg(object.args()[0]).unwrap();
            assert_eq!(term.term(), TermId::new("HGNC", "EGF"));
        }
        other => panic!("Expected function object, got {other:?}"),
    }
}

#[test]
fn test_simple_statement_validates_cleanly() {
    let statement = parse_validated("p(HGNC:AKT1) increases p(HGNC:EGF)", false);

    assert!(!statement.has_errors(), "{:?}", statement.diagnostics());
    assert_eq!(statement.diagnostics_at(ErrorLevel::Warnings).count(), 0);
}

#[test]
fn test_extra_close_paren_reported_at_its_offset() {
    let spec = spec();
    let text = r#"a(CHEBI:"nitric oxide")) decreases r(HGNC:AKT1)"#;

    let err = parse(text, &spec).expect_err("statement is unbalanced");

    let diag = &err.diagnostics()[0];
    assert_eq!(diag.code(), Some(ErrorCode::E003));
    assert_eq!(diag.message(), "missing left parenthesis at 23");
    assert_eq!(diag.primary_span().unwrap().start(), 23);
    assert_eq!(
        diag.caret(text),
        format!("{text}\n{}^", " ".repeat(23))
    );
}

#[test]
fn test_every_structural_problem_reported() {
    let spec = spec();
    let err = parse("p(A:b)) -> p(B:c)) -> (p(C:d", &spec).expect_err("statement is unbalanced");

    let messages: Vec<&str> = err.diagnostics().iter().map(|d| d.message()).collect();
    assert!(messages.contains(&"missing left parenthesis at 6"), "{messages:?}");
    assert!(messages.contains(&"missing left parenthesis at 17"), "{messages:?}");
    assert!(err.to_string().contains("more"));
}

#[test]
fn test_partial_statement_is_scanned() {
    let scan = scan("p(HGNC:AKT1) increases complex(p(HGNC:EGF), ");

    assert!(scan.has_errors());
    let names: Vec<&str> = scan
        .functions()
        .iter()
        .map(|f| f.name.inner().as_str())
        .collect();
    assert_eq!(names, ["p", "complex", "p"]);
}

#[test]
fn test_unknown_names_do_not_fail_the_parse() {
    let spec = spec();
    let statement = parse("foo(HGNC:AKT1) frobnicates p(HGNC:EGF)", &spec).expect("Failed to parse");

    let codes: Vec<_> = statement.diagnostics().iter().filter_map(|d| d.code()).collect();
    assert_eq!(codes, [ErrorCode::E200, ErrorCode::E201]);
    assert_eq!(statement.render(Format::Long), "foo(HGNC:AKT1) frobnicates proteinAbundance(HGNC:EGF)");
}

#[test]
fn test_nested_statement_object() {
    let spec = spec();
    let statement = parse(
        "p(HGNC:AKT1) increases (p(HGNC:EGF) decreases bp(GO:apoptosis))",
        &spec,
    )
    .expect("Failed to parse");

    match statement.object() {
        Some(Object::Statement(nested)) => {
            assert_eq!(nested.relation().unwrap().name(), "decreases");
            let subject = statement.function(nested.subject()).unwrap();
            assert_eq!(subject.name(), "proteinAbundance");
        }
        other => panic!("Expected nested statement, got {other:?}"),
    }
    assert_eq!(
        statement.render(Format::Short),
        "p(HGNC:AKT1) -> (p(HGNC:EGF) -| bp(GO:apoptosis))"
    );
}

#[test]
fn test_render_formats() {
    let spec = spec();
    let statement = parse(
        r#"proteinAbundance(HGNC:AKT1, pmod(Ph, Ser, 473), loc(GO:"intracellular space")) => a(CHEBI:"nitric oxide")"#,
        &spec,
    )
    .expect("Failed to parse");

    assert_eq!(
        statement.render(Format::Short),
        r#"p(HGNC:AKT1,pmod(Ph,Ser,473),loc(GO:"intracellular space")) => a(CHEBI:"nitric oxide")"#
    );
    assert_eq!(
        statement.render(Format::Medium),
        r#"p(HGNC:AKT1, pmod(Ph, Ser, 473), loc(GO:"intracellular space")) directlyIncreases a(CHEBI:"nitric oxide")"#
    );
    assert_eq!(
        statement.render(Format::Long),
        r#"proteinAbundance(HGNC:AKT1, proteinModification(Ph, Ser, 473), location(GO:"intracellular space")) directlyIncreases abundance(CHEBI:"nitric oxide")"#
    );
}

#[test]
fn test_parent_and_sibling_links() {
    let spec = spec();
    let statement = parse("p(HGNC:AKT1, pmod(Ph), loc(GO:cytoplasm))", &spec).expect("Failed to parse");

    let subject = statement.subject();
    let args = statement.args(subject).to_vec();
    assert_eq!(args.len(), 3);
    for &arg in &args {
        assert_eq!(statement.node(arg).parent(), Some(subject));
        let siblings = statement.node(arg).siblings();
        assert_eq!(siblings.len(), 2);
        assert!(!siblings.contains(&arg));
    }
    let pmod_arg = statement.args(args[1])[0];
    assert_eq!(statement.closest_primary_ancestor(pmod_arg), Some(subject));
}

#[test]
fn test_validation_annotates_tree() {
    let statement = parse_validated("p(HGNC:AKT1, pmod(Ph, Ser, 473), loc(GO:cytoplasm))", false);

    assert!(!statement.has_errors(), "{:?}", statement.diagnostics());
    let args = statement.args(statement.subject()).to_vec();
    assert_eq!(statement.node(args[0]).slot(), Some(SlotClass::Required));
    assert_eq!(statement.node(args[1]).slot(), Some(SlotClass::Repeatable));
    assert_eq!(statement.node(args[2]).slot(), Some(SlotClass::Optional));

    let residue = statement.args(args[1])[1];
    match statement.node(residue).data() {
        NodeData::StrArg(str_arg) => {
            assert!(str_arg.value_types().contains("AminoAcid"));
        }
        other => panic!("Expected string argument, got {other:?}"),
    }
}

#[test]
fn test_semantic_errors_carry_positions() {
    let text = "p(HGNC:AKT1) increases act(GO:cytoplasm)";
    let statement = parse_validated(text, false);

    let error = statement
        .diagnostics()
        .iter()
        .find(|d| d.severity().is_error())
        .expect("validation error");
    assert_eq!(error.code(), Some(ErrorCode::E302));
    let span = error.primary_span().unwrap();
    assert_eq!(&text[span.range()], "GO:cytoplasm");
}

#[test]
fn test_error_level_filter() {
    let statement = parse_validated("p(HGNC:NOPE) increases p(HGNC:EGF)", false);

    assert!(!statement.has_errors());
    assert_eq!(statement.diagnostics_at(ErrorLevel::Errors).count(), 0);
    assert_eq!(statement.diagnostics_at(ErrorLevel::Warnings).count(), 1);
}

#[test]
fn test_strict_entity_types() {
    let statement = parse_validated("p(HGNC:NOPE)", true);

    let codes: Vec<_> = statement
        .diagnostics_at(ErrorLevel::Errors)
        .filter_map(|d| d.code())
        .collect();
    assert_eq!(codes, [ErrorCode::E305]);
}

/// Answers after a delay for one term, immediately for the rest.
struct SlowLookup {
    slow: TermId,
    calls: AtomicUsize,
}

impl EntityTypeLookup for SlowLookup {
    fn lookup_entity_types(&self, term: &TermId) -> Result<BTreeSet<String>, LookupError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if *term == self.slow {
            thread::sleep(Duration::from_millis(500));
        }
        Ok(["Gene", "Protein"].iter().map(|t| t.to_string()).collect())
    }
}

#[test]
fn test_lookup_timeout_is_a_miss() {
    let spec = spec();
    let mut statement =
        parse("p(HGNC:SLOW) increases p(HGNC:EGF)", &spec).expect("Failed to parse");
    let lookup = Arc::new(SlowLookup {
        slow: TermId::new("HGNC", "SLOW"),
        calls: AtomicUsize::new(0),
    });
    let collaborator: Arc<dyn EntityTypeLookup> = lookup.clone();
    let options = ValidationOptions::new(
        LookupOptions::new(Some(Duration::from_millis(50)), true),
        false,
    );

    validate(&mut statement, &spec, &collaborator, &options).expect("timeouts are misses");

    assert!(!statement.has_errors(), "{:?}", statement.diagnostics());
    let warnings: Vec<_> = statement
        .diagnostics()
        .iter()
        .filter(|d| d.severity().is_warning())
        .collect();
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].message().contains("HGNC:SLOW"));

    let object = statement.ns_args()[1];
    assert!(statement.ns_arg(object).unwrap().entity_types().is_some());
    assert_eq!(lookup.calls.load(Ordering::SeqCst), 2);
}

#[test]
fn test_duplicate_terms_looked_up_once() {
    let spec = spec();
    let mut statement =
        parse("p(HGNC:EGF) increases p(HGNC:EGF)", &spec).expect("Failed to parse");
    let lookup = Arc::new(SlowLookup {
        slow: TermId::new("X", "none"),
        calls: AtomicUsize::new(0),
    });
    let collaborator: Arc<dyn EntityTypeLookup> = lookup.clone();
    let options = ValidationOptions::new(LookupOptions::inline(), false);

    validate(&mut statement, &spec, &collaborator, &options).unwrap();

    assert_eq!(lookup.calls.load(Ordering::SeqCst), 1);
    for id in statement.ns_args() {
        assert!(statement.ns_arg(id).unwrap().entity_types().is_some());
    }
}

struct FailingLookup;

impl EntityTypeLookup for FailingLookup {
    fn lookup_entity_types(&self, term: &TermId) -> Result<BTreeSet<String>, LookupError> {
        Err(LookupError::Failed {
            term: term.to_string(),
            message: "backend unavailable".to_string(),
        })
    }
}

#[test]
fn test_collaborator_failure_propagates() {
    let spec = spec();
    let mut statement = parse("p(HGNC:AKT1)", &spec).expect("Failed to parse");
    let collaborator: Arc<dyn EntityTypeLookup> = Arc::new(FailingLookup);

    let result = validate(
        &mut statement,
        &spec,
        &collaborator,
        &ValidationOptions::new(LookupOptions::inline(), false),
    );

    assert!(matches!(result, Err(LookupError::Failed { .. })));
}

#[test]
fn test_standard_table_knows_fixture_terms() {
    let table = TypeTable::standard();
    let types = table
        .lookup_entity_types(&TermId::new("GO", "cytoplasm"))
        .unwrap();
    assert!(types.contains("Location"));
}

#[test]
fn test_trailing_backslash_survives_rendering() {
    let spec = spec();
    let statement = parse(r"p(HGNC:AKT1, loc(GO:x\ ))", &spec).expect("Failed to parse");

    let location = statement.args(statement.args(statement.subject())[1])[0];
    assert_eq!(statement.ns_arg(location).unwrap().value(), r"x\");

    let rendered = statement.render(Format::Short);
    assert_eq!(rendered, r#"p(HGNC:AKT1,loc(GO:"x\\"))"#);
    let reparsed = parse(&rendered, &spec).expect("rendered text parses");
    assert!(statement.same_structure(&reparsed));
}

#[test]
fn test_quoted_backslash_is_unescaped() {
    let spec = spec();
    let statement = parse(r#"a(CHEBI:"a\\b \"c\"")"#, &spec).expect("Failed to parse");

    let term = statement.ns_arg(statement.args(statement.subject())[0]).unwrap();
    assert_eq!(term.value(), r#"a\b "c""#);
    assert_eq!(statement.render(Format::Short), r#"a(CHEBI:"a\\b \"c\"")"#);
}
