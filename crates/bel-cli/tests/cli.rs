use std::fs;

use clap::Parser;
use tempfile::TempDir;

use bel::BelError;
use bel_cli::{Args, run_with_output};

const BEL_2_0_0: &str = include_str!("../../bel-core/tests/fixtures/bel_2_0_0.json");

const TERMS: &str = r#"{
    "entity_types": {
        "HGNC:AKT1": ["Gene", "Protein", "RNA"],
        "HGNC:EGF": ["Gene", "Protein", "RNA"],
        "GO:nucleus": ["Location"]
    },
    "equivalences": [["HGNC:AKT1", "EG:207"], ["HGNC:EGF", "EG:1950"]],
    "orthologs": {"TAX:10090": {"HGNC:AKT1": ["MGI:Akt1"]}}
}"#;

/// A workspace with a specification directory, a term table and a config.
struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new(config: &str) -> Self {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("specs")).unwrap();
        fs::write(dir.path().join("specs/bel_2_0_0.json"), BEL_2_0_0).unwrap();
        fs::write(dir.path().join("terms.json"), TERMS).unwrap();
        fs::write(dir.path().join("config.toml"), config).unwrap();
        Self { dir }
    }

    fn path(&self, name: &str) -> String {
        self.dir.path().join(name).display().to_string()
    }

    fn args(&self, extra: &[&str]) -> Args {
        let mut argv = vec![
            "bel".to_string(),
            "--config".to_string(),
            self.path("config.toml"),
            "--spec-dir".to_string(),
            self.path("specs"),
            "--terms".to_string(),
            self.path("terms.json"),
        ];
        argv.extend(extra.iter().map(|arg| arg.to_string()));
        Args::parse_from(argv)
    }

    fn run(&self, extra: &[&str]) -> (bool, String) {
        let mut out = Vec::new();
        let passed = run_with_output(&self.args(extra), &mut out).unwrap();
        (passed, String::from_utf8(out).unwrap())
    }
}

#[test]
fn test_render_statement() {
    let workspace = Workspace::new("");

    let (passed, out) = workspace.run(&["--format", "long", "p(HGNC:AKT1) -> p(HGNC:EGF)"]);

    assert!(passed);
    assert_eq!(
        out,
        "proteinAbundance(HGNC:AKT1) increases proteinAbundance(HGNC:EGF)\n"
    );
}

#[test]
fn test_canonicalize_from_config() {
    let workspace = Workspace::new("[canonicalize]\nHGNC = [\"EG\"]\n");

    let (_, out) = workspace.run(&["--canonicalize", "--format", "short", "p(HGNC:AKT1)"]);

    assert_eq!(out, "p(EG:207)\n");
}

#[test]
fn test_orthologize_with_species() {
    let workspace = Workspace::new("");

    let (passed, out) = workspace.run(&[
        "--orthologize",
        "--species",
        "TAX:10090",
        "p(HGNC:AKT1, loc(GO:nucleus))",
    ]);

    assert!(passed);
    assert_eq!(out, "p(MGI:Akt1, loc(GO:nucleus))\n");
}

#[test]
fn test_edges() {
    let workspace = Workspace::new("");

    let (_, out) = workspace.run(&["--edges", "complex(p(HGNC:AKT1), p(HGNC:EGF))"]);

    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(
        lines,
        [
            "complex(p(HGNC:AKT1), p(HGNC:EGF))",
            "    complex(p(HGNC:AKT1), p(HGNC:EGF)) hasComponent p(HGNC:AKT1)",
            "    complex(p(HGNC:AKT1), p(HGNC:EGF)) hasComponent p(HGNC:EGF)",
        ]
    );
}

#[test]
fn test_failures_do_not_stop_later_statements() {
    let workspace = Workspace::new("");
    let input = workspace.path("statements.bel");
    fs::write(
        &input,
        "# curated statements\np(HGNC:AKT1)) -> p(HGNC:EGF)\n\nact(GO:nucleus)\np(HGNC:EGF)\n",
    )
    .unwrap();

    let (passed, out) = workspace.run(&["--input", &input]);

    assert!(!passed);
    assert_eq!(out, "act(GO:nucleus)\np(HGNC:EGF)\n");
}

#[test]
fn test_warnings_fail_under_warning_level() {
    let workspace = Workspace::new("[validation]\nerror_level = \"warnings\"\n");

    let (passed, _) = workspace.run(&["--orthologize", "--species", "TAX:10090", "p(HGNC:EGF)"]);

    assert!(!passed);
}

#[test]
fn test_missing_spec_dir() {
    let workspace = Workspace::new("");
    let mut args = workspace.args(&["p(HGNC:AKT1)"]);
    args.spec_dir = Some(workspace.path("nowhere"));

    let err = run_with_output(&args, &mut Vec::new()).unwrap_err();

    assert!(matches!(err, BelError::Configuration(_)), "{err}");
}

#[test]
fn test_bad_terms_file() {
    let workspace = Workspace::new("");
    fs::write(workspace.path("terms.json"), "[1, 2]").unwrap();

    let err = run_with_output(&workspace.args(&["p(HGNC:AKT1)"]), &mut Vec::new()).unwrap_err();

    assert!(matches!(err, BelError::Terms { .. }), "{err}");
}
