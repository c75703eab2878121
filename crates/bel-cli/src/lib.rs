//! CLI logic for the BEL statement tool.
//!
//! Loads the configuration, the specification catalog and an optional term
//! table, then runs every statement through the engine and writes the
//! result, one statement per line.

pub mod error_adapter;

mod args;
mod config;

pub use args::Args;

use std::{
    fs,
    io::{self, BufRead, Write},
    path::PathBuf,
    sync::Arc,
};

use log::{debug, error, info, warn};

use bel::{BelEngine, BelError, MemoryTermStore, SpecificationCatalog, Statement};

use error_adapter::{Reportable, diagnostic_reportables, to_reportables};

/// Specification directory used when neither the arguments nor the
/// configuration name one.
const DEFAULT_SPEC_DIR: &str = "specs";

/// Run the BEL CLI application, writing results to stdout.
///
/// Returns `Ok(false)` when at least one statement failed to parse or did
/// not pass validation at the configured error level.
///
/// # Errors
///
/// Returns `BelError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Specification catalog errors
/// - Term table errors
/// - Lookup collaborator failures
pub fn run(args: &Args) -> Result<bool, BelError> {
    let stdout = io::stdout();
    run_with_output(args, &mut stdout.lock())
}

/// Run the BEL CLI application, writing results to `out`.
pub fn run_with_output(args: &Args, out: &mut impl Write) -> Result<bool, BelError> {
    let engine = build_engine(args)?;
    let statements = read_statements(args)?;
    info!(statements = statements.len(); "Processing statements");

    let mut passed = true;
    for text in &statements {
        passed &= process(&engine, args, text, out)?;
    }

    info!(passed; "Statements processed");
    Ok(passed)
}

fn build_engine(args: &Args) -> Result<BelEngine, BelError> {
    let app_config = config::load_config(args.config.as_ref())?;

    let spec_dir = args
        .spec_dir
        .as_ref()
        .map(PathBuf::from)
        .or_else(|| app_config.specification().directory().cloned())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SPEC_DIR));
    debug!(spec_dir:?; "Loading specification catalog");
    let catalog = SpecificationCatalog::from_dir(&spec_dir)?;

    let engine = BelEngine::from_catalog(&catalog, app_config)?;
    match &args.terms {
        Some(path) => {
            let terms = MemoryTermStore::from_path(path)?;
            Ok(engine.with_terms(Arc::new(terms)))
        }
        None => Ok(engine),
    }
}

fn read_statements(args: &Args) -> Result<Vec<String>, BelError> {
    if !args.statements.is_empty() {
        return Ok(args.statements.clone());
    }

    let lines: Vec<String> = match &args.input {
        Some(path) => fs::read_to_string(path)?
            .lines()
            .map(str::to_string)
            .collect(),
        None => io::stdin().lock().lines().collect::<Result<_, _>>()?,
    };

    Ok(lines
        .into_iter()
        .map(|line| line.trim().to_string())
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .collect())
}

/// Run one statement through the pipeline. Parse failures are reported and
/// counted, not returned.
fn process(
    engine: &BelEngine,
    args: &Args,
    text: &str,
    out: &mut impl Write,
) -> Result<bool, BelError> {
    let mut statement = match engine.parse_and_validate(text) {
        Ok(statement) => statement,
        Err(err @ BelError::Parse { .. }) => {
            report(&to_reportables(&err));
            return Ok(false);
        }
        Err(err) => return Err(err),
    };

    if args.canonicalize {
        engine.canonicalize(&mut statement)?;
    }
    if args.decanonicalize {
        engine.decanonicalize(&mut statement)?;
    }
    if args.orthologize {
        engine.orthologize(&mut statement, args.species.as_deref())?;
    }

    write_statement(engine, args, &statement, out)?;
    report(&diagnostic_reportables(statement.diagnostics(), text));

    engine.passes(&statement)
}

fn write_statement(
    engine: &BelEngine,
    args: &Args,
    statement: &Statement,
    out: &mut impl Write,
) -> Result<(), BelError> {
    writeln!(out, "{}", engine.render(statement, args.format))?;
    if args.edges {
        for edge in engine.compute_edges(statement, None, args.format) {
            writeln!(out, "    {edge}")?;
        }
    }
    Ok(())
}

fn report(reportables: &[Reportable<'_>]) {
    for reportable in reportables {
        let rendered = reportable.render();
        if reportable.is_error() {
            error!("{rendered}");
        } else {
            warn!("{rendered}");
        }
    }
}
