//! Command-line argument definitions for the BEL CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments select the statements to process, the
//! configuration, specification and term table sources, the transforms to
//! apply and the logging verbosity.

use clap::Parser;

use bel::Format;

/// Command-line arguments for the BEL statement tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Statements to process
    #[arg(help = "BEL statements; read from --input or stdin when omitted")]
    pub statements: Vec<String>,

    /// File with one statement per line; blank lines and `#` comments are skipped
    #[arg(short, long, conflicts_with = "statements")]
    pub input: Option<String>,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Directory of specification JSON documents
    #[arg(long)]
    pub spec_dir: Option<String>,

    /// Term table (JSON) backing entity-type, equivalence and ortholog lookups
    #[arg(long)]
    pub terms: Option<String>,

    /// Output format (short, medium, long)
    #[arg(short, long, default_value = "medium")]
    pub format: Format,

    /// Rewrite terms to their canonical namespaces
    #[arg(long)]
    pub canonicalize: bool,

    /// Rewrite terms to their display namespaces
    #[arg(long, conflicts_with = "canonicalize")]
    pub decanonicalize: bool,

    /// Rewrite terms to their orthologs in the configured species
    #[arg(long)]
    pub orthologize: bool,

    /// Target species for --orthologize, overriding the configuration
    #[arg(long, requires = "orthologize")]
    pub species: Option<String>,

    /// Print computed edges after each statement
    #[arg(long)]
    pub edges: bool,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}
