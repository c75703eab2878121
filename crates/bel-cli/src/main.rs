//! BEL CLI entry point.

use std::{process, str::FromStr};

use clap::Parser;
use log::{LevelFilter, debug, error, info};

use bel_cli::{Args, error_adapter::to_reportables};

fn main() {
    miette::set_panic_hook();

    let args = Args::parse();

    let log_level = LevelFilter::from_str(&args.log_level).unwrap_or_else(|_| {
        eprintln!(
            "Invalid log level: {}. Using 'warn' instead.",
            args.log_level
        );
        LevelFilter::Warn
    });

    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(log_level)
        .init();

    info!(log_level:?; "Starting BEL");
    debug!(args:?; "Parsed arguments");

    match bel_cli::run(&args) {
        Ok(true) => info!("Completed successfully"),
        Ok(false) => process::exit(1),
        Err(err) => {
            for reportable in to_reportables(&err) {
                error!("{}", reportable.render());
            }
            process::exit(1);
        }
    }
}
