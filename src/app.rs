//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - loads or builds the theory curve table
//! - runs the single-realization estimate or the Monte-Carlo study
//! - prints reports
//! - writes optional exports

use clap::Parser;

use crate::cli::{Cli, Command, RunArgs};
use crate::error::AppError;
use crate::io::write_study_json;
use crate::report::{format_estimate_summary, format_study_summary};

pub mod pipeline;

/// Entry point for the `cmbtau` binary.
pub fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    match cli.command {
        Command::Estimate(args) => handle_estimate(args),
        Command::Study(args) => handle_study(args),
    }
}

fn handle_estimate(args: RunArgs) -> Result<(), AppError> {
    let config = args.to_config();
    let table = pipeline::load_or_build_table(&config, args.cache_dir.as_deref())?;
    let output = pipeline::run_estimate(&table, &config)?;

    print!(
        "{}",
        format_estimate_summary(
            &config,
            &output.curve,
            &output.estimate,
            &output.moments,
            &output.null,
        )
    );
    Ok(())
}

fn handle_study(args: RunArgs) -> Result<(), AppError> {
    let config = args.to_config();
    let table = pipeline::load_or_build_table(&config, args.cache_dir.as_deref())?;
    let report = pipeline::run_study(&table, &config)?;

    print!("{}", format_study_summary(&config, &report));

    if let Some(path) = &args.export {
        write_study_json(path, &config, &report)?;
        println!("Wrote study JSON to '{}'.", path.display());
    }
    Ok(())
}
