//! Command-line parsing for the τ estimator.
//!
//! The goal of this module is to keep **argument parsing** and **command
//! dispatch** separate from the statistics/math code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::{FieldSet, StudyConfig};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "cmbtau",
    version,
    about = "Reionization optical depth estimation from CMB polarization spectra"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Estimate τ from a single synthetic realization and print the fit.
    Estimate(RunArgs),
    /// Run a Monte-Carlo study of the estimator's bias and scatter.
    Study(RunArgs),
}

/// Common options for estimation and study runs.
#[derive(Debug, Parser, Clone)]
pub struct RunArgs {
    /// Highest multipole evaluated.
    #[arg(long, default_value_t = 100)]
    pub lmax: usize,

    /// Number of Monte-Carlo trials (study only).
    #[arg(short = 'n', long, default_value_t = 100)]
    pub trials: usize,

    /// Truth τ the synthetic measurements are drawn at.
    #[arg(long, default_value_t = 0.06)]
    pub truth_tau: f64,

    /// Lower edge of the τ search grid.
    #[arg(long, default_value_t = 0.03)]
    pub tau_min: f64,

    /// Upper edge of the τ search grid.
    #[arg(long, default_value_t = 0.09)]
    pub tau_max: f64,

    /// Number of τ grid points.
    #[arg(long, default_value_t = 21)]
    pub tau_steps: usize,

    /// Additive noise term on the theory EE spectrum.
    #[arg(long, default_value_t = 0.0)]
    pub noise: f64,

    /// Which spectra enter the fit.
    #[arg(short = 'f', long, value_enum, default_value_t = FieldSet::Ee)]
    pub fields: FieldSet,

    /// Base random seed. Trial s uses seed + s; `estimate` uses it directly.
    #[arg(long, default_value_t = 5)]
    pub seed: u64,

    /// Directory for the theory-table text cache (taus.txt, tt/te/ee.txt).
    /// No caching when omitted.
    #[arg(long)]
    pub cache_dir: Option<PathBuf>,

    /// Write the study report to this JSON file.
    #[arg(long)]
    pub export: Option<PathBuf>,
}

impl RunArgs {
    pub fn to_config(&self) -> StudyConfig {
        StudyConfig {
            lmax: self.lmax,
            trials: self.trials,
            truth_tau: self.truth_tau,
            tau_min: self.tau_min,
            tau_max: self.tau_max,
            tau_steps: self.tau_steps,
            noise: self.noise,
            fields: self.fields,
            base_seed: self.seed,
        }
    }
}
