//! Shared pipeline logic used by both CLI subcommands.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! theory table (cache or provider) -> synthesis -> likelihood curve ->
//! estimate / Monte-Carlo aggregation.

use std::path::Path;

use crate::domain::StudyConfig;
use crate::error::AppError;
use crate::estimate::{argmin, weighted_moments, Chi2Curve, GridEstimate, WeightedMoments};
use crate::io::{load_table, save_table};
use crate::likelihood::{null_chi2_moments, Chi2Moments};
use crate::mc::{MonteCarloHarness, StudyReport};
use crate::theory::provider::build_table;
use crate::theory::{lin_space, TheoryCurveTable, ToyBoltzmann};

/// All computed outputs of a single-realization estimate.
#[derive(Debug, Clone)]
pub struct EstimateOutput {
    pub curve: Chi2Curve,
    pub estimate: GridEstimate,
    pub moments: WeightedMoments,
    pub null: Chi2Moments,
}

/// Load the theory table from the cache directory, or build it from the
/// provider (and write the cache back) on a miss.
pub fn load_or_build_table(
    config: &StudyConfig,
    cache_dir: Option<&Path>,
) -> Result<TheoryCurveTable, AppError> {
    if let Some(dir) = cache_dir {
        if let Some(table) = load_table(dir)? {
            // A cache built for different grid settings is not a hit.
            let taus = lin_space(config.tau_min, config.tau_max, config.tau_steps)?;
            let grid_matches = table.taus().len() == taus.len()
                && table
                    .taus()
                    .iter()
                    .zip(taus.iter())
                    .all(|(a, b)| (a - b).abs() < 1e-12)
                && table.lmax() == Some(config.lmax);
            if grid_matches {
                return Ok(table);
            }
        }
    }

    let taus = lin_space(config.tau_min, config.tau_max, config.tau_steps)?;
    let table = build_table(&ToyBoltzmann, &taus, config.lmax)?;

    if let Some(dir) = cache_dir {
        save_table(dir, &table)?;
    }
    Ok(table)
}

/// Estimate τ from one synthetic realization seeded with `config.base_seed`.
pub fn run_estimate(
    table: &TheoryCurveTable,
    config: &StudyConfig,
) -> Result<EstimateOutput, AppError> {
    let harness = MonteCarloHarness::new(table, config);
    let curve = harness.curve_for_seed(config.base_seed)?;
    let estimate = argmin(&curve)?;
    let moments = weighted_moments(&curve)?;
    let lmax = table.lmax().ok_or(crate::error::EstimateError::EmptyTable)?;

    Ok(EstimateOutput {
        curve,
        estimate,
        moments,
        null: null_chi2_moments(lmax),
    })
}

/// Run the full Monte-Carlo study.
pub fn run_study(table: &TheoryCurveTable, config: &StudyConfig) -> Result<StudyReport, AppError> {
    let report = MonteCarloHarness::new(table, config).run()?;
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FieldSet;

    fn small_config(fields: FieldSet) -> StudyConfig {
        StudyConfig {
            lmax: 25,
            trials: 6,
            truth_tau: 0.06,
            tau_min: 0.03,
            tau_max: 0.09,
            tau_steps: 13,
            noise: 0.0,
            fields,
            base_seed: 5,
        }
    }

    #[test]
    fn estimate_pipeline_produces_consistent_output() {
        let config = small_config(FieldSet::Ee);
        let table = load_or_build_table(&config, None).unwrap();
        let out = run_estimate(&table, &config).unwrap();

        assert!(out.estimate.chi2_min.is_finite());
        assert!(out.estimate.tau_hat >= 0.03 && out.estimate.tau_hat <= 0.09);
        assert!(out.moments.mean.is_finite());
        assert!(out.moments.variance >= 0.0);
        // The weighted mean should land near the argmin for a well-behaved curve.
        assert!((out.moments.mean - out.estimate.tau_hat).abs() < 0.02);
    }

    #[test]
    fn cache_round_trip_through_pipeline() {
        let config = small_config(FieldSet::Ee);
        let dir = std::env::temp_dir().join(format!("cmbtau_pipe_{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);

        let built = load_or_build_table(&config, Some(&dir)).unwrap();
        let cached = load_or_build_table(&config, Some(&dir)).unwrap();
        assert_eq!(built.taus(), cached.taus());
        for i in 0..built.len() {
            assert_eq!(built.spectrum(i), cached.spectrum(i));
        }

        // A different grid invalidates the cache instead of misusing it.
        let mut other = config.clone();
        other.tau_steps = 7;
        let rebuilt = load_or_build_table(&other, Some(&dir)).unwrap();
        assert_eq!(rebuilt.taus().len(), 7);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn study_pipeline_is_deterministic() {
        let config = small_config(FieldSet::Ee);
        let table = load_or_build_table(&config, None).unwrap();
        let a = run_study(&table, &config).unwrap();
        let b = run_study(&table, &config).unwrap();
        assert_eq!(a.trials, b.trials);
    }
}
