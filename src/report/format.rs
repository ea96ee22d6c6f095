//! Formatted terminal summaries.
//!
//! We keep formatting code in one place so:
//! - the math/estimation code stays clean and testable
//! - output changes are localized (important for future snapshot tests)

use crate::domain::StudyConfig;
use crate::estimate::{Chi2Curve, GridEstimate, WeightedMoments};
use crate::likelihood::Chi2Moments;
use crate::mc::StudyReport;

/// Summary of a single-realization estimate.
pub fn format_estimate_summary(
    config: &StudyConfig,
    curve: &Chi2Curve,
    estimate: &GridEstimate,
    moments: &WeightedMoments,
    null: &Chi2Moments,
) -> String {
    let mut out = String::new();

    out.push_str("=== cmbtau - single-realization tau estimate ===\n");
    out.push_str(&format!("Fields: {}\n", config.fields.display_name()));
    out.push_str(&format!(
        "Grid: tau in [{:.4}, {:.4}], {} points | lmax={}\n",
        config.tau_min, config.tau_max, config.tau_steps, config.lmax
    ));
    out.push_str(&format!(
        "Truth: tau={:.4} | seed={} | noise={:.3e}\n",
        config.truth_tau, config.base_seed, config.noise
    ));
    out.push('\n');
    out.push_str(&format!(
        "tau_hat = {:.4} (grid argmin, chi2_min = {:.3})\n",
        estimate.tau_hat, estimate.chi2_min
    ));
    out.push_str(&format!(
        "weighted: tau = {:.4} +/- {:.4}\n",
        moments.mean,
        moments.std_dev()
    ));
    out.push_str(&format!(
        "null reference: chi2 = {:.2} +/- {:.2}\n",
        null.mean,
        null.std_dev()
    ));

    if curve.failed_points() > 0 || curve.excluded_ells() > 0 || moments.excluded_points > 0 {
        out.push_str(&format!(
            "exclusions: {} grid points failed, {} multipoles dropped\n",
            curve.failed_points(),
            curve.excluded_ells()
        ));
    }

    out
}

/// Summary of a Monte-Carlo study.
pub fn format_study_summary(config: &StudyConfig, report: &StudyReport) -> String {
    let mut out = String::new();

    out.push_str("=== cmbtau - Monte Carlo study ===\n");
    out.push_str(&format!("Fields: {}\n", config.fields.display_name()));
    out.push_str(&format!(
        "Grid: tau in [{:.4}, {:.4}], {} points | lmax={}\n",
        config.tau_min, config.tau_max, config.tau_steps, config.lmax
    ));
    out.push_str(&format!(
        "Trials: {} requested, {} kept, {} excluded\n",
        config.trials,
        report.trials.len(),
        report.excluded_trials
    ));
    out.push('\n');
    out.push_str(&format!(
        "tau_hat: mean = {:.4}, std = {:.4} (truth {:.4})\n",
        report.tau_mean, report.tau_std, config.truth_tau
    ));
    out.push_str(&format!(
        "chi2_min: mean = {:.2}, std = {:.2}\n",
        report.chi2_mean, report.chi2_std
    ));
    out.push_str(&format!(
        "null reference: chi2 = {:.2} +/- {:.2}\n",
        report.null.mean,
        report.null.std_dev()
    ));

    if report.excluded_ells > 0 {
        out.push_str(&format!(
            "exclusions: {} multipoles dropped across surviving trials\n",
            report.excluded_ells
        ));
    }

    out
}
