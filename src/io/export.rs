//! Write study results to JSON.
//!
//! The export is the "portable" representation of a run: configuration,
//! per-trial results, aggregates, and the analytic null reference, easy to
//! consume from notebooks or downstream scripts.

use std::fs::File;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::StudyConfig;
use crate::error::AppError;
use crate::mc::StudyReport;

/// Schema of a study JSON file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudyFile {
    pub tool: String,
    pub config: StudyConfig,
    pub report: StudyReport,
}

/// Write a study JSON file.
pub fn write_study_json(
    path: &Path,
    config: &StudyConfig,
    report: &StudyReport,
) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::new(
            2,
            format!("Failed to create study JSON '{}': {e}", path.display()),
        )
    })?;

    let out = StudyFile {
        tool: "cmbtau".to_string(),
        config: config.clone(),
        report: report.clone(),
    };

    serde_json::to_writer_pretty(file, &out)
        .map_err(|e| AppError::new(2, format!("Failed to write study JSON: {e}")))
}

/// Read a study JSON file back.
pub fn read_study_json(path: &Path) -> Result<StudyFile, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::new(
            2,
            format!("Failed to open study JSON '{}': {e}", path.display()),
        )
    })?;
    serde_json::from_reader(file)
        .map_err(|e| AppError::new(2, format!("Invalid study JSON: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FieldSet, TrialResult};
    use crate::likelihood::Chi2Moments;

    #[test]
    fn study_json_round_trips() {
        let config = StudyConfig {
            fields: FieldSet::Joint,
            ..StudyConfig::default()
        };
        let report = StudyReport {
            trials: vec![TrialResult {
                seed: 0,
                tau_hat: 0.06,
                chi2_min: 27.5,
            }],
            excluded_trials: 1,
            excluded_ells: 3,
            tau_mean: 0.06,
            tau_std: 0.004,
            chi2_mean: 27.5,
            chi2_std: 0.0,
            null: Chi2Moments {
                mean: 29.0,
                variance: 60.0,
            },
        };

        let path = std::env::temp_dir().join(format!("cmbtau_study_{}.json", std::process::id()));
        write_study_json(&path, &config, &report).unwrap();
        let back = read_study_json(&path).unwrap();
        assert_eq!(back.tool, "cmbtau");
        assert_eq!(back.report.trials.len(), 1);
        assert_eq!(back.report.excluded_trials, 1);
        assert_eq!(back.config.fields, FieldSet::Joint);
        let _ = std::fs::remove_file(&path);
    }
}
