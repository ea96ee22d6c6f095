//! Theory-table cache as parallel plain-text arrays.
//!
//! Layout (one file per field, keyed by row index = grid index):
//!
//! - `taus.txt`: one τ per line
//! - `tt.txt` / `te.txt` / `ee.txt`: one whitespace-separated row per τ,
//!   columns indexed by ℓ from 0
//!
//! A missing file is a cache miss (`Ok(None)`): the caller recomputes via
//! the theory provider and writes the cache back. Malformed contents are an
//! error: a half-written cache should fail loudly, not produce a silently
//! wrong table.

use std::fs;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::domain::TheorySpectrum;
use crate::error::AppError;
use crate::theory::TheoryCurveTable;

const TAUS_FILE: &str = "taus.txt";
const FIELD_FILES: [&str; 3] = ["tt.txt", "te.txt", "ee.txt"];

/// Load a cached table from `dir`. `Ok(None)` on cache miss.
pub fn load_table(dir: &Path) -> Result<Option<TheoryCurveTable>, AppError> {
    let tau_path = dir.join(TAUS_FILE);
    let field_paths: Vec<_> = FIELD_FILES.iter().map(|f| dir.join(f)).collect();
    if !tau_path.exists() || field_paths.iter().any(|p| !p.exists()) {
        return Ok(None);
    }

    let taus = read_column(&tau_path)?;
    let tt = read_rows(&field_paths[0])?;
    let te = read_rows(&field_paths[1])?;
    let ee = read_rows(&field_paths[2])?;

    if tt.len() != taus.len() || te.len() != taus.len() || ee.len() != taus.len() {
        return Err(AppError::new(
            2,
            format!(
                "Cache row counts disagree in '{}': {} taus vs {}/{}/{} spectra rows.",
                dir.display(),
                taus.len(),
                tt.len(),
                te.len(),
                ee.len()
            ),
        ));
    }

    for i in 0..taus.len() {
        if tt[i].len() != te[i].len() || te[i].len() != ee[i].len() {
            return Err(AppError::new(
                2,
                format!(
                    "Cache row {i} in '{}' has mismatched multipole counts across fields.",
                    dir.display()
                ),
            ));
        }
    }

    let spectra: Vec<TheorySpectrum> = tt
        .into_iter()
        .zip(te)
        .zip(ee)
        .map(|((tt, te), ee)| TheorySpectrum { tt, te, ee })
        .collect();

    let table = TheoryCurveTable::new(taus, spectra).map_err(AppError::from)?;
    Ok(Some(table))
}

/// Write `table` to `dir`, creating the directory if needed.
pub fn save_table(dir: &Path, table: &TheoryCurveTable) -> Result<(), AppError> {
    fs::create_dir_all(dir)
        .map_err(|e| AppError::new(2, format!("Failed to create cache dir '{}': {e}", dir.display())))?;

    write_column(&dir.join(TAUS_FILE), table.taus())?;
    for (file, field) in FIELD_FILES.iter().zip([field_tt, field_te, field_ee]) {
        let rows: Vec<&[f64]> = (0..table.len())
            .map(|i| field(table.spectrum(i)))
            .collect();
        write_rows(&dir.join(file), &rows)?;
    }
    Ok(())
}

fn field_tt(s: &TheorySpectrum) -> &[f64] {
    &s.tt
}
fn field_te(s: &TheorySpectrum) -> &[f64] {
    &s.te
}
fn field_ee(s: &TheorySpectrum) -> &[f64] {
    &s.ee
}

fn read_column(path: &Path) -> Result<Vec<f64>, AppError> {
    let text = fs::read_to_string(path)
        .map_err(|e| AppError::new(2, format!("Failed to read cache '{}': {e}", path.display())))?;
    text.split_whitespace()
        .map(|tok| parse_value(tok, path))
        .collect()
}

fn read_rows(path: &Path) -> Result<Vec<Vec<f64>>, AppError> {
    let text = fs::read_to_string(path)
        .map_err(|e| AppError::new(2, format!("Failed to read cache '{}': {e}", path.display())))?;
    let mut rows = Vec::new();
    for line in text.lines() {
        if line.trim().is_empty() {
            continue;
        }
        let row: Vec<f64> = line
            .split_whitespace()
            .map(|tok| parse_value(tok, path))
            .collect::<Result<_, _>>()?;
        rows.push(row);
    }
    // Ragged rows mean a corrupt cache.
    if let Some(first) = rows.first() {
        let len = first.len();
        if rows.iter().any(|r| r.len() != len) {
            return Err(AppError::new(
                2,
                format!("Cache '{}' has rows of differing length.", path.display()),
            ));
        }
    }
    Ok(rows)
}

fn parse_value(tok: &str, path: &Path) -> Result<f64, AppError> {
    tok.parse::<f64>().map_err(|e| {
        AppError::new(
            2,
            format!("Invalid value '{tok}' in cache '{}': {e}", path.display()),
        )
    })
}

fn write_column(path: &Path, values: &[f64]) -> Result<(), AppError> {
    let mut file = create(path)?;
    for v in values {
        writeln!(file, "{v:.18e}").map_err(|e| write_err(path, e))?;
    }
    Ok(())
}

fn write_rows(path: &Path, rows: &[&[f64]]) -> Result<(), AppError> {
    let mut file = create(path)?;
    for row in rows {
        let line: Vec<String> = row.iter().map(|v| format!("{v:.18e}")).collect();
        writeln!(file, "{}", line.join(" ")).map_err(|e| write_err(path, e))?;
    }
    Ok(())
}

fn create(path: &Path) -> Result<File, AppError> {
    File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create cache '{}': {e}", path.display())))
}

fn write_err(path: &Path, e: std::io::Error) -> AppError {
    AppError::new(2, format!("Failed to write cache '{}': {e}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theory::provider::build_table;
    use crate::theory::{lin_space, ToyBoltzmann};

    fn temp_dir(tag: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("cmbtau_cache_{tag}_{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn round_trip_preserves_table() {
        let dir = temp_dir("roundtrip");
        let taus = lin_space(0.04, 0.08, 5).unwrap();
        let table = build_table(&ToyBoltzmann, &taus, 12).unwrap();

        save_table(&dir, &table).unwrap();
        let loaded = load_table(&dir).unwrap().expect("cache hit expected");

        assert_eq!(loaded.taus(), table.taus());
        for i in 0..table.len() {
            assert_eq!(loaded.spectrum(i), table.spectrum(i));
        }
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn missing_files_are_a_cache_miss_not_an_error() {
        let dir = temp_dir("miss");
        assert!(load_table(&dir).unwrap().is_none());

        // A partial cache is still a miss.
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("taus.txt"), "0.06\n").unwrap();
        assert!(load_table(&dir).unwrap().is_none());
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn corrupt_cache_is_an_error() {
        let dir = temp_dir("corrupt");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("taus.txt"), "0.04\n0.06\n").unwrap();
        fs::write(dir.join("tt.txt"), "1.0 2.0\n3.0 4.0\n").unwrap();
        fs::write(dir.join("te.txt"), "1.0 2.0\n3.0 4.0\n").unwrap();
        fs::write(dir.join("ee.txt"), "1.0 not_a_number\n3.0 4.0\n").unwrap();
        assert!(load_table(&dir).is_err());
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn row_count_mismatch_is_an_error() {
        let dir = temp_dir("rows");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("taus.txt"), "0.04\n0.06\n").unwrap();
        fs::write(dir.join("tt.txt"), "1.0 2.0\n").unwrap();
        fs::write(dir.join("te.txt"), "1.0 2.0\n3.0 4.0\n").unwrap();
        fs::write(dir.join("ee.txt"), "1.0 2.0\n3.0 4.0\n").unwrap();
        assert!(load_table(&dir).is_err());
        let _ = fs::remove_dir_all(&dir);
    }
}
