//! Export of simulation artifacts to CSV and JSON files.

use crate::report::RiskReport;
use ndarray::ArrayView2;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during export operations.
#[derive(Debug, Error)]
pub enum ExportError {
    /// CSV serialization error.
    #[error("CSV serialization error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Serialize a day-by-path value matrix to CSV.
///
/// One row per day with a leading `day` column (1-based), one `path_k`
/// column per path.
///
/// # Errors
/// Returns [`ExportError::Csv`] if writing a record fails.
pub fn paths_to_csv_string(paths: ArrayView2<'_, f64>) -> Result<String, ExportError> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    let mut header = Vec::with_capacity(paths.ncols() + 1);
    header.push("day".to_string());
    for k in 1..=paths.ncols() {
        header.push(format!("path_{k}"));
    }
    wtr.write_record(&header)?;

    for (day, row) in paths.rows().into_iter().enumerate() {
        let mut record = Vec::with_capacity(paths.ncols() + 1);
        record.push((day + 1).to_string());
        for value in row {
            record.push(value.to_string());
        }
        wtr.write_record(&record)?;
    }

    let bytes = wtr.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Write a day-by-path value matrix to a CSV file.
///
/// # Errors
/// Returns [`ExportError::Csv`] on serialization failure or
/// [`ExportError::Io`] on file failure.
pub fn write_paths_csv(path: &Path, paths: ArrayView2<'_, f64>) -> Result<(), ExportError> {
    let content = paths_to_csv_string(paths)?;
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}

/// Write a risk report to a pretty-printed JSON file.
///
/// # Errors
/// Returns [`ExportError::Json`] on serialization failure or
/// [`ExportError::Io`] on file failure.
pub fn write_report_json(path: &Path, report: &RiskReport) -> Result<(), ExportError> {
    let content = serde_json::to_string_pretty(report)?;
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}
