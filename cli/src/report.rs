//! Batch evaluation of form snapshots into report rows
//!
//! Supports two formats on both ends:
//! - JSON: an array of snapshots in, pretty-printed rows out
//! - CSV: one snapshot per line with a header row, blank cells unset

use crate::config::{ReportConfig, ReportFormat};
use body_metrics_shared::{evaluate, CalendarDate, FormReport, FormSnapshot};
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Separator for list-valued cells
pub const LIST_SEPARATOR: &str = "; ";

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Failed to read input: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid CSV record {row}: {source}")]
    CsvRecord { row: usize, source: csv::Error },

    #[error("CSV serialization error: {0}")]
    CsvWrite(#[from] csv::Error),

    #[error("Invalid JSON input: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV encoding error: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}

/// One evaluated input row, flattened for spreadsheets
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportRow {
    pub row: usize,
    pub age: Option<String>,
    pub age_years: Option<u32>,
    pub bmi: Option<String>,
    pub bmi_category: Option<String>,
    pub frame_index: Option<String>,
    pub frame_category: Option<String>,
    pub waist_hip_ratio: Option<String>,
    pub body_shape: Option<String>,
    pub body_fat_percent: Option<String>,
    pub body_fat_category: Option<String>,
    pub missing_fields: Option<String>,
    pub errors: Option<String>,
}

impl ReportRow {
    pub fn from_report(row: usize, report: &FormReport, include_missing_fields: bool) -> Self {
        let join = |items: &[String]| (!items.is_empty()).then(|| items.join(LIST_SEPARATOR));

        Self {
            row,
            age: report.age.as_ref().map(|a| a.display.clone()),
            age_years: report.age.as_ref().map(|a| a.years),
            bmi: report.bmi.as_ref().map(|m| m.display.clone()),
            bmi_category: report.bmi.as_ref().map(|m| m.category.clone()),
            frame_index: report.frame.as_ref().map(|m| m.display.clone()),
            frame_category: report.frame.as_ref().map(|m| m.category.clone()),
            waist_hip_ratio: report.waist_hip.as_ref().map(|m| m.display.clone()),
            body_shape: report.waist_hip.as_ref().map(|m| m.category.clone()),
            body_fat_percent: report.body_fat.as_ref().map(|m| m.display.clone()),
            body_fat_category: report.body_fat.as_ref().map(|m| m.category.clone()),
            missing_fields: if include_missing_fields {
                join(&report.missing_fields)
            } else {
                None
            },
            errors: join(&report.errors),
        }
    }
}

// ============================================================================
// Input
// ============================================================================

/// Input format implied by a file extension; anything but `.json` is CSV
pub fn format_for_path(path: &Path) -> ReportFormat {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => ReportFormat::Json,
        _ => ReportFormat::Csv,
    }
}

/// Read snapshots from a reader in the given format
pub fn read_snapshots<R: Read>(reader: R, format: ReportFormat) -> Result<Vec<FormSnapshot>, ReportError> {
    match format {
        ReportFormat::Json => Ok(serde_json::from_reader(reader)?),
        ReportFormat::Csv => {
            let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
            rdr.deserialize()
                .enumerate()
                .map(|(index, record)| {
                    record.map_err(|source| ReportError::CsvRecord { row: index + 1, source })
                })
                .collect()
        }
    }
}

pub fn read_snapshots_from_path(path: &Path) -> Result<Vec<FormSnapshot>, ReportError> {
    let file = std::fs::File::open(path)?;
    let snapshots = read_snapshots(std::io::BufReader::new(file), format_for_path(path))?;
    info!(path = %path.display(), rows = snapshots.len(), "Loaded form snapshots");
    Ok(snapshots)
}

// ============================================================================
// Evaluation
// ============================================================================

/// Fill the measurement date of rows that left all three components blank
pub fn apply_reference_date(snapshot: &mut FormSnapshot, date: CalendarDate) -> bool {
    let parts = snapshot.reference_date();
    if parts.year.is_none() && parts.month.is_none() && parts.day.is_none() {
        snapshot.set_reference_date(date.into());
        true
    } else {
        false
    }
}

/// Evaluate every snapshot into a report row
pub fn evaluate_rows(
    snapshots: Vec<FormSnapshot>,
    reference_date: CalendarDate,
    config: &ReportConfig,
) -> Vec<ReportRow> {
    snapshots
        .into_iter()
        .enumerate()
        .map(|(index, mut snapshot)| {
            let row = index + 1;
            if apply_reference_date(&mut snapshot, reference_date) {
                debug!(row, %reference_date, "Applied default reference date");
            }
            let report = evaluate(&snapshot);
            if !report.errors.is_empty() {
                warn!(row, errors = ?report.errors, "Row has invalid input");
            }
            ReportRow::from_report(row, &report, config.include_missing_fields)
        })
        .collect()
}

// ============================================================================
// Output
// ============================================================================

/// Convert data to CSV string
pub fn to_csv<T: Serialize>(data: &[T]) -> Result<String, ReportError> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    for record in data {
        wtr.serialize(record)?;
    }
    let bytes = wtr
        .into_inner()
        .map_err(|e| ReportError::Io(e.into_error()))?;
    Ok(String::from_utf8(bytes)?)
}

pub fn render(rows: &[ReportRow], format: ReportFormat) -> Result<String, ReportError> {
    match format {
        ReportFormat::Csv => to_csv(rows),
        ReportFormat::Json => Ok(serde_json::to_string_pretty(rows)?),
    }
}
