//! Checks a persisted bin table against the records it was built from.
//!
//! Rows are visited in order. Per row the shape is checked first (width and
//! energy), then each boundary `mu_b`, `b = 1..=bin_count`, for ordering,
//! range and `|CDF(mu_b) - b / bin_count| <= epsilon` with the CDF rebuilt
//! from the source coefficients.

use super::series::CdfSeries;
use crate::common::constants::ENERGY_MATCH_RELATIVE_TOLERANCE;
use crate::common::{PipelineConfig, ValidationStrictness};
use crate::domain::{AngdistError, BinTable, BinTableRow, EnergyRecord};
use serde::Serialize;
use tracing::{info, warn};

/// `row` is the 0-based energy index; `column` counts from the energy
/// column, so `mu_b` sits in column `b + 1`.
#[derive(Debug, Clone, PartialEq, Serialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ValidationError {
    #[error("table has {rows} rows but the input has {records} energy records")]
    RowCount { rows: usize, records: usize },
    #[error("row {row}: expected {expected} values, found {found}")]
    RowWidth {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("row {row}: table energy {table_energy:e} does not match record energy {record_energy:e}")]
    EnergyMismatch {
        row: usize,
        table_energy: f64,
        record_energy: f64,
    },
    #[error("row {row}, column {column}: {value} does not exceed the previous boundary {previous}")]
    Monotonicity {
        row: usize,
        column: usize,
        previous: f64,
        value: f64,
    },
    #[error("row {row}, column {column}: {value} is outside |mu| < {limit}")]
    Domain {
        row: usize,
        column: usize,
        value: f64,
        limit: f64,
    },
    #[error(
        "row {row}, column {column}: |CDF({value}) - {target}| = {error:e} exceeds {epsilon:e} (max error so far {max_error:e})"
    )]
    Precision {
        row: usize,
        column: usize,
        value: f64,
        target: f64,
        error: f64,
        epsilon: f64,
        max_error: f64,
    },
}

impl ValidationError {
    pub fn placeholder(&self) -> &'static str {
        match self {
            Self::RowCount { .. } => "INPUT.TABLE_ROWS",
            Self::RowWidth { .. } => "INPUT.TABLE_WIDTH",
            Self::EnergyMismatch { .. } => "INPUT.TABLE_ENERGY",
            Self::Monotonicity { .. } => "RUN.MONOTONICITY",
            Self::Domain { .. } => "RUN.DOMAIN",
            Self::Precision { .. } => "RUN.PRECISION",
        }
    }
}

impl From<ValidationError> for AngdistError {
    fn from(error: ValidationError) -> Self {
        let placeholder = error.placeholder();
        match error {
            ValidationError::RowCount { .. }
            | ValidationError::RowWidth { .. }
            | ValidationError::EnergyMismatch { .. } => {
                AngdistError::input_validation(placeholder, error.to_string())
            }
            _ => AngdistError::computation(placeholder, error.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub rows_checked: usize,
    pub values_checked: usize,
    pub max_error: f64,
    pub epsilon: f64,
    pub strictness: ValidationStrictness,
    pub passed: bool,
    pub violations: Vec<ValidationError>,
}

impl ValidationReport {
    fn new(config: &PipelineConfig) -> Self {
        Self {
            rows_checked: 0,
            values_checked: 0,
            max_error: 0.0,
            epsilon: config.epsilon,
            strictness: config.strictness,
            passed: true,
            violations: Vec::new(),
        }
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Aborts in [`ValidationStrictness::AbortOnFirst`], collects otherwise.
    fn record(&mut self, violation: ValidationError) -> Result<(), ValidationError> {
        warn!(placeholder = violation.placeholder(), "{violation}");
        self.passed = false;
        match self.strictness {
            ValidationStrictness::AbortOnFirst => Err(violation),
            ValidationStrictness::Exhaustive => {
                self.violations.push(violation);
                Ok(())
            }
        }
    }
}

fn energies_match(table_energy: f64, record_energy: f64) -> bool {
    let scale = record_energy.abs().max(f64::MIN_POSITIVE);
    (table_energy - record_energy).abs() <= ENERGY_MATCH_RELATIVE_TOLERANCE * scale
}

/// Returns `false` when the row is too malformed for value checks.
fn check_row_shape(
    report: &mut ValidationReport,
    index: usize,
    row: &BinTableRow,
    record: &EnergyRecord,
    config: &PipelineConfig,
) -> Result<bool, ValidationError> {
    let found = row.boundaries().len() + 1;
    if found != config.row_width() {
        report.record(ValidationError::RowWidth {
            row: index,
            expected: config.row_width(),
            found,
        })?;
        return Ok(false);
    }
    if !energies_match(row.energy(), record.energy()) {
        report.record(ValidationError::EnergyMismatch {
            row: index,
            table_energy: row.energy(),
            record_energy: record.energy(),
        })?;
        return Ok(false);
    }
    Ok(true)
}

fn check_row_values(
    report: &mut ValidationReport,
    index: usize,
    row: &BinTableRow,
    record: &EnergyRecord,
    config: &PipelineConfig,
) -> Result<(), ValidationError> {
    let cdf = CdfSeries::from_record(record);
    let boundaries = row.boundaries();

    if boundaries[0].abs() >= config.root_domain_limit {
        report.record(ValidationError::Domain {
            row: index,
            column: 1,
            value: boundaries[0],
            limit: config.root_domain_limit,
        })?;
    }

    for boundary in 1..boundaries.len() {
        let column = boundary + 1;
        let previous = boundaries[boundary - 1];
        let value = boundaries[boundary];

        if previous >= value {
            report.record(ValidationError::Monotonicity {
                row: index,
                column,
                previous,
                value,
            })?;
        }
        if value.abs() >= config.root_domain_limit {
            report.record(ValidationError::Domain {
                row: index,
                column,
                value,
                limit: config.root_domain_limit,
            })?;
        }

        let target = boundary as f64 / config.bin_count as f64;
        let error = (cdf.evaluate(value) - target).abs();
        report.values_checked += 1;
        report.max_error = report.max_error.max(error);
        if error.is_nan() || error > config.epsilon {
            let max_error = report.max_error;
            report.record(ValidationError::Precision {
                row: index,
                column,
                value,
                target,
                error,
                epsilon: config.epsilon,
                max_error,
            })?;
        }
    }
    Ok(())
}

/// Validates `table` against `records` under `config.strictness`.
///
/// In abort-on-first mode the first violation is returned as the error; in
/// exhaustive mode every violation lands in the report and `passed` is false
/// when any exist.
pub fn validate_bin_table(
    table: &BinTable,
    records: &[EnergyRecord],
    config: &PipelineConfig,
) -> Result<ValidationReport, ValidationError> {
    let mut report = ValidationReport::new(config);

    if table.len() != records.len() {
        report.record(ValidationError::RowCount {
            rows: table.len(),
            records: records.len(),
        })?;
    }

    for (index, (row, record)) in table.rows().iter().zip(records).enumerate() {
        report.rows_checked += 1;
        if check_row_shape(&mut report, index, row, record, config)? {
            check_row_values(&mut report, index, row, record, config)?;
        }
    }

    info!(
        rows = report.rows_checked,
        values = report.values_checked,
        max_error = report.max_error,
        violations = report.violations.len(),
        "validated bin table"
    );
    Ok(report)
}
