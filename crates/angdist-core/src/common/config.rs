//! Pipeline configuration shared by the table builder, the validator and the
//! density tabulator.

use super::constants::{
    DEFAULT_BIN_COUNT, DEFAULT_DENSITY_GRID_POINTS, DEFAULT_EPSILON, DEFAULT_HEADER_LINES,
    DEFAULT_MAX_ORDER, DEFAULT_MAX_RECORDS, ROOT_DOMAIN_LIMIT, ROOT_IMAGINARY_TOLERANCE,
};
use crate::domain::{AngdistError, AngdistResult};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ExecutionMode {
    Serial,
    #[default]
    Parallel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ValidationStrictness {
    /// Stop at the first violation and return it as an error.
    #[default]
    AbortOnFirst,
    /// Check every row and collect all violations into the report.
    Exhaustive,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineConfig {
    pub max_order: usize,
    pub header_lines: usize,
    pub max_records: usize,
    pub bin_count: usize,
    pub epsilon: f64,
    pub root_imaginary_tolerance: f64,
    pub root_domain_limit: f64,
    pub density_grid_points: usize,
    pub execution_mode: ExecutionMode,
    pub strictness: ValidationStrictness,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_order: DEFAULT_MAX_ORDER,
            header_lines: DEFAULT_HEADER_LINES,
            max_records: DEFAULT_MAX_RECORDS,
            bin_count: DEFAULT_BIN_COUNT,
            epsilon: DEFAULT_EPSILON,
            root_imaginary_tolerance: ROOT_IMAGINARY_TOLERANCE,
            root_domain_limit: ROOT_DOMAIN_LIMIT,
            density_grid_points: DEFAULT_DENSITY_GRID_POINTS,
            execution_mode: ExecutionMode::default(),
            strictness: ValidationStrictness::default(),
        }
    }
}

impl PipelineConfig {
    pub fn with_max_order(mut self, max_order: usize) -> Self {
        self.max_order = max_order;
        self
    }

    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    pub fn with_execution_mode(mut self, execution_mode: ExecutionMode) -> Self {
        self.execution_mode = execution_mode;
        self
    }

    pub fn with_strictness(mut self, strictness: ValidationStrictness) -> Self {
        self.strictness = strictness;
        self
    }

    /// Coefficients per record including the implicit order-0 term.
    pub fn coefficient_count(&self) -> usize {
        self.max_order + 1
    }

    /// Values per bin-table row: energy plus `bin_count + 1` boundaries.
    pub fn row_width(&self) -> usize {
        self.bin_count + 2
    }

    pub fn validate(&self) -> AngdistResult<()> {
        if self.max_order == 0 {
            return Err(AngdistError::input_validation(
                "INPUT.CONFIG",
                "max order must be at least 1",
            ));
        }
        if self.bin_count < 2 {
            return Err(AngdistError::input_validation(
                "INPUT.CONFIG",
                format!("bin count must be at least 2, got {}", self.bin_count),
            ));
        }
        if self.max_records == 0 {
            return Err(AngdistError::input_validation(
                "INPUT.CONFIG",
                "max record count must be at least 1",
            ));
        }
        if self.density_grid_points < 2 {
            return Err(AngdistError::input_validation(
                "INPUT.CONFIG",
                format!(
                    "density grid needs at least 2 points, got {}",
                    self.density_grid_points
                ),
            ));
        }

        for (field, value) in [
            ("epsilon", self.epsilon),
            ("root imaginary tolerance", self.root_imaginary_tolerance),
            ("root domain limit", self.root_domain_limit),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(AngdistError::input_validation(
                    "INPUT.CONFIG",
                    format!("{field} must be finite and > 0, got {value}"),
                ));
            }
        }

        Ok(())
    }
}
