//! Equal-probability bin boundaries.
//!
//! For every record the CDF is levelled at `p_k = k / bin_count` and the
//! single admissible real root of `CDF(mu) - p_k` becomes `mu_k`. The row is
//! closed with the exact endpoints `-1.0` and `1.0`.

use super::series::CdfSeries;
use super::traits::{CompanionRootFinder, RootFinder};
use crate::common::{ExecutionMode, PipelineConfig};
use crate::domain::{AngdistError, BinTable, BinTableRow, EnergyRecord};
use crate::numerics::{EigenError, LegendreSeries};
use rayon::prelude::*;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RootSolveError {
    #[error(
        "energy index {energy_index} ({energy:e} eV), bin {bin_index}: found {count} admissible roots, expected exactly one"
    )]
    RootCount {
        energy_index: usize,
        energy: f64,
        bin_index: usize,
        count: usize,
    },
    #[error("energy index {energy_index} ({energy:e} eV), bin {bin_index}: {source}")]
    Eigen {
        energy_index: usize,
        energy: f64,
        bin_index: usize,
        #[source]
        source: EigenError,
    },
}

impl From<RootSolveError> for AngdistError {
    fn from(error: RootSolveError) -> Self {
        let placeholder = match &error {
            RootSolveError::RootCount { .. } => "RUN.ROOT_COUNT",
            RootSolveError::Eigen { .. } => "RUN.EIGEN",
        };
        AngdistError::computation(placeholder, error.to_string())
    }
}

/// Real parts of the roots that count as lying on `[-1, 1]`.
fn admissible_roots(
    finder: &impl RootFinder,
    level_set: &LegendreSeries,
    config: &PipelineConfig,
) -> Result<Vec<f64>, EigenError> {
    Ok(finder
        .roots(level_set)?
        .into_iter()
        .filter(|root| {
            root.im.abs() < config.root_imaginary_tolerance
                && root.re.abs() < config.root_domain_limit
        })
        .map(|root| root.re)
        .collect())
}

/// Boundary row `[-1, mu_1, ..., mu_{n-1}, 1]` for one record.
pub fn solve_record(
    record: &EnergyRecord,
    energy_index: usize,
    config: &PipelineConfig,
) -> Result<BinTableRow, RootSolveError> {
    solve_record_with(&CompanionRootFinder, record, energy_index, config)
}

pub fn solve_record_with(
    finder: &impl RootFinder,
    record: &EnergyRecord,
    energy_index: usize,
    config: &PipelineConfig,
) -> Result<BinTableRow, RootSolveError> {
    let cdf = CdfSeries::from_record(record);
    let energy = record.energy();

    let mut boundaries = Vec::with_capacity(config.bin_count + 1);
    boundaries.push(-1.0);
    for bin_index in 1..config.bin_count {
        let probability = bin_index as f64 / config.bin_count as f64;
        let roots = admissible_roots(finder, &cdf.level_set(probability), config).map_err(
            |source| RootSolveError::Eigen {
                energy_index,
                energy,
                bin_index,
                source,
            },
        )?;

        match roots.as_slice() {
            [mu] => boundaries.push(*mu),
            _ => {
                return Err(RootSolveError::RootCount {
                    energy_index,
                    energy,
                    bin_index,
                    count: roots.len(),
                });
            }
        }
    }
    boundaries.push(1.0);

    Ok(BinTableRow::new(energy, boundaries))
}

/// One boundary row per record, in record order.
pub fn build_bin_table(
    records: &[EnergyRecord],
    config: &PipelineConfig,
) -> Result<BinTable, RootSolveError> {
    build_bin_table_with(&CompanionRootFinder, records, config)
}

/// Like [`build_bin_table`] with a caller-supplied root finder.
///
/// In parallel mode rows are still returned in record order and the error
/// reported is the one with the lowest energy index.
pub fn build_bin_table_with<F>(
    finder: &F,
    records: &[EnergyRecord],
    config: &PipelineConfig,
) -> Result<BinTable, RootSolveError>
where
    F: RootFinder + Sync,
{
    info!(
        records = records.len(),
        bins = config.bin_count,
        mode = ?config.execution_mode,
        "building equal-probability bin table"
    );

    let solve = |(energy_index, record): (usize, &EnergyRecord)| {
        if energy_index % 100 == 0 {
            debug!(energy_index, energy = record.energy(), "solving bin boundaries");
        }
        solve_record_with(finder, record, energy_index, config)
    };

    let rows = match config.execution_mode {
        ExecutionMode::Serial => records
            .iter()
            .enumerate()
            .map(solve)
            .collect::<Result<Vec<_>, _>>()?,
        ExecutionMode::Parallel => records
            .par_iter()
            .enumerate()
            .map(solve)
            .collect::<Vec<_>>()
            .into_iter()
            .collect::<Result<Vec<_>, _>>()?,
    };

    Ok(BinTable::from_rows(rows))
}
