use super::series::NormalizedSeries;
use crate::common::{ExecutionMode, PipelineConfig};
use crate::domain::{DensityRow, DensityTable, EnergyRecord};
use crate::numerics::linspace;
use rayon::prelude::*;
use tracing::info;

/// Normalized density of every record sampled on a uniform grid over `[-1, 1]`.
pub fn tabulate_density(records: &[EnergyRecord], config: &PipelineConfig) -> DensityTable {
    let grid = linspace(-1.0, 1.0, config.density_grid_points);
    info!(
        records = records.len(),
        points = grid.len(),
        "tabulating angular density"
    );

    let sample = |record: &EnergyRecord| {
        let density = NormalizedSeries::from_record(record);
        let values = grid.iter().map(|mu| density.density(*mu)).collect();
        DensityRow::new(record.energy(), values)
    };

    let rows: Vec<DensityRow> = match config.execution_mode {
        ExecutionMode::Serial => records.iter().map(sample).collect(),
        ExecutionMode::Parallel => records.par_iter().map(sample).collect(),
    };
    DensityTable::from_rows(rows)
}
