//! Lookups a transport code performs against the generated tables.
//!
//! Both lookups pick the row whose energy is nearest the query. Queries past
//! either end use the edge row, and a query exactly halfway between two rows
//! takes the upper one.

use crate::domain::{AngdistError, BinTable, BinTableRow, DensityTable};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SamplingError {
    #[error("lookup table has no rows")]
    EmptyTable,
    #[error("row {row}: energy {energy:e} does not exceed the previous row energy {previous:e}")]
    UnsortedEnergies { row: usize, previous: f64, energy: f64 },
    #[error("row {row}: expected {expected} values after the energy, found {found}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("energy {energy} must be finite")]
    InvalidEnergy { energy: f64 },
    #[error("probability {probability} is outside [0, 1]")]
    ProbabilityOutOfRange { probability: f64 },
    #[error("cosine {mu} is outside [-1, 1]")]
    CosineOutOfRange { mu: f64 },
}

impl From<SamplingError> for AngdistError {
    fn from(error: SamplingError) -> Self {
        let placeholder = match &error {
            SamplingError::EmptyTable
            | SamplingError::UnsortedEnergies { .. }
            | SamplingError::RaggedRow { .. } => "INPUT.LOOKUP_TABLE",
            SamplingError::InvalidEnergy { .. }
            | SamplingError::ProbabilityOutOfRange { .. }
            | SamplingError::CosineOutOfRange { .. } => "INPUT.LOOKUP_QUERY",
        };
        AngdistError::input_validation(placeholder, error.to_string())
    }
}

/// Checks ascending energies and a common row width; returns that width.
fn check_rows(
    rows: impl Iterator<Item = (f64, usize)>,
    minimum_width: usize,
) -> Result<usize, SamplingError> {
    let mut width = None;
    let mut previous: Option<f64> = None;
    for (row, (energy, found)) in rows.enumerate() {
        check_energy(energy)?;
        if let Some(previous) = previous
            && energy <= previous
        {
            return Err(SamplingError::UnsortedEnergies {
                row,
                previous,
                energy,
            });
        }
        previous = Some(energy);

        let expected = *width.get_or_insert(found.max(minimum_width));
        if found != expected {
            return Err(SamplingError::RaggedRow {
                row,
                expected,
                found,
            });
        }
    }
    width.ok_or(SamplingError::EmptyTable)
}

/// Index of the row nearest `energy` in ascending `energies` (non-empty).
fn closest_index(energies: &[f64], energy: f64) -> usize {
    let upper = energies.partition_point(|candidate| *candidate < energy);
    if upper == energies.len() {
        return energies.len() - 1;
    }
    if upper == 0 {
        return 0;
    }
    if energy - energies[upper - 1] < energies[upper] - energy {
        upper - 1
    } else {
        upper
    }
}

fn check_energy(energy: f64) -> Result<(), SamplingError> {
    if energy.is_finite() {
        Ok(())
    } else {
        Err(SamplingError::InvalidEnergy { energy })
    }
}

/// Maps a uniform deviate to a scattering cosine through a bin table.
#[derive(Debug, Clone, PartialEq)]
pub struct InverseCdfSampler {
    table: BinTable,
    energies: Vec<f64>,
    bin_count: usize,
}

impl InverseCdfSampler {
    pub fn new(table: BinTable) -> Result<Self, SamplingError> {
        let boundaries = check_rows(
            table
                .rows()
                .iter()
                .map(|row| (row.energy(), row.boundaries().len())),
            2,
        )?;
        let energies = table.energies();
        Ok(Self {
            table,
            energies,
            bin_count: boundaries - 1,
        })
    }

    pub fn bin_count(&self) -> usize {
        self.bin_count
    }

    pub fn closest_row(&self, energy: f64) -> Result<&BinTableRow, SamplingError> {
        check_energy(energy)?;
        Ok(&self.table.rows()[closest_index(&self.energies, energy)])
    }

    /// Lower boundary of the bin containing `probability`: `mu_{floor(p * n)}`.
    pub fn cosine(&self, energy: f64, probability: f64) -> Result<f64, SamplingError> {
        let (row, index, _) = self.locate(energy, probability)?;
        Ok(row.boundaries()[index])
    }

    /// Linear interpolation between the boundaries around `probability`.
    pub fn interpolated_cosine(&self, energy: f64, probability: f64) -> Result<f64, SamplingError> {
        let (row, index, position) = self.locate(energy, probability)?;
        let boundaries = row.boundaries();
        if index == self.bin_count {
            return Ok(boundaries[index]);
        }
        let fraction = position - index as f64;
        Ok(boundaries[index] + (boundaries[index + 1] - boundaries[index]) * fraction)
    }

    fn locate(
        &self,
        energy: f64,
        probability: f64,
    ) -> Result<(&BinTableRow, usize, f64), SamplingError> {
        if !(0.0..=1.0).contains(&probability) {
            return Err(SamplingError::ProbabilityOutOfRange { probability });
        }
        let row = self.closest_row(energy)?;
        let position = probability * self.bin_count as f64;
        let index = (position.floor() as usize).min(self.bin_count);
        Ok((row, index, position))
    }
}

/// Density value at a cosine from a uniformly gridded density table.
#[derive(Debug, Clone, PartialEq)]
pub struct DensityLookup {
    table: DensityTable,
    energies: Vec<f64>,
    points: usize,
}

impl DensityLookup {
    pub fn new(table: DensityTable) -> Result<Self, SamplingError> {
        let points = check_rows(
            table
                .rows()
                .iter()
                .map(|row| (row.energy(), row.values().len())),
            1,
        )?;
        let energies = table.rows().iter().map(|row| row.energy()).collect();
        Ok(Self {
            table,
            energies,
            points,
        })
    }

    /// Value of the grid cell `floor((mu + 1) / width)` at the nearest energy.
    pub fn density(&self, energy: f64, mu: f64) -> Result<f64, SamplingError> {
        check_energy(energy)?;
        if !(-1.0..=1.0).contains(&mu) {
            return Err(SamplingError::CosineOutOfRange { mu });
        }
        let row = &self.table.rows()[closest_index(&self.energies, energy)];
        let cell_width = 2.0 / self.points as f64;
        let index = (((mu + 1.0) / cell_width).floor() as usize).min(self.points - 1);
        Ok(row.values()[index])
    }
}

#[cfg(test)]
mod tests {
    use super::{DensityLookup, InverseCdfSampler, SamplingError, closest_index};
    use crate::domain::{
        AngdistError, BinTable, BinTableRow, DensityRow, DensityTable, ErrorCategory,
    };

    fn uniform_row(energy: f64) -> BinTableRow {
        BinTableRow::new(
            energy,
            (0..=100).map(|k| 2.0 * k as f64 / 100.0 - 1.0).collect(),
        )
    }

    fn forward_row(energy: f64) -> BinTableRow {
        BinTableRow::new(
            energy,
            (0..=100)
                .map(|k| 2.0 * (k as f64 / 100.0).sqrt() - 1.0)
                .collect(),
        )
    }

    fn sampler() -> InverseCdfSampler {
        InverseCdfSampler::new(BinTable::from_rows(vec![
            uniform_row(1.0e5),
            uniform_row(1.0e6),
            forward_row(1.0e7),
        ]))
        .expect("sampler")
    }

    #[test]
    fn closest_index_prefers_upper_row_on_ties() {
        let energies = [1.0, 3.0, 7.0];
        assert_eq!(closest_index(&energies, 0.5), 0);
        assert_eq!(closest_index(&energies, 1.9), 0);
        assert_eq!(closest_index(&energies, 2.0), 1);
        assert_eq!(closest_index(&energies, 3.0), 1);
        assert_eq!(closest_index(&energies, 6.5), 2);
        assert_eq!(closest_index(&energies, 100.0), 2);
    }

    #[test]
    fn step_lookup_returns_lower_bin_boundary() {
        let sampler = sampler();
        assert_eq!(sampler.bin_count(), 100);
        assert_eq!(sampler.cosine(2.0e5, 0.0).expect("p=0"), -1.0);
        assert!((sampler.cosine(2.0e5, 0.255).expect("p") - (-0.5)).abs() < 1.0e-15);
        assert_eq!(sampler.cosine(2.0e5, 1.0).expect("p=1"), 1.0);
    }

    #[test]
    fn interpolated_lookup_is_linear_within_a_bin() {
        let sampler = sampler();
        let mu = sampler.interpolated_cosine(2.0e5, 0.255).expect("p");
        assert!((mu - (-0.49)).abs() < 1.0e-12, "mu={mu}");
        assert_eq!(sampler.interpolated_cosine(2.0e5, 1.0).expect("p=1"), 1.0);
    }

    #[test]
    fn far_energies_use_the_edge_rows() {
        let sampler = sampler();
        assert_eq!(sampler.closest_row(1.0).expect("low").energy(), 1.0e5);
        assert_eq!(sampler.closest_row(1.0e9).expect("high").energy(), 1.0e7);
        assert_eq!(sampler.closest_row(5.5e6).expect("tie").energy(), 1.0e7);
    }

    #[test]
    fn bad_tables_and_queries_are_rejected() {
        let error = InverseCdfSampler::new(BinTable::from_rows(vec![
            uniform_row(2.0),
            uniform_row(1.0),
        ]))
        .expect_err("descending");
        assert!(matches!(error, SamplingError::UnsortedEnergies { row: 1, .. }));

        let error = InverseCdfSampler::new(BinTable::from_rows(Vec::new())).expect_err("empty");
        assert_eq!(error, SamplingError::EmptyTable);

        let error = sampler().cosine(1.0e6, 1.5).expect_err("p > 1");
        let converted = AngdistError::from(error);
        assert_eq!(converted.category(), ErrorCategory::InputValidationError);
        assert_eq!(converted.placeholder(), "INPUT.LOOKUP_QUERY");
    }

    #[test]
    fn density_lookup_reads_grid_cells() {
        let values: Vec<f64> = (0..100).map(|index| index as f64).collect();
        let lookup = DensityLookup::new(DensityTable::from_rows(vec![
            DensityRow::new(1.0, vec![0.5; 100]),
            DensityRow::new(2.0, values),
        ]))
        .expect("lookup");

        assert_eq!(lookup.density(1.2, 0.3).expect("low row"), 0.5);
        assert_eq!(lookup.density(2.0, -1.0).expect("first cell"), 0.0);
        assert_eq!(lookup.density(2.0, 0.01).expect("middle"), 50.0);
        assert_eq!(lookup.density(2.0, 1.0).expect("last cell"), 99.0);
        assert!(matches!(
            lookup.density(2.0, 1.5),
            Err(SamplingError::CosineOutOfRange { .. })
        ));
    }
}
