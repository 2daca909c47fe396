pub mod errors;

pub use errors::{AngdistError, AngdistResult, ErrorCategory};

/// One energy point of the source angular distribution.
///
/// `coefficients[0]` is the implicit order-0 term (always `1.0`); the rest are
/// the Legendre coefficients for orders `1..=max_order`, zero-padded.
#[derive(Debug, Clone, PartialEq)]
pub struct EnergyRecord {
    energy: f64,
    coefficients: Vec<f64>,
    source_line: usize,
}

impl EnergyRecord {
    pub fn new(energy: f64, coefficients: Vec<f64>) -> Self {
        Self {
            energy,
            coefficients,
            source_line: 0,
        }
    }

    pub fn with_source_line(mut self, source_line: usize) -> Self {
        self.source_line = source_line;
        self
    }

    pub fn energy(&self) -> f64 {
        self.energy
    }

    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    pub fn max_order(&self) -> usize {
        self.coefficients.len().saturating_sub(1)
    }

    /// 1-based line of the record header in the source file, `0` when the
    /// record was built in memory.
    pub fn source_line(&self) -> usize {
        self.source_line
    }
}

/// `[mu_0 = -1, mu_1, ..., mu_{n-1}, mu_n = 1]` for a single energy.
#[derive(Debug, Clone, PartialEq)]
pub struct BinTableRow {
    energy: f64,
    boundaries: Vec<f64>,
}

impl BinTableRow {
    pub fn new(energy: f64, boundaries: Vec<f64>) -> Self {
        Self { energy, boundaries }
    }

    pub fn energy(&self) -> f64 {
        self.energy
    }

    pub fn boundaries(&self) -> &[f64] {
        &self.boundaries
    }

    pub fn interior(&self) -> &[f64] {
        match self.boundaries.len() {
            0..=2 => &[],
            len => &self.boundaries[1..len - 1],
        }
    }

    pub fn bin_count(&self) -> usize {
        self.boundaries.len().saturating_sub(1)
    }

    /// Serialized column order: energy first, then every boundary.
    pub fn columns(&self) -> impl Iterator<Item = f64> + '_ {
        std::iter::once(self.energy).chain(self.boundaries.iter().copied())
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct BinTable {
    rows: Vec<BinTableRow>,
}

impl BinTable {
    pub fn from_rows(rows: Vec<BinTableRow>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[BinTableRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn energies(&self) -> Vec<f64> {
        self.rows.iter().map(BinTableRow::energy).collect()
    }
}

/// Angular density sampled on a uniform cosine grid for one energy.
#[derive(Debug, Clone, PartialEq)]
pub struct DensityRow {
    energy: f64,
    values: Vec<f64>,
}

impl DensityRow {
    pub fn new(energy: f64, values: Vec<f64>) -> Self {
        Self { energy, values }
    }

    pub fn energy(&self) -> f64 {
        self.energy
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn columns(&self) -> impl Iterator<Item = f64> + '_ {
        std::iter::once(self.energy).chain(self.values.iter().copied())
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct DensityTable {
    rows: Vec<DensityRow>,
}

impl DensityTable {
    pub fn from_rows(rows: Vec<DensityRow>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[DensityRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
