use crate::domain::EnergyRecord;
use crate::numerics::LegendreSeries;

/// Probability density on `[-1, 1]`: record coefficients scaled by `(2i+1)/2`.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedSeries(LegendreSeries);

impl NormalizedSeries {
    pub fn from_coefficients(coefficients: &[f64]) -> Self {
        Self(LegendreSeries::new(coefficients.to_vec()).weighted_by_orthogonality())
    }

    pub fn from_record(record: &EnergyRecord) -> Self {
        Self::from_coefficients(record.coefficients())
    }

    pub fn density(&self, mu: f64) -> f64 {
        self.0.evaluate(mu)
    }

    pub fn integrate(&self) -> CdfSeries {
        CdfSeries(self.0.antiderivative(-1.0))
    }
}

/// Antiderivative of a [`NormalizedSeries`] that vanishes at `mu = -1`.
#[derive(Debug, Clone, PartialEq)]
pub struct CdfSeries(LegendreSeries);

impl CdfSeries {
    pub fn from_record(record: &EnergyRecord) -> Self {
        NormalizedSeries::from_record(record).integrate()
    }

    pub fn series(&self) -> &LegendreSeries {
        &self.0
    }

    pub fn evaluate(&self, mu: f64) -> f64 {
        self.0.evaluate(mu)
    }

    /// `CDF(mu) - probability`, whose roots are the bin boundaries.
    pub fn level_set(&self, probability: f64) -> LegendreSeries {
        self.0.shifted(probability)
    }
}
