use crate::numerics::{EigenError, LegendreSeries};
use num_complex::Complex64;

/// Complex roots of a Legendre series.
pub trait RootFinder {
    fn roots(&self, series: &LegendreSeries) -> Result<Vec<Complex64>, EigenError>;
}

/// Eigenvalues of the scaled Legendre companion matrix.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompanionRootFinder;

impl RootFinder for CompanionRootFinder {
    fn roots(&self, series: &LegendreSeries) -> Result<Vec<Complex64>, EigenError> {
        series.roots()
    }
}

impl<T> RootFinder for &T
where
    T: RootFinder + ?Sized,
{
    fn roots(&self, series: &LegendreSeries) -> Result<Vec<Complex64>, EigenError> {
        (**self).roots(series)
    }
}
