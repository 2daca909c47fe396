//! Legendre-basis polynomial series on `[-1, 1]`.
//!
//! A series `c` stands for `sum_i c[i] * P_i(x)`. Integration and root finding
//! stay in the Legendre basis; nothing is converted to power-series form.

use super::DenseRealMatrix;
use super::linalg::{EigenError, eigenvalues};
use num_complex::Complex64;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct LegendreSeries {
    coefficients: Vec<f64>,
}

impl LegendreSeries {
    pub fn new(coefficients: Vec<f64>) -> Self {
        Self { coefficients }
    }

    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    pub fn degree(&self) -> usize {
        self.coefficients.len().saturating_sub(1)
    }

    /// Clenshaw recurrence for the Legendre three-term relation.
    pub fn evaluate(&self, x: f64) -> f64 {
        let c = &self.coefficients;
        let (c0, c1) = match c.len() {
            0 => return 0.0,
            1 => (c[0], 0.0),
            2 => (c[0], c[1]),
            len => {
                let mut nd = len as f64;
                let mut c0 = c[len - 2];
                let mut c1 = c[len - 1];
                for index in (0..len - 2).rev() {
                    let previous = c0;
                    nd -= 1.0;
                    c0 = c[index] - c1 * (nd - 1.0) / nd;
                    c1 = previous + c1 * x * (2.0 * nd - 1.0) / nd;
                }
                (c0, c1)
            }
        };
        c0 + c1 * x
    }

    /// Multiply each coefficient by the orthogonality weight `(2i+1)/2`.
    pub fn weighted_by_orthogonality(&self) -> Self {
        let coefficients = self
            .coefficients
            .iter()
            .enumerate()
            .map(|(order, value)| value * (2 * order + 1) as f64 / 2.0)
            .collect();
        Self { coefficients }
    }

    /// Term-by-term antiderivative that vanishes at `lower_bound`.
    ///
    /// Uses `∫P_j = (P_{j+1} - P_{j-1}) / (2j+1)`, so output coefficient `j`
    /// only depends on input coefficients `j-1` and `j+1`. The result has one
    /// more coefficient than the input.
    pub fn antiderivative(&self, lower_bound: f64) -> Self {
        let c = &self.coefficients;
        if c.is_empty() {
            return Self::default();
        }

        let n = c.len();
        let mut integrated = vec![0.0; n + 1];
        integrated[1] = c[0];
        if n > 1 {
            integrated[2] = c[1] / 3.0;
        }
        for order in 2..n {
            let term = c[order] / (2 * order + 1) as f64;
            integrated[order + 1] = term;
            integrated[order - 1] -= term;
        }

        let mut series = Self::new(integrated);
        let offset = series.evaluate(lower_bound);
        series.coefficients[0] -= offset;
        series
    }

    /// The series minus a constant.
    pub fn shifted(&self, constant: f64) -> Self {
        let mut coefficients = self.coefficients.clone();
        match coefficients.first_mut() {
            Some(first) => *first -= constant,
            None => coefficients.push(-constant),
        }
        Self { coefficients }
    }

    /// Drop trailing coefficients that are exactly zero, keeping at least one.
    pub fn trimmed(&self) -> Self {
        let keep = self
            .coefficients
            .iter()
            .rposition(|value| *value != 0.0)
            .map_or(1, |index| index + 1)
            .min(self.coefficients.len());
        Self::new(self.coefficients[..keep].to_vec())
    }

    /// Scaled companion matrix of the series in the Legendre basis.
    ///
    /// Symmetric tridiagonal apart from its last column. Requires at least
    /// degree 2 after trimming.
    pub fn companion_matrix(&self) -> Result<DenseRealMatrix, EigenError> {
        let series = self.trimmed();
        let c = series.coefficients();
        let n = series.degree();
        if n < 2 {
            return Err(EigenError::EmptyMatrix);
        }

        let scale: Vec<f64> = (0..n)
            .map(|order| 1.0 / ((2 * order + 1) as f64).sqrt())
            .collect();
        let mut matrix = DenseRealMatrix::zeros(n, n);
        for k in 0..n - 1 {
            let value = (k + 1) as f64 * scale[k] * scale[k + 1];
            matrix[(k, k + 1)] = value;
            matrix[(k + 1, k)] = value;
        }

        let lead = c[n];
        let degree_factor = n as f64 / (2 * n - 1) as f64;
        for row in 0..n {
            matrix[(row, n - 1)] -= (c[row] / lead) * (scale[row] / scale[n - 1]) * degree_factor;
        }

        Ok(matrix)
    }

    /// All complex roots of the series.
    ///
    /// Trailing zero coefficients are trimmed; a linear remainder is solved in
    /// closed form, higher degrees through the companion-matrix eigenvalues.
    pub fn roots(&self) -> Result<Vec<Complex64>, EigenError> {
        let series = self.trimmed();
        let c = series.coefficients();
        match c.len() {
            0 | 1 => Ok(Vec::new()),
            2 => Ok(vec![Complex64::new(-c[0] / c[1], 0.0)]),
            _ => eigenvalues(&series.companion_matrix()?),
        }
    }
}

/// `P_n(x)` by upward recurrence.
pub fn legendre_polynomial(order: usize, x: f64) -> f64 {
    if order == 0 {
        return 1.0;
    }

    let mut previous = 1.0;
    let mut current = x;
    for n in 1..order {
        let next = ((2 * n + 1) as f64 * x * current - n as f64 * previous) / (n + 1) as f64;
        previous = current;
        current = next;
    }
    current
}
