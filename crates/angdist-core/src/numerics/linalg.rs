use super::DenseRealMatrix;
use faer::linalg::evd::EvdError;
use num_complex::Complex64;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EigenError {
    #[error("eigenvalue solve requires a square matrix, got {rows}x{cols}")]
    NonSquareMatrix { rows: usize, cols: usize },
    #[error("eigenvalue solve requires a non-empty matrix")]
    EmptyMatrix,
    #[error("matrix entry ({row},{col}) is not finite")]
    NonFiniteEntry { row: usize, col: usize },
    #[error("eigenvalue iteration did not converge for a {dimension}x{dimension} matrix")]
    NoConvergence { dimension: usize },
}

/// All eigenvalues of a real square matrix, complex ones in conjugate pairs.
///
/// Shape and finiteness are checked up front so a bad matrix is reported by
/// position instead of surfacing as a convergence failure.
pub fn eigenvalues(matrix: &DenseRealMatrix) -> Result<Vec<Complex64>, EigenError> {
    let dimension = validate_square(matrix)?;
    matrix.eigenvalues().map_err(|error| match error {
        EvdError::NoConvergence => EigenError::NoConvergence { dimension },
    })
}

fn validate_square(matrix: &DenseRealMatrix) -> Result<usize, EigenError> {
    let rows = matrix.nrows();
    let cols = matrix.ncols();
    if rows == 0 || cols == 0 {
        return Err(EigenError::EmptyMatrix);
    }
    if rows != cols {
        return Err(EigenError::NonSquareMatrix { rows, cols });
    }

    for row in 0..rows {
        for col in 0..cols {
            if !matrix[(row, col)].is_finite() {
                return Err(EigenError::NonFiniteEntry { row, col });
            }
        }
    }

    Ok(rows)
}
