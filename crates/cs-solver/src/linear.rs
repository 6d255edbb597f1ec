//! Dense complex linear solve.

use crate::error::{SolverError, SolverResult};
use cs_core::numeric::{Complex64, is_finite_complex};
use nalgebra::{DMatrix, DVector};

/// Solve `A x = b` with LU decomposition and partial pivoting.
///
/// Returns `Ok(None)` when the factorization is singular or the solution is
/// not finite; mismatched dimensions are an error.
pub fn solve_complex(
    a: &DMatrix<Complex64>,
    b: &DVector<Complex64>,
) -> SolverResult<Option<DVector<Complex64>>> {
    if a.nrows() != a.ncols() {
        return Err(SolverError::DimensionMismatch {
            expected: a.nrows(),
            actual: a.ncols(),
        });
    }
    if a.nrows() != b.len() {
        return Err(SolverError::DimensionMismatch {
            expected: a.nrows(),
            actual: b.len(),
        });
    }

    let x = a.clone().lu().solve(b);
    Ok(x.filter(|x| x.iter().all(|&v| is_finite_complex(v))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cs_core::numeric::cplx;

    #[test]
    fn solves_complex_system() {
        // (1+j) x = 2  =>  x = 1 - j
        let a = DMatrix::from_element(1, 1, cplx(1.0, 1.0));
        let b = DVector::from_element(1, cplx(2.0, 0.0));
        let x = solve_complex(&a, &b).unwrap().unwrap();
        assert!((x[0] - cplx(1.0, -1.0)).norm() < 1e-12);
    }

    #[test]
    fn singular_is_none() {
        let a = DMatrix::from_element(2, 2, cplx(1.0, 0.0));
        let b = DVector::from_element(2, cplx(1.0, 0.0));
        assert!(solve_complex(&a, &b).unwrap().is_none());
    }

    #[test]
    fn dimension_mismatch() {
        let a = DMatrix::from_element(2, 2, cplx(1.0, 0.0));
        let b = DVector::from_element(3, cplx(1.0, 0.0));
        let err = solve_complex(&a, &b).unwrap_err();
        assert_eq!(
            err,
            SolverError::DimensionMismatch {
                expected: 2,
                actual: 3
            }
        );
    }
}
