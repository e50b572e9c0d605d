//! Normal-equations linear solver.
//!
//! Purpose
//! -------
//! Solve `A x ≈ b` for a tall, full-column-rank `A (m × k)` through the
//! normal equations `(AᵀA) x = Aᵀb`: Cholesky factorization `AᵀA = L Lᵀ`,
//! then a forward solve with `L` and a backward solve with `Lᵀ`.
//!
//! Key behaviors
//! -------------
//! - Used once per likelihood evaluation to seed the Hamilton filter with
//!   the stationary distribution, and by the start-value policies for the
//!   per-regime OLS fits.
//! - A non-positive-definite `AᵀA` (rank-deficient `A`, or `m < k`) is
//!   reported as `MSRError::SingularMatrix`; the solver never returns NaN.
//!
//! Conventions
//! -----------
//! - Inputs and outputs are `ndarray`; the factorization runs on
//!   `nalgebra::DMatrix`, copied column by column.
use crate::switching::errors::{MSRError, MSRResult};
use nalgebra::{DMatrix, DVector};
use ndarray::{Array1, ArrayView1, ArrayView2};

/// Relative pivot threshold: `L_ii² <= PIVOT_RTOL · max(diag(AᵀA))` is
/// treated as rank deficiency.
pub const PIVOT_RTOL: f64 = 1e-14;

/// Least-squares solution of `A x = b` via Cholesky on `AᵀA`.
///
/// Parameters
/// ----------
/// - `a`: `ArrayView2<f64>` of shape `(m, k)` with `m >= k`.
/// - `b`: `ArrayView1<f64>` of length `m`.
///
/// Returns
/// -------
/// `MSRResult<Array1<f64>>`
///   The length-`k` solution. For square non-singular `A` this is the exact
///   solution of `A x = b`.
///
/// Errors
/// ------
/// - `MSRError::LengthMismatch` when `a.nrows() != b.len()`.
/// - `MSRError::EmptyDesign` when `a` has no columns.
/// - `MSRError::SingularMatrix` when `m < k`, when `AᵀA` is not positive
///   definite (pivots at or below [`PIVOT_RTOL`] included), or when a
///   triangular solve breaks down.
///
/// Examples
/// --------
/// ```rust
/// # use ndarray::array;
/// # use rust_regimes::switching::core::linalg::linear_solve;
/// let a = array![[2.0, 0.0], [0.0, 4.0]];
/// let x = linear_solve(a.view(), array![2.0, 2.0].view()).unwrap();
/// assert!((x[0] - 1.0).abs() < 1e-12 && (x[1] - 0.5).abs() < 1e-12);
/// ```
pub fn linear_solve(a: ArrayView2<'_, f64>, b: ArrayView1<'_, f64>) -> MSRResult<Array1<f64>> {
    let (m, k) = a.dim();
    if m != b.len() {
        return Err(MSRError::LengthMismatch { rows: m, responses: b.len() });
    }
    if k == 0 {
        return Err(MSRError::EmptyDesign);
    }
    if m < k {
        return Err(MSRError::SingularMatrix { reason: "fewer equations than unknowns" });
    }

    let a_nalg = DMatrix::<f64>::from_fn(m, k, |i, j| a[[i, j]]);
    let b_nalg = DVector::<f64>::from_iterator(m, b.iter().copied());
    let ata = a_nalg.transpose() * &a_nalg;
    let atb = a_nalg.transpose() * &b_nalg;

    let chol = ata.clone().cholesky().ok_or(MSRError::SingularMatrix {
        reason: "Cholesky factorization of AᵀA failed",
    })?;
    let l = chol.l();
    let scale = ata.diagonal().max();
    if l.diagonal().iter().any(|&d| d * d <= PIVOT_RTOL * scale) {
        return Err(MSRError::SingularMatrix { reason: "AᵀA is numerically rank deficient" });
    }
    let v = l
        .solve_lower_triangular(&atb)
        .ok_or(MSRError::SingularMatrix { reason: "forward substitution failed" })?;
    let x = l
        .transpose()
        .solve_upper_triangular(&v)
        .ok_or(MSRError::SingularMatrix { reason: "backward substitution failed" })?;

    if x.iter().any(|v| !v.is_finite()) {
        return Err(MSRError::SingularMatrix { reason: "solution is not finite" });
    }
    Ok(Array1::from_iter(x.iter().copied()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::{Array2, array};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Exact solves of square well-posed systems.
    // - Least-squares solves of overdetermined systems.
    // - Detection of rank deficiency and shape errors.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // A well-posed square system is solved to direct-solve precision.
    //
    // Given
    // -----
    // - A = [[4, 1, 0], [1, 3, 1], [0, 1, 2]], x* = (1, -2, 0.5), b = A x*.
    //
    // Expect
    // ------
    // - x within 1e-8 of x*.
    fn square_system_matches_direct_solution() {
        // Arrange
        let a = array![[4.0, 1.0, 0.0], [1.0, 3.0, 1.0], [0.0, 1.0, 2.0]];
        let x_star = array![1.0, -2.0, 0.5];
        let b = a.dot(&x_star);

        // Act
        let x = linear_solve(a.view(), b.view()).expect("well-posed system");

        // Assert
        for (got, want) in x.iter().zip(x_star.iter()) {
            assert_abs_diff_eq!(*got, *want, epsilon = 1e-8);
        }
    }

    #[test]
    // Purpose
    // -------
    // Overdetermined systems return the ordinary least-squares fit.
    //
    // Given
    // -----
    // - Design [1, t] for t = 0..4 and y = 2 + 0.5 t exactly.
    //
    // Expect
    // ------
    // - Coefficients (2, 0.5).
    fn overdetermined_system_returns_ols() {
        let a = Array2::from_shape_fn((5, 2), |(t, j)| if j == 0 { 1.0 } else { t as f64 });
        let b = Array1::from_shape_fn(5, |t| 2.0 + 0.5 * t as f64);

        let x = linear_solve(a.view(), b.view()).expect("full column rank");

        assert_abs_diff_eq!(x[0], 2.0, epsilon = 1e-10);
        assert_abs_diff_eq!(x[1], 0.5, epsilon = 1e-10);
    }

    #[test]
    // Purpose
    // -------
    // Rank deficiency and bad shapes fail with typed errors instead of NaN.
    //
    // Given
    // -----
    // - Two identical columns; a 1×2 matrix; a length mismatch.
    //
    // Expect
    // ------
    // - `SingularMatrix` twice, then `LengthMismatch`.
    fn degenerate_inputs_are_rejected() {
        let collinear = array![[1.0, 1.0], [2.0, 2.0], [3.0, 3.0]];
        assert!(matches!(
            linear_solve(collinear.view(), array![1.0, 2.0, 3.0].view()),
            Err(MSRError::SingularMatrix { .. })
        ));

        let wide = array![[1.0, 2.0]];
        assert!(matches!(
            linear_solve(wide.view(), array![1.0].view()),
            Err(MSRError::SingularMatrix { .. })
        ));

        assert_eq!(
            linear_solve(array![[1.0], [2.0]].view(), array![1.0].view()),
            Err(MSRError::LengthMismatch { rows: 2, responses: 1 })
        );
    }
}
