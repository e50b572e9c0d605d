//! inference::hessian — standard errors from a finite-difference Hessian.
//!
//! Purpose
//! -------
//! Turn the gradient map of an average negative log-likelihood into
//! classical standard errors: difference the gradient once more to get the
//! observed information `J(θ̂)`, move it into `nalgebra`, and read the
//! diagonal of its eigen-truncated pseudoinverse.
//!
//! Key behaviors
//! -------------
//! - [`calc_standard_errors`] calls [`compute_hessian`] and returns
//!   `sqrt(diag(J⁺))` on the scale of the supplied gradient (per
//!   observation); callers rescale by the sample size.
//! - Directions whose eigenvalue is at most [`EIGEN_EPS`] are dropped from
//!   `J⁺`, so weakly identified or flat directions (e.g. a transition logit
//!   pinned at its clip) contribute nothing instead of blowing up.
//!
//! Invariants & assumptions
//! ------------------------
//! - The gradient map is of the *negative* average log-likelihood, so `J`
//!   is positive semi-definite at a maximum; negative eigenvalues are
//!   treated like zero ones.
//! - [`compute_hessian`] already symmetrizes; this module does not.
//!
//! Conventions
//! -----------
//! - No explicit inverse is formed; everything goes through
//!   `symmetric_eigen`.
//!
//! Downstream usage
//! ----------------
//! - `MarkovSwitchingModel::standard_errors` passes a central-difference
//!   gradient in optimizer space and applies the delta method afterwards.
use crate::optimization::{
    errors::OptResult, loglik_optimizer::finite_diff::compute_hessian,
    numerical_stability::transformations::EIGEN_EPS,
};
use nalgebra::DMatrix;
use ndarray::{Array1, Array2};

/// calc_standard_errors — classical standard errors from observed information.
///
/// Parameters
/// ----------
/// - `f`: gradient map `θ ↦ ∇(−ℓ̄)(θ)` of the negative average
///   log-likelihood. Must be smooth near `theta_hat` for the Hessian to be
///   meaningful.
/// - `theta_hat`: point at which `J(θ̂)` is evaluated.
///
/// Returns
/// -------
/// `OptResult<Array1<f64>>`
///   One standard error per entry of `theta_hat`, on the per-observation
///   scale of `f`.
///
/// Errors
/// ------
/// - Any error from [`compute_hessian`] (non-finite or mis-shaped Hessian).
///
/// Examples
/// --------
/// ```rust
/// # use ndarray::array;
/// # use rust_regimes::inference::hessian::calc_standard_errors;
/// // g(θ) = A θ with A = diag(4, 1): SEs are (1/2, 1).
/// let a = array![[4.0, 0.0], [0.0, 1.0]];
/// let f = |theta: &ndarray::Array1<f64>| a.dot(theta);
/// let se = calc_standard_errors(&f, &array![1.0, -1.0]).unwrap();
/// assert!((se[0] - 0.5).abs() < 1e-6);
/// assert!((se[1] - 1.0).abs() < 1e-6);
/// ```
pub fn calc_standard_errors<F: Fn(&Array1<f64>) -> Array1<f64>>(
    f: &F, theta_hat: &Array1<f64>,
) -> OptResult<Array1<f64>> {
    let n = theta_hat.len();
    let obs_info = compute_hessian(f, theta_hat)?;
    let mut obs_info_nalg = DMatrix::<f64>::zeros(n, n);
    fill_dmatrix(&obs_info, &mut obs_info_nalg);
    Ok(solve_for_se(obs_info_nalg, n))
}

// ---- Helper methods ----

/// Copy a square `ndarray` matrix into a preallocated `DMatrix`.
fn fill_dmatrix(obs_info: &Array2<f64>, obs_info_nalg: &mut DMatrix<f64>) {
    for ((i, j), &v) in obs_info.indexed_iter() {
        obs_info_nalg[(i, j)] = v;
    }
}

/// `sqrt(diag(J⁺))` with eigenvalues `λ ≤ EIGEN_EPS` dropped:
/// `Var(θ̂_i) = Σ_{k: λ_k > EIGEN_EPS} Q[i, k]² / λ_k` for `J = Q Λ Qᵀ`.
fn solve_for_se(obs_info_nalg: DMatrix<f64>, n: usize) -> Array1<f64> {
    let eigen_decomp = obs_info_nalg.symmetric_eigen();
    let mut se = Array1::<f64>::zeros(n);
    let q = eigen_decomp.eigenvectors;
    let eigenvals = eigen_decomp.eigenvalues;
    for i in 0..n {
        se[i] = eigenvals
            .iter()
            .enumerate()
            .filter(|(_, lambda)| **lambda > EIGEN_EPS)
            .map(|(k, &lambda)| q[(i, k)] * q[(i, k)] / lambda)
            .sum();
        se[i] = se[i].sqrt();
    }
    se
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use nalgebra::DVector;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Copying an `ndarray` Hessian into a `DMatrix`.
    // - Classical SEs for quadratics with known information matrices,
    //   including a correlated one.
    // - Eigenvalue truncation of flat and negative directions.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // `fill_dmatrix` copies every entry, including an asymmetric pair.
    //
    // Given
    // -----
    // - [[2, 0.5], [0.25, 1]].
    //
    // Expect
    // ------
    // - Identical entries at all positions.
    fn fill_dmatrix_copies_entries() {
        // Arrange
        let obs_info = array![[2.0, 0.5], [0.25, 1.0]];
        let mut obs_info_nalg = DMatrix::<f64>::zeros(2, 2);

        // Act
        fill_dmatrix(&obs_info, &mut obs_info_nalg);

        // Assert
        assert_eq!(obs_info_nalg[(0, 0)], 2.0);
        assert_eq!(obs_info_nalg[(0, 1)], 0.5);
        assert_eq!(obs_info_nalg[(1, 0)], 0.25);
        assert_eq!(obs_info_nalg[(1, 1)], 1.0);
    }

    #[test]
    // Purpose
    // -------
    // SEs match `sqrt(diag(A⁻¹))` for a correlated quadratic.
    //
    // Given
    // -----
    // - g(θ) = A θ with A = [[2, 1], [1, 2]], so A⁻¹ = [[2, −1], [−1, 2]] / 3.
    //
    // Expect
    // ------
    // - SEs ≈ (sqrt(2/3), sqrt(2/3)).
    fn calc_standard_errors_correlated_quadratic() {
        // Arrange
        let a = array![[2.0, 1.0], [1.0, 2.0]];
        let f = |theta: &Array1<f64>| a.dot(theta);

        // Act
        let se = calc_standard_errors(&f, &array![0.5, -0.5]).expect("standard errors");

        // Assert
        let want = (2.0f64 / 3.0).sqrt();
        assert_abs_diff_eq!(se[0], want, epsilon = 1e-6);
        assert_abs_diff_eq!(se[1], want, epsilon = 1e-6);
    }

    #[test]
    // Purpose
    // -------
    // Flat and negative directions are dropped from the pseudoinverse.
    //
    // Given
    // -----
    // - J = diag(4, 0, −1).
    //
    // Expect
    // ------
    // - SEs (0.5, 0, 0).
    fn solve_for_se_truncates_non_positive_directions() {
        let j = DMatrix::<f64>::from_diagonal(&DVector::from_vec(vec![4.0, 0.0, -1.0]));

        let se = solve_for_se(j, 3);

        assert_abs_diff_eq!(se[0], 0.5, epsilon = 1e-12);
        assert_eq!(se[1], 0.0);
        assert_eq!(se[2], 0.0);
    }
}
