//! Validation helpers for log-likelihood optimization.
//!
//! - **Tolerances**: [`verify_tol_grad`], [`verify_tol_cost`] accept `None`
//!   or a finite, strictly positive value.
//! - **Gradients**: [`validate_grad`] checks length and finiteness.
//! - **Estimates**: [`validate_theta_hat`] requires a present, finite vector.
//! - **Objective values**: [`validate_value`] requires a finite scalar.
//! - **Hessians**: [`validate_hessian`] checks shape and finiteness.
//!
//! Each helper reports the first offending element through a dedicated
//! [`OptError`] variant.
use crate::optimization::{
    errors::{OptError, OptResult},
    loglik_optimizer::{Grad, Theta, types::Hessian},
};

/// Shared rule for optional tolerances: finite and `> 0` when present.
fn tol_violation(tol: Option<f64>) -> Option<(f64, &'static str)> {
    match tol {
        Some(t) if !t.is_finite() => Some((t, "Tolerance must be finite.")),
        Some(t) if t <= 0.0 => Some((t, "Tolerance must be positive.")),
        _ => None,
    }
}

/// Validate the optional gradient-norm tolerance.
///
/// # Errors
/// Returns [`OptError::InvalidTolGrad`] if the value is non-finite or ≤ 0.0.
pub fn verify_tol_grad(tol: Option<f64>) -> OptResult<()> {
    match tol_violation(tol) {
        Some((tol, reason)) => Err(OptError::InvalidTolGrad { tol, reason }),
        None => Ok(()),
    }
}

/// Validate the optional cost-change tolerance.
///
/// # Errors
/// Returns [`OptError::InvalidTolCost`] if the value is non-finite or ≤ 0.0.
pub fn verify_tol_cost(tol: Option<f64>) -> OptResult<()> {
    match tol_violation(tol) {
        Some((tol, reason)) => Err(OptError::InvalidTolCost { tol, reason }),
        None => Ok(()),
    }
}

/// Validate a gradient vector against dimension and finiteness.
///
/// # Errors
/// - [`OptError::GradientDimMismatch`] if length does not match `dim`.
/// - [`OptError::InvalidGradient`] for the first non-finite element.
pub fn validate_grad(grad: &Grad, dim: usize) -> OptResult<()> {
    if grad.len() != dim {
        return Err(OptError::GradientDimMismatch { expected: dim, found: grad.len() });
    }
    match grad.iter().position(|v| !v.is_finite()) {
        Some(index) => Err(OptError::InvalidGradient {
            index,
            value: grad[index],
            reason: "Gradient elements must be finite.",
        }),
        None => Ok(()),
    }
}

/// Validate and unwrap an estimated parameter vector (`theta_hat`).
///
/// # Errors
/// - [`OptError::MissingThetaHat`] if no vector was provided.
/// - [`OptError::InvalidThetaHat`] if any element is non-finite.
pub fn validate_theta_hat(theta_hat: Option<Theta>) -> OptResult<Theta> {
    let theta = theta_hat.ok_or(OptError::MissingThetaHat)?;
    if let Some(index) = theta.iter().position(|v| !v.is_finite()) {
        return Err(OptError::InvalidThetaHat {
            index,
            value: theta[index],
            reason: "Parameter estimates must be finite.",
        });
    }
    Ok(theta)
}

/// Validate that a scalar log-likelihood value is finite.
///
/// # Errors
/// Returns [`OptError::NonFiniteCost`] if the value is `NaN` or infinite.
pub fn validate_value(value: f64) -> OptResult<()> {
    if !value.is_finite() {
        return Err(OptError::NonFiniteCost { value });
    }
    Ok(())
}

/// Validate that a Hessian is `dim × dim` with finite entries.
///
/// # Errors
/// - [`OptError::HessianDimMismatch`] if the shape is wrong.
/// - [`OptError::InvalidHessian`] with the first offending row/col/value.
pub fn validate_hessian(hessian: &Hessian, dim: usize) -> OptResult<()> {
    if hessian.nrows() != dim || hessian.ncols() != dim {
        return Err(OptError::HessianDimMismatch {
            expected: dim,
            found: (hessian.nrows(), hessian.ncols()),
        });
    }
    for ((row, col), &value) in hessian.indexed_iter() {
        if !value.is_finite() {
            return Err(OptError::InvalidHessian { row, col, value });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover the error variants and payloads of each helper.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Tolerance checks accept None and positive values only.
    //
    // Given
    // -----
    // - None, 1e-6, 0.0 and +∞.
    //
    // Expect
    // ------
    // - Ok for the first two; the tolerance-specific error for the rest.
    fn tolerance_checks() {
        assert!(verify_tol_grad(None).is_ok());
        assert!(verify_tol_cost(Some(1e-6)).is_ok());
        assert_eq!(
            verify_tol_grad(Some(0.0)),
            Err(OptError::InvalidTolGrad { tol: 0.0, reason: "Tolerance must be positive." })
        );
        assert!(matches!(
            verify_tol_cost(Some(f64::INFINITY)),
            Err(OptError::InvalidTolCost { reason: "Tolerance must be finite.", .. })
        ));
    }

    #[test]
    // Purpose
    // -------
    // Gradient and estimate checks report the first bad index.
    //
    // Given
    // -----
    // - A gradient of the wrong length, and vectors with NaN at index 1.
    //
    // Expect
    // ------
    // - `GradientDimMismatch`, `InvalidGradient { index: 1 }`,
    //   `InvalidThetaHat { index: 1 }`.
    fn vector_checks_report_first_offender() {
        assert_eq!(
            validate_grad(&array![1.0], 2),
            Err(OptError::GradientDimMismatch { expected: 2, found: 1 })
        );
        assert!(matches!(
            validate_grad(&array![0.0, f64::NAN, f64::NAN], 3),
            Err(OptError::InvalidGradient { index: 1, .. })
        ));
        assert!(matches!(
            validate_theta_hat(Some(array![0.0, f64::NAN])),
            Err(OptError::InvalidThetaHat { index: 1, .. })
        ));
        assert_eq!(validate_theta_hat(Some(array![0.5])), Ok(array![0.5]));
    }

    #[test]
    // Purpose
    // -------
    // Hessian checks enforce squareness at the requested dimension.
    //
    // Given
    // -----
    // - A 2×2 matrix checked against dim 3, and a matrix with ∞ at (0, 1).
    //
    // Expect
    // ------
    // - `HessianDimMismatch` and `InvalidHessian { row: 0, col: 1 }`.
    fn hessian_checks() {
        let h = array![[1.0, 0.0], [0.0, 1.0]];
        assert!(matches!(validate_hessian(&h, 3), Err(OptError::HessianDimMismatch { .. })));
        let bad = array![[1.0, f64::INFINITY], [0.0, 1.0]];
        assert!(matches!(
            validate_hessian(&bad, 2),
            Err(OptError::InvalidHessian { row: 0, col: 1, .. })
        ));
        assert!(validate_value(f64::NAN).is_err());
    }
}
