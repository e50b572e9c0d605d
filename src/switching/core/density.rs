//! Regime-conditional Gaussian densities.
//!
//! Purpose
//! -------
//! Evaluate `φ(y_t; x_t·β_s, σ_s²)`, the density of one observation under
//! the linear-Gaussian model of regime `s`, reading `β_s` and `σ_s²` from
//! the model-space parameter vector θ.
//!
//! Key behaviors
//! -------------
//! - Regime indices outside `{0, 1}` fail with `MSRError::InvalidRegime`.
//! - Non-finite or non-positive variances fail with
//!   `MSRError::NonPositiveVariance` before any arithmetic, so NaN never
//!   leaves this module.
//! - The density itself is delegated to `statrs::distribution::Normal`.
//!
//! Conventions
//! -----------
//! - θ layout is `(β₀[p], β₁[p], σ₀², σ₁², z₀₀, z₁₁)` with `p = x_t.len()`;
//!   offsets come from [`crate::switching::core::params`].
//! - Densities may underflow to exactly `0.0` for far-outlying observations;
//!   that is a valid value, handled by the filter.
use crate::switching::{
    core::{
        params::{coefficient_range, theta_len, variance_index},
        transition::N_REGIMES,
    },
    errors::{MSRError, MSRResult},
};
use ndarray::{ArrayView1, s};
use statrs::distribution::{Continuous, Normal};

/// Gaussian density of `y_t` under regime `regime`.
///
/// Parameters
/// ----------
/// - `regime`: `usize` in `{0, 1}`.
/// - `x_t`: expanded design row of length `p`.
/// - `y_t`: response at `t`.
/// - `theta`: model-space θ of length `2p + 4`.
///
/// Errors
/// ------
/// - `MSRError::InvalidRegime` for `regime >= 2`.
/// - `MSRError::ThetaLengthMismatch` when `theta.len() != 2p + 4`.
/// - `MSRError::NonPositiveVariance` when `σ_s²` is not finite and `> 0`.
///
/// Examples
/// --------
/// ```rust
/// # use ndarray::array;
/// # use rust_regimes::switching::core::density::regime_density;
/// // p = 1: θ = (β₀, β₁, σ₀², σ₁², z₀₀, z₁₁)
/// let theta = array![0.0, 1.0, 1.0, 4.0, 0.0, 0.0];
/// let d = regime_density(0, array![1.0].view(), 0.0, theta.view()).unwrap();
/// assert!((d - 1.0 / (2.0 * std::f64::consts::PI).sqrt()).abs() < 1e-12);
/// ```
pub fn regime_density(
    regime: usize, x_t: ArrayView1<'_, f64>, y_t: f64, theta: ArrayView1<'_, f64>,
) -> MSRResult<f64> {
    if regime >= N_REGIMES {
        return Err(MSRError::InvalidRegime { regime });
    }
    let p = x_t.len();
    if theta.len() != theta_len(p) {
        return Err(MSRError::ThetaLengthMismatch { expected: theta_len(p), actual: theta.len() });
    }
    let variance = theta[variance_index(p, regime)];
    if !variance.is_finite() || variance <= 0.0 {
        return Err(MSRError::NonPositiveVariance { regime, value: variance });
    }
    let mean = x_t.dot(&theta.slice(s![coefficient_range(p, regime)]));
    let normal = Normal::new(mean, variance.sqrt())
        .map_err(|_| MSRError::NonPositiveVariance { regime, value: variance })?;
    Ok(normal.pdf(y_t))
}

/// Densities of `y_t` under both regimes, `[η₀, η₁]`.
///
/// # Errors
/// Same as [`regime_density`], reported for the first failing regime.
pub fn regime_densities(
    x_t: ArrayView1<'_, f64>, y_t: f64, theta: ArrayView1<'_, f64>,
) -> MSRResult<[f64; N_REGIMES]> {
    Ok([regime_density(0, x_t, y_t, theta)?, regime_density(1, x_t, y_t, theta)?])
}
