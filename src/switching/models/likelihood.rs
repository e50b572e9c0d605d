//! Log-likelihood and objective of the two-regime switching regression.
//!
//! Purpose
//! -------
//! Reduce one Hamilton-filter pass to a scalar: the mean log conditional
//! density used for maximum likelihood, and its negation for minimizers.
//!
//! Key behaviors
//! -------------
//! - The average runs over `t = 1..n−1`. Observation 0 only seeds the filter
//!   with the stationary distribution, so it has no conditional density and
//!   contributes nothing; at least two observations are required.
//! - [`log_likelihood`] propagates every structural error and returns `−∞`
//!   when some conditional density underflowed to zero.
//! - [`objective`] is `−log_likelihood`, with non-positive variances and
//!   underflow mapped to `+∞` so a minimizer treats them as very poor points
//!   rather than failures. Other errors still propagate.
//! - [`floored_mean_log_likelihood`] floors each conditional density at
//!   `f64::MIN_POSITIVE`; the estimator uses it so line searches always see
//!   a finite value.
//!
//! Invariants & assumptions
//! ------------------------
//! - Functions are pure: identical `(x, y, θ)` give bit-identical results.
//! - θ is model-space (variances, transition logits).
use crate::switching::{
    core::{
        data::MIN_OBSERVATIONS,
        filter::{FilterOutput, hamilton_filter},
    },
    errors::{MSRError, MSRResult},
};
use ndarray::{ArrayView1, ArrayView2, s};

/// Mean of `ln cond_density[t]` over `t = 1..n−1`.
///
/// Returns `−∞` if any term is zero and `NaN` for filters with fewer than
/// two rows; callers check the length first.
pub fn mean_log_likelihood(filter: &FilterOutput) -> f64 {
    let terms = filter.cond_density.slice(s![1..]);
    terms.mapv(f64::ln).mean().unwrap_or(f64::NAN)
}

/// As [`mean_log_likelihood`], with each density floored at
/// `f64::MIN_POSITIVE` (so every term is at least about `−708`).
pub fn floored_mean_log_likelihood(filter: &FilterOutput) -> f64 {
    let terms = filter.cond_density.slice(s![1..]);
    terms.mapv(|d| d.max(f64::MIN_POSITIVE).ln()).mean().unwrap_or(f64::NAN)
}

/// Mean log-likelihood of model-space θ on an expanded design.
///
/// Errors
/// ------
/// - Shape and structural errors from [`hamilton_filter`].
/// - `MSRError::InsufficientObservations` when `n < 2`.
///
/// Examples
/// --------
/// ```rust
/// # use ndarray::array;
/// # use rust_regimes::switching::models::likelihood::log_likelihood;
/// let x = array![[1.0], [1.0], [1.0]];
/// let y = array![0.0, 0.2, -0.1];
/// let theta = array![0.0, 3.0, 1.0, 1.0, 1.0, 1.0];
/// let ll = log_likelihood(x.view(), y.view(), theta.view()).unwrap();
/// assert!(ll.is_finite() && ll < 0.0);
/// ```
pub fn log_likelihood(
    x: ArrayView2<'_, f64>, y: ArrayView1<'_, f64>, theta: ArrayView1<'_, f64>,
) -> MSRResult<f64> {
    let filter = hamilton_filter(x, y, theta)?;
    if filter.n_obs() < MIN_OBSERVATIONS {
        return Err(MSRError::InsufficientObservations {
            needed: MIN_OBSERVATIONS,
            actual: filter.n_obs(),
        });
    }
    Ok(mean_log_likelihood(&filter))
}

/// Negated mean log-likelihood for minimizers.
///
/// # Errors
/// - Everything [`log_likelihood`] reports except `NonPositiveVariance`,
///   which becomes `Ok(+∞)` together with density underflow.
pub fn objective(
    x: ArrayView2<'_, f64>, y: ArrayView1<'_, f64>, theta: ArrayView1<'_, f64>,
) -> MSRResult<f64> {
    match log_likelihood(x, y, theta) {
        Ok(ll) if ll.is_finite() => Ok(-ll),
        Ok(_) | Err(MSRError::NonPositiveVariance { .. }) => Ok(f64::INFINITY),
        Err(err) => Err(err),
    }
}
