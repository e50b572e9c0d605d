//! Parameter layout and mappings for two-regime switching regressions.
//!
//! Purpose
//! -------
//! Fix the flat layout of the model-space parameter vector θ, provide the
//! structured container [`MSRParams`], and map between θ and the
//! unconstrained optimizer vector `u` seen by L-BFGS.
//!
//! Key behaviors
//! -------------
//! - Offset helpers ([`theta_len`], [`coefficient_range`],
//!   [`variance_index`], [`logit_index`]) are the single source of truth for
//!   where each block lives in θ.
//! - [`MSRParams::from_theta`] / [`MSRParams::to_theta`] convert between θ
//!   and structured values (stay probabilities instead of logits).
//! - [`unconstrained_to_theta`] and [`MSRParams::to_unconstrained`] move
//!   between θ and `u`: variances go through softplus, logits are clipped
//!   to `±MAX_TRANSITION_LOGIT`.
//!
//! Invariants & assumptions
//! ------------------------
//! - θ = `(β₀[p], β₁[p], σ₀², σ₁², z₀₀, z₁₁)`, length `2p + 4`.
//! - `u` has the same layout with `u_σ = softplus⁻¹(σ²)`. Every finite `u`
//!   maps to a valid θ: `σ² = max(softplus(u_σ), variance_floor) > 0` and
//!   the clipped logits keep the stationary seed of the filter well
//!   conditioned.
//! - A successfully constructed [`MSRParams`] has a `2 × p` coefficient
//!   matrix with finite entries, finite positive variances, and stay
//!   probabilities strictly inside `(0, 1)`.
//!
//! Conventions
//! -----------
//! - Row `s` of [`MSRParams::beta`] holds the coefficients of regime `s` in
//!   expanded-design column order.
//! - Transition logits are the natural parameters; probabilities are
//!   `stay_probability(z)`, and `safe_logit` is used on the way back.
//!
//! Testing notes
//! -------------
//! - Unit tests cover the offset helpers, θ round trips, the unconstrained
//!   map (floor, clipping, positivity), validation errors, and expected
//!   regime durations.
use crate::{
    optimization::numerical_stability::transformations::{
        safe_logit, safe_softplus, safe_softplus_inv,
    },
    switching::{
        core::transition::{N_REGIMES, stay_probability, transition_from_probabilities},
        errors::{MSRError, MSRResult},
    },
};
use ndarray::{Array1, Array2, ArrayView1, s};
use std::ops::Range;

/// Bound on `|z|` for transition logits coming from the optimizer.
///
/// `logistic(10) ≈ 1 − 4.5e-5`, i.e. expected regime durations up to about
/// 22 000 periods.
pub const MAX_TRANSITION_LOGIT: f64 = 10.0;

/// Length of θ for `p` expanded design columns.
pub const fn theta_len(p: usize) -> usize {
    2 * p + 2 * N_REGIMES
}

/// Positions of `β_s` inside θ.
pub const fn coefficient_range(p: usize, regime: usize) -> Range<usize> {
    regime * p..(regime + 1) * p
}

/// Position of `σ_s²` inside θ.
pub const fn variance_index(p: usize, regime: usize) -> usize {
    N_REGIMES * p + regime
}

/// Position of the transition logit `z_ss` inside θ.
pub const fn logit_index(p: usize, regime: usize) -> usize {
    N_REGIMES * p + N_REGIMES + regime
}

/// Map an optimizer vector `u` to model-space θ.
///
/// - Coefficients are copied unchanged.
/// - `σ_s² = max(softplus(u_σ), variance_floor)`.
/// - `z_ss = clamp(u_z, −MAX_TRANSITION_LOGIT, MAX_TRANSITION_LOGIT)`.
///
/// # Errors
/// - `MSRError::ThetaLengthMismatch` when `u.len() != 2p + 4`.
/// - `MSRError::InvalidThetaInput` for the first non-finite entry.
/// - `MSRError::InvalidVarianceFloor` when the floor is not finite and `> 0`.
pub fn unconstrained_to_theta(
    u: ArrayView1<'_, f64>, p: usize, variance_floor: f64,
) -> MSRResult<Array1<f64>> {
    check_theta_shape(u, p)?;
    if !variance_floor.is_finite() || variance_floor <= 0.0 {
        return Err(MSRError::InvalidVarianceFloor { value: variance_floor });
    }
    let mut theta = u.to_owned();
    for regime in 0..N_REGIMES {
        let v = variance_index(p, regime);
        theta[v] = safe_softplus(u[v]).max(variance_floor);
        let z = logit_index(p, regime);
        theta[z] = u[z].clamp(-MAX_TRANSITION_LOGIT, MAX_TRANSITION_LOGIT);
    }
    Ok(theta)
}

/// Length and finiteness check shared by every θ / `u` entry point.
///
/// # Errors
/// - `MSRError::ThetaLengthMismatch` or `MSRError::InvalidThetaInput`.
pub fn check_theta_shape(theta: ArrayView1<'_, f64>, p: usize) -> MSRResult<()> {
    let expected = theta_len(p);
    if theta.len() != expected {
        return Err(MSRError::ThetaLengthMismatch { expected, actual: theta.len() });
    }
    match theta.iter().position(|v| !v.is_finite()) {
        Some(index) => Err(MSRError::InvalidThetaInput { index, value: theta[index] }),
        None => Ok(()),
    }
}

/// MSRParams — structured two-regime parameters.
///
/// Fields
/// ------
/// - `beta`: `Array2<f64>` of shape `(2, p)`; row `s` holds `β_s`.
/// - `variances`: `Array1<f64>` of length 2; `σ_s² > 0`.
/// - `stay_probs`: `Array1<f64>` of length 2; `p_ss ∈ (0, 1)`.
///
/// Notes
/// -----
/// - Construct through [`MSRParams::new`], [`MSRParams::from_theta`], or
///   [`MSRParams::from_unconstrained`] so the invariants hold.
#[derive(Debug, Clone, PartialEq)]
pub struct MSRParams {
    /// Regime coefficients, one row per regime.
    pub beta: Array2<f64>,
    /// Regime variances `(σ₀², σ₁²)`.
    pub variances: Array1<f64>,
    /// Stay probabilities `(p₀₀, p₁₁)`.
    pub stay_probs: Array1<f64>,
}

impl MSRParams {
    /// Build validated parameters from their structured parts.
    ///
    /// Errors
    /// ------
    /// - `MSRError::ThetaLengthMismatch` when `beta` is not `2 × p` with
    ///   `p >= 1`, or the other vectors are not of length 2 (reported
    ///   against the implied θ length).
    /// - `MSRError::InvalidThetaInput` for a non-finite coefficient (θ index).
    /// - `MSRError::NonPositiveVariance` for a variance that is not finite
    ///   and `> 0`.
    /// - `MSRError::InvalidProbability` for a stay probability outside
    ///   `(0, 1)`.
    ///
    /// Examples
    /// --------
    /// ```rust
    /// # use ndarray::array;
    /// # use rust_regimes::switching::core::params::MSRParams;
    /// let params = MSRParams::new(
    ///     array![[0.0, 1.0], [100.0, -1.0]],
    ///     array![0.01, 0.01],
    ///     array![0.95, 0.95],
    /// )
    /// .unwrap();
    /// assert_eq!(params.n_features(), 2);
    /// ```
    pub fn new(
        beta: Array2<f64>, variances: Array1<f64>, stay_probs: Array1<f64>,
    ) -> MSRResult<Self> {
        let p = beta.ncols();
        if beta.nrows() != N_REGIMES
            || p == 0
            || variances.len() != N_REGIMES
            || stay_probs.len() != N_REGIMES
        {
            return Err(MSRError::ThetaLengthMismatch {
                expected: theta_len(p.max(1)),
                actual: beta.len() + variances.len() + stay_probs.len(),
            });
        }
        if let Some(((regime, j), &value)) = beta.indexed_iter().find(|(_, v)| !v.is_finite()) {
            return Err(MSRError::InvalidThetaInput { index: regime * p + j, value });
        }
        for (regime, &value) in variances.iter().enumerate() {
            if !value.is_finite() || value <= 0.0 {
                return Err(MSRError::NonPositiveVariance { regime, value });
            }
        }
        for (regime, &value) in stay_probs.iter().enumerate() {
            if !(value > 0.0 && value < 1.0) {
                return Err(MSRError::InvalidProbability { regime, value });
            }
        }
        Ok(MSRParams { beta, variances, stay_probs })
    }

    /// Decode model-space θ for `p` design columns.
    ///
    /// # Errors
    /// - Length / finiteness errors from [`check_theta_shape`].
    /// - `MSRError::NonPositiveVariance` for a variance entry `<= 0`.
    pub fn from_theta(theta: ArrayView1<'_, f64>, p: usize) -> MSRResult<Self> {
        check_theta_shape(theta, p)?;
        let beta = theta.slice(s![..N_REGIMES * p]).to_owned().into_shape((N_REGIMES, p));
        let beta = beta.map_err(|_| MSRError::ThetaLengthMismatch {
            expected: theta_len(p),
            actual: theta.len(),
        })?;
        let variances = Array1::from_shape_fn(N_REGIMES, |s| theta[variance_index(p, s)]);
        let stay_probs =
            Array1::from_shape_fn(N_REGIMES, |s| stay_probability(theta[logit_index(p, s)]));
        MSRParams::new(beta, variances, stay_probs)
    }

    /// Decode an optimizer vector `u`; see [`unconstrained_to_theta`].
    ///
    /// # Errors
    /// - Errors from [`unconstrained_to_theta`] and [`MSRParams::from_theta`].
    pub fn from_unconstrained(
        u: ArrayView1<'_, f64>, p: usize, variance_floor: f64,
    ) -> MSRResult<Self> {
        let theta = unconstrained_to_theta(u, p, variance_floor)?;
        MSRParams::from_theta(theta.view(), p)
    }

    /// Encode as model-space θ (probabilities back to logits).
    pub fn to_theta(&self) -> Array1<f64> {
        let p = self.n_features();
        let mut theta = Array1::<f64>::zeros(theta_len(p));
        for regime in 0..N_REGIMES {
            theta.slice_mut(s![coefficient_range(p, regime)]).assign(&self.beta.row(regime));
            theta[variance_index(p, regime)] = self.variances[regime];
            theta[logit_index(p, regime)] = safe_logit(self.stay_probs[regime]);
        }
        theta
    }

    /// Encode as an optimizer vector `u` (variances through softplus⁻¹).
    ///
    /// Logits beyond `±MAX_TRANSITION_LOGIT` are clipped so that
    /// `from_unconstrained(to_unconstrained())` is stable.
    pub fn to_unconstrained(&self) -> Array1<f64> {
        let p = self.n_features();
        let mut u = self.to_theta();
        for regime in 0..N_REGIMES {
            let v = variance_index(p, regime);
            u[v] = safe_softplus_inv(u[v]);
            let z = logit_index(p, regime);
            u[z] = u[z].clamp(-MAX_TRANSITION_LOGIT, MAX_TRANSITION_LOGIT);
        }
        u
    }

    /// Number of expanded design columns `p`.
    pub fn n_features(&self) -> usize {
        self.beta.ncols()
    }

    /// Coefficients `β_s` of one regime.
    ///
    /// # Errors
    /// - `MSRError::InvalidRegime` for `regime >= 2`.
    pub fn coefficients(&self, regime: usize) -> MSRResult<ArrayView1<'_, f64>> {
        if regime >= N_REGIMES {
            return Err(MSRError::InvalidRegime { regime });
        }
        Ok(self.beta.row(regime))
    }

    /// Row-stochastic transition matrix `[[p₀₀, 1 − p₀₀], [1 − p₁₁, p₁₁]]`.
    pub fn transition_matrix(&self) -> Array2<f64> {
        transition_from_probabilities(self.stay_probs[0], self.stay_probs[1])
    }

    /// Stay probabilities `(p₀₀, p₁₁)`.
    pub fn stay_probabilities(&self) -> Array1<f64> {
        self.stay_probs.clone()
    }

    /// Expected regime durations `1 / (1 − p_ss)`.
    pub fn expected_durations(&self) -> Array1<f64> {
        self.stay_probs.mapv(|p| 1.0 / (1.0 - p))
    }
}
