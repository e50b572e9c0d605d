//! Two-state Markov chain: transition matrix, stationary distribution, and
//! one-step propagation of regime probabilities.
//!
//! Purpose
//! -------
//! Turn the two unconstrained transition logits of the parameter vector into
//! a row-stochastic matrix `P`, seed the filter with the stationary
//! distribution of `P`, and push regime probabilities one step ahead.
//!
//! Key behaviors
//! -------------
//! - [`stay_probability`] maps a logit to `(0, 1)` with `safe_logistic` and
//!   clamps to `[LOGIT_EPS, 1 − LOGIT_EPS]`, so the chain is never absorbing.
//! - [`transition_matrix`] returns `[[p₀₀, 1 − p₀₀], [1 − p₁₁, p₁₁]]`.
//! - [`stationary_distribution`] solves `[(I − Pᵀ); 1ᵀ] π = [0; 0; 1]` with
//!   the normal-equations solver, giving `πᵀP = πᵀ` and `Σπ = 1`.
//! - [`propagate`] computes `Pᵀ h`, the regime distribution one step after
//!   `h`.
//!
//! Invariants & assumptions
//! ------------------------
//! - Rows of `P` sum to one and every entry lies strictly inside `(0, 1)`.
//! - `P[i, j] = Pr(S_{t+1} = j | S_t = i)`.
use crate::{
    optimization::numerical_stability::transformations::{LOGIT_EPS, safe_logistic},
    switching::{
        core::linalg::linear_solve,
        errors::{MSRError, MSRResult},
    },
};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, array};

/// Number of regimes; the model is two-state throughout.
pub const N_REGIMES: usize = 2;

/// Logistic map from an unconstrained logit to a stay probability.
///
/// The result is clamped to `[LOGIT_EPS, 1 − LOGIT_EPS]`.
pub fn stay_probability(z: f64) -> f64 {
    safe_logistic(z).clamp(LOGIT_EPS, 1.0 - LOGIT_EPS)
}

/// Transition matrix built from the two transition logits `(z₀₀, z₁₁)`.
///
/// # Examples
/// ```rust
/// # use rust_regimes::switching::core::transition::transition_matrix;
/// let p = transition_matrix(0.0, 0.0);
/// assert!((p[[0, 0]] - 0.5).abs() < 1e-12);
/// assert!((p.row(1).sum() - 1.0).abs() < 1e-12);
/// ```
pub fn transition_matrix(z00: f64, z11: f64) -> Array2<f64> {
    transition_from_probabilities(stay_probability(z00), stay_probability(z11))
}

/// Transition matrix built directly from stay probabilities `(p₀₀, p₁₁)`.
///
/// Callers are responsible for passing values in `(0, 1)`; parameter
/// constructors validate this before reaching here.
pub fn transition_from_probabilities(p00: f64, p11: f64) -> Array2<f64> {
    array![[p00, 1.0 - p00], [1.0 - p11, p11]]
}

/// Stationary distribution `π` of a 2×2 row-stochastic matrix.
///
/// Builds the stacked system
///
/// ```text
/// [ I − Pᵀ ]       [ 0 ]
/// [  1  1  ] π  =  [ 0 ]
///                  [ 1 ]
/// ```
///
/// and solves it through [`linear_solve`]. The two homogeneous rows are
/// written with the leave probabilities `p₀₁ = 1 − p₀₀` and `p₁₀ = 1 − p₁₁`
/// and divided by the larger of them, which leaves `π` unchanged and keeps
/// the system well conditioned for stay probabilities near one. Rounding
/// can still leave tiny negative entries; the result is clipped at zero and
/// renormalized so it is always a distribution.
///
/// # Errors
/// - `MSRError::SingularMatrix` if `p` is not 2×2, if both leave
///   probabilities are zero (absorbing chain), or if the stacked system is
///   numerically rank deficient.
pub fn stationary_distribution(p: ArrayView2<'_, f64>) -> MSRResult<Array1<f64>> {
    let (rows, cols) = p.dim();
    if rows != N_REGIMES || cols != N_REGIMES {
        return Err(MSRError::SingularMatrix { reason: "transition matrix must be 2×2" });
    }
    // Rows of I − Pᵀ scaled so the larger leave probability is one.
    let (leave0, leave1) = (p[[0, 1]], p[[1, 0]]);
    let rate = leave0.max(leave1);
    if !(rate > 0.0) {
        return Err(MSRError::SingularMatrix { reason: "both regimes are absorbing" });
    }
    let (q0, q1) = (leave0 / rate, leave1 / rate);
    let mut a = Array2::<f64>::ones((N_REGIMES + 1, N_REGIMES));
    a[[0, 0]] = q0;
    a[[0, 1]] = -q1;
    a[[1, 0]] = -q0;
    a[[1, 1]] = q1;
    let mut b = Array1::<f64>::zeros(N_REGIMES + 1);
    b[N_REGIMES] = 1.0;
    let pi = linear_solve(a.view(), b.view())?.mapv(|v| v.max(0.0));
    let total = pi.sum();
    if !(total > 0.0) {
        return Err(MSRError::SingularMatrix { reason: "stationary solve has no mass" });
    }
    Ok(pi / total)
}

/// One-step propagation `Pᵀ h` of a regime distribution.
pub fn propagate(p: ArrayView2<'_, f64>, h: ArrayView1<'_, f64>) -> Array1<f64> {
    p.t().dot(&h)
}
