//! Hamilton filter for two-regime switching regressions.
//!
//! Purpose
//! -------
//! Run the forward recursion that turns a model-space parameter vector θ and
//! an expanded design into filtered regime probabilities, one-step-ahead
//! predicted probabilities, regime densities, and the conditional densities
//! that make up the likelihood.
//!
//! Key behaviors
//! -------------
//! - **Seed (t = 0)**: `filtered[0] = π`, the stationary distribution of `P`
//!   (data-free); `predicted[0] = Pᵀ π`; `densities[0] = (η₀, η₁)` at
//!   observation 0.
//! - **Step (t ≥ 1)**: with `η_t` the densities of observation `t`,
//!   `w = predicted[t−1] ⊙ η_t`, `cond_density[t] = Σ w`,
//!   `filtered[t] = w / cond_density[t]`, `predicted[t] = Pᵀ filtered[t]`.
//! - **Underflow**: when `Σ w` is zero or not finite, `cond_density[t] = 0`
//!   and `filtered[t] = predicted[t−1]`, so every row stays a distribution
//!   and the log-likelihood becomes `−∞` downstream.
//!
//! Invariants & assumptions
//! ------------------------
//! - Each row of `filtered` and `predicted` is non-negative and sums to one
//!   up to rounding.
//! - `cond_density[0]` is `0.0` and unused; the likelihood averages over
//!   `t = 1..n−1`.
//! - Every call allocates its own buffers; the filter holds no state between
//!   calls.
//!
//! Conventions
//! -----------
//! - Column `s` of every matrix refers to regime `s`.
//! - θ is in model space (variances, not softplus coordinates); transition
//!   logits are read as given.
//!
//! Testing notes
//! -------------
//! - Unit tests pin the index alignment against hand-computed n = 2 and
//!   n = 3 recursions, and cover the distribution invariants, the
//!   identical-regimes case, underflow, and structural errors.
use crate::switching::{
    core::{
        density::regime_densities,
        params::{check_theta_shape, logit_index},
        transition::{N_REGIMES, propagate, stationary_distribution, transition_matrix},
    },
    errors::{MSRError, MSRResult},
};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

/// FilterOutput — everything produced by one pass of the Hamilton filter.
///
/// Fields
/// ------
/// - `filtered`: `(n, 2)`; row `t` is `Pr(S_t | y_0..y_t)` (row 0 is the
///   stationary seed).
/// - `predicted`: `(n, 2)`; row `t` is `Pr(S_{t+1} | y_0..y_t) = Pᵀ filtered[t]`.
/// - `densities`: `(n, 2)`; entry `(t, s)` is `φ(y_t; x_t·β_s, σ_s²)`.
/// - `cond_density`: length `n`; entry `t ≥ 1` is `f(y_t | y_0..y_{t−1})`,
///   entry 0 is `0.0`.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterOutput {
    pub filtered: Array2<f64>,
    pub predicted: Array2<f64>,
    pub densities: Array2<f64>,
    pub cond_density: Array1<f64>,
}

impl FilterOutput {
    /// Number of filtered time steps.
    pub fn n_obs(&self) -> usize {
        self.cond_density.len()
    }

    /// Regime distribution for the period after the sample, `predicted[n−1]`.
    pub fn next_period_probabilities(&self) -> ArrayView1<'_, f64> {
        self.predicted.row(self.predicted.nrows() - 1)
    }
}

/// Run the Hamilton filter over `(x, y)` at model-space θ.
///
/// Parameters
/// ----------
/// - `x`: expanded design `(n, p)`.
/// - `y`: responses, length `n`.
/// - `theta`: model-space θ of length `2p + 4`.
///
/// Errors
/// ------
/// - `MSRError::EmptyDesign` when `x` has no rows or no columns.
/// - `MSRError::LengthMismatch` when `x.nrows() != y.len()`.
/// - `MSRError::ThetaLengthMismatch` / `MSRError::InvalidThetaInput` for a
///   malformed θ.
/// - `MSRError::NonPositiveVariance` when a variance is not finite and `> 0`.
/// - `MSRError::SingularMatrix` when the stationary seed cannot be solved.
///
/// Examples
/// --------
/// ```rust
/// # use ndarray::array;
/// # use rust_regimes::switching::core::filter::hamilton_filter;
/// let x = array![[1.0], [1.0], [1.0]];
/// let y = array![0.0, 0.1, 5.0];
/// let theta = array![0.0, 5.0, 1.0, 1.0, 2.0, 2.0];
/// let out = hamilton_filter(x.view(), y.view(), theta.view()).unwrap();
/// assert!(out.filtered[[1, 0]] > 0.5 && out.filtered[[2, 1]] > 0.5);
/// ```
pub fn hamilton_filter(
    x: ArrayView2<'_, f64>, y: ArrayView1<'_, f64>, theta: ArrayView1<'_, f64>,
) -> MSRResult<FilterOutput> {
    let (n, p) = x.dim();
    if n == 0 || p == 0 {
        return Err(MSRError::EmptyDesign);
    }
    if n != y.len() {
        return Err(MSRError::LengthMismatch { rows: n, responses: y.len() });
    }
    check_theta_shape(theta, p)?;

    let trans = transition_matrix(theta[logit_index(p, 0)], theta[logit_index(p, 1)]);
    let mut filtered = Array2::<f64>::zeros((n, N_REGIMES));
    let mut predicted = Array2::<f64>::zeros((n, N_REGIMES));
    let mut densities = Array2::<f64>::zeros((n, N_REGIMES));
    let mut cond_density = Array1::<f64>::zeros(n);

    let seed = stationary_distribution(trans.view())?;
    predicted.row_mut(0).assign(&propagate(trans.view(), seed.view()));
    filtered.row_mut(0).assign(&seed);
    let eta0 = regime_densities(x.row(0), y[0], theta)?;
    densities.row_mut(0).assign(&ArrayView1::from(&eta0[..]));

    for t in 1..n {
        let eta = regime_densities(x.row(t), y[t], theta)?;
        densities.row_mut(t).assign(&ArrayView1::from(&eta[..]));

        let prior = predicted.row(t - 1).to_owned();
        let weights = Array1::from_shape_fn(N_REGIMES, |s| prior[s] * eta[s]);
        let total = weights.sum();
        let posterior = if total > 0.0 && total.is_finite() {
            cond_density[t] = total;
            weights / total
        } else {
            prior
        };
        predicted.row_mut(t).assign(&propagate(trans.view(), posterior.view()));
        filtered.row_mut(t).assign(&posterior);
    }

    Ok(FilterOutput { filtered, predicted, densities, cond_density })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::numerical_stability::transformations::safe_logit;
    use approx::assert_abs_diff_eq;
    use ndarray::array;
    use std::f64::consts::PI;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Exact index alignment on n = 2 and n = 3 against hand recursions.
    // - Row-sum and range invariants on a longer series.
    // - Identical regimes (non-identified) staying at 0.5 / 0.5.
    // - Saturated transition logits (stay probabilities within rounding of
    //   one).
    // - Density underflow and structural errors.
    // -------------------------------------------------------------------------

    fn phi(y: f64, mean: f64, var: f64) -> f64 {
        (-(y - mean).powi(2) / (2.0 * var)).exp() / (2.0 * PI * var).sqrt()
    }

    /// θ for an intercept-only design: means (0, 1), unit variances,
    /// stay probabilities (0.9, 0.7).
    fn intercept_theta() -> Array1<f64> {
        array![0.0, 1.0, 1.0, 1.0, safe_logit(0.9), safe_logit(0.7)]
    }

    #[test]
    // Purpose
    // -------
    // Pin the seed and the first two recursion steps.
    //
    // Given
    // -----
    // - Intercept-only design, y = (0.3, 1.0, -0.4), θ = `intercept_theta()`.
    // - P = [[0.9, 0.1], [0.3, 0.7]], stationary π = (0.75, 0.25).
    //
    // Expect
    // ------
    // - filtered[0] = π, predicted[0] = Pᵀπ = π.
    // - cond[1] = π·η(y₁), filtered[1] ∝ π ⊙ η(y₁).
    // - cond[2] = (Pᵀ filtered[1])·η(y₂), and cond[0] = 0.
    fn recursion_matches_hand_computation() {
        // Arrange
        let x = array![[1.0], [1.0], [1.0]];
        let y = array![0.3, 1.0, -0.4];
        let theta = intercept_theta();
        let pi = [0.75, 0.25];

        // Act
        let out = hamilton_filter(x.view(), y.view(), theta.view()).expect("filter");

        // Assert: seed
        assert_abs_diff_eq!(out.filtered[[0, 0]], pi[0], epsilon = 1e-10);
        assert_abs_diff_eq!(out.predicted[[0, 0]], pi[0], epsilon = 1e-10);
        assert_abs_diff_eq!(out.densities[[0, 1]], phi(0.3, 1.0, 1.0), epsilon = 1e-14);
        assert_eq!(out.cond_density[0], 0.0);

        // Assert: t = 1
        let w1 = [pi[0] * phi(1.0, 0.0, 1.0), pi[1] * phi(1.0, 1.0, 1.0)];
        let c1 = w1[0] + w1[1];
        assert_abs_diff_eq!(out.cond_density[1], c1, epsilon = 1e-10);
        assert_abs_diff_eq!(out.filtered[[1, 0]], w1[0] / c1, epsilon = 1e-10);

        // Assert: t = 2
        let f1 = [w1[0] / c1, w1[1] / c1];
        let pred1 = [0.9 * f1[0] + 0.3 * f1[1], 0.1 * f1[0] + 0.7 * f1[1]];
        assert_abs_diff_eq!(out.predicted[[1, 0]], pred1[0], epsilon = 1e-10);
        let c2 = pred1[0] * phi(-0.4, 0.0, 1.0) + pred1[1] * phi(-0.4, 1.0, 1.0);
        assert_abs_diff_eq!(out.cond_density[2], c2, epsilon = 1e-10);
    }

    #[test]
    // Purpose
    // -------
    // Filtered and predicted rows are probability distributions.
    //
    // Given
    // -----
    // - A 60-step series alternating blocks around 0 and 4, slope design.
    //
    // Expect
    // ------
    // - Every row sums to 1 within 1e-12 and lies in [0, 1].
    fn rows_are_distributions() {
        let n = 60;
        let x = Array2::from_shape_fn((n, 2), |(t, j)| if j == 0 { 1.0 } else { t as f64 / 10.0 });
        let y = Array1::from_shape_fn(n, |t| if (t / 15) % 2 == 0 { 0.1 * t as f64 } else { 4.0 });
        let theta = array![0.0, 1.0, 4.0, 0.0, 0.5, 0.5, 2.0, 2.0];

        let out = hamilton_filter(x.view(), y.view(), theta.view()).expect("filter");

        for m in [&out.filtered, &out.predicted] {
            for row in m.rows() {
                assert_abs_diff_eq!(row.sum(), 1.0, epsilon = 1e-12);
                assert!(row.iter().all(|&v| (0.0..=1.0).contains(&v)));
            }
        }
        assert!(out.cond_density.iter().skip(1).all(|&c| c > 0.0));
    }

    #[test]
    // Purpose
    // -------
    // With identical regimes the data carry no regime information.
    //
    // Given
    // -----
    // - β₀ = β₁, σ₀² = σ₁², p₀₀ = p₁₁ = 0.9.
    //
    // Expect
    // ------
    // - Every filtered row equals (0.5, 0.5).
    fn identical_regimes_stay_uninformative() {
        let x = Array2::from_shape_fn((25, 1), |(t, _)| t as f64);
        let y = Array1::from_shape_fn(25, |t| (t as f64).sin());
        let theta = array![0.2, 0.2, 1.5, 1.5, safe_logit(0.9), safe_logit(0.9)];

        let out = hamilton_filter(x.view(), y.view(), theta.view()).expect("filter");

        for row in out.filtered.rows() {
            assert_abs_diff_eq!(row[0], 0.5, epsilon = 1e-12);
            assert_abs_diff_eq!(row[1], 0.5, epsilon = 1e-12);
        }
    }

    #[test]
    // Purpose
    // -------
    // Large transition logits are valid parameters and the seed still
    // solves.
    //
    // Given
    // -----
    // - Intercept-only design, means (0, 1), unit variances.
    // - Equal logits z ∈ {18, 20, 40}.
    //
    // Expect
    // ------
    // - `Ok` with filtered[0] = (0.5, 0.5), distribution rows, and positive
    //   conditional densities after t = 0.
    fn saturated_logits_still_filter() {
        let x = array![[1.0], [1.0], [1.0]];
        let y = array![0.2, 0.9, -0.1];
        for z in [18.0, 20.0, 40.0] {
            let theta = array![0.0, 1.0, 1.0, 1.0, z, z];

            let out = hamilton_filter(x.view(), y.view(), theta.view())
                .unwrap_or_else(|err| panic!("logit {z}: {err}"));

            assert_abs_diff_eq!(out.filtered[[0, 0]], 0.5, epsilon = 1e-10);
            assert_abs_diff_eq!(out.filtered[[0, 1]], 0.5, epsilon = 1e-10);
            for row in out.filtered.rows() {
                assert_abs_diff_eq!(row.sum(), 1.0, epsilon = 1e-12);
            }
            assert!(out.cond_density.iter().skip(1).all(|&c| c > 0.0));
        }
    }

    #[test]
    // Purpose
    // -------
    // Underflow keeps the prior instead of dividing by zero.
    //
    // Given
    // -----
    // - Tiny variances and an observation 1e6 away from both regime means.
    //
    // Expect
    // ------
    // - cond[1] = 0 and filtered[1] = predicted[0].
    fn underflow_carries_prior_forward() {
        let x = array![[1.0], [1.0]];
        let y = array![0.0, 1e6];
        let theta = array![0.0, 1.0, 1e-4, 1e-4, 0.0, 0.0];

        let out = hamilton_filter(x.view(), y.view(), theta.view()).expect("filter");

        assert_eq!(out.cond_density[1], 0.0);
        assert_eq!(out.filtered.row(1), out.predicted.row(0));
    }

    #[test]
    // Purpose
    // -------
    // Structural problems are errors, not numbers.
    //
    // Given
    // -----
    // - Mismatched lengths; NaN in θ; zero variance.
    //
    // Expect
    // ------
    // - `LengthMismatch`, `InvalidThetaInput`, `NonPositiveVariance`.
    fn structural_errors_propagate() {
        let x = array![[1.0], [1.0]];
        let theta = intercept_theta();
        assert_eq!(
            hamilton_filter(x.view(), array![0.0].view(), theta.view()),
            Err(MSRError::LengthMismatch { rows: 2, responses: 1 })
        );

        let mut nan = theta.clone();
        nan[4] = f64::NAN;
        assert!(matches!(
            hamilton_filter(x.view(), array![0.0, 1.0].view(), nan.view()),
            Err(MSRError::InvalidThetaInput { index: 4, .. })
        ));

        let mut zero = theta;
        zero[3] = 0.0;
        assert_eq!(
            hamilton_filter(x.view(), array![0.0, 1.0].view(), zero.view()),
            Err(MSRError::NonPositiveVariance { regime: 1, value: 0.0 })
        );
    }
}
