//! Numerical stability utilities.
//!
//! Provides safe implementations of the nonlinear transforms used to map
//! unconstrained optimizer coordinates into model space. The functions here
//! follow guarded strategies similar to those in major ML libraries (e.g.
//! PyTorch, TensorFlow), using explicit cutoffs (`x > 20.0`) to keep `f64`
//! arithmetic in a well-conditioned regime.
//!
//! # Provided items
//! - [`LOGIT_EPS`]: distance kept between a stay probability and the
//!   boundaries `{0, 1}`.
//! - [`EIGEN_EPS`]: eigenvalue cutoff used by pseudoinverse-based inference.
//! - [`GENERAL_TOL`]: generic absolute tolerance for probability checks.
//! - [`safe_logistic(x)`]: overflow-free `1 / (1 + exp(-x))`, ℝ → (0, 1).
//! - [`safe_logit(p)`]: inverse of the logistic map with clamping.
//! - [`safe_softplus(x)`]: stable version of `ln(1 + exp(x))`,
//!   mapping ℝ → (0, ∞) without overflow.
//! - [`safe_softplus_inv(x)`]: inverse of softplus, mapping
//!   (0, ∞) → ℝ without catastrophic cancellation.

/// Distance kept between a probability and the boundaries `{0, 1}`.
///
/// The logistic map saturates to exactly `1.0` in `f64` once `x ≳ 37`, so
/// probabilities derived from logits are clamped to
/// `[LOGIT_EPS, 1 − LOGIT_EPS]` to keep the Markov chain ergodic.
pub const LOGIT_EPS: f64 = 1e-12;

/// Eigenvalues at or below this value are treated as numerically zero when
/// building pseudoinverses of information matrices.
pub const EIGEN_EPS: f64 = 1e-10;

/// Generic absolute tolerance for probability-simplex checks.
pub const GENERAL_TOL: f64 = 1e-10;

/// Numerically stable logistic (sigmoid): `σ(x) = 1 / (1 + exp(-x))`.
///
/// Evaluates the branch that never exponentiates a large positive number:
///
/// - For `x ≥ 0`, `1 / (1 + exp(-x))`.
/// - For `x < 0`, `exp(x) / (1 + exp(x))`.
///
/// # Parameters
/// - `x`: real input
///
/// # Returns
/// - `σ(x)` in `[0, 1]`; strictly inside for moderate `|x|`.
pub fn safe_logistic(x: f64) -> f64 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}

/// Inverse of the logistic map: `logit(p) = ln(p / (1 − p))`.
///
/// `p` is first clamped into `[LOGIT_EPS, 1 − LOGIT_EPS]` so the result is
/// always finite. Uses `ln_1p(-p)` for the denominator to keep precision
/// when `p` is small.
///
/// # Parameters
/// - `p`: probability in `[0, 1]`.
///
/// # Returns
/// - `z` such that `safe_logistic(z) ≈ p`.
pub fn safe_logit(p: f64) -> f64 {
    let p = p.clamp(LOGIT_EPS, 1.0 - LOGIT_EPS);
    p.ln() - (-p).ln_1p()
}

/// Numerically stable softplus: `softplus(x) = ln(1 + exp(x))`.
///
/// Computes softplus without overflow for large positive `x` and
/// with good precision for large negative `x`. This implementation
/// uses a simple piecewise guard:
///
/// - For sufficiently large `x`, `softplus(x) ≈ x + ln1p(exp(-x)) ≈ x`.
/// - Otherwise, it falls back to `ln1p(exp(x))`.
///
/// # Parameters
/// - `x`: real input
///
/// # Returns
/// - `softplus(x)` as `f64`.
pub fn safe_softplus(x: f64) -> f64 {
    if x > 20.0 { x } else { x.exp().ln_1p() }
}

/// Stable inverse of softplus on `(0, ∞)`: solves for `t` in
/// `softplus(t) = x`, returning `t = ln(exp(x) - 1)`.
///
/// - For sufficiently large `x`, `ln(exp(x) - 1) ≈ x`.
/// - Otherwise, it uses `ln(expm1(x))`.
///
/// # Parameters
/// - `x`: a positive real (the softplus output), must be finite and `> 0`.
///
/// # Returns
/// - `t` such that `softplus(t) = x`.
pub fn safe_softplus_inv(x: f64) -> f64 {
    if x > 20.0 { x } else { x.exp_m1().ln() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Agreement of the guarded transforms with naïve formulas on safe grids.
    // - Tail behavior of the logistic map (no NaN / overflow).
    // - Round trips logistic ∘ logit and softplus ∘ softplus⁻¹.
    //
    // They intentionally DO NOT cover:
    // - How the transforms are wired into parameter mappings (covered in
    //   switching::core::params).
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // `safe_logistic` matches the textbook formula on a moderate grid.
    //
    // Given
    // -----
    // - x ∈ {-5, -1, 0, 1, 5}.
    //
    // Expect
    // ------
    // - |safe_logistic(x) − 1/(1+e^{-x})| < 1e-14.
    fn safe_logistic_matches_naive_formula() {
        for &x in &[-5.0_f64, -1.0, 0.0, 1.0, 5.0] {
            let naive = 1.0 / (1.0 + (-x).exp());
            assert_relative_eq!(safe_logistic(x), naive, epsilon = 1e-14);
        }
    }

    #[test]
    // Purpose
    // -------
    // The logistic map stays finite and inside [0, 1] in the far tails.
    //
    // Given
    // -----
    // - x = ±1000.
    //
    // Expect
    // ------
    // - Outputs are finite and within [0, 1]; σ(−x) = 1 − σ(x) holds.
    fn safe_logistic_is_finite_in_tails() {
        let hi = safe_logistic(1000.0);
        let lo = safe_logistic(-1000.0);
        assert!(hi.is_finite() && lo.is_finite());
        assert!((0.0..=1.0).contains(&hi));
        assert!((0.0..=1.0).contains(&lo));
        assert_relative_eq!(safe_logistic(-2.5), 1.0 - safe_logistic(2.5), epsilon = 1e-15);
    }

    #[test]
    // Purpose
    // -------
    // `safe_logit` inverts `safe_logistic` and never returns ±∞.
    //
    // Given
    // -----
    // - p ∈ {0.05, 0.5, 0.95} plus the boundary values 0 and 1.
    //
    // Expect
    // ------
    // - logistic(logit(p)) ≈ p for interior p; logit(0), logit(1) finite.
    fn safe_logit_round_trips_and_clamps() {
        for &p in &[0.05_f64, 0.5, 0.95] {
            assert_relative_eq!(safe_logistic(safe_logit(p)), p, epsilon = 1e-12);
        }
        assert_eq!(safe_logit(0.5), 0.0);
        assert!(safe_logit(0.0).is_finite());
        assert!(safe_logit(1.0).is_finite());
    }

    #[test]
    // Purpose
    // -------
    // softplus and its inverse agree with naïve formulas and round-trip.
    //
    // Given
    // -----
    // - x ∈ {0.01, 0.5, 3.0, 25.0}.
    //
    // Expect
    // ------
    // - softplus(softplus⁻¹(x)) ≈ x.
    fn softplus_round_trips() {
        for &x in &[0.01_f64, 0.5, 3.0, 25.0] {
            assert_relative_eq!(safe_softplus(safe_softplus_inv(x)), x, max_relative = 1e-12);
        }
        assert_relative_eq!(safe_softplus(1.0), (1.0_f64.exp()).ln_1p(), epsilon = 1e-15);
    }
}
