//! Start-value policies for Markov-switching estimation.
//!
//! Purpose
//! -------
//! Decide where the optimizer starts. The likelihood of a switching
//! regression is multimodal, so the policy is an explicit part of the model
//! configuration rather than a hard-coded guess.
//!
//! Key behaviors
//! -------------
//! - [`Init::Heuristic`]: a fixed ramp of coefficients with data-derived
//!   variances (`var(y)` and `var(X̃)` over all design entries, both with
//!   `ddof = 1`).
//! - [`Init::TimeSplit`]: OLS on the first and second halves of the sample.
//! - [`Init::ResidualSplit`]: pooled OLS, then OLS on the observations with
//!   non-positive and positive residuals.
//! - [`Init::Fixed`]: caller-supplied parameters.
//! - [`Init::MultiStart`]: a list of policies; the estimator fits from each
//!   and keeps the best.
//!
//! Invariants & assumptions
//! ------------------------
//! - Every data-derived start uses stay probabilities `(0.5, 0.5)` and
//!   variances floored at [`MIN_START_VARIANCE`].
//! - Starts are built on the *expanded* design, so coefficient vectors have
//!   the expanded width `p`.
//! - OLS-based policies fail with `MSRError::SingularMatrix` when a subsample
//!   is shorter than `p` or rank deficient; multi-start skips such starts.
//!
//! Testing notes
//! -------------
//! - Unit tests check each policy on small designs with known structure and
//!   the flattening of nested multi-start lists.
use crate::switching::{
    core::{data::MSRData, linalg::linear_solve, params::MSRParams, transition::N_REGIMES},
    errors::{MSRError, MSRResult},
};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};

/// Smallest variance handed to the optimizer as a start value.
pub const MIN_START_VARIANCE: f64 = 1e-6;

/// Stay probability used by every data-derived start.
pub const START_STAY_PROBABILITY: f64 = 0.5;

/// Init — start-value policy for the optimizer.
#[derive(Debug, Clone, PartialEq)]
pub enum Init {
    /// Ramp coefficients `β₀[k] = 0.2 + 0.1k`, `β₁[k] = 0.4 + 0.2k`,
    /// variances `(var(y), var(X̃))`.
    Heuristic,
    /// OLS on `[0, n/2)` for regime 0 and `[n/2, n)` for regime 1.
    TimeSplit,
    /// OLS on residual-sign subsamples of a pooled OLS fit.
    ResidualSplit,
    /// Start from the given parameters.
    Fixed(MSRParams),
    /// Fit from each policy in turn and keep the highest likelihood.
    MultiStart(Vec<Init>),
}

impl Default for Init {
    /// `MultiStart([TimeSplit, ResidualSplit, Heuristic])`.
    fn default() -> Self {
        Init::multi_start()
    }
}

impl Init {
    /// The default multi-start list: time split, residual split, heuristic.
    pub fn multi_start() -> Self {
        Init::MultiStart(vec![Init::TimeSplit, Init::ResidualSplit, Init::Heuristic])
    }

    /// Flatten into the single-start policies to try, in order.
    ///
    /// Nested `MultiStart` lists are expanded in place.
    pub fn candidates(&self) -> Vec<Init> {
        match self {
            Init::MultiStart(list) => list.iter().flat_map(Init::candidates).collect(),
            single => vec![single.clone()],
        }
    }

    /// Build start parameters on the expanded data.
    ///
    /// For `MultiStart`, the first candidate that builds is returned.
    ///
    /// # Errors
    /// - `MSRError::ThetaLengthMismatch` when `Fixed` parameters have a
    ///   different width than the design.
    /// - `MSRError::SingularMatrix` from the OLS fits.
    /// - `MSRError::InsufficientObservations` for an empty `MultiStart`.
    pub fn build_start(&self, data: &MSRData) -> MSRResult<MSRParams> {
        let p = data.n_features();
        match self {
            Init::Heuristic => heuristic_start(data),
            Init::TimeSplit => {
                let mid = data.n_obs() / 2;
                let first: Vec<usize> = (0..mid).collect();
                let second: Vec<usize> = (mid..data.n_obs()).collect();
                split_start(data, &first, &second)
            }
            Init::ResidualSplit => {
                let (beta, _) = ols(data.x.view(), data.y.view())?;
                let resid = &data.y - &data.x.dot(&beta);
                let (low, high): (Vec<usize>, Vec<usize>) =
                    (0..data.n_obs()).partition(|&t| resid[t] <= 0.0);
                split_start(data, &low, &high)
            }
            Init::Fixed(params) => {
                if params.n_features() != p {
                    return Err(MSRError::ThetaLengthMismatch {
                        expected: 2 * p + 2 * N_REGIMES,
                        actual: params.to_theta().len(),
                    });
                }
                Ok(params.clone())
            }
            Init::MultiStart(_) => {
                let mut last_err = MSRError::InsufficientObservations { needed: 1, actual: 0 };
                for candidate in self.candidates() {
                    match candidate.build_start(data) {
                        Ok(params) => return Ok(params),
                        Err(err) => last_err = err,
                    }
                }
                Err(last_err)
            }
        }
    }
}

// ---- Helper methods ----

fn heuristic_start(data: &MSRData) -> MSRResult<MSRParams> {
    let p = data.n_features();
    let beta = Array2::from_shape_fn((N_REGIMES, p), |(s, k)| {
        let k = k as f64;
        if s == 0 { 0.2 + 0.1 * k } else { 0.4 + 0.2 * k }
    });
    let var_y = data.y.var(1.0);
    let var_x = data.x.var(1.0);
    let variances = Array1::from(vec![floor_variance(var_y), floor_variance(var_x)]);
    MSRParams::new(beta, variances, Array1::from_elem(N_REGIMES, START_STAY_PROBABILITY))
}

fn split_start(data: &MSRData, rows0: &[usize], rows1: &[usize]) -> MSRResult<MSRParams> {
    let p = data.n_features();
    let mut beta = Array2::<f64>::zeros((N_REGIMES, p));
    let mut variances = Array1::<f64>::zeros(N_REGIMES);
    for (s, rows) in [rows0, rows1].into_iter().enumerate() {
        let x = data.x.select(Axis(0), rows);
        let y = data.y.select(Axis(0), rows);
        let (coef, var) = ols(x.view(), y.view())?;
        beta.row_mut(s).assign(&coef);
        variances[s] = var;
    }
    MSRParams::new(beta, variances, Array1::from_elem(N_REGIMES, START_STAY_PROBABILITY))
}

/// OLS coefficients and floored residual variance `SSR / max(m − p, 1)`.
fn ols(x: ArrayView2<'_, f64>, y: ArrayView1<'_, f64>) -> MSRResult<(Array1<f64>, f64)> {
    let beta = linear_solve(x, y)?;
    let resid = &y - &x.dot(&beta);
    let dof = x.nrows().saturating_sub(x.ncols()).max(1) as f64;
    Ok((beta, floor_variance(resid.dot(&resid) / dof)))
}

fn floor_variance(v: f64) -> f64 {
    if v.is_finite() { v.max(MIN_START_VARIANCE) } else { MIN_START_VARIANCE }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - The heuristic ramp and its data-derived variances.
    // - Time-split and residual-split OLS starts on noiseless piecewise data.
    // - Fixed starts (width check) and multi-start flattening / fallback.
    // -------------------------------------------------------------------------

    /// Intercept + slope design on t = 0..n with a break at n/2:
    /// y = t before the break, y = 100 − t after.
    fn broken_line(n: usize) -> MSRData {
        let x = Array2::from_shape_fn((n, 2), |(t, j)| if j == 0 { 1.0 } else { t as f64 });
        let y = Array1::from_shape_fn(n, |t| if t < n / 2 { t as f64 } else { 100.0 - t as f64 });
        MSRData::new(x, y).expect("valid data")
    }

    #[test]
    // Purpose
    // -------
    // The heuristic start reproduces the fixed ramp and sample variances.
    //
    // Given
    // -----
    // - x = [[1, 0], [1, 2]], y = (1, 3).
    //
    // Expect
    // ------
    // - β₀ = (0.2, 0.3), β₁ = (0.4, 0.6).
    // - σ₀² = var(y) = 2, σ₁² = var({1, 0, 1, 2}) = 2/3.
    // - stay probabilities 0.5.
    fn heuristic_start_values() {
        let data = MSRData::new(array![[1.0, 0.0], [1.0, 2.0]], array![1.0, 3.0]).expect("data");

        let params = Init::Heuristic.build_start(&data).expect("start");

        assert_abs_diff_eq!(params.beta[[0, 1]], 0.3, epsilon = 1e-15);
        assert_abs_diff_eq!(params.beta[[1, 1]], 0.6, epsilon = 1e-15);
        assert_abs_diff_eq!(params.variances[0], 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(params.variances[1], 2.0 / 3.0, epsilon = 1e-12);
        assert_eq!(params.stay_probs, array![0.5, 0.5]);
    }

    #[test]
    // Purpose
    // -------
    // The time split recovers both lines of a noiseless broken line.
    //
    // Given
    // -----
    // - `broken_line(40)`.
    //
    // Expect
    // ------
    // - β₀ ≈ (0, 1), β₁ ≈ (100, −1), variances at the floor.
    fn time_split_recovers_segments() {
        let params = Init::TimeSplit.build_start(&broken_line(40)).expect("start");

        assert_abs_diff_eq!(params.beta[[0, 0]], 0.0, epsilon = 1e-8);
        assert_abs_diff_eq!(params.beta[[0, 1]], 1.0, epsilon = 1e-8);
        assert_abs_diff_eq!(params.beta[[1, 0]], 100.0, epsilon = 1e-6);
        assert_abs_diff_eq!(params.beta[[1, 1]], -1.0, epsilon = 1e-8);
        assert_eq!(params.variances, array![MIN_START_VARIANCE, MIN_START_VARIANCE]);
    }

    #[test]
    // Purpose
    // -------
    // The residual split yields two distinct, valid regimes.
    //
    // Given
    // -----
    // - `broken_line(40)`.
    //
    // Expect
    // ------
    // - Valid parameters whose regime intercepts differ.
    fn residual_split_separates_regimes() {
        let params = Init::ResidualSplit.build_start(&broken_line(40)).expect("start");
        assert!((params.beta[[0, 0]] - params.beta[[1, 0]]).abs() > 1.0);
        assert!(params.variances.iter().all(|&v| v >= MIN_START_VARIANCE));
    }

    #[test]
    // Purpose
    // -------
    // Fixed starts must match the design width; multi-start falls back.
    //
    // Given
    // -----
    // - Fixed parameters with p = 1 against a p = 2 design.
    // - A two-row design where OLS splits are underdetermined.
    //
    // Expect
    // ------
    // - `ThetaLengthMismatch` for the fixed start.
    // - `MultiStart([TimeSplit, Heuristic])` returns the heuristic start.
    fn fixed_width_check_and_multi_start_fallback() {
        let data = broken_line(10);
        let narrow =
            MSRParams::new(array![[0.0], [1.0]], array![1.0, 1.0], array![0.5, 0.5]).expect("p");
        assert_eq!(
            Init::Fixed(narrow).build_start(&data),
            Err(MSRError::ThetaLengthMismatch { expected: 8, actual: 6 })
        );

        let tiny = MSRData::new(array![[1.0, 0.0], [1.0, 1.0]], array![0.0, 1.0]).expect("data");
        let multi = Init::MultiStart(vec![Init::TimeSplit, Init::Heuristic]);
        let params = multi.build_start(&tiny).expect("heuristic fallback");
        assert_abs_diff_eq!(params.beta[[0, 0]], 0.2, epsilon = 1e-15);
    }

    #[test]
    // Purpose
    // -------
    // Nested multi-start lists flatten in order.
    //
    // Given
    // -----
    // - MultiStart([Heuristic, MultiStart([TimeSplit, ResidualSplit])]).
    //
    // Expect
    // ------
    // - [Heuristic, TimeSplit, ResidualSplit]; the default has three entries.
    fn candidates_flatten_nested_lists() {
        let nested = Init::MultiStart(vec![
            Init::Heuristic,
            Init::MultiStart(vec![Init::TimeSplit, Init::ResidualSplit]),
        ]);
        assert_eq!(nested.candidates(), vec![Init::Heuristic, Init::TimeSplit, Init::ResidualSplit]);
        assert_eq!(Init::default().candidates().len(), 3);
    }
}
