//! MSR options — estimation-time configuration for switching regressions.
//!
//! Purpose
//! -------
//! Bundle every knob of a Markov-switching fit in one validated value: the
//! polynomial expansion of the raw design, the start-value policy, the
//! optimizer settings, and the variance floor applied in optimizer space.
//!
//! Key behaviors
//! -------------
//! - [`MSROptions::new`] validates the degree and the variance floor; the
//!   optimizer options are validated by their own builders.
//! - [`MSROptions::default`] gives degree 1 with intercept, the default
//!   multi-start policy, [`default_mle_options`], and a floor of
//!   [`DEFAULT_VARIANCE_FLOOR`].
//! - The default estimator stops on a cost change below `1e-12` as well as
//!   on the gradient norm, within 1000 iterations.
//! - [`MSROptions::expander`] builds the [`PolynomialFeatures`] transform
//!   used for both fitting and prediction.
//!
//! Invariants & assumptions
//! ------------------------
//! - `degree >= 1` and `variance_floor` is finite and `> 0` for every
//!   constructed value.
//!
//! Downstream usage
//! ----------------
//! - Pass to `MarkovSwitchingModel::new`; the model keeps it for the
//!   lifetime of the estimator.
use crate::{
    optimization::loglik_optimizer::{LineSearcher, MLEOptions, Tolerances},
    switching::{
        core::{features::PolynomialFeatures, init::Init},
        errors::{MSRError, MSRResult},
    },
};

/// Lower bound on regime variances inside the optimizer map.
pub const DEFAULT_VARIANCE_FLOOR: f64 = 1e-10;

/// Stopping rules used when the caller does not supply any.
pub const DEFAULT_TOLERANCES: Tolerances =
    Tolerances { tol_grad: Some(1e-5), tol_cost: Some(1e-12), max_iter: Some(1000) };

/// Optimizer options of a default estimator: [`DEFAULT_TOLERANCES`],
/// More–Thuente line search, default L-BFGS memory, quiet.
pub fn default_mle_options() -> MLEOptions {
    MLEOptions {
        tols: DEFAULT_TOLERANCES,
        line_searcher: LineSearcher::MoreThuente,
        verbose: false,
        lbfgs_mem: None,
    }
}

/// MSROptions — configuration for `MarkovSwitchingModel`.
///
/// Fields
/// ------
/// - `degree`: polynomial degree of the design expansion (`>= 1`).
/// - `fit_intercept`: prepend the constant column to the expansion.
/// - `init`: start-value policy.
/// - `mle_opts`: L-BFGS tolerances, line search, verbosity, memory.
/// - `variance_floor`: minimum `σ²` produced by the optimizer map.
#[derive(Debug, Clone, PartialEq)]
pub struct MSROptions {
    pub degree: usize,
    pub fit_intercept: bool,
    pub init: Init,
    pub mle_opts: MLEOptions,
    pub variance_floor: f64,
}

impl MSROptions {
    /// Construct validated options.
    ///
    /// Errors
    /// ------
    /// - `MSRError::InvalidDegree` when `degree == 0`.
    /// - `MSRError::InvalidVarianceFloor` when the floor is not finite and
    ///   `> 0`.
    ///
    /// Examples
    /// --------
    /// ```rust
    /// # use rust_regimes::switching::core::{init::Init, options::MSROptions};
    /// # use rust_regimes::optimization::loglik_optimizer::MLEOptions;
    /// let opts = MSROptions::new(2, true, Init::TimeSplit, MLEOptions::default(), 1e-8).unwrap();
    /// assert_eq!(opts.expander().unwrap().n_output_features(1), 3);
    /// ```
    pub fn new(
        degree: usize, fit_intercept: bool, init: Init, mle_opts: MLEOptions, variance_floor: f64,
    ) -> MSRResult<Self> {
        if degree == 0 {
            return Err(MSRError::InvalidDegree { degree });
        }
        if !variance_floor.is_finite() || variance_floor <= 0.0 {
            return Err(MSRError::InvalidVarianceFloor { value: variance_floor });
        }
        Ok(MSROptions { degree, fit_intercept, init, mle_opts, variance_floor })
    }

    /// Polynomial expansion configured by `degree` and `fit_intercept`.
    ///
    /// # Errors
    /// - `MSRError::InvalidDegree` when `degree == 0` (only reachable if the
    ///   public field was overwritten after construction).
    pub fn expander(&self) -> MSRResult<PolynomialFeatures> {
        PolynomialFeatures::new(self.degree, self.fit_intercept)
    }
}

impl Default for MSROptions {
    fn default() -> Self {
        MSROptions {
            degree: 1,
            fit_intercept: true,
            init: Init::default(),
            mle_opts: default_mle_options(),
            variance_floor: DEFAULT_VARIANCE_FLOOR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover the defaults and the two validation branches of
    // `MSROptions::new`.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Defaults describe a linear model with intercept and multi-start.
    //
    // Given
    // -----
    // - `MSROptions::default()`.
    //
    // Expect
    // ------
    // - degree 1, intercept on, three start candidates, floor 1e-10, and an
    //   expander producing `1 + p` columns.
    // - Cost and gradient tolerances both set, with a 1000-iteration budget.
    fn default_options() {
        let opts = MSROptions::default();

        assert_eq!(opts.mle_opts.tols, DEFAULT_TOLERANCES);
        assert_eq!(opts.mle_opts.tols.tol_cost, Some(1e-12));
        assert_eq!(opts.mle_opts.tols.max_iter, Some(1000));
        assert_eq!(opts.mle_opts.line_searcher, LineSearcher::MoreThuente);

        assert_eq!(opts.degree, 1);
        assert!(opts.fit_intercept);
        assert_eq!(opts.init.candidates().len(), 3);
        assert_eq!(opts.variance_floor, DEFAULT_VARIANCE_FLOOR);
        assert_eq!(opts.expander().expect("expander").n_output_features(3), 4);
    }

    #[test]
    // Purpose
    // -------
    // Invalid degree and floor are rejected at construction.
    //
    // Given
    // -----
    // - degree 0; floor 0; floor NaN.
    //
    // Expect
    // ------
    // - `InvalidDegree`, then `InvalidVarianceFloor` twice.
    fn new_rejects_invalid_configuration() {
        let mle = MLEOptions::default();
        assert_eq!(
            MSROptions::new(0, true, Init::Heuristic, mle.clone(), 1e-10),
            Err(MSRError::InvalidDegree { degree: 0 })
        );
        assert_eq!(
            MSROptions::new(1, true, Init::Heuristic, mle.clone(), 0.0),
            Err(MSRError::InvalidVarianceFloor { value: 0.0 })
        );
        assert!(matches!(
            MSROptions::new(1, false, Init::Heuristic, mle, f64::NAN),
            Err(MSRError::InvalidVarianceFloor { .. })
        ));
    }
}
