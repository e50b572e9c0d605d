//! models — likelihood and estimator for two-regime switching regressions.
//!
//! Purpose
//! -------
//! Turn the filter in `switching::core` into a fitted model: scalar
//! likelihood / objective functions and the [`MarkovSwitchingModel`]
//! estimator that runs MLE, caches results, forecasts, and reports standard
//! errors.
//!
//! Key behaviors
//! -------------
//! - [`likelihood`] exposes the mean log-likelihood (index 0 excluded) and
//!   the minimizer-facing objective with its `+∞` policy.
//! - [`msr`] implements `LogLikelihood` for the estimator and the public
//!   `fit` / accessor / `predict` / `standard_errors` surface.
//!
//! Testing notes
//! -------------
//! - Unit tests pin the likelihood against hand computations and fit small
//!   synthetic samples; the integration tests run the full pipeline on the
//!   step-change scenario and a larger recovery sample.

pub mod likelihood;
pub mod msr;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::likelihood::{log_likelihood, mean_log_likelihood, objective};
pub use self::msr::{MSRFit, MarkovSwitchingModel};

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use rust_regimes::switching::models::prelude::*;
//
// to import the estimator surface in a single line.

pub mod prelude {
    pub use super::likelihood::{log_likelihood, objective};
    pub use super::msr::{MSRFit, MarkovSwitchingModel};
}
