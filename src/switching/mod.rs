//! switching — two-state Markov-switching linear regression.
//!
//! Purpose
//! -------
//! Provide a complete Markov-switching regression stack: validated data and
//! polynomial designs, the Hamilton filter over a two-state chain, the
//! likelihood, and an estimator that fits by maximum likelihood and exposes
//! fitted regimes, filtered probabilities, forecasts, and standard errors.
//!
//! Key behaviors
//! -------------
//! - [`core`] holds the numerical building blocks (data, expansion, solver,
//!   chain, densities, θ layout, filter, start values, options).
//! - [`models`] holds the likelihood and [`MarkovSwitchingModel`].
//! - [`errors`] defines [`MSRError`] / [`MSRResult`] for the whole stack.
//!
//! Invariants & assumptions
//! ------------------------
//! - Exactly two regimes. θ = `(β₀[p], β₁[p], σ₀², σ₁², z₀₀, z₁₁)` over the
//!   expanded design of width `p`.
//! - Filtered and predicted probabilities are row-wise distributions.
//! - Filter evaluations share no state; each call allocates its own buffers.
//!
//! Conventions
//! -----------
//! - Indexing is 0-based, oldest observation first. Regime labels are 0 and
//!   1 and follow the start values.
//! - The stack performs no I/O. Optimizer progress can be printed through
//!   the `obs_slog` feature when `MLEOptions::verbose` is set.
//!
//! Downstream usage
//! ----------------
//! 1. Build [`MSROptions`] (or use the default).
//! 2. `MarkovSwitchingModel::new(options).fit(x.view(), y.view())`.
//! 3. Read `coefficients_per_regime`, `variance_per_regime`,
//!    `transition_matrix`, `filtered_probabilities`; call `predict` and
//!    `standard_errors` as needed.

pub mod core;
pub mod errors;
pub mod models;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::core::{FilterOutput, Init, MSRData, MSROptions, MSRParams, PolynomialFeatures};
pub use self::errors::{MSRError, MSRResult};
pub use self::models::{MSRFit, MarkovSwitchingModel};

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use rust_regimes::switching::prelude::*;
//
// to import the main switching surface in a single line.

pub mod prelude {
    pub use super::{
        FilterOutput, Init, MSRData, MSRError, MSRFit, MSROptions, MSRParams, MSRResult,
        MarkovSwitchingModel, PolynomialFeatures,
    };
}
