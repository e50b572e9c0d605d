//! core — data, parameters, and the Hamilton filter for two-regime
//! switching regressions.
//!
//! Purpose
//! -------
//! Collect the numerical building blocks of the Markov-switching estimator:
//! validated data containers, polynomial expansion, the normal-equations
//! solver, the two-state chain, regime densities, the θ layout, the forward
//! filter, start-value policies, and options. The estimator in
//! `switching::models` is a thin orchestration layer over these pieces.
//!
//! Key behaviors
//! -------------
//! - [`MSRData`] holds validated `(X, y)`; [`PolynomialFeatures`] expands `X`.
//! - [`linear_solve`] solves (possibly overdetermined) systems through
//!   Cholesky of `AᵀA` and reports rank deficiency as `SingularMatrix`.
//! - [`transition_matrix`], [`stationary_distribution`], and [`propagate`]
//!   implement the two-state chain; [`regime_density`] the Gaussian
//!   emissions.
//! - [`MSRParams`] and the offset helpers in [`params`] fix the θ layout and
//!   the map to optimizer space.
//! - [`hamilton_filter`] runs the forward recursion and returns a
//!   [`FilterOutput`].
//! - [`Init`] and [`MSROptions`] configure estimation.
//!
//! Invariants & assumptions
//! ------------------------
//! - Exactly two regimes ([`N_REGIMES`]).
//! - θ = `(β₀[p], β₁[p], σ₀², σ₁², z₀₀, z₁₁)` for `p` expanded columns.
//! - Filtered and predicted rows are probability distributions.
//!
//! Conventions
//! -----------
//! - Row `t` of every `(n, ·)` matrix refers to observation `t`, oldest first.
//! - This module performs no I/O and no logging.
//!
//! Testing notes
//! -------------
//! - Each submodule carries unit tests for its own contract; end-to-end
//!   estimation is covered in `switching::models` and the integration tests.

pub mod data;
pub mod density;
pub mod features;
pub mod filter;
pub mod init;
pub mod linalg;
pub mod options;
pub mod params;
pub mod transition;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::data::{MIN_OBSERVATIONS, MSRData};
pub use self::density::{regime_densities, regime_density};
pub use self::features::PolynomialFeatures;
pub use self::filter::{FilterOutput, hamilton_filter};
pub use self::init::Init;
pub use self::linalg::linear_solve;
pub use self::options::{
    DEFAULT_TOLERANCES, DEFAULT_VARIANCE_FLOOR, MSROptions, default_mle_options,
};
pub use self::params::{MSRParams, theta_len, unconstrained_to_theta};
pub use self::transition::{
    N_REGIMES, propagate, stationary_distribution, stay_probability, transition_matrix,
};
pub use self::validation::{validate_forecast_rows, validate_regime};

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use rust_regimes::switching::core::prelude::*;
//
// to import the main switching core surface in a single line.

pub mod prelude {
    pub use super::data::MSRData;
    pub use super::features::PolynomialFeatures;
    pub use super::filter::{FilterOutput, hamilton_filter};
    pub use super::init::Init;
    pub use super::options::MSROptions;
    pub use super::params::MSRParams;
}
