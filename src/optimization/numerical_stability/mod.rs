//! numerical_stability — numerically robust scalar transforms and tolerances.
//!
//! Purpose
//! -------
//! Collect numerically stable scalar transforms used to move between the
//! unconstrained optimizer space and the constrained model space of the
//! Markov-switching regression, together with the small shared tolerances
//! that the rest of the crate relies on.
//!
//! Key behaviors
//! -------------
//! - Provide stable logistic / logit transforms (`safe_logistic`,
//!   `safe_logit`) for regime stay probabilities in (0, 1).
//! - Provide stable softplus / inverse-softplus transforms
//!   (`safe_softplus`, `safe_softplus_inv`) for strictly positive regime
//!   variances.
//! - Centralize small numeric tolerances (`LOGIT_EPS`, `EIGEN_EPS`,
//!   `GENERAL_TOL`) so downstream modules share consistent guards.
//!
//! Invariants & assumptions
//! ------------------------
//! - All transforms assume finite `f64` inputs; domain validation happens in
//!   the switching and optimizer layers, not here.
//! - `safe_logit` clamps its input to `[LOGIT_EPS, 1 − LOGIT_EPS]`, so it is
//!   total on `[0, 1]`.
//!
//! Conventions
//! -----------
//! - This module never logs, performs I/O, or touches global state; it is
//!   pure numerical helpers suitable for use inside tight inner loops.
//!
//! Downstream usage
//! ----------------
//! - `switching::core::params` maps optimizer vectors to variances and stay
//!   probabilities with these transforms.
//! - `switching::core::transition` turns logits into stay probabilities.
//! - `inference::hessian` uses `EIGEN_EPS` for eigenvalue truncation.
//!
//! Testing notes
//! -------------
//! - Unit tests in [`transformations`] cover agreement with naïve formulas,
//!   tail behavior, and round trips.

pub mod transformations;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::transformations::{
    EIGEN_EPS, GENERAL_TOL, LOGIT_EPS, safe_logistic, safe_logit, safe_softplus,
    safe_softplus_inv,
};

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use rust_regimes::optimization::numerical_stability::prelude::*;
//
// to import the main numerical-stability surface in a single line.

pub mod prelude {
    pub use super::transformations::{
        EIGEN_EPS, GENERAL_TOL, LOGIT_EPS, safe_logistic, safe_logit, safe_softplus,
        safe_softplus_inv,
    };
}
