//! optimization — MLE driver, stable transforms, and the optimizer error type.
//!
//! Purpose
//! -------
//! Everything the switching estimator needs from numerical optimization
//! that is not specific to regimes: an Argmin-backed maximizer for
//! log-likelihoods, scalar transforms between constrained and unconstrained
//! coordinates, and one error enum for configuration, numerical, and
//! backend failures.
//!
//! Key behaviors
//! -------------
//! - `loglik_optimizer`: [`LogLikelihood`](loglik_optimizer::LogLikelihood)
//!   plus `maximize`, L-BFGS builders, finite differences, and validation.
//! - `numerical_stability`: `safe_logistic` / `safe_logit` for transition
//!   probabilities and `safe_softplus` / `safe_softplus_inv` for variances,
//!   plus the eigenvalue cutoff shared with `inference`.
//! - `errors`: [`OptError`](errors::OptError) and `OptResult<T>`.
//!
//! Invariants & assumptions
//! ------------------------
//! - Solvers minimize `c(θ) = −ℓ(θ)`; outcomes are reported in `ℓ`.
//! - Structural model errors (bad regime index, singular seed system,
//!   non-positive variance) cross Argmin and are recovered intact.
//! - θ is checked by `LogLikelihood::check` before any solver work.
//!
//! Conventions
//! -----------
//! - The map between optimizer space and `(β₀, β₁, σ₀², σ₁², p₀₀, p₁₁)`
//!   lives in `switching::core::params`, not here.
//! - No logging, except the optional `obs_slog` progress output enabled by
//!   `MLEOptions::verbose`.

pub mod errors;
pub mod loglik_optimizer;
pub mod numerical_stability;

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use rust_regimes::optimization::prelude::*;
//
// to import the main optimization surface in a single line.

pub mod prelude {
    pub use super::errors::{OptError, OptResult};
    pub use super::loglik_optimizer::prelude::*;
    pub use super::numerical_stability::prelude::*;
}
