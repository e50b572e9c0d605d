//! loglik_optimizer — maximize a log-likelihood with Argmin's L-BFGS.
//!
//! Purpose
//! -------
//! Let a model implement [`LogLikelihood`] once and have it maximized by
//! [`maximize`], with the Argmin plumbing (cost adapter, solver builders,
//! executor, termination mapping) kept out of model code.
//!
//! Key behaviors
//! -------------
//! - [`adapter::ArgMinAdapter`] turns `ℓ(θ)` into the cost `−ℓ(θ)` and
//!   supplies gradients: analytic when the model provides one, otherwise
//!   central differences with a forward-difference fallback.
//! - [`maximize`] checks the start with [`LogLikelihood::check`], builds an
//!   L-BFGS solver for the chosen [`LineSearcher`], runs it through
//!   [`run::run_lbfgs`], and returns an [`OptimOutcome`].
//! - [`finite_diff`] also provides the Hessian and the fixed-step central
//!   gradient used for observed-information standard errors.
//!
//! Invariants & assumptions
//! ------------------------
//! - θ lives in an unconstrained space; constrained parameters are mapped
//!   by the model (the switching model uses softplus variances and logit
//!   stay probabilities).
//! - Model errors travel through Argmin as `argmin::core::Error` and come
//!   back as the same [`OptError`](crate::optimization::errors::OptError) variant.
//! - [`Tolerances`] and [`MLEOptions`] are validated when built.
//!
//! Conventions
//! -----------
//! - Outcomes report `ℓ`, not the internal cost.
//! - Everything fallible returns `OptResult`.
//!
//! Testing notes
//! -------------
//! - Submodule tests cover sign handling, solver wiring, finite
//!   differences, validation, and outcome mapping. [`api`] maximizes a
//!   concave quadratic with both line searches; the switching estimator and
//!   its integration tests drive the whole stack on real fits.

pub mod adapter;
pub mod api;
pub mod builders;
pub mod finite_diff;
pub mod run;
pub mod traits;
pub mod types;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::api::maximize;
pub use self::traits::{LineSearcher, LogLikelihood, MLEOptions, OptimOutcome, Tolerances};
pub use self::types::{Cost, DEFAULT_LBFGS_MEM, FnEvalMap, Grad, Theta};

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use rust_regimes::optimization::loglik_optimizer::prelude::*;
//
// to import the main optimizer surface in a single line.

pub mod prelude {
    pub use super::api::maximize;
    pub use super::traits::{LineSearcher, LogLikelihood, MLEOptions, OptimOutcome, Tolerances};
    pub use super::types::{Cost, Grad, Theta};
}
