//! loglik_optimizer::types — numeric aliases and pre-wired L-BFGS solvers.
//!
//! Every optimizer-facing vector is an `ndarray` container over `f64`:
//! [`Theta`] for the optimizer-space parameters (for the switching model,
//! coefficients, softplus-encoded variances, and transition logits),
//! [`Grad`] for gradients of the same length, and [`Hessian`] for the dense
//! `k × k` second-derivative matrices used by standard errors.
//!
//! `Cost` is the scalar handed to Argmin. It is `−ℓ(θ)`; sign flips happen
//! in the adapter, never in model code.
//!
//! The solver aliases fix Argmin's generics to these shapes so builders can
//! name a concrete L-BFGS type per line search.
use argmin::solver::{
    linesearch::{HagerZhangLineSearch, MoreThuenteLineSearch},
    quasinewton::LBFGS,
};
use ndarray::{Array1, Array2};
use std::collections::HashMap;

/// Optimizer-space parameter vector.
pub type Theta = Array1<f64>;

/// Gradient with the shape of [`Theta`].
pub type Grad = Array1<f64>;

/// Dense `k × k` Hessian, `k = Theta.len()`.
pub type Hessian = Array2<f64>;

/// Scalar cost `c(θ) = −ℓ(θ)`.
pub type Cost = f64;

/// Argmin evaluation counters keyed by name (e.g. `"cost_count"`).
pub type FnEvalMap = HashMap<String, u64>;

/// L-BFGS history length used when `MLEOptions::lbfgs_mem` is `None`.
pub const DEFAULT_LBFGS_MEM: usize = 7;

pub type HagerZhangLS = HagerZhangLineSearch<Theta, Grad, Cost>;
pub type MoreThuenteLS = MoreThuenteLineSearch<Theta, Grad, Cost>;

/// L-BFGS over [`Theta`] with Hager–Zhang line search.
pub type LbfgsHagerZhang = LBFGS<HagerZhangLS, Theta, Grad, Cost>;

/// L-BFGS over [`Theta`] with More–Thuente line search.
pub type LbfgsMoreThuente = LBFGS<MoreThuenteLS, Theta, Grad, Cost>;
