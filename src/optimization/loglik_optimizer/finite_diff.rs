//! loglik_optimizer::finite_diff — finite-difference gradient and Hessian helpers.
//!
//! Purpose
//! -------
//! Wrap the `finitediff` crate so that the optimizer adapter and the
//! inference layer can request derivatives with validation attached,
//! without touching the `FiniteDiff` trait directly.
//!
//! Key behaviors
//! -------------
//! - [`run_fd_diff`]: forward-difference gradient of a scalar objective,
//!   with errors raised inside the objective captured through a
//!   `RefCell<Option<Error>>` side channel.
//! - [`central_gradient`]: central-difference gradient with a caller-chosen
//!   relative step, used where the gradient is itself differenced again
//!   (observed information) and the default `sqrt(ε)` step is too noisy.
//! - [`compute_hessian`]: central-difference Hessian of a gradient map,
//!   falling back to forward differences when the central estimate is not
//!   finite, then symmetrized.
//!
//! Invariants & assumptions
//! ------------------------
//! - Every gradient returned satisfies [`validate_grad`]; every Hessian
//!   satisfies [`validate_hessian`] and is exactly symmetric.
//! - Differences are taken in whatever space the caller's closure lives in.
//!   For the Markov-switching model that is the unconstrained optimizer
//!   space (softplus variances, logit stay probabilities).
//!
//! Testing notes
//! -------------
//! - Unit tests cover the success and failure paths of both helpers and
//!   the symmetrization step.
use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{
        Grad, Theta,
        types::Hessian,
        validation::{validate_grad, validate_hessian},
    },
};
use argmin::core::Error;
use finitediff::FiniteDiff;
use std::cell::RefCell;

/// Forward-difference gradient of `func` at `theta`.
///
/// `func` cannot return a `Result`, so callers route evaluation failures into
/// `closure_err` and return `NaN`. The cell is cleared on entry; if it holds an
/// error after differencing, that error is returned instead of the gradient.
///
/// # Errors
/// - The captured evaluation error, converted into `OptError`.
/// - `GradientDimMismatch` / `InvalidGradient` from [`validate_grad`].
///
/// # Examples
/// ```rust
/// # use std::cell::RefCell;
/// # use argmin::core::Error;
/// # use ndarray::array;
/// # use rust_regimes::optimization::loglik_optimizer::finite_diff::run_fd_diff;
/// let closure_err: RefCell<Option<Error>> = RefCell::new(None);
/// let f = |x: &ndarray::Array1<f64>| x.dot(x);
/// let grad = run_fd_diff(&array![0.0, 1.0], &f, &closure_err).unwrap();
/// assert_eq!(grad.len(), 2);
/// ```
pub fn run_fd_diff<G: Fn(&Theta) -> f64>(
    theta: &Theta, func: &G, closure_err: &RefCell<Option<Error>>,
) -> OptResult<Grad> {
    closure_err.replace(None);
    let fd_grad = theta.forward_diff(func);
    if let Some(err) = closure_err.take() {
        return Err(err.into());
    }
    validate_grad(&fd_grad, theta.len())?;
    Ok(fd_grad)
}

/// Finite-difference Hessian of the gradient map `f` at `theta`.
///
/// Central differences are tried first. If that matrix fails validation the
/// forward-difference Hessian is computed, and only its validation error is
/// surfaced. The accepted matrix is symmetrized in place before returning.
///
/// # Errors
/// - `HessianDimMismatch` / `InvalidHessian` when the forward fallback is also
///   unusable.
///
/// # Examples
/// ```rust
/// # use ndarray::array;
/// # use rust_regimes::optimization::loglik_optimizer::finite_diff::compute_hessian;
/// let grad_fn = |theta: &ndarray::Array1<f64>| theta.mapv(|x| 2.0 * x);
/// let hess = compute_hessian(&grad_fn, &array![1.0, 2.0]).unwrap();
/// assert_eq!(hess.shape(), &[2, 2]);
/// ```
pub fn compute_hessian<F: Fn(&Theta) -> Grad>(f: &F, theta: &Theta) -> OptResult<Hessian> {
    let dim = theta.len();
    let central = theta.central_hessian(f);
    let mut hess = match validate_hessian(&central, dim) {
        Ok(()) => central,
        Err(_) => {
            let forward = theta.forward_hessian(f);
            validate_hessian(&forward, dim)?;
            forward
        }
    };
    symmetrize_hess(&mut hess);
    Ok(hess)
}

/// Central-difference gradient with step `rel_step · max(1, |θ_i|)`.
///
/// # Errors
/// - `OptError::InvalidGradient` when any component is not finite.
///
/// # Examples
/// ```rust
/// # use ndarray::array;
/// # use rust_regimes::optimization::loglik_optimizer::finite_diff::central_gradient;
/// let f = |theta: &ndarray::Array1<f64>| theta[0].powi(3);
/// let g = central_gradient(&array![2.0], &f, 1e-5).unwrap();
/// assert!((g[0] - 12.0).abs() < 1e-6);
/// ```
pub fn central_gradient<G: Fn(&Theta) -> f64>(
    theta: &Theta, func: &G, rel_step: f64,
) -> OptResult<Grad> {
    let mut probe = theta.clone();
    let mut grad = Grad::zeros(theta.len());
    for i in 0..theta.len() {
        let h = rel_step * theta[i].abs().max(1.0);
        probe[i] = theta[i] + h;
        let up = func(&probe);
        probe[i] = theta[i] - h;
        let down = func(&probe);
        probe[i] = theta[i];
        grad[i] = (up - down) / (2.0 * h);
    }
    validate_grad(&grad, theta.len())?;
    Ok(grad)
}

// ---- Helper methods ----

/// Replace each off-diagonal pair by its average; the diagonal is untouched.
fn symmetrize_hess(hess: &mut Hessian) {
    for i in 0..hess.nrows() {
        for j in 0..i {
            let avg = 0.5 * (hess[[i, j]] + hess[[j, i]]);
            hess[[i, j]] = avg;
            hess[[j, i]] = avg;
        }
    }
}
