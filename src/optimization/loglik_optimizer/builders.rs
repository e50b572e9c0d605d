//! loglik_optimizer::builders — L-BFGS construction for each line search.
//!
//! Purpose
//! -------
//! Turn [`MLEOptions`] into a ready-to-run Argmin L-BFGS solver. The
//! runner supplies the start vector and the iteration cap; everything else
//! (history length, gradient and cost tolerances) is fixed here.
//!
//! Key behaviors
//! -------------
//! - [`build_optimizer_more_thuente`] and [`build_optimizer_hager_zhang`]
//!   pick the line search; both go through [`build_lbfgs`].
//! - The history length is `opts.lbfgs_mem`, or [`DEFAULT_LBFGS_MEM`].
//! - Absent tolerances are simply not set, so Argmin's defaults apply.
//!
//! Invariants & assumptions
//! ------------------------
//! - Tolerances were validated by `Tolerances::new`; anything Argmin still
//!   rejects (e.g. a negative tolerance written into the public fields)
//!   comes back as an `OptError`.
use argmin::solver::quasinewton::LBFGS;

use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{
        traits::MLEOptions,
        types::{
            Cost, DEFAULT_LBFGS_MEM, Grad, HagerZhangLS, LbfgsHagerZhang, LbfgsMoreThuente,
            MoreThuenteLS, Theta,
        },
    },
};

/// L-BFGS with More–Thuente line search (the default).
///
/// # Errors
/// - `OptError` when Argmin rejects a tolerance.
pub fn build_optimizer_more_thuente(opts: &MLEOptions) -> OptResult<LbfgsMoreThuente> {
    build_lbfgs(MoreThuenteLS::new(), opts)
}

/// L-BFGS with Hager–Zhang line search.
///
/// # Errors
/// - `OptError` when Argmin rejects a tolerance.
pub fn build_optimizer_hager_zhang(opts: &MLEOptions) -> OptResult<LbfgsHagerZhang> {
    build_lbfgs(HagerZhangLS::new(), opts)
}

/// Build L-BFGS around any line search `L` and apply the tolerances of
/// `opts`.
///
/// Parameters
/// ----------
/// - `line_search`: a fresh line-search object.
/// - `opts`: consulted for `lbfgs_mem`, `tols.tol_grad`, `tols.tol_cost`.
///
/// Errors
/// ------
/// - `OptError` (via `From<argmin::core::Error>`) when
///   `with_tolerance_grad` or `with_tolerance_cost` fails.
pub fn build_lbfgs<L>(line_search: L, opts: &MLEOptions) -> OptResult<LBFGS<L, Theta, Grad, Cost>> {
    let mut solver = LBFGS::new(line_search, opts.lbfgs_mem.unwrap_or(DEFAULT_LBFGS_MEM));
    if let Some(tol) = opts.tols.tol_grad {
        solver = solver.with_tolerance_grad(tol)?;
    }
    if let Some(tol) = opts.tols.tol_cost {
        solver = solver.with_tolerance_cost(tol)?;
    }
    Ok(solver)
}
