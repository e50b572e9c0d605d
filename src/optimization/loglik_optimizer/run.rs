//! Shared L-BFGS runner: executes a prepared Argmin solver on an
//! [`ArgMinAdapter`] and normalizes the final state into [`OptimOutcome`].
use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{
        Grad, LogLikelihood, MLEOptions, OptimOutcome, Theta, adapter::ArgMinAdapter,
    },
};
#[cfg(feature = "obs_slog")]
use argmin::core::{CostFunction, Gradient, observers::ObserverMode};
use argmin::core::{Executor, IterState, Solver, State};
#[cfg(feature = "obs_slog")]
use argmin_math::ArgminL2Norm;

/// Iteration state shared by both L-BFGS variants.
type LbfgsState = IterState<Theta, Grad, (), (), (), f64>;

/// Run `solver` from `theta0` and collect the outcome.
///
/// Both line-search variants go through here. `opts.tols.max_iter`, when
/// set, caps the iteration count; with the `obs_slog` feature and
/// `opts.verbose`, the starting log-likelihood is printed once and a
/// terminal slog observer reports every iteration.
///
/// Returns
/// -------
/// The best parameters and `ℓ(θ̂)` seen by the solver, its termination
/// status, iteration and evaluation counts, and the last gradient norm.
/// Hitting the iteration cap is not an error here: the outcome carries
/// `converged = false` and the model layer decides what that means.
///
/// Errors
/// ------
/// - Argmin runtime failures (line search, observers) via
///   `From<argmin::core::Error> for OptError`. Errors raised by the model
///   inside the cost (e.g. `SingularMatrix` from the stationary seed) come
///   back as their own `OptError` variant.
/// - Validation failures from [`OptimOutcome::new`].
pub fn run_lbfgs<'a, F, S>(
    theta0: Theta, opts: &MLEOptions, problem: ArgMinAdapter<'a, F>, solver: S,
) -> OptResult<OptimOutcome>
where
    F: LogLikelihood,
    S: Solver<ArgMinAdapter<'a, F>, LbfgsState> + Send + 'static,
{
    #[cfg(feature = "obs_slog")]
    if opts.verbose {
        report_start(&theta0, &problem)?;
    }

    let max_iter = opts.tols.max_iter;
    let executor = Executor::new(problem, solver).configure(|state| match max_iter {
        Some(cap) => state.param(theta0).max_iters(cap as u64),
        None => state.param(theta0),
    });
    #[cfg(feature = "obs_slog")]
    let executor = if opts.verbose {
        executor.add_observer(argmin_observer_slog::SlogLogger::term_noblock(), ObserverMode::Always)
    } else {
        executor
    };

    let mut state = executor.run()?.state().clone();
    let iterations = state.get_iter();
    let fn_evals = state.get_func_counts().clone();
    let status = state.get_termination_status().clone();
    let grad = state.take_gradient();
    OptimOutcome::new(
        state.take_best_param(),
        -state.get_best_cost(),
        status,
        iterations,
        fn_evals,
        grad,
    )
}

#[cfg(feature = "obs_slog")]
fn report_start<F>(theta0: &Theta, problem: &ArgMinAdapter<'_, F>) -> OptResult<()>
where
    F: LogLikelihood,
{
    let ll0 = -problem.cost(theta0)?;
    match problem.gradient(theta0) {
        Ok(g) => eprintln!("start: loglik = {ll0:.6}, |grad| = {:.6}", g.l2_norm()),
        Err(_) => eprintln!("start: loglik = {ll0:.6}"),
    }
    Ok(())
}
