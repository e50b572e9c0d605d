//! rust_regimes — two-state Markov-switching regression with Python bindings.
//!
//! Purpose
//! -------
//! Serve as the crate root for Rust callers and as the PyO3 bridge that exposes
//! the Markov-switching estimator to Python via the `_rust_regimes` extension
//! module. When the `python-bindings` feature is enabled, this module defines
//! the Python-facing classes and the `regimes` submodule.
//!
//! Key behaviors
//! -------------
//! - Re-export the core Rust modules (`switching`, `optimization`,
//!   `inference`) as the public crate surface.
//! - Define `#[pyclass]` wrappers and the `#[pymodule]` initializer for the
//!   `_rust_regimes` Python extension.
//! - Register the `regimes` submodule in `sys.modules` so that
//!   `rust_regimes.regimes` imports work.
//!
//! Invariants & assumptions
//! ------------------------
//! - All numerical work lives in the inner Rust modules; this file performs
//!   only FFI glue, input conversion, and error mapping.
//! - Python-visible methods mirror the Rust signatures on
//!   [`MarkovSwitchingModel`] and inherit their invariants.
//!
//! Conventions
//! -----------
//! - Matrices cross the boundary as NumPy arrays; `(n, 2)` probability
//!   matrices keep row `t` = observation `t`.
//! - Errors from the core are [`switching::errors::MSRError`] values and are
//!   converted to `ValueError` at the PyO3 boundary.
//!
//! Downstream usage
//! ----------------
//! - Native Rust code should depend on `switching::models::msr` directly and
//!   can ignore the items guarded by `python-bindings`.
//!
//! Testing notes
//! -------------
//! - Core behavior is covered by unit tests in the inner modules and by
//!   `tests/integration_msr_pipeline.rs`.

pub mod inference;
pub mod optimization;
pub mod switching;
pub mod utils;

#[cfg(feature = "python-bindings")]
use numpy::{IntoPyArray, PyArray1, PyArray2};

#[cfg(feature = "python-bindings")]
use pyo3::{prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use crate::{
    optimization::loglik_optimizer::traits::OptimOutcome,
    switching::models::msr::MarkovSwitchingModel,
    utils::{build_msr_model, extract_design, extract_vector},
};

/// MarkovSwitchingRegression — Python-facing two-regime switching regression.
///
/// Purpose
/// -------
/// Wrap [`MarkovSwitchingModel`] so Python code can fit a two-state
/// Markov-switching linear (or polynomial) regression and read back the
/// estimates, regime probabilities, forecasts, and standard errors.
///
/// Parameters
/// ----------
/// Constructed from Python via
/// `MarkovSwitchingRegression(degree=1, fit_intercept=True, init='multi_start', ...)`:
/// - `degree`, `fit_intercept`: polynomial expansion of the raw design.
/// - `init`, `init_params`: start-value policy; `init_params` is a model-space
///   θ of length `2p + 4` when `init='fixed'`.
/// - `tol_grad`, `tol_cost`, `max_iter`, `line_searcher`, `lbfgs_mem`:
///   optimizer settings; omitted tolerances default to `1e-5`, `1e-12`, and
///   `1000`.
/// - `variance_floor`: minimum regime variance in the optimizer map.
///
/// Notes
/// -----
/// - Every getter raises `ValueError` before `fit` succeeds.
#[cfg(feature = "python-bindings")]
#[pyclass(module = "rust_regimes.regimes", unsendable)]
pub struct MarkovSwitchingRegression {
    /// Underlying Rust estimator.
    pub inner: MarkovSwitchingModel,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl MarkovSwitchingRegression {
    #[new]
    #[pyo3(
        signature = (
            degree = None,
            fit_intercept = None,
            init = None,
            init_params = None,
            tol_grad = None,
            tol_cost = None,
            max_iter = None,
            line_searcher = None,
            lbfgs_mem = None,
            variance_floor = None,
        ),
        text_signature = "(degree=1, fit_intercept=True, init='multi_start', init_params=None, \
                          tol_grad=None, tol_cost=None, max_iter=None, line_searcher=None, \
                          lbfgs_mem=None, variance_floor=1e-10)"
    )]
    pub fn new<'py>(
        py: Python<'py>, degree: Option<usize>, fit_intercept: Option<bool>, init: Option<&str>,
        init_params: Option<&Bound<'py, PyAny>>, tol_grad: Option<f64>, tol_cost: Option<f64>,
        max_iter: Option<usize>, line_searcher: Option<&str>, lbfgs_mem: Option<usize>,
        variance_floor: Option<f64>,
    ) -> PyResult<Self> {
        let inner = build_msr_model(
            py,
            degree,
            fit_intercept,
            init,
            init_params,
            tol_grad,
            tol_cost,
            max_iter,
            line_searcher,
            lbfgs_mem,
            variance_floor,
        )?;
        Ok(MarkovSwitchingRegression { inner })
    }

    #[pyo3(text_signature = "(self, x, y, /)")]
    pub fn fit<'py>(
        &mut self, py: Python<'py>, x: &Bound<'py, PyAny>, y: &Bound<'py, PyAny>,
    ) -> PyResult<()> {
        let x = extract_design(py, x, "x")?;
        let y = extract_vector(py, y, "y")?;
        self.inner.fit(x.view(), y.view())?;
        Ok(())
    }

    /// Returns `(forecasts, regime_probabilities)`.
    #[pyo3(text_signature = "(self, x_new, /)")]
    pub fn predict<'py>(
        &self, py: Python<'py>, x_new: &Bound<'py, PyAny>,
    ) -> PyResult<(Bound<'py, PyArray1<f64>>, Bound<'py, PyArray1<f64>>)> {
        let x_new = extract_design(py, x_new, "x_new")?;
        let (forecast, probs) = self.inner.predict(x_new.view())?;
        Ok((forecast.into_pyarray_bound(py), probs.into_pyarray_bound(py)))
    }

    pub fn standard_errors<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyArray1<f64>>> {
        Ok(self.inner.standard_errors()?.into_pyarray_bound(py))
    }

    #[pyo3(text_signature = "(self, regime, /)")]
    pub fn regime_coefficients<'py>(
        &self, py: Python<'py>, regime: usize,
    ) -> PyResult<Bound<'py, PyArray1<f64>>> {
        Ok(self.inner.regime_coefficients(regime)?.to_owned().into_pyarray_bound(py))
    }

    #[getter]
    pub fn coefficients_per_regime<'py>(
        &self, py: Python<'py>,
    ) -> PyResult<Bound<'py, PyArray2<f64>>> {
        Ok(self.inner.coefficients_per_regime()?.into_pyarray_bound(py))
    }

    #[getter]
    pub fn variance_per_regime<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyArray1<f64>>> {
        Ok(self.inner.variance_per_regime()?.into_pyarray_bound(py))
    }

    #[getter]
    pub fn transition_matrix<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyArray2<f64>>> {
        Ok(self.inner.transition_matrix()?.into_pyarray_bound(py))
    }

    #[getter]
    pub fn filtered_probabilities<'py>(
        &self, py: Python<'py>,
    ) -> PyResult<Bound<'py, PyArray2<f64>>> {
        Ok(self.inner.filtered_probabilities()?.to_owned().into_pyarray_bound(py))
    }

    #[getter]
    pub fn predicted_probabilities<'py>(
        &self, py: Python<'py>,
    ) -> PyResult<Bound<'py, PyArray2<f64>>> {
        Ok(self.inner.predicted_probabilities()?.to_owned().into_pyarray_bound(py))
    }

    #[getter]
    pub fn expected_durations<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyArray1<f64>>> {
        Ok(self.inner.expected_durations()?.into_pyarray_bound(py))
    }

    #[getter]
    pub fn log_likelihood(&self) -> PyResult<f64> {
        Ok(self.inner.log_likelihood()?)
    }

    #[getter]
    pub fn results(&self) -> PyResult<MSROptimOutcome> {
        let fit = self.inner.results()?;
        Ok(MSROptimOutcome { inner: fit.outcome.clone() })
    }
}

/// MSROptimOutcome — optimizer diagnostics of the last fit, read-only.
///
/// `theta_hat` is in optimizer space (softplus variances, transition
/// logits); use the estimator getters for model-space values.
#[cfg(feature = "python-bindings")]
#[pyclass(module = "rust_regimes.regimes")]
pub struct MSROptimOutcome {
    /// Underlying Rust OptimOutcome.
    pub inner: OptimOutcome,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl MSROptimOutcome {
    #[getter]
    pub fn theta_hat(&self) -> Vec<f64> {
        self.inner.theta_hat.to_vec()
    }

    #[getter]
    pub fn value(&self) -> f64 {
        self.inner.value
    }

    #[getter]
    pub fn converged(&self) -> bool {
        self.inner.converged
    }

    #[getter]
    pub fn status(&self) -> String {
        self.inner.status.clone()
    }

    #[getter]
    pub fn iterations(&self) -> usize {
        self.inner.iterations
    }

    #[getter]
    pub fn grad_norm(&self) -> Option<f64> {
        self.inner.grad_norm
    }

    #[getter]
    pub fn fn_evals(&self) -> Vec<(String, u64)> {
        self.inner.fn_evals.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }
}

/// _rust_regimes — PyO3 module initializer for the Python extension.
///
/// Creates the `regimes` submodule, attaches it to `_rust_regimes`, and
/// registers it in `sys.modules` as `rust_regimes.regimes` so dotted imports
/// work.
///
/// # Errors
/// - `PyErr` if creating the submodule or touching `sys.modules` fails.
#[cfg(feature = "python-bindings")]
#[pymodule]
fn _rust_regimes<'py>(_py: Python<'py>, m: &Bound<'py, PyModule>) -> PyResult<()> {
    let regimes_mod = PyModule::new_bound(_py, "regimes")?;
    regimes(_py, m, &regimes_mod)?;

    // Manually add the submodule into sys.modules to allow for dot notation.
    _py.import_bound("sys")?
        .getattr("modules")?
        .set_item("rust_regimes.regimes", regimes_mod)?;
    Ok(())
}

#[cfg(feature = "python-bindings")]
fn regimes<'py>(
    _py: Python, rust_regimes: &Bound<'py, PyModule>, m: &Bound<'py, PyModule>,
) -> PyResult<()> {
    m.add_class::<MarkovSwitchingRegression>()?;
    m.add_class::<MSROptimOutcome>()?;
    rust_regimes.add_submodule(m)?;
    Ok(())
}
