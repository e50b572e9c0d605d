//! Conversion helpers for the PyO3 bindings.
//!
//! Everything here turns Python arguments (NumPy arrays, pandas objects,
//! nested sequences, option strings) into validated Rust values for
//! `MarkovSwitchingModel`. Compiled only with the `python-bindings` feature.
#[cfg(feature = "python-bindings")]
use ndarray::{Array1, Array2};

#[cfg(feature = "python-bindings")]
use pyo3::{
    exceptions::{PyTypeError, PyValueError},
    prelude::*,
    types::PyAny,
};

#[cfg(feature = "python-bindings")]
use numpy::{
    IntoPyArray,    // Vec → PyArray
    PyArrayMethods, // .readonly()
    PyReadonlyArray1,
    PyReadonlyArray2,
};

#[cfg(feature = "python-bindings")]
use crate::{
    optimization::loglik_optimizer::traits::{LineSearcher, MLEOptions, Tolerances},
    switching::{
        core::{
            init::Init,
            options::{DEFAULT_TOLERANCES, MSROptions},
            params::MSRParams,
        },
        errors::MSRError,
        models::msr::MarkovSwitchingModel,
    },
};

/// Read a 1-D float64 array from an ndarray, a pandas Series, or a sequence.
#[cfg(feature = "python-bindings")]
#[inline]
pub fn extract_f64_array<'py>(
    py: Python<'py>, raw_data: &Bound<'py, PyAny>,
) -> PyResult<PyReadonlyArray1<'py, f64>> {
    if let Ok(arr_ro) = raw_data.extract::<PyReadonlyArray1<f64>>() {
        if arr_ro.as_slice().is_ok() {
            return Ok(arr_ro);
        }
    }

    if let Ok(obj) = raw_data.call_method("to_numpy", (false,), None) {
        if let Ok(series_ro) = obj.extract::<PyReadonlyArray1<f64>>() {
            if series_ro.as_slice().is_ok() {
                return Ok(series_ro);
            }
        }
    }

    let vec: Vec<f64> = raw_data.extract().map_err(|_| {
        PyTypeError::new_err("expected a 1-D numpy.ndarray, pandas.Series, or sequence of float64")
    })?;
    Ok(vec.into_pyarray_bound(py).readonly())
}

/// Copy a 1-D argument into an owned `Array1`.
#[cfg(feature = "python-bindings")]
pub fn extract_vector<'py>(
    py: Python<'py>, raw_data: &Bound<'py, PyAny>, name: &str,
) -> PyResult<Array1<f64>> {
    let arr = extract_f64_array(py, raw_data)?;
    let slice = arr.as_slice().map_err(|_| {
        PyValueError::new_err(format!("{name} must be a 1-D contiguous float64 array or sequence"))
    })?;
    Ok(Array1::from(slice.to_vec()))
}

/// Copy a design argument into an owned `(n, p)` matrix.
///
/// Accepts 2-D arrays, pandas DataFrames, and nested sequences. A 1-D input
/// is read as a single feature column.
#[cfg(feature = "python-bindings")]
pub fn extract_design<'py>(
    py: Python<'py>, raw_data: &Bound<'py, PyAny>, name: &str,
) -> PyResult<Array2<f64>> {
    if let Ok(arr_ro) = raw_data.extract::<PyReadonlyArray2<f64>>() {
        return Ok(arr_ro.as_array().to_owned());
    }

    if let Ok(obj) = raw_data.call_method("to_numpy", (false,), None) {
        if let Ok(frame_ro) = obj.extract::<PyReadonlyArray2<f64>>() {
            return Ok(frame_ro.as_array().to_owned());
        }
    }

    if let Ok(rows) = raw_data.extract::<Vec<Vec<f64>>>() {
        let n = rows.len();
        let p = rows.first().map_or(0, Vec::len);
        if rows.iter().any(|row| row.len() != p) {
            return Err(PyValueError::new_err(format!("{name} rows must all have the same length")));
        }
        let flat: Vec<f64> = rows.into_iter().flatten().collect();
        return Array2::from_shape_vec((n, p), flat)
            .map_err(|e| PyValueError::new_err(format!("{name}: {e}")));
    }

    let column = extract_vector(py, raw_data, name)?;
    let n = column.len();
    column
        .into_shape((n, 1))
        .map_err(|e| PyValueError::new_err(format!("{name}: {e}")))
}

/// Build a model from the keyword arguments of the Python constructor.
#[cfg(feature = "python-bindings")]
pub fn build_msr_model<'py>(
    py: Python<'py>, degree: Option<usize>, fit_intercept: Option<bool>, init: Option<&str>,
    init_params: Option<&Bound<'py, PyAny>>, tol_grad: Option<f64>, tol_cost: Option<f64>,
    max_iter: Option<usize>, line_searcher: Option<&str>, lbfgs_mem: Option<usize>,
    variance_floor: Option<f64>,
) -> PyResult<MarkovSwitchingModel> {
    let init_policy = extract_init(py, init, init_params)?;
    let mle_opts = extract_mle_opts(tol_grad, tol_cost, max_iter, line_searcher, lbfgs_mem)?;
    let options = MSROptions::new(
        degree.unwrap_or(1),
        fit_intercept.unwrap_or(true),
        init_policy,
        mle_opts,
        variance_floor.unwrap_or(crate::switching::core::options::DEFAULT_VARIANCE_FLOOR),
    )?;
    Ok(MarkovSwitchingModel::new(options))
}

#[cfg(feature = "python-bindings")]
fn extract_init<'py>(
    py: Python<'py>, init: Option<&str>, init_params: Option<&Bound<'py, PyAny>>,
) -> PyResult<Init> {
    let policy = match init.unwrap_or("multi_start") {
        "multi_start" => Init::default(),
        "heuristic" => Init::Heuristic,
        "time_split" => Init::TimeSplit,
        "residual_split" => Init::ResidualSplit,
        "fixed" => {
            let raw = init_params.ok_or_else(|| {
                PyValueError::new_err("init_params must be provided when init='fixed'")
            })?;
            let theta = extract_vector(py, raw, "init_params")?;
            Init::Fixed(fixed_params(&theta)?)
        }
        other => {
            return Err(PyValueError::new_err(format!(
                "invalid init policy {:?} (expected 'multi_start', 'heuristic', 'time_split', \
                 'residual_split', or 'fixed')",
                other
            )));
        }
    };
    Ok(policy)
}

/// Read a model-space θ of length `2p + 4` for a fixed start.
#[cfg(feature = "python-bindings")]
fn fixed_params(theta: &Array1<f64>) -> PyResult<MSRParams> {
    let len = theta.len();
    if len < 6 || len % 2 != 0 {
        return Err(PyValueError::new_err(format!(
            "init_params must have length 2p + 4 for p >= 1 expanded columns, got {len}"
        )));
    }
    let p = (len - 4) / 2;
    Ok(MSRParams::from_theta(theta.view(), p)?)
}

#[cfg(feature = "python-bindings")]
fn extract_mle_opts(
    tol_grad: Option<f64>, tol_cost: Option<f64>, max_iter: Option<usize>,
    line_searcher: Option<&str>, lbfgs_mem: Option<usize>,
) -> PyResult<MLEOptions> {
    use std::str::FromStr;

    // Missing settings take the estimator defaults.
    // OptResult<_> -> MSRError -> PyErr
    let tols = Tolerances::new(
        tol_grad.or(DEFAULT_TOLERANCES.tol_grad),
        tol_cost.or(DEFAULT_TOLERANCES.tol_cost),
        max_iter.or(DEFAULT_TOLERANCES.max_iter),
    )
    .map_err(MSRError::from)?;
    let ls = match line_searcher {
        Some(name) => LineSearcher::from_str(name).map_err(MSRError::from)?,
        None => LineSearcher::MoreThuente,
    };
    let opts = MLEOptions::new(tols, ls, false, lbfgs_mem).map_err(MSRError::from)?;

    Ok(opts)
}
