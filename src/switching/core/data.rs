//! Observation containers for Markov-switching regression.
//!
//! Purpose
//! -------
//! Hold a time-ordered design matrix and response vector after basic input
//! validation, so the filter and the likelihood can index rows without
//! re-checking shapes or finiteness.
//!
//! Key behaviors
//! -------------
//! - [`MSRData::new`] rejects empty designs, row/response length mismatches,
//!   non-finite entries, and samples shorter than two observations.
//! - The same container is used for the raw design passed to `fit` and for
//!   the polynomial-expanded design consumed by the filter.
//!
//! Invariants & assumptions
//! ------------------------
//! - `x.nrows() == y.len() >= 2` and `x.ncols() >= 1`.
//! - Every entry of `x` and `y` is finite.
//! - Row order is time order; index 0 is the oldest observation.
//!
//! Testing notes
//! -------------
//! - Unit tests cover the happy path and each rejection branch.
use crate::switching::errors::{MSRError, MSRResult};
use ndarray::{Array1, Array2, ArrayView1};

/// Minimum sample length: the likelihood averages over `t = 1..n-1`.
pub const MIN_OBSERVATIONS: usize = 2;

/// `MSRData` — validated design matrix and response vector.
///
/// Fields
/// ------
/// - `x`: `Array2<f64>` of shape `(n, p)`; row `t` is the design row `x_t`.
/// - `y`: `Array1<f64>` of length `n`; entry `t` is the response `y_t`.
///
/// Invariants
/// ----------
/// - `n >= 2`, `p >= 1`, all entries finite.
#[derive(Debug, Clone, PartialEq)]
pub struct MSRData {
    /// Design matrix, one row per observation.
    pub x: Array2<f64>,
    /// Response vector aligned with the rows of `x`.
    pub y: Array1<f64>,
}

impl MSRData {
    /// Construct a validated [`MSRData`].
    ///
    /// Errors
    /// ------
    /// - `MSRError::EmptyDesign` when `x` has no rows or no columns.
    /// - `MSRError::LengthMismatch` when `x.nrows() != y.len()`.
    /// - `MSRError::InsufficientObservations` when fewer than two rows.
    /// - `MSRError::NonFiniteData` for the first NaN/±∞ entry, scanning the
    ///   design row by row and then the response (`col: None`).
    ///
    /// Examples
    /// --------
    /// ```rust
    /// # use ndarray::array;
    /// # use rust_regimes::switching::core::data::MSRData;
    /// let data = MSRData::new(array![[0.0], [1.0], [2.0]], array![1.0, 2.0, 3.0]).unwrap();
    /// assert_eq!(data.n_obs(), 3);
    /// assert_eq!(data.n_features(), 1);
    /// ```
    pub fn new(x: Array2<f64>, y: Array1<f64>) -> MSRResult<Self> {
        if x.nrows() == 0 || x.ncols() == 0 {
            return Err(MSRError::EmptyDesign);
        }
        if x.nrows() != y.len() {
            return Err(MSRError::LengthMismatch { rows: x.nrows(), responses: y.len() });
        }
        if y.len() < MIN_OBSERVATIONS {
            return Err(MSRError::InsufficientObservations {
                needed: MIN_OBSERVATIONS,
                actual: y.len(),
            });
        }
        if let Some(((row, col), &value)) = x.indexed_iter().find(|(_, v)| !v.is_finite()) {
            return Err(MSRError::NonFiniteData { row, col: Some(col), value });
        }
        if let Some((row, &value)) = y.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(MSRError::NonFiniteData { row, col: None, value });
        }
        Ok(MSRData { x, y })
    }

    /// Number of observations `n`.
    pub fn n_obs(&self) -> usize {
        self.y.len()
    }

    /// Number of design columns `p`.
    pub fn n_features(&self) -> usize {
        self.x.ncols()
    }

    /// Design row `x_t`.
    pub fn row(&self, t: usize) -> ArrayView1<'_, f64> {
        self.x.row(t)
    }
}
