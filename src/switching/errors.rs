//! Errors for two-regime Markov-switching regression (data validation,
//! configuration checks, structural filter failures, and optimizer outcomes).
//!
//! This module defines [`MSRError`], used across the Rust core and the
//! optional Python bindings. It implements `Display`/`Error` and converts to a
//! Python `ValueError` when the `python-bindings` feature is enabled.
//!
//! ## Conventions
//! - **Indices are 0-based** (match Rust/NumPy). Regimes are `0` and `1`.
//! - Structural errors (`InvalidRegime`, `SingularMatrix`,
//!   `NonPositiveVariance`) are never coerced into numbers here; only the
//!   objective in `switching::models::likelihood` turns variance failures and
//!   density underflow into `+∞`.
//! - Optimizer/backend errors that do not correspond to a model variant are
//!   normalized to [`MSRError::OptimizationFailed`] with a readable status.
#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

use crate::optimization::errors::OptError;

/// Crate-wide result alias for Markov-switching operations.
pub type MSRResult<T> = Result<T, MSRError>;

/// Unified error type for Markov-switching regression.
#[derive(Debug, Clone, PartialEq)]
pub enum MSRError {
    // ---- Structural ----
    /// Regime index outside {0, 1}.
    InvalidRegime { regime: usize },

    /// Normal-equations matrix `AᵀA` is not positive definite.
    SingularMatrix { reason: &'static str },

    /// A proposed regime variance is not finite and > 0.
    NonPositiveVariance { regime: usize, value: f64 },

    // ---- Input/data validation ----
    /// Design matrix has no rows or no columns.
    EmptyDesign,

    /// Number of design rows differs from the response length.
    LengthMismatch { rows: usize, responses: usize },

    /// A design or response entry is NaN/±inf.
    NonFiniteData { row: usize, col: Option<usize>, value: f64 },

    /// Fewer observations than required.
    InsufficientObservations { needed: usize, actual: usize },

    // ---- Configuration / parameters ----
    /// Polynomial degree must be ≥ 1.
    InvalidDegree { degree: usize },

    /// Parameter vector has the wrong length for the expanded design.
    ThetaLengthMismatch { expected: usize, actual: usize },

    /// Parameter vector entry must be finite.
    InvalidThetaInput { index: usize, value: f64 },

    /// Stay probability must lie strictly inside (0, 1).
    InvalidProbability { regime: usize, value: f64 },

    /// Variance floor must be finite and > 0.
    InvalidVarianceFloor { value: f64 },

    // ---- Estimation / prediction ----
    /// Optimizer stopped without meeting its convergence criteria.
    ConvergenceError { status: String, iterations: usize },

    /// Optimizer failed; include a human-readable status/reason.
    OptimizationFailed { status: String },

    /// Model hasn't been fitted yet.
    ModelNotFitted,

    /// New rows have a different raw feature count than the fitted design.
    FeatureMismatch { expected: usize, actual: usize },
}

impl std::error::Error for MSRError {}

impl std::fmt::Display for MSRError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Structural ----
            MSRError::InvalidRegime { regime } => {
                write!(f, "Invalid regime index {regime}; expected 0 or 1.")
            }
            MSRError::SingularMatrix { reason } => {
                write!(f, "Normal-equations matrix is not positive definite: {reason}")
            }
            MSRError::NonPositiveVariance { regime, value } => {
                write!(f, "Variance of regime {regime} must be finite and > 0; got: {value}")
            }
            // ---- Input/data validation ----
            MSRError::EmptyDesign => {
                write!(f, "Design matrix is empty.")
            }
            MSRError::LengthMismatch { rows, responses } => {
                write!(f, "Design has {rows} rows but response has {responses} entries.")
            }
            MSRError::NonFiniteData { row, col: Some(col), value } => {
                write!(f, "Design entry ({row}, {col}) is non-finite: {value}")
            }
            MSRError::NonFiniteData { row, col: None, value } => {
                write!(f, "Response at index {row} is non-finite: {value}")
            }
            MSRError::InsufficientObservations { needed, actual } => {
                write!(f, "At least {needed} observations are required; got {actual}.")
            }
            // ---- Configuration / parameters ----
            MSRError::InvalidDegree { degree } => {
                write!(f, "Polynomial degree must be >= 1; got: {degree}")
            }
            MSRError::ThetaLengthMismatch { expected, actual } => {
                write!(f, "Theta length mismatch: expected {expected}, got {actual}")
            }
            MSRError::InvalidThetaInput { index, value } => {
                write!(f, "Theta entry at index {index} must be finite; got: {value}")
            }
            MSRError::InvalidProbability { regime, value } => {
                write!(f, "Stay probability of regime {regime} must lie in (0, 1); got: {value}")
            }
            MSRError::InvalidVarianceFloor { value } => {
                write!(f, "variance_floor must be finite and > 0; got: {value}")
            }
            // ---- Estimation / prediction ----
            MSRError::ConvergenceError { status, iterations } => {
                write!(f, "Optimizer did not converge after {iterations} iterations: {status}")
            }
            MSRError::OptimizationFailed { status } => {
                write!(f, "Optimizer failed with status: {status}")
            }
            MSRError::ModelNotFitted => {
                write!(f, "Model hasn't been fitted yet.")
            }
            MSRError::FeatureMismatch { expected, actual } => {
                write!(f, "Expected {expected} raw features per row; got {actual}.")
            }
        }
    }
}

impl From<OptError> for MSRError {
    fn from(err: OptError) -> Self {
        match err {
            OptError::InvalidRegime { regime } => MSRError::InvalidRegime { regime },
            OptError::SingularMatrix { reason } => MSRError::SingularMatrix { reason },
            OptError::NonPositiveVariance { regime, value } => {
                MSRError::NonPositiveVariance { regime, value }
            }
            OptError::ThetaLengthMismatch { expected, actual } => {
                MSRError::ThetaLengthMismatch { expected, actual }
            }
            OptError::InvalidThetaInput { index, value } => {
                MSRError::InvalidThetaInput { index, value }
            }
            other => MSRError::OptimizationFailed { status: other.to_string() },
        }
    }
}

/// Convert an [`MSRError`] into a Python `ValueError` with the error message.
#[cfg(feature = "python-bindings")]
impl From<MSRError> for PyErr {
    fn from(err: MSRError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}
