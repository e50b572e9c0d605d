//! inference — uncertainty quantification for fitted models.
//!
//! Purpose
//! -------
//! Hold the post-estimation numerics that sit on top of the optimizer:
//! currently classical standard errors from the observed information
//! matrix, computed by finite differences and an eigen-truncated
//! pseudoinverse.
//!
//! Downstream usage
//! ----------------
//! - `switching::models::MarkovSwitchingModel::standard_errors` is the
//!   main consumer; it supplies the gradient map and applies the delta
//!   method to reach model-space parameters.

pub mod hessian;

// ---- Re-exports (primary surface) -----------------------------------------

pub use self::hessian::calc_standard_errors;
