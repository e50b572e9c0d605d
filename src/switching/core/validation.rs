//! Validation helpers shared by the estimator's public surface.
//!
//! Purpose
//! -------
//! Keep the checks that guard accessors and forecasting in one place so the
//! model methods fail with the same structured errors wherever they are
//! called from.
//!
//! Key behaviors
//! -------------
//! - [`validate_regime`] rejects regime indices outside `{0, 1}`.
//! - [`validate_forecast_rows`] checks new design rows against the raw
//!   feature count seen at fit time before they are expanded.
//!
//! Conventions
//! -----------
//! - Helpers only inspect shapes and values; they never allocate copies of
//!   the inputs.
use crate::switching::{
    core::transition::N_REGIMES,
    errors::{MSRError, MSRResult},
};
use ndarray::ArrayView2;

/// Check that `regime` names one of the two regimes.
///
/// # Errors
/// - `MSRError::InvalidRegime` for `regime >= 2`.
pub fn validate_regime(regime: usize) -> MSRResult<usize> {
    if regime >= N_REGIMES {
        return Err(MSRError::InvalidRegime { regime });
    }
    Ok(regime)
}

/// Check raw forecast rows before expansion.
///
/// Parameters
/// ----------
/// - `x_new`: raw design rows, shape `(m, p_raw)`.
/// - `expected`: raw feature count of the fitted design.
///
/// Errors
/// ------
/// - `MSRError::FeatureMismatch` when `x_new.ncols() != expected`.
/// - `MSRError::EmptyDesign` when `x_new` has no rows.
/// - `MSRError::NonFiniteData` for the first NaN/±∞ entry.
pub fn validate_forecast_rows(x_new: ArrayView2<'_, f64>, expected: usize) -> MSRResult<()> {
    if x_new.ncols() != expected {
        return Err(MSRError::FeatureMismatch { expected, actual: x_new.ncols() });
    }
    if x_new.nrows() == 0 {
        return Err(MSRError::EmptyDesign);
    }
    match x_new.indexed_iter().find(|(_, v)| !v.is_finite()) {
        Some(((row, col), &value)) => Err(MSRError::NonFiniteData { row, col: Some(col), value }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array2, array};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover the regime guard and each branch of the forecast-row
    // check.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Only regimes 0 and 1 pass.
    //
    // Given
    // -----
    // - Regimes 0, 1, 2.
    //
    // Expect
    // ------
    // - `Ok` for the first two, `InvalidRegime { regime: 2 }` for the last.
    fn regime_guard() {
        assert_eq!(validate_regime(0), Ok(0));
        assert_eq!(validate_regime(1), Ok(1));
        assert_eq!(validate_regime(2), Err(MSRError::InvalidRegime { regime: 2 }));
    }

    #[test]
    // Purpose
    // -------
    // Forecast rows must match the fitted raw width and be finite.
    //
    // Given
    // -----
    // - Fitted width 2; rows with 3 columns, 0 rows, a NaN, and a valid row.
    //
    // Expect
    // ------
    // - `FeatureMismatch`, `EmptyDesign`, `NonFiniteData`, then `Ok`.
    fn forecast_rows_guard() {
        assert_eq!(
            validate_forecast_rows(array![[1.0, 2.0, 3.0]].view(), 2),
            Err(MSRError::FeatureMismatch { expected: 2, actual: 3 })
        );
        assert_eq!(
            validate_forecast_rows(Array2::<f64>::zeros((0, 2)).view(), 2),
            Err(MSRError::EmptyDesign)
        );
        assert!(matches!(
            validate_forecast_rows(array![[1.0, f64::NAN]].view(), 2),
            Err(MSRError::NonFiniteData { row: 0, col: Some(1), .. })
        ));
        assert_eq!(validate_forecast_rows(array![[1.0, 2.0]].view(), 2), Ok(()));
    }
}
