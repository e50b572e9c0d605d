//! Markov-switching regression estimator: fit, fitted values, forecasts,
//! and standard errors.
//!
//! This module wires the two-regime Hamilton filter to the `LogLikelihood`
//! trait and drives `maximize` over it.
//!
//! Key ideas:
//! - The optimizer works in unconstrained space `u` (softplus variances,
//!   clipped transition logits); every `u` maps to valid parameters, so the
//!   line search never leaves the domain.
//! - Gradients come from central finite differences in the optimizer
//!   adapter; the likelihood floors conditional densities so every trial
//!   point has a finite value.
//! - `fit` tries each start produced by the configured
//!   [`Init`](crate::switching::core::init::Init) policy,
//!   skips starts that fail, and keeps the converged run with the highest
//!   log-likelihood.
//! - Regime labels follow the start values: regime 0 is whatever regime 0
//!   was at the start (e.g. the first half of the sample for `TimeSplit`).
use crate::{
    inference::hessian::calc_standard_errors,
    optimization::{
        errors::OptResult,
        loglik_optimizer::{
            LogLikelihood, OptimOutcome, Theta, finite_diff::central_gradient, maximize,
        },
        numerical_stability::transformations::{safe_logistic, safe_softplus},
    },
    switching::{
        core::{
            data::MSRData,
            features::PolynomialFeatures,
            filter::{FilterOutput, hamilton_filter},
            options::MSROptions,
            params::{
                MAX_TRANSITION_LOGIT, MSRParams, check_theta_shape, logit_index,
                unconstrained_to_theta, variance_index,
            },
            transition::N_REGIMES,
            validation::{validate_forecast_rows, validate_regime},
        },
        errors::{MSRError, MSRResult},
        models::likelihood::{floored_mean_log_likelihood, mean_log_likelihood},
    },
};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

/// Relative step of the inner gradient used for the observed information.
const INFO_GRAD_STEP: f64 = 1e-5;

/// MSRFit — everything retained from a successful fit.
///
/// Fields
/// ------
/// - `params`: fitted model-space parameters.
/// - `filter`: Hamilton filter output at the fitted parameters.
/// - `design`: expanded design and response the model was fitted on.
/// - `n_raw_features`: raw column count expected by `predict`.
/// - `log_likelihood`: mean log-likelihood at the estimate (unfloored).
/// - `outcome`: optimizer diagnostics; `theta_hat` is in optimizer space.
#[derive(Debug, Clone, PartialEq)]
pub struct MSRFit {
    pub params: MSRParams,
    pub filter: FilterOutput,
    pub design: MSRData,
    pub n_raw_features: usize,
    pub log_likelihood: f64,
    pub outcome: OptimOutcome,
}

/// Two-regime Markov-switching linear regression.
///
/// # Notes
/// - Construct with [`MarkovSwitchingModel::new`], call
///   [`MarkovSwitchingModel::fit`], then use the accessors. Every accessor
///   returns `MSRError::ModelNotFitted` before a successful fit.
/// - Implements [`LogLikelihood`] over the expanded data, with `θ` in
///   optimizer space.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkovSwitchingModel {
    /// Estimation options.
    pub options: MSROptions,
    /// Fit results (populated after `fit`).
    pub results: Option<MSRFit>,
}

impl MarkovSwitchingModel {
    /// New unfitted model.
    pub fn new(options: MSROptions) -> MarkovSwitchingModel {
        MarkovSwitchingModel { options, results: None }
    }

    /// Fit by maximum likelihood and cache the result.
    ///
    /// Results of any earlier fit are dropped first, so a failed call leaves
    /// the model unfitted.
    ///
    /// ## Steps
    /// 1. Validate `(x, y)` and expand `x` with the configured polynomial
    ///    features.
    /// 2. For each start candidate of `options.init`, build start values and
    ///    run L-BFGS in optimizer space. Starts that cannot be built or whose
    ///    optimization errors are skipped.
    /// 3. Keep the converged run with the highest log-likelihood, map it to
    ///    model space, and rerun the filter there.
    ///
    /// ## Errors
    /// - Data validation errors from `MSRData::new` and the expander.
    /// - `MSRError::ConvergenceError` when runs finished but none converged
    ///   (reported for the best of them).
    /// - The last start or optimizer error when no run finished at all.
    pub fn fit(&mut self, x: ArrayView2<'_, f64>, y: ArrayView1<'_, f64>) -> MSRResult<&MSRFit> {
        self.results = None;
        let raw = MSRData::new(x.to_owned(), y.to_owned())?;
        let expander = self.options.expander()?;
        let design = MSRData::new(expander.transform(raw.x.view())?, raw.y)?;
        let p = design.n_features();

        let mut best_converged: Option<OptimOutcome> = None;
        let mut best_unconverged: Option<OptimOutcome> = None;
        let mut last_err = MSRError::OptimizationFailed { status: "no start values".to_string() };
        for init in self.options.init.candidates() {
            let start = match init.build_start(&design) {
                Ok(start) => start,
                Err(err) => {
                    last_err = err;
                    continue;
                }
            };
            match maximize(&*self, start.to_unconstrained(), &design, &self.options.mle_opts) {
                Ok(outcome) => {
                    let slot =
                        if outcome.converged { &mut best_converged } else { &mut best_unconverged };
                    if slot.as_ref().is_none_or(|best| outcome.value > best.value) {
                        *slot = Some(outcome);
                    }
                }
                Err(err) => last_err = err.into(),
            }
        }

        let outcome = match (best_converged, best_unconverged) {
            (Some(outcome), _) => outcome,
            (None, Some(outcome)) => {
                return Err(MSRError::ConvergenceError {
                    status: outcome.status,
                    iterations: outcome.iterations,
                });
            }
            (None, None) => return Err(last_err),
        };

        let floor = self.options.variance_floor;
        let theta = unconstrained_to_theta(outcome.theta_hat.view(), p, floor)?;
        let params = MSRParams::from_theta(theta.view(), p)?;
        let filter = hamilton_filter(design.x.view(), design.y.view(), theta.view())?;
        let log_likelihood = mean_log_likelihood(&filter);
        let fit = self.results.insert(MSRFit {
            params,
            filter,
            design,
            n_raw_features: raw.x.ncols(),
            log_likelihood,
            outcome,
        });
        Ok(fit)
    }

    /// Fitted results.
    ///
    /// # Errors
    /// - `MSRError::ModelNotFitted` before a successful `fit`.
    pub fn results(&self) -> MSRResult<&MSRFit> {
        self.results.as_ref().ok_or(MSRError::ModelNotFitted)
    }

    /// Fitted coefficients, shape `(2, p)`; row `s` is `β_s` over the
    /// expanded columns.
    pub fn coefficients_per_regime(&self) -> MSRResult<Array2<f64>> {
        Ok(self.results()?.params.beta.clone())
    }

    /// Coefficients of one regime.
    ///
    /// # Errors
    /// - `MSRError::ModelNotFitted`, or `MSRError::InvalidRegime` for
    ///   `regime >= 2`.
    pub fn regime_coefficients(&self, regime: usize) -> MSRResult<ArrayView1<'_, f64>> {
        let regime = validate_regime(regime)?;
        self.results()?.params.coefficients(regime)
    }

    /// Fitted variances `(σ₀², σ₁²)`.
    pub fn variance_per_regime(&self) -> MSRResult<Array1<f64>> {
        Ok(self.results()?.params.variances.clone())
    }

    /// Fitted transition matrix.
    pub fn transition_matrix(&self) -> MSRResult<Array2<f64>> {
        Ok(self.results()?.params.transition_matrix())
    }

    /// Filtered probabilities `Pr(S_t | y_0..y_t)`, shape `(n, 2)`.
    pub fn filtered_probabilities(&self) -> MSRResult<ArrayView2<'_, f64>> {
        Ok(self.results()?.filter.filtered.view())
    }

    /// One-step-ahead probabilities `Pr(S_{t+1} | y_0..y_t)`, shape `(n, 2)`.
    pub fn predicted_probabilities(&self) -> MSRResult<ArrayView2<'_, f64>> {
        Ok(self.results()?.filter.predicted.view())
    }

    /// Mean log-likelihood at the estimate.
    pub fn log_likelihood(&self) -> MSRResult<f64> {
        Ok(self.results()?.log_likelihood)
    }

    /// Expected regime durations `1 / (1 − p_ss)`.
    pub fn expected_durations(&self) -> MSRResult<Array1<f64>> {
        Ok(self.results()?.params.expected_durations())
    }

    /// One-step-ahead forecast for new raw design rows.
    ///
    /// Each row of `x_new` is treated as a candidate design for period `n`
    /// and forecast as `ŷ = Σ_s Pr(S_n = s | y_0..y_{n−1}) · x̃·β_s`, with `x̃`
    /// expanded exactly as at fit time.
    ///
    /// Returns
    /// -------
    /// `(forecasts, regime_probabilities)`: one forecast per row, and the
    /// regime distribution used to weight them.
    ///
    /// Errors
    /// ------
    /// - `MSRError::ModelNotFitted`.
    /// - `MSRError::FeatureMismatch`, `EmptyDesign`, or `NonFiniteData` for
    ///   bad rows.
    pub fn predict(&self, x_new: ArrayView2<'_, f64>) -> MSRResult<(Array1<f64>, Array1<f64>)> {
        let fit = self.results()?;
        validate_forecast_rows(x_new, fit.n_raw_features)?;
        let expanded = self.expander()?.transform(x_new)?;
        let probs = fit.filter.next_period_probabilities().to_owned();
        let regime_means = expanded.dot(&fit.params.beta.t());
        Ok((regime_means.dot(&probs), probs))
    }

    /// Standard errors of the model-space estimates.
    ///
    /// The observed information is the finite-difference Hessian of the
    /// negative mean log-likelihood in optimizer space, so the raw standard
    /// errors are scaled by `1 / sqrt(n − 1)`. They are mapped to model space
    /// with the delta method (diagonal Jacobian). A variance held at the
    /// floor, or a logit held at the clip, has a flat map there and gets a
    /// zero standard error.
    ///
    /// Returns
    /// -------
    /// Length `2p + 4`, ordered `(β₀, β₁, σ₀², σ₁², p₀₀, p₁₁)`: the last two
    /// entries refer to the stay probabilities, not their logits.
    ///
    /// Errors
    /// ------
    /// - `MSRError::ModelNotFitted`.
    /// - `MSRError::OptimizationFailed` when the Hessian is not finite.
    pub fn standard_errors(&self) -> MSRResult<Array1<f64>> {
        let fit = self.results()?;
        let u_hat = &fit.outcome.theta_hat;
        let design = &fit.design;
        let cost = |u: &Theta| self.value(u, design).map_or(f64::NAN, |ll| -ll);
        let grad = |u: &Theta| {
            central_gradient(u, &cost, INFO_GRAD_STEP)
                .unwrap_or_else(|_| Array1::from_elem(u.len(), f64::NAN))
        };
        let se_u = calc_standard_errors(&grad, u_hat)?;
        let scale = ((design.n_obs() - 1) as f64).sqrt();

        let jacobian = delta_jacobian(
            u_hat.view(),
            fit.params.stay_probs.view(),
            design.n_features(),
            self.options.variance_floor,
        );
        Ok(se_u * jacobian / scale)
    }

    fn expander(&self) -> MSRResult<PolynomialFeatures> {
        self.options.expander()
    }
}

/// Diagonal derivative of the optimizer-to-model map at `u`.
///
/// `1` for coefficients, `logistic(u)` for variances above the floor and
/// `p(1 − p)` for logits inside the clip; `0` where the floor or clip binds.
fn delta_jacobian(
    u: ArrayView1<'_, f64>, stay_probs: ArrayView1<'_, f64>, p: usize, variance_floor: f64,
) -> Array1<f64> {
    let mut jacobian = Array1::<f64>::ones(u.len());
    for regime in 0..N_REGIMES {
        let v = variance_index(p, regime);
        jacobian[v] =
            if safe_softplus(u[v]) > variance_floor { safe_logistic(u[v]) } else { 0.0 };
        let z = logit_index(p, regime);
        let prob = stay_probs[regime];
        jacobian[z] = if u[z].abs() < MAX_TRANSITION_LOGIT { prob * (1.0 - prob) } else { 0.0 };
    }
    jacobian
}

impl LogLikelihood for MarkovSwitchingModel {
    type Data = MSRData;

    /// Floored mean log-likelihood at optimizer-space `θ`.
    ///
    /// # Errors
    /// - Propagates mapping and filter errors as `OptError`.
    fn value(&self, theta: &Theta, data: &Self::Data) -> OptResult<f64> {
        let p = data.n_features();
        let model_theta = unconstrained_to_theta(theta.view(), p, self.options.variance_floor)?;
        let filter = hamilton_filter(data.x.view(), data.y.view(), model_theta.view())?;
        Ok(floored_mean_log_likelihood(&filter))
    }

    /// Length `2p + 4` and finite entries.
    fn check(&self, theta: &Theta, data: &Self::Data) -> OptResult<()> {
        check_theta_shape(theta.view(), data.n_features())?;
        Ok(())
    }
}

impl Default for MarkovSwitchingModel {
    fn default() -> Self {
        MarkovSwitchingModel::new(MSROptions::default())
    }
}
