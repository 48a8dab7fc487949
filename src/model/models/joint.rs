//! The joint prevalence model: objective assembly, fitting, and reporting.
//!
//! Purpose
//! -------
//! Wire the pure core layers into one user-facing type.
//! [`JointPrevalenceModel`] implements the optimizer's [`Objective`]
//! trait by summing the penalty and likelihood layers into a single
//! penalized negative log-likelihood, runs the MAP fit through
//! `minimize`, and turns the fitted point into the estimates table via
//! the inference and reporting layers.
//!
//! Key behaviors
//! -------------
//! - `value(θ, data) = penalty(θ) + nll(θ, data)` — a single finite
//!   scalar, recomputed statelessly on every call; the optimizer
//!   minimizes it directly.
//! - `check` runs once before the first iteration and rejects region
//!   count mismatches and malformed `θ` up front.
//! - `fit` caches the [`OptimOutcome`]; `covariance` and `estimates`
//!   derive uncertainty from the finite-difference Hessian at `θ̂`.
//! - Non-convergence is carried into the estimates table, not raised.
//!
//! Invariants & assumptions
//! ------------------------
//! - The data's region count must equal the layout's; `check` enforces
//!   this before the optimizer touches the objective.
//! - `grad` implements the exact cost gradient via the chain rule
//!   through the link scale (binomial residuals `m·ρ − y` propagated to
//!   intercepts, effects, and log scales, plus the closed-form prior
//!   derivatives). The optimizer consumes it directly, and the Hessian
//!   at the optimum finite-differences this analytic gradient rather
//!   than stacking two finite-difference passes.
//!
//! Testing notes
//! -------------
//! - Unit tests cover objective assembly against the layer sum, the
//!   analytic gradient against central finite differences, the
//!   fixed-effects reduction (zero random effects make the likelihood
//!   invariant to the scale parameters), and the not-fitted guard.
//! - The full fit → covariance → estimates pipeline is exercised in the
//!   integration suite.
use crate::inference::hessian::covariance_from_hessian;
use crate::model::core::{
    data::SurveillanceData,
    likelihood::neg_log_likelihood,
    options::FitOptions,
    params::ParamLayout,
    priors::{BETA_PREV_PRIOR_MEAN, SIGMA_PRIOR_SCALE, penalty},
    transforms::link_state,
};
use crate::model::errors::ModelError;
use crate::optimization::{
    errors::{OptError, OptResult},
    map_optimizer::{Cost, Grad, MAPOptions, Objective, OptimOutcome, Theta, minimize},
};
use crate::report::table::{EstimateTable, build_estimate_table};
use ndarray::Array2;

/// `JointPrevalenceModel` — MAP estimation of regional HIV prevalence,
/// ANC bias, and ART coverage.
///
/// Purpose
/// -------
/// Own the parameter layout and fit configuration for one model
/// instance, cache the most recent optimizer outcome, and expose the
/// full pipeline: [`fit`](Self::fit), [`covariance`](Self::covariance),
/// [`estimates`](Self::estimates).
///
/// Fields
/// ------
/// - `layout`: [`ParamLayout`]
///   Packing of the unconstrained parameter vector for `n` regions.
/// - `options`: [`FitOptions`]
///   Estimation configuration; optimizer knobs are forwarded untouched.
/// - `results`: `Option<OptimOutcome>`
///   Outcome of the most recent [`fit`](Self::fit) call, if any.
///
/// Invariants
/// ----------
/// - `results` always corresponds to the latest successful `fit` on
///   this instance.
///
/// Notes
/// -----
/// - The model carries no data: the same instance can be refitted
///   against different datasets with the same region count.
#[derive(Debug, Clone)]
pub struct JointPrevalenceModel {
    /// Parameter packing for `n` regions.
    pub layout: ParamLayout,
    /// Estimation-time configuration.
    pub options: FitOptions,
    /// Most recent optimizer outcome.
    pub results: Option<OptimOutcome>,
}

impl Objective for JointPrevalenceModel {
    type Data = SurveillanceData;

    /// Penalized negative log-likelihood: `penalty(θ) + nll(θ, data)`.
    ///
    /// Recomputed from scratch on every call; no state is shared
    /// between evaluations.
    fn value(&self, theta: &Theta, data: &Self::Data) -> OptResult<Cost> {
        let view = self.layout.view(theta)?;
        let state = link_state(&view);
        let nlp = penalty(&view)?;
        Ok(nlp + neg_log_likelihood(&state, data))
    }

    /// Pre-fit validation: region counts must agree and `θ` must match
    /// the layout.
    fn check(&self, theta: &Theta, data: &Self::Data) -> OptResult<()> {
        if data.n_regions() != self.layout.n_regions {
            return Err(ModelError::RegionCountMismatch {
                expected: self.layout.n_regions,
                actual: data.n_regions(),
            }
            .into());
        }
        self.layout.view(theta)?;
        Ok(())
    }

    /// Exact gradient of the cost, assembled by the chain rule.
    ///
    /// The scored arms contribute through the binomial residuals
    /// `r_prev[i] = m_prev[i]·ρ_prev[i] − y_prev[i]` and
    /// `r_anc[i] = m_anc[i]·ρ_anc[i] − y_anc[i]`; since
    /// `η_anc = η_prev + bias`, the survey block sees `r_prev + r_anc`.
    /// Prior derivatives are closed-form: `β − μ` for intercepts, `φ`
    /// for effects, and `σ²/s₀² − 1` for each log scale (half-normal
    /// plus the Jacobian term). The ART blocks carry prior terms only.
    fn grad(&self, theta: &Theta, data: &Self::Data) -> OptResult<Grad> {
        let view = self.layout.view(theta)?;
        let state = link_state(&view);
        let n = self.layout.n_regions;

        let sigma_prev = view.log_sigma_phi_prev.exp();
        let sigma_anc = view.log_sigma_b_anc.exp();
        let sigma_art = view.log_sigma_phi_art.exp();

        let mut grad = Theta::zeros(self.layout.dim());
        // Intercept priors.
        grad[0] = view.beta_prev - BETA_PREV_PRIOR_MEAN;
        grad[2 + n] = view.beta_anc;
        grad[4 + 2 * n] = view.beta_art;
        // Log-scale priors (half-normal with Jacobian correction).
        grad[1 + n] = sigma_prev.powi(2) / SIGMA_PRIOR_SCALE.powi(2) - 1.0;
        grad[3 + 2 * n] = sigma_anc.powi(2) / SIGMA_PRIOR_SCALE.powi(2) - 1.0;
        grad[5 + 3 * n] = sigma_art.powi(2) / SIGMA_PRIOR_SCALE.powi(2) - 1.0;

        for i in 0..n {
            let r_prev = data.m_prev[i] * state.rho_prev[i] - data.y_prev[i];
            let r_anc = data.m_anc[i] * state.rho_anc[i] - data.y_anc[i];

            grad[0] += r_prev + r_anc;
            grad[1 + i] = view.phi_prev[i] + sigma_prev * (r_prev + r_anc);
            grad[1 + n] += sigma_prev * view.phi_prev[i] * (r_prev + r_anc);

            grad[2 + n] += r_anc;
            grad[3 + n + i] = view.b_anc[i] + sigma_anc * r_anc;
            grad[3 + 2 * n] += sigma_anc * view.b_anc[i] * r_anc;

            // ART arm is unscored: effect entries carry only their prior.
            grad[5 + 2 * n + i] = view.phi_art[i];
        }
        Ok(grad)
    }
}

impl JointPrevalenceModel {
    /// Create a model for `n_regions` regions with the given options.
    pub fn new(n_regions: usize, options: FitOptions) -> Self {
        Self { layout: ParamLayout::new(n_regions), options, results: None }
    }

    /// Convenience constructor with default optimizer options.
    pub fn with_defaults(n_regions: usize) -> Self {
        Self::new(n_regions, FitOptions::new(MAPOptions::default()))
    }

    /// Run the MAP fit from `theta0` and cache the outcome.
    ///
    /// A run that stops without meeting tolerances still produces an
    /// outcome (`converged == false`); only evaluation or backend
    /// failures are errors.
    ///
    /// # Errors
    /// - Propagates `check` failures, objective evaluation errors, and
    ///   backend solver errors.
    pub fn fit(&mut self, theta0: Theta, data: &SurveillanceData) -> OptResult<()> {
        let outcome = minimize(self, theta0, data, &self.options.map_opts)?;
        self.results = Some(outcome);
        Ok(())
    }

    /// Parameter covariance at the fitted point.
    ///
    /// Builds the finite-difference Hessian of the analytic objective
    /// gradient at `θ̂` (through a NaN-capturing closure, so evaluation
    /// failures surface as `InvalidHessian` rather than poisoning the
    /// result) and returns its eigen-truncated pseudoinverse.
    ///
    /// # Errors
    /// - [`OptError::ModelNotFitted`] before a successful [`fit`](Self::fit).
    /// - Hessian validation failures from the inference layer.
    pub fn covariance(&self, data: &SurveillanceData) -> OptResult<Array2<f64>> {
        let results = self.results.as_ref().ok_or(OptError::ModelNotFitted)?;
        let dim = self.layout.dim();
        let grad_fn = |theta: &Theta| -> Grad {
            match self.grad(theta, data) {
                Ok(grad) => grad,
                Err(_) => Grad::from_elem(dim, f64::NAN),
            }
        };
        covariance_from_hessian(&grad_fn, &results.theta_hat)
    }

    /// Build the estimates table at the fitted point.
    ///
    /// Evaluates the twelve reported quantity groups at `θ̂`, propagates
    /// the parameter covariance through each component with the delta
    /// method, and copies the optimizer's convergence report into the
    /// table.
    ///
    /// # Errors
    /// - [`OptError::ModelNotFitted`] before a successful [`fit`](Self::fit).
    /// - `AlphaArtUndefined` when a region's ART coverage identity is
    ///   undefined (zero count or degenerate prevalence).
    /// - Covariance or delta-method failures.
    pub fn estimates(&self, data: &SurveillanceData) -> OptResult<EstimateTable> {
        let results = self.results.as_ref().ok_or(OptError::ModelNotFitted)?;
        let cov = self.covariance(data)?;
        build_estimate_table(
            &self.layout,
            data,
            &results.theta_hat,
            &cov,
            results.converged,
            results.status.clone(),
        )
    }
}
