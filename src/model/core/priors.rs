//! Penalty (prior) layer of the joint prevalence model.
//!
//! Purpose
//! -------
//! Compute the scalar negative log prior added to the objective. Nine
//! prior groups regularize the parameter vector:
//!
//! - three half-normal priors (scale 2.5) on the standard deviations,
//!   evaluated on the log scale with an explicit Jacobian correction,
//! - three Gaussian priors on the intercepts
//!   (`beta_prev ~ N(−2, 1)`, `beta_anc ~ N(0, 1)`, `beta_art ~ N(0, 1)`),
//! - three iid standard-normal priors over the random-effect vectors,
//!   summed across regions.
//!
//! The Jacobian term
//! -----------------
//! Each scale is optimized as `log_sigma` but its prior is specified on
//! the constrained scale `sigma = exp(log_sigma) > 0`. The change of
//! variables contributes `+log_sigma` to the log prior density:
//!
//! `log p(log_sigma) = log N(sigma; 0, 2.5) + log_sigma`
//!
//! The term is kept explicit here — folding it into a generic prior
//! abstraction silently shifts the posterior mode when it is dropped.
//!
//! Conventions
//! -----------
//! - Sign convention is negative-log: the return value of [`penalty`]
//!   is **added** to the running negative log-likelihood.
//! - All densities are evaluated through `statrs` normals; constructor
//!   failures (impossible for these fixed hyperparameters, but typed)
//!   propagate as `ModelError::PriorDensity`.
//!
//! Testing notes
//! -------------
//! - Unit tests check the closed-form value for a zero parameter vector,
//!   permutation equivariance over regions, and the presence of the
//!   Jacobian term.
use crate::model::{core::params::ParamView, errors::ModelResult};
use statrs::distribution::{Continuous, Normal};

/// Prior scale of the half-normal on each standard deviation.
pub const SIGMA_PRIOR_SCALE: f64 = 2.5;

/// Prior mean of the survey intercept (baseline logit prevalence).
pub const BETA_PREV_PRIOR_MEAN: f64 = -2.0;

/// Negative log prior for one parameter view.
///
/// Sums the nine prior groups described in the module docs into a single
/// scalar. Output is finite for every finite input: the half-normal
/// density is evaluated at `sigma = exp(log_sigma) > 0` and the Gaussian
/// terms are quadratic.
///
/// # Errors
/// - `ModelError::PriorDensity` if a `statrs` normal cannot be
///   constructed (fixed hyperparameters make this unreachable in
///   practice, but the error path is typed rather than panicking).
pub fn penalty(params: &ParamView<'_>) -> ModelResult<f64> {
    let half_normal = Normal::new(0.0, SIGMA_PRIOR_SCALE)?;
    let std_normal = Normal::new(0.0, 1.0)?;
    let beta_prev_prior = Normal::new(BETA_PREV_PRIOR_MEAN, 1.0)?;

    let mut nlp = 0.0;

    // Scales: half-normal on sigma plus the log-scale Jacobian.
    for log_sigma in
        [params.log_sigma_phi_prev, params.log_sigma_b_anc, params.log_sigma_phi_art]
    {
        let sigma = log_sigma.exp();
        nlp -= half_normal.ln_pdf(sigma) + log_sigma;
    }

    // Intercepts.
    nlp -= beta_prev_prior.ln_pdf(params.beta_prev);
    nlp -= std_normal.ln_pdf(params.beta_anc);
    nlp -= std_normal.ln_pdf(params.beta_art);

    // Random effects: iid standard normal, summed over regions.
    for effects in [&params.phi_prev, &params.b_anc, &params.phi_art] {
        for &value in effects.iter() {
            nlp -= std_normal.ln_pdf(value);
        }
    }

    Ok(nlp)
}
