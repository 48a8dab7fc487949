//! Link-scale transforms for the joint prevalence model.
//!
//! Purpose
//! -------
//! Turn a parameter view into the link-scale linear predictors and
//! probability-scale quantities the likelihood and reporting layers
//! consume. Everything here is a pure function of its inputs, recomputed
//! from scratch on every objective evaluation — there is no caching
//! between evaluations.
//!
//! Key behaviors
//! -------------
//! - [`link_state`] builds the three linear predictors and the two
//!   inverse-logit prevalences:
//!   - `eta_prev = beta_prev + exp(log_sigma_phi_prev) · phi_prev`
//!   - `eta_anc  = eta_prev + beta_anc + exp(log_sigma_b_anc) · b_anc`
//!     (ANC prevalence is survey prevalence plus a bias, on the logit
//!     scale)
//!   - `eta_art  = beta_art + exp(log_sigma_phi_art) · phi_art`
//!     (independent of the survey/ANC arms)
//! - [`alpha_art`] evaluates the deterministic ART coverage identity
//!   `alpha = exp(ln a_art + ln rho_prev − ln n_art)` per region. This
//!   is a consistency relation (ART count ≈ coverage × prevalence ×
//!   population), not a likelihood term, and it is only defined for
//!   strictly positive `a_art` and `rho_prev`.
//! - [`precision`] maps a log standard deviation to the reported
//!   precision `tau = 1 / exp(log_sigma)²`.
//!
//! Invariants & assumptions
//! ------------------------
//! - Scale factors are always `exp(log_sigma_*)`, strictly positive for
//!   any finite unconstrained input.
//! - `rho_prev`, `rho_anc` lie in `(0, 1)` except when the inverse-logit
//!   underflows at |eta| ≳ 745; [`alpha_art`] treats an underflowed
//!   `rho_prev` as a domain violation rather than clamping it.
//! - Zero ART counts are valid data but make the coverage identity
//!   undefined; the error policy is **reject** ([`ModelError::AlphaArtUndefined`]),
//!   never a NaN or −∞ sentinel.
//!
//! Downstream usage
//! ----------------
//! - `model::core::likelihood` scores the survey and ANC arms at
//!   `eta_prev` / `eta_anc`.
//! - `report::quantities` evaluates `rho_prev`, `rho_anc`, and
//!   [`alpha_art`] for the estimates table; the objective path never
//!   calls [`alpha_art`].
//!
//! Testing notes
//! -------------
//! - Unit tests pin the n = 1 zero-initialization scenario, the
//!   logit-scale ANC bias decomposition, and both rejection branches of
//!   [`alpha_art`].
use crate::model::{
    core::{data::SurveillanceData, params::ParamView},
    errors::{ModelError, ModelResult},
};
use crate::optimization::numerical_stability::safe_invlogit;
use ndarray::Array1;

/// Link-scale state of the model at one parameter point.
///
/// All vectors have length `n_regions`. `eta_*` are the linear
/// predictors; `rho_*` their inverse-logit images.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkState {
    /// Survey-arm linear predictor.
    pub eta_prev: Array1<f64>,
    /// ANC-arm linear predictor (`eta_prev` plus the bias term).
    pub eta_anc: Array1<f64>,
    /// ART-arm linear predictor.
    pub eta_art: Array1<f64>,
    /// Survey prevalence on the probability scale.
    pub rho_prev: Array1<f64>,
    /// ANC prevalence on the probability scale.
    pub rho_anc: Array1<f64>,
}

/// Build the [`LinkState`] for one parameter view.
///
/// Pure and side-effect free; every operation has a defined derivative
/// at any finite input, so finite differences through this function are
/// well-behaved.
pub fn link_state(params: &ParamView<'_>) -> LinkState {
    let sigma_phi_prev = params.log_sigma_phi_prev.exp();
    let eta_prev = params.phi_prev.mapv(|phi| params.beta_prev + sigma_phi_prev * phi);

    let sigma_b_anc = params.log_sigma_b_anc.exp();
    let eta_anc = ndarray::Zip::from(&eta_prev)
        .and(&params.b_anc)
        .map_collect(|&eta, &b| eta + params.beta_anc + sigma_b_anc * b);

    let sigma_phi_art = params.log_sigma_phi_art.exp();
    let eta_art = params.phi_art.mapv(|phi| params.beta_art + sigma_phi_art * phi);

    let rho_prev = eta_prev.mapv(safe_invlogit);
    let rho_anc = eta_anc.mapv(safe_invlogit);

    LinkState { eta_prev, eta_anc, eta_art, rho_prev, rho_anc }
}

/// Evaluate the ART coverage identity per region.
///
/// `alpha_art[i] = exp(ln a_art[i] + ln rho_prev[i] − ln n_art[i])`,
/// i.e. coverage = ART count / (prevalence × population), computed on
/// the log scale.
///
/// # Errors
/// - [`ModelError::AlphaArtUndefined`] for the first region where
///   `a_art[i] == 0` or `rho_prev[i]` has underflowed to 0 — the log
///   identity is undefined there and no sentinel is propagated.
pub fn alpha_art(rho_prev: &Array1<f64>, data: &SurveillanceData) -> ModelResult<Array1<f64>> {
    let mut alpha = Array1::zeros(rho_prev.len());
    for (index, ((&rho, &a), &pop)) in
        rho_prev.iter().zip(data.a_art.iter()).zip(data.n_art.iter()).enumerate()
    {
        if a <= 0.0 || rho <= 0.0 {
            return Err(ModelError::AlphaArtUndefined { index, a_art: a, rho_prev: rho });
        }
        alpha[index] = (a.ln() + rho.ln() - pop.ln()).exp();
    }
    Ok(alpha)
}

/// Precision `tau = 1 / sigma²` for a log standard deviation.
pub fn precision(log_sigma: f64) -> f64 {
    1.0 / log_sigma.exp().powi(2)
}
