//! report::quantities — the fixed set of reported derived quantities.
//!
//! Purpose
//! -------
//! Enumerate the twelve derived-quantity groups the model reports with
//! uncertainty, in their fixed output order, and evaluate each as a
//! differentiable map of the full parameter vector. Keeping every
//! quantity behind one `eval` entry point lets the reporting layer
//! propagate uncertainty with a single generic delta-method routine
//! instead of twelve hardcoded formulas.
//!
//! Key behaviors
//! -------------
//! - [`Quantity`] lists the groups; [`Quantity::REPORT_ORDER`] fixes the
//!   exact ordering downstream consumers match by name:
//!   `beta_prev, tau_phi_prev, phi_prev, rho_prev, beta_anc, tau_b_anc,
//!   b_anc, rho_anc, beta_art, tau_phi_art, phi_art, alpha_art`.
//! - [`Quantity::eval`] recomputes the quantity from scratch at any
//!   parameter point — scalar groups yield length-1 vectors, per-region
//!   groups yield length-`n` vectors.
//!
//! Invariants & assumptions
//! ------------------------
//! - Evaluation is pure: same `(θ, data)` in, same value out, no cached
//!   state. This keeps finite-difference Jacobians through `eval`
//!   well-defined.
//! - `alpha_art` is the one fallible group: it inherits the reject
//!   policy of [`alpha_art`] for zero ART counts and
//!   degenerate prevalence.
//!
//! Testing notes
//! -------------
//! - Unit tests pin the report order, the name mapping, per-group
//!   lengths, and the round-trip identity `tau = 1/exp(log_sigma)²`.
use crate::model::core::{
    data::SurveillanceData,
    params::ParamLayout,
    transforms::{alpha_art, link_state, precision},
};
use crate::model::errors::ModelResult;
use ndarray::{Array1, array};

/// The reported derived-quantity groups, in no particular order; see
/// [`Quantity::REPORT_ORDER`] for the output ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quantity {
    /// Survey intercept.
    BetaPrev,
    /// Precision of the survey random effects.
    TauPhiPrev,
    /// Survey random effects (per region).
    PhiPrev,
    /// Survey prevalence on the probability scale (per region).
    RhoPrev,
    /// ANC bias intercept.
    BetaAnc,
    /// Precision of the ANC bias effects.
    TauBAnc,
    /// ANC bias effects (per region).
    BAnc,
    /// ANC prevalence on the probability scale (per region).
    RhoAnc,
    /// ART intercept.
    BetaArt,
    /// Precision of the ART random effects.
    TauPhiArt,
    /// ART random effects (per region).
    PhiArt,
    /// ART program coverage (per region).
    AlphaArt,
}

impl Quantity {
    /// The fixed output ordering of the report. Downstream consumers
    /// match groups by name, so this order is part of the contract.
    pub const REPORT_ORDER: [Quantity; 12] = [
        Quantity::BetaPrev,
        Quantity::TauPhiPrev,
        Quantity::PhiPrev,
        Quantity::RhoPrev,
        Quantity::BetaAnc,
        Quantity::TauBAnc,
        Quantity::BAnc,
        Quantity::RhoAnc,
        Quantity::BetaArt,
        Quantity::TauPhiArt,
        Quantity::PhiArt,
        Quantity::AlphaArt,
    ];

    /// Stable name used to match groups in the output table.
    pub fn name(self) -> &'static str {
        match self {
            Quantity::BetaPrev => "beta_prev",
            Quantity::TauPhiPrev => "tau_phi_prev",
            Quantity::PhiPrev => "phi_prev",
            Quantity::RhoPrev => "rho_prev",
            Quantity::BetaAnc => "beta_anc",
            Quantity::TauBAnc => "tau_b_anc",
            Quantity::BAnc => "b_anc",
            Quantity::RhoAnc => "rho_anc",
            Quantity::BetaArt => "beta_art",
            Quantity::TauPhiArt => "tau_phi_art",
            Quantity::PhiArt => "phi_art",
            Quantity::AlphaArt => "alpha_art",
        }
    }

    /// Number of components: 1 for scalar groups, `n_regions` for
    /// per-region groups.
    pub fn len(self, n_regions: usize) -> usize {
        match self {
            Quantity::BetaPrev
            | Quantity::TauPhiPrev
            | Quantity::BetaAnc
            | Quantity::TauBAnc
            | Quantity::BetaArt
            | Quantity::TauPhiArt => 1,
            Quantity::PhiPrev
            | Quantity::RhoPrev
            | Quantity::BAnc
            | Quantity::RhoAnc
            | Quantity::PhiArt
            | Quantity::AlphaArt => n_regions,
        }
    }

    /// Evaluate the group at one parameter point.
    ///
    /// Recomputes link-scale state from scratch; scalar groups return a
    /// length-1 vector so every group shares one shape downstream.
    ///
    /// # Errors
    /// - Layout violations from [`ParamLayout::view`].
    /// - [`ModelError::AlphaArtUndefined`] from the coverage identity.
    ///
    /// [`ModelError::AlphaArtUndefined`]: crate::model::errors::ModelError::AlphaArtUndefined
    pub fn eval(
        self, theta: &Array1<f64>, layout: &ParamLayout, data: &SurveillanceData,
    ) -> ModelResult<Array1<f64>> {
        let view = layout.view(theta)?;
        match self {
            Quantity::BetaPrev => Ok(array![view.beta_prev]),
            Quantity::TauPhiPrev => Ok(array![precision(view.log_sigma_phi_prev)]),
            Quantity::PhiPrev => Ok(view.phi_prev.to_owned()),
            Quantity::RhoPrev => Ok(link_state(&view).rho_prev),
            Quantity::BetaAnc => Ok(array![view.beta_anc]),
            Quantity::TauBAnc => Ok(array![precision(view.log_sigma_b_anc)]),
            Quantity::BAnc => Ok(view.b_anc.to_owned()),
            Quantity::RhoAnc => Ok(link_state(&view).rho_anc),
            Quantity::BetaArt => Ok(array![view.beta_art]),
            Quantity::TauPhiArt => Ok(array![precision(view.log_sigma_phi_art)]),
            Quantity::PhiArt => Ok(view.phi_art.to_owned()),
            Quantity::AlphaArt => alpha_art(&link_state(&view).rho_prev, data),
        }
    }
}
