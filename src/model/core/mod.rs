//! core — validated inputs, parameter layout, and pure model functions.
//!
//! Purpose
//! -------
//! Hold the leaf components of the joint prevalence model: the data
//! contract ([`SurveillanceData`]), the parameter packing
//! ([`ParamLayout`] / [`ParamView`]), the link-scale transforms
//! ([`link_state`], [`alpha_art`], [`precision`]), the penalty layer
//! ([`penalty`]), the likelihood layer ([`neg_log_likelihood`]), and fit
//! configuration ([`FitOptions`]).
//!
//! Key behaviors
//! -------------
//! - Everything in this module is a pure function of its inputs;
//!   derived quantities are recomputed from scratch on every objective
//!   evaluation so the computation stays stateless and differentiable
//!   end to end.
//! - Validation happens at the edges (data construction, parameter
//!   views); the numeric interior assumes validated inputs.
//!
//! Downstream usage
//! ----------------
//! - `model::models::joint` assembles [`penalty`] +
//!   [`neg_log_likelihood`] into the optimizer objective.
//! - `report` evaluates the transforms at the fitted point for the
//!   estimates table.

pub mod data;
pub mod likelihood;
pub mod options;
pub mod params;
pub mod priors;
pub mod transforms;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::data::SurveillanceData;
pub use self::likelihood::{binomial_logit_lpmf, neg_log_likelihood};
pub use self::options::FitOptions;
pub use self::params::{ParamLayout, ParamView};
pub use self::priors::penalty;
pub use self::transforms::{LinkState, alpha_art, link_state, precision};

// ---- Optional convenience prelude for downstream crates -------------------

pub mod prelude {
    pub use super::data::SurveillanceData;
    pub use super::likelihood::neg_log_likelihood;
    pub use super::options::FitOptions;
    pub use super::params::{ParamLayout, ParamView};
    pub use super::priors::penalty;
    pub use super::transforms::{LinkState, alpha_art, link_state, precision};
}
