//! model — the joint prevalence model: data contract, parameters,
//! transforms, priors, likelihood, and the assembled objective.
//!
//! Purpose
//! -------
//! House everything specific to the statistical model being fitted:
//! validated per-region observations, the unconstrained parameter
//! packing, the link-scale transforms, the penalty and likelihood
//! layers, and the [`JointPrevalenceModel`] that assembles them into
//! the optimizer objective.
//!
//! Key behaviors
//! -------------
//! - `core` holds the pure leaf components; `models` wires them into
//!   the user-facing type; `errors` defines the layered error enums
//!   (`DataError` for contract violations, `ModelError` for evaluation
//!   failures) that funnel into the optimizer's `OptError`.
//! - The model is hierarchical: regional random effects scaled by
//!   half-normal-prior standard deviations sit on top of Gaussian
//!   intercepts, with ANC prevalence modeled as survey prevalence plus
//!   a bias on the logit scale.
//! - The ART arm contributes no likelihood term; its columns feed only
//!   the reported coverage identity.
//!
//! Downstream usage
//! ----------------
//! - Typical flow:
//!   `SurveillanceData::new(...)` → `JointPrevalenceModel::new(n, opts)`
//!   → `fit(theta0, &data)` → `estimates(&data)`.

pub mod core;
pub mod errors;
pub mod models;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::core::{
    FitOptions, LinkState, ParamLayout, ParamView, SurveillanceData, alpha_art, link_state,
    neg_log_likelihood, penalty, precision,
};
pub use self::errors::{DataError, DataResult, ModelError, ModelResult};
pub use self::models::JointPrevalenceModel;

// ---- Optional convenience prelude for downstream crates -------------------

pub mod prelude {
    pub use super::core::prelude::*;
    pub use super::errors::{DataError, DataResult, ModelError, ModelResult};
    pub use super::models::JointPrevalenceModel;
}
