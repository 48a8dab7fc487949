//! models — the user-facing joint prevalence model.
//!
//! Purpose
//! -------
//! Collect the high-level model API on top of `model::core`: the
//! [`JointPrevalenceModel`] type that assembles the objective,
//! implements the optimizer's `Objective` trait, and provides `fit`,
//! `covariance`, and `estimates`.
//!
//! Downstream usage
//! ----------------
//! - Construct a model with [`JointPrevalenceModel::new`] (or
//!   `with_defaults`), fit it against a validated `SurveillanceData`,
//!   and read the `EstimateTable` from `estimates`.

pub mod joint;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::joint::JointPrevalenceModel;

// ---- Optional convenience prelude for downstream crates -------------------

pub mod prelude {
    pub use super::joint::JointPrevalenceModel;
}
