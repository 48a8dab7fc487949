//! numerical_stability — numerically robust link-scale transforms.
//!
//! Purpose
//! -------
//! Collect numerically stable scalar transforms for logit-link
//! arithmetic plus the shared eigenvalue tolerance used when
//! pseudoinverting observed information matrices. This module
//! centralizes small numerical guards so the likelihood, transform, and
//! inference layers can assume well-conditioned `f64` arithmetic.
//!
//! Key behaviors
//! -------------
//! - Provide a guarded softplus ([`log1p_exp`]) used by the logit-scale
//!   binomial log-density to avoid overflow at extreme linear
//!   predictors.
//! - Provide a stable inverse-logit ([`safe_invlogit`]) and forward
//!   [`logit`] for mapping between the unconstrained link scale and
//!   probability scale.
//! - Centralize the eigenvalue truncation threshold ([`EIGEN_EPS`]) so
//!   covariance construction shares one consistent guard.
//!
//! Invariants & assumptions
//! ------------------------
//! - All transforms assume finite `f64` inputs; domain and shape
//!   validation is enforced in the model and optimizer layers, not here.
//! - `safe_invlogit` may return exactly 0.0 or 1.0 when the exponential
//!   underflows; callers requiring strict `(0, 1)` membership treat that
//!   as a domain condition instead of clamping.
//!
//! Conventions
//! -----------
//! - The cutoff `x > 20.0` mirrors the guard used by mainstream ML
//!   libraries for softplus-style functions in `f64`.
//! - This module defines no runtime state and performs no I/O.
//!
//! Downstream usage
//! ----------------
//! - `model::core::likelihood` uses [`log1p_exp`] for the robust
//!   binomial normalizer.
//! - `model::core::transforms` uses [`safe_invlogit`] for the
//!   probability-scale prevalences.
//! - `inference::hessian` uses [`EIGEN_EPS`] when truncating
//!   eigenvalues of the observed information.
//!
//! Testing notes
//! -------------
//! - Unit tests in [`transformations`] check agreement with naïve
//!   formulas on safe grids, finite tail behavior, and logit round
//!   trips. Higher-level modules re-test these properties only through
//!   their own public behavior.

pub mod transformations;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::transformations::{EIGEN_EPS, log1p_exp, logit, safe_invlogit};

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use seroprev::optimization::numerical_stability::prelude::*;
//
// to import the main numerical-stability surface in a single line.

pub mod prelude {
    pub use super::transformations::{EIGEN_EPS, log1p_exp, logit, safe_invlogit};
}
