//! inference — post-fit uncertainty quantification at the MAP point.
//!
//! Purpose
//! -------
//! Provide the tools for quantifying uncertainty after the optimizer
//! converges: a parameter covariance matrix built from the observed
//! information at `θ̂`, and generic delta-method propagation of that
//! covariance through any differentiable derived quantity.
//!
//! Key behaviors
//! -------------
//! - Build `Cov(θ̂) = H(θ̂)⁺` via [`covariance_from_hessian`]: a
//!   finite-difference Hessian of the objective gradient, pseudoinverted
//!   through a symmetric eigendecomposition with eigenvalue truncation.
//! - Propagate covariance through scalar maps of `θ` with
//!   [`delta_method_variance`] / [`delta_method_se`]
//!   (`Var(q) ≈ J_q · Cov · J_qᵀ`), one routine for all reported
//!   quantities.
//!
//! Invariants & assumptions
//! ------------------------
//! - The objective is the summed negative log posterior kernel, so the
//!   pseudoinverse of its Hessian is the Laplace covariance directly.
//! - Eigenvalues at or below `EIGEN_EPS` are truncated; weakly
//!   identified directions contribute no spurious variance.
//! - All numerical routines return `OptError` on failure rather than
//!   panicking.
//!
//! Conventions
//! -----------
//! - Parameters `θ` live in unconstrained optimizer space; derived
//!   quantities map out of that space inside their own closures.
//! - All functions are pure with respect to I/O: no logging, no global
//!   state, no `unsafe`.
//!
//! Downstream usage
//! ----------------
//! - After fitting, the model layer wraps its objective in a
//!   NaN-capturing gradient closure, calls [`covariance_from_hessian`]
//!   at `θ̂`, and hands the covariance to the reporting layer, which
//!   calls [`delta_method_se`] per derived-quantity component.
//!
//! Testing notes
//! -------------
//! - Unit tests cover analytic-inverse agreement for quadratics,
//!   truncation of flat directions, delta-method exactness on linear
//!   maps, and rejection paths for NaN quantities and shape mismatches.

pub mod delta;
pub mod hessian;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::delta::{delta_method_se, delta_method_variance};
pub use self::hessian::covariance_from_hessian;

// ---- Optional convenience prelude for downstream crates -------------------

pub mod prelude {
    pub use super::delta::{delta_method_se, delta_method_variance};
    pub use super::hessian::covariance_from_hessian;
}
