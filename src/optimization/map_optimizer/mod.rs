//! map_optimizer — L-BFGS minimization of penalized objectives.
//!
//! Purpose
//! -------
//! Provide the crate’s generic MAP-fitting machinery: a user-facing
//! [`Objective`] trait, configuration types, an Argmin adapter, solver
//! builders, a runner, and finite-difference/validation helpers. Model
//! code implements [`Objective`]; everything Argmin-specific stays
//! behind this module.
//!
//! Key behaviors
//! -------------
//! - Minimize a penalized negative log-likelihood `c(θ)` **directly** —
//!   the objective is already a cost, so no sign flips occur between
//!   the model layer and the backend.
//! - Fall back to robust finite-difference gradients (central with
//!   forward retry and closure error capture) when no analytic gradient
//!   is implemented.
//! - Normalize solver output into [`OptimOutcome`], carrying
//!   convergence status, iteration counts, and diagnostics; a run that
//!   stops without meeting tolerances is reported, not treated as an
//!   error.
//!
//! Invariants & assumptions
//! ------------------------
//! - Parameter vectors are unconstrained `ndarray` vectors over `f64`;
//!   any constrained-scale mapping (e.g. `exp` for standard deviations)
//!   belongs to the model layer.
//! - `Objective::check` is called exactly once before the first
//!   iteration to reject malformed `θ`/data pairs.
//! - All fallible paths surface [`OptError`] via `OptResult`; raw
//!   Argmin errors never cross this module’s boundary.
//!
//! Conventions
//! -----------
//! - Submodule layout mirrors responsibility: [`traits`] (public
//!   surface), [`types`] (numeric aliases), [`adapter`] (Argmin
//!   bridge), [`builders`] (solver construction), [`run`] (execution),
//!   [`api`] (entry point), [`finite_diff`] + [`validation`]
//!   (derivative and state checks).
//!
//! Downstream usage
//! ----------------
//! - Model types implement [`Objective`] for their data payload and
//!   call [`minimize`] with:
//!   - a model instance `&M`,
//!   - an initial parameter vector [`Theta`],
//!   - a data payload `&M::Data`, and
//!   - a [`MAPOptions`] configuration (tolerances, line search, L-BFGS
//!     memory).
//! - Higher-level front-ends (Python bindings) are expected to interact
//!   only with the re-exported surface: [`minimize`], [`Objective`],
//!   [`MAPOptions`], [`Tolerances`], [`OptimOutcome`], plus numeric
//!   aliases from [`types`].
//! - Post-fit inference reuses [`finite_diff::compute_hessian`] for the
//!   observed information at the MAP point.
//!
//! Testing notes
//! -------------
//! - Unit tests in submodules cover:
//!   - cost/gradient pass-through and FD fallback in [`adapter`],
//!   - solver construction and tolerance wiring in [`builders`],
//!   - finite-difference + validation behavior in [`finite_diff`] and
//!     [`validation`],
//!   - configuration and outcome invariants in [`traits`].
//! - [`api`] tests minimize toy convex objectives end-to-end; the full
//!   prevalence objective is exercised by integration tests.
//!
//! [`OptError`]: crate::optimization::errors::OptError

pub mod adapter;
pub mod api;
pub mod builders;
pub mod finite_diff;
pub mod run;
pub mod traits;
pub mod types;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::api::minimize;
pub use self::traits::{LineSearcher, MAPOptions, Objective, OptimOutcome, Tolerances};
pub use self::types::{Cost, DEFAULT_LBFGS_MEM, FnEvalMap, Grad, Theta};

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use seroprev::optimization::map_optimizer::prelude::*;
//
// to import the main optimizer surface in a single line.

pub mod prelude {
    pub use super::api::minimize;
    pub use super::traits::{LineSearcher, MAPOptions, Objective, OptimOutcome, Tolerances};
    pub use super::types::{Cost, Grad, Theta};
}
