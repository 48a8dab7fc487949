//! optimization — MAP stack, numerical helpers, and unified error surface.
//!
//! Purpose
//! -------
//! Provide a cohesive optimization layer for model fitting, combining an
//! Argmin-backed penalized-objective optimizer, numerically stable link
//! transforms, and a single error/result surface. Callers implement an
//! objective (a penalized negative log-likelihood), choose tolerances,
//! and obtain the MAP point and diagnostics without touching backend
//! solver details.
//!
//! Key behaviors
//! -------------
//! - Expose a high-level API for **minimizing penalized negative
//!   log-likelihoods** `c(θ)` (`map_optimizer`), including configuration
//!   of solvers and stopping criteria.
//! - Supply shared numerical primitives (`numerical_stability`) for
//!   logit-link arithmetic that stays finite at extreme linear
//!   predictors.
//! - Normalize configuration issues, numerical failures, and backend
//!   solver errors into a single enum (`errors::OptError`) with a common
//!   result alias (`OptResult<T>`).
//!
//! Invariants & assumptions
//! ------------------------
//! - Optimizers operate in an unconstrained parameter space `θ` and
//!   assume that inputs are finite once validation has passed; invalid
//!   states are reported as `OptError`, not panics.
//! - Objective implementations are expected to treat domain violations
//!   (e.g., malformed parameter vectors) as recoverable errors surfaced
//!   through the optimization layer.
//! - Dimension checks for parameter vectors are enforced via shared
//!   validation and error conversions, so downstream code can assume
//!   that accepted parameters satisfy basic shape constraints.
//!
//! Conventions
//! -----------
//! - All solvers minimize the objective **directly**: `c(θ)` is already
//!   a cost (a negative log posterior kernel), so no sign flip occurs
//!   anywhere between the model layer and the backend.
//! - Parameters, gradients, and Hessians are represented using
//!   `ndarray`-based aliases (`Theta`, `Grad`, `Hessian` types).
//! - Public optimization entrypoints that can fail return
//!   `OptResult<T>`; callers never see raw Argmin errors or
//!   model-specific error enums.
//! - This module and its submodules avoid I/O and logging; higher layers
//!   (Python bindings, notebooks) are responsible for reporting progress
//!   and diagnostics.
//!
//! Downstream usage
//! ----------------
//! - Model types implement `Objective` and call `minimize` with a
//!   parameter guess, data payload, and `MAPOptions` to obtain an
//!   `OptimOutcome` (via `map_optimizer`).
//! - Transform and likelihood code use `numerical_stability` for stable
//!   link arithmetic; inference code shares its `EIGEN_EPS` guard.
//! - Front-ends typically import the curated surface via
//!   `optimization::prelude::*`, which forwards the submodule preludes
//!   and the core error types.
//!
//! Testing notes
//! -------------
//! - Unit tests in the submodules focus on local concerns:
//!   - `map_optimizer`: solver wiring, tolerance handling, and basic
//!     MAP behavior on toy objectives.
//!   - `numerical_stability`: agreement with naïve formulas on safe
//!     grids and well-behaved tails.
//! - Higher-level integration tests exercise end-to-end MAP workflows,
//!   verifying that configuration mistakes, numerical problems, and
//!   backend failures all surface as sensible `OptError` values and
//!   that successful runs produce stable `OptimOutcome`s.

pub mod errors;
pub mod map_optimizer;
pub mod numerical_stability;

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use seroprev::optimization::prelude::*;
//
// to import the main optimization surface in a single line.

pub mod prelude {
    pub use super::errors::{OptError, OptResult};
    pub use super::map_optimizer::prelude::*;
    pub use super::numerical_stability::prelude::*;
}
