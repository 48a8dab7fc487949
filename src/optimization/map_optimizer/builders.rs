//! map_optimizer::builders — L-BFGS solver construction helpers.
//!
//! Purpose
//! -------
//! Provide small, focused builders for L-BFGS solvers used by the
//! MAP optimizer. These helpers hide Argmin’s generic wiring and apply
//! crate-level options (e.g., tolerances, memory size) so that
//! higher-level code can request a configured solver without touching
//! Argmin-specific types.
//!
//! Key behaviors
//! -------------
//! - Construct L-BFGS solvers with either Hager–Zhang or More–Thuente
//!   line search based on crate-level aliases.
//! - Apply optional gradient and cost-change tolerances from
//!   [`MAPOptions`] via a shared configuration helper.
//! - Leave the initial parameter vector and maximum iterations to the
//!   runner/executor layer, keeping these builders side-effect free.
//!
//! Invariants & assumptions
//! ------------------------
//! - All solvers operate on the canonical optimizer numeric types
//!   [`Theta`], [`Grad`], and [`Cost`] as defined in
//!   [`map_optimizer::types`].
//! - The L-BFGS memory (`m`) is either provided via `opts.lbfgs_mem` or
//!   defaults to [`DEFAULT_LBFGS_MEM`].
//! - Any invalid tolerance passed into Argmin’s
//!   `with_tolerance_grad` / `with_tolerance_cost` is surfaced as an
//!   [`OptError`] via the crate’s `From<Error>` implementations; callers
//!   are expected to handle these with `OptResult`.
//!
//! Conventions
//! -----------
//! - [`HagerZhangLS`] and [`MoreThuenteLS`] are the crate’s canonical
//!   line-search aliases; [`LbfgsHagerZhang`] and [`LbfgsMoreThuente`]
//!   pair these with the standard `(Theta, Grad, Cost)` triple.
//! - The builders do **not** set an initial parameter vector (`theta0`)
//!   or `max_iters`; these are treated as runtime concerns and are
//!   applied by the runner (e.g., `run_lbfgs`).
//! - Errors are always reported via [`OptResult`]; the underlying
//!   `argmin::core::Error` values never leak directly across module
//!   boundaries.
//!
//! Downstream usage
//! ----------------
//! - The high-level entry point calls [`build_optimizer_hager_zhang`] or
//!   [`build_optimizer_more_thuente`] based on a configured
//!   `LineSearcher` enum in [`MAPOptions`].
//! - The returned solver is passed to a runner (e.g., `run_lbfgs`) along
//!   with an adapted problem and initial parameters.
//! - [`configure_lbfgs`] is the shared wiring function that applies
//!   tolerances; it is generic over the line-search type and can be
//!   reused by future L-BFGS variants if needed.
//!
//! Testing notes
//! -------------
//! - Unit tests for this module verify correct propagation of
//!   `lbfgs_mem` and tolerance settings into the solver configuration.
//! - Integration tests in the optimizer layer exercise these builders
//!   indirectly by running full L-BFGS solves with different line-search
//!   and tolerance configurations.
//!
//! [`OptError`]: crate::optimization::errors::OptError
//! [`map_optimizer::types`]: crate::optimization::map_optimizer::types
use argmin::solver::quasinewton::LBFGS;

use crate::optimization::{
    errors::OptResult,
    map_optimizer::{
        traits::MAPOptions,
        types::{
            Cost, DEFAULT_LBFGS_MEM, Grad, HagerZhangLS, LbfgsHagerZhang, LbfgsMoreThuente,
            MoreThuenteLS, Theta,
        },
    },
};

/// build_optimizer_hager_zhang — construct L-BFGS with Hager–Zhang line search.
///
/// Builds an [`LbfgsHagerZhang`] solver configured with the crate’s
/// standard numeric types and optional tolerances from [`MAPOptions`],
/// leaving initial parameters and iteration limits to the caller.
///
/// # Errors
/// - `OptError` (via `From<argmin::core::Error>`) when
///   `with_tolerance_grad` or `with_tolerance_cost` rejects a tolerance
///   setting.
pub fn build_optimizer_hager_zhang(opts: &MAPOptions) -> OptResult<LbfgsHagerZhang> {
    let hager_zhang = HagerZhangLS::new();
    let mem = opts.lbfgs_mem.unwrap_or(DEFAULT_LBFGS_MEM);
    let lbfgs = LbfgsHagerZhang::new(hager_zhang, mem);
    configure_lbfgs(lbfgs, opts)
}

/// build_optimizer_more_thuente — construct L-BFGS with More–Thuente line search.
///
/// Builds an [`LbfgsMoreThuente`] solver configured with the crate’s
/// standard numeric types and optional tolerances from [`MAPOptions`],
/// using the More–Thuente line-search strategy.
///
/// # Errors
/// - `OptError` (via `From<argmin::core::Error>`) when
///   `with_tolerance_grad` or `with_tolerance_cost` rejects a tolerance
///   setting.
pub fn build_optimizer_more_thuente(opts: &MAPOptions) -> OptResult<LbfgsMoreThuente> {
    let more_thuente = MoreThuenteLS::new();
    let mem = opts.lbfgs_mem.unwrap_or(DEFAULT_LBFGS_MEM);
    let lbfgs = LbfgsMoreThuente::new(more_thuente, mem);
    configure_lbfgs(lbfgs, opts)
}

/// configure_lbfgs — apply optional tolerances to an L-BFGS solver.
///
/// Generic helper that wires crate-level tolerance options from
/// [`MAPOptions`] into an existing L-BFGS solver, regardless of the
/// line-search type. This centralizes tolerance handling so builder
/// functions remain thin.
///
/// # Errors
/// - `OptError` (via `From<argmin::core::Error>`) if Argmin rejects a
///   tolerance value.
fn configure_lbfgs<L>(
    mut solver: LBFGS<L, Theta, Grad, Cost>, opts: &MAPOptions,
) -> OptResult<LBFGS<L, Theta, Grad, Cost>> {
    if let Some(tol_grad) = opts.tols.tol_grad {
        solver = solver.with_tolerance_grad(tol_grad)?;
    }
    if let Some(tol_cost) = opts.tols.tol_cost {
        solver = solver.with_tolerance_cost(tol_cost)?;
    }
    Ok(solver)
}
