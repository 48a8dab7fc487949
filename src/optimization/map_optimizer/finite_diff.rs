//! map_optimizer::finite_diff — finite-difference gradient and Hessian helpers.
//!
//! Purpose
//! -------
//! Provide finite-difference gradient and Hessian approximations around a
//! parameter vector, together with validation and symmetry cleanup, so that
//! the rest of the optimizer can request derivatives without depending
//! directly on the `finitediff` API.
//!
//! Key behaviors
//! -------------
//! - Compute forward-difference gradients with error capture and
//!   post-hoc validation via [`run_fd_diff`].
//! - Construct central-difference Hessians, falling back to forward
//!   differences when validation fails, via [`compute_hessian`].
//! - Enforce symmetry of Hessian matrices in-place using
//!   [`symmetrize_hess`] to prepare them for curvature checks and
//!   factorizations.
//!
//! Invariants & assumptions
//! ------------------------
//! - Parameter vectors, gradients, and Hessians are all represented as
//!   `ndarray` containers over `f64` (`Theta`, `Grad`, `Hessian`).
//! - Any error raised by the user-supplied objective during finite
//!   differencing is routed into the shared `closure_err` cell and
//!   treated as a hard failure for the gradient computation.
//! - Gradients and Hessians returned from this module are guaranteed to
//!   satisfy [`validate_grad`] and [`validate_hessian`] on the chosen
//!   finite-difference path.
//!
//! Conventions
//! -----------
//! - Finite differences are taken with respect to the unconstrained
//!   parameter vector `Theta`; any reparameterization is handled by
//!   higher layers.
//! - Central-difference Hessians are preferred; forward-difference is
//!   used only as a fallback when the central approximation fails
//!   validation.
//! - Domain errors are surfaced as [`OptError`] via `OptResult<T>`;
//!   Argmin’s [`Error`] is confined to the thin boundary where
//!   finite-difference closures are invoked.
//!
//! Downstream usage
//! ----------------
//! - The optimizer adapter calls [`run_fd_diff`] when an [`Objective`]
//!   implementation does not provide an analytic gradient and the solver
//!   needs a finite-difference approximation.
//! - Post-fit inference calls [`compute_hessian`] at the MAP point to
//!   obtain a validated, symmetrized observed information matrix for
//!   covariance construction.
//! - This module is internal to the optimizer layer and is not intended
//!   to be invoked directly from Python bindings.
//!
//! Testing notes
//! -------------
//! - Unit tests cover both successful and failing paths for gradient and
//!   Hessian validation, including the central→forward Hessian fallback
//!   behavior.
//! - Integration tests for the full pipeline exercise these helpers
//!   implicitly when derivatives are requested via finite differences.
//!
//! [`Objective`]: crate::optimization::map_optimizer::traits::Objective
use crate::optimization::{
    errors::OptResult,
    map_optimizer::{
        Grad, Theta,
        types::Hessian,
        validation::{validate_grad, validate_hessian},
    },
};
use argmin::core::Error;
use finitediff::FiniteDiff;
use std::cell::RefCell;

/// run_fd_diff — forward-difference gradient with error capture and validation.
///
/// Purpose
/// -------
/// Compute a forward-difference approximation to the gradient of a scalar
/// objective at `theta`, while capturing any error raised inside the
/// evaluation closure and enforcing basic shape/finiteness invariants on
/// the resulting gradient.
///
/// Parameters
/// ----------
/// - `theta`: `&Theta`
///   Point in parameter space at which the gradient should be
///   approximated. The length of `theta` defines the expected gradient
///   dimension.
/// - `func`: `&G`
///   Objective function mapping `theta` to a scalar value. This is the
///   closure passed to `forward_diff`; it is assumed to route any
///   evaluation errors into `closure_err` and return `NaN` in that case.
/// - `closure_err`: `&RefCell<Option<Error>>`
///   Shared cell used to capture an [`argmin::core::Error`] raised inside
///   `func` while the finite-difference routine is running. This helper
///   clears the cell on entry and inspects it after the FD call.
///
/// Returns
/// -------
/// `OptResult<Grad>`
///   - `Ok(grad)` when finite differencing succeeds, no error was
///     captured in `closure_err`, and the resulting gradient passes
///     [`validate_grad`].
///   - `Err(e)` when either `func` signaled an error via `closure_err`
///     or the gradient fails validation.
///
/// Errors
/// ------
/// - `OptError` (via `impl From<Error> for OptError`)
///   Returned when `closure_err` contains an Argmin error captured from
///   inside `func`.
/// - `OptError::GradientDimMismatch`
///   Returned by [`validate_grad`] when the finite-difference gradient
///   length does not match `theta.len()`.
/// - `OptError::InvalidGradient`
///   Returned by [`validate_grad`] when any gradient element is NaN or
///   infinite.
///
/// Panics
/// ------
/// - Never panics.
///
/// Safety
/// ------
/// - No `unsafe` code is used.
///
/// Notes
/// -----
/// - This helper assumes that the caller has wrapped the original
///   objective in a closure that writes any runtime error into
///   `closure_err` and returns `NaN`. If no error is written, the FD
///   path is assumed to have evaluated successfully.
/// - Only the first gradient element failing validation is reported by
///   [`validate_grad`].
pub fn run_fd_diff<G: Fn(&Theta) -> f64>(
    theta: &Theta, func: &G, closure_err: &RefCell<Option<Error>>,
) -> OptResult<Grad> {
    closure_err.replace(None);
    let fd_grad = theta.forward_diff(func);
    let dim = theta.len();
    if let Some(err) = closure_err.take() {
        return Err(err.into());
    }
    validate_grad(&fd_grad, dim)?;
    Ok(fd_grad)
}

/// compute_hessian — finite-difference Hessian with validation and symmetry.
///
/// Purpose
/// -------
/// Approximate the Hessian of a vector-valued gradient function at
/// `theta` using finite differences, preferring a central-difference
/// scheme and falling back to a forward-difference scheme when
/// validation fails. The resulting matrix is symmetrized in-place
/// before being returned.
///
/// Parameters
/// ----------
/// - `f`: `&F`
///   Gradient function mapping `theta` to a gradient vector `Grad`. This
///   is the function passed to the finite-difference Hessian routines,
///   which differentiate each gradient component numerically.
/// - `theta`: `&Theta`
///   Point in parameter space at which the Hessian is to be
///   approximated. The length of `theta` defines the expected Hessian
///   dimension `dim × dim`.
///
/// Returns
/// -------
/// `OptResult<Hessian>`
///   - `Ok(h)` containing a `dim × dim` Hessian matrix with all finite
///     entries, symmetrized via [`symmetrize_hess`].
///   - `Err(e)` when both central- and forward-difference paths fail
///     validation.
///
/// Errors
/// ------
/// - `OptError::HessianDimMismatch`
///   Returned when the forward-difference Hessian dimensions do not
///   match `theta.len()`.
/// - `OptError::InvalidHessian`
///   Returned when the forward-difference Hessian contains any NaN or
///   infinite entries.
///
/// Panics
/// ------
/// - Never panics.
///
/// Safety
/// ------
/// - No `unsafe` code is used.
///
/// Notes
/// -----
/// - Central-difference Hessians are attempted first; any validation
///   failure (shape or finiteness) on the central approximation causes
///   an automatic fallback to a forward-difference Hessian.
/// - The central-difference validation error is intentionally discarded
///   to avoid coupling callers to the two-stage strategy; only the
///   forward-difference validation result is surfaced.
/// - Symmetrization is performed after validation to preserve the
///   original diagnostic information for `InvalidHessian` errors.
pub fn compute_hessian<F: Fn(&Theta) -> Grad>(f: &F, theta: &Theta) -> OptResult<Hessian> {
    let dim = theta.len();
    let mut cent_hess = theta.central_hessian(f);
    match validate_hessian(&cent_hess, dim) {
        Ok(_) => {
            symmetrize_hess(&mut cent_hess);
            Ok(cent_hess)
        }
        Err(_) => {
            let mut forward_hess = theta.forward_hessian(f);
            validate_hessian(&forward_hess, dim)?;
            symmetrize_hess(&mut forward_hess);
            Ok(forward_hess)
        }
    }
}

// ---- Helper methods ----

/// symmetrize_hess — enforce symmetry of a Hessian matrix in-place.
///
/// Replaces each off-diagonal pair `(i, j)` / `(j, i)` with their average
/// so that the resulting matrix is numerically symmetric while leaving
/// the diagonal entries unchanged. Called only after a Hessian has passed
/// [`validate_hessian`], so no finiteness or shape checks are repeated
/// here.
fn symmetrize_hess(hess: &mut Hessian) {
    for i in 0..hess.nrows() {
        for j in 0..i {
            let avg = 0.5 * (hess[[i, j]] + hess[[j, i]]);
            hess[[i, j]] = avg;
            hess[[j, i]] = avg;
        }
    }
}
