//! Public API surface for penalized-objective minimization.
//!
//! - [`Objective`]: trait users implement for their model.
//! - [`MAPOptions`] and [`Tolerances`]: configuration for the optimizer.
//! - [`LineSearcher`]: choice of line search used by L-BFGS.
//! - [`OptimOutcome`]: normalized result returned by the high-level
//!   `minimize` API.
//!
//! Convention: the objective `c(θ)` is already a cost — a penalized
//! negative log-likelihood — and is minimized directly. If an analytic
//! gradient is provided, it is the gradient of that cost (`∇c(θ)`); no
//! sign flip happens anywhere in this layer.
use crate::optimization::{
    errors::{OptError, OptResult},
    map_optimizer::{
        Cost, FnEvalMap, Grad, Theta,
        validation::{validate_theta_hat, validate_value, verify_tol_cost, verify_tol_grad},
    },
};
use argmin::core::{TerminationReason, TerminationStatus};
use argmin_math::ArgminL2Norm;
use std::str::FromStr;

/// User-implemented objective interface.
///
/// The objective `c(θ)` is a penalized negative log-likelihood and is
/// minimized as-is. If you provide an analytic gradient, return the
/// gradient of the cost `∇c(θ)`.
///
/// - `type Data`: per-model data carried into `value`/`grad`/`check`.
///
/// Required:
/// - `value(&Theta, &Data) -> OptResult<Cost>`: evaluate `c(θ)`.
///   - Errors: return a descriptive `OptError` for invalid inputs or model failures.
/// - `check(&Theta, &Data) -> OptResult<()>`: validation hook to reject
///   obviously invalid `θ`/`data` pairs. Called once before optimization.
///
/// Optional:
/// - `grad(&Theta, &Data) -> OptResult<Grad>`: analytic gradient `∇c(θ)`.
///   If not implemented, robust finite differences are used automatically.
pub trait Objective {
    type Data: 'static;

    // Required methods
    fn value(&self, theta: &Theta, data: &Self::Data) -> OptResult<Cost>;
    fn check(&self, theta: &Theta, data: &Self::Data) -> OptResult<()>;

    // Optional methods
    fn grad(&self, _theta: &Theta, _data: &Self::Data) -> OptResult<Grad> {
        Err(OptError::GradientNotImplemented)
    }
}

/// Choice of line search used inside the L-BFGS solver.
///
/// Variants:
/// - `MoreThuente`: More–Thuente line search.
/// - `HagerZhang`: Hager–Zhang line search.
///
/// Parsing:
/// This enum implements `FromStr` and accepts case-insensitive names
/// (`"MoreThuente"`, `"HagerZhang"`). Unknown names return
/// `OptError::InvalidLineSearch`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineSearcher {
    MoreThuente,
    HagerZhang,
}

impl FromStr for LineSearcher {
    type Err = OptError;

    /// Parse a line-search choice from a string (case-insensitive).
    ///
    /// Accepts:
    /// - `"MoreThuente"`
    /// - `"HagerZhang"`
    /// - Any case variant (e.g., `"morethuente"`, `"HAGERZHANG"`).
    ///
    /// Any other value returns `OptError::InvalidLineSearch` with a helpful message.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "morethuente" => Ok(LineSearcher::MoreThuente),
            "hagerzhang" => Ok(LineSearcher::HagerZhang),
            _ => Err(OptError::InvalidLineSearch {
                name: s.to_string(),
                reason: "Valid options are case insensitive 'MoreThuente' or 'HagerZhang'.",
            }),
        }
    }
}

/// Optimizer-level configuration.
///
/// Fields:
/// - `tols: Tolerances` — numerical tolerances and iteration limits.
/// - `line_searcher: LineSearcher` — line-search algorithm used by L-BFGS.
/// - `verbose: bool` — if `true`, attaches an observer (behind the `obs_slog`
///   feature) and prints progress.
/// - `lbfgs_mem: Option<usize>` — L-BFGS history size override.
///
/// Constructor:
/// - `new(tols, line_searcher, verbose, lbfgs_mem) -> OptResult<Self>` —
///   builds options; validation of numeric values is handled in
///   `Tolerances::new`.
///
/// Default:
/// - `tols`: `tol_grad = 1e-6`, `tol_cost = None`, `max_iter = 300`
/// - `line_searcher`: `MoreThuente`
/// - `verbose`: `false`
/// - `lbfgs_mem`: `None` (uses default of 7)
#[derive(Debug, Clone, PartialEq)]
pub struct MAPOptions {
    pub tols: Tolerances,
    pub line_searcher: LineSearcher,
    pub verbose: bool,
    pub lbfgs_mem: Option<usize>,
}

impl MAPOptions {
    /// Create a new set of optimizer options.
    ///
    /// This constructor does not mutate values; validation of numeric fields is
    /// performed inside [`Tolerances::new`].
    pub fn new(
        tols: Tolerances, line_searcher: LineSearcher, verbose: bool, lbfgs_mem: Option<usize>,
    ) -> OptResult<Self> {
        if let Some(m) = lbfgs_mem {
            if m == 0 {
                return Err(OptError::InvalidLBFGSMem {
                    mem: m,
                    reason: "L-BFGS memory must be greater than zero.",
                });
            }
        }
        Ok(Self { tols, line_searcher, verbose, lbfgs_mem })
    }
}

impl Default for MAPOptions {
    fn default() -> Self {
        Self {
            tols: Tolerances::new(Some(1e-6), None, Some(300)).unwrap(),
            line_searcher: LineSearcher::MoreThuente,
            verbose: false,
            lbfgs_mem: None,
        }
    }
}

/// Numerical tolerances and iteration limits used by the optimizer.
///
/// - `tol_grad`: terminate when the gradient norm falls below this threshold.
/// - `tol_cost`: terminate when the change in cost falls below this threshold.
/// - `max_iter`: hard cap on the number of iterations.
///
/// Any field can be `None` but **at least one** of the three must be provided
/// (see [`Tolerances::new`]). These are pass-through configuration for the
/// backend solver; the model layer never interprets them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerances {
    pub tol_grad: Option<f64>,
    pub tol_cost: Option<f64>,
    pub max_iter: Option<usize>,
}

impl Tolerances {
    /// Construct validated tolerances.
    ///
    /// # Rules
    /// - At least one of `tol_grad`, `tol_cost`, or `max_iter` must be `Some`.
    /// - If provided, tolerances must be **finite and strictly positive**.
    /// - If provided, `max_iter` must be `> 0`.
    ///
    /// # Errors
    /// - [`OptError::NoTolerancesProvided`] if all three are `None`.
    /// - [`OptError::InvalidTolGrad`] / [`OptError::InvalidTolCost`] for non-finite or non-positive tolerances.
    /// - `OptError::InvalidMaxIter` if `max_iter == 0`.
    pub fn new(
        tol_grad: Option<f64>, tol_cost: Option<f64>, max_iter: Option<usize>,
    ) -> OptResult<Self> {
        if tol_grad.is_none() && tol_cost.is_none() && max_iter.is_none() {
            return Err(OptError::NoTolerancesProvided);
        }
        verify_tol_cost(tol_cost)?;
        verify_tol_grad(tol_grad)?;
        if let Some(max_iter) = max_iter {
            if max_iter == 0 {
                return Err(OptError::InvalidMaxIter {
                    max_iter,
                    reason: "Maximum iterations must be greater than zero.",
                });
            }
        }
        Ok(Self { tol_grad, tol_cost, max_iter })
    }
}

/// Canonical result returned by `minimize`.
///
/// - `theta_hat`: best parameter vector found.
/// - `value`: best **objective** value `c(θ̂)` (the minimized penalized
///   negative log-likelihood).
/// - `converged`: `true` if the solver terminated for a reason other than
///   exhausting its iteration budget.
/// - `status`: human-readable termination status string.
/// - `iterations`: number of optimizer iterations performed.
/// - `fn_evals`: function-evaluation counters reported by `argmin`.
///   Keys follow argmin’s counters, e.g., cost_count, gradient_count, etc.
/// - `grad_norm`: norm of the last available gradient, if present.
///
/// Non-convergence is deliberately not an error: downstream reporting
/// carries `converged`/`status` alongside the estimates so callers can
/// decide whether to trust them.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimOutcome {
    pub theta_hat: Theta,
    pub value: f64,
    pub converged: bool,
    pub status: String,
    pub iterations: usize,
    pub fn_evals: FnEvalMap,
    pub grad_norm: Option<f64>,
}

impl OptimOutcome {
    /// Build a validated [`OptimOutcome`] from raw solver state.
    ///
    /// Performs:
    /// - `theta_hat` check via `validate_theta_hat` (present and all finite).
    /// - `value` check via `validate_value` (finite).
    /// - Maps `TerminationStatus` into `(converged, status)`; running out
    ///   of iterations or never terminating both count as not converged,
    ///   with the reason preserved in `status`.
    /// - Computes `grad_norm` if a gradient was provided.
    ///
    /// # Errors
    /// - Propagates any validation errors for `theta_hat` or `value`.
    pub fn new(
        theta_hat_opt: Option<Theta>, value: f64, termination: TerminationStatus, iterations: u64,
        fn_evals: FnEvalMap, grad: Option<Grad>,
    ) -> OptResult<Self> {
        let theta_hat = validate_theta_hat(theta_hat_opt)?;
        validate_value(value)?;
        let status: String;
        let converged = match termination {
            TerminationStatus::NotTerminated => {
                status = "Not terminated".to_string();
                false
            }
            TerminationStatus::Terminated(reason) => {
                status = format!("{reason:?}");
                !matches!(reason, TerminationReason::MaxItersReached)
            }
        };
        let iterations = iterations as usize;
        let grad_norm = grad.map(|g| g.l2_norm());
        Ok(Self { theta_hat, value, converged, status, iterations, fn_evals, grad_norm })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Validation behavior of `Tolerances::new` and `MAPOptions::new`.
    // - `LineSearcher` parsing including case-insensitivity and rejection.
    // - `OptimOutcome::new` mapping of termination states and validation.
    //
    // They intentionally DO NOT cover:
    // - Full solver runs (covered by api/run tests and integration tests).
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Verify that `Tolerances::new` rejects the all-None configuration and
    // non-positive tolerance values.
    //
    // Given
    // -----
    // - All-None inputs, a negative tol_grad, and a zero max_iter.
    //
    // Expect
    // ------
    // - `NoTolerancesProvided`, `InvalidTolGrad`, and `InvalidMaxIter`
    //   respectively.
    fn tolerances_new_rejects_invalid_configurations() {
        // Act / Assert
        assert!(matches!(
            Tolerances::new(None, None, None),
            Err(OptError::NoTolerancesProvided)
        ));
        assert!(matches!(
            Tolerances::new(Some(-1.0), None, Some(10)),
            Err(OptError::InvalidTolGrad { .. })
        ));
        assert!(matches!(
            Tolerances::new(Some(1e-6), None, Some(0)),
            Err(OptError::InvalidMaxIter { .. })
        ));
    }

    #[test]
    // Purpose
    // -------
    // Check that `MAPOptions::new` rejects a zero L-BFGS memory and accepts
    // a reasonable configuration unchanged.
    //
    // Given
    // -----
    // - Valid tolerances with lbfgs_mem = Some(0) and Some(5).
    //
    // Expect
    // ------
    // - `InvalidLBFGSMem` for zero; fields preserved for five.
    fn map_options_new_validates_lbfgs_memory() {
        // Arrange
        let tols = Tolerances::new(Some(1e-6), None, Some(100)).unwrap();

        // Act / Assert
        assert!(matches!(
            MAPOptions::new(tols, LineSearcher::MoreThuente, false, Some(0)),
            Err(OptError::InvalidLBFGSMem { .. })
        ));
        let opts = MAPOptions::new(tols, LineSearcher::HagerZhang, true, Some(5)).unwrap();
        assert_eq!(opts.lbfgs_mem, Some(5));
        assert_eq!(opts.line_searcher, LineSearcher::HagerZhang);
        assert!(opts.verbose);
    }

    #[test]
    // Purpose
    // -------
    // Verify `LineSearcher::from_str` accepts case variants and rejects
    // unknown names.
    //
    // Given
    // -----
    // - Mixed-case valid names and one unknown name.
    //
    // Expect
    // ------
    // - Correct variants for valid names; `InvalidLineSearch` otherwise.
    fn line_searcher_parses_case_insensitively() {
        assert_eq!("morethuente".parse::<LineSearcher>().unwrap(), LineSearcher::MoreThuente);
        assert_eq!("HAGERZHANG".parse::<LineSearcher>().unwrap(), LineSearcher::HagerZhang);
        assert!(matches!(
            "newton".parse::<LineSearcher>(),
            Err(OptError::InvalidLineSearch { .. })
        ));
    }
}
