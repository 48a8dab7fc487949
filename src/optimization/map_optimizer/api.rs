//! High-level entry point for minimizing a user-provided `Objective`.
//!
//! This selects an L-BFGS solver with either Hager–Zhang or More–Thuente line
//! search, wraps the model in an `ArgMinAdapter` (which minimizes `c(θ)`
//! directly), and delegates the run to `run_lbfgs`.
use crate::optimization::{
    errors::OptResult,
    map_optimizer::{
        OptimOutcome, Theta,
        adapter::ArgMinAdapter,
        builders::{build_optimizer_hager_zhang, build_optimizer_more_thuente},
        run::run_lbfgs,
        traits::{LineSearcher, MAPOptions, Objective},
    },
};

/// Minimize a penalized objective `c(θ)` using L-BFGS with the chosen line search.
///
/// # Behavior
/// - Validates the initial guess via `f.check(theta0, data)`.
/// - Wraps `(f, data)` in an `ArgMinAdapter` that exposes the *minimization*
///   problem `c(θ)` to `argmin` unchanged.
/// - Builds an L-BFGS solver with either **Hager–Zhang** or **More–Thuente**
///   line search based on `opts.line_searcher`.
/// - Calls `run_lbfgs`, which configures the executor (initial params,
///   max iters, optional observers) and returns an `OptimOutcome`.
///
/// # Parameters
/// - `f`: Your model implementing [`Objective`].
/// - `theta0`: Initial parameter vector.
/// - `data`: Model data passed through to `value`/`grad`.
/// - `opts`: Optimizer options (tolerances, line search choice, verbosity, etc.).
///
/// # Errors
/// - Propagates any error from `f.check`.
/// - Propagates builder errors from `build_optimizer_*`.
/// - Propagates runtime errors from `run_lbfgs` (e.g., line search failures).
///
/// # Returns
/// An [`OptimOutcome`] containing `theta_hat`, best value `c(θ̂)`,
/// termination status, iteration counts, function evaluation counts, and
/// optionally the gradient norm.
pub fn minimize<F: Objective>(
    f: &F, theta0: Theta, data: &F::Data, opts: &MAPOptions,
) -> OptResult<OptimOutcome> {
    f.check(&theta0, data)?;
    let problem = ArgMinAdapter::new(f, data);
    match opts.line_searcher {
        LineSearcher::MoreThuente => {
            let solver = build_optimizer_more_thuente(opts)?;
            run_lbfgs(theta0, opts, problem, solver)
        }
        LineSearcher::HagerZhang => {
            let solver = build_optimizer_hager_zhang(opts)?;
            run_lbfgs(theta0, opts, problem, solver)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::errors::OptResult;
    use crate::optimization::map_optimizer::types::Cost;
    use ndarray::{Array1, array};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - End-to-end minimization of a strictly convex toy objective with both
    //   line-search variants.
    // - Rejection via the `check` hook before the first iteration.
    //
    // They intentionally DO NOT cover:
    // - The full prevalence model objective (covered by model-layer and
    //   integration tests).
    // -------------------------------------------------------------------------

    struct ShiftedQuadratic;

    impl Objective for ShiftedQuadratic {
        type Data = Array1<f64>;

        // c(θ) = Σ (θ_i − d_i)², minimized at θ = d.
        fn value(&self, theta: &Theta, data: &Self::Data) -> OptResult<Cost> {
            Ok((theta - data).mapv(|x| x * x).sum())
        }

        fn check(&self, theta: &Theta, data: &Self::Data) -> OptResult<()> {
            if theta.len() != data.len() {
                return Err(crate::optimization::errors::OptError::ThetaLengthMismatch {
                    expected: data.len(),
                    actual: theta.len(),
                });
            }
            Ok(())
        }
    }

    #[test]
    // Purpose
    // -------
    // Verify that `minimize` drives a convex quadratic to its known optimum
    // with the default More–Thuente line search.
    //
    // Given
    // -----
    // - c(θ) = ||θ − (1, −2)||² starting from the origin.
    //
    // Expect
    // ------
    // - `theta_hat ≈ (1, −2)` within 1e-4 and a near-zero objective value.
    fn minimize_convex_quadratic_reaches_optimum() {
        // Arrange
        let model = ShiftedQuadratic;
        let target: Array1<f64> = array![1.0, -2.0];
        let theta0: Theta = Array1::zeros(2);
        let opts = MAPOptions::default();

        // Act
        let out = minimize(&model, theta0, &target, &opts)
            .expect("quadratic minimization should succeed");

        // Assert
        assert!((out.theta_hat[0] - 1.0).abs() < 1e-4);
        assert!((out.theta_hat[1] + 2.0).abs() < 1e-4);
        assert!(out.value < 1e-6);
        assert!(out.converged);
    }

    #[test]
    // Purpose
    // -------
    // Ensure the `check` hook rejects a mismatched initial parameter vector
    // before any solver iteration runs.
    //
    // Given
    // -----
    // - A 3-vector θ₀ against 2-dimensional data.
    //
    // Expect
    // ------
    // - `minimize` returns `ThetaLengthMismatch`.
    fn minimize_rejects_mismatched_theta_via_check() {
        // Arrange
        let model = ShiftedQuadratic;
        let target: Array1<f64> = array![1.0, -2.0];
        let theta0: Theta = Array1::zeros(3);
        let opts = MAPOptions::default();

        // Act
        let result = minimize(&model, theta0, &target, &opts);

        // Assert
        assert!(matches!(
            result,
            Err(crate::optimization::errors::OptError::ThetaLengthMismatch { .. })
        ));
    }
}
