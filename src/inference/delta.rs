//! inference::delta — generic delta-method uncertainty propagation.
//!
//! Purpose
//! -------
//! Propagate parameter covariance through an arbitrary differentiable
//! scalar map of `θ` to obtain a first-order variance and standard
//! error:
//!
//! `Var(q(θ̂)) ≈ J_q · Cov · J_qᵀ`, `SE(q(θ̂)) = sqrt(Var)`
//!
//! where `J_q` is the Jacobian row of `q` at `θ̂`, approximated by
//! central finite differences. One routine serves every reported
//! quantity — scalar parameters, precisions, probability-scale
//! prevalences, and the ART coverage identity alike — instead of a
//! per-quantity formula.
//!
//! Conventions
//! -----------
//! - `q` must return a finite value in a neighborhood of `θ̂`; closures
//!   that can fail internally should return `NaN` on failure, which is
//!   then rejected here as an invalid Jacobian.
//! - Tiny negative variances from floating-point cancellation are
//!   clamped to zero before the square root; genuinely non-finite
//!   variances are errors.
//!
//! Testing notes
//! -------------
//! - Unit tests check linear maps (where the delta method is exact),
//!   a nonlinear map against its analytic Jacobian, and the rejection
//!   path for a NaN-returning quantity.
use crate::optimization::{
    errors::{OptError, OptResult},
    map_optimizer::validation::validate_grad,
};
use finitediff::FiniteDiff;
use ndarray::{Array1, Array2};

/// delta_method_variance — first-order variance of `q(θ̂)`.
///
/// Parameters
/// ----------
/// - `q`: `&F`
///   Differentiable scalar map of the full parameter vector.
/// - `theta_hat`: `&Array1<f64>`
///   Point at which the Jacobian is evaluated (the MAP estimate).
/// - `cov`: `&Array2<f64>`
///   Symmetric `n×n` parameter covariance with `n = theta_hat.len()`.
///
/// Returns
/// -------
/// `OptResult<f64>` — the non-negative variance approximation.
///
/// Errors
/// ------
/// - [`OptError::InvalidGradient`] when the finite-difference Jacobian
///   contains non-finite entries (e.g., `q` returned `NaN` nearby).
/// - [`OptError::HessianDimMismatch`] when `cov` is not `n×n`.
/// - [`OptError::NonFiniteCost`] when the assembled quadratic form is
///   non-finite.
pub fn delta_method_variance<F: Fn(&Array1<f64>) -> f64>(
    q: &F, theta_hat: &Array1<f64>, cov: &Array2<f64>,
) -> OptResult<f64> {
    let n = theta_hat.len();
    if cov.nrows() != n || cov.ncols() != n {
        return Err(OptError::HessianDimMismatch {
            expected: n,
            found: (cov.nrows(), cov.ncols()),
        });
    }
    let jac = theta_hat.central_diff(q);
    validate_grad(&jac, n)?;
    let variance = jac.dot(&cov.dot(&jac));
    if !variance.is_finite() {
        return Err(OptError::NonFiniteCost { value: variance });
    }
    // Cancellation can leave a tiny negative residual on flat directions.
    Ok(variance.max(0.0))
}

/// delta_method_se — standard error of `q(θ̂)`.
///
/// Square root of [`delta_method_variance`]; shares its error behavior.
pub fn delta_method_se<F: Fn(&Array1<f64>) -> f64>(
    q: &F, theta_hat: &Array1<f64>, cov: &Array2<f64>,
) -> OptResult<f64> {
    Ok(delta_method_variance(q, theta_hat, cov)?.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Exactness for linear maps under a known covariance.
    // - Agreement with the analytic Jacobian for a nonlinear map.
    // - Rejection of quantities that evaluate to NaN near θ̂.
    // - Covariance dimension checking.
    //
    // They intentionally DO NOT cover:
    // - Construction of the covariance matrix itself (inference::hessian).
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Verify the delta method is exact for a linear map: q(θ) = aᵀθ has
    // Var = aᵀ Cov a.
    //
    // Given
    // -----
    // - a = (2, −1), Cov = [[0.25, 0], [0, 1]].
    //
    // Expect
    // ------
    // - Var = 4·0.25 + 1·1 = 2, SE = sqrt(2), to 1e-6.
    fn linear_map_variance_is_exact() {
        // Arrange
        let q = |theta: &Array1<f64>| 2.0 * theta[0] - theta[1];
        let theta_hat = array![0.3, -0.7];
        let cov = array![[0.25, 0.0], [0.0, 1.0]];

        // Act
        let var = delta_method_variance(&q, &theta_hat, &cov).expect("linear variance");
        let se = delta_method_se(&q, &theta_hat, &cov).expect("linear SE");

        // Assert
        assert!((var - 2.0).abs() < 1e-6);
        assert!((se - 2.0_f64.sqrt()).abs() < 1e-6);
    }

    #[test]
    // Purpose
    // -------
    // Verify a nonlinear map matches its analytic first-order variance:
    // q(θ) = exp(θ₀) with Cov = diag(v) gives Var ≈ exp(θ₀)²·v.
    //
    // Given
    // -----
    // - θ̂ = (0.5,), Cov = [[0.04]].
    //
    // Expect
    // ------
    // - Var ≈ exp(1)·0.04 within 1e-6 relative tolerance.
    fn nonlinear_map_matches_analytic_jacobian() {
        // Arrange
        let q = |theta: &Array1<f64>| theta[0].exp();
        let theta_hat = array![0.5];
        let cov = array![[0.04]];

        // Act
        let var = delta_method_variance(&q, &theta_hat, &cov).expect("nonlinear variance");

        // Assert
        let expected = (0.5_f64.exp()).powi(2) * 0.04;
        assert!((var - expected).abs() / expected < 1e-6);
    }

    #[test]
    // Purpose
    // -------
    // Verify that a quantity evaluating to NaN near θ̂ is rejected instead
    // of propagating into the standard error.
    //
    // Given
    // -----
    // - q always returns NaN; a valid 1×1 covariance.
    //
    // Expect
    // ------
    // - `InvalidGradient` from the Jacobian validation.
    fn nan_quantity_is_rejected() {
        // Arrange
        let q = |_theta: &Array1<f64>| f64::NAN;
        let theta_hat = array![0.0];
        let cov = array![[1.0]];

        // Act
        let result = delta_method_variance(&q, &theta_hat, &cov);

        // Assert
        assert!(matches!(result, Err(OptError::InvalidGradient { .. })));
    }

    #[test]
    // Purpose
    // -------
    // Verify covariance shape checking against the parameter dimension.
    //
    // Given
    // -----
    // - A 2-vector θ̂ with a 1×1 covariance.
    //
    // Expect
    // ------
    // - `HessianDimMismatch` naming the expected dimension.
    fn mismatched_covariance_is_rejected() {
        let q = |theta: &Array1<f64>| theta[0];
        let theta_hat = array![0.0, 1.0];
        let cov = array![[1.0]];
        assert!(matches!(
            delta_method_variance(&q, &theta_hat, &cov),
            Err(OptError::HessianDimMismatch { expected: 2, .. })
        ));
    }
}
