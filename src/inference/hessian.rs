//! inference::hessian — parameter covariance from observed information.
//!
//! Purpose
//! -------
//! Convert the finite-difference Hessian of the objective at the MAP
//! point into a numerically stable parameter covariance matrix. This
//! module handles conversion between `ndarray` and `nalgebra` types and
//! inverts the observed information through a symmetric
//! eigendecomposition with eigenvalue truncation instead of an explicit
//! matrix inverse.
//!
//! Key behaviors
//! -------------
//! - Call [`compute_hessian`] on the objective gradient to obtain the
//!   observed information matrix `H(θ̂)` (central differences with a
//!   forward fallback, symmetrized and validated upstream).
//! - Copy the resulting `ndarray` Hessian into a `nalgebra::DMatrix`
//!   (`fill_dmatrix`) for eigen-based linear algebra.
//! - Build the Moore–Penrose pseudoinverse `H⁺ = Q Λ⁺ Qᵀ`, truncating
//!   eigenvalues at [`EIGEN_EPS`], and return it as the parameter
//!   covariance.
//!
//! Invariants & assumptions
//! ------------------------
//! - [`compute_hessian`] returns a finite, square `n×n` matrix with
//!   `n = θ̂.len()`; symmetry is already enforced upstream, so this
//!   module does **not** re-symmetrize.
//! - The objective is a **summed** negative log posterior kernel, so
//!   `H⁺` is directly the Laplace-approximation covariance at the MAP
//!   point — no sample-size rescaling is applied.
//! - Eigenvalues with magnitude at most [`EIGEN_EPS`] are treated as
//!   numerically nonpositive and ignored when constructing pseudoinverse
//!   directions, inflating variances along weakly identified directions.
//!
//! Conventions
//! -----------
//! - No explicit matrix inverse is formed; all computations use
//!   symmetric eigendecomposition with eigenvalue truncation.
//! - Errors are reported via `OptResult<T>`.
//!
//! Downstream usage
//! ----------------
//! - The model layer calls [`covariance_from_hessian`] after fitting;
//!   the resulting matrix feeds [`delta_method_se`] for every reported
//!   quantity.
//! - [`fill_dmatrix`] and [`pseudo_inverse`] are internal helpers.
//!
//! Testing notes
//! -------------
//! - Unit tests check the covariance of diagonal quadratics against the
//!   analytic inverse, truncation behavior for singular information, and
//!   symmetry of the returned matrix.
//!
//! [`delta_method_se`]: crate::inference::delta::delta_method_se
use crate::optimization::{
    errors::OptResult, map_optimizer::finite_diff::compute_hessian,
    numerical_stability::EIGEN_EPS,
};
use nalgebra::DMatrix;
use ndarray::{Array1, Array2};

/// covariance_from_hessian — parameter covariance at the MAP point.
///
/// Purpose
/// -------
/// Compute the parameter covariance `Cov(θ̂) = H(θ̂)⁺` from the observed
/// information, where `H` is the finite-difference Hessian of the
/// objective gradient map `f: θ ↦ ∇c(θ)` at `theta_hat` and `⁺` denotes
/// the eigen-truncated Moore–Penrose pseudoinverse.
///
/// Parameters
/// ----------
/// - `f`: `&F`
///   Gradient map of the objective, `f: θ ↦ ∇c(θ)`. Must be C¹ in a
///   neighborhood of `theta_hat` so that [`compute_hessian`] can
///   succeed; finite-difference gradients wrapped in a NaN-capturing
///   closure are acceptable (invalid evaluations surface as
///   `InvalidHessian`).
/// - `theta_hat`: `&Array1<f64>`
///   Parameter vector `θ̂` at which the observed information is
///   evaluated. Its length `n` determines the dimension of the returned
///   matrix.
///
/// Returns
/// -------
/// `OptResult<Array2<f64>>`
///   On success, the symmetric `n×n` covariance matrix. On failure,
///   propagates the error from [`compute_hessian`] (e.g., non-finite
///   entries).
///
/// Errors
/// ------
/// - `OptError`
///   Any error that [`compute_hessian`] may return, such as Hessian
///   dimension mismatches or non-finite entries detected by validation.
///
/// Notes
/// -----
/// - Eigenvalues with magnitude at most [`EIGEN_EPS`] are treated as
///   zero when forming pseudoinverse directions; the corresponding
///   directions contribute nothing to the covariance, which reports
///   inflated uncertainty along them through the surviving terms only.
pub fn covariance_from_hessian<F: Fn(&Array1<f64>) -> Array1<f64>>(
    f: &F, theta_hat: &Array1<f64>,
) -> OptResult<Array2<f64>> {
    let n = theta_hat.len();
    let obs_info = compute_hessian(f, theta_hat)?;
    let mut obs_info_nalg = DMatrix::<f64>::zeros(obs_info.nrows(), obs_info.ncols());
    fill_dmatrix(&obs_info, &mut obs_info_nalg);
    Ok(pseudo_inverse(obs_info_nalg, n))
}

// ---- Helper methods ----

/// fill_dmatrix — copy an `ndarray` Hessian into a `nalgebra::DMatrix`.
///
/// Bridges between `ndarray` and `nalgebra` by copying a square observed
/// information matrix into a `DMatrix<f64>` with column-major writes.
/// No symmetrization is performed here; any asymmetry present in
/// `obs_info` is preserved (the upstream Hessian is already symmetric).
fn fill_dmatrix(obs_info: &Array2<f64>, obs_info_nalg: &mut DMatrix<f64>) {
    let n = obs_info.ncols();
    for j in 0..n {
        for i in j..n {
            if j == i {
                obs_info_nalg[(i, i)] = obs_info[[i, i]];
            } else {
                obs_info_nalg[(i, j)] = obs_info[[i, j]];
                obs_info_nalg[(j, i)] = obs_info[[j, i]];
            }
        }
    }
}

/// pseudo_inverse — eigen-truncated pseudoinverse of observed information.
///
/// Computes `H⁺ = Q Λ⁺ Qᵀ` from the symmetric eigendecomposition
/// `H = Q Λ Qᵀ`, where `Λ⁺` inverts eigenvalues above [`EIGEN_EPS`] and
/// zeroes the rest:
///
/// `Cov[i, j] = Σ_{k: λ_k > EIGEN_EPS} Q[i, k] · Q[j, k] / λ_k`
///
/// The returned matrix is symmetric by construction.
fn pseudo_inverse(obs_info_nalg: DMatrix<f64>, n: usize) -> Array2<f64> {
    let eigen_decomp = obs_info_nalg.symmetric_eigen();
    let q = eigen_decomp.eigenvectors;
    let eigenvals = eigen_decomp.eigenvalues;
    let mut cov = Array2::<f64>::zeros((n, n));
    for (k, &lambda) in eigenvals.iter().enumerate() {
        if lambda > EIGEN_EPS {
            for i in 0..n {
                let coeff = q[(i, k)] / lambda;
                for j in i..n {
                    let term = coeff * q[(j, k)];
                    cov[[i, j]] += term;
                    if i != j {
                        cov[[j, i]] += term;
                    }
                }
            }
        }
    }
    cov
}
