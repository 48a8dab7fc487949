//! Parameter layout for the joint prevalence model.
//!
//! Purpose
//! -------
//! Own the packing of the unconstrained optimizer vector `θ ∈ ℝ^{3n+6}`
//! and provide named, borrowed access to its blocks. Every layer that
//! touches `θ` (priors, transforms, reporting) goes through this module,
//! so the packing order is defined exactly once.
//!
//! Key behaviors
//! -------------
//! - [`ParamLayout`] maps a region count `n` to the total dimension and
//!   the offsets of each block.
//! - [`ParamLayout::view`] validates length and finiteness, then returns
//!   a [`ParamView`] borrowing scalar and vector blocks without copying.
//! - [`ParamLayout::zero_init`] produces the conventional all-zeros
//!   starting point.
//!
//! Invariants & assumptions
//! ------------------------
//! - Packing order (fixed):
//!   `[beta_prev, phi_prev[0..n], log_sigma_phi_prev,
//!     beta_anc,  b_anc[0..n],    log_sigma_b_anc,
//!     beta_art,  phi_art[0..n],  log_sigma_phi_art]`.
//! - Standard deviations are always recovered as `exp(log_sigma_*)`,
//!   strictly positive at any point the optimizer can reach.
//! - A [`ParamView`] is only handed out for finite `θ` of the correct
//!   length.
//!
//! Conventions
//! -----------
//! - `phi_prev` and `phi_art` are the survey / ART random-effect blocks;
//!   `b_anc` is the ANC bias block. All three have prior mean 0 and unit
//!   variance before scaling.
//!
//! Downstream usage
//! ----------------
//! - `model::core::priors` and `model::core::transforms` consume
//!   [`ParamView`]s; `report::quantities` uses the same layout to keep
//!   derived-quantity Jacobians aligned with `θ`.
//!
//! Testing notes
//! -------------
//! - Unit tests cover the dimension arithmetic, round-tripping values
//!   through `view`, zero initialization, and rejection of wrong-length
//!   or non-finite inputs.
use crate::model::errors::{ModelError, ModelResult};
use ndarray::{Array1, ArrayView1, s};

/// `ParamLayout` — packing of the unconstrained parameter vector.
///
/// Purpose
/// -------
/// Translate between the flat optimizer vector `θ` and the named blocks
/// of the joint model for a fixed region count `n`.
///
/// Fields
/// ------
/// - `n_regions`: `usize`
///   Number of regions; each random-effect block has this length.
///
/// Invariants
/// ----------
/// - `dim() == 3 * n_regions + 6`.
///
/// Notes
/// -----
/// - The layout is a value type: copy it freely, it carries no buffers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamLayout {
    /// Number of regions shared with the data contract.
    pub n_regions: usize,
}

/// Borrowed, named view of one parameter vector.
///
/// Block order and meanings match the fixed packing documented on
/// [`ParamLayout`]. Scalar blocks are copied out; vector blocks borrow.
#[derive(Debug, Clone)]
pub struct ParamView<'a> {
    /// Survey intercept.
    pub beta_prev: f64,
    /// Survey random effects (unscaled).
    pub phi_prev: ArrayView1<'a, f64>,
    /// Survey log standard deviation of random effects.
    pub log_sigma_phi_prev: f64,
    /// ANC bias intercept.
    pub beta_anc: f64,
    /// ANC bias effects (unscaled).
    pub b_anc: ArrayView1<'a, f64>,
    /// ANC log standard deviation of bias effects.
    pub log_sigma_b_anc: f64,
    /// ART intercept.
    pub beta_art: f64,
    /// ART random effects (unscaled).
    pub phi_art: ArrayView1<'a, f64>,
    /// ART log standard deviation of random effects.
    pub log_sigma_phi_art: f64,
}

impl ParamLayout {
    /// Create a layout for `n_regions` regions.
    pub fn new(n_regions: usize) -> Self {
        Self { n_regions }
    }

    /// Total dimension of the packed vector: `3n + 6`.
    pub fn dim(&self) -> usize {
        3 * self.n_regions + 6
    }

    /// All-zeros initial parameter vector (the conventional start).
    pub fn zero_init(&self) -> Array1<f64> {
        Array1::zeros(self.dim())
    }

    /// Borrow the named blocks of `theta`.
    ///
    /// # Errors
    /// - [`ModelError::ThetaLengthMismatch`] when `theta.len() != dim()`.
    /// - [`ModelError::InvalidThetaInput`] when any entry is non-finite.
    pub fn view<'a>(&self, theta: &'a Array1<f64>) -> ModelResult<ParamView<'a>> {
        if theta.len() != self.dim() {
            return Err(ModelError::ThetaLengthMismatch {
                expected: self.dim(),
                actual: theta.len(),
            });
        }
        for (index, &value) in theta.iter().enumerate() {
            if !value.is_finite() {
                return Err(ModelError::InvalidThetaInput { index, value });
            }
        }
        let n = self.n_regions;
        Ok(ParamView {
            beta_prev: theta[0],
            phi_prev: theta.slice(s![1..1 + n]),
            log_sigma_phi_prev: theta[1 + n],
            beta_anc: theta[2 + n],
            b_anc: theta.slice(s![3 + n..3 + 2 * n]),
            log_sigma_b_anc: theta[3 + 2 * n],
            beta_art: theta[4 + 2 * n],
            phi_art: theta.slice(s![5 + 2 * n..5 + 3 * n]),
            log_sigma_phi_art: theta[5 + 3 * n],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array1;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Dimension arithmetic and zero initialization.
    // - Faithful block extraction for a hand-packed vector.
    // - Rejection of wrong-length and non-finite inputs.
    //
    // They intentionally DO NOT cover:
    // - Downstream use of the blocks in priors/transforms.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Verify `dim` and `zero_init` agree with the 3n + 6 packing.
    //
    // Given
    // -----
    // - Layouts for n = 1 and n = 4.
    //
    // Expect
    // ------
    // - Dimensions 9 and 18; zero_init vectors of matching length.
    fn dim_and_zero_init_match_packing() {
        assert_eq!(ParamLayout::new(1).dim(), 9);
        assert_eq!(ParamLayout::new(4).dim(), 18);
        assert_eq!(ParamLayout::new(4).zero_init().len(), 18);
        assert!(ParamLayout::new(1).zero_init().iter().all(|&v| v == 0.0));
    }

    #[test]
    // Purpose
    // -------
    // Verify that `view` extracts each block from its documented offset.
    //
    // Given
    // -----
    // - A hand-packed θ for n = 2 with distinct values per slot.
    //
    // Expect
    // ------
    // - Every scalar and vector block matches its packed position.
    fn view_extracts_blocks_at_documented_offsets() {
        // Arrange
        let layout = ParamLayout::new(2);
        let theta = Array1::from(vec![
            -2.0, // beta_prev
            0.1, 0.2, // phi_prev
            -0.5, // log_sigma_phi_prev
            0.3, // beta_anc
            0.4, 0.5, // b_anc
            -0.6, // log_sigma_b_anc
            0.7, // beta_art
            0.8, 0.9, // phi_art
            -0.7, // log_sigma_phi_art
        ]);

        // Act
        let view = layout.view(&theta).expect("well-formed theta");

        // Assert
        assert_eq!(view.beta_prev, -2.0);
        assert_eq!(view.phi_prev.to_vec(), vec![0.1, 0.2]);
        assert_eq!(view.log_sigma_phi_prev, -0.5);
        assert_eq!(view.beta_anc, 0.3);
        assert_eq!(view.b_anc.to_vec(), vec![0.4, 0.5]);
        assert_eq!(view.log_sigma_b_anc, -0.6);
        assert_eq!(view.beta_art, 0.7);
        assert_eq!(view.phi_art.to_vec(), vec![0.8, 0.9]);
        assert_eq!(view.log_sigma_phi_art, -0.7);
    }

    #[test]
    // Purpose
    // -------
    // Verify that wrong-length and non-finite vectors are rejected.
    //
    // Given
    // -----
    // - A θ one element short, and a correct-length θ containing NaN.
    //
    // Expect
    // ------
    // - `ThetaLengthMismatch` and `InvalidThetaInput` respectively.
    fn view_rejects_malformed_theta() {
        // Arrange
        let layout = ParamLayout::new(2);
        let short = Array1::zeros(layout.dim() - 1);
        let mut nan = layout.zero_init();
        nan[3] = f64::NAN;

        // Act / Assert
        assert!(matches!(
            layout.view(&short),
            Err(ModelError::ThetaLengthMismatch { expected: 12, actual: 11 })
        ));
        assert!(matches!(
            layout.view(&nan),
            Err(ModelError::InvalidThetaInput { index: 3, .. })
        ));
    }
}
