//! report::table — point estimates and standard errors for every group.
//!
//! Purpose
//! -------
//! Assemble the output contract of a fit: for each derived-quantity
//! group in [`Quantity::REPORT_ORDER`], a vector of point estimates and
//! a matching vector of delta-method standard errors, with the
//! optimizer's convergence status carried alongside so callers can judge
//! how much to trust the numbers.
//!
//! Key behaviors
//! -------------
//! - [`build_estimate_table`] evaluates every group at `θ̂` (failing
//!   fast on domain violations such as an undefined ART coverage), then
//!   propagates the parameter covariance through each component with
//!   the generic delta-method routine.
//! - Vector groups expand per region; the group order is exactly
//!   [`Quantity::REPORT_ORDER`].
//! - Non-convergence is **not** an error: `converged` / `status` are
//!   copied from the optimizer outcome into the table.
//!
//! Invariants & assumptions
//! ------------------------
//! - `theta_hat` satisfies the layout (validated on every `eval`), and
//!   `cov` is the symmetric `dim×dim` parameter covariance.
//! - Component closures map internal evaluation failures to `NaN`,
//!   which the delta-method Jacobian validation rejects — a failure
//!   near `θ̂` cannot silently produce a finite-looking standard error.
//!
//! Testing notes
//! -------------
//! - Unit tests cover table shape/order, the zero-count ART rejection,
//!   and lookup by name. Statistical behavior of the standard errors is
//!   exercised by the integration suite.
use crate::inference::delta::delta_method_se;
use crate::model::core::{data::SurveillanceData, params::ParamLayout};
use crate::optimization::errors::OptResult;
use crate::report::quantities::Quantity;
use ndarray::{Array1, Array2};

/// One reported group: point estimates and standard errors, expanded
/// per region for vector-valued quantities.
#[derive(Debug, Clone, PartialEq)]
pub struct QuantityEstimate {
    /// Which group this row describes.
    pub quantity: Quantity,
    /// Point estimates at `θ̂` (length 1 or `n_regions`).
    pub estimates: Array1<f64>,
    /// Delta-method standard errors, aligned with `estimates`.
    pub std_errors: Array1<f64>,
}

/// The full output table of one fit.
///
/// Groups appear in [`Quantity::REPORT_ORDER`]; `converged` and
/// `status` are copied from the optimizer outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct EstimateTable {
    /// The twelve groups, in report order.
    pub groups: Vec<QuantityEstimate>,
    /// Whether the optimizer reported a terminating status.
    pub converged: bool,
    /// Human-readable termination status.
    pub status: String,
}

impl EstimateTable {
    /// Look up a group by its stable name (e.g. `"rho_prev"`).
    pub fn get(&self, name: &str) -> Option<&QuantityEstimate> {
        self.groups.iter().find(|g| g.quantity.name() == name)
    }
}

/// build_estimate_table — evaluate and propagate every reported group.
///
/// Parameters
/// ----------
/// - `layout`: parameter packing shared with the fit.
/// - `data`: the validated observation vectors of the fit.
/// - `theta_hat`: MAP estimate from the optimizer.
/// - `cov`: `dim×dim` parameter covariance at `theta_hat`.
/// - `converged` / `status`: optimizer termination report, passed
///   through to the table.
///
/// Returns
/// -------
/// `OptResult<EstimateTable>` with one [`QuantityEstimate`] per group in
/// [`Quantity::REPORT_ORDER`].
///
/// Errors
/// ------
/// - Layout violations of `theta_hat`.
/// - `AlphaArtUndefined` when a region has a zero ART count or
///   degenerate prevalence — the defined reject policy, surfaced here
///   rather than as a NaN row.
/// - Delta-method failures (non-finite Jacobians, covariance shape
///   mismatches).
pub fn build_estimate_table(
    layout: &ParamLayout, data: &SurveillanceData, theta_hat: &Array1<f64>, cov: &Array2<f64>,
    converged: bool, status: String,
) -> OptResult<EstimateTable> {
    let mut groups = Vec::with_capacity(Quantity::REPORT_ORDER.len());
    for quantity in Quantity::REPORT_ORDER {
        let estimates = quantity.eval(theta_hat, layout, data)?;
        let mut std_errors = Array1::zeros(estimates.len());
        for component in 0..estimates.len() {
            let q = |theta: &Array1<f64>| -> f64 {
                match quantity.eval(theta, layout, data) {
                    Ok(values) => values[component],
                    Err(_) => f64::NAN,
                }
            };
            std_errors[component] = delta_method_se(&q, theta_hat, cov)?;
        }
        groups.push(QuantityEstimate { quantity, estimates, std_errors });
    }
    Ok(EstimateTable { groups, converged, status })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::errors::OptError;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Table shape: group order, per-group lengths, finite SEs.
    // - The zero-ART-count reject policy at table level.
    // - Lookup by name and status pass-through.
    //
    // They intentionally DO NOT cover:
    // - Statistical properties of the SEs (integration tests).
    // -------------------------------------------------------------------------

    fn single_region_data(a_art: f64) -> SurveillanceData {
        SurveillanceData::new(
            array![50.0],
            array![100.0],
            array![60.0],
            array![100.0],
            array![a_art],
            array![1000.0],
        )
        .expect("valid data")
    }

    #[test]
    // Purpose
    // -------
    // Verify the table carries all twelve groups in report order with
    // finite, aligned estimates and standard errors.
    //
    // Given
    // -----
    // - n = 1, θ̂ = zero-init with beta_prev = −2, identity covariance.
    //
    // Expect
    // ------
    // - 12 groups in `REPORT_ORDER`; each SE vector matches its estimate
    //   vector in length; all values finite; status preserved.
    fn table_has_all_groups_in_order_with_finite_values() {
        // Arrange
        let layout = ParamLayout::new(1);
        let data = single_region_data(500.0);
        let mut theta_hat = layout.zero_init();
        theta_hat[0] = -2.0;
        let cov = Array2::eye(layout.dim());

        // Act
        let table =
            build_estimate_table(&layout, &data, &theta_hat, &cov, true, "test".to_string())
                .expect("table should build");

        // Assert
        assert_eq!(table.groups.len(), 12);
        for (group, expected) in table.groups.iter().zip(Quantity::REPORT_ORDER) {
            assert_eq!(group.quantity, expected);
            assert_eq!(group.estimates.len(), group.std_errors.len());
            assert!(group.estimates.iter().all(|v| v.is_finite()));
            assert!(group.std_errors.iter().all(|v| v.is_finite()));
        }
        assert!(table.converged);
        assert_eq!(table.status, "test");
    }

    #[test]
    // Purpose
    // -------
    // Verify a zero ART count fails the table with the typed domain error
    // instead of producing a NaN or silent-zero alpha_art row.
    //
    // Given
    // -----
    // - n = 1 data with a_art = 0.
    //
    // Expect
    // ------
    // - `OptError::AlphaArtUndefined { index: 0, .. }`.
    fn zero_art_count_rejects_table_construction() {
        // Arrange
        let layout = ParamLayout::new(1);
        let data = single_region_data(0.0);
        let theta_hat = layout.zero_init();
        let cov = Array2::eye(layout.dim());

        // Act
        let result =
            build_estimate_table(&layout, &data, &theta_hat, &cov, true, "test".to_string());

        // Assert
        assert!(matches!(result, Err(OptError::AlphaArtUndefined { index: 0, .. })));
    }

    #[test]
    // Purpose
    // -------
    // Verify `get` finds groups by their stable names.
    //
    // Given
    // -----
    // - A built table for n = 1.
    //
    // Expect
    // ------
    // - "rho_prev" resolves; an unknown name does not.
    fn get_resolves_groups_by_name() {
        // Arrange
        let layout = ParamLayout::new(1);
        let data = single_region_data(500.0);
        let theta_hat = layout.zero_init();
        let cov = Array2::eye(layout.dim());
        let table =
            build_estimate_table(&layout, &data, &theta_hat, &cov, false, "max".to_string())
                .expect("table should build");

        // Act / Assert
        assert!(table.get("rho_prev").is_some());
        assert!(table.get("rho_unknown").is_none());
        assert!(!table.converged);
    }
}
