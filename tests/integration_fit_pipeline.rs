//! Integration tests for the joint prevalence model and inference.
//!
//! Purpose
//! -------
//! - Validate the end-to-end pipeline: from validated surveillance data,
//!   through model construction and MAP fitting, to the parameter
//!   covariance and the delta-method estimates table.
//! - Exercise realistic parameter regimes (informative data, multiple
//!   regions, optimizer settings) rather than toy edge cases only.
//!
//! Coverage
//! --------
//! - `model::core`:
//!   - `SurveillanceData` construction and contract rejection.
//!   - Objective invariance under consistent region permutations.
//! - `model::models::joint::JointPrevalenceModel`:
//!   - Model construction, fitting, covariance, and estimates.
//! - `report`:
//!   - Group ordering, per-region expansion, the tau round trip, the
//!     ART coverage identity, and the zero-count reject policy.
//! - `optimization::map_optimizer`:
//!   - Use of LBFGS + line search via `MAPOptions` and `Tolerances`,
//!     including the iteration-cap non-convergence report.
//!
//! Exclusions
//! ----------
//! - Fine-grained validation of low-level building blocks (guarded
//!   transforms, FD helpers, validation routines) — covered by unit
//!   tests.
//! - Python bindings — expected to be tested at the packaging level.
use ndarray::array;
use seroprev::{
    model::{
        core::{data::SurveillanceData, options::FitOptions, params::ParamLayout},
        models::joint::JointPrevalenceModel,
    },
    optimization::{
        errors::OptError,
        map_optimizer::{LineSearcher, MAPOptions, Objective, Tolerances},
        numerical_stability::safe_invlogit,
    },
    report::quantities::Quantity,
};

/// Purpose
/// -------
/// Construct a consistent three-region dataset with moderate prevalence,
/// a visible ANC bias, and informative sample sizes, suitable for a fit
/// that converges quickly under default tolerances.
fn three_region_data() -> SurveillanceData {
    SurveillanceData::new(
        array![120.0, 45.0, 210.0],
        array![800.0, 500.0, 1200.0],
        array![180.0, 70.0, 260.0],
        array![900.0, 450.0, 1100.0],
        array![4000.0, 1500.0, 9000.0],
        array![50000.0, 30000.0, 80000.0],
    )
    .expect("three-region data should satisfy the contract")
}

/// Purpose
/// -------
/// Provide a stable baseline `FitOptions` configuration reflecting
/// typical user settings: gradient tolerance 1e-5 with a cost-change
/// exit at 1e-9 (finite-difference gradients carry a little noise at
/// the optimum), 400 iterations, More–Thuente line search, default
/// L-BFGS memory.
fn default_fit_options() -> FitOptions {
    let tols = Tolerances::new(Some(1e-5), Some(1e-9), Some(400))
        .expect("Tolerances::new should accept positive tolerances");
    let map_opts = MAPOptions::new(tols, LineSearcher::MoreThuente, false, None)
        .expect("MAPOptions::new should succeed with reasonable tolerances");
    FitOptions::new(map_opts)
}

#[test]
// Purpose
// -------
// Run the full pipeline on three regions and check the structural
// output contract: convergence, twelve ordered groups, per-region
// expansion, strictly positive standard errors, and prevalences inside
// (0, 1).
//
// Given
// -----
// - Informative three-region data and default options, zero init.
//
// Expect
// ------
// - A converged fit whose estimates table has every group in report
//   order with finite estimates and positive SEs.
fn full_pipeline_produces_ordered_finite_estimates() {
    // Arrange
    let data = three_region_data();
    let mut model = JointPrevalenceModel::new(3, default_fit_options());
    let theta0 = model.layout.zero_init();

    // Act
    model.fit(theta0, &data).expect("fit should succeed");
    let table = model.estimates(&data).expect("estimates should build");

    // Assert
    let results = model.results.as_ref().expect("results cached after fit");
    assert!(results.converged, "status: {}", results.status);
    assert_eq!(table.groups.len(), 12);
    for (group, expected) in table.groups.iter().zip(Quantity::REPORT_ORDER) {
        assert_eq!(group.quantity, expected);
        assert_eq!(group.estimates.len(), expected.len(3));
        assert_eq!(group.std_errors.len(), expected.len(3));
        assert!(group.estimates.iter().all(|v| v.is_finite()));
        assert!(group.std_errors.iter().all(|v| v.is_finite() && *v > 0.0));
    }
    let rho_prev = table.get("rho_prev").expect("rho_prev group");
    for &rho in rho_prev.estimates.iter() {
        assert!(rho > 0.0 && rho < 1.0);
    }
    assert!(table.converged);
}

#[test]
// Purpose
// -------
// Verify the tau round trip: the reported precision must equal
// 1/exp(log_sigma)² evaluated at the optimizer's returned parameter
// vector, within floating-point tolerance.
//
// Given
// -----
// - A converged three-region fit.
//
// Expect
// ------
// - tau_phi_prev, tau_b_anc, tau_phi_art all match the closed form at
//   theta_hat to 1e-12 relative error.
fn reported_precisions_round_trip_theta_hat() {
    // Arrange
    let data = three_region_data();
    let mut model = JointPrevalenceModel::new(3, default_fit_options());
    model.fit(model.layout.zero_init(), &data).expect("fit should succeed");
    let table = model.estimates(&data).expect("estimates should build");
    let theta_hat = &model.results.as_ref().expect("fitted").theta_hat;

    // log_sigma slots for n = 3: phi_prev at 4, b_anc at 9, phi_art at 14.
    for (name, slot) in [("tau_phi_prev", 4), ("tau_b_anc", 9), ("tau_phi_art", 14)] {
        let tau = table.get(name).expect(name).estimates[0];
        let expected = 1.0 / theta_hat[slot].exp().powi(2);

        // Assert
        assert!(
            ((tau - expected) / expected).abs() < 1e-12,
            "{name}: reported {tau}, closed form {expected}"
        );
    }
}

#[test]
// Purpose
// -------
// Pin the single-region scenario: with zero initialization the linear
// predictor is the intercept, and after fitting, the reported ART
// coverage must satisfy the exact log identity against the reported
// prevalence.
//
// Given
// -----
// - n = 1 with y_prev 50/100, y_anc 60/100, 500 on ART of 1000.
//
// Expect
// ------
// - At zero init: eta_prev = beta_prev = 0, rho_prev = invlogit(0) = 0.5.
// - After the fit: alpha_art = exp(ln 500 + ln rho_prev − ln 1000).
fn single_region_scenario_matches_log_identity() {
    // Arrange
    let data = SurveillanceData::new(
        array![50.0],
        array![100.0],
        array![60.0],
        array![100.0],
        array![500.0],
        array![1000.0],
    )
    .expect("single-region data");
    let mut model = JointPrevalenceModel::new(1, default_fit_options());
    let theta0 = model.layout.zero_init();

    // Zero init: the objective must be evaluable and rho_prev = 0.5 there.
    let value0 = model.value(&theta0, &data).expect("objective at zero init");
    assert!(value0.is_finite());
    assert_eq!(safe_invlogit(theta0[0]), 0.5);

    // Act
    model.fit(theta0, &data).expect("fit should succeed");
    let table = model.estimates(&data).expect("estimates should build");

    // Assert
    let rho_hat = table.get("rho_prev").expect("rho_prev").estimates[0];
    let alpha_hat = table.get("alpha_art").expect("alpha_art").estimates[0];
    let expected_alpha = (500.0_f64.ln() + rho_hat.ln() - 1000.0_f64.ln()).exp();
    assert!(
        (alpha_hat - expected_alpha).abs() < 1e-10,
        "alpha {alpha_hat} vs identity {expected_alpha}"
    );
    // The survey arm dominates beta_prev, so rho_prev lands near 0.5.
    assert!(rho_hat > 0.3 && rho_hat < 0.7);
}

#[test]
// Purpose
// -------
// Verify the degenerate-input policy end to end: a region with a zero
// ART count must fail the estimates call with the typed domain error,
// never a silent zero or NaN in the table.
//
// Given
// -----
// - n = 2 data with a_art[1] = 0; a converged fit.
//
// Expect
// ------
// - `estimates` returns `AlphaArtUndefined { index: 1, .. }`.
fn zero_art_count_raises_domain_error_in_report() {
    // Arrange
    let data = SurveillanceData::new(
        array![50.0, 30.0],
        array![100.0, 80.0],
        array![60.0, 20.0],
        array![100.0, 60.0],
        array![500.0, 0.0],
        array![1000.0, 900.0],
    )
    .expect("zero ART count is valid data");
    let mut model = JointPrevalenceModel::new(2, default_fit_options());

    // Act
    model.fit(model.layout.zero_init(), &data).expect("fit should succeed");
    let result = model.estimates(&data);

    // Assert
    assert!(matches!(result, Err(OptError::AlphaArtUndefined { index: 1, .. })));
}

#[test]
// Purpose
// -------
// Verify that more survey information tightens the posterior: growing
// m_prev while holding the empirical prevalence fixed must shrink the
// reported standard error on rho_prev.
//
// Given
// -----
// - Two single-region fits with y/m = 0.5 at m = 100 and m = 2000.
//
// Expect
// ------
// - SE(rho_prev) strictly smaller for the larger sample.
fn larger_survey_sample_shrinks_rho_standard_error() {
    // Arrange
    let se_for = |y: f64, m: f64| {
        let data = SurveillanceData::new(
            array![y],
            array![m],
            array![60.0],
            array![100.0],
            array![500.0],
            array![1000.0],
        )
        .expect("valid data");
        let mut model = JointPrevalenceModel::new(1, default_fit_options());
        model.fit(model.layout.zero_init(), &data).expect("fit should succeed");
        let table = model.estimates(&data).expect("estimates should build");
        table.get("rho_prev").expect("rho_prev").std_errors[0]
    };

    // Act
    let se_small = se_for(50.0, 100.0);
    let se_large = se_for(1000.0, 2000.0);

    // Assert
    assert!(
        se_large < se_small,
        "SE should shrink with sample size: {se_large} !< {se_small}"
    );
}

#[test]
// Purpose
// -------
// Verify objective invariance under a consistent permutation of regions:
// reordering the data and every per-region parameter block together must
// not change the objective value.
//
// Given
// -----
// - Three-region data and a nonzero θ; regions reversed in both.
//
// Expect
// ------
// - Identical objective values to 1e-12.
fn objective_is_invariant_under_consistent_region_permutation() {
    // Arrange
    let data = three_region_data();
    let reversed = SurveillanceData::new(
        array![210.0, 45.0, 120.0],
        array![1200.0, 500.0, 800.0],
        array![260.0, 70.0, 180.0],
        array![1100.0, 450.0, 900.0],
        array![9000.0, 1500.0, 4000.0],
        array![80000.0, 30000.0, 50000.0],
    )
    .expect("reversed data");
    let model = JointPrevalenceModel::new(3, default_fit_options());
    let layout = ParamLayout::new(3);

    let mut theta = layout.zero_init();
    theta[0] = -1.7; // beta_prev
    theta[1] = 0.6; // phi_prev
    theta[2] = -0.2;
    theta[3] = 0.9;
    theta[4] = 0.3; // log_sigma_phi_prev
    theta[5] = 0.25; // beta_anc
    theta[6] = 0.4; // b_anc
    theta[7] = -0.5;
    theta[8] = 0.8;
    theta[9] = -0.4; // log_sigma_b_anc
    theta[10] = 0.1; // beta_art
    theta[11] = 1.0; // phi_art
    theta[12] = -0.9;
    theta[13] = 0.2;
    theta[14] = 0.15; // log_sigma_phi_art

    let mut theta_reversed = theta.clone();
    for (start, len) in [(1, 3), (6, 3), (11, 3)] {
        for offset in 0..len {
            theta_reversed[start + offset] = theta[start + len - 1 - offset];
        }
    }

    // Act
    let value = model.value(&theta, &data).expect("objective");
    let value_reversed = model.value(&theta_reversed, &reversed).expect("objective");

    // Assert
    assert!((value - value_reversed).abs() < 1e-12);
}

#[test]
// Purpose
// -------
// Verify that exhausting the iteration budget is reported as
// non-convergence with the reason preserved, while estimates remain
// available for inspection.
//
// Given
// -----
// - A three-region fit capped at a single iteration.
//
// Expect
// ------
// - `converged == false` with the iteration cap named in the status,
//   and the estimates table carrying the same flag.
fn iteration_cap_is_reported_not_fatal() {
    // Arrange
    let tols = Tolerances::new(Some(1e-12), None, Some(1)).expect("valid tolerances");
    let map_opts = MAPOptions::new(tols, LineSearcher::MoreThuente, false, None)
        .expect("valid options");
    let data = three_region_data();
    let mut model = JointPrevalenceModel::new(3, FitOptions::new(map_opts));

    // Act
    model.fit(model.layout.zero_init(), &data).expect("capped fit should still produce state");
    let results = model.results.as_ref().expect("results cached");
    let table = model.estimates(&data).expect("estimates should still build");

    // Assert
    assert!(!results.converged);
    assert!(results.status.contains("MaxItersReached"), "status: {}", results.status);
    assert!(!table.converged);
    assert_eq!(table.status, results.status);
    assert_eq!(results.iterations, 1);
}

#[test]
// Purpose
// -------
// Verify the ANC bias is identifiable in the expected direction: data
// with ANC prevalence above survey prevalence must yield a positive
// fitted beta_anc.
//
// Given
// -----
// - Three regions where y_anc/m_anc exceeds y_prev/m_prev throughout.
//
// Expect
// ------
// - beta_anc estimate > 0 and eta_anc − eta_prev > 0 per region at the
//   fitted point.
fn positive_anc_bias_is_recovered() {
    // Arrange
    let data = three_region_data(); // ANC fractions exceed survey fractions
    let mut model = JointPrevalenceModel::new(3, default_fit_options());

    // Act
    model.fit(model.layout.zero_init(), &data).expect("fit should succeed");
    let table = model.estimates(&data).expect("estimates should build");

    // Assert
    let beta_anc = table.get("beta_anc").expect("beta_anc").estimates[0];
    assert!(beta_anc > 0.0, "beta_anc = {beta_anc}");
    let rho_prev = table.get("rho_prev").expect("rho_prev");
    let rho_anc = table.get("rho_anc").expect("rho_anc");
    for i in 0..3 {
        assert!(rho_anc.estimates[i] > rho_prev.estimates[i], "region {i}");
    }
}
