//! seroprev — joint small-area HIV prevalence, ANC bias, and ART coverage
//! estimation with Python bindings.
//!
//! Purpose
//! -------
//! Serve as the crate root for Rust callers and as the PyO3 bridge that
//! exposes the joint prevalence model to Python via the `_seroprev`
//! extension module. When the `python-bindings` feature is enabled, this
//! module defines the Python-facing classes and the module initializer
//! used by the `seroprev` package.
//!
//! Key behaviors
//! -------------
//! - Re-export the core Rust modules (`model`, `optimization`,
//!   `inference`, `report`) as the public crate surface.
//! - Define `#[pyclass]` wrappers and the `#[pymodule]` initializer for
//!   the `_seroprev` Python extension.
//!
//! Invariants & assumptions
//! ------------------------
//! - All heavy numerical work is implemented in the inner Rust modules;
//!   this file performs only FFI glue, input validation, and error
//!   mapping.
//! - When `python-bindings` is enabled, the Python-visible types mirror
//!   the invariants and signatures of their Rust counterparts
//!   (e.g. `JointPrevalenceModel`, `OptimOutcome`).
//!
//! Conventions
//! -----------
//! - Errors from core Rust code are propagated as rich error types
//!   internally and converted to `PyErr` values at the PyO3 boundary.
//! - Python-exposed methods take raw observation arrays on each call;
//!   the model instance itself carries no data.
//!
//! Downstream usage
//! ----------------
//! - Native Rust code should depend directly on the inner modules and
//!   can ignore the PyO3 items guarded by the `python-bindings`
//!   feature:
//!   `SurveillanceData::new(...)` →
//!   `JointPrevalenceModel::new(n, opts)` → `fit` → `estimates`.
//! - The Python packaging layer imports the `_seroprev` module defined
//!   here and wraps its classes in user-facing Python APIs.
//!
//! Testing notes
//! -------------
//! - Core numerical behavior is covered by unit tests in the inner
//!   modules and by the `tests/` integration suite exercising the full
//!   fit → report pipeline.
//! - Smoke tests for the PyO3 bindings verify that classes can be
//!   constructed, called, and round-tripped correctly from Python.

pub mod inference;
pub mod model;
pub mod optimization;
pub mod report;
pub mod utils;

#[cfg(feature = "python-bindings")]
use ndarray::Array1;

#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyValueError, prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use crate::{
    model::{core::options::FitOptions, models::joint::JointPrevalenceModel},
    optimization::map_optimizer::traits::OptimOutcome,
    utils::{build_surveillance_data, extract_f64_array, extract_map_opts},
};

/// JointPrevalence — Python-facing wrapper for the joint prevalence model.
///
/// Purpose
/// -------
/// Expose the [`JointPrevalenceModel`] API to Python callers while
/// preserving the core Rust invariants and error handling.
///
/// Key behaviors
/// -------------
/// - Build a model for a fixed region count with optimizer options from
///   Python-friendly arguments.
/// - Provide `fit` and `estimates` methods that convert Python arrays
///   into `SurveillanceData` and delegate to the core implementation.
/// - Cache the optimization result for inspection via property getters.
///
/// Parameters
/// ----------
/// Constructed from Python via
/// `JointPrevalence(n_regions, tol_grad=None, tol_cost=None,
/// max_iter=None, line_searcher=None, lbfgs_mem=None)`.
///
/// Fields
/// ------
/// - `inner`: [`JointPrevalenceModel`]
///   Fully configured model that owns the parameter layout and cached
///   results.
///
/// Notes
/// -----
/// - Native Rust callers should work with [`JointPrevalenceModel`]
///   directly; this type exists solely for the PyO3 binding surface.
#[cfg(feature = "python-bindings")]
#[pyclass(module = "seroprev")]
pub struct JointPrevalence {
    /// Underlying Rust model.
    pub inner: JointPrevalenceModel,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl JointPrevalence {
    #[new]
    #[pyo3(
        signature = (
            n_regions,
            tol_grad = None,
            tol_cost = None,
            max_iter = None,
            line_searcher = None,
            lbfgs_mem = None,
        ),
        text_signature = "(n_regions, /, tol_grad=None, tol_cost=None, max_iter=None, \
                          line_searcher=None, lbfgs_mem=None)"
    )]
    pub fn new(
        n_regions: usize, tol_grad: Option<f64>, tol_cost: Option<f64>, max_iter: Option<usize>,
        line_searcher: Option<&str>, lbfgs_mem: Option<usize>,
    ) -> PyResult<Self> {
        if n_regions == 0 {
            return Err(PyValueError::new_err("n_regions must be at least 1"));
        }
        let map_opts = extract_map_opts(tol_grad, tol_cost, max_iter, line_searcher, lbfgs_mem)?;
        let inner = JointPrevalenceModel::new(n_regions, FitOptions::new(map_opts));
        Ok(JointPrevalence { inner })
    }

    #[pyo3(
        signature = (y_prev, m_prev, y_anc, m_anc, a_art, n_art, theta0 = None),
        text_signature = "(self, y_prev, m_prev, y_anc, m_anc, a_art, n_art, /, theta0=None)"
    )]
    #[allow(clippy::too_many_arguments)]
    pub fn fit<'py>(
        &mut self, py: Python<'py>, y_prev: &Bound<'py, PyAny>, m_prev: &Bound<'py, PyAny>,
        y_anc: &Bound<'py, PyAny>, m_anc: &Bound<'py, PyAny>, a_art: &Bound<'py, PyAny>,
        n_art: &Bound<'py, PyAny>, theta0: Option<&Bound<'py, PyAny>>,
    ) -> PyResult<()> {
        let data = build_surveillance_data(py, y_prev, m_prev, y_anc, m_anc, a_art, n_art)?;
        let theta0 = match theta0 {
            Some(raw) => {
                let arr = extract_f64_array(py, raw)?;
                let slice = arr.as_slice().map_err(|_| {
                    PyValueError::new_err(
                        "theta0 must be a 1-D contiguous float64 array or sequence",
                    )
                })?;
                Array1::from(slice.to_vec())
            }
            None => self.inner.layout.zero_init(),
        };
        self.inner.fit(theta0, &data)?;
        Ok(())
    }

    /// Estimates table as `(name, estimates, standard_errors)` triples in
    /// report order, plus convergence metadata via the getters.
    #[pyo3(
        signature = (y_prev, m_prev, y_anc, m_anc, a_art, n_art),
        text_signature = "(self, y_prev, m_prev, y_anc, m_anc, a_art, n_art)"
    )]
    #[allow(clippy::too_many_arguments)]
    pub fn estimates<'py>(
        &self, py: Python<'py>, y_prev: &Bound<'py, PyAny>, m_prev: &Bound<'py, PyAny>,
        y_anc: &Bound<'py, PyAny>, m_anc: &Bound<'py, PyAny>, a_art: &Bound<'py, PyAny>,
        n_art: &Bound<'py, PyAny>,
    ) -> PyResult<Vec<(String, Vec<f64>, Vec<f64>)>> {
        let data = build_surveillance_data(py, y_prev, m_prev, y_anc, m_anc, a_art, n_art)?;
        let table = self.inner.estimates(&data)?;
        Ok(table
            .groups
            .into_iter()
            .map(|g| (g.quantity.name().to_string(), g.estimates.to_vec(), g.std_errors.to_vec()))
            .collect())
    }

    #[getter]
    pub fn results(&self) -> PyResult<PrevalenceOptimOutcome> {
        match &self.inner.results {
            Some(outcome) => Ok(PrevalenceOptimOutcome { inner: outcome.clone() }),
            None => Err(PyValueError::new_err("Model has not been fitted yet")),
        }
    }
}

/// PrevalenceOptimOutcome — optimization outcome exposed to Python.
///
/// Purpose
/// -------
/// Present the key optimizer diagnostics from [`OptimOutcome`] to Python
/// code in a lightweight, read-only wrapper.
///
/// Parameters
/// ----------
/// Instances are constructed internally by the `JointPrevalence.results`
/// getter and are not created directly by user code.
///
/// Notes
/// -----
/// - This type is part of the Python FFI surface; Rust code should
///   prefer using [`OptimOutcome`] directly.
#[cfg(feature = "python-bindings")]
#[pyclass(module = "seroprev")]
pub struct PrevalenceOptimOutcome {
    /// Underlying Rust OptimOutcome.
    pub inner: OptimOutcome,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl PrevalenceOptimOutcome {
    #[getter]
    pub fn theta_hat(&self) -> Vec<f64> {
        self.inner.theta_hat.to_vec()
    }

    #[getter]
    pub fn value(&self) -> f64 {
        self.inner.value
    }

    #[getter]
    pub fn converged(&self) -> bool {
        self.inner.converged
    }

    #[getter]
    pub fn status(&self) -> String {
        self.inner.status.clone()
    }

    #[getter]
    pub fn iterations(&self) -> usize {
        self.inner.iterations
    }

    #[getter]
    pub fn grad_norm(&self) -> Option<f64> {
        self.inner.grad_norm
    }

    #[getter]
    pub fn fn_evals(&self) -> Vec<(String, u64)> {
        self.inner.fn_evals.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }
}

/// _seroprev — PyO3 module initializer for the Python extension.
///
/// Registers the model and outcome classes on the `_seroprev` module.
/// Invoked automatically by Python when importing the compiled
/// extension; never called directly by user code.
#[cfg(feature = "python-bindings")]
#[pymodule]
fn _seroprev<'py>(_py: Python<'py>, m: &Bound<'py, PyModule>) -> PyResult<()> {
    m.add_class::<JointPrevalence>()?;
    m.add_class::<PrevalenceOptimOutcome>()?;
    Ok(())
}
