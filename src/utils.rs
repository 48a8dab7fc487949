//! Conversion helpers for the PyO3 binding surface.
//!
//! Everything in this module is gated behind the `python-bindings`
//! feature and performs only input extraction and option assembly: raw
//! Python objects become validated Rust containers and optimizer
//! options before any numerical work starts. Native Rust callers never
//! touch these helpers.
#[cfg(feature = "python-bindings")]
use ndarray::Array1;

#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyValueError, prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use crate::{
    model::core::data::SurveillanceData,
    optimization::map_optimizer::traits::{LineSearcher, MAPOptions, Tolerances},
};

#[cfg(feature = "python-bindings")]
use numpy::{
    IntoPyArray,    // Vec → PyArray
    PyArrayMethods, // .readonly()
    PyReadonlyArray1,
};

/// Extract a contiguous 1-D `f64` array from a numpy array, pandas
/// Series, or plain sequence.
#[cfg(feature = "python-bindings")]
#[inline]
pub fn extract_f64_array<'py>(
    py: Python<'py>, raw_data: &Bound<'py, PyAny>,
) -> PyResult<PyReadonlyArray1<'py, f64>> {
    if let Ok(arr_ro) = raw_data.extract::<PyReadonlyArray1<f64>>() {
        if arr_ro.as_slice().is_ok() {
            return Ok(arr_ro);
        }
    }

    if let Ok(obj) = raw_data.call_method("to_numpy", (false,), None) {
        if let Ok(series_ro) = obj.extract::<PyReadonlyArray1<f64>>() {
            if series_ro.as_slice().is_ok() {
                return Ok(series_ro);
            }
        }
    }

    let vec: Vec<f64> = raw_data.extract().map_err(|_| {
        pyo3::exceptions::PyTypeError::new_err(
            "expected a 1-D numpy.ndarray, pandas.Series, or sequence of float64",
        )
    })?;
    Ok(vec.into_pyarray(py).readonly())
}

/// Extract one observation vector as an owned `Array1<f64>`.
#[cfg(feature = "python-bindings")]
fn extract_owned_array<'py>(
    py: Python<'py>, raw_data: &Bound<'py, PyAny>, name: &str,
) -> PyResult<Array1<f64>> {
    let arr = extract_f64_array(py, raw_data)?;
    let slice = arr.as_slice().map_err(|_| {
        PyValueError::new_err(format!(
            "{name} must be a 1-D contiguous float64 array or sequence"
        ))
    })?;
    Ok(Array1::from(slice.to_vec()))
}

/// Build a validated [`SurveillanceData`] from six Python array-likes.
///
/// Contract violations surface as Python `ValueError`s with the Rust
/// error message.
#[cfg(feature = "python-bindings")]
#[allow(clippy::too_many_arguments)]
pub fn build_surveillance_data<'py>(
    py: Python<'py>, y_prev: &Bound<'py, PyAny>, m_prev: &Bound<'py, PyAny>,
    y_anc: &Bound<'py, PyAny>, m_anc: &Bound<'py, PyAny>, a_art: &Bound<'py, PyAny>,
    n_art: &Bound<'py, PyAny>,
) -> PyResult<SurveillanceData> {
    let y_prev = extract_owned_array(py, y_prev, "y_prev")?;
    let m_prev = extract_owned_array(py, m_prev, "m_prev")?;
    let y_anc = extract_owned_array(py, y_anc, "y_anc")?;
    let m_anc = extract_owned_array(py, m_anc, "m_anc")?;
    let a_art = extract_owned_array(py, a_art, "a_art")?;
    let n_art = extract_owned_array(py, n_art, "n_art")?;
    Ok(SurveillanceData::new(y_prev, m_prev, y_anc, m_anc, a_art, n_art)?)
}

/// Assemble validated [`MAPOptions`] from optional Python-facing knobs.
///
/// Defaults match `MAPOptions::default()` when every argument is `None`.
#[cfg(feature = "python-bindings")]
pub fn extract_map_opts(
    tol_grad: Option<f64>, tol_cost: Option<f64>, max_iter: Option<usize>,
    line_searcher: Option<&str>, lbfgs_mem: Option<usize>,
) -> PyResult<MAPOptions> {
    let defaults = MAPOptions::default();
    let tols = if tol_grad.is_none() && tol_cost.is_none() && max_iter.is_none() {
        defaults.tols
    } else {
        Tolerances::new(tol_grad, tol_cost, max_iter)?
    };
    let searcher = match line_searcher {
        Some(name) => name.parse::<LineSearcher>()?,
        None => defaults.line_searcher,
    };
    Ok(MAPOptions::new(tols, searcher, false, lbfgs_mem)?)
}
