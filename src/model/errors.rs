//! Error types for the prevalence model layer.
//!
//! Two enums split the failure surface the way the data flows:
//!
//! - [`DataError`]: violations of the input data contract, raised by
//!   [`SurveillanceData::new`] before any objective evaluation. These are
//!   never coerced or clamped away; a malformed input fails the fit up
//!   front.
//! - [`ModelError`]: failures while evaluating the model at a parameter
//!   vector — shape mismatches against the layout, the undefined ART
//!   coverage identity, prior-density construction problems, and
//!   requesting estimates before fitting.
//!
//! `ModelError` converts into the optimizer's `OptError` surface (see
//! `optimization::errors`) so the fitting entry points expose a single
//! error type.
//!
//! [`SurveillanceData::new`]: crate::model::core::data::SurveillanceData::new
#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};
use statrs::StatsError;

/// Result alias for data-contract validation.
pub type DataResult<T> = Result<T, DataError>;

/// Result alias for model evaluation.
pub type ModelResult<T> = Result<T, ModelError>;

/// Violations of the per-region observation contract.
#[derive(Debug, Clone, PartialEq)]
pub enum DataError {
    /// The region count is zero.
    EmptyData,

    /// One of the six observation vectors has the wrong length.
    LengthMismatch {
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    /// An observation is NaN or infinite.
    NonFiniteValue {
        field: &'static str,
        index: usize,
        value: f64,
    },

    /// A denominator (sample size or population) is zero or negative.
    NonPositiveDenominator {
        field: &'static str,
        index: usize,
        value: f64,
    },

    /// A count is negative.
    NegativeCount {
        field: &'static str,
        index: usize,
        value: f64,
    },

    /// A count exceeds its denominator.
    CountExceedsDenominator {
        field: &'static str,
        index: usize,
        count: f64,
        denominator: f64,
    },
}

impl std::error::Error for DataError {}

impl std::fmt::Display for DataError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataError::EmptyData => {
                write!(f, "Surveillance data must contain at least one region")
            }
            DataError::LengthMismatch { field, expected, actual } => {
                write!(f, "Length mismatch for '{field}': expected {expected}, actual {actual}")
            }
            DataError::NonFiniteValue { field, index, value } => {
                write!(f, "Non-finite value in '{field}' at region {index}: {value}")
            }
            DataError::NonPositiveDenominator { field, index, value } => {
                write!(
                    f,
                    "Non-positive denominator in '{field}' at region {index}: {value}, \
                     must be > 0"
                )
            }
            DataError::NegativeCount { field, index, value } => {
                write!(f, "Negative count in '{field}' at region {index}: {value}")
            }
            DataError::CountExceedsDenominator { field, index, count, denominator } => {
                write!(
                    f,
                    "Count exceeds denominator in '{field}' at region {index}: \
                     {count} > {denominator}"
                )
            }
        }
    }
}

/// Failures while evaluating the model at a parameter vector.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelError {
    /// Theta length does not match the parameter layout (`3n + 6`).
    ThetaLengthMismatch {
        expected: usize,
        actual: usize,
    },

    /// Unconstrained parameter input must have finite values.
    InvalidThetaInput {
        index: usize,
        value: f64,
    },

    /// Data region count does not match the model's parameter layout.
    RegionCountMismatch {
        expected: usize,
        actual: usize,
    },

    /// The ART coverage identity `alpha = a_art · rho_prev / n_art` is
    /// undefined: `a_art` or `rho_prev` is not strictly positive.
    AlphaArtUndefined {
        index: usize,
        a_art: f64,
        rho_prev: f64,
    },

    /// Wrapper for statrs::StatsError
    PriorDensity {
        text: String,
    },

    /// Estimates were requested before a successful fit.
    NotFitted,
}

impl std::error::Error for ModelError {}

impl std::fmt::Display for ModelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelError::ThetaLengthMismatch { expected, actual } => {
                write!(f, "Theta length mismatch: expected {expected}, actual {actual}")
            }
            ModelError::InvalidThetaInput { index, value } => {
                write!(f, "Invalid theta input at index {index}: {value}, must be finite")
            }
            ModelError::RegionCountMismatch { expected, actual } => {
                write!(f, "Region count mismatch: layout has {expected}, data has {actual}")
            }
            ModelError::AlphaArtUndefined { index, a_art, rho_prev } => {
                write!(
                    f,
                    "ART coverage undefined for region {index}: a_art = {a_art}, \
                     rho_prev = {rho_prev}; both must be strictly positive"
                )
            }
            ModelError::PriorDensity { text } => {
                write!(f, "Prior density construction failed: {text}")
            }
            ModelError::NotFitted => {
                write!(f, "Model has not been fitted yet")
            }
        }
    }
}

impl From<StatsError> for ModelError {
    fn from(err: StatsError) -> Self {
        ModelError::PriorDensity { text: err.to_string() }
    }
}

/// Convert a [`DataError`] into a Python `ValueError` with the error message.
///
/// This is used at the Rust↔Python boundary to surface contract violations
/// cleanly.
#[cfg(feature = "python-bindings")]
impl From<DataError> for PyErr {
    fn from(err: DataError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

/// Convert a [`ModelError`] into a Python `ValueError` with the error message.
#[cfg(feature = "python-bindings")]
impl From<ModelError> for PyErr {
    fn from(err: ModelError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}
