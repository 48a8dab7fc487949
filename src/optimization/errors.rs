use argmin::core::{ArgminError, Error};
#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

use crate::model::errors::ModelError;

/// Crate-wide result alias for optimizer operations.
pub type OptResult<T> = Result<T, OptError>;

#[derive(Debug, Clone, PartialEq)]
pub enum OptError {
    // ---- Gradient ----
    /// Implies that FD should be used
    GradientNotImplemented,

    /// Gradient dimensions do not match parameter dimensions.
    GradientDimMismatch {
        expected: usize,
        found: usize,
    },

    /// Gradient elements need to be finite
    InvalidGradient {
        index: usize,
        value: f64,
        reason: &'static str,
    },

    // ---- MAPOptions ----
    /// Gradient tolerance needs to be positive and finite.
    InvalidTolGrad {
        tol: f64,
        reason: &'static str,
    },
    /// Cost change tolerance needs to be positive and finite.
    InvalidTolCost {
        tol: f64,
        reason: &'static str,
    },
    /// Maximum iterations needs to be positive.
    InvalidMaxIter {
        max_iter: usize,
        reason: &'static str,
    },
    /// At least one tolerance must be provided.
    NoTolerancesProvided,

    /// Invalid line searcher name.
    InvalidLineSearch {
        name: String,
        reason: &'static str,
    },

    /// lbfgs_mem needs to be at least 1.
    InvalidLBFGSMem {
        mem: usize,
        reason: &'static str,
    },

    // ---- Cost function ----
    /// Objective returned a non-finite value.
    NonFiniteCost {
        value: f64,
    },

    // ---- Optimizer outcome ----
    /// Estimated parameters must be finite.
    InvalidThetaHat {
        index: usize,
        value: f64,
        reason: &'static str,
    },

    /// Theta hat is missing
    MissingThetaHat,

    // ---- Argmin ---
    /// Wrapper for argmin::InvalidParameter
    InvalidParameter {
        text: String,
    },
    /// Wrapper for argmin::NotImplemented
    NotImplemented {
        text: String,
    },
    /// Wrapper for argmin::NotInitialized
    NotInitialized {
        text: String,
    },
    /// Wrapper for argmin::ConditionViolated
    ConditionViolated {
        text: String,
    },
    /// Wrapper for argmin::CheckPointNotFound
    CheckPointNotFound {
        text: String,
    },
    /// Wrapper for argmin::PotentialBug
    PotentialBug {
        text: String,
    },
    /// Wrapper for argmin::ImpossibleError
    ImpossibleError {
        text: String,
    },
    /// Wrapper for other argmin::Error types
    BackendError {
        text: String,
    },

    // ---- Finite Diffs ----
    /// Hessian matrix dimensions do not match parameter dimensions.
    HessianDimMismatch {
        expected: usize,
        found: (usize, usize),
    },

    /// Hessian values need to be finite.
    InvalidHessian {
        row: usize,
        col: usize,
        value: f64,
    },

    // ---- Model Errors ----
    /// Theta length does not match the parameter layout.
    ThetaLengthMismatch {
        expected: usize,
        actual: usize,
    },

    /// Unconstrained optimization input must have finite values.
    InvalidThetaInput {
        index: usize,
        value: f64,
    },

    /// Data region count does not match the model's parameter layout.
    RegionCountMismatch {
        expected: usize,
        actual: usize,
    },

    /// ART coverage identity undefined for a region.
    AlphaArtUndefined {
        index: usize,
        a_art: f64,
        rho_prev: f64,
    },

    /// A prior density could not be constructed.
    PriorDensity {
        text: String,
    },

    /// Estimates were requested before a successful fit.
    ModelNotFitted,

    // ---- Fallback ----
    UnknownError,
}

impl std::error::Error for OptError {}

impl std::fmt::Display for OptError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Gradient ----
            OptError::GradientNotImplemented => {
                write!(f, "Gradient optimization not implemented")
            }
            OptError::GradientDimMismatch { expected, found } => {
                write!(f, "Gradient dimension mismatch: expected {expected}, found {found}")
            }
            OptError::InvalidGradient { index, value, reason } => {
                write!(f, "Invalid gradient at index {index}: {value}: {reason}")
            }

            // ---- MAPOptions ----
            OptError::InvalidTolGrad { tol, reason } => {
                write!(f, "Invalid gradient tolerance {tol}: {reason}")
            }
            OptError::InvalidTolCost { tol, reason } => {
                write!(f, "Invalid cost function change tolerance {tol}: {reason}")
            }
            OptError::InvalidMaxIter { max_iter, reason } => {
                write!(f, "Invalid maximum iterations {max_iter}: {reason}")
            }
            OptError::NoTolerancesProvided => {
                write!(f, "No tolerances provided")
            }
            OptError::InvalidLineSearch { name, reason } => {
                write!(f, "Invalid line searcher '{name}': {reason}")
            }
            OptError::InvalidLBFGSMem { mem, reason } => {
                write!(f, "Invalid L-BFGS memory {mem}: {reason}")
            }

            // ---- Cost function ----
            OptError::NonFiniteCost { value } => {
                write!(f, "Non-finite cost value: {value}")
            }

            // ---- Optimizer outcome ----
            OptError::InvalidThetaHat { index, value, reason } => {
                write!(f, "Invalid estimated parameter at index {index}: {value}: {reason}")
            }
            OptError::MissingThetaHat => {
                write!(f, "Missing estimated parameters (theta hat)")
            }

            // ---- Argmin ----
            OptError::InvalidParameter { text } => {
                write!(f, "Invalid parameter: {text}")
            }
            OptError::NotImplemented { text } => {
                write!(f, "Not implemented: {text}")
            }
            OptError::NotInitialized { text } => {
                write!(f, "Not initialized: {text}")
            }
            OptError::ConditionViolated { text } => {
                write!(f, "Condition violated: {text}")
            }
            OptError::CheckPointNotFound { text } => {
                write!(f, "Checkpoint not found: {text}")
            }
            OptError::PotentialBug { text } => {
                write!(f, "Potential bug: {text}")
            }
            OptError::ImpossibleError { text } => {
                write!(f, "Impossible error: {text}")
            }
            OptError::BackendError { text } => {
                write!(f, "Backend error: {text}")
            }

            // ---- Finite Diffs ----
            OptError::HessianDimMismatch { expected, found } => {
                write!(
                    f,
                    "Hessian dimension mismatch: expected ({expected}, {expected}), found {found:?}"
                )
            }
            OptError::InvalidHessian { row, col, value } => {
                write!(f, "Invalid Hessian at ({row}, {col}): {value}, must be finite")
            }

            // ---- Model Errors ----
            OptError::ThetaLengthMismatch { expected, actual } => {
                write!(f, "Theta length mismatch: expected {expected}, actual {actual}")
            }
            OptError::InvalidThetaInput { index, value } => {
                write!(f, "Invalid theta input at index {index}: {value}, must be finite")
            }
            OptError::RegionCountMismatch { expected, actual } => {
                write!(f, "Region count mismatch: layout has {expected}, data has {actual}")
            }
            OptError::AlphaArtUndefined { index, a_art, rho_prev } => {
                write!(
                    f,
                    "ART coverage undefined for region {index}: a_art = {a_art}, \
                     rho_prev = {rho_prev}; both must be strictly positive"
                )
            }
            OptError::PriorDensity { text } => {
                write!(f, "Prior density construction failed: {text}")
            }
            OptError::ModelNotFitted => {
                write!(f, "Model has not been fitted yet")
            }

            // ---- Fallback ----
            OptError::UnknownError => {
                write!(f, "Unknown error")
            }
        }
    }
}

impl From<Error> for OptError {
    fn from(original_err: Error) -> Self {
        match original_err.downcast() {
            Ok(opt_err) => match opt_err {
                ArgminError::InvalidParameter { text } => OptError::InvalidParameter { text },
                ArgminError::NotImplemented { text } => OptError::NotImplemented { text },
                ArgminError::NotInitialized { text } => OptError::NotInitialized { text },
                ArgminError::ConditionViolated { text } => OptError::ConditionViolated { text },
                ArgminError::CheckpointNotFound { text } => OptError::CheckPointNotFound { text },
                ArgminError::PotentialBug { text } => OptError::PotentialBug { text },
                ArgminError::ImpossibleError { text } => OptError::ImpossibleError { text },
                _ => OptError::UnknownError,
            },
            Err(err) => OptError::BackendError { text: err.to_string() },
        }
    }
}

/// Convert an [`OptError`] into a Python `ValueError` with the error message.
///
/// This is used at the Rust↔Python boundary to surface optimizer and model
/// failures cleanly.
#[cfg(feature = "python-bindings")]
impl From<OptError> for PyErr {
    fn from(err: OptError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

impl From<ModelError> for OptError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::ThetaLengthMismatch { expected, actual } => {
                OptError::ThetaLengthMismatch { expected, actual }
            }
            ModelError::InvalidThetaInput { index, value } => {
                OptError::InvalidThetaInput { index, value }
            }
            ModelError::RegionCountMismatch { expected, actual } => {
                OptError::RegionCountMismatch { expected, actual }
            }
            ModelError::AlphaArtUndefined { index, a_art, rho_prev } => {
                OptError::AlphaArtUndefined { index, a_art, rho_prev }
            }
            ModelError::PriorDensity { text } => OptError::PriorDensity { text },
            ModelError::NotFitted => OptError::ModelNotFitted,
        }
    }
}
