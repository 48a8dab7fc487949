//! Fit options — configuration for the MAP estimation workflow.
//!
//! Purpose
//! -------
//! Collect the configuration knobs for fitting the joint prevalence
//! model in one place. Optimizer controls (tolerances, line search,
//! L-BFGS memory, verbosity) are pass-through configuration for the
//! backend; the model layer stores and forwards them without
//! interpreting them.
//!
//! Invariants & assumptions
//! ------------------------
//! - [`FitOptions`] assumes its [`MAPOptions`] component has already
//!   been validated by its own constructor; no cross-field checks are
//!   added here.
//!
//! Downstream usage
//! ----------------
//! - Construct a [`FitOptions`] (or start from `FitOptions::default()`)
//!   and pass it to `JointPrevalenceModel::new`; the model forwards
//!   `map_opts` to `minimize` on every `fit` call.
//!
//! Testing notes
//! -------------
//! - `FitOptions::new` is a plain carrier constructor; it is exercised
//!   implicitly through the model-layer and integration tests.
use crate::optimization::map_optimizer::MAPOptions;

/// `FitOptions` — estimation-time configuration for the joint model.
///
/// Fields
/// ------
/// - `map_opts`: [`MAPOptions`]
///   Optimizer configuration (tolerances, maximum iterations,
///   line-search strategy, verbosity, L-BFGS memory) used during MAP
///   estimation.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FitOptions {
    /// Optimizer configuration forwarded to the backend untouched.
    pub map_opts: MAPOptions,
}

impl FitOptions {
    /// Bundle already-validated optimizer options.
    pub fn new(map_opts: MAPOptions) -> Self {
        Self { map_opts }
    }
}
