//! report — the fixed output contract of a fit.
//!
//! Purpose
//! -------
//! Turn a converged parameter vector and its covariance into the
//! estimates table consumers read: twelve named derived-quantity groups,
//! each with point estimates and delta-method standard errors, expanded
//! per region for vector-valued groups, in a fixed order.
//!
//! Key behaviors
//! -------------
//! - [`Quantity`] enumerates the groups and evaluates each as a pure,
//!   differentiable map of the parameter vector.
//! - [`build_estimate_table`] pairs every component with a
//!   delta-method standard error and carries the optimizer's
//!   convergence report into the resulting [`EstimateTable`].
//!
//! Downstream usage
//! ----------------
//! - `model::models::joint` calls [`build_estimate_table`] from its
//!   `estimates` method; external callers usually consume the table
//!   through [`EstimateTable::get`] or by iterating `groups` in order.
//!
//! Testing notes
//! -------------
//! - Unit tests live beside [`quantities`] (ordering, names, lengths,
//!   precision round trip) and [`table`] (shape, reject policy, lookup);
//!   statistical behavior is covered by the integration suite.

pub mod quantities;
pub mod table;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::quantities::Quantity;
pub use self::table::{EstimateTable, QuantityEstimate, build_estimate_table};

// ---- Optional convenience prelude for downstream crates -------------------

pub mod prelude {
    pub use super::quantities::Quantity;
    pub use super::table::{EstimateTable, QuantityEstimate, build_estimate_table};
}
