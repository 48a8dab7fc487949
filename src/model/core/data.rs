//! Surveillance data containers for the joint prevalence model.
//!
//! Purpose
//! -------
//! Provide a small, validated container for the three per-region data
//! sources consumed by the joint model: household survey responses, ANC
//! test results, and ART enrollment counts. This module centralizes input
//! validation so the transform, likelihood, and reporting layers can
//! assume clean observation vectors.
//!
//! Key behaviors
//! -------------
//! - [`SurveillanceData`] enforces the full input contract at
//!   construction: equal lengths, finite entries, strictly positive
//!   denominators, and counts within `[0, denominator]`.
//! - All six vectors are immutable for the lifetime of a fit; no method
//!   mutates them after construction.
//!
//! Invariants & assumptions
//! ------------------------
//! - `n_regions() ≥ 1` and all vectors have length `n_regions()`.
//! - `m_prev`, `m_anc`, `n_art` are strictly positive and finite.
//! - `0 ≤ y_prev ≤ m_prev`, `0 ≤ y_anc ≤ m_anc`, `0 ≤ a_art ≤ n_art`
//!   element-wise.
//! - `a_art[i] == 0` is **valid data**: the likelihood never scores the
//!   ART columns, and the reporting layer rejects the coverage identity
//!   for such regions with a typed error instead.
//!
//! Conventions
//! -----------
//! - Indexing is 0-based; region `i` refers to position `i` in every
//!   vector simultaneously.
//! - Counts are carried as `f64` (matching the numeric pipeline) but
//!   validated as counts.
//!
//! Downstream usage
//! ----------------
//! - Construct [`SurveillanceData`] at the boundary where raw
//!   observations enter the modeling stack; downstream code relies on
//!   its invariants and never re-validates basic properties.
//!
//! Testing notes
//! -------------
//! - Unit tests cover the happy path and each rejection branch (empty,
//!   length mismatch, non-finite, non-positive denominator, negative
//!   count, count above denominator).
use crate::model::errors::{DataError, DataResult};
use ndarray::Array1;

/// `SurveillanceData` — validated per-region observations for one fit.
///
/// Purpose
/// -------
/// Represent the immutable data contract of the joint prevalence model:
/// six equal-length vectors pairing counts with denominators for the
/// survey, ANC, and ART arms.
///
/// Fields
/// ------
/// - `y_prev` / `m_prev`: `Array1<f64>`
///   Survey positives and survey sample sizes.
/// - `y_anc` / `m_anc`: `Array1<f64>`
///   ANC positives and ANC sample sizes.
/// - `a_art` / `n_art`: `Array1<f64>`
///   People on ART and total population.
///
/// Invariants
/// ----------
/// - All vectors share length `n ≥ 1`.
/// - All entries finite; denominators strictly positive; counts within
///   `[0, denominator]`.
///
/// Performance
/// -----------
/// - Validation is O(n) with a single scan per vector; after
///   construction this type is a plain container with no hidden
///   allocations.
///
/// Notes
/// -----
/// - This type performs no transformation of the inputs; link-scale
///   quantities live in `model::core::transforms`.
#[derive(Debug, Clone, PartialEq)]
pub struct SurveillanceData {
    /// Survey positives (0 ≤ y_prev ≤ m_prev).
    pub y_prev: Array1<f64>,
    /// Survey sample sizes (> 0).
    pub m_prev: Array1<f64>,
    /// ANC positives (0 ≤ y_anc ≤ m_anc).
    pub y_anc: Array1<f64>,
    /// ANC sample sizes (> 0).
    pub m_anc: Array1<f64>,
    /// People on ART (0 ≤ a_art ≤ n_art).
    pub a_art: Array1<f64>,
    /// Total population (> 0).
    pub n_art: Array1<f64>,
}

impl SurveillanceData {
    /// Construct a validated [`SurveillanceData`] instance.
    ///
    /// Parameters
    /// ----------
    /// - `y_prev`, `m_prev`, `y_anc`, `m_anc`, `a_art`, `n_art`:
    ///   the six observation vectors; all must have the length of
    ///   `y_prev` and satisfy the invariants above.
    ///
    /// Returns
    /// -------
    /// `DataResult<Self>` — the validated container, or the first
    /// contract violation found.
    ///
    /// Errors
    /// ------
    /// - [`DataError::EmptyData`] when `y_prev` is empty.
    /// - [`DataError::LengthMismatch`] when any vector length differs.
    /// - [`DataError::NonFiniteValue`] for NaN/±∞ entries.
    /// - [`DataError::NonPositiveDenominator`] for `m_prev`, `m_anc`, or
    ///   `n_art` entries ≤ 0.
    /// - [`DataError::NegativeCount`] /
    ///   [`DataError::CountExceedsDenominator`] for out-of-range counts.
    pub fn new(
        y_prev: Array1<f64>, m_prev: Array1<f64>, y_anc: Array1<f64>, m_anc: Array1<f64>,
        a_art: Array1<f64>, n_art: Array1<f64>,
    ) -> DataResult<Self> {
        let n = y_prev.len();
        if n == 0 {
            return Err(DataError::EmptyData);
        }
        for (field, v) in [
            ("m_prev", &m_prev),
            ("y_anc", &y_anc),
            ("m_anc", &m_anc),
            ("a_art", &a_art),
            ("n_art", &n_art),
        ] {
            if v.len() != n {
                return Err(DataError::LengthMismatch { field, expected: n, actual: v.len() });
            }
        }
        for (field, v) in [
            ("y_prev", &y_prev),
            ("m_prev", &m_prev),
            ("y_anc", &y_anc),
            ("m_anc", &m_anc),
            ("a_art", &a_art),
            ("n_art", &n_art),
        ] {
            for (index, &value) in v.iter().enumerate() {
                if !value.is_finite() {
                    return Err(DataError::NonFiniteValue { field, index, value });
                }
            }
        }
        for (field, v) in [("m_prev", &m_prev), ("m_anc", &m_anc), ("n_art", &n_art)] {
            for (index, &value) in v.iter().enumerate() {
                if value <= 0.0 {
                    return Err(DataError::NonPositiveDenominator { field, index, value });
                }
            }
        }
        for (field, counts, denoms) in [
            ("y_prev", &y_prev, &m_prev),
            ("y_anc", &y_anc, &m_anc),
            ("a_art", &a_art, &n_art),
        ] {
            for (index, (&count, &denominator)) in counts.iter().zip(denoms.iter()).enumerate() {
                if count < 0.0 {
                    return Err(DataError::NegativeCount { field, index, value: count });
                }
                if count > denominator {
                    return Err(DataError::CountExceedsDenominator {
                        field,
                        index,
                        count,
                        denominator,
                    });
                }
            }
        }
        Ok(Self { y_prev, m_prev, y_anc, m_anc, a_art, n_art })
    }

    /// Number of regions `n` shared by all observation vectors.
    pub fn n_regions(&self) -> usize {
        self.y_prev.len()
    }
}
