//! Perturbation-energy series: increments and convergence ratios.
//!
//! This is the analysis core of mpconv. The external solver produces a ladder
//! of cumulative energies, one per perturbation order (the reference
//! Hartree-Fock energy first, then MP2, MP3, ...). From that ladder this
//! module derives:
//!
//! - **increments**: the energy gained at each order,
//!   `increment[0] = values[0]` and `increment[i] = values[i] - values[i-1]`;
//! - **adjacent ratios**: `increment[i-1] / increment[i]`, a direct measure of
//!   how fast the series converges from one order to the next;
//! - **leading ratios**: `increment[1] / increment[k]`, the size of every
//!   later correction relative to the MP2 increment.
//!
//! All transforms are pure, single-pass and order-preserving. NaN and Inf in
//! the input propagate silently, matching the conventions of the solver that
//! produced the values.
//!
//! # Division by zero
//!
//! An increment of exactly `0.0` makes every ratio over it undefined. The
//! policy here is an explicit [`SeriesError::ZeroIncrement`] error rather
//! than an infinity sentinel, and it is applied uniformly to adjacent and
//! leading ratios: a report either contains only finite, well-defined ratios
//! or fails as a whole.

use thiserror::Error;

/// Error type for energy-series operations.
#[derive(Error, Debug, PartialEq)]
pub enum SeriesError {
    /// The series has no entries; nothing can be derived from it.
    #[error("insufficient data: an energy series needs at least one entry")]
    Empty,
    /// A ratio denominator was exactly zero.
    #[error("division by zero: increment {index} ({label}) is exactly zero")]
    ZeroIncrement {
        /// Position of the zero increment within the series
        index: usize,
        /// Perturbation-order label of the zero increment
        label: String,
    },
}

/// An immutable, ordered sequence of labeled cumulative energies.
///
/// Index 0 holds the reference (Hartree-Fock) energy; later indices hold the
/// successive cumulative Møller-Plesset energies. Order 1 is never a member:
/// the first-order correction is already contained in the reference energy.
///
/// The values come from the external solver and are not mutated after
/// construction.
///
/// # Examples
///
/// ```
/// use mpconv::series::EnergySeries;
///
/// let series = EnergySeries::new(vec![
///     ("HF".to_string(), -100.0),
///     ("MP2".to_string(), -100.5),
///     ("MP3".to_string(), -100.75),
/// ]).unwrap();
///
/// assert_eq!(series.increments(), vec![-100.0, -0.5, -0.25]);
/// ```
#[derive(Debug, Clone)]
pub struct EnergySeries {
    labels: Vec<String>,
    values: Vec<f64>,
}

impl EnergySeries {
    /// Build a series from `(label, cumulative energy)` pairs, reference first.
    ///
    /// Fails with [`SeriesError::Empty`] when no entries are supplied; a
    /// single-entry (reference-only) series is valid.
    pub fn new(entries: Vec<(String, f64)>) -> Result<Self, SeriesError> {
        if entries.is_empty() {
            return Err(SeriesError::Empty);
        }
        let (labels, values) = entries.into_iter().unzip();
        Ok(Self { labels, values })
    }

    /// Perturbation-order labels, reference first.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Cumulative energies, reference first.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Number of entries (reference plus perturbation orders).
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when the series holds no entries. Unreachable for constructed
    /// series; present for completeness of the container API.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Per-order energy increments.
    ///
    /// Infallible: construction guarantees at least one entry.
    pub fn increments(&self) -> Vec<f64> {
        compute_increments(&self.values).expect("non-empty by construction")
    }

    /// Label for the increment at `index`, e.g. `"MP3"`.
    fn increment_label(&self, index: usize) -> String {
        self.labels
            .get(index)
            .cloned()
            .unwrap_or_else(|| format!("#{}", index))
    }

    /// Adjacent-order convergence ratios with their display labels, e.g.
    /// `("HF/MP2", 200.0)`.
    pub fn adjacent_ratios(&self) -> Result<Vec<(String, f64)>, SeriesError> {
        let increments = self.increments();
        let ratios = compute_ratios(&increments)
            .map_err(|e| self.relabel_zero(e))?;
        let labeled = ratios
            .into_iter()
            .enumerate()
            .map(|(i, r)| {
                (
                    format!("{}/{}", self.increment_label(i), self.increment_label(i + 1)),
                    r,
                )
            })
            .collect();
        Ok(labeled)
    }

    /// Leading-order cross ratios with their display labels, e.g.
    /// `("MP2/MP5", 50.0)`.
    pub fn leading_ratios(&self) -> Result<Vec<(String, f64)>, SeriesError> {
        let increments = self.increments();
        let ratios = compute_leading_ratios(&increments)
            .map_err(|e| self.relabel_zero(e))?;
        let labeled = ratios
            .into_iter()
            .enumerate()
            .map(|(i, r)| {
                (
                    format!("{}/{}", self.increment_label(1), self.increment_label(i + 2)),
                    r,
                )
            })
            .collect();
        Ok(labeled)
    }

    /// Attach the perturbation-order label to a zero-increment error raised
    /// by the unlabeled transforms.
    fn relabel_zero(&self, err: SeriesError) -> SeriesError {
        match err {
            SeriesError::ZeroIncrement { index, .. } => SeriesError::ZeroIncrement {
                index,
                label: self.increment_label(index),
            },
            other => other,
        }
    }
}

/// Compute per-order energy increments from cumulative energies.
///
/// Index 0 maps directly; each subsequent index is the difference from its
/// predecessor. The input must have at least one entry. NaN/Inf values
/// propagate silently.
pub fn compute_increments(values: &[f64]) -> Result<Vec<f64>, SeriesError> {
    let first = *values.first().ok_or(SeriesError::Empty)?;
    let mut increments = Vec::with_capacity(values.len());
    increments.push(first);
    for pair in values.windows(2) {
        increments.push(pair[1] - pair[0]);
    }
    Ok(increments)
}

/// Compute adjacent-order ratios, dividing each increment by its successor.
///
/// Fails with [`SeriesError::ZeroIncrement`] when a denominator is exactly
/// zero. Fewer than two increments yield an empty result.
pub fn compute_ratios(increments: &[f64]) -> Result<Vec<f64>, SeriesError> {
    let mut ratios = Vec::new();
    for i in 1..increments.len() {
        if increments[i] == 0.0 {
            return Err(SeriesError::ZeroIncrement {
                index: i,
                label: String::new(),
            });
        }
        ratios.push(increments[i - 1] / increments[i]);
    }
    Ok(ratios)
}

/// Compute leading-order cross ratios `increment[1] / increment[k]` for
/// every k >= 2.
///
/// Same zero-denominator policy as [`compute_ratios`]. Fewer than three
/// increments yield an empty result.
pub fn compute_leading_ratios(increments: &[f64]) -> Result<Vec<f64>, SeriesError> {
    let mut ratios = Vec::new();
    if increments.len() < 3 {
        return Ok(ratios);
    }
    let leading = increments[1];
    for (k, &denominator) in increments.iter().enumerate().skip(2) {
        if denominator == 0.0 {
            return Err(SeriesError::ZeroIncrement {
                index: k,
                label: String::new(),
            });
        }
        ratios.push(leading / denominator);
    }
    Ok(ratios)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nh_like_series() -> EnergySeries {
        // HF, MP2..MP6 ladder with increments -100.0, -0.5, -0.1, -0.05,
        // -0.01, -0.005
        EnergySeries::new(vec![
            ("HF".to_string(), -100.0),
            ("MP2".to_string(), -100.5),
            ("MP3".to_string(), -100.6),
            ("MP4".to_string(), -100.65),
            ("MP5".to_string(), -100.66),
            ("MP6".to_string(), -100.665),
        ])
        .unwrap()
    }

    #[test]
    fn test_increment_prefix_sums_reproduce_values() {
        let series = nh_like_series();
        let increments = series.increments();
        let mut running = 0.0;
        for (k, value) in series.values().iter().enumerate() {
            running += increments[k];
            assert!(
                (running - value).abs() < 1e-10,
                "prefix sum diverged at order index {}",
                k
            );
        }
    }

    #[test]
    fn test_single_entry_series_is_identity() {
        assert_eq!(compute_increments(&[-100.0]).unwrap(), vec![-100.0]);
        let series = EnergySeries::new(vec![("HF".to_string(), -100.0)]).unwrap();
        assert_eq!(series.increments(), vec![-100.0]);
        assert!(series.adjacent_ratios().unwrap().is_empty());
        assert!(series.leading_ratios().unwrap().is_empty());
    }

    #[test]
    fn test_empty_series_rejected() {
        assert_eq!(EnergySeries::new(vec![]).unwrap_err(), SeriesError::Empty);
        assert_eq!(compute_increments(&[]).unwrap_err(), SeriesError::Empty);
    }

    #[test]
    fn test_worked_example_increments_and_hf_mp2_ratio() {
        let series = nh_like_series();
        let increments = series.increments();
        let expected = [-100.0, -0.5, -0.1, -0.05, -0.01, -0.005];
        for (got, want) in increments.iter().zip(expected.iter()) {
            assert!((got - want).abs() < 1e-9, "got {} want {}", got, want);
        }

        let ratios = series.adjacent_ratios().unwrap();
        assert_eq!(ratios[0].0, "HF/MP2");
        assert!((ratios[0].1 - 200.0).abs() < 1e-9);
    }

    #[test]
    fn test_leading_ratios_track_mp2_increment() {
        let increments = [-100.0, -0.5, -0.1, -0.05, -0.01, -0.005];
        let ratios = compute_leading_ratios(&increments).unwrap();
        let expected = [5.0, 10.0, 50.0, 100.0];
        assert_eq!(ratios.len(), expected.len());
        for (got, want) in ratios.iter().zip(expected.iter()) {
            assert!((got - want).abs() < 1e-9);
        }
    }

    #[test]
    fn test_zero_increment_is_an_error_in_both_ratio_families() {
        let increments = [-100.0, -0.5, 0.0, -0.05];
        assert!(matches!(
            compute_ratios(&increments),
            Err(SeriesError::ZeroIncrement { index: 2, .. })
        ));
        assert!(matches!(
            compute_leading_ratios(&increments),
            Err(SeriesError::ZeroIncrement { index: 2, .. })
        ));
    }

    #[test]
    fn test_zero_increment_error_carries_order_label() {
        let series = EnergySeries::new(vec![
            ("HF".to_string(), -100.0),
            ("MP2".to_string(), -100.5),
            ("MP3".to_string(), -100.5),
        ])
        .unwrap();
        let err = series.adjacent_ratios().unwrap_err();
        assert_eq!(
            err,
            SeriesError::ZeroIncrement {
                index: 2,
                label: "MP3".to_string()
            }
        );
    }

    #[test]
    fn test_nan_propagates_silently_through_increments() {
        let increments = compute_increments(&[-1.0, f64::NAN]).unwrap();
        assert!(increments[1].is_nan());
    }
}
