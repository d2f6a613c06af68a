use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Under/overflow handling policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowPolicy {
    /// Keep out-of-range weights only in the `underflow/overflow` counters.
    #[default]
    Drop,
    /// Also fold underflow into the first bin and overflow into the last bin.
    Fold,
}

/// Where a value lands relative to a set of bin edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinLocation {
    /// Below the first edge.
    Underflow,
    /// Inside bin `i` (lower edge inclusive, upper edge exclusive).
    Bin(usize),
    /// At or above the last edge, or NaN.
    Overflow,
}

/// Check that edges are finite, strictly increasing, and delimit at least one bin.
pub fn validate_edges(edges: &[f64]) -> Result<()> {
    if edges.len() < 2 {
        return Err(Error::Validation(format!(
            "need at least 2 bin edges, got {}",
            edges.len()
        )));
    }
    if let Some(i) = edges.iter().position(|e| !e.is_finite()) {
        return Err(Error::Validation(format!("bin edge {i} is not finite: {}", edges[i])));
    }
    if let Some(i) = edges.windows(2).position(|w| w[1] <= w[0]) {
        return Err(Error::Validation(format!(
            "bin edges must be strictly increasing (edge {}={} >= edge {}={})",
            i,
            edges[i],
            i + 1,
            edges[i + 1]
        )));
    }
    Ok(())
}

/// `n` equal-width bins covering `[lo, hi)`.
pub fn uniform_edges(n: usize, lo: f64, hi: f64) -> Result<Vec<f64>> {
    if n == 0 {
        return Err(Error::Validation("uniform binning needs n >= 1".into()));
    }
    if !(lo.is_finite() && hi.is_finite() && hi > lo) {
        return Err(Error::Validation(format!("invalid uniform range [{lo}, {hi})")));
    }
    let step = (hi - lo) / n as f64;
    // Last edge is set exactly so that repeated addition does not drift.
    let mut edges: Vec<f64> = (0..n).map(|i| lo + step * i as f64).collect();
    edges.push(hi);
    Ok(edges)
}

/// Bin midpoints.
pub fn centers(edges: &[f64]) -> Vec<f64> {
    edges.windows(2).map(|w| 0.5 * (w[0] + w[1])).collect()
}

/// Bin widths.
pub fn widths(edges: &[f64]) -> Vec<f64> {
    edges.windows(2).map(|w| w[1] - w[0]).collect()
}

/// Locate `x` among validated, strictly increasing `edges`.
pub fn locate(edges: &[f64], x: f64) -> BinLocation {
    if x.is_nan() {
        return BinLocation::Overflow;
    }
    let first = edges[0];
    let last = edges[edges.len() - 1];
    if x < first {
        return BinLocation::Underflow;
    }
    if x >= last {
        return BinLocation::Overflow;
    }
    // Number of edges <= x, minus one, is the bin index.
    let idx = edges.partition_point(|&e| e <= x) - 1;
    BinLocation::Bin(idx)
}

/// Exact edge comparison used by every bin-by-bin operation.
pub fn same_edges(a: &[f64], b: &[f64]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x == y)
}

pub(crate) fn ensure_same_edges(a: &[f64], b: &[f64], what: &str) -> Result<()> {
    if same_edges(a, b) {
        Ok(())
    } else {
        Err(Error::EdgeMismatch(format!(
            "{what}: lhs has {} edges [{}, {}], rhs has {} edges [{}, {}]",
            a.len(),
            a.first().copied().unwrap_or(f64::NAN),
            a.last().copied().unwrap_or(f64::NAN),
            b.len(),
            b.first().copied().unwrap_or(f64::NAN),
            b.last().copied().unwrap_or(f64::NAN),
        )))
    }
}

/// Count-weighted mean and population standard deviation over `positions`.
///
/// Returns `(0.0, 0.0)` when the total weight is not positive.
pub(crate) fn weighted_moments(positions: &[f64], weights: &[f64]) -> (f64, f64) {
    let total: f64 = weights.iter().sum();
    if total.is_nan() || total <= 0.0 {
        return (0.0, 0.0);
    }
    let mean = positions.iter().zip(weights).map(|(x, w)| x * w).sum::<f64>() / total;
    let var = positions.iter().zip(weights).map(|(x, w)| w * (x - mean) * (x - mean)).sum::<f64>()
        / total;
    (mean, var.max(0.0).sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_bad_edges() {
        assert!(validate_edges(&[1.0]).is_err());
        assert!(validate_edges(&[0.0, 0.0]).is_err());
        assert!(validate_edges(&[0.0, 2.0, 1.0]).is_err());
        assert!(validate_edges(&[0.0, f64::INFINITY]).is_err());
        assert!(validate_edges(&[0.0, 1.0, 2.5]).is_ok());
    }

    #[test]
    fn uniform_edges_end_exactly() {
        let e = uniform_edges(3, 0.0, 0.3).unwrap();
        assert_eq!(e.len(), 4);
        assert_eq!(e[3], 0.3);
        assert!(uniform_edges(0, 0.0, 1.0).is_err());
        assert!(uniform_edges(2, 1.0, 1.0).is_err());
    }

    #[test]
    fn locate_boundaries() {
        let e = [0.0, 1.0, 2.0, 3.0];
        assert_eq!(locate(&e, -0.1), BinLocation::Underflow);
        assert_eq!(locate(&e, 0.0), BinLocation::Bin(0));
        assert_eq!(locate(&e, 1.0), BinLocation::Bin(1));
        assert_eq!(locate(&e, 2.999), BinLocation::Bin(2));
        assert_eq!(locate(&e, 3.0), BinLocation::Overflow);
        assert_eq!(locate(&e, f64::NAN), BinLocation::Overflow);
    }

    #[test]
    fn centers_and_widths() {
        let e = [0.0, 1.0, 3.0];
        assert_eq!(centers(&e), vec![0.5, 2.0]);
        assert_eq!(widths(&e), vec![1.0, 2.0]);
    }

    #[test]
    fn moments_of_empty_are_zero() {
        assert_eq!(weighted_moments(&[0.5, 1.5], &[0.0, 0.0]), (0.0, 0.0));
    }
}
