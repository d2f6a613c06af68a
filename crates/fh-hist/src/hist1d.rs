use std::ops::{Add, Div};

use serde::{Deserialize, Serialize};

use crate::binning::{self, BinLocation, FlowPolicy};
use crate::error::{Error, Result};

/// A weighted 1D histogram.
///
/// Bin `i` covers `[edges[i], edges[i + 1])`. Counts are sums of weights,
/// `sumw2` are sums of squared weights, and errors are `sqrt(sumw2)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Hist1DRepr", into = "Hist1DRepr")]
pub struct Hist1D {
    bin_edges: Vec<f64>,
    bin_counts: Vec<f64>,
    sumw2: Vec<f64>,
    entries: u64,
    underflow: f64,
    overflow: f64,
    flow_policy: FlowPolicy,
}

/// Serialized form. `sumw2` defaults to the counts (Poisson errors).
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Hist1DRepr {
    bin_edges: Vec<f64>,
    bin_counts: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    sumw2: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    entries: Option<u64>,
    #[serde(default)]
    underflow: f64,
    #[serde(default)]
    overflow: f64,
    #[serde(default)]
    flow_policy: FlowPolicy,
}

impl TryFrom<Hist1DRepr> for Hist1D {
    type Error = Error;

    fn try_from(r: Hist1DRepr) -> Result<Self> {
        let mut h = Hist1D::from_counts(r.bin_edges, r.bin_counts, r.sumw2)?;
        if let Some(n) = r.entries {
            h.entries = n;
        }
        h.underflow = r.underflow;
        h.overflow = r.overflow;
        h.flow_policy = r.flow_policy;
        Ok(h)
    }
}

impl From<Hist1D> for Hist1DRepr {
    fn from(h: Hist1D) -> Self {
        Hist1DRepr {
            bin_edges: h.bin_edges,
            bin_counts: h.bin_counts,
            sumw2: Some(h.sumw2),
            entries: Some(h.entries),
            underflow: h.underflow,
            overflow: h.overflow,
            flow_policy: h.flow_policy,
        }
    }
}

impl Hist1D {
    /// Empty histogram over the given edges.
    pub fn new(bin_edges: Vec<f64>) -> Result<Self> {
        binning::validate_edges(&bin_edges)?;
        let n = bin_edges.len() - 1;
        Ok(Self {
            bin_edges,
            bin_counts: vec![0.0; n],
            sumw2: vec![0.0; n],
            entries: 0,
            underflow: 0.0,
            overflow: 0.0,
            flow_policy: FlowPolicy::Drop,
        })
    }

    /// Empty histogram with `n` equal-width bins over `[lo, hi)`.
    pub fn uniform(n: usize, lo: f64, hi: f64) -> Result<Self> {
        Self::new(binning::uniform_edges(n, lo, hi)?)
    }

    /// Histogram from precomputed counts.
    ///
    /// When `sumw2` is `None` the counts are used (unit-weight Poisson errors).
    /// The entry count is the rounded total of the counts; override it with
    /// [`Hist1D::with_entries`] when the true number of fills is known.
    pub fn from_counts(
        bin_edges: Vec<f64>,
        bin_counts: Vec<f64>,
        sumw2: Option<Vec<f64>>,
    ) -> Result<Self> {
        binning::validate_edges(&bin_edges)?;
        let n = bin_edges.len() - 1;
        if bin_counts.len() != n {
            return Err(Error::Validation(format!(
                "counts length mismatch: got={} expected={}",
                bin_counts.len(),
                n
            )));
        }
        let sumw2 = match sumw2 {
            Some(s) if s.len() != n => {
                return Err(Error::Validation(format!(
                    "sumw2 length mismatch: got={} expected={}",
                    s.len(),
                    n
                )));
            }
            Some(s) => s,
            None => bin_counts.iter().map(|c| c.abs()).collect(),
        };
        let total: f64 = bin_counts.iter().sum();
        let entries = if total.is_finite() && total > 0.0 { total.round() as u64 } else { 0 };
        Ok(Self {
            bin_edges,
            bin_counts,
            sumw2,
            entries,
            underflow: 0.0,
            overflow: 0.0,
            flow_policy: FlowPolicy::Drop,
        })
    }

    /// Override the entry count.
    pub fn with_entries(mut self, entries: u64) -> Self {
        self.entries = entries;
        self
    }

    /// Set the under/overflow policy for subsequent fills.
    pub fn with_flow_policy(mut self, policy: FlowPolicy) -> Self {
        self.flow_policy = policy;
        self
    }

    /// Fill with unit weight.
    pub fn push(&mut self, x: f64) {
        self.push_weighted(x, 1.0);
    }

    /// Fill with weight `w`.
    pub fn push_weighted(&mut self, x: f64, w: f64) {
        self.entries += 1;
        let w2 = w * w;
        let last = self.bin_counts.len() - 1;
        match binning::locate(&self.bin_edges, x) {
            BinLocation::Bin(i) => {
                self.bin_counts[i] += w;
                self.sumw2[i] += w2;
            }
            BinLocation::Underflow => {
                self.underflow += w;
                if self.flow_policy == FlowPolicy::Fold {
                    self.bin_counts[0] += w;
                    self.sumw2[0] += w2;
                }
            }
            BinLocation::Overflow => {
                self.overflow += w;
                if self.flow_policy == FlowPolicy::Fold {
                    self.bin_counts[last] += w;
                    self.sumw2[last] += w2;
                }
            }
        }
    }

    /// Fill from a slice of unit-weight values.
    pub fn extend_from_slice(&mut self, xs: &[f64]) {
        for &x in xs {
            self.push(x);
        }
    }

    /// Number of in-range bins.
    pub fn n_bins(&self) -> usize {
        self.bin_counts.len()
    }

    /// Bin edges (`n_bins + 1` values).
    pub fn bin_edges(&self) -> &[f64] {
        &self.bin_edges
    }

    /// Bin midpoints.
    pub fn bin_centers(&self) -> Vec<f64> {
        binning::centers(&self.bin_edges)
    }

    /// Bin widths.
    pub fn bin_widths(&self) -> Vec<f64> {
        binning::widths(&self.bin_edges)
    }

    /// Sum of weights per bin.
    pub fn bin_counts(&self) -> &[f64] {
        &self.bin_counts
    }

    /// Sum of squared weights per bin.
    pub fn sumw2(&self) -> &[f64] {
        &self.sumw2
    }

    /// Per-bin statistical error, `sqrt(sumw2)`.
    pub fn bin_errors(&self) -> Vec<f64> {
        self.sumw2.iter().map(|s| s.max(0.0).sqrt()).collect()
    }

    /// Number of fills, including out-of-range ones.
    pub fn entries(&self) -> u64 {
        self.entries
    }

    /// Sum of weights below the first edge.
    pub fn underflow(&self) -> f64 {
        self.underflow
    }

    /// Sum of weights at or above the last edge.
    pub fn overflow(&self) -> f64 {
        self.overflow
    }

    /// Under/overflow policy used by fills.
    pub fn flow_policy(&self) -> FlowPolicy {
        self.flow_policy
    }

    /// Sum of in-range counts.
    pub fn integral(&self) -> f64 {
        self.bin_counts.iter().sum()
    }

    /// Count-weighted mean of the bin centers.
    pub fn mean(&self) -> f64 {
        binning::weighted_moments(&self.bin_centers(), &self.bin_counts).0
    }

    /// Count-weighted standard deviation of the bin centers.
    pub fn std(&self) -> f64 {
        binning::weighted_moments(&self.bin_centers(), &self.bin_counts).1
    }

    /// Bin-by-bin quotient with uncorrelated error propagation.
    ///
    /// `σ² = (σ₁/c₂)² + (c₁·σ₂/c₂²)²`. Zero denominators follow IEEE rules
    /// (the affected bins become `inf` or `NaN`). The quotient keeps the
    /// numerator's entry count and carries no flows.
    pub fn try_div(&self, other: &Hist1D) -> Result<Hist1D> {
        binning::ensure_same_edges(&self.bin_edges, &other.bin_edges, "division")?;
        let n = self.n_bins();
        let mut counts = Vec::with_capacity(n);
        let mut sumw2 = Vec::with_capacity(n);
        for i in 0..n {
            let c1 = self.bin_counts[i];
            let c2 = other.bin_counts[i];
            let r1 = self.sumw2[i] / (c2 * c2);
            let r2 = c1 * c1 * other.sumw2[i] / (c2 * c2 * c2 * c2);
            counts.push(c1 / c2);
            sumw2.push(r1 + r2);
        }
        log::trace!("divided histograms over {n} bins");
        Ok(Hist1D {
            bin_edges: self.bin_edges.clone(),
            bin_counts: counts,
            sumw2,
            entries: self.entries,
            underflow: 0.0,
            overflow: 0.0,
            flow_policy: self.flow_policy,
        })
    }

    /// Bin-by-bin sum; flows and entries add up.
    pub fn try_add(&self, other: &Hist1D) -> Result<Hist1D> {
        binning::ensure_same_edges(&self.bin_edges, &other.bin_edges, "addition")?;
        Ok(Hist1D {
            bin_edges: self.bin_edges.clone(),
            bin_counts: self.bin_counts.iter().zip(&other.bin_counts).map(|(a, b)| a + b).collect(),
            sumw2: self.sumw2.iter().zip(&other.sumw2).map(|(a, b)| a + b).collect(),
            entries: self.entries + other.entries,
            underflow: self.underflow + other.underflow,
            overflow: self.overflow + other.overflow,
            flow_policy: self.flow_policy,
        })
    }
}

/// `&h1 / &h2`: fails with [`Error::EdgeMismatch`] when the binnings differ.
impl Div for &Hist1D {
    type Output = Result<Hist1D>;

    fn div(self, rhs: &Hist1D) -> Result<Hist1D> {
        self.try_div(rhs)
    }
}

impl Add for &Hist1D {
    type Output = Result<Hist1D>;

    fn add(self, rhs: &Hist1D) -> Result<Hist1D> {
        self.try_add(rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn h(counts: &[f64]) -> Hist1D {
        let edges: Vec<f64> = (0..=counts.len()).map(|i| i as f64).collect();
        Hist1D::from_counts(edges, counts.to_vec(), None).unwrap()
    }

    #[test]
    fn fill_routes_flows() {
        let mut hist = Hist1D::uniform(3, 0.0, 3.0).unwrap();
        hist.extend_from_slice(&[-1.0, 0.0, 0.5, 1.2, 2.9, 3.0, 7.0]);
        assert_eq!(hist.bin_counts(), &[2.0, 1.0, 1.0]);
        assert_eq!(hist.underflow(), 1.0);
        assert_eq!(hist.overflow(), 2.0);
        assert_eq!(hist.entries(), 7);
    }

    #[test]
    fn fold_policy_moves_flows_into_edge_bins() {
        let mut hist = Hist1D::uniform(2, 0.0, 2.0).unwrap().with_flow_policy(FlowPolicy::Fold);
        hist.extend_from_slice(&[-5.0, 0.5, 9.0]);
        assert_eq!(hist.bin_counts(), &[2.0, 1.0]);
        assert_eq!(hist.overflow(), 1.0);
        assert_eq!(hist.underflow(), 1.0);
    }

    #[test]
    fn weighted_errors() {
        let mut hist = Hist1D::uniform(1, 0.0, 1.0).unwrap();
        hist.push_weighted(0.5, 2.0);
        hist.push_weighted(0.5, 1.0);
        assert_abs_diff_eq!(hist.bin_counts()[0], 3.0);
        assert_abs_diff_eq!(hist.bin_errors()[0], 5.0_f64.sqrt());
    }

    #[test]
    fn mean_and_std() {
        let hist = h(&[1.0, 0.0, 1.0]);
        assert_abs_diff_eq!(hist.mean(), 1.5);
        assert_abs_diff_eq!(hist.std(), 1.0);
        assert_eq!(h(&[0.0, 0.0]).mean(), 0.0);
    }

    #[test]
    fn from_counts_checks_lengths() {
        assert!(Hist1D::from_counts(vec![0.0, 1.0], vec![1.0, 2.0], None).is_err());
        assert!(Hist1D::from_counts(vec![0.0, 1.0], vec![1.0], Some(vec![])).is_err());
    }

    #[test]
    fn division_propagates_errors() {
        let num = h(&[4.0, 9.0]);
        let den = h(&[2.0, 3.0]);
        let r = (&num / &den).unwrap();
        assert_eq!(r.bin_counts(), &[2.0, 3.0]);
        assert_abs_diff_eq!(r.sumw2()[0], 4.0 / 4.0 + 16.0 * 2.0 / 16.0, epsilon = 1e-12);
        assert_abs_diff_eq!(r.sumw2()[1], 9.0 / 9.0 + 81.0 * 3.0 / 81.0, epsilon = 1e-12);
    }

    #[test]
    fn division_by_zero_bin_is_ieee() {
        let r = h(&[1.0, 0.0]).try_div(&h(&[0.0, 0.0])).unwrap();
        assert!(r.bin_counts()[0].is_infinite());
        assert!(r.bin_counts()[1].is_nan());
    }

    #[test]
    fn division_rejects_other_binning() {
        let a = h(&[1.0, 2.0]);
        let b = Hist1D::from_counts(vec![0.0, 1.0, 3.0], vec![1.0, 1.0], None).unwrap();
        assert!(matches!(&a / &b, Err(Error::EdgeMismatch(_))));
    }

    #[test]
    fn addition_sums_everything() {
        let s = (&h(&[1.0, 2.0]) + &h(&[3.0, 4.0])).unwrap();
        assert_eq!(s.bin_counts(), &[4.0, 6.0]);
        assert_eq!(s.sumw2(), &[4.0, 6.0]);
        assert_eq!(s.entries(), 10);
    }

    #[test]
    fn json_roundtrip_validates() {
        let hist: Hist1D =
            serde_json::from_str(r#"{"bin_edges":[0,1,2],"bin_counts":[3,4]}"#).unwrap();
        assert_eq!(hist.sumw2(), &[3.0, 4.0]);
        assert_eq!(hist.entries(), 7);
        let bad = serde_json::from_str::<Hist1D>(r#"{"bin_edges":[0,1],"bin_counts":[3,4]}"#);
        assert!(bad.is_err());
    }
}
