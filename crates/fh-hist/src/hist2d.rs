use serde::{Deserialize, Serialize};

use crate::binning::{self, BinLocation};
use crate::error::{Error, Result};
use crate::hist1d::Hist1D;

/// A weighted 2D histogram.
///
/// `counts[ix][iy]` is the sum of weights in x-bin `ix` and y-bin `iy`.
/// Anything outside either axis range is accumulated in a single overflow
/// counter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Hist2DRepr", into = "Hist2DRepr")]
pub struct Hist2D {
    x_edges: Vec<f64>,
    y_edges: Vec<f64>,
    counts: Vec<Vec<f64>>,
    sumw2: Vec<Vec<f64>>,
    entries: u64,
    overflow: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Hist2DRepr {
    x_edges: Vec<f64>,
    y_edges: Vec<f64>,
    counts: Vec<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    sumw2: Option<Vec<Vec<f64>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    entries: Option<u64>,
    #[serde(default)]
    overflow: f64,
}

impl TryFrom<Hist2DRepr> for Hist2D {
    type Error = Error;

    fn try_from(r: Hist2DRepr) -> Result<Self> {
        let mut h = Hist2D::from_counts(r.x_edges, r.y_edges, r.counts, r.sumw2)?;
        if let Some(n) = r.entries {
            h.entries = n;
        }
        h.overflow = r.overflow;
        Ok(h)
    }
}

impl From<Hist2D> for Hist2DRepr {
    fn from(h: Hist2D) -> Self {
        Hist2DRepr {
            x_edges: h.x_edges,
            y_edges: h.y_edges,
            counts: h.counts,
            sumw2: Some(h.sumw2),
            entries: Some(h.entries),
            overflow: h.overflow,
        }
    }
}

fn check_grid(grid: &[Vec<f64>], nx: usize, ny: usize, what: &str) -> Result<()> {
    if grid.len() != nx {
        return Err(Error::Validation(format!(
            "{what} row count mismatch: got={} expected={nx}",
            grid.len()
        )));
    }
    if let Some(ix) = grid.iter().position(|row| row.len() != ny) {
        return Err(Error::Validation(format!(
            "{what} row {ix} length mismatch: got={} expected={ny}",
            grid[ix].len()
        )));
    }
    Ok(())
}

impl Hist2D {
    /// Empty histogram over the given x and y edges.
    pub fn new(x_edges: Vec<f64>, y_edges: Vec<f64>) -> Result<Self> {
        binning::validate_edges(&x_edges)?;
        binning::validate_edges(&y_edges)?;
        let nx = x_edges.len() - 1;
        let ny = y_edges.len() - 1;
        Ok(Self {
            x_edges,
            y_edges,
            counts: vec![vec![0.0; ny]; nx],
            sumw2: vec![vec![0.0; ny]; nx],
            entries: 0,
            overflow: 0.0,
        })
    }

    /// Histogram from a precomputed `nx × ny` count grid.
    pub fn from_counts(
        x_edges: Vec<f64>,
        y_edges: Vec<f64>,
        counts: Vec<Vec<f64>>,
        sumw2: Option<Vec<Vec<f64>>>,
    ) -> Result<Self> {
        binning::validate_edges(&x_edges)?;
        binning::validate_edges(&y_edges)?;
        let nx = x_edges.len() - 1;
        let ny = y_edges.len() - 1;
        check_grid(&counts, nx, ny, "counts")?;
        let sumw2 = match sumw2 {
            Some(s) => {
                check_grid(&s, nx, ny, "sumw2")?;
                s
            }
            None => counts.iter().map(|row| row.iter().map(|c| c.abs()).collect()).collect(),
        };
        let total: f64 = counts.iter().flatten().sum();
        let entries = if total.is_finite() && total > 0.0 { total.round() as u64 } else { 0 };
        Ok(Self { x_edges, y_edges, counts, sumw2, entries, overflow: 0.0 })
    }

    /// Override the entry count.
    pub fn with_entries(mut self, entries: u64) -> Self {
        self.entries = entries;
        self
    }

    /// Fill with unit weight.
    pub fn push(&mut self, x: f64, y: f64) {
        self.push_weighted(x, y, 1.0);
    }

    /// Fill with weight `w`.
    pub fn push_weighted(&mut self, x: f64, y: f64, w: f64) {
        self.entries += 1;
        match (binning::locate(&self.x_edges, x), binning::locate(&self.y_edges, y)) {
            (BinLocation::Bin(ix), BinLocation::Bin(iy)) => {
                self.counts[ix][iy] += w;
                self.sumw2[ix][iy] += w * w;
            }
            _ => self.overflow += w,
        }
    }

    /// X-axis bin edges.
    pub fn x_edges(&self) -> &[f64] {
        &self.x_edges
    }

    /// Y-axis bin edges.
    pub fn y_edges(&self) -> &[f64] {
        &self.y_edges
    }

    /// Bin midpoints along x and y.
    pub fn bin_centers(&self) -> (Vec<f64>, Vec<f64>) {
        (binning::centers(&self.x_edges), binning::centers(&self.y_edges))
    }

    /// Count grid, indexed `[ix][iy]`.
    pub fn bin_counts(&self) -> &[Vec<f64>] {
        &self.counts
    }

    /// Sum of squared weights grid.
    pub fn sumw2(&self) -> &[Vec<f64>] {
        &self.sumw2
    }

    /// Per-cell `sqrt(sumw2)`.
    pub fn bin_errors(&self) -> Vec<Vec<f64>> {
        self.sumw2.iter().map(|row| row.iter().map(|s| s.max(0.0).sqrt()).collect()).collect()
    }

    /// Number of fills, including out-of-range ones.
    pub fn entries(&self) -> u64 {
        self.entries
    }

    /// Sum of weights outside either axis range.
    pub fn overflow(&self) -> f64 {
        self.overflow
    }

    /// Sum of in-range counts.
    pub fn integral(&self) -> f64 {
        self.counts.iter().flatten().sum()
    }

    /// Marginal distribution along x.
    pub fn project_x(&self) -> Result<Hist1D> {
        let counts = self.counts.iter().map(|row| row.iter().sum()).collect();
        let sumw2 = self.sumw2.iter().map(|row| row.iter().sum()).collect();
        Ok(Hist1D::from_counts(self.x_edges.clone(), counts, Some(sumw2))?
            .with_entries(self.entries))
    }

    /// Marginal distribution along y.
    pub fn project_y(&self) -> Result<Hist1D> {
        let ny = self.y_edges.len() - 1;
        let mut counts = vec![0.0; ny];
        let mut sumw2 = vec![0.0; ny];
        for (row, row_w2) in self.counts.iter().zip(&self.sumw2) {
            for (c, v) in counts.iter_mut().zip(row) {
                *c += v;
            }
            for (s, v) in sumw2.iter_mut().zip(row_w2) {
                *s += v;
            }
        }
        Ok(Hist1D::from_counts(self.y_edges.clone(), counts, Some(sumw2))?
            .with_entries(self.entries))
    }

    /// Per-axis count-weighted means `(x, y)`.
    pub fn mean(&self) -> (f64, f64) {
        let (mx, _) = self.marginal_moments_x();
        let (my, _) = self.marginal_moments_y();
        (mx, my)
    }

    /// Per-axis count-weighted standard deviations `(x, y)`.
    pub fn std(&self) -> (f64, f64) {
        let (_, sx) = self.marginal_moments_x();
        let (_, sy) = self.marginal_moments_y();
        (sx, sy)
    }

    fn marginal_moments_x(&self) -> (f64, f64) {
        let w: Vec<f64> = self.counts.iter().map(|row| row.iter().sum()).collect();
        binning::weighted_moments(&binning::centers(&self.x_edges), &w)
    }

    fn marginal_moments_y(&self) -> (f64, f64) {
        let ny = self.y_edges.len() - 1;
        let w: Vec<f64> =
            (0..ny).map(|iy| self.counts.iter().map(|row| row[iy]).sum()).collect();
        binning::weighted_moments(&binning::centers(&self.y_edges), &w)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn fill_and_overflow() {
        let mut h = Hist2D::new(vec![0.0, 1.0, 2.0], vec![0.0, 1.0]).unwrap();
        h.push(0.5, 0.5);
        h.push(1.5, 0.5);
        h.push_weighted(1.5, 0.2, 2.0);
        h.push(0.5, 3.0);
        h.push(-1.0, 0.5);
        assert_eq!(h.bin_counts(), &[vec![1.0], vec![3.0]]);
        assert_eq!(h.overflow(), 2.0);
        assert_eq!(h.entries(), 5);
        assert_abs_diff_eq!(h.bin_errors()[1][0], 5.0_f64.sqrt());
    }

    #[test]
    fn shape_is_checked() {
        let bad = Hist2D::from_counts(vec![0.0, 1.0], vec![0.0, 1.0, 2.0], vec![vec![1.0]], None);
        assert!(bad.is_err());
    }

    #[test]
    fn per_axis_moments() {
        let h = Hist2D::from_counts(
            vec![0.0, 1.0, 2.0],
            vec![0.0, 2.0, 4.0],
            vec![vec![1.0, 0.0], vec![0.0, 1.0]],
            None,
        )
        .unwrap();
        let (mx, my) = h.mean();
        assert_abs_diff_eq!(mx, 1.0);
        assert_abs_diff_eq!(my, 2.0);
        let (sx, sy) = h.std();
        assert_abs_diff_eq!(sx, 0.5);
        assert_abs_diff_eq!(sy, 1.0);
    }

    #[test]
    fn projections_sum_cells() {
        let h = Hist2D::from_counts(
            vec![0.0, 1.0, 2.0],
            vec![0.0, 1.0, 2.0, 3.0],
            vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]],
            None,
        )
        .unwrap();
        assert_eq!(h.project_x().unwrap().bin_counts(), &[6.0, 15.0]);
        assert_eq!(h.project_y().unwrap().bin_counts(), &[5.0, 7.0, 9.0]);
        assert_eq!(h.project_y().unwrap().entries(), 21);
    }
}
