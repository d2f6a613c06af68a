use fh_viz::{Figure, GridPos};

use crate::layout::margins::PlotArea;

/// Relative size of a row or column that only holds legend boxes.
const LEGEND_ONLY_WEIGHT: f64 = 0.45;

/// Figure grid: one cell per `(row, col)`, sized by weight.
///
/// Rows and columns containing at least one panel get weight 1, those with
/// only legend boxes get a narrower share.
#[derive(Debug, Clone)]
pub struct GridLayout {
    row_offsets: Vec<f64>,
    col_offsets: Vec<f64>,
}

impl GridLayout {
    pub fn new(figure: &Figure, width: f64, height: f64) -> Self {
        let (rows, cols) = figure.grid_shape();
        let mut row_w = vec![LEGEND_ONLY_WEIGHT; rows];
        let mut col_w = vec![LEGEND_ONLY_WEIGHT; cols];
        for (pos, _) in figure.panels() {
            row_w[pos.row] = 1.0;
            col_w[pos.col] = 1.0;
        }
        Self { row_offsets: offsets(&row_w, height), col_offsets: offsets(&col_w, width) }
    }

    /// `(rows, cols)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.row_offsets.len().saturating_sub(1), self.col_offsets.len().saturating_sub(1))
    }

    /// Area of the cell at `pos`, or `None` outside the grid.
    pub fn cell(&self, pos: GridPos) -> Option<PlotArea> {
        let top = *self.row_offsets.get(pos.row)?;
        let bottom = *self.row_offsets.get(pos.row + 1)?;
        let left = *self.col_offsets.get(pos.col)?;
        let right = *self.col_offsets.get(pos.col + 1)?;
        Some(PlotArea::new(left, top, right - left, bottom - top))
    }
}

fn offsets(weights: &[f64], total: f64) -> Vec<f64> {
    let sum: f64 = weights.iter().sum();
    let mut acc = 0.0;
    let mut out = Vec::with_capacity(weights.len() + 1);
    out.push(0.0);
    for w in weights {
        acc += w / sum * total;
        out.push(acc);
    }
    out
}
