use fh_viz::Color;
use fh_viz::color::viridis;
use fh_viz::plot::Heatmap;

use crate::RenderError;
use crate::canvas::Canvas;
use crate::config::VizConfig;
use crate::layout::axes::{Axis, DataRange, format_tick};
use crate::layout::margins::PlotArea;
use crate::primitives::*;

/// Horizontal space reserved right of the plot area for the colorbar.
pub const COLORBAR_SPACE: f64 = 55.0;

const COLORBAR_GAP: f64 = 10.0;
const COLORBAR_WIDTH: f64 = 12.0;
const COLORBAR_STEPS: usize = 64;

/// Bin edges around `centers`: midpoints between neighbours, ends mirrored.
///
/// A single center gets a unit-width bin.
pub fn centers_to_edges(centers: &[f64]) -> Vec<f64> {
    match centers {
        [] => Vec::new(),
        [c] => vec![c - 0.5, c + 0.5],
        _ => {
            let n = centers.len();
            let mut edges = Vec::with_capacity(n + 1);
            edges.push(centers[0] - (centers[1] - centers[0]) / 2.0);
            for w in centers.windows(2) {
                edges.push((w[0] + w[1]) / 2.0);
            }
            edges.push(centers[n - 1] + (centers[n - 1] - centers[n - 2]) / 2.0);
            edges
        }
    }
}

/// `z` must hold one row of `y.len()` values per x center.
pub fn check_shape(hm: &Heatmap) -> crate::Result<()> {
    if hm.z.len() != hm.x.len() {
        return Err(RenderError::Layout(format!(
            "heatmap has {} x centers but {} z rows",
            hm.x.len(),
            hm.z.len()
        )));
    }
    if let Some((ix, row)) = hm.z.iter().enumerate().find(|(_, row)| row.len() != hm.y.len()) {
        return Err(RenderError::Layout(format!(
            "heatmap z row {ix} has {} values, expected {}",
            row.len(),
            hm.y.len()
        )));
    }
    Ok(())
}

/// Finite z values of `hm`.
pub fn z_range(hm: &Heatmap) -> DataRange {
    let mut r = DataRange::default();
    r.extend(hm.z.iter().flatten().copied());
    r
}

fn color_for(z: f64, range: &DataRange) -> Color {
    let span = range.max - range.min;
    let t = if span > 0.0 { (z - range.min) / span } else { 0.5 };
    viridis(t)
}

/// Fill one rectangle per finite cell; NaN cells stay blank.
pub fn draw_heatmap(
    canvas: &mut Canvas,
    area: &PlotArea,
    hm: &Heatmap,
    x_axis: &Axis,
    y_axis: &Axis,
    range: &DataRange,
) {
    let xe = centers_to_edges(&hm.x);
    let ye = centers_to_edges(&hm.y);
    for (ix, row) in hm.z.iter().enumerate() {
        let px0 = x_axis.data_to_pixel(xe[ix], area.left, area.right());
        let px1 = x_axis.data_to_pixel(xe[ix + 1], area.left, area.right());
        for (iy, &z) in row.iter().enumerate() {
            if !z.is_finite() {
                continue;
            }
            let py0 = y_axis.data_to_pixel(ye[iy], area.bottom(), area.top);
            let py1 = y_axis.data_to_pixel(ye[iy + 1], area.bottom(), area.top);
            // Overlap by a hair to avoid seams between cells.
            let style = Style {
                fill: Some(color_for(z, range)),
                stroke: None,
                stroke_width: 0.0,
                opacity: 1.0,
            };
            canvas.rect(px0, py1, px1 - px0 + 0.3, py0 - py1 + 0.3, &style);
        }
    }
}

/// Vertical viridis bar with min/max labels right of `area`.
pub fn draw_colorbar(canvas: &mut Canvas, area: &PlotArea, range: &DataRange, config: &VizConfig) {
    if range.is_empty() {
        return;
    }
    let x = area.right() + COLORBAR_GAP;
    let step_h = area.height / COLORBAR_STEPS as f64;
    for i in 0..COLORBAR_STEPS {
        let t = (i as f64 + 0.5) / COLORBAR_STEPS as f64;
        let y = area.bottom() - (i + 1) as f64 * step_h;
        canvas.rect(x, y, COLORBAR_WIDTH, step_h + 0.5, &Style::filled(viridis(t)));
    }
    canvas.rect(x, area.top, COLORBAR_WIDTH, area.height, &Style::stroked(Color::BLACK, 0.6));

    let label_style = TextStyle {
        size: config.font.tick_size,
        baseline: TextBaseline::Central,
        ..Default::default()
    };
    let span = range.max - range.min;
    let step = if span > 0.0 { span / 10.0 } else { range.max.abs().max(1.0) };
    let lx = x + COLORBAR_WIDTH + 3.0;
    canvas.text(lx, area.top, &format_tick(range.max, step), &label_style);
    canvas.text(lx, area.bottom(), &format_tick(range.min, step), &label_style);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edges_from_uniform_centers() {
        assert_eq!(centers_to_edges(&[0.5, 1.5, 2.5]), vec![0.0, 1.0, 2.0, 3.0]);
        assert_eq!(centers_to_edges(&[2.0]), vec![1.5, 2.5]);
        assert!(centers_to_edges(&[]).is_empty());
    }

    #[test]
    fn shape_mismatch_is_a_layout_error() {
        let hm = Heatmap { x: vec![0.5, 1.5], y: vec![0.5], z: vec![vec![1.0]] };
        assert!(matches!(check_shape(&hm), Err(RenderError::Layout(_))));
        let hm = Heatmap { x: vec![0.5], y: vec![0.5, 1.5], z: vec![vec![1.0]] };
        assert!(check_shape(&hm).is_err());
    }

    #[test]
    fn nan_cells_are_skipped() {
        let hm = Heatmap {
            x: vec![0.5, 1.5],
            y: vec![0.5],
            z: vec![vec![f64::NAN], vec![2.0]],
        };
        let range = z_range(&hm);
        assert_eq!((range.min, range.max), (2.0, 2.0));

        let mut canvas = Canvas::new(100.0, 100.0);
        let area = PlotArea::new(0.0, 0.0, 100.0, 100.0);
        let x = Axis::fixed(0.0, 2.0, 3);
        let y = Axis::fixed(0.0, 1.0, 3);
        draw_heatmap(&mut canvas, &area, &hm, &x, &y, &range);
        let svg = canvas.finish_svg();
        // Background plus one cell.
        assert_eq!(svg.matches("<rect").count(), 2);
    }
}
