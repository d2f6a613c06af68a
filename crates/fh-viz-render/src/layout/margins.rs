use crate::canvas::Canvas;
use crate::config::VizConfig;
use crate::layout::axes::Axis;
use crate::primitives::TextStyle;

/// Rectangular area within the canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotArea {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl PlotArea {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self { left, top, width, height }
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Map panel-relative coordinates (`(0, 0)` bottom-left, y up) to canvas points.
    pub fn relative(&self, rx: f64, ry: f64) -> (f64, f64) {
        (self.left + rx * self.width, self.bottom() - ry * self.height)
    }

    /// Plot area inside `cell`, leaving room for tick labels, axis labels,
    /// an optional title and `extra_right` points on the right (colorbar).
    pub fn auto_in_cell(
        canvas: &Canvas,
        cell: &PlotArea,
        y_axis: &Axis,
        x_axis: &Axis,
        has_title: bool,
        extra_right: f64,
        config: &VizConfig,
    ) -> Self {
        let tick_style = TextStyle { size: config.font.tick_size, ..Default::default() };

        // Left margin: y-axis tick labels + axis label + padding
        let max_tick_w = y_axis
            .tick_labels
            .iter()
            .map(|l| canvas.measure_text(l, &tick_style).width)
            .fold(0.0_f64, f64::max);
        let mut left = 12.0 + max_tick_w + 8.0;
        if !y_axis.label.is_empty() {
            left += config.font.label_size + 8.0;
        }

        // Bottom margin: x-axis tick labels + axis label + padding
        let mut bottom = 10.0 + config.font.tick_size + 6.0;
        if !x_axis.label.is_empty() {
            bottom += config.font.label_size + 8.0;
        }
        if config.axes.tick_direction != "in" {
            bottom += config.axes.tick_length;
            left += config.axes.tick_length;
        }

        let top = if has_title { config.font.title_size + 14.0 } else { 12.0 };
        let right = 15.0 + extra_right;

        let width = cell.width - left - right;
        let height = cell.height - top - bottom;

        Self {
            left: cell.left + left,
            top: cell.top + top,
            width: width.max(50.0),
            height: height.max(50.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_is_y_up() {
        let a = PlotArea::new(10.0, 20.0, 100.0, 50.0);
        assert_eq!(a.relative(0.0, 0.0), (10.0, 70.0));
        assert_eq!(a.relative(1.0, 1.0), (110.0, 20.0));
    }

    #[test]
    fn auto_margins_stay_inside_cell() {
        let canvas = Canvas::new(400.0, 300.0);
        let config = VizConfig::default();
        let cell = PlotArea::new(0.0, 0.0, 400.0, 300.0);
        let y = Axis::auto_linear(0.0, 1000.0, 5).with_label("Events");
        let x = Axis::auto_linear(0.0, 1.0, 5).with_label("x");
        let area = PlotArea::auto_in_cell(&canvas, &cell, &y, &x, true, 0.0, &config);
        assert!(area.left > cell.left && area.right() < cell.right());
        assert!(area.top > cell.top && area.bottom() < cell.bottom());
    }
}
