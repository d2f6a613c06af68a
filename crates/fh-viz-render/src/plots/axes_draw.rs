use fh_viz::Color;

use crate::canvas::Canvas;
use crate::config::VizConfig;
use crate::layout::axes::Axis;
use crate::layout::margins::PlotArea;
use crate::primitives::*;

/// Draw the box frame with ticks, grid lines, tick labels and axis labels.
pub fn draw_axes(
    canvas: &mut Canvas,
    area: &PlotArea,
    x_axis: &Axis,
    y_axis: &Axis,
    config: &VizConfig,
) {
    let frame_color = Color::BLACK;
    let tick_line = LineStyle::solid(frame_color, 0.6);
    let minor_line = LineStyle::solid(frame_color, 0.4);
    let grid_line = LineStyle {
        color: config.grid.color.with_alpha(config.grid.alpha),
        width: 0.5,
        dash: Some("3 3".into()),
    };

    let inward = config.axes.tick_direction == "in";
    let tl = config.axes.tick_length;
    let mtl = config.axes.minor_tick_length;
    // Signed tick extent: positive points into the plot area.
    let (major, minor) = if inward { (tl, mtl) } else { (-tl, -mtl) };

    let in_x = |px: f64| px >= area.left - 0.5 && px <= area.right() + 0.5;
    let in_y = |py: f64| py >= area.top - 0.5 && py <= area.bottom() + 0.5;

    let x_label_style = TextStyle {
        size: config.font.tick_size,
        color: frame_color,
        anchor: TextAnchor::Middle,
        baseline: TextBaseline::Hanging,
        ..Default::default()
    };
    for (i, &val) in x_axis.tick_positions.iter().enumerate() {
        let px = x_axis.data_to_pixel(val, area.left, area.right());
        if !in_x(px) {
            continue;
        }
        if config.grid.show {
            canvas.line(px, area.top, px, area.bottom(), &grid_line);
        }
        canvas.line(px, area.bottom(), px, area.bottom() - major, &tick_line);
        if config.axes.show_top_ticks {
            canvas.line(px, area.top, px, area.top + major, &tick_line);
        }
        if let Some(label) = x_axis.tick_labels.get(i) {
            let label_y = area.bottom() + 3.0 + (-major).max(0.0);
            canvas.text(px, label_y, label, &x_label_style);
        }
    }
    for &val in &x_axis.minor_ticks {
        let px = x_axis.data_to_pixel(val, area.left, area.right());
        if in_x(px) {
            canvas.line(px, area.bottom(), px, area.bottom() - minor, &minor_line);
        }
    }

    let y_label_style = TextStyle {
        size: config.font.tick_size,
        color: frame_color,
        anchor: TextAnchor::End,
        baseline: TextBaseline::Central,
        ..Default::default()
    };
    let label_x = area.left - 4.0 - (-major).max(0.0);
    for (i, &val) in y_axis.tick_positions.iter().enumerate() {
        let py = y_axis.data_to_pixel(val, area.bottom(), area.top);
        if !in_y(py) {
            continue;
        }
        if config.grid.show {
            canvas.line(area.left, py, area.right(), py, &grid_line);
        }
        canvas.line(area.left, py, area.left + major, py, &tick_line);
        if config.axes.show_right_ticks {
            canvas.line(area.right(), py, area.right() - major, py, &tick_line);
        }
        if let Some(label) = y_axis.tick_labels.get(i) {
            canvas.text(label_x, py, label, &y_label_style);
        }
    }
    for &val in &y_axis.minor_ticks {
        let py = y_axis.data_to_pixel(val, area.bottom(), area.top);
        if in_y(py) {
            canvas.line(area.left, py, area.left + minor, py, &minor_line);
        }
    }

    draw_frame(canvas, area);

    let label_style = TextStyle {
        size: config.font.label_size,
        color: frame_color,
        anchor: TextAnchor::Middle,
        ..Default::default()
    };
    if !x_axis.label.is_empty() {
        let y = area.bottom() + (-major).max(0.0) + config.font.tick_size + 16.0;
        canvas.text(area.left + area.width / 2.0, y, &x_axis.label, &label_style);
    }
    if !y_axis.label.is_empty() {
        let tick_w = y_axis
            .tick_labels
            .iter()
            .map(|l| canvas.measure_text(l, &y_label_style).width)
            .fold(0.0_f64, f64::max);
        let x = label_x - tick_w - 6.0 - config.font.label_size / 2.0;
        canvas.text_rotated(x, area.top + area.height / 2.0, &y_axis.label, &label_style, -90.0);
    }
}

/// Plain box frame.
pub fn draw_frame(canvas: &mut Canvas, area: &PlotArea) {
    let style = LineStyle::solid(Color::BLACK, 0.8);
    canvas.line(area.left, area.top, area.right(), area.top, &style);
    canvas.line(area.left, area.bottom(), area.right(), area.bottom(), &style);
    canvas.line(area.left, area.top, area.left, area.bottom(), &style);
    canvas.line(area.right(), area.top, area.right(), area.bottom(), &style);
}
