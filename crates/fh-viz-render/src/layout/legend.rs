use fh_viz::Color;
use fh_viz::figure::{LegendBox, LegendEntry, Swatch};

use crate::canvas::Canvas;
use crate::layout::margins::PlotArea;
use crate::primitives::*;

/// Draw a series legend in the top-right corner of `area`, `offset` points down.
pub fn draw_legend(
    canvas: &mut Canvas,
    area: &PlotArea,
    entries: &[LegendEntry],
    font_size: f64,
    frame: bool,
    offset: f64,
) {
    if entries.is_empty() {
        return;
    }

    let row_height = font_size + 4.0;
    let swatch_w = 14.0;
    let swatch_h = font_size - 2.0;
    let gap = 6.0;
    let padding = 6.0;

    let text_style =
        TextStyle { size: font_size, baseline: TextBaseline::Central, ..Default::default() };

    let max_w = entries
        .iter()
        .map(|e| canvas.measure_text(&e.label, &text_style).width)
        .fold(0.0_f64, f64::max);

    let legend_w = padding + swatch_w + gap + max_w + padding;
    let legend_h = padding + entries.len() as f64 * row_height + padding;

    let lx = area.right() - legend_w - 5.0;
    let ly = area.top + 5.0 + offset;

    let bg_style = Style {
        fill: Some(Color::rgba(255, 255, 255, 0.9)),
        stroke: if frame { Some(Color::rgb(200, 200, 200)) } else { None },
        stroke_width: 0.5,
        opacity: 1.0,
    };
    canvas.rect(lx, ly, legend_w, legend_h, &bg_style);

    for (i, entry) in entries.iter().enumerate() {
        let ey = ly + padding + i as f64 * row_height + row_height / 2.0;
        let sx = lx + padding;

        match entry.swatch {
            Some(Swatch::Patch(color)) => {
                canvas.rect(sx, ey - swatch_h / 2.0, swatch_w, swatch_h, &Style::filled(color));
            }
            Some(Swatch::Line(color)) => {
                canvas.line(sx, ey, sx + swatch_w, ey, &LineStyle::solid(color, 1.5));
            }
            Some(Swatch::Marker(color)) => {
                let marker = MarkerStyle { color, size: 3.0, ..Default::default() };
                canvas.marker(sx + swatch_w / 2.0, ey, &marker);
            }
            None => {}
        }

        canvas.text(sx + swatch_w + gap, ey, &entry.label, &text_style);
    }
}

/// Draw a framed legend box (e.g. a statistics box) at the top of `cell`.
///
/// Rows show the label left-aligned and the value, if any, right-aligned.
pub fn draw_legend_box(canvas: &mut Canvas, cell: &PlotArea, legend: &LegendBox, font_size: f64) {
    let row_height = font_size + 5.0;
    let padding = 6.0;
    let has_swatch = legend.entries.iter().any(|e| e.swatch.is_some());
    let swatch_w = if has_swatch { 14.0 + 6.0 } else { 0.0 };

    let label_style =
        TextStyle { size: font_size, baseline: TextBaseline::Central, ..Default::default() };
    let title_style = TextStyle { weight: FontWeight::Bold, ..label_style.clone() };
    let value_style = TextStyle { anchor: TextAnchor::End, ..label_style.clone() };

    let content_w = legend
        .entries
        .iter()
        .map(|e| {
            let label = canvas.measure_text(&e.label, &label_style).width;
            let value = e
                .value
                .as_deref()
                .map_or(0.0, |v| canvas.measure_text(v, &label_style).width + 12.0);
            swatch_w + label + value
        })
        .chain(legend.title.iter().map(|t| canvas.measure_text(t, &title_style).width))
        .fold(0.0_f64, f64::max);

    let n_rows = legend.entries.len() + usize::from(legend.title.is_some());
    let box_w = (content_w + 2.0 * padding).min(cell.width - 10.0).max(0.0);
    let box_h = n_rows as f64 * row_height + 2.0 * padding;
    let bx = cell.left + 5.0;
    let by = cell.top + 12.0;

    let frame = Style {
        fill: Some(Color::WHITE),
        stroke: Some(Color::BLACK),
        stroke_width: 0.8,
        opacity: 1.0,
    };
    canvas.rect(bx, by, box_w, box_h, &frame);

    let mut row = 0usize;
    let row_y = |r: usize| by + padding + r as f64 * row_height + row_height / 2.0;
    if let Some(title) = &legend.title {
        canvas.text(bx + padding, row_y(row), title, &title_style);
        row += 1;
    }
    for entry in &legend.entries {
        let y = row_y(row);
        let sx = bx + padding;
        match entry.swatch {
            Some(Swatch::Patch(c)) => {
                let h = font_size - 2.0;
                canvas.rect(sx, y - h / 2.0, 14.0, h, &Style::filled(c));
            }
            Some(Swatch::Line(c)) => canvas.line(sx, y, sx + 14.0, y, &LineStyle::solid(c, 1.5)),
            Some(Swatch::Marker(c)) => {
                canvas.marker(sx + 7.0, y, &MarkerStyle { color: c, ..Default::default() });
            }
            None => {}
        }
        canvas.text(sx + swatch_w, y, &entry.label, &label_style);
        if let Some(value) = &entry.value {
            canvas.text(bx + box_w - padding, y, value, &value_style);
        }
        row += 1;
    }
}
