use fh_viz::figure::{Panel, Scale};
use fh_viz::plot::{BarPlot, CrossBar, ErrorBars, HLine, Plot, Scatter, Stairs};

use crate::canvas::Canvas;
use crate::config::VizConfig;
use crate::layout::axes::{Axis, DataRange};
use crate::layout::legend::draw_legend;
use crate::layout::margins::PlotArea;
use crate::plots::axes_draw::draw_axes;
use crate::plots::heatmap::{self, COLORBAR_SPACE};
use crate::primitives::*;

const X_TICKS: usize = 6;
const Y_TICKS: usize = 5;

/// Data extents of a panel's primitives.
///
/// `y_positive` only tracks strictly positive values and feeds log axes.
#[derive(Debug, Clone, Copy, Default)]
pub struct PanelRanges {
    pub x: DataRange,
    pub y: DataRange,
    pub y_positive: DataRange,
}

impl PanelRanges {
    fn include_y(&mut self, v: f64) {
        self.y.include(v);
        if v > 0.0 {
            self.y_positive.include(v);
        }
    }

    /// Collect extents over every primitive; non-finite values are ignored.
    pub fn of(panel: &Panel) -> Self {
        let mut r = Self::default();
        for plot in panel.plots() {
            match plot {
                Plot::Stairs(s) => {
                    r.x.extend(s.x.iter().copied());
                    s.y.iter().for_each(|&v| r.include_y(v));
                }
                Plot::Scatter(s) => {
                    include_points(&mut r.x, &s.x);
                    s.y.iter().for_each(|&v| r.include_y(v));
                }
                Plot::BarPlot(b) => {
                    for (x, w) in b.x.iter().zip(&b.width) {
                        r.x.include(x - w / 2.0);
                        r.x.include(x + w / 2.0);
                    }
                    r.y.include(0.0);
                    for (_, lo, hi) in bar_spans(b) {
                        r.include_y(lo);
                        r.include_y(hi);
                    }
                }
                Plot::ErrorBars(e) => {
                    include_points(&mut r.x, &e.x);
                    for ((y, lo), hi) in e.y.iter().zip(&e.low).zip(&e.high) {
                        r.include_y(y - lo);
                        r.include_y(y + hi);
                    }
                }
                Plot::CrossBar(c) => {
                    for (x, w) in c.x.iter().zip(&c.width) {
                        r.x.include(x - w / 2.0);
                        r.x.include(x + w / 2.0);
                    }
                    c.ymin.iter().chain(&c.ymax).for_each(|&v| r.include_y(v));
                }
                Plot::HLine(h) => r.include_y(h.y),
                Plot::Heatmap(hm) => {
                    r.x.extend(heatmap::centers_to_edges(&hm.x));
                    heatmap::centers_to_edges(&hm.y).into_iter().for_each(|v| r.include_y(v));
                }
            }
        }
        r
    }
}

/// Point positions are bin centers; pad the outer ones by half their neighbour spacing.
fn include_points(range: &mut DataRange, xs: &[f64]) {
    let mut finite: Vec<f64> = xs.iter().copied().filter(|v| v.is_finite()).collect();
    finite.sort_by(f64::total_cmp);
    finite.dedup();
    range.extend(finite.iter().copied());
    if let ([a, b, ..], [.., y, z]) = (&finite[..], &finite[..]) {
        range.include(a - (b - a) / 2.0);
        range.include(z + (z - y) / 2.0);
    }
}

/// `(bar index, bottom, top)` for every bar, stacking piles within each `x`.
fn bar_spans(b: &BarPlot) -> Vec<(usize, f64, f64)> {
    let Some(groups) = &b.stack else {
        return b.y.iter().enumerate().map(|(i, &y)| (i, 0.0, y)).collect();
    };
    let mut order: Vec<usize> = (0..b.y.len().min(groups.len())).collect();
    order.sort_by_key(|&i| groups[i]);

    let mut bases: Vec<(f64, f64)> = Vec::new();
    let mut out = Vec::with_capacity(order.len());
    for i in order {
        let (x, y) = (b.x[i], b.y[i]);
        if !y.is_finite() {
            continue;
        }
        let k = match bases.iter().position(|(bx, _)| *bx == x) {
            Some(k) => k,
            None => {
                bases.push((x, 0.0));
                bases.len() - 1
            }
        };
        let base = bases[k].1;
        out.push((i, base, base + y));
        bases[k].1 += y;
    }
    out
}

/// X and y axes for `panel`, honouring explicit limits and the y scale.
pub fn panel_axes(panel: &Panel, ranges: &PanelRanges, config: &VizConfig) -> (Axis, Axis) {
    let x_axis = match panel.xlimits {
        Some((lo, hi)) => Axis::fixed(lo, hi, X_TICKS),
        None => {
            let (lo, hi) = ranges.x.or((0.0, 1.0));
            Axis::fixed(lo, hi, X_TICKS)
        }
    };

    let headroom = config.axes.y_headroom.max(1.0);
    let mut log = panel.yscale == Scale::Log;
    if log && panel.ylimits.is_none_or(|(lo, _)| lo <= 0.0) && ranges.y_positive.is_empty() {
        log::warn!("log y scale without positive data, falling back to linear");
        log = false;
    }

    let y_axis = match (panel.ylimits, log) {
        (Some((lo, hi)), true) if lo > 0.0 => {
            let mut axis = Axis::auto_log(lo, hi);
            axis.min = lo;
            axis.max = hi;
            axis
        }
        (Some((lo, hi)), _) => Axis::fixed(lo, hi, Y_TICKS),
        (None, true) => {
            let (lo, hi) = ranges.y_positive.or((1.0, 10.0));
            Axis::auto_log(lo, hi * headroom)
        }
        (None, false) => {
            let (lo, hi) = ranges.y.or((0.0, 1.0));
            Axis::auto_linear(lo, hi + (hi - lo) * (headroom - 1.0), Y_TICKS)
        }
    };

    (x_axis.with_label(&panel.xlabel), y_axis.with_label(&panel.ylabel))
}

/// Draw `panel` into `cell`: axes, primitives (clipped), texts, legend.
pub fn draw_panel(
    canvas: &mut Canvas,
    cell: &PlotArea,
    panel: &Panel,
    config: &VizConfig,
) -> crate::Result<()> {
    let heatmaps: Vec<_> = panel
        .plots()
        .iter()
        .filter_map(|p| match p {
            Plot::Heatmap(hm) => Some(hm),
            _ => None,
        })
        .collect();
    let mut z_range = DataRange::default();
    for hm in &heatmaps {
        heatmap::check_shape(hm)?;
        let r = heatmap::z_range(hm);
        z_range.include(r.min);
        z_range.include(r.max);
    }

    let ranges = PanelRanges::of(panel);
    let (x_axis, y_axis) = panel_axes(panel, &ranges, config);
    let extra_right = if heatmaps.is_empty() { 0.0 } else { COLORBAR_SPACE };
    let area = PlotArea::auto_in_cell(
        canvas,
        cell,
        &y_axis,
        &x_axis,
        !panel.title.is_empty(),
        extra_right,
        config,
    );
    log::debug!(
        "panel: {} plots, x [{}, {}], y [{}, {}]{}",
        panel.plots().len(),
        x_axis.min,
        x_axis.max,
        y_axis.min,
        y_axis.max,
        if y_axis.log { " (log)" } else { "" }
    );

    draw_axes(canvas, &area, &x_axis, &y_axis, config);

    canvas.push_clip(area.left, area.top, area.width, area.height);
    for plot in panel.plots() {
        match plot {
            Plot::Stairs(s) => draw_stairs(canvas, &area, s, &x_axis, &y_axis),
            Plot::Scatter(s) => draw_scatter(canvas, &area, s, &x_axis, &y_axis),
            Plot::BarPlot(b) => draw_bars(canvas, &area, b, &x_axis, &y_axis),
            Plot::ErrorBars(e) => draw_errorbars(canvas, &area, e, &x_axis, &y_axis),
            Plot::CrossBar(c) => draw_crossbars(canvas, &area, c, &x_axis, &y_axis),
            Plot::HLine(h) => draw_hline(canvas, &area, h, &y_axis),
            Plot::Heatmap(hm) => {
                heatmap::draw_heatmap(canvas, &area, hm, &x_axis, &y_axis, &z_range)
            }
        }
    }
    canvas.pop_clip();

    if !heatmaps.is_empty() {
        heatmap::draw_colorbar(canvas, &area, &z_range, config);
    }

    if !panel.title.is_empty() {
        let style = TextStyle {
            size: config.font.title_size,
            weight: FontWeight::Bold,
            anchor: TextAnchor::Middle,
            ..Default::default()
        };
        canvas.text(area.left + area.width / 2.0, area.top - 8.0, &panel.title, &style);
    }

    for text in panel.texts() {
        let (px, py) = area.relative(text.position.0, text.position.1);
        let style = TextStyle {
            size: text.size,
            color: text.color,
            baseline: TextBaseline::Hanging,
            ..Default::default()
        };
        canvas.rich_text(px, py, &text.spans, &style);
    }

    let offset = panel.texts().iter().map(|t| t.size + 6.0).fold(0.0_f64, f64::max);
    draw_legend(
        canvas,
        &area,
        panel.legend_entries(),
        config.font.size * config.legend.font_scale,
        config.legend.frame,
        offset,
    );
    Ok(())
}

struct Mapper<'a> {
    area: &'a PlotArea,
    x: &'a Axis,
    y: &'a Axis,
}

impl Mapper<'_> {
    fn px(&self, v: f64) -> f64 {
        self.x.data_to_pixel(v, self.area.left, self.area.right())
    }

    fn py(&self, v: f64) -> f64 {
        self.y.data_to_pixel(v, self.area.bottom(), self.area.top)
    }
}

fn draw_stairs(canvas: &mut Canvas, area: &PlotArea, s: &Stairs, x: &Axis, y: &Axis) {
    let m = Mapper { area, x, y };
    let n = s.x.len().min(s.y.len());
    if n == 0 {
        return;
    }
    let yv = |i: usize| if s.y[i].is_finite() { s.y[i] } else { 0.0 };
    let mut points = Vec::with_capacity(2 * n);
    points.push((m.px(s.x[0]), m.py(yv(0))));
    for i in 1..n {
        points.push((m.px(s.x[i - 1]), m.py(yv(i))));
        points.push((m.px(s.x[i]), m.py(yv(i))));
    }
    canvas.polyline(&points, &LineStyle::solid(s.color, s.linewidth));
}

fn draw_scatter(canvas: &mut Canvas, area: &PlotArea, s: &Scatter, x: &Axis, y: &Axis) {
    let m = Mapper { area, x, y };
    let marker = MarkerStyle { size: s.marker_size, color: s.color, fill: true };
    for (&xv, &yv) in s.x.iter().zip(&s.y) {
        if xv.is_finite() && yv.is_finite() {
            canvas.marker(m.px(xv), m.py(yv), &marker);
        }
    }
}

fn draw_bars(canvas: &mut Canvas, area: &PlotArea, b: &BarPlot, x: &Axis, y: &Axis) {
    let m = Mapper { area, x, y };
    let fill = 1.0 - b.gap.clamp(0.0, 1.0);
    for (i, lo, hi) in bar_spans(b) {
        let (Some(&xc), Some(&w)) = (b.x.get(i), b.width.get(i)) else {
            continue;
        };
        if !xc.is_finite() || !hi.is_finite() {
            continue;
        }
        let half = w * fill / 2.0;
        let x0 = m.px(xc - half);
        let x1 = m.px(xc + half);
        let (y0, y1) = (m.py(lo), m.py(hi));
        let color = b.colors.get(i).copied().unwrap_or_default();
        canvas.rect(x0, y1, x1 - x0, y0 - y1, &Style::filled(color));
    }
}

fn draw_errorbars(canvas: &mut Canvas, area: &PlotArea, e: &ErrorBars, x: &Axis, y: &Axis) {
    let m = Mapper { area, x, y };
    let style = LineStyle::solid(e.color, e.linewidth);
    for (((&xv, &yv), &lo), &hi) in e.x.iter().zip(&e.y).zip(&e.low).zip(&e.high) {
        if !(xv.is_finite() && yv.is_finite() && lo.is_finite() && hi.is_finite()) {
            continue;
        }
        canvas.error_bar(m.px(xv), m.py(yv - lo), m.py(yv + hi), e.whisker_width, &style);
    }
}

fn draw_crossbars(canvas: &mut Canvas, area: &PlotArea, c: &CrossBar, x: &Axis, y: &Axis) {
    let m = Mapper { area, x, y };
    let mid = LineStyle::solid(c.color.with_alpha(1.0), 1.0);
    for i in 0..c.x.len() {
        let (Some(&w), Some(&lo), Some(&hi), Some(&yv)) =
            (c.width.get(i), c.ymin.get(i), c.ymax.get(i), c.y.get(i))
        else {
            break;
        };
        if !(lo.is_finite() && hi.is_finite()) {
            continue;
        }
        let x0 = m.px(c.x[i] - w / 2.0);
        let x1 = m.px(c.x[i] + w / 2.0);
        let (y0, y1) = (m.py(lo), m.py(hi));
        canvas.rect(x0, y1, x1 - x0, y0 - y1, &Style::filled(c.color));
        if c.show_midline && yv.is_finite() {
            canvas.line(x0, m.py(yv), x1, m.py(yv), &mid);
        }
    }
}

fn draw_hline(canvas: &mut Canvas, area: &PlotArea, h: &HLine, y: &Axis) {
    if !h.y.is_finite() {
        return;
    }
    let py = y.data_to_pixel(h.y, area.bottom(), area.top);
    let style = LineStyle::with_pattern(h.color, h.linewidth, h.pattern);
    canvas.line(area.left, py, area.right(), py, &style);
}

#[cfg(test)]
mod tests {
    use super::*;
    use fh_viz::Color;

    fn bars(x: &[f64], y: &[f64], stack: Option<Vec<usize>>) -> BarPlot {
        BarPlot {
            x: x.to_vec(),
            y: y.to_vec(),
            width: vec![1.0; x.len()],
            stack,
            colors: vec![Color::BLACK; x.len()],
            gap: 0.0,
            label: None,
        }
    }

    #[test]
    fn stacked_spans_pile_up_per_x() {
        let b = bars(&[0.5, 1.5, 0.5, 1.5], &[1.0, 2.0, 3.0, 4.0], Some(vec![0, 0, 1, 1]));
        let spans = bar_spans(&b);
        assert_eq!(spans, vec![(0, 0.0, 1.0), (1, 0.0, 2.0), (2, 1.0, 4.0), (3, 2.0, 6.0)]);
    }

    #[test]
    fn ranges_skip_non_finite_and_include_bar_baseline() {
        let mut panel = Panel::new();
        panel.push(Plot::BarPlot(bars(&[0.5, 1.5], &[3.0, f64::NAN], None)));
        panel.push(Plot::HLine(HLine {
            y: 5.0,
            color: Color::BLACK,
            pattern: Default::default(),
            linewidth: 1.0,
        }));
        let r = PanelRanges::of(&panel);
        assert_eq!((r.x.min, r.x.max), (0.0, 2.0));
        assert_eq!((r.y.min, r.y.max), (0.0, 5.0));
        assert_eq!(r.y_positive.min, 3.0);
    }

    #[test]
    fn point_plots_cover_whole_bins() {
        let mut panel = Panel::new();
        panel.push(Plot::Scatter(Scatter {
            x: vec![0.5, 1.5, 2.5],
            y: vec![1.0, 0.8, 1.2],
            color: Color::BLACK,
            marker_size: 3.0,
            label: None,
        }));
        let r = PanelRanges::of(&panel);
        let (x, _) = panel_axes(&panel, &r, &VizConfig::default());
        assert_eq!((x.min, x.max), (0.0, 3.0));

        let mut single = Panel::new();
        single.push(Plot::ErrorBars(ErrorBars {
            x: vec![2.0],
            y: vec![1.0],
            low: vec![0.1],
            high: vec![0.1],
            whisker_width: 10.0,
            color: Color::BLACK,
            linewidth: 1.0,
        }));
        let r = PanelRanges::of(&single);
        assert_eq!((r.x.min, r.x.max), (2.0, 2.0));
    }

    #[test]
    fn explicit_limits_win() {
        let mut panel = Panel::new();
        panel.push(Plot::BarPlot(bars(&[0.5], &[3.0], None)));
        panel.xlimits = Some((-1.0, 4.0));
        panel.ylimits = Some((0.0, 10.0));
        let r = PanelRanges::of(&panel);
        let (x, y) = panel_axes(&panel, &r, &VizConfig::default());
        assert_eq!((x.min, x.max), (-1.0, 4.0));
        assert_eq!((y.min, y.max), (0.0, 10.0));
    }

    #[test]
    fn log_scale_without_positive_data_falls_back() {
        let mut panel = Panel::new();
        panel.push(Plot::BarPlot(bars(&[0.5], &[0.0], None)));
        panel.yscale = Scale::Log;
        let r = PanelRanges::of(&panel);
        let (_, y) = panel_axes(&panel, &r, &VizConfig::default());
        assert!(!y.log);

        panel.push(Plot::BarPlot(bars(&[1.5], &[100.0], None)));
        let r = PanelRanges::of(&panel);
        let (_, y) = panel_axes(&panel, &r, &VizConfig::default());
        assert!(y.log);
    }

    #[test]
    fn headroom_extends_y_max() {
        let mut panel = Panel::new();
        panel.push(Plot::BarPlot(bars(&[0.5], &[100.0], None)));
        let r = PanelRanges::of(&panel);
        let (_, y) = panel_axes(&panel, &r, &VizConfig::default());
        assert!(y.max >= 125.0);
        assert_eq!(y.min, 0.0);
    }
}
