//! Primitive plot elements appended to a [`Panel`](crate::figure::Panel).
//!
//! Every primitive carries its data in data coordinates; mapping to the page
//! happens in the renderer.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::color::Color;

/// Primitive plot kinds a histogram can be converted into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlotKind {
    Stairs,
    Scatter,
    BarPlot,
    ErrorBars,
    CrossBar,
    Heatmap,
}

impl PlotKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlotKind::Stairs => "stairs",
            PlotKind::Scatter => "scatter",
            PlotKind::BarPlot => "barplot",
            PlotKind::ErrorBars => "errorbars",
            PlotKind::CrossBar => "crossbar",
            PlotKind::Heatmap => "heatmap",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "stairs" | "step" => Some(PlotKind::Stairs),
            "scatter" => Some(PlotKind::Scatter),
            "bar" | "barplot" => Some(PlotKind::BarPlot),
            "errorbars" => Some(PlotKind::ErrorBars),
            "crossbar" => Some(PlotKind::CrossBar),
            "heatmap" => Some(PlotKind::Heatmap),
            _ => None,
        }
    }
}

impl fmt::Display for PlotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stroke pattern for lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinePattern {
    #[default]
    Solid,
    Dash,
    DashDot,
    Dot,
}

/// Outline of a histogram: `x` holds edges (last one repeated), `y` starts and ends at 0.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stairs {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub color: Color,
    pub linewidth: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scatter {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub color: Color,
    pub marker_size: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// Bars centered at `x` with per-bar `width`.
///
/// With `stack` set, bars sharing an `x` are piled on top of each other in
/// ascending group order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarPlot {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub width: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack: Option<Vec<usize>>,
    /// One color per bar.
    pub colors: Vec<Color>,
    /// Fraction of each bar width left empty (0 = bars touch).
    pub gap: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl BarPlot {
    /// Top of every stack column, in first-seen `x` order.
    pub fn stacked_totals(&self) -> Vec<(f64, f64)> {
        let mut totals: Vec<(f64, f64)> = Vec::new();
        for (&x, &y) in self.x.iter().zip(&self.y) {
            match totals.iter_mut().find(|(tx, _)| *tx == x) {
                Some((_, t)) => *t += y,
                None => totals.push((x, y)),
            }
        }
        totals
    }
}

/// Vertical whiskers from `y - low` to `y + high`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorBars {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub low: Vec<f64>,
    pub high: Vec<f64>,
    /// Cap width in points (0 = no caps).
    pub whisker_width: f64,
    pub color: Color,
    pub linewidth: f64,
}

/// Filled boxes spanning `[ymin, ymax]` over each bin width.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrossBar {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub ymin: Vec<f64>,
    pub ymax: Vec<f64>,
    pub width: Vec<f64>,
    pub color: Color,
    pub show_midline: bool,
}

/// Horizontal line across the whole panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HLine {
    pub y: f64,
    pub color: Color,
    pub pattern: LinePattern,
    pub linewidth: f64,
}

/// Cell grid `z[ix][iy]` at centers `x[ix]`, `y[iy]`. NaN cells are left blank.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Heatmap {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub z: Vec<Vec<f64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Plot {
    Stairs(Stairs),
    Scatter(Scatter),
    BarPlot(BarPlot),
    ErrorBars(ErrorBars),
    CrossBar(CrossBar),
    HLine(HLine),
    Heatmap(Heatmap),
}

impl Plot {
    pub fn name(&self) -> &'static str {
        match self {
            Plot::Stairs(_) => "stairs",
            Plot::Scatter(_) => "scatter",
            Plot::BarPlot(_) => "barplot",
            Plot::ErrorBars(_) => "errorbars",
            Plot::CrossBar(_) => "crossbar",
            Plot::HLine(_) => "hline",
            Plot::Heatmap(_) => "heatmap",
        }
    }
}

/// Per-call attributes for single-histogram plots.
///
/// `color: None` means "not set": each conversion then picks its own
/// default (bars use [`FALLBACK_BAR_COLOR`](crate::convert::FALLBACK_BAR_COLOR)).
#[derive(Debug, Clone, PartialEq)]
pub struct PlotAttributes {
    pub color: Option<Color>,
    pub alpha: f64,
    pub label: Option<String>,
    pub linewidth: f64,
    pub marker_size: f64,
    pub whisker_width: f64,
    pub gap: f64,
    pub show_midline: bool,
}

impl Default for PlotAttributes {
    fn default() -> Self {
        Self {
            color: None,
            alpha: 1.0,
            label: None,
            linewidth: 1.5,
            marker_size: 3.0,
            whisker_width: 6.0,
            gap: 0.0,
            show_midline: false,
        }
    }
}

impl PlotAttributes {
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// The explicit color if set, otherwise `fallback`; `alpha` applied on top.
    pub fn resolve_color(&self, fallback: Color) -> Color {
        let c = self.color.unwrap_or(fallback);
        if (self.alpha - 1.0).abs() > 1e-9 { c.with_alpha(c.a * self.alpha) } else { c }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_parse_roundtrip() {
        for k in [
            PlotKind::Stairs,
            PlotKind::Scatter,
            PlotKind::BarPlot,
            PlotKind::ErrorBars,
            PlotKind::CrossBar,
            PlotKind::Heatmap,
        ] {
            assert_eq!(PlotKind::parse(k.as_str()), Some(k));
        }
        assert_eq!(PlotKind::parse("pie"), None);
    }

    #[test]
    fn stacked_totals_group_by_x() {
        let bars = BarPlot {
            x: vec![0.5, 1.5, 0.5, 1.5],
            y: vec![1.0, 2.0, 3.0, 4.0],
            width: vec![1.0; 4],
            stack: Some(vec![0, 0, 1, 1]),
            colors: vec![Color::BLACK; 4],
            gap: 0.0,
            label: None,
        };
        assert_eq!(bars.stacked_totals(), vec![(0.5, 4.0), (1.5, 6.0)]);
    }

    #[test]
    fn attributes_resolve_color() {
        let red = Color::rgb(255, 0, 0);
        assert_eq!(PlotAttributes::default().resolve_color(red), red);
        let a = PlotAttributes { alpha: 0.5, ..PlotAttributes::default() }.with_color(Color::BLACK);
        assert!((a.resolve_color(red).a - 0.5).abs() < 1e-12);
        assert_eq!(a.resolve_color(red).r, 0);
    }
}
