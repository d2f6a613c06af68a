//! Type-directed conversion of histograms into plot data.
//!
//! [`ConvertArguments`] turns a histogram into the argument shape of one plot
//! kind; [`Plottable`] ties those shapes to finished [`Plot`] primitives and to
//! the per-variant default plot kind.

use std::fmt;

use fh_hist::{Hist1D, Hist2D};
use serde::Serialize;

use crate::color::Color;
use crate::error::{Result, VizError};
use crate::plot::{
    BarPlot, CrossBar, ErrorBars, Heatmap, Plot, PlotAttributes, PlotKind, Scatter, Stairs,
};

/// Bar color used when a single-histogram bar plot has no explicit color.
pub const FALLBACK_BAR_COLOR: Color = Color::rgb(0x4C, 0x78, 0xA8);

/// Default color of lines, markers and whiskers.
pub const DEFAULT_LINE_COLOR: Color = Color::BLACK;

/// Default fill of uncertainty boxes.
pub const DEFAULT_BAND_COLOR: Color = Color::rgba(0, 0, 0, 0.25);

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StairsData {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PointData {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

/// `err` is the symmetric extent on each side of `y`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorBarData {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub err: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrossBarData {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub ymin: Vec<f64>,
    pub ymax: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatmapData {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub z: Vec<Vec<f64>>,
}

/// Conversion of a source value into the argument shape `D` of a plot kind.
pub trait ConvertArguments<D> {
    fn convert_arguments(&self) -> D;
}

impl ConvertArguments<StairsData> for Hist1D {
    /// Outline closed at both ends: a zero before the first edge's count and
    /// after a repeated final edge.
    fn convert_arguments(&self) -> StairsData {
        let edges = self.bin_edges();
        let mut x = edges.to_vec();
        x.push(edges[edges.len() - 1]);
        let mut y = Vec::with_capacity(x.len());
        y.push(0.0);
        y.extend_from_slice(self.bin_counts());
        y.push(0.0);
        StairsData { x, y }
    }
}

impl ConvertArguments<PointData> for Hist1D {
    fn convert_arguments(&self) -> PointData {
        PointData { x: self.bin_centers(), y: self.bin_counts().to_vec() }
    }
}

impl ConvertArguments<ErrorBarData> for Hist1D {
    fn convert_arguments(&self) -> ErrorBarData {
        ErrorBarData {
            x: self.bin_centers(),
            y: self.bin_counts().to_vec(),
            err: half_errors(self),
        }
    }
}

impl ConvertArguments<CrossBarData> for Hist1D {
    fn convert_arguments(&self) -> CrossBarData {
        let y = self.bin_counts().to_vec();
        let half = half_errors(self);
        let ymin = y.iter().zip(&half).map(|(c, e)| c - e).collect();
        let ymax = y.iter().zip(&half).map(|(c, e)| c + e).collect();
        CrossBarData { x: self.bin_centers(), y, ymin, ymax }
    }
}

impl ConvertArguments<HeatmapData> for Hist2D {
    /// Exact-zero cells become NaN so they render blank.
    fn convert_arguments(&self) -> HeatmapData {
        let (x, y) = self.bin_centers();
        let z = self
            .bin_counts()
            .iter()
            .map(|row| row.iter().map(|&c| if c == 0.0 { f64::NAN } else { c }).collect())
            .collect();
        HeatmapData { x, y, z }
    }
}

fn half_errors(h: &Hist1D) -> Vec<f64> {
    h.bin_errors().into_iter().map(|e| e / 2.0).collect()
}

/// Histogram variants known to the plotting layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum HistVariant {
    OneD,
    TwoD,
}

impl HistVariant {
    /// Default plot kind per variant: 1D histograms are bars, 2D ones heatmaps.
    pub const fn default_plot_kind(self) -> PlotKind {
        match self {
            HistVariant::OneD => PlotKind::BarPlot,
            HistVariant::TwoD => PlotKind::Heatmap,
        }
    }
}

impl fmt::Display for HistVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HistVariant::OneD => f.write_str("1D"),
            HistVariant::TwoD => f.write_str("2D"),
        }
    }
}

/// Anything a [`Panel`](crate::figure::Panel) can draw directly.
pub trait Plottable {
    fn variant(&self) -> HistVariant;

    /// Build the primitive for `kind`, or [`VizError::UnsupportedConversion`].
    fn to_plot(&self, kind: PlotKind, attrs: &PlotAttributes) -> Result<Plot>;
}

impl Plottable for Hist1D {
    fn variant(&self) -> HistVariant {
        HistVariant::OneD
    }

    fn to_plot(&self, kind: PlotKind, attrs: &PlotAttributes) -> Result<Plot> {
        let plot = match kind {
            PlotKind::Stairs => {
                let d: StairsData = self.convert_arguments();
                Plot::Stairs(Stairs {
                    x: d.x,
                    y: d.y,
                    color: attrs.resolve_color(DEFAULT_LINE_COLOR),
                    linewidth: attrs.linewidth,
                    label: attrs.label.clone(),
                })
            }
            PlotKind::Scatter => {
                let d: PointData = self.convert_arguments();
                Plot::Scatter(Scatter {
                    x: d.x,
                    y: d.y,
                    color: attrs.resolve_color(DEFAULT_LINE_COLOR),
                    marker_size: attrs.marker_size,
                    label: attrs.label.clone(),
                })
            }
            PlotKind::BarPlot => {
                let d: PointData = self.convert_arguments();
                let color = attrs.resolve_color(FALLBACK_BAR_COLOR);
                Plot::BarPlot(BarPlot {
                    colors: vec![color; d.x.len()],
                    x: d.x,
                    y: d.y,
                    width: self.bin_widths(),
                    stack: None,
                    gap: attrs.gap,
                    label: attrs.label.clone(),
                })
            }
            PlotKind::ErrorBars => {
                let d: ErrorBarData = self.convert_arguments();
                Plot::ErrorBars(ErrorBars {
                    x: d.x,
                    y: d.y,
                    low: d.err.clone(),
                    high: d.err,
                    whisker_width: attrs.whisker_width,
                    color: attrs.resolve_color(DEFAULT_LINE_COLOR),
                    linewidth: attrs.linewidth,
                })
            }
            PlotKind::CrossBar => {
                let d: CrossBarData = self.convert_arguments();
                Plot::CrossBar(CrossBar {
                    x: d.x,
                    y: d.y,
                    ymin: d.ymin,
                    ymax: d.ymax,
                    width: self.bin_widths(),
                    color: attrs.resolve_color(DEFAULT_BAND_COLOR),
                    show_midline: attrs.show_midline,
                })
            }
            PlotKind::Heatmap => {
                return Err(VizError::UnsupportedConversion { variant: self.variant(), kind });
            }
        };
        Ok(plot)
    }
}

impl Plottable for Hist2D {
    fn variant(&self) -> HistVariant {
        HistVariant::TwoD
    }

    fn to_plot(&self, kind: PlotKind, _attrs: &PlotAttributes) -> Result<Plot> {
        match kind {
            PlotKind::Heatmap => {
                let d: HeatmapData = self.convert_arguments();
                Ok(Plot::Heatmap(Heatmap { x: d.x, y: d.y, z: d.z }))
            }
            other => Err(VizError::UnsupportedConversion { variant: self.variant(), kind: other }),
        }
    }
}
