//! # fh-viz
//!
//! Figure model and histogram plot recipes.
//!
//! Histograms from [`fh_hist`] are converted into primitive plot elements
//! (bars, stairs, points, whiskers, crossbars, reference lines, heatmap
//! cells) and appended to a caller-owned [`Figure`]. Rendering the figure to
//! an image lives in `fh-viz-render`.
//!
//! ```
//! use fh_hist::Hist1D;
//! use fh_viz::{Figure, StackedHist};
//!
//! let a = Hist1D::from_counts(vec![0.0, 1.0, 2.0], vec![3.0, 4.0], None).unwrap();
//! let b = Hist1D::from_counts(vec![0.0, 1.0, 2.0], vec![1.0, 2.0], None).unwrap();
//! let mut fig = Figure::default();
//! StackedHist::new([&a, &b]).render(fig.panel_mut((0, 0))).unwrap();
//! assert_eq!(fig.panel((0, 0)).unwrap().plots().len(), 2);
//! ```

#![warn(clippy::all)]

/// Statistics boxes and collaboration labels.
pub mod annotate;
/// Colors and named palettes.
pub mod color;
/// Histogram to primitive conversions.
pub mod convert;
/// Error types.
pub mod error;
/// Figure, panels, text and legends.
pub mod figure;
/// Primitive plot elements.
pub mod plot;
pub mod recipes;

pub use annotate::{Anchor, IntoAnchor, StatSummary, collab_text, round_sig, statbox};
pub use color::Color;
pub use convert::{ConvertArguments, HistVariant, Plottable};
pub use error::{Result, VizError};
pub use figure::{Figure, GridPos, LegendBox, LegendEntry, Panel, Scale, TextAnnotation};
pub use plot::{LinePattern, Plot, PlotAttributes, PlotKind};
pub use recipes::{RatioConfig, RatioHist, StackedConfig, StackedHist};
