//! # fh-hist
//!
//! Weighted histograms consumed by the FigHist plotting recipes.
//!
//! The types here own their bin edges, per-bin sums of weights and sums of
//! squared weights, and the under/overflow bookkeeping. Plotting code only
//! reads derived views (centers, counts, errors, summary statistics).

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Bin-edge validation and lookup helpers.
pub mod binning;
/// Error types.
pub mod error;
/// One-dimensional histogram.
pub mod hist1d;
/// Two-dimensional histogram.
pub mod hist2d;

pub use binning::FlowPolicy;
pub use error::{Error, Result};
pub use hist1d::Hist1D;
pub use hist2d::Hist2D;
