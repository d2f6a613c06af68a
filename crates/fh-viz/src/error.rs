//! Error types for fh-viz

use thiserror::Error;

use crate::convert::HistVariant;
use crate::plot::PlotKind;

/// Plot-assembly error. Every variant is raised before any primitive is appended.
#[derive(Error, Debug)]
pub enum VizError {
    /// A stacked histogram does not share the bin edges of the first one
    #[error("bin edges of histogram {index} differ from histogram 0")]
    EdgeMismatch {
        /// Position of the offending histogram in the input sequence
        index: usize,
    },

    /// Fewer colors than series to stack
    #[error("not enough colors: {needed} series but only {given} colors")]
    ColorShortage {
        /// Number of series
        needed: usize,
        /// Number of colors supplied
        given: usize,
    },

    /// Named anchor other than `lt` / `rt`
    #[error("invalid anchor {0:?}: expected \"lt\" or \"rt\"")]
    InvalidAnchor(String),

    /// Required input sequence was empty
    #[error("empty input: {0}")]
    EmptyInput(&'static str),

    /// The histogram variant has no conversion for the requested plot kind
    #[error("cannot draw a {variant} histogram as {kind}")]
    UnsupportedConversion {
        /// Histogram variant
        variant: HistVariant,
        /// Requested plot kind
        kind: PlotKind,
    },

    /// Error raised by the histogram library
    #[error(transparent)]
    Hist(#[from] fh_hist::Error),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, VizError>;
