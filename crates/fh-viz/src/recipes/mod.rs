//! Multi-primitive plot recipes.
//!
//! Each recipe validates its whole input first and only then appends
//! primitives, so a failed call leaves the target panel as it was.

pub mod ratio;
pub mod stacked;

pub use ratio::{RatioConfig, RatioHist, ratiohist, ratiohist_pair};
pub use stacked::{ErrorDisplay, StackSummary, StackedConfig, StackedHist, stackedhist};
