//! Ratio plot: points with optional uncertainties around a reference line at 1.

use std::borrow::Cow;

use fh_hist::Hist1D;

use crate::color::Color;
use crate::convert::{ConvertArguments, DEFAULT_LINE_COLOR, ErrorBarData, PointData};
use crate::error::Result;
use crate::figure::Panel;
use crate::plot::{ErrorBars, HLine, LinePattern, Plot, Scatter};

#[derive(Debug, Clone, PartialEq)]
pub struct RatioConfig {
    /// Draw error bars from the ratio's bin errors.
    pub errors: bool,
    pub whisker_width: f64,
    /// Fixed color for points and whiskers; black when unset.
    pub color: Option<Color>,
    pub marker_size: f64,
}

impl Default for RatioConfig {
    fn default() -> Self {
        Self { errors: true, whisker_width: 10.0, color: None, marker_size: 3.0 }
    }
}

/// Recipe for a precomputed ratio histogram, or a numerator/denominator pair.
#[derive(Debug, Clone)]
pub struct RatioHist<'a> {
    hist: Cow<'a, Hist1D>,
    config: RatioConfig,
}

impl<'a> RatioHist<'a> {
    pub fn new(ratio: &'a Hist1D) -> Self {
        Self { hist: Cow::Borrowed(ratio), config: RatioConfig::default() }
    }

    /// Divide `num / den` first; fails on mismatched edges.
    pub fn from_pair(num: &Hist1D, den: &Hist1D) -> Result<RatioHist<'static>> {
        let ratio = (num / den)?;
        Ok(RatioHist { hist: Cow::Owned(ratio), config: RatioConfig::default() })
    }

    pub fn with_config(mut self, config: RatioConfig) -> Self {
        self.config = config;
        self
    }

    /// The histogram that will be drawn.
    pub fn hist(&self) -> &Hist1D {
        &self.hist
    }

    pub fn render<'p>(&self, panel: &'p mut Panel) -> Result<&'p mut Panel> {
        let color = self.config.color.unwrap_or(DEFAULT_LINE_COLOR);
        let points: PointData = self.hist.convert_arguments();
        log::debug!(
            "ratiohist: {} points, errors {}",
            points.x.len(),
            if self.config.errors { "on" } else { "off" }
        );

        panel.push(Plot::Scatter(Scatter {
            x: points.x,
            y: points.y,
            color,
            marker_size: self.config.marker_size,
            label: None,
        }));

        if self.config.errors {
            let d: ErrorBarData = self.hist.convert_arguments();
            panel.push(Plot::ErrorBars(ErrorBars {
                x: d.x,
                y: d.y,
                low: d.err.clone(),
                high: d.err,
                whisker_width: self.config.whisker_width,
                color,
                linewidth: 1.0,
            }));
        }

        panel.push(Plot::HLine(HLine {
            y: 1.0,
            color: DEFAULT_LINE_COLOR,
            pattern: LinePattern::DashDot,
            linewidth: 1.0,
        }));

        // Points sit at bin centers; keep the outer bins fully visible.
        if let (None, [lo, .., hi]) = (panel.xlimits, self.hist.bin_edges()) {
            panel.xlimits = Some((*lo, *hi));
        }
        Ok(panel)
    }
}

/// Draw `ratio` on `panel` with `config`.
pub fn ratiohist<'p>(
    panel: &'p mut Panel,
    ratio: &Hist1D,
    config: RatioConfig,
) -> Result<&'p mut Panel> {
    RatioHist::new(ratio).with_config(config).render(panel)
}

/// Divide `num / den` and draw the quotient.
pub fn ratiohist_pair<'p>(
    panel: &'p mut Panel,
    num: &Hist1D,
    den: &Hist1D,
    config: RatioConfig,
) -> Result<&'p mut Panel> {
    RatioHist::from_pair(num, den)?.with_config(config).render(panel)
}
