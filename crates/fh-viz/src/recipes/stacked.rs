//! Stacked histograms with a combined uncertainty overlay.

use fh_hist::Hist1D;
use fh_hist::binning::same_edges;
use serde::{Deserialize, Serialize};

use crate::color::{self, Color};
use crate::error::{Result, VizError};
use crate::figure::{LegendEntry, Panel, Swatch};
use crate::plot::{BarPlot, CrossBar, ErrorBars, Plot};

/// How the combined uncertainty of the stack is drawn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorDisplay {
    /// Whiskers above and below the stack total.
    #[default]
    Bar,
    /// Shaded box per bin, no center line.
    Band,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StackedConfig {
    /// One color per stacked histogram, bottom to top.
    pub colors: Vec<Color>,
    pub error_display: ErrorDisplay,
    pub whisker_width: f64,
    /// Fraction of each bin left empty between neighbouring bars.
    pub gap: f64,
    pub error_color: Color,
    /// Legend labels, bottom to top. Missing labels get no legend entry.
    pub labels: Vec<String>,
}

impl Default for StackedConfig {
    fn default() -> Self {
        Self {
            colors: color::palette_colors("fighist"),
            error_display: ErrorDisplay::Bar,
            whisker_width: 10.0,
            gap: 0.0,
            error_color: Color::rgba(0, 0, 0, 0.5),
            labels: Vec::new(),
        }
    }
}

/// Per-bin stack totals and their quadrature-summed errors.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StackSummary {
    pub centers: Vec<f64>,
    pub widths: Vec<f64>,
    pub totals: Vec<f64>,
    pub errors: Vec<f64>,
}

/// Recipe drawing several same-binning histograms as one stacked bar chart.
#[derive(Debug, Clone)]
pub struct StackedHist<'a> {
    hists: Vec<&'a Hist1D>,
    config: StackedConfig,
}

impl<'a> StackedHist<'a> {
    pub fn new(hists: impl IntoIterator<Item = &'a Hist1D>) -> Self {
        Self { hists: hists.into_iter().collect(), config: StackedConfig::default() }
    }

    pub fn with_config(mut self, config: StackedConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &StackedConfig {
        &self.config
    }

    /// Non-empty input, shared edges, and at least one color per histogram.
    pub fn validate(&self) -> Result<()> {
        let first = self.hists.first().ok_or(VizError::EmptyInput("stacked histograms"))?;
        if let Some(index) =
            self.hists.iter().position(|h| !same_edges(h.bin_edges(), first.bin_edges()))
        {
            return Err(VizError::EdgeMismatch { index });
        }
        if self.config.colors.len() < self.hists.len() {
            return Err(VizError::ColorShortage {
                needed: self.hists.len(),
                given: self.config.colors.len(),
            });
        }
        Ok(())
    }

    /// Totals and `sqrt(Σ σᵢ²)` per bin.
    pub fn summary(&self) -> Result<StackSummary> {
        self.validate()?;
        let first = self.hists[0];
        let n = first.n_bins();
        let mut totals = vec![0.0; n];
        let mut sumw2 = vec![0.0; n];
        for h in &self.hists {
            for (t, c) in totals.iter_mut().zip(h.bin_counts()) {
                *t += c;
            }
            for (s, e) in sumw2.iter_mut().zip(h.bin_errors()) {
                *s += e * e;
            }
        }
        Ok(StackSummary {
            centers: first.bin_centers(),
            widths: first.bin_widths(),
            totals,
            errors: sumw2.into_iter().map(f64::sqrt).collect(),
        })
    }

    /// Append the stacked bars and the uncertainty overlay to `panel`.
    ///
    /// Validation runs first; on error `panel` is left untouched.
    pub fn render<'p>(&self, panel: &'p mut Panel) -> Result<&'p mut Panel> {
        let summary = self.summary()?;
        let n_bins = summary.centers.len();
        let n_series = self.hists.len();

        let mut x = Vec::with_capacity(n_bins * n_series);
        let mut y = Vec::with_capacity(n_bins * n_series);
        let mut width = Vec::with_capacity(n_bins * n_series);
        let mut group = Vec::with_capacity(n_bins * n_series);
        let mut colors = Vec::with_capacity(n_bins * n_series);
        for (gi, h) in self.hists.iter().enumerate() {
            x.extend_from_slice(&summary.centers);
            y.extend_from_slice(h.bin_counts());
            width.extend_from_slice(&summary.widths);
            group.extend(std::iter::repeat_n(gi, n_bins));
            colors.extend(std::iter::repeat_n(self.config.colors[gi], n_bins));
        }

        log::debug!(
            "stackedhist: {n_series} series x {n_bins} bins, errors as {:?}",
            self.config.error_display
        );

        panel.push(Plot::BarPlot(BarPlot {
            x,
            y,
            width,
            stack: Some(group),
            colors,
            gap: self.config.gap,
            label: None,
        }));

        let half: Vec<f64> = summary.errors.iter().map(|e| e / 2.0).collect();
        match self.config.error_display {
            ErrorDisplay::Bar => {
                panel.push(Plot::ErrorBars(ErrorBars {
                    x: summary.centers,
                    y: summary.totals,
                    low: half.clone(),
                    high: half,
                    whisker_width: self.config.whisker_width,
                    color: self.config.error_color,
                    linewidth: 1.0,
                }));
            }
            ErrorDisplay::Band => {
                let ymin = summary.totals.iter().zip(&half).map(|(t, e)| t - e).collect();
                let ymax = summary.totals.iter().zip(&half).map(|(t, e)| t + e).collect();
                panel.push(Plot::CrossBar(CrossBar {
                    x: summary.centers,
                    y: summary.totals,
                    ymin,
                    ymax,
                    width: summary.widths,
                    color: self.config.error_color,
                    show_midline: false,
                }));
            }
        }

        for (label, c) in self.config.labels.iter().zip(&self.config.colors).take(n_series) {
            panel.push_legend_entry(LegendEntry {
                label: label.clone(),
                value: None,
                swatch: Some(Swatch::Patch(*c)),
            });
        }
        Ok(panel)
    }
}

/// `stackedhist(panel, hists, config)` in one call.
pub fn stackedhist<'p>(
    panel: &'p mut Panel,
    hists: &[&Hist1D],
    config: StackedConfig,
) -> Result<&'p mut Panel> {
    StackedHist::new(hists.iter().copied()).with_config(config).render(panel)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn hist(edges: &[f64], counts: &[f64]) -> Hist1D {
        Hist1D::from_counts(edges.to_vec(), counts.to_vec(), None).unwrap()
    }

    #[test]
    fn flattens_series_with_group_tags() {
        let a = hist(&[0.0, 1.0, 2.0], &[1.0, 2.0]);
        let b = hist(&[0.0, 1.0, 2.0], &[3.0, 4.0]);
        let mut panel = Panel::new();
        StackedHist::new([&a, &b]).render(&mut panel).unwrap();

        let Plot::BarPlot(bars) = &panel.plots()[0] else {
            panic!("expected bars first");
        };
        assert_eq!(bars.x, vec![0.5, 1.5, 0.5, 1.5]);
        assert_eq!(bars.y, vec![1.0, 2.0, 3.0, 4.0]);
        assert_eq!(bars.stack.as_deref(), Some(&[0, 0, 1, 1][..]));
        assert_eq!(bars.stacked_totals(), vec![(0.5, 4.0), (1.5, 6.0)]);
    }

    #[test]
    fn whiskers_span_half_the_quadrature_error() {
        let a = hist(&[0.0, 1.0], &[9.0]);
        let b = hist(&[0.0, 1.0], &[16.0]);
        let mut panel = Panel::new();
        StackedHist::new([&a, &b]).render(&mut panel).unwrap();
        let Plot::ErrorBars(err) = &panel.plots()[1] else {
            panic!("expected error bars");
        };
        assert_eq!(err.y, vec![25.0]);
        assert_abs_diff_eq!(err.low[0], 2.5);
        assert_abs_diff_eq!(err.high[0], 2.5);
    }

    #[test]
    fn band_mode_draws_crossbars_without_midline() {
        let a = hist(&[0.0, 1.0, 3.0], &[4.0, 1.0]);
        let mut panel = Panel::new();
        let config = StackedConfig { error_display: ErrorDisplay::Band, ..Default::default() };
        StackedHist::new([&a]).with_config(config).render(&mut panel).unwrap();
        let Plot::CrossBar(band) = &panel.plots()[1] else {
            panic!("expected crossbar band");
        };
        assert!(!band.show_midline);
        assert_eq!(band.width, vec![1.0, 2.0]);
        assert_abs_diff_eq!(band.ymin[0], 3.0);
        assert_abs_diff_eq!(band.ymax[0], 5.0);
    }

    #[test]
    fn edge_mismatch_leaves_panel_untouched() {
        let a = hist(&[0.0, 1.0, 2.0], &[1.0, 1.0]);
        let b = hist(&[0.0, 1.0, 2.0], &[1.0, 1.0]);
        let c = hist(&[0.0, 1.5, 2.0], &[1.0, 1.0]);
        let mut panel = Panel::new();
        let err = StackedHist::new([&a, &b, &c]).render(&mut panel).unwrap_err();
        assert!(matches!(err, VizError::EdgeMismatch { index: 2 }));
        assert!(panel.is_empty());
    }

    #[test]
    fn color_shortage_is_an_error() {
        let a = hist(&[0.0, 1.0], &[1.0]);
        let config = StackedConfig { colors: vec![Color::BLACK], ..Default::default() };
        let mut panel = Panel::new();
        let err = stackedhist(&mut panel, &[&a, &a], config).unwrap_err();
        assert!(matches!(err, VizError::ColorShortage { needed: 2, given: 1 }));
        assert!(panel.is_empty());
    }

    #[test]
    fn empty_input_is_an_error() {
        let mut panel = Panel::new();
        let none: [&Hist1D; 0] = [];
        assert!(matches!(
            StackedHist::new(none).render(&mut panel),
            Err(VizError::EmptyInput(_))
        ));
    }

    #[test]
    fn labels_become_legend_entries() {
        let a = hist(&[0.0, 1.0], &[1.0]);
        let b = hist(&[0.0, 1.0], &[2.0]);
        let config = StackedConfig { labels: vec!["ttbar".into()], ..Default::default() };
        let mut panel = Panel::new();
        StackedHist::new([&a, &b]).with_config(config.clone()).render(&mut panel).unwrap();
        assert_eq!(panel.legend_entries().len(), 1);
        assert_eq!(panel.legend_entries()[0].swatch, Some(Swatch::Patch(config.colors[0])));
    }
}
