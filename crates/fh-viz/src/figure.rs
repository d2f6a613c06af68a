//! Figure model: a grid of panels plus figure-level legend boxes.

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::convert::Plottable;
use crate::error::Result;
use crate::plot::{Plot, PlotAttributes, PlotKind};

/// Cell of the figure layout grid (0-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GridPos {
    pub row: usize,
    pub col: usize,
}

impl GridPos {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl From<(usize, usize)> for GridPos {
    fn from((row, col): (usize, usize)) -> Self {
        Self { row, col }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scale {
    #[default]
    Linear,
    Log,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FontWeight {
    #[default]
    Regular,
    Bold,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FontStyle {
    #[default]
    Normal,
    Italic,
}

/// A run of text sharing one weight and style.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextSpan {
    pub text: String,
    pub weight: FontWeight,
    pub style: FontStyle,
}

impl TextSpan {
    pub fn regular(text: impl Into<String>) -> Self {
        Self { text: text.into(), weight: FontWeight::Regular, style: FontStyle::Normal }
    }
}

/// Text placed in panel-relative coordinates: `(0, 0)` bottom-left, `(1, 1)` top-right.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextAnnotation {
    pub position: (f64, f64),
    pub spans: Vec<TextSpan>,
    pub size: f64,
    pub color: Color,
}

impl TextAnnotation {
    /// Concatenated span text.
    pub fn plain_text(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }
}

/// Legend swatch drawn left of the label.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", content = "color", rename_all = "snake_case")]
pub enum Swatch {
    Patch(Color),
    Line(Color),
    Marker(Color),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendEntry {
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub swatch: Option<Swatch>,
}

/// A framed legend occupying its own grid cell.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct LegendBox {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub entries: Vec<LegendEntry>,
}

/// One plot area: axes settings plus the primitives drawn into it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Panel {
    pub title: String,
    pub xlabel: String,
    pub ylabel: String,
    pub yscale: Scale,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xlimits: Option<(f64, f64)>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ylimits: Option<(f64, f64)>,
    plots: Vec<Plot>,
    texts: Vec<TextAnnotation>,
    legend: Vec<LegendEntry>,
}

impl Panel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_labels(mut self, xlabel: impl Into<String>, ylabel: impl Into<String>) -> Self {
        self.xlabel = xlabel.into();
        self.ylabel = ylabel.into();
        self
    }

    pub fn plots(&self) -> &[Plot] {
        &self.plots
    }

    pub fn texts(&self) -> &[TextAnnotation] {
        &self.texts
    }

    pub fn legend_entries(&self) -> &[LegendEntry] {
        &self.legend
    }

    pub fn is_empty(&self) -> bool {
        self.plots.is_empty() && self.texts.is_empty()
    }

    /// Append a primitive.
    pub fn push(&mut self, plot: Plot) -> &mut Self {
        log::trace!("panel: append {}", plot.name());
        self.plots.push(plot);
        self
    }

    pub fn push_text(&mut self, text: TextAnnotation) -> &mut Self {
        self.texts.push(text);
        self
    }

    pub fn push_legend_entry(&mut self, entry: LegendEntry) -> &mut Self {
        self.legend.push(entry);
        self
    }

    /// Draw `h` with its variant's default plot kind.
    pub fn plot<H: Plottable + ?Sized>(
        &mut self,
        h: &H,
        attrs: &PlotAttributes,
    ) -> Result<&mut Self> {
        self.plot_as(h, h.variant().default_plot_kind(), attrs)
    }

    /// Draw `h` as `kind`; fails without touching the panel when unsupported.
    pub fn plot_as<H: Plottable + ?Sized>(
        &mut self,
        h: &H,
        kind: PlotKind,
        attrs: &PlotAttributes,
    ) -> Result<&mut Self> {
        let plot = h.to_plot(kind, attrs)?;
        if let Some(label) = &attrs.label {
            let swatch = match &plot {
                Plot::BarPlot(b) => b.colors.first().map(|c| Swatch::Patch(*c)),
                Plot::Stairs(s) => Some(Swatch::Line(s.color)),
                Plot::Scatter(s) => Some(Swatch::Marker(s.color)),
                Plot::ErrorBars(e) => Some(Swatch::Line(e.color)),
                Plot::CrossBar(c) => Some(Swatch::Patch(c.color)),
                Plot::HLine(_) | Plot::Heatmap(_) => None,
            };
            self.legend.push(LegendEntry { label: label.clone(), value: None, swatch });
        }
        Ok(self.push(plot))
    }

    pub fn stairs<H: Plottable + ?Sized>(
        &mut self,
        h: &H,
        attrs: &PlotAttributes,
    ) -> Result<&mut Self> {
        self.plot_as(h, PlotKind::Stairs, attrs)
    }

    pub fn scatter<H: Plottable + ?Sized>(
        &mut self,
        h: &H,
        attrs: &PlotAttributes,
    ) -> Result<&mut Self> {
        self.plot_as(h, PlotKind::Scatter, attrs)
    }

    pub fn barplot<H: Plottable + ?Sized>(
        &mut self,
        h: &H,
        attrs: &PlotAttributes,
    ) -> Result<&mut Self> {
        self.plot_as(h, PlotKind::BarPlot, attrs)
    }

    pub fn errorbars<H: Plottable + ?Sized>(
        &mut self,
        h: &H,
        attrs: &PlotAttributes,
    ) -> Result<&mut Self> {
        self.plot_as(h, PlotKind::ErrorBars, attrs)
    }

    pub fn crossbar<H: Plottable + ?Sized>(
        &mut self,
        h: &H,
        attrs: &PlotAttributes,
    ) -> Result<&mut Self> {
        self.plot_as(h, PlotKind::CrossBar, attrs)
    }

    pub fn heatmap<H: Plottable + ?Sized>(
        &mut self,
        h: &H,
        attrs: &PlotAttributes,
    ) -> Result<&mut Self> {
        self.plot_as(h, PlotKind::Heatmap, attrs)
    }
}

/// Figure: panels and legend boxes laid out on a grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Figure {
    pub width: f64,
    pub height: f64,
    panels: Vec<(GridPos, Panel)>,
    legends: Vec<(GridPos, LegendBox)>,
}

impl Default for Figure {
    fn default() -> Self {
        Self::new(518.4, 388.8)
    }
}

impl Figure {
    /// Empty figure; size in points.
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height, panels: Vec::new(), legends: Vec::new() }
    }

    /// Panel at `pos`, created empty on first access.
    pub fn panel_mut(&mut self, pos: impl Into<GridPos>) -> &mut Panel {
        let pos = pos.into();
        let idx = match self.panels.iter().position(|(p, _)| *p == pos) {
            Some(i) => i,
            None => {
                self.panels.push((pos, Panel::new()));
                self.panels.len() - 1
            }
        };
        &mut self.panels[idx].1
    }

    pub fn panel(&self, pos: impl Into<GridPos>) -> Option<&Panel> {
        let pos = pos.into();
        self.panels.iter().find(|(p, _)| *p == pos).map(|(_, panel)| panel)
    }

    pub fn panels(&self) -> &[(GridPos, Panel)] {
        &self.panels
    }

    /// Put a legend box at `pos`, replacing any legend already there.
    pub fn insert_legend(&mut self, pos: impl Into<GridPos>, legend: LegendBox) -> &mut Self {
        let pos = pos.into();
        match self.legends.iter_mut().find(|(p, _)| *p == pos) {
            Some((_, slot)) => *slot = legend,
            None => self.legends.push((pos, legend)),
        }
        self
    }

    pub fn legend(&self, pos: impl Into<GridPos>) -> Option<&LegendBox> {
        let pos = pos.into();
        self.legends.iter().find(|(p, _)| *p == pos).map(|(_, l)| l)
    }

    pub fn legends(&self) -> &[(GridPos, LegendBox)] {
        &self.legends
    }

    /// `(rows, cols)` spanned by panels and legends; `(0, 0)` when empty.
    pub fn grid_shape(&self) -> (usize, usize) {
        self.panels
            .iter()
            .map(|(p, _)| *p)
            .chain(self.legends.iter().map(|(p, _)| *p))
            .fold((0, 0), |(r, c), p| (r.max(p.row + 1), c.max(p.col + 1)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn panels_are_created_once() {
        let mut fig = Figure::default();
        fig.panel_mut((0, 0)).title = "a".into();
        fig.panel_mut((0, 0)).xlabel = "x".into();
        fig.panel_mut((1, 0));
        assert_eq!(fig.panels().len(), 2);
        assert_eq!(fig.panel((0, 0)).unwrap().title, "a");
        assert_eq!(fig.grid_shape(), (2, 1));
    }

    #[test]
    fn legend_slot_is_replaced() {
        let mut fig = Figure::default();
        fig.insert_legend((0, 2), LegendBox { title: Some("one".into()), entries: vec![] });
        fig.insert_legend((0, 2), LegendBox { title: Some("two".into()), entries: vec![] });
        assert_eq!(fig.legends().len(), 1);
        assert_eq!(fig.legend((0, 2)).unwrap().title.as_deref(), Some("two"));
        assert_eq!(fig.grid_shape(), (1, 3));
    }

    #[test]
    fn empty_figure_has_no_grid() {
        assert_eq!(Figure::new(10.0, 10.0).grid_shape(), (0, 0));
    }
}
