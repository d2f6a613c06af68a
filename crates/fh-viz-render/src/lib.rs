//! Renderer for [`fh_viz::Figure`]s: SVG natively, PNG and PDF behind features.
//!
//! ```
//! use fh_hist::Hist1D;
//! use fh_viz::{Figure, PlotAttributes};
//! use fh_viz_render::{config::VizConfig, render_svg};
//!
//! let h = Hist1D::from_counts(vec![0.0, 1.0, 2.0], vec![3.0, 5.0], None).unwrap();
//! let mut fig = Figure::default();
//! fig.panel_mut((0, 0)).plot(&h, &PlotAttributes::default()).unwrap();
//! let svg = render_svg(&fig, &VizConfig::default()).unwrap();
//! assert!(svg.starts_with("<svg"));
//! ```

#![warn(clippy::all)]

pub mod canvas;
pub mod config;
pub mod font;
pub mod layout;
pub mod output;
pub mod plots;
pub mod primitives;
pub mod text;
pub mod theme;

use std::path::Path;

use fh_viz::Figure;
use thiserror::Error;

use crate::canvas::Canvas;
use crate::config::VizConfig;
use crate::layout::grid::GridLayout;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("config error: {0}")]
    Config(String),
    #[error("layout error: {0}")]
    Layout(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported output format: {0}")]
    UnsupportedFormat(String),
    #[cfg(feature = "png")]
    #[error("PNG encoding error: {0}")]
    Png(String),
    #[cfg(feature = "pdf")]
    #[error("PDF conversion error: {0}")]
    Pdf(String),
}

pub type Result<T> = std::result::Result<T, RenderError>;

/// Render `figure` to an SVG document.
pub fn render_svg(figure: &Figure, config: &VizConfig) -> Result<String> {
    let (w, h) = (figure.width, figure.height);
    if !(w.is_finite() && h.is_finite()) || w <= 0.0 || h <= 0.0 {
        return Err(RenderError::Layout(format!("invalid figure size {w} x {h}")));
    }

    let mut canvas = Canvas::new(w, h).with_font_family(config.font.family.clone());
    let grid = GridLayout::new(figure, w, h);
    log::debug!(
        "render: {} panels, {} legend boxes on a {:?} grid",
        figure.panels().len(),
        figure.legends().len(),
        grid.shape()
    );

    for (pos, panel) in figure.panels() {
        let cell = grid.cell(*pos).ok_or_else(|| {
            RenderError::Layout(format!("panel ({}, {}) outside grid", pos.row, pos.col))
        })?;
        plots::panel::draw_panel(&mut canvas, &cell, panel, config)?;
    }

    let legend_font = config.font.size * config.legend.font_scale;
    for (pos, legend) in figure.legends() {
        let cell = grid.cell(*pos).ok_or_else(|| {
            RenderError::Layout(format!("legend ({}, {}) outside grid", pos.row, pos.col))
        })?;
        layout::legend::draw_legend_box(&mut canvas, &cell, legend, legend_font);
    }

    Ok(canvas.finish_svg())
}

/// Render `figure` to bytes: `svg`, `json` (the figure model), `png` or `pdf`.
pub fn render_to_bytes(figure: &Figure, format: &str, config: &VizConfig) -> Result<Vec<u8>> {
    match format.to_ascii_lowercase().as_str() {
        "svg" => Ok(render_svg(figure, config)?.into_bytes()),
        "json" => Ok(serde_json::to_vec_pretty(figure)?),
        #[cfg(feature = "png")]
        "png" => output::png::svg_to_png(&render_svg(figure, config)?, config.output.dpi),
        #[cfg(feature = "pdf")]
        "pdf" => output::pdf::svg_to_pdf(&render_svg(figure, config)?),
        other => Err(RenderError::UnsupportedFormat(other.to_string())),
    }
}

/// Render `figure` to `path`; the format follows the extension, else `config.output.format`.
pub fn render_to_file(figure: &Figure, path: &Path, config: &VizConfig) -> Result<()> {
    let format = path.extension().and_then(|e| e.to_str()).unwrap_or(&config.output.format);
    let bytes = render_to_bytes(figure, format, config)?;
    output::svg::save_bytes(&bytes, path)?;
    log::info!("wrote {} ({} bytes)", path.display(), bytes.len());
    Ok(())
}
