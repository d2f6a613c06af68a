//! fighist CLI

mod input;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::{Path, PathBuf};

use fh_viz::recipes::{ErrorDisplay, RatioConfig, StackedConfig, StackedHist};
use fh_viz::{
    Color, Figure, Panel, PlotAttributes, PlotKind, Plottable, RatioHist, Scale, StatSummary,
};
use fh_viz_render::config::{VizConfig, load_config, resolve_config};

use crate::input::{HistFile, read_1d};

#[derive(Parser)]
#[command(name = "fighist")]
#[command(about = "FigHist - histogram plot recipes")]
#[command(version)]
struct Cli {
    /// Log verbosity level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "warn")]
    log_level: tracing::Level,

    /// YAML config overriding the theme defaults
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Builtin theme (fighist, atlas, cms, minimal)
    #[arg(long, global = true)]
    theme: Option<String>,

    /// Collaboration label brand. Defaults to the theme's.
    #[arg(long, global = true)]
    collab: Option<String>,

    /// Status word after the brand (e.g. "Preliminary")
    #[arg(long, global = true)]
    status: Option<String>,

    /// Collaboration label position: lt or rt
    #[arg(long, global = true)]
    anchor: Option<String>,

    /// Skip the collaboration label.
    #[arg(long, global = true)]
    no_collab: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Panel decorations shared by every subcommand.
#[derive(clap::Args)]
struct PanelArgs {
    #[arg(long, default_value = "")]
    title: String,

    #[arg(long, default_value = "")]
    xlabel: String,

    #[arg(long, default_value = "")]
    ylabel: String,

    /// Logarithmic y axis
    #[arg(long)]
    log_y: bool,

    /// Output file; format from the extension (svg, json, png, pdf). Defaults to stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Stack several 1D histograms with a combined uncertainty
    Stack {
        /// Input histograms, bottom to top
        #[arg(short, long = "input", required = true)]
        inputs: Vec<PathBuf>,

        /// Legend labels, comma separated
        #[arg(long, value_delimiter = ',')]
        labels: Vec<String>,

        /// Bar colors (#rrggbb or names), comma separated. Defaults to the palette.
        #[arg(long, value_delimiter = ',')]
        colors: Vec<String>,

        /// Draw the uncertainty as a shaded band instead of whiskers
        #[arg(long)]
        band: bool,

        /// Fraction of each bin left empty between bars
        #[arg(long, default_value = "0")]
        gap: f64,

        #[command(flatten)]
        panel: PanelArgs,
    },

    /// Ratio of two 1D histograms with a reference line at 1
    Ratio {
        #[arg(long)]
        num: PathBuf,

        #[arg(long)]
        den: PathBuf,

        /// Hide the error bars
        #[arg(long)]
        no_errors: bool,

        #[command(flatten)]
        panel: PanelArgs,
    },

    /// Draw one histogram with its default or a chosen plot kind
    Draw {
        #[arg(short, long)]
        input: PathBuf,

        /// bar, stairs, scatter, errorbars, crossbar or heatmap
        #[arg(long, value_parser = parse_kind)]
        kind: Option<PlotKind>,

        /// Add a statistics box next to the panel
        #[arg(long)]
        statbox: bool,

        /// Legend label for the histogram
        #[arg(long)]
        label: Option<String>,

        #[arg(long)]
        color: Option<String>,

        #[command(flatten)]
        panel: PanelArgs,
    },
}

fn parse_kind(s: &str) -> std::result::Result<PlotKind, String> {
    PlotKind::parse(s).ok_or_else(|| format!("unknown plot kind {s:?}"))
}

fn parse_color(s: &str) -> Result<Color> {
    Color::parse(s).ok_or_else(|| anyhow::anyhow!("invalid color {s:?}"))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Figures may go to stdout, so logs go to stderr.
    tracing_subscriber::fmt()
        .with_max_level(cli.log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = load_viz_config(cli.config.as_deref(), cli.theme.as_deref())?;
    let mut fig = Figure::new(config.figure.width, config.figure.height);

    let panel_args = match &cli.command {
        Commands::Stack { inputs, labels, colors, band, gap, panel } => {
            cmd_stack(&mut fig, inputs, labels, colors, *band, *gap, &config)?;
            panel
        }
        Commands::Ratio { num, den, no_errors, panel } => {
            cmd_ratio(&mut fig, num, den, *no_errors)?;
            panel
        }
        Commands::Draw { input, kind, statbox, label, color, panel } => {
            cmd_draw(&mut fig, input, *kind, *statbox, label.as_deref(), color.as_deref())?;
            panel
        }
    };

    decorate(fig.panel_mut((0, 0)), panel_args, &cli, &config)?;
    write_figure(&fig, panel_args.output.as_ref(), &config)
}

fn load_viz_config(path: Option<&Path>, theme: Option<&str>) -> Result<VizConfig> {
    let config = match path {
        Some(p) => load_config(p, theme)
            .map_err(|e| anyhow::anyhow!("failed to load config {}: {e}", p.display()))?,
        None => resolve_config(theme, None)?,
    };
    tracing::debug!(theme = %config.theme, "config resolved");
    Ok(config)
}

fn cmd_stack(
    fig: &mut Figure,
    inputs: &[PathBuf],
    labels: &[String],
    colors: &[String],
    band: bool,
    gap: f64,
    config: &VizConfig,
) -> Result<()> {
    let hists = inputs.iter().map(|p| read_1d(p)).collect::<Result<Vec<_>>>()?;
    let colors = if colors.is_empty() {
        config.palette_colors()
    } else {
        colors.iter().map(|c| parse_color(c)).collect::<Result<Vec<_>>>()?
    };
    let stacked = StackedConfig {
        colors,
        error_display: if band { ErrorDisplay::Band } else { ErrorDisplay::Bar },
        gap,
        labels: labels.to_vec(),
        ..Default::default()
    };
    StackedHist::new(&hists).with_config(stacked).render(fig.panel_mut((0, 0)))?;
    tracing::info!(series = hists.len(), "stack drawn");
    Ok(())
}

fn cmd_ratio(fig: &mut Figure, num: &Path, den: &Path, no_errors: bool) -> Result<()> {
    let (n, d) = (read_1d(num)?, read_1d(den)?);
    let ratio = RatioHist::from_pair(&n, &d)?
        .with_config(RatioConfig { errors: !no_errors, ..Default::default() });
    ratio.render(fig.panel_mut((0, 0)))?;
    tracing::info!(bins = ratio.hist().n_bins(), "ratio drawn");
    Ok(())
}

fn cmd_draw(
    fig: &mut Figure,
    input: &Path,
    kind: Option<PlotKind>,
    statbox: bool,
    label: Option<&str>,
    color: Option<&str>,
) -> Result<()> {
    let mut attrs = PlotAttributes::default();
    if let Some(c) = color {
        attrs = attrs.with_color(parse_color(c)?);
    }
    if let Some(l) = label {
        attrs = attrs.with_label(l);
    }

    match HistFile::read(input)? {
        HistFile::One(h) => draw_hist(fig, &h, kind, statbox, &attrs),
        HistFile::Two(h) => draw_hist(fig, &h, kind, statbox, &attrs),
    }
}

fn draw_hist<H: Plottable + StatSummary>(
    fig: &mut Figure,
    h: &H,
    kind: Option<PlotKind>,
    statbox: bool,
    attrs: &PlotAttributes,
) -> Result<()> {
    let kind = kind.unwrap_or_else(|| h.variant().default_plot_kind());
    fig.panel_mut((0, 0)).plot_as(h, kind, attrs)?;
    tracing::info!(variant = %h.variant(), %kind, "histogram drawn");
    if statbox {
        fh_viz::statbox(fig, h, (0, 1));
    }
    Ok(())
}

/// Titles, labels, y scale and the collaboration label.
fn decorate(panel: &mut Panel, args: &PanelArgs, cli: &Cli, config: &VizConfig) -> Result<()> {
    if !args.title.is_empty() {
        panel.title = args.title.clone();
    }
    if !args.xlabel.is_empty() {
        panel.xlabel = args.xlabel.clone();
    }
    if !args.ylabel.is_empty() {
        panel.ylabel = args.ylabel.clone();
    }
    if args.log_y {
        panel.yscale = Scale::Log;
    }

    let brand = cli.collab.as_deref().unwrap_or(&config.collab.brand);
    if cli.no_collab || brand.is_empty() {
        return Ok(());
    }
    let status = cli.status.as_deref().unwrap_or(&config.collab.status);
    let anchor = cli.anchor.as_deref().unwrap_or(&config.collab.anchor);
    fh_viz::collab_text(panel, anchor, brand, status)?;
    Ok(())
}

fn write_figure(fig: &Figure, output: Option<&PathBuf>, config: &VizConfig) -> Result<()> {
    match output {
        Some(path) => {
            fh_viz_render::render_to_file(fig, path, config)
                .map_err(|e| anyhow::anyhow!("failed to write {}: {e}", path.display()))?;
            tracing::info!(path = %path.display(), "figure written");
        }
        None => {
            let bytes = fh_viz_render::render_to_bytes(fig, &config.output.format, config)?;
            std::io::stdout().write_all(&bytes)?;
        }
    }
    Ok(())
}
