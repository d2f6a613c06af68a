use fh_hist::{Hist1D, Hist2D};
use fh_viz::recipes::{RatioConfig, StackedConfig, StackedHist, ratiohist_pair};
use fh_viz::{Figure, PlotAttributes, Scale, collab_text, statbox};
use fh_viz_render::config::{VizConfig, resolve_config};
use fh_viz_render::{RenderError, render_svg, render_to_bytes, render_to_file};

fn hist(counts: &[f64]) -> Hist1D {
    let edges = (0..=counts.len()).map(|i| i as f64).collect();
    Hist1D::from_counts(edges, counts.to_vec(), None).expect("valid histogram")
}

#[test]
fn stacked_figure_has_bars_whiskers_and_legend() {
    let a = hist(&[3.0, 5.0, 2.0]);
    let b = hist(&[1.0, 2.0, 4.0]);
    let mut fig = Figure::default();
    let panel = fig.panel_mut((0, 0));
    panel.xlabel = "m [GeV]".into();
    panel.ylabel = "Events".into();
    let config = StackedConfig { labels: vec!["bkg".into(), "sig".into()], ..Default::default() };
    StackedHist::new([&a, &b]).with_config(config).render(panel).expect("stack renders");
    collab_text(panel, "lt", "FigHist", "Internal").expect("valid anchor");

    let svg = render_svg(&fig, &VizConfig::default()).expect("svg");
    assert!(svg.starts_with("<svg"));
    assert!(svg.contains("clipPath"));
    assert!(svg.contains("m [GeV]"));
    assert!(svg.contains("Events"));
    assert!(svg.contains(">bkg<") && svg.contains(">sig<"));
    assert!(svg.contains(r#"xml:space="preserve">FigHist</tspan>"#));
    // Six bars plus background, legend frame and swatches at least.
    assert!(svg.matches("<rect").count() >= 6 + 1 + 2);
}

#[test]
fn ratio_panel_draws_dash_dot_reference() {
    let mut fig = Figure::default();
    let (num, den) = (hist(&[4.0, 6.0]), hist(&[2.0, 3.0]));
    ratiohist_pair(fig.panel_mut((0, 0)), &num, &den, RatioConfig::default())
        .expect("ratio renders");
    let svg = render_svg(&fig, &VizConfig::default()).expect("svg");
    assert!(svg.contains(r#"stroke-dasharray="6 2 1.5 2""#));
    assert!(svg.contains("<circle"));
}

#[test]
fn heatmap_and_statbox_layout() {
    let mut h = Hist2D::new(vec![0.0, 1.0, 2.0], vec![0.0, 1.0, 2.0]).expect("valid edges");
    h.push(0.5, 0.5);
    h.push(1.5, 1.5);
    h.push(1.5, 1.5);
    let mut fig = Figure::default();
    fig.panel_mut((0, 0)).plot(&h, &PlotAttributes::default()).expect("heatmap");
    statbox(&mut fig, &h, (0, 1));

    let svg = render_svg(&fig, &VizConfig::default()).expect("svg");
    assert!(svg.contains("Entries"));
    assert!(svg.contains("Std Dev"));
    // viridis endpoints are used by the colorbar.
    assert!(svg.contains("#440154") || svg.contains("#fde725"));
}

#[test]
fn log_scale_renders_power_labels() {
    let mut fig = Figure::default();
    let panel = fig.panel_mut((0, 0));
    panel.plot(&hist(&[1.0, 100.0, 1000.0]), &PlotAttributes::default()).expect("bars");
    panel.yscale = Scale::Log;
    let svg = render_svg(&fig, &VizConfig::default()).expect("svg");
    assert!(svg.contains("10\u{00B3}"));
}

#[test]
fn config_font_family_reaches_the_svg() {
    let config = resolve_config(None, Some("font:\n  family: Courier\n")).expect("config");
    let mut fig = Figure::default();
    fig.panel_mut((0, 0)).stairs(&hist(&[1.0, 2.0]), &PlotAttributes::default()).expect("stairs");
    let svg = render_svg(&fig, &config).expect("svg");
    assert!(svg.contains(r#"font-family="Courier""#));
    assert!(svg.contains("<polyline"));
}

#[test]
fn invalid_figure_size_is_a_layout_error() {
    let fig = Figure::new(0.0, 100.0);
    assert!(matches!(render_svg(&fig, &VizConfig::default()), Err(RenderError::Layout(_))));
}

#[test]
fn json_and_unknown_formats() {
    let mut fig = Figure::default();
    fig.panel_mut((0, 0)).plot(&hist(&[1.0]), &PlotAttributes::default()).expect("bars");
    let bytes = render_to_bytes(&fig, "json", &VizConfig::default()).expect("json");
    let value: serde_json::Value = serde_json::from_slice(&bytes).expect("valid json");
    assert_eq!(value["panels"][0][1]["plots"][0]["type"], "bar_plot");
    assert!(matches!(
        render_to_bytes(&fig, "bmp", &VizConfig::default()),
        Err(RenderError::UnsupportedFormat(f)) if f == "bmp"
    ));
}

#[test]
fn render_to_file_creates_parent_dirs() {
    let dir = std::env::temp_dir().join(format!("fh-viz-render-test-{}", std::process::id()));
    let path = dir.join("nested").join("plot.svg");
    let mut fig = Figure::default();
    fig.panel_mut((0, 0)).plot(&hist(&[1.0, 2.0]), &PlotAttributes::default()).expect("bars");
    render_to_file(&fig, &path, &VizConfig::default()).expect("write");
    let text = std::fs::read_to_string(&path).expect("read back");
    assert!(text.contains("</svg>"));
    let _ = std::fs::remove_dir_all(&dir);
}
