//! Annotations: statistics boxes and collaboration labels.

use fh_hist::{Hist1D, Hist2D};

use crate::color::Color;
use crate::error::{Result, VizError};
use crate::figure::{
    Figure, FontStyle, FontWeight, GridPos, LegendBox, LegendEntry, Panel, TextAnnotation,
    TextSpan,
};

/// Significant digits shown in statistics boxes.
pub const STAT_DIGITS: i32 = 2;

/// Round `x` to `digits` significant digits. Zero and non-finite values pass through.
pub fn round_sig(x: f64, digits: i32) -> f64 {
    if x == 0.0 || !x.is_finite() || digits <= 0 {
        return x;
    }
    // Decimal formatting rounds exactly, including subnormals where a power-of-ten scale overflows.
    format!("{:.*e}", (digits - 1) as usize, x).parse().unwrap_or(x)
}

/// Compact display of a rounded statistic: integers without a decimal point.
fn fmt_stat(x: f64) -> String {
    let r = round_sig(x, STAT_DIGITS);
    if r.is_finite() && r.fract() == 0.0 && r.abs() < 1e15 {
        format!("{}", r as i64)
    } else {
        format!("{r}")
    }
}

/// Histogram summary shown in a statistics box.
pub trait StatSummary {
    /// `(label, value)` rows in display order.
    fn stat_rows(&self) -> Vec<(&'static str, String)>;
}

impl StatSummary for Hist1D {
    fn stat_rows(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Entries", fmt_stat(self.entries() as f64)),
            ("Mean", fmt_stat(self.mean())),
            ("Std Dev", fmt_stat(self.std())),
            ("Overflow", fmt_stat(self.overflow())),
        ]
    }
}

impl StatSummary for Hist2D {
    fn stat_rows(&self) -> Vec<(&'static str, String)> {
        let (mx, my) = self.mean();
        let (sx, sy) = self.std();
        vec![
            ("Entries", fmt_stat(self.entries() as f64)),
            ("Mean", format!("({}, {})", fmt_stat(mx), fmt_stat(my))),
            ("Std Dev", format!("({}, {})", fmt_stat(sx), fmt_stat(sy))),
            ("Overflow", fmt_stat(self.overflow())),
        ]
    }
}

/// Put a statistics box for `h` into its own grid cell at `pos`.
pub fn statbox<'f, H: StatSummary + ?Sized>(
    fig: &'f mut Figure,
    h: &H,
    pos: impl Into<GridPos>,
) -> &'f mut Figure {
    let entries = h
        .stat_rows()
        .into_iter()
        .map(|(label, value)| LegendEntry {
            label: label.to_string(),
            value: Some(value),
            swatch: None,
        })
        .collect();
    let pos = pos.into();
    log::debug!("statbox at ({}, {})", pos.row, pos.col);
    fig.insert_legend(pos, LegendBox { title: None, entries })
}

/// Where a collaboration label is placed inside a panel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Anchor {
    /// Upper left, `"lt"`.
    LeftTop,
    /// Upper right, `"rt"`.
    RightTop,
    /// Explicit panel-relative position.
    Relative(f64, f64),
}

impl Anchor {
    /// Panel-relative position, y up.
    pub fn position(&self) -> (f64, f64) {
        match *self {
            Anchor::LeftTop => (0.04, 0.94),
            Anchor::RightTop => (0.70, 0.94),
            Anchor::Relative(x, y) => (x, y),
        }
    }
}

/// Conversion of user input into an [`Anchor`].
pub trait IntoAnchor {
    fn into_anchor(self) -> Result<Anchor>;
}

impl IntoAnchor for Anchor {
    fn into_anchor(self) -> Result<Anchor> {
        Ok(self)
    }
}

impl IntoAnchor for (f64, f64) {
    fn into_anchor(self) -> Result<Anchor> {
        Ok(Anchor::Relative(self.0, self.1))
    }
}

impl IntoAnchor for &str {
    fn into_anchor(self) -> Result<Anchor> {
        match self {
            "lt" => Ok(Anchor::LeftTop),
            "rt" => Ok(Anchor::RightTop),
            other => Err(VizError::InvalidAnchor(other.to_string())),
        }
    }
}

impl IntoAnchor for &String {
    fn into_anchor(self) -> Result<Anchor> {
        self.as_str().into_anchor()
    }
}

/// Text size of collaboration labels, in points.
pub const COLLAB_TEXT_SIZE: f64 = 13.0;

/// Add a "<brand> <status>" label: brand bold italic, status regular.
///
/// An invalid anchor is rejected before the panel is touched.
pub fn collab_text<'p>(
    panel: &'p mut Panel,
    anchor: impl IntoAnchor,
    brand: &str,
    status: &str,
) -> Result<&'p mut Panel> {
    let anchor = anchor.into_anchor()?;
    let mut spans = vec![TextSpan {
        text: brand.to_string(),
        weight: FontWeight::Bold,
        style: FontStyle::Italic,
    }];
    if !status.is_empty() {
        spans.push(TextSpan::regular(format!(" {status}")));
    }
    Ok(panel.push_text(TextAnnotation {
        position: anchor.position(),
        spans,
        size: COLLAB_TEXT_SIZE,
        color: Color::BLACK,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn rounds_to_significant_digits() {
        assert_eq!(round_sig(1234.0, 2), 1200.0);
        assert_eq!(round_sig(0.012345, 2), 0.012);
        assert_eq!(round_sig(-5.678, 2), -5.7);
        assert_eq!(round_sig(0.0, 2), 0.0);
        assert!(round_sig(f64::NAN, 2).is_nan());
    }

    #[test]
    fn round_sig_tiny_values_stay_finite() {
        assert_eq!(round_sig(5e-324, 2), 5e-324);
        assert_eq!(round_sig(1.2345e-310, 2), 1.2e-310);
        assert_eq!(round_sig(1.2345e300, 3), 1.23e300);
        assert!(!fmt_stat(5e-324).contains("NaN"));
    }

    #[test]
    fn statbox_lists_rounded_stats() {
        let mut h = Hist1D::uniform(10, 0.0, 10.0).unwrap();
        h.extend_from_slice(&[1.2, 2.7, 3.3, 12.0]);
        let mut fig = Figure::default();
        statbox(&mut fig, &h, (0, 1));
        let legend = fig.legend((0, 1)).unwrap();
        let labels: Vec<_> = legend.entries.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, vec!["Entries", "Mean", "Std Dev", "Overflow"]);
        assert_eq!(legend.entries[0].value.as_deref(), Some("4"));
        assert_eq!(legend.entries[1].value.as_deref(), Some("2.5"));
        assert_eq!(legend.entries[3].value.as_deref(), Some("1"));
    }

    #[test]
    fn statbox_2d_formats_pairs() {
        let mut h = Hist2D::new(vec![0.0, 1.0, 2.0], vec![0.0, 2.0, 4.0]).unwrap();
        h.push(0.5, 1.0);
        h.push(1.5, 3.0);
        let mut fig = Figure::default();
        statbox(&mut fig, &h, (0, 0));
        let legend = fig.legend((0, 0)).unwrap();
        assert_eq!(legend.entries[1].value.as_deref(), Some("(1, 2)"));
    }

    #[test]
    fn anchors() {
        assert_eq!("lt".into_anchor().unwrap().position(), (0.04, 0.94));
        assert_eq!("rt".into_anchor().unwrap().position(), (0.70, 0.94));
        assert_eq!((0.2, 0.3).into_anchor().unwrap().position(), (0.2, 0.3));
        assert!(matches!("top".into_anchor(), Err(VizError::InvalidAnchor(s)) if s == "top"));
        for bad in ["lb", "rb", "tl", "LT", ""] {
            assert!(
                matches!(bad.into_anchor(), Err(VizError::InvalidAnchor(ref s)) if s == bad),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn collab_text_spans() {
        let mut panel = Panel::new();
        collab_text(&mut panel, "rt", "FigHist", "Preliminary").unwrap();
        let text = &panel.texts()[0];
        assert_abs_diff_eq!(text.position.0, 0.70);
        assert_eq!(text.spans[0].weight, FontWeight::Bold);
        assert_eq!(text.spans[0].style, FontStyle::Italic);
        assert_eq!(text.spans[1].weight, FontWeight::Regular);
        assert_eq!(text.plain_text(), "FigHist Preliminary");
    }

    #[test]
    fn invalid_anchor_leaves_panel_untouched() {
        let mut panel = Panel::new();
        assert!(collab_text(&mut panel, "middle", "FigHist", "").is_err());
        assert!(panel.is_empty());
    }
}
