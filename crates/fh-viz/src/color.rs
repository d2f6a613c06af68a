use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Parse `#rrggbb`, `#rrggbbaa` or a small set of named colors.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if let Some(named) = named_color(s) {
            return Some(named);
        }
        let hex = s.strip_prefix('#').unwrap_or(s);
        if !(hex.len() == 6 || hex.len() == 8) || !hex.is_ascii() {
            return None;
        }
        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        let (r, g, b) = (byte(0)?, byte(2)?, byte(4)?);
        let a = if hex.len() == 8 { byte(6)? as f64 / 255.0 } else { 1.0 };
        Some(Self { r, g, b, a })
    }

    /// Like [`Color::parse`] but falls back to black on malformed input.
    pub fn hex(s: &str) -> Self {
        Self::parse(s).unwrap_or(Self::BLACK)
    }

    pub const fn with_alpha(mut self, a: f64) -> Self {
        self.a = a;
        self
    }

    pub fn to_svg_fill(&self) -> String {
        if (self.a - 1.0).abs() < 1e-6 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("rgba({},{},{},{:.3})", self.r, self.g, self.b, self.a)
        }
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Linear interpolation between two colors (for colormaps).
    pub fn lerp(a: Color, b: Color, t: f64) -> Color {
        let t = t.clamp(0.0, 1.0);
        Color {
            r: (a.r as f64 * (1.0 - t) + b.r as f64 * t).round() as u8,
            g: (a.g as f64 * (1.0 - t) + b.g as f64 * t).round() as u8,
            b: (a.b as f64 * (1.0 - t) + b.b as f64 * t).round() as u8,
            a: a.a * (1.0 - t) + b.a * t,
        }
    }
}

fn named_color(s: &str) -> Option<Color> {
    let c = match s.to_ascii_lowercase().as_str() {
        "black" => Color::BLACK,
        "white" => Color::WHITE,
        "gray" | "grey" => Color::rgb(128, 128, 128),
        "red" => Color::rgb(255, 0, 0),
        "green" => Color::rgb(0, 128, 0),
        "blue" => Color::rgb(0, 0, 255),
        "orange" => Color::rgb(255, 165, 0),
        "purple" => Color::rgb(128, 0, 128),
        _ => return None,
    };
    Some(c)
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_svg_fill())
    }
}

impl Serialize for Color {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        if (self.a - 1.0).abs() < 1e-6 {
            serializer.serialize_str(&self.to_hex())
        } else {
            let a = (self.a.clamp(0.0, 1.0) * 255.0).round() as u8;
            serializer.serialize_str(&format!("{}{:02x}", self.to_hex(), a))
        }
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Color::parse(&s).ok_or_else(|| serde::de::Error::custom(format!("invalid color: {s}")))
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

// --- Palettes ---

pub const FIGHIST: &[&str] = &[
    "#4C78A8", "#F58518", "#54A24B", "#E45756", "#72B7B2", "#EECA3B", "#B279A2", "#FF9DA6",
    "#9D755D", "#BAB0AC",
];

pub const ATLAS_WONG: &[&str] =
    &["#0072b2", "#d55e00", "#56b4e9", "#e69f00", "#f0e442", "#009e73", "#cc79a7"];

pub const CMS_PETROFF6: &[&str] =
    &["#5790fc", "#f89c20", "#e42536", "#964a8b", "#9c9ca1", "#7a21dd"];

pub const TABLEAU10: &[&str] = &[
    "#4e79a7", "#f28e2b", "#e15759", "#76b7b2", "#59a14f", "#edc948", "#b07aa1", "#ff9da7",
    "#9c755f", "#bab0ab",
];

pub fn palette_colors(name: &str) -> Vec<Color> {
    let strs = match name {
        "fighist" => FIGHIST,
        "atlas_wong" => ATLAS_WONG,
        "cms_petroff6" => CMS_PETROFF6,
        "tableau10" => TABLEAU10,
        _ => FIGHIST,
    };
    strs.iter().map(|s| Color::hex(s)).collect()
}

// --- Sequential colormap for heatmaps ---

const VIRIDIS_STOPS: &[&str] = &[
    "#440154", "#482878", "#3e4a89", "#31688e", "#26828e", "#1f9e89", "#35b779", "#6ece58",
    "#b5de2b", "#fde725",
];

/// Viridis, `t` in `[0, 1]`.
pub fn viridis(t: f64) -> Color {
    let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
    let n = VIRIDIS_STOPS.len() - 1;
    let pos = t * n as f64;
    let i = (pos.floor() as usize).min(n - 1);
    Color::lerp(Color::hex(VIRIDIS_STOPS[i]), Color::hex(VIRIDIS_STOPS[i + 1]), pos - i as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_parsing() {
        let c = Color::hex("#1D4ED8");
        assert_eq!(c.r, 0x1D);
        assert_eq!(c.g, 0x4E);
        assert_eq!(c.b, 0xD8);
        assert!((c.a - 1.0).abs() < 1e-9);
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(Color::parse("#12").is_none());
        assert!(Color::parse("zzzzzz").is_none());
        assert_eq!(Color::hex("#12"), Color::BLACK);
        assert_eq!(Color::parse("Gray"), Some(Color::rgb(128, 128, 128)));
        let c = Color::parse("#ff000080").unwrap();
        assert!((c.a - 128.0 / 255.0).abs() < 1e-9);
    }

    #[test]
    fn svg_fill_alpha() {
        let c = Color::rgb(29, 78, 216).with_alpha(0.5);
        assert_eq!(c.to_svg_fill(), "rgba(29,78,216,0.500)");
        assert_eq!(Color::rgb(29, 78, 216).to_svg_fill(), "#1d4ed8");
    }

    #[test]
    fn palette_lookup() {
        assert_eq!(palette_colors("fighist").len(), 10);
        assert_eq!(palette_colors("atlas_wong").len(), 7);
        assert_eq!(palette_colors("cms_petroff6").len(), 6);
        assert_eq!(palette_colors("unknown"), palette_colors("fighist"));
    }

    #[test]
    fn viridis_endpoints() {
        assert_eq!(viridis(0.0), Color::hex("#440154"));
        assert_eq!(viridis(1.0), Color::hex("#fde725"));
    }
}
