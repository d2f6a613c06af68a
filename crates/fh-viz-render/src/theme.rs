use fh_viz::Color;

use crate::config::*;

/// Built-in theme presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinTheme {
    Fighist,
    Atlas,
    Cms,
    Minimal,
}

impl BuiltinTheme {
    pub const NAMES: [&'static str; 4] = ["fighist", "atlas", "cms", "minimal"];

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "fighist" | "default" => Some(Self::Fighist),
            "atlas" => Some(Self::Atlas),
            "cms" => Some(Self::Cms),
            "minimal" => Some(Self::Minimal),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Fighist => "fighist",
            Self::Atlas => "atlas",
            Self::Cms => "cms",
            Self::Minimal => "minimal",
        }
    }

    pub fn base_config(self) -> VizConfig {
        match self {
            Self::Fighist => fighist(),
            Self::Atlas => atlas(),
            Self::Cms => cms(),
            Self::Minimal => minimal(),
        }
    }
}

fn fighist() -> VizConfig {
    VizConfig {
        theme: "fighist".into(),
        figure: FigureConfig::default(),
        font: FontConfig::default(),
        axes: AxesConfig::default(),
        grid: GridConfig { show: true, color: Color::hex("#CBD5E1"), alpha: 0.55 },
        legend: LegendConfig::default(),
        collab: CollabConfig::default(),
        palette: "fighist".into(),
        output: OutputConfig::default(),
    }
}

fn atlas() -> VizConfig {
    VizConfig {
        theme: "atlas".into(),
        figure: FigureConfig { width: 576.0, height: 432.0 },
        font: FontConfig { size: 11.0, label_size: 12.0, tick_size: 9.5, ..FontConfig::default() },
        axes: AxesConfig { tick_length: 6.0, ..AxesConfig::default() },
        grid: GridConfig { show: false, ..GridConfig::default() },
        collab: CollabConfig {
            brand: "ATLAS".into(),
            status: "Internal".into(),
            anchor: "lt".into(),
        },
        palette: "atlas_wong".into(),
        ..fighist()
    }
}

fn cms() -> VizConfig {
    VizConfig {
        theme: "cms".into(),
        figure: FigureConfig { width: 720.0, height: 720.0 },
        font: FontConfig { size: 10.0, label_size: 11.0, tick_size: 9.0, ..FontConfig::default() },
        grid: GridConfig { show: false, ..GridConfig::default() },
        collab: CollabConfig {
            brand: "CMS".into(),
            status: "Preliminary".into(),
            anchor: "lt".into(),
        },
        palette: "cms_petroff6".into(),
        ..fighist()
    }
}

fn minimal() -> VizConfig {
    VizConfig {
        theme: "minimal".into(),
        figure: FigureConfig { width: 432.0, height: 302.4 },
        font: FontConfig {
            size: 9.0,
            label_size: 10.0,
            tick_size: 8.0,
            title_size: 10.0,
            ..FontConfig::default()
        },
        axes: AxesConfig {
            tick_direction: "out".into(),
            show_top_ticks: false,
            show_right_ticks: false,
            tick_length: 4.0,
            minor_tick_length: 2.0,
            ..AxesConfig::default()
        },
        grid: GridConfig { show: false, ..GridConfig::default() },
        legend: LegendConfig { frame: true, ..LegendConfig::default() },
        collab: CollabConfig { brand: String::new(), status: String::new(), anchor: "lt".into() },
        palette: "tableau10".into(),
        ..fighist()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_roundtrip() {
        for name in BuiltinTheme::NAMES {
            let t = BuiltinTheme::parse(name).unwrap();
            assert_eq!(t.name(), name);
            assert_eq!(t.base_config().theme, name);
        }
        assert_eq!(BuiltinTheme::parse("ATLAS"), Some(BuiltinTheme::Atlas));
        assert_eq!(BuiltinTheme::parse("neon"), None);
    }

    #[test]
    fn palettes_differ_per_theme() {
        let a = BuiltinTheme::Atlas.base_config().palette_colors();
        let c = BuiltinTheme::Cms.base_config().palette_colors();
        assert_ne!(a[0], c[0]);
    }
}
