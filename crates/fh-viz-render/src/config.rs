use serde::{Deserialize, Serialize};
use serde_yaml_ng::Value;

use fh_viz::Color;

use crate::canvas::DEFAULT_FONT_FAMILY;
use crate::theme::BuiltinTheme;

/// Top-level rendering configuration (YAML or programmatic).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VizConfig {
    pub theme: String,
    pub figure: FigureConfig,
    pub font: FontConfig,
    pub axes: AxesConfig,
    pub grid: GridConfig,
    pub legend: LegendConfig,
    pub collab: CollabConfig,
    pub palette: String,
    pub output: OutputConfig,
}

impl Default for VizConfig {
    fn default() -> Self {
        BuiltinTheme::Fighist.base_config()
    }
}

impl VizConfig {
    pub fn palette_colors(&self) -> Vec<Color> {
        fh_viz::color::palette_colors(&self.palette)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FigureConfig {
    pub width: f64,
    pub height: f64,
}

impl Default for FigureConfig {
    fn default() -> Self {
        Self {
            width: 518.4,  // 7.2" * 72
            height: 388.8, // 5.4" * 72
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontConfig {
    pub family: String,
    pub size: f64,
    pub label_size: f64,
    pub tick_size: f64,
    pub title_size: f64,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            family: DEFAULT_FONT_FAMILY.into(),
            size: 10.0,
            label_size: 11.0,
            tick_size: 8.5,
            title_size: 12.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AxesConfig {
    pub tick_direction: String,
    pub show_top_ticks: bool,
    pub show_right_ticks: bool,
    pub tick_length: f64,
    pub minor_tick_length: f64,
    /// Multiplier applied to the data maximum of the y axis.
    pub y_headroom: f64,
}

impl Default for AxesConfig {
    fn default() -> Self {
        Self {
            tick_direction: "in".into(),
            show_top_ticks: true,
            show_right_ticks: true,
            tick_length: 5.0,
            minor_tick_length: 3.0,
            y_headroom: 1.25,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub show: bool,
    pub color: Color,
    pub alpha: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self { show: true, color: Color::hex("#CBD5E1"), alpha: 0.55 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegendConfig {
    pub frame: bool,
    pub font_scale: f64,
}

impl Default for LegendConfig {
    fn default() -> Self {
        Self { frame: false, font_scale: 0.85 }
    }
}

/// Default collaboration label used by front ends when none is given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollabConfig {
    pub brand: String,
    pub status: String,
    /// `"lt"` or `"rt"`.
    pub anchor: String,
}

impl Default for CollabConfig {
    fn default() -> Self {
        Self { brand: "FigHist".into(), status: "Internal".into(), anchor: "lt".into() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Format used when the output path has no extension.
    pub format: String,
    pub dpi: u32,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { format: "svg".into(), dpi: 220 }
    }
}

/// Resolve a [`VizConfig`] from an optional theme name and optional YAML.
///
/// Priority: user YAML keys > theme base config. The theme is `theme`
/// if given, else the YAML's own `theme:` key, else `fighist`.
pub fn resolve_config(theme: Option<&str>, user_yaml: Option<&str>) -> crate::Result<VizConfig> {
    let user: Value = match user_yaml {
        Some(yaml) => serde_yaml_ng::from_str(yaml)
            .map_err(|e| crate::RenderError::Config(e.to_string()))?,
        None => Value::Null,
    };
    if !matches!(user, Value::Null | Value::Mapping(_)) {
        return Err(crate::RenderError::Config("config root must be a mapping".into()));
    }

    let theme_name = theme
        .map(str::to_string)
        .or_else(|| user.get("theme").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| "fighist".into());
    let builtin = BuiltinTheme::parse(&theme_name).ok_or_else(|| {
        crate::RenderError::Config(format!(
            "unknown theme {theme_name:?} (expected one of: {})",
            BuiltinTheme::NAMES.join(", ")
        ))
    })?;
    log::debug!("resolving config on theme {}", builtin.name());

    let mut merged = serde_yaml_ng::to_value(builtin.base_config())
        .map_err(|e| crate::RenderError::Config(e.to_string()))?;
    if let Value::Mapping(_) = user {
        merge_yaml(&mut merged, user);
    }
    let mut config: VizConfig = serde_yaml_ng::from_value(merged)
        .map_err(|e| crate::RenderError::Config(e.to_string()))?;
    config.theme = builtin.name().to_string();
    Ok(config)
}

/// Read a YAML config file and resolve it against `theme`.
pub fn load_config(path: &std::path::Path, theme: Option<&str>) -> crate::Result<VizConfig> {
    let yaml = std::fs::read_to_string(path)?;
    resolve_config(theme, Some(&yaml))
}

/// Deep-merge `over` into `base`: mappings merge key by key, anything else replaces.
fn merge_yaml(base: &mut Value, over: Value) {
    match (base, over) {
        (Value::Mapping(b), Value::Mapping(o)) => {
            for (k, v) in o {
                match b.get_mut(&k) {
                    Some(slot) => merge_yaml(slot, v),
                    None => {
                        b.insert(k, v);
                    }
                }
            }
        }
        (slot, v) => *slot = v,
    }
}
