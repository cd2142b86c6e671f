use crate::theme::Theme;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Geometry knobs, all in layout units unless suffixed `_px`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Vertical distance between sibling leaves.
    pub spacing_y: f32,
    /// Extra vertical gap between stacked root trees.
    pub tree_gap: f32,
    /// Padding added around measured text, in device pixels.
    pub padding_px: f32,
    /// Gap between a node's trunk line and its box.
    pub box_gap: f32,
    /// Gap between a box's far edge and its children's trunk line.
    pub child_gap: f32,
    /// Device pixels per layout inch.
    pub dpi: f32,
    /// Layout inches per layout unit; with `dpi` this fixes the
    /// pixel-to-unit conversion used by measurement and rendering.
    pub unit_inches: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            spacing_y: 3.0,
            tree_gap: 3.0,
            padding_px: 10.0,
            box_gap: 0.25,
            child_gap: 0.8,
            dpi: 150.0,
            unit_inches: 0.35,
        }
    }
}

impl LayoutConfig {
    pub fn px_per_unit(&self) -> f32 {
        self.dpi * self.unit_inches
    }

    /// Point sizes are resolved against the configured resolution.
    pub fn px_font_size(&self, font_size: f32) -> f32 {
        font_size * self.dpi / 72.0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Canvas margins around the geometry bounds, in layout units.
    pub margin_left: f32,
    pub margin_right: f32,
    pub margin_top: f32,
    pub margin_bottom: f32,
    /// Box corner radius in device pixels.
    pub corner_radius: f32,
    /// Open the written document with the platform viewer.
    pub show: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            margin_left: 1.0,
            margin_right: 3.0,
            margin_top: 1.0,
            margin_bottom: 1.0,
            corner_radius: 6.0,
            show: false,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub theme: Theme,
    pub layout: LayoutConfig,
    pub render: RenderConfig,
}

/// Partial config file: every field optional, unset fields keep defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    font_family: Option<String>,
    font_file: Option<PathBuf>,
    font_size: Option<f32>,
    line_color: Option<String>,
    box_fill: Option<String>,
    box_stroke: Option<String>,
    text_color: Option<String>,
    background: Option<String>,
    spacing_y: Option<f32>,
    tree_gap: Option<f32>,
    padding_px: Option<f32>,
    box_gap: Option<f32>,
    child_gap: Option<f32>,
    dpi: Option<f32>,
    unit_inches: Option<f32>,
    show: Option<bool>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let mut config = Config::default();
    let Some(path) = path else {
        return Ok(config);
    };

    let contents = std::fs::read_to_string(path)?;
    let parsed: ConfigFile = json5::from_str(&contents)?;

    if let Some(theme_name) = parsed.theme.as_deref() {
        if theme_name == "modern" {
            config.theme = Theme::modern();
        } else if theme_name == "classic" || theme_name == "default" {
            config.theme = Theme::classic();
        }
    }

    if let Some(v) = parsed.font_family {
        config.theme.font_family = v;
    }
    if let Some(v) = parsed.font_file {
        config.theme.font_file = Some(v);
    }
    if let Some(v) = parsed.font_size {
        config.theme.font_size = v;
    }
    if let Some(v) = parsed.line_color {
        config.theme.line_color = v;
    }
    if let Some(v) = parsed.box_fill {
        config.theme.box_fill = v;
    }
    if let Some(v) = parsed.box_stroke {
        config.theme.box_stroke = v;
    }
    if let Some(v) = parsed.text_color {
        config.theme.text_color = v;
    }
    if let Some(v) = parsed.background {
        config.theme.background = v;
    }
    if let Some(v) = parsed.spacing_y {
        config.layout.spacing_y = v;
    }
    if let Some(v) = parsed.tree_gap {
        config.layout.tree_gap = v;
    }
    if let Some(v) = parsed.padding_px {
        config.layout.padding_px = v;
    }
    if let Some(v) = parsed.box_gap {
        config.layout.box_gap = v;
    }
    if let Some(v) = parsed.child_gap {
        config.layout.child_gap = v;
    }
    if let Some(v) = parsed.dpi {
        config.layout.dpi = v;
    }
    if let Some(v) = parsed.unit_inches {
        config.layout.unit_inches = v;
    }
    if let Some(v) = parsed.show {
        config.render.show = v;
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_a_file() {
        let config = load_config(None).unwrap();
        assert_eq!(config.layout.spacing_y, 3.0);
        assert_eq!(config.layout.box_gap, 0.25);
        assert_eq!(config.layout.child_gap, 0.8);
        assert_eq!(config.theme.font_size, 10.0);
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let dir = std::env::temp_dir().join("sitetree-config-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("partial.json5");
        std::fs::write(&path, "{ spacingY: 5, theme: 'modern', show: true }").unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.layout.spacing_y, 5.0);
        assert_eq!(config.layout.child_gap, 0.8);
        assert!(config.render.show);
        assert_eq!(config.theme.font_size, Theme::modern().font_size);
    }

    #[test]
    fn missing_file_is_an_error() {
        let missing = Path::new("/nonexistent/sitetree.json5");
        assert!(load_config(Some(missing)).is_err());
    }

    #[test]
    fn pixel_unit_conversion() {
        let layout = LayoutConfig::default();
        assert!((layout.px_per_unit() - 52.5).abs() < 1e-4);
        assert!((layout.px_font_size(10.0) - 20.833334).abs() < 1e-3);
    }
}
