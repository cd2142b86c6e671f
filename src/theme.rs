use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub font_family: String,
    /// Optional font file loaded ahead of the system lookup. Missing or
    /// unreadable files fall back silently.
    pub font_file: Option<PathBuf>,
    pub font_size: f32,
    pub line_color: String,
    pub line_width: f32,
    pub box_fill: String,
    pub box_stroke: String,
    pub box_stroke_width: f32,
    pub text_color: String,
    pub background: String,
}

impl Theme {
    /// Blue connectors, white boxes, black borders.
    pub fn classic() -> Self {
        Self {
            font_family: "Vazirmatn, DejaVu Sans, sans-serif".to_string(),
            font_file: None,
            font_size: 10.0,
            line_color: "#0000FF".to_string(),
            line_width: 1.0,
            box_fill: "#FFFFFF".to_string(),
            box_stroke: "#000000".to_string(),
            box_stroke_width: 1.0,
            text_color: "#000000".to_string(),
            background: "#FFFFFF".to_string(),
        }
    }

    pub fn modern() -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            font_file: None,
            font_size: 11.0,
            line_color: "#7A8AA6".to_string(),
            line_width: 1.2,
            box_fill: "#F8FAFF".to_string(),
            box_stroke: "#C7D2E5".to_string(),
            box_stroke_width: 1.2,
            text_color: "#1C2430".to_string(),
            background: "#FFFFFF".to_string(),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::classic()
    }
}
