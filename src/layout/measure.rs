use super::NodeGeom;
use crate::config::LayoutConfig;
use crate::text_metrics;
use crate::theme::Theme;
use crate::tree::Forest;

/// Measurement backend: pixel extent of a one-line label at a pixel font
/// size. Decoupled from the rendering backend so layout can be driven by a
/// deterministic fake in tests and benches.
pub trait TextMeasure {
    fn extent(&self, text: &str, px_size: f32) -> (f32, f32);
}

/// Production backend: fontdb/ttf-parser metrics with a heuristic
/// per-character fallback when no face resolves. Construction registers the
/// theme's preferred font file, if any; a load failure is silently ignored.
pub struct SystemTextMeasure {
    family: String,
}

impl SystemTextMeasure {
    pub fn new(theme: &Theme) -> Self {
        if let Some(path) = &theme.font_file {
            let _ = text_metrics::register_font_file(path);
        }
        Self {
            family: theme.font_family.clone(),
        }
    }
}

impl TextMeasure for SystemTextMeasure {
    fn extent(&self, text: &str, px_size: f32) -> (f32, f32) {
        text_metrics::measure_text(text, px_size, &self.family)
            .unwrap_or_else(|| heuristic_extent(text, px_size))
    }
}

/// Deterministic backend with uniform glyph widths.
#[derive(Debug, Clone, Copy)]
pub struct FixedMetrics {
    /// Glyph advance as a fraction of the pixel font size.
    pub char_width: f32,
    /// Line height as a fraction of the pixel font size.
    pub line_height: f32,
}

impl Default for FixedMetrics {
    fn default() -> Self {
        Self {
            char_width: 0.6,
            line_height: 1.2,
        }
    }
}

impl TextMeasure for FixedMetrics {
    fn extent(&self, text: &str, px_size: f32) -> (f32, f32) {
        let count = text.chars().count() as f32;
        (count * self.char_width * px_size, self.line_height * px_size)
    }
}

fn heuristic_extent(text: &str, px_size: f32) -> (f32, f32) {
    let width: f32 = text.chars().map(char_width_factor).sum::<f32>() * px_size;
    (width, px_size * 1.35)
}

// Coarse advance factors for the no-font fallback path.
fn char_width_factor(ch: char) -> f32 {
    match ch {
        ' ' => 0.31,
        'i' | 'j' | 'l' | 'I' | '.' | ',' | ':' | ';' | '|' | '!' | '\'' => 0.28,
        'f' | 'r' | 't' | '(' | ')' | '[' | ']' => 0.36,
        'm' | 'w' => 0.85,
        'M' | 'W' | '@' => 0.93,
        '0'..='9' => 0.60,
        'A'..='Z' => 0.67,
        _ => 0.57,
    }
}

/// Turn every label into a padded box size in layout units. Sizes are
/// immutable inputs to the horizontal pass.
pub(super) fn measure_boxes(
    forest: &Forest,
    backend: &dyn TextMeasure,
    theme: &Theme,
    config: &LayoutConfig,
    geoms: &mut [NodeGeom],
) {
    let px_size = config.px_font_size(theme.font_size);
    let scale = config.px_per_unit();
    for id in forest.ordered_nodes() {
        let (w_px, h_px) = backend.extent(&forest.node(id).label, px_size);
        let geom = &mut geoms[id.index()];
        geom.width = (w_px + 2.0 * config.padding_px) / scale;
        geom.height = (h_px + 2.0 * config.padding_px) / scale;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_metrics_scale_linearly() {
        let metrics = FixedMetrics::default();
        let (w1, h1) = metrics.extent("abc", 10.0);
        let (w2, h2) = metrics.extent("abcabc", 10.0);
        assert!((w2 - 2.0 * w1).abs() < 1e-5);
        assert_eq!(h1, h2);
    }

    #[test]
    fn padding_inflates_all_sides() {
        let forest = Forest::from_rows(vec![vec!["ab"]]);
        let theme = Theme::classic();
        let config = LayoutConfig::default();
        let mut geoms = vec![NodeGeom::default(); forest.len()];
        let metrics = FixedMetrics::default();
        measure_boxes(&forest, &metrics, &theme, &config, &mut geoms);

        let px_size = config.px_font_size(theme.font_size);
        let (w_px, h_px) = metrics.extent("ab", px_size);
        let scale = config.px_per_unit();
        assert!((geoms[0].width - (w_px + 20.0) / scale).abs() < 1e-5);
        assert!((geoms[0].height - (h_px + 20.0) / scale).abs() < 1e-5);
    }

    #[test]
    fn heuristic_extent_is_positive_for_unknown_glyphs() {
        let (w, h) = heuristic_extent("\u{FEB3}\u{FEFC}\u{FEE1}", 20.0);
        assert!(w > 0.0);
        assert!(h > 0.0);
    }
}
