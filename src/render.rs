use crate::config::{LayoutConfig, RenderConfig};
use crate::layout::Layout;
use crate::theme::Theme;
use crate::tree::Forest;
use anyhow::Result;
use std::path::Path;

/// Plot coordinates (layout units, y up) to SVG device pixels (y down).
struct CanvasTransform {
    scale: f32,
    min_x: f32,
    max_y: f32,
}

impl CanvasTransform {
    fn x(&self, x: f32) -> f32 {
        (x - self.min_x) * self.scale
    }

    fn y(&self, y: f32) -> f32 {
        (self.max_y - y) * self.scale
    }
}

/// Render the laid-out forest as one SVG page. Deterministic for identical
/// geometry; an empty forest produces a minimal well-formed document.
pub fn render_svg(
    forest: &Forest,
    layout: &Layout,
    theme: &Theme,
    config: &LayoutConfig,
    render: &RenderConfig,
) -> String {
    let mut svg = String::new();

    if layout.is_empty() {
        let side = 200.0;
        svg.push_str(&format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{side}\" height=\"{side}\" viewBox=\"0 0 {side} {side}\">",
        ));
        svg.push_str(&format!(
            "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
            theme.background
        ));
        svg.push_str("</svg>");
        return svg;
    }

    let bounds = layout.bounds;
    let min_x = bounds.min_x - render.margin_left;
    let max_x = bounds.max_x + render.margin_right;
    let min_y = bounds.min_y - render.margin_bottom;
    let max_y = bounds.max_y + render.margin_top;
    let transform = CanvasTransform {
        scale: config.px_per_unit(),
        min_x,
        max_y,
    };

    let width = ((max_x - min_x) * transform.scale).max(1.0);
    let height = ((max_y - min_y) * transform.scale).max(1.0);
    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width:.0}\" height=\"{height:.0}\" viewBox=\"0 0 {width:.0} {height:.0}\">",
    ));
    svg.push_str(&format!(
        "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
        theme.background
    ));

    // Connectors first, boxes on top.
    for id in forest.ordered_nodes() {
        let children = &forest.node(id).children;
        if children.is_empty() {
            continue;
        }
        let parent = layout.geom(id);
        let py = -parent.y;
        let trunk_x = layout.geom(children[0]).line_x;

        let child_rows: Vec<f32> = children.iter().map(|&c| -layout.geom(c).y).collect();
        let top = child_rows.iter().cloned().fold(f32::MIN, f32::max);
        let bottom = child_rows.iter().cloned().fold(f32::MAX, f32::min);

        // Parent box edge out to the shared trunk.
        push_line(&mut svg, &transform, theme, parent.box_right(), py, trunk_x, py);
        // The trunk itself, spanning first to last child row.
        push_line(&mut svg, &transform, theme, trunk_x, bottom, trunk_x, top);
        // One stub per child, trunk to box edge.
        for &child in children {
            let geom = layout.geom(child);
            let cy = -geom.y;
            push_line(&mut svg, &transform, theme, trunk_x, cy, geom.box_left, cy);
        }
    }

    // Short tick from each node's own trunk coordinate to its box edge.
    for id in forest.ordered_nodes() {
        let geom = layout.geom(id);
        let y = -geom.y;
        let edge = if geom.depth == 0 {
            geom.box_right()
        } else {
            geom.box_left
        };
        push_line(&mut svg, &transform, theme, geom.line_x, y, edge, y);
    }

    let px_size = config.px_font_size(theme.font_size);
    for id in forest.ordered_nodes() {
        let geom = layout.geom(id);
        let x = transform.x(geom.box_left);
        let y = transform.y(geom.box_top());
        let w = geom.width * transform.scale;
        let h = geom.height * transform.scale;
        svg.push_str(&format!(
            "<rect x=\"{x:.2}\" y=\"{y:.2}\" width=\"{w:.2}\" height=\"{h:.2}\" rx=\"{r:.1}\" ry=\"{r:.1}\" fill=\"{}\" stroke=\"{}\" stroke-width=\"{}\"/>",
            theme.box_fill,
            theme.box_stroke,
            theme.box_stroke_width,
            r = render.corner_radius,
        ));

        let cx = transform.x(geom.box_left + geom.width / 2.0);
        // Baseline sits a bit under the vertical center of the box.
        let cy = transform.y(geom.box_bottom + geom.height / 2.0) + px_size * 0.35;
        svg.push_str(&format!(
            "<text x=\"{cx:.2}\" y=\"{cy:.2}\" text-anchor=\"middle\" font-family=\"{}\" font-size=\"{px_size:.2}\" fill=\"{}\">{}</text>",
            escape_xml(&theme.font_family),
            theme.text_color,
            escape_xml(&forest.node(id).label)
        ));
    }

    svg.push_str("</svg>");
    svg
}

fn push_line(
    svg: &mut String,
    transform: &CanvasTransform,
    theme: &Theme,
    x1: f32,
    y1: f32,
    x2: f32,
    y2: f32,
) {
    svg.push_str(&format!(
        "<line x1=\"{:.2}\" y1=\"{:.2}\" x2=\"{:.2}\" y2=\"{:.2}\" stroke=\"{}\" stroke-width=\"{}\"/>",
        transform.x(x1),
        transform.y(y1),
        transform.x(x2),
        transform.y(y2),
        theme.line_color,
        theme.line_width
    ));
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
pub fn write_output_png(svg: &str, output: &Path, theme: &Theme) -> Result<()> {
    let mut opt = usvg::Options::default();
    opt.font_family = theme
        .font_family
        .split(',')
        .next()
        .unwrap_or("sans-serif")
        .trim()
        .to_string();
    opt.fontdb_mut().load_system_fonts();

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let size = tree.size().to_int_size();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate pixmap"))?;

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(&tree, resvg::tiny_skia::Transform::default(), &mut pixmap_mut);
    pixmap.save_png(output)?;
    Ok(())
}

/// Best-effort preview: hand the written document to the platform opener.
/// Failures are ignored; the file on disk is the real deliverable.
pub fn show_document(path: &Path) {
    use std::process::Command;
    let spawned = if cfg!(target_os = "macos") {
        Command::new("open").arg(path).spawn()
    } else if cfg!(target_os = "windows") {
        Command::new("cmd").args(["/C", "start", ""]).arg(path).spawn()
    } else {
        Command::new("xdg-open").arg(path).spawn()
    };
    drop(spawned);
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{FixedMetrics, compute_layout};

    fn render(rows: Vec<Vec<&str>>) -> String {
        let forest = Forest::from_rows(rows);
        let theme = Theme::classic();
        let config = LayoutConfig::default();
        let layout = compute_layout(&forest, &FixedMetrics::default(), &theme, &config);
        render_svg(&forest, &layout, &theme, &config, &RenderConfig::default())
    }

    #[test]
    fn empty_forest_renders_a_wellformed_document() {
        let svg = render(vec![]);
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert!(!svg.contains("<line"));
    }

    #[test]
    fn scenario_renders_five_boxes() {
        let svg = render(vec![
            vec!["Home", "Products", "Shoes"],
            vec!["Home", "Products", "Bags"],
            vec!["Home", "About"],
        ]);
        // One background rect plus one box per node.
        assert_eq!(svg.matches("<rect").count(), 6);
        assert_eq!(svg.matches("<text").count(), 5);
        assert!(svg.contains("Shoes"));
    }

    #[test]
    fn output_is_deterministic() {
        let rows = vec![vec!["A", "B", "C"], vec!["A", "D"]];
        assert_eq!(render(rows.clone()), render(rows));
    }

    #[test]
    fn labels_are_xml_escaped() {
        let svg = render(vec![vec!["R&D", "<lab>"]]);
        assert!(svg.contains("R&amp;D"));
        assert!(svg.contains("&lt;lab&gt;"));
        assert!(!svg.contains("<lab>"));
    }

    #[test]
    fn leaf_only_forest_has_ticks_but_no_trunk() {
        let svg = render(vec![vec!["Solo"]]);
        // A single root draws exactly one tick line.
        assert_eq!(svg.matches("<line").count(), 1);
    }
}
