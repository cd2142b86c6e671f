mod horizontal;
mod measure;
mod vertical;

pub use measure::{FixedMetrics, SystemTextMeasure, TextMeasure};

use crate::config::LayoutConfig;
use crate::theme::Theme;
use crate::tree::{Forest, NodeId};

/// Per-node geometry, decorated over three passes: vertical (depth, y),
/// measurement (width, height), horizontal (line_x, box_left, box_bottom).
/// All values are in layout units; `box_bottom` lives in plot coordinates
/// (y grows upward, node rows at negative y so trees read top-to-bottom).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NodeGeom {
    pub depth: u32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub line_x: f32,
    pub box_left: f32,
    pub box_bottom: f32,
}

impl NodeGeom {
    pub fn box_right(&self) -> f32 {
        self.box_left + self.width
    }

    pub fn box_top(&self) -> f32 {
        self.box_bottom + self.height
    }
}

/// Bounding box of all boxes and trunk coordinates, margins excluded.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    pub min_x: f32,
    pub max_x: f32,
    pub min_y: f32,
    pub max_y: f32,
}

#[derive(Debug, Clone)]
pub struct Layout {
    geoms: Vec<NodeGeom>,
    pub bounds: Bounds,
}

impl Layout {
    pub fn geom(&self, id: NodeId) -> &NodeGeom {
        &self.geoms[id.index()]
    }

    pub fn is_empty(&self) -> bool {
        self.geoms.is_empty()
    }
}

/// Run the full layout pipeline over a forest. Pass order is fixed:
/// vertical fully before measurement, measurement fully before horizontal.
pub fn compute_layout(
    forest: &Forest,
    backend: &dyn TextMeasure,
    theme: &Theme,
    config: &LayoutConfig,
) -> Layout {
    let mut geoms = vec![NodeGeom::default(); forest.len()];

    // Roots stack vertically; each root's recursion owns a private cursor
    // starting just past the previous tree's extent.
    let mut offset = 0.0f32;
    for &root in forest.roots() {
        let mut cursor = vertical::Cursor::starting_at(offset);
        vertical::assign_vertical(forest, root, 0, config.spacing_y, &mut cursor, &mut geoms);
        offset = cursor.max_y + config.spacing_y + config.tree_gap;
    }

    measure::measure_boxes(forest, backend, theme, config, &mut geoms);

    for &root in forest.roots() {
        horizontal::layout_x(forest, root, 0.0, config, &mut geoms);
    }

    let bounds = compute_bounds(&geoms);
    Layout { geoms, bounds }
}

fn compute_bounds(geoms: &[NodeGeom]) -> Bounds {
    let mut bounds = Bounds {
        min_x: f32::MAX,
        max_x: f32::MIN,
        min_y: f32::MAX,
        max_y: f32::MIN,
    };
    for geom in geoms {
        bounds.min_x = bounds.min_x.min(geom.box_left).min(geom.line_x);
        bounds.max_x = bounds.max_x.max(geom.box_right()).max(geom.line_x);
        bounds.min_y = bounds.min_y.min(geom.box_bottom);
        bounds.max_y = bounds.max_y.max(geom.box_top());
    }
    if geoms.is_empty() {
        return Bounds::default();
    }
    bounds
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::Forest;

    fn layout_of(rows: Vec<Vec<&str>>) -> (Forest, Layout) {
        let forest = Forest::from_rows(rows);
        let layout = compute_layout(
            &forest,
            &FixedMetrics::default(),
            &Theme::classic(),
            &LayoutConfig::default(),
        );
        (forest, layout)
    }

    #[test]
    fn empty_forest_yields_empty_layout() {
        let (_, layout) = layout_of(vec![]);
        assert!(layout.is_empty());
        assert_eq!(layout.bounds, Bounds::default());
    }

    #[test]
    fn scenario_home_products() {
        let (forest, layout) = layout_of(vec![
            vec!["Home", "Products", "Shoes"],
            vec!["Home", "Products", "Bags"],
            vec!["Home", "About"],
        ]);
        assert_eq!(forest.len(), 5);

        let home = forest.root_by_label("Home").unwrap();
        let products = forest.child_by_label(home, "Products").unwrap();
        let about = forest.child_by_label(home, "About").unwrap();
        let shoes = forest.child_by_label(products, "Shoes").unwrap();
        let bags = forest.child_by_label(products, "Bags").unwrap();

        // Home centers over Products and About.
        let mean = (layout.geom(products).y + layout.geom(about).y) / 2.0;
        assert!((layout.geom(home).y - mean).abs() < 1e-5);

        // Products and About share one trunk line fed by Home.
        assert_eq!(layout.geom(products).line_x, layout.geom(about).line_x);
        assert!(layout.geom(products).line_x > layout.geom(home).box_right());

        // The trunk below Home spans the y range of both children.
        let child_ys = [layout.geom(products).y, layout.geom(about).y];
        let span = child_ys.iter().cloned().fold(f32::MIN, f32::max)
            - child_ys.iter().cloned().fold(f32::MAX, f32::min);
        assert!(span > 0.0);

        // Leaves take successive slots in visitation order.
        assert!(layout.geom(shoes).y < layout.geom(bags).y);
    }

    #[test]
    fn two_roots_stack_without_vertical_overlap() {
        let (forest, layout) = layout_of(vec![vec!["A", "B"], vec!["Z", "Y"]]);
        let a = forest.root_by_label("A").unwrap();
        let z = forest.root_by_label("Z").unwrap();
        let config = LayoutConfig::default();
        assert!(layout.geom(z).y >= layout.geom(a).y + config.spacing_y + config.tree_gap);
    }

    #[test]
    fn bounds_cover_every_box_and_trunk() {
        let (forest, layout) = layout_of(vec![vec!["Root", "Mid", "Leaf"]]);
        for id in forest.ordered_nodes() {
            let geom = layout.geom(id);
            assert!(geom.box_left >= layout.bounds.min_x);
            assert!(geom.box_right() <= layout.bounds.max_x);
            assert!(geom.line_x <= layout.bounds.max_x);
            assert!(geom.box_bottom >= layout.bounds.min_y);
            assert!(geom.box_top() <= layout.bounds.max_y);
        }
    }
}
