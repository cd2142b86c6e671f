use super::NodeGeom;
use crate::config::LayoutConfig;
use crate::tree::{Forest, NodeId};

/// Pre-order: place a node's box against the trunk line feeding it, then
/// hand children the coordinate just past the box's far edge. Roots hang
/// left of their trunk, everything else to the right; children always
/// advance in the positive direction, so no box on a parent-to-descendant
/// path can overlap.
pub(super) fn layout_x(
    forest: &Forest,
    node: NodeId,
    line_x: f32,
    config: &LayoutConfig,
    geoms: &mut [NodeGeom],
) {
    let geom = &mut geoms[node.index()];
    let left = if geom.depth == 0 {
        line_x - config.box_gap - geom.width
    } else {
        line_x + config.box_gap
    };

    geom.line_x = line_x;
    geom.box_left = left;
    geom.box_bottom = -geom.y - geom.height / 2.0;

    let child_line_x = left + geom.width + config.child_gap;
    for &child in &forest.node(node).children {
        layout_x(forest, child, child_line_x, config, geoms);
    }
}
