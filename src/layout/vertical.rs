use super::NodeGeom;
use crate::tree::{Forest, NodeId};

/// Explicit accumulator for one root's recursion: the next free leaf slot
/// and the highest y handed out so far.
#[derive(Debug, Clone, Copy)]
pub(super) struct Cursor {
    pub next_y: f32,
    pub max_y: f32,
}

impl Cursor {
    pub fn starting_at(offset: f32) -> Self {
        Self {
            next_y: offset,
            max_y: offset,
        }
    }

    fn place_leaf(&mut self, spacing: f32) -> f32 {
        let y = self.next_y;
        self.max_y = y;
        self.next_y += spacing;
        y
    }
}

/// Post-order: leaves take successive slots, a parent settles on the
/// arithmetic mean of its direct children's y values.
pub(super) fn assign_vertical(
    forest: &Forest,
    node: NodeId,
    depth: u32,
    spacing: f32,
    cursor: &mut Cursor,
    geoms: &mut [NodeGeom],
) {
    let children = &forest.node(node).children;

    let y = if children.is_empty() {
        cursor.place_leaf(spacing)
    } else {
        for &child in children {
            assign_vertical(forest, child, depth + 1, spacing, cursor, geoms);
        }
        let sum: f32 = children.iter().map(|&c| geoms[c.index()].y).sum();
        sum / children.len() as f32
    };

    let geom = &mut geoms[node.index()];
    geom.depth = depth;
    geom.y = y;
}
