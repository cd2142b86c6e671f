use std::collections::HashMap;

use crate::shape::shape_text;

/// Handle into the forest arena. Node identity is positional: two equal
/// labels under different parents are distinct nodes, equal (parent, label)
/// pairs collapse to one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub label: String,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

/// Arena-allocated forest of labeled trees. Children keep first-seen order;
/// the first root registered for a label is reused by every later row
/// rooting at that label.
#[derive(Debug, Default)]
pub struct Forest {
    nodes: Vec<Node>,
    roots: Vec<NodeId>,
    index: HashMap<(Option<NodeId>, String), NodeId>,
}

impl Forest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold cleaned rows into a forest. Cells blank after trimming are
    /// skipped without breaking the parent chain; labels are shaped exactly
    /// once, here, at node creation.
    pub fn from_rows<I, R, C>(rows: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = C>,
        C: AsRef<str>,
    {
        let mut forest = Self::new();
        for row in rows {
            forest.insert_row(row);
        }
        forest
    }

    fn insert_row<R, C>(&mut self, row: R)
    where
        R: IntoIterator<Item = C>,
        C: AsRef<str>,
    {
        let mut parent: Option<NodeId> = None;
        for cell in row {
            let text = cell.as_ref().trim();
            if text.is_empty() {
                continue;
            }
            parent = Some(self.intern(parent, text));
        }
    }

    /// Find or create the node for (parent, shaped label).
    fn intern(&mut self, parent: Option<NodeId>, text: &str) -> NodeId {
        let label = shape_text(text);
        let key = (parent, label);
        if let Some(&id) = self.index.get(&key) {
            return id;
        }
        let (parent, label) = key;
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node {
            label: label.clone(),
            parent,
            children: Vec::new(),
        });
        match parent {
            Some(parent_id) => self.nodes[parent_id.index()].children.push(id),
            None => self.roots.push(id),
        }
        self.index.insert((parent, label), id);
        id
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Stable traversal order: each root followed by its descendants
    /// pre-order, root by root.
    pub fn ordered_nodes(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        for &root in &self.roots {
            self.collect_subtree(root, &mut order);
        }
        order
    }

    fn collect_subtree(&self, id: NodeId, out: &mut Vec<NodeId>) {
        out.push(id);
        for &child in &self.node(id).children {
            self.collect_subtree(child, out);
        }
    }

    /// Look up a direct child by (already shaped) label.
    pub fn child_by_label(&self, parent: NodeId, label: &str) -> Option<NodeId> {
        self.node(parent)
            .children
            .iter()
            .copied()
            .find(|&c| self.node(c).label == label)
    }

    pub fn root_by_label(&self, label: &str) -> Option<NodeId> {
        self.roots
            .iter()
            .copied()
            .find(|&r| self.node(r).label == label)
    }
}
