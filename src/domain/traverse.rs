//! Read-only walks over a tree: pre-order iteration, lookup and derived queries.

use tracing::instrument;

use crate::domain::node::{Node, NodeId};

/// One step of a pre-order walk.
#[derive(Debug, Clone)]
pub struct Visit<'a> {
    pub node: &'a Node,
    /// Child indices leading from the root to `node`; empty for the root
    pub path: Vec<usize>,
}

impl Visit<'_> {
    /// Root is depth 0.
    pub fn depth(&self) -> usize {
        self.path.len()
    }
}

/// Stack-based pre-order iterator: a node comes before its children,
/// siblings in `children` order.
pub struct Preorder<'a> {
    stack: Vec<Visit<'a>>,
}

impl<'a> Preorder<'a> {
    fn new(root: &'a Node) -> Self {
        Self {
            stack: vec![Visit {
                node: root,
                path: Vec::new(),
            }],
        }
    }
}

impl<'a> Iterator for Preorder<'a> {
    type Item = Visit<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.stack.pop()?;
        // Push children in reverse order for left-to-right traversal
        for (idx, child) in current.node.children.iter().enumerate().rev() {
            let mut path = Vec::with_capacity(current.path.len() + 1);
            path.extend_from_slice(&current.path);
            path.push(idx);
            self.stack.push(Visit {
                node: child.as_ref(),
                path,
            });
        }
        Some(current)
    }
}

impl Node {
    pub fn iter(&self) -> Preorder<'_> {
        Preorder::new(self)
    }

    /// Number of nodes, the root included.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(|child| child.node_count()).sum::<usize>()
    }

    /// Number of levels; a single node has depth 1.
    pub fn depth(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(|child| child.depth())
            .max()
            .unwrap_or(0)
    }

    /// Names of all leaf nodes, left to right.
    pub fn leaf_names(&self) -> Vec<String> {
        self.iter()
            .filter(|visit| visit.node.is_leaf())
            .map(|visit| visit.node.name.clone())
            .collect()
    }
}

/// Calls `visitor` with every node and its depth, in pre-order.
pub fn traverse<'a, F>(root: &'a Node, mut visitor: F)
where
    F: FnMut(&'a Node, usize),
{
    for visit in root.iter() {
        let depth = visit.depth();
        visitor(visit.node, depth);
    }
}

/// First node in pre-order whose id equals `id`.
#[instrument(level = "trace", skip(root))]
pub fn find_node<'a>(root: &'a Node, id: Option<&NodeId>) -> Option<&'a Node> {
    root.iter()
        .find(|visit| visit.node.has_id(id))
        .map(|visit| visit.node)
}

/// Child-index path of the node [`find_node`] would return.
#[instrument(level = "trace", skip(root))]
pub fn find_path(root: &Node, id: Option<&NodeId>) -> Option<Vec<usize>> {
    root.iter()
        .find(|visit| visit.node.has_id(id))
        .map(|visit| visit.path)
}

/// Largest id in the tree that is a plain decimal number, 0 if there is none.
pub fn max_numeric_id(root: &Node) -> u64 {
    let mut max_id = 0;
    traverse(root, |node, _| {
        if let Some(n) = node.id.as_ref().and_then(NodeId::as_number) {
            max_id = max_id.max(n);
        }
    });
    max_id
}
