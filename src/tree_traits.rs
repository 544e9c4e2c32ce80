//! Recursive rendering of a tree into a printable `termtree::Tree`.

use std::rc::Rc;

use termtree::Tree;
use tracing::instrument;

use crate::domain::Node;

pub trait TreeNodeConvert {
    fn to_tree_string(&self) -> Tree<String>;
}

impl TreeNodeConvert for Node {
    #[instrument(level = "trace", skip(self))]
    fn to_tree_string(&self) -> Tree<String> {
        // Recursively construct the children
        let leaves: Vec<_> = self
            .children
            .iter()
            .map(|child| child.to_tree_string())
            .collect();

        Tree::new(self.to_string()).with_leaves(leaves)
    }
}

impl TreeNodeConvert for Rc<Node> {
    fn to_tree_string(&self) -> Tree<String> {
        self.as_ref().to_tree_string()
    }
}
