//! Tree mutations: insert a child, delete a node by id.
//!
//! All operations are persistent. The input tree is never modified; the
//! returned root shares every untouched subtree with it, and only nodes on
//! the changed path are copied (`Rc::make_mut` copy-on-write). A no-op
//! returns a clone of the input `Rc`, so callers can detect it with
//! `Rc::ptr_eq`.

use std::rc::Rc;

use tracing::{debug, instrument};

use crate::domain::ids::IdGenerator;
use crate::domain::node::{Node, NodeId};
use crate::domain::traverse::find_path;

/// Walks `path` from `root`, copying each shared node on the way, and
/// returns the addressed node ready for mutation.
fn node_at_mut<'a>(root: &'a mut Rc<Node>, path: &[usize]) -> &'a mut Node {
    let mut current = root;
    for &idx in path {
        current = &mut Rc::make_mut(current).children[idx];
    }
    Rc::make_mut(current)
}

/// Appends a new leaf named `name` under the first node whose id is `parent`.
///
/// Returns the new tree and the id given to the child, or `None` when no
/// such parent exists.
#[instrument(level = "debug", skip(root, ids))]
pub fn try_insert_child(
    root: &Rc<Node>,
    parent: Option<&NodeId>,
    name: &str,
    ids: &mut dyn IdGenerator,
) -> Option<(Rc<Node>, NodeId)> {
    let path = find_path(root, parent)?;
    let id = ids.next_id(root);

    let mut next = Rc::clone(root);
    node_at_mut(&mut next, &path)
        .children
        .push(Rc::new(Node::leaf(id.clone(), name)));
    debug!(%id, "child inserted");
    Some((next, id))
}

/// Appends a new leaf under `parent`; unknown parent is a no-op.
pub fn insert_child(
    root: &Rc<Node>,
    parent: Option<&NodeId>,
    name: &str,
    ids: &mut dyn IdGenerator,
) -> Rc<Node> {
    match try_insert_child(root, parent, name, ids) {
        Some((next, _)) => next,
        None => {
            debug!(?parent, "parent not found, tree unchanged");
            Rc::clone(root)
        }
    }
}

enum Pruned {
    Removed,
    Kept,
    Rebuilt(Rc<Node>),
}

fn prune(node: &Rc<Node>, target: Option<&NodeId>) -> Pruned {
    if node.has_id(target) {
        return Pruned::Removed;
    }
    match prune_children(node, target) {
        Some(rebuilt) => Pruned::Rebuilt(rebuilt),
        None => Pruned::Kept,
    }
}

/// Filters the children of `node` after pruning each of them first.
/// `None` when nothing below `node` changed.
fn prune_children(node: &Rc<Node>, target: Option<&NodeId>) -> Option<Rc<Node>> {
    let mut changed = false;
    let mut children = Vec::with_capacity(node.children.len());
    for child in &node.children {
        match prune(child, target) {
            Pruned::Removed => changed = true,
            Pruned::Kept => children.push(Rc::clone(child)),
            Pruned::Rebuilt(rebuilt) => {
                changed = true;
                children.push(rebuilt);
            }
        }
    }
    changed.then(|| {
        Rc::new(Node {
            id: node.id.clone(),
            name: node.name.clone(),
            children,
        })
    })
}

/// Cascading delete: drops every node whose id is `target`, together with
/// its subtree.
///
/// Deleting the root's own id leaves the tree unchanged, including any
/// descendant that happens to carry the same id.
#[instrument(level = "debug", skip(root))]
pub fn delete_subtree(root: &Rc<Node>, target: Option<&NodeId>) -> Rc<Node> {
    if root.has_id(target) {
        debug!("target is the root, tree unchanged");
        return Rc::clone(root);
    }
    match prune_children(root, target) {
        Some(next) => {
            debug!(
                removed = root.node_count() - next.node_count(),
                "subtree deleted"
            );
            next
        }
        None => Rc::clone(root),
    }
}

/// Splice delete: removes the `target` entry from its parent's children by
/// position.
///
/// If several parents list a child with that id, the last one met in
/// pre-order is used. The root has no parent and cannot be removed; its own
/// id is a no-op.
#[instrument(level = "debug", skip(root))]
pub fn delete_child(root: &Rc<Node>, target: Option<&NodeId>) -> Rc<Node> {
    if root.has_id(target) {
        debug!("target is the root, tree unchanged");
        return Rc::clone(root);
    }
    let mut found: Option<(Vec<usize>, usize)> = None;
    for visit in root.iter() {
        if let Some(idx) = visit
            .node
            .children
            .iter()
            .position(|child| child.has_id(target))
        {
            found = Some((visit.path, idx));
        }
    }

    let Some((parent_path, idx)) = found else {
        debug!("no parent lists the target, tree unchanged");
        return Rc::clone(root);
    };

    let mut next = Rc::clone(root);
    let removed = node_at_mut(&mut next, &parent_path).children.remove(idx);
    debug!(removed = removed.node_count(), "child spliced out");
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ids::SequentialIds;

    fn id(n: u64) -> NodeId {
        NodeId::from(n)
    }

    // root -> 1 -> 2
    //      -> 3
    fn sample() -> Rc<Node> {
        Rc::new(Node::root("root").with_children([
            Node::leaf(id(1), "x").with_children([Node::leaf(id(2), "y")]),
            Node::leaf(id(3), "z"),
        ]))
    }

    #[test]
    fn given_insert_when_parent_nested_then_only_path_is_copied() {
        let tree = sample();
        let mut ids = SequentialIds::continuing(&tree);

        let next = insert_child(&tree, Some(&id(2)), "w", &mut ids);

        assert_eq!(tree.node_count(), 4);
        assert_eq!(next.node_count(), 5);
        // sibling subtree off the path is shared
        assert!(Rc::ptr_eq(&tree.children[1], &next.children[1]));
        assert!(!Rc::ptr_eq(&tree.children[0], &next.children[0]));
        assert_eq!(next.children[0].children[0].children[0].name, "w");
    }

    #[test]
    fn given_unknown_parent_when_insert_then_same_rc() {
        let tree = sample();
        let mut ids = SequentialIds::new();
        let next = insert_child(&tree, Some(&id(42)), "w", &mut ids);
        assert!(Rc::ptr_eq(&tree, &next));
    }

    #[test]
    fn given_unknown_target_when_deleting_then_same_rc() {
        let tree = sample();
        assert!(Rc::ptr_eq(&tree, &delete_subtree(&tree, Some(&id(9)))));
        assert!(Rc::ptr_eq(&tree, &delete_child(&tree, Some(&id(9)))));
    }

    #[test]
    fn given_cascade_delete_then_untouched_siblings_are_shared() {
        let tree = sample();
        let next = delete_subtree(&tree, Some(&id(2)));
        assert_eq!(next.node_count(), 3);
        assert!(Rc::ptr_eq(&tree.children[1], &next.children[1]));
        assert!(next.children[0].is_leaf());
    }

    #[test]
    fn given_idless_descendant_when_deleting_root_target_then_same_rc() {
        let tree = Rc::new(Node::root("root").with_children([
            Node::root("noid"),
            Node::leaf(id(1), "b"),
        ]));
        assert!(Rc::ptr_eq(&tree, &delete_subtree(&tree, None)));
        assert!(Rc::ptr_eq(&tree, &delete_child(&tree, None)));
    }

    #[test]
    fn given_splice_delete_then_input_is_untouched() {
        let tree = sample();
        let before = (*tree).clone();
        let next = delete_child(&tree, Some(&id(1)));
        assert_eq!(*tree, before);
        assert_eq!(next.node_count(), 2);
        assert_eq!(next.children[0].name, "z");
    }
}
