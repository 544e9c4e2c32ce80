//! Editing session: owner of the current tree.
//!
//! The presentation layer keeps one `TreeSession`, forwards user intents to
//! it and re-renders from [`TreeSession::tree`] afterwards.

use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::application::{load_seed, ApplicationResult};
use crate::config::Settings;
use crate::domain::{
    delete_child, delete_subtree, find_node, try_insert_child, DomainError, DomainResult,
    IdGenerator, IdStrategy, Node, NodeId,
};
use crate::tree_traits::TreeNodeConvert;

/// How a delete request removes its target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeleteStrategy {
    /// Drop every node with the id, each with its subtree
    #[default]
    Cascade,
    /// Remove the entry from its (last found) parent's child list
    Splice,
}

/// Outcome of an edit that was accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    /// A child was added with this id.
    Created(NodeId),
    /// Nodes were removed, descendants included.
    Deleted { removed: usize },
    /// The target was not found; nothing changed.
    Unchanged,
}

impl EditOutcome {
    pub fn created_id(&self) -> Option<&NodeId> {
        match self {
            EditOutcome::Created(id) => Some(id),
            _ => None,
        }
    }

    pub fn removed(&self) -> usize {
        match self {
            EditOutcome::Deleted { removed } => *removed,
            _ => 0,
        }
    }
}

pub struct TreeSession {
    tree: Rc<Node>,
    ids: Box<dyn IdGenerator>,
    delete_strategy: DeleteStrategy,
}

impl fmt::Debug for TreeSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TreeSession")
            .field("nodes", &self.tree.node_count())
            .field("delete_strategy", &self.delete_strategy)
            .finish()
    }
}

impl TreeSession {
    pub fn new(root: Node, id_strategy: IdStrategy, delete_strategy: DeleteStrategy) -> Self {
        let ids = id_strategy.generator(&root);
        Self::with_generator(root, ids, delete_strategy)
    }

    pub fn with_generator(
        root: Node,
        ids: Box<dyn IdGenerator>,
        delete_strategy: DeleteStrategy,
    ) -> Self {
        Self {
            tree: Rc::new(root),
            ids,
            delete_strategy,
        }
    }

    /// Starts from the configured seed file, or from an empty root.
    pub fn from_settings(settings: &Settings) -> ApplicationResult<Self> {
        let root = match &settings.seed_file {
            Some(path) => load_seed(path)?,
            None => Node::root(settings.root_label.clone()),
        };
        Ok(Self::new(
            root,
            settings.id_strategy,
            settings.delete_strategy,
        ))
    }

    /// Current authoritative tree.
    pub fn tree(&self) -> &Rc<Node> {
        &self.tree
    }

    pub fn delete_strategy(&self) -> DeleteStrategy {
        self.delete_strategy
    }

    pub fn find(&self, id: Option<&NodeId>) -> Option<&Node> {
        find_node(&self.tree, id)
    }

    /// Text rendering of the current tree, one line per node.
    pub fn render(&self) -> String {
        self.tree.to_tree_string().to_string()
    }

    /// Adds a child labeled `label` (trimmed) under `parent`.
    #[instrument(level = "debug", skip(self))]
    pub fn add_child(&mut self, parent: Option<&NodeId>, label: &str) -> DomainResult<EditOutcome> {
        let label = label.trim();
        if label.is_empty() {
            warn!("rejected empty child label");
            return Err(DomainError::EmptyLabel);
        }

        match try_insert_child(&self.tree, parent, label, &mut *self.ids) {
            Some((next, id)) => {
                info!(%id, label, "added child");
                self.tree = next;
                Ok(EditOutcome::Created(id))
            }
            None => Ok(EditOutcome::Unchanged),
        }
    }

    /// Deletes `target` with the session's configured strategy.
    pub fn delete(&mut self, target: Option<&NodeId>) -> DomainResult<EditOutcome> {
        self.delete_with(target, self.delete_strategy)
    }

    #[instrument(level = "debug", skip(self))]
    pub fn delete_with(
        &mut self,
        target: Option<&NodeId>,
        strategy: DeleteStrategy,
    ) -> DomainResult<EditOutcome> {
        if self.tree.has_id(target) {
            warn!(?target, "rejected deletion of the root");
            return Err(DomainError::RootNotRemovable);
        }

        let next = match strategy {
            DeleteStrategy::Cascade => delete_subtree(&self.tree, target),
            DeleteStrategy::Splice => delete_child(&self.tree, target),
        };
        if Rc::ptr_eq(&next, &self.tree) {
            return Ok(EditOutcome::Unchanged);
        }

        let removed = self.tree.node_count() - next.node_count();
        info!(?target, removed, "deleted node");
        self.tree = next;
        Ok(EditOutcome::Deleted { removed })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SequentialIds;

    fn session() -> TreeSession {
        TreeSession::with_generator(
            Node::root("root"),
            Box::new(SequentialIds::new()),
            DeleteStrategy::Cascade,
        )
    }

    #[test]
    fn given_padded_label_when_adding_then_stores_trimmed() {
        let mut s = session();
        let outcome = s.add_child(None, "  A  ").unwrap();
        assert_eq!(outcome, EditOutcome::Created(NodeId::from(1)));
        assert_eq!(s.tree().children[0].name, "A");
    }

    #[test]
    fn given_blank_label_when_adding_then_rejected_and_unchanged() {
        let mut s = session();
        let before = Rc::clone(s.tree());
        assert_eq!(s.add_child(None, " \t "), Err(DomainError::EmptyLabel));
        assert!(Rc::ptr_eq(&before, s.tree()));
    }

    #[test]
    fn given_session_when_debug_then_shows_size() {
        let s = session();
        assert!(format!("{s:?}").contains("nodes: 1"));
    }
}
