//! Labeled tree editing engine.
//!
//! A tree is an `Rc<Node>` value. Every edit returns a new root that shares
//! all untouched subtrees with the old one:
//!
//! ```
//! use std::rc::Rc;
//! use treedit::domain::{delete_child, insert_child, Node, SequentialIds};
//!
//! let tree = Rc::new(Node::root("root"));
//! let mut ids = SequentialIds::new();
//! let tree = insert_child(&tree, None, "A", &mut ids);
//! let tree = insert_child(&tree, None, "B", &mut ids);
//! let a = tree.children[0].id.clone();
//! let tree = delete_child(&tree, a.as_ref());
//! assert_eq!(tree.leaf_names(), vec!["B"]);
//! ```

pub mod application;
pub mod config;
pub mod domain;
pub mod tree_traits;
pub mod util;

pub use application::{
    ApplicationError, ApplicationResult, DeleteStrategy, EditOutcome, TreeSession,
};
pub use config::Settings;
pub use domain::{DomainError, Node, NodeId};
