//! Domain layer: tree entities and the mutation engine
//!
//! This layer is independent of external concerns (no I/O, no config loading).

pub mod error;
pub mod ids;
pub mod mutation;
pub mod node;
pub mod traverse;

pub use error::{DomainError, DomainResult};
pub use ids::{IdGenerator, IdStrategy, RandomIds, SequentialIds};
pub use mutation::{delete_child, delete_subtree, insert_child, try_insert_child};
pub use node::{Node, NodeId};
pub use traverse::{find_node, find_path, max_numeric_id, traverse, Preorder, Visit};
