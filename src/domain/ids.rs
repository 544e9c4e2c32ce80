//! Identifier generators for newly inserted nodes.
//!
//! Every generator checks its candidates against the tree it is inserting
//! into, so a returned id is never already taken.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};
use uuid::Uuid;

use crate::domain::node::{Node, NodeId};
use crate::domain::traverse::{find_node, max_numeric_id};

pub trait IdGenerator {
    /// Returns an id not present anywhere in `tree`.
    fn next_id(&mut self, tree: &Node) -> NodeId;
}

/// Monotonic counter producing decimal ids.
///
/// Once the counter passes `u64::MAX` it is exhausted and further ids are
/// drawn from [`RandomIds`].
#[derive(Debug, Clone)]
pub struct SequentialIds {
    next: Option<u64>,
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::new()
    }
}

impl SequentialIds {
    pub fn new() -> Self {
        Self { next: Some(1) }
    }

    /// Continues after the largest numeric id already in `tree`.
    pub fn continuing(tree: &Node) -> Self {
        Self {
            next: max_numeric_id(tree).checked_add(1),
        }
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self, tree: &Node) -> NodeId {
        while let Some(n) = self.next {
            let candidate = NodeId::from(n);
            self.next = n.checked_add(1);
            if find_node(tree, Some(&candidate)).is_none() {
                return candidate;
            }
            trace!(id = %candidate, "sequential id taken, skipping");
        }
        debug!("sequential ids exhausted, drawing a random id");
        RandomIds.next_id(tree)
    }
}

/// Random UUID v4 tokens in simple (hex) form.
#[derive(Debug, Clone, Default)]
pub struct RandomIds;

impl IdGenerator for RandomIds {
    fn next_id(&mut self, tree: &Node) -> NodeId {
        loop {
            let candidate = NodeId::new(Uuid::new_v4().simple().to_string());
            if find_node(tree, Some(&candidate)).is_none() {
                return candidate;
            }
            trace!(id = %candidate, "random id collided, retrying");
        }
    }
}

/// Which generator a session uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdStrategy {
    #[default]
    Sequential,
    Random,
}

impl IdStrategy {
    /// Builds the generator, continuing after the ids already in `tree`.
    pub fn generator(self, tree: &Node) -> Box<dyn IdGenerator> {
        match self {
            IdStrategy::Sequential => Box::new(SequentialIds::continuing(tree)),
            IdStrategy::Random => Box::new(RandomIds),
        }
    }
}
