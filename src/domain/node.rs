//! Tree node entities

use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

/// Identifier of a node, unique within one tree.
///
/// Seed documents may carry ids as strings or as non-negative integers;
/// both are kept in string form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "RawNodeId", into = "String")]
pub struct NodeId(String);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawNodeId {
    Text(String),
    Number(u64),
}

impl From<RawNodeId> for NodeId {
    fn from(raw: RawNodeId) -> Self {
        match raw {
            RawNodeId::Text(s) => NodeId(s),
            RawNodeId::Number(n) => NodeId::from(n),
        }
    }
}

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric value of ids made of decimal digits only.
    pub fn as_number(&self) -> Option<u64> {
        if self.0.is_empty() || !self.0.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        self.0.parse().ok()
    }
}

impl From<u64> for NodeId {
    fn from(n: u64) -> Self {
        NodeId(n.to_string())
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        NodeId(s.to_string())
    }
}

impl From<NodeId> for String {
    fn from(id: NodeId) -> Self {
        id.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A labeled vertex holding its ordered children.
///
/// Children sit behind `Rc` so that an updated tree shares every untouched
/// subtree with the tree it was derived from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    /// `None` only for a seed root that was loaded without an id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<NodeId>,
    pub name: String,
    /// Display order is insertion order
    #[serde(default)]
    pub children: Vec<Rc<Node>>,
}

impl Node {
    /// Root node without an id, as found in a fresh seed.
    pub fn root(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            children: Vec::new(),
        }
    }

    pub fn leaf(id: NodeId, name: impl Into<String>) -> Self {
        Self {
            id: Some(id),
            name: name.into(),
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: impl IntoIterator<Item = Node>) -> Self {
        self.children.extend(children.into_iter().map(Rc::new));
        self
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Whether this node answers to `id` (`None` matches a node without id).
    pub fn has_id(&self, id: Option<&NodeId>) -> bool {
        self.id.as_ref() == id
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.id {
            Some(id) => write!(f, "{} [{}]", self.name, id),
            None => write!(f, "{}", self.name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_digit_id_when_as_number_then_parses() {
        assert_eq!(NodeId::from("42").as_number(), Some(42));
        assert_eq!(NodeId::from(7).as_number(), Some(7));
    }

    #[test]
    fn given_non_digit_id_when_as_number_then_none() {
        assert_eq!(NodeId::from("a1f3").as_number(), None);
        assert_eq!(NodeId::from("-3").as_number(), None);
        assert_eq!(NodeId::from("").as_number(), None);
    }

    #[test]
    fn given_node_with_and_without_id_when_display_then_shows_label() {
        assert_eq!(Node::root("root").to_string(), "root");
        assert_eq!(Node::leaf(NodeId::from(3), "A").to_string(), "A [3]");
    }

    #[test]
    fn given_root_without_id_when_has_id_none_then_matches() {
        let root = Node::root("root");
        assert!(root.has_id(None));
        assert!(!root.has_id(Some(&NodeId::from(1))));
    }
}
