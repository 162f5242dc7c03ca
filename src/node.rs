//! Multi-view branch node for reconstructed config trees.

use indexmap::IndexMap;

use crate::codec::Node;
use crate::value::{Tree, Value};

/// One child of a [`ConfigNode`]: a leaf value or a nested node.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeChild {
    Value(Value),
    Node(ConfigNode),
}

impl NodeChild {
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            NodeChild::Value(value) => Some(value),
            NodeChild::Node(_) => None,
        }
    }

    pub fn as_node(&self) -> Option<&ConfigNode> {
        match self {
            NodeChild::Node(node) => Some(node),
            NodeChild::Value(_) => None,
        }
    }
}

/// A branch node exposing explicit views over its children: values only,
/// branches only, a full recursive snapshot, and get-with-default lookup.
///
/// Pass this as the node type of [`unflatten`](crate::unflatten) to get a
/// navigable config object instead of a plain [`Tree`]:
///
/// ```
/// use conftree::{flatten, unflatten, ConfigNode, Tree};
///
/// let mut db = Tree::new();
/// db.insert_leaf("host", "localhost");
/// let mut tree = Tree::new();
/// tree.insert_branch("database", db);
///
/// let node: ConfigNode = unflatten(&flatten(&tree));
/// let host = node.at("database.host").unwrap();
/// assert_eq!(host.as_value().unwrap().as_str(), Some("localhost"));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigNode {
    children: IndexMap<String, NodeChild>,
}

impl ConfigNode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&NodeChild> {
        self.children.get(key)
    }

    /// Get-with-default lookup over direct children.
    pub fn get_or<'a>(&'a self, key: &str, default: &'a NodeChild) -> &'a NodeChild {
        self.children.get(key).unwrap_or(default)
    }

    /// Direct children holding leaf values.
    pub fn values(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.children.iter().filter_map(|(key, child)| match child {
            NodeChild::Value(value) => Some((key.as_str(), value)),
            NodeChild::Node(_) => None,
        })
    }

    /// Direct children holding nested nodes.
    pub fn branches(&self) -> impl Iterator<Item = (&str, &ConfigNode)> {
        self.children.iter().filter_map(|(key, child)| match child {
            NodeChild::Node(node) => Some((key.as_str(), node)),
            NodeChild::Value(_) => None,
        })
    }

    /// Full recursive snapshot as a plain [`Tree`].
    pub fn to_tree(&self) -> Tree {
        let mut tree = Tree::new();
        for (key, child) in &self.children {
            match child {
                NodeChild::Value(value) => tree.insert_leaf(key.clone(), value.clone()),
                NodeChild::Node(node) => tree.insert_branch(key.clone(), node.to_tree()),
            }
        }
        tree
    }

    /// Walks a dot-notation path (`"database.host"`) from this node.
    pub fn at(&self, dotted: &str) -> Option<&NodeChild> {
        let mut segments = dotted.split('.');
        let mut current = self.children.get(segments.next()?)?;
        for segment in segments {
            current = current.as_node()?.get(segment)?;
        }
        Some(current)
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

impl Node for ConfigNode {
    fn empty() -> Self {
        ConfigNode::new()
    }

    fn set_value(&mut self, key: &str, value: Value) {
        self.children.insert(key.to_string(), NodeChild::Value(value));
    }

    fn set_branch(&mut self, key: &str, branch: Self) {
        self.children.insert(key.to_string(), NodeChild::Node(branch));
    }

    fn branch_mut(&mut self, key: &str) -> Option<&mut Self> {
        match self.children.get_mut(key) {
            Some(NodeChild::Node(node)) => Some(node),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{unflatten, FlatMap};
    use crate::key::KeyChain;

    fn fixture() -> ConfigNode {
        let mut flat = FlatMap::new();
        flat.insert(KeyChain::from_dotted("Lvl1.Key1"), Value::from("Value1"));
        flat.insert(
            KeyChain::from_dotted("Lvl1.Key2.level1.key1"),
            Value::from("value1"),
        );
        flat.insert(KeyChain::from_segments(["top"]), Value::from("tv"));
        unflatten(&flat)
    }

    #[test]
    fn test_at_walks_nested_path() {
        let node = fixture();
        let child = node.at("Lvl1.Key2.level1.key1").unwrap();
        assert_eq!(child.as_value().unwrap(), &Value::from("value1"));
        assert!(node.at("Lvl1.missing").is_none());
        assert!(node.at("top.too.deep").is_none());
    }

    #[test]
    fn test_value_and_branch_views() {
        let node = fixture();
        let lvl1 = node.get("Lvl1").unwrap().as_node().unwrap();

        let values: Vec<_> = lvl1.values().collect();
        assert_eq!(values, [("Key1", &Value::from("Value1"))]);

        let branches: Vec<_> = lvl1.branches().map(|(k, _)| k).collect();
        assert_eq!(branches, ["Key2"]);
    }

    #[test]
    fn test_to_tree_snapshot() {
        let node = fixture();
        let tree = node.to_tree();

        let mut level1 = Tree::new();
        level1.insert_leaf("key1", "value1");
        let mut key2 = Tree::new();
        key2.insert_branch("level1", level1);
        let mut lvl1 = Tree::new();
        lvl1.insert_leaf("Key1", "Value1");
        lvl1.insert_branch("Key2", key2);
        let mut expected = Tree::new();
        expected.insert_branch("Lvl1", lvl1);
        expected.insert_leaf("top", "tv");

        assert_eq!(tree, expected);
    }

    #[test]
    fn test_get_or_default() {
        let node = fixture();
        let default = NodeChild::Value(Value::from("fallback"));

        assert_eq!(
            node.get_or("top", &default).as_value().unwrap(),
            &Value::from("tv")
        );
        assert_eq!(node.get_or("missing", &default), &default);
    }
}
