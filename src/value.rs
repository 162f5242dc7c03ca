//! Leaf values and the nested tree representation.

use indexmap::IndexMap;
use serde::Serialize;

/// A leaf value: a single string or an ordered list of strings.
///
/// Scalars from typed formats (numbers, booleans) are stringified at the
/// read boundary; the core performs no type coercion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Str(String),
    List(Vec<String>),
}

impl Value {
    /// Builds a list value from any iterator of string-likes.
    pub fn list<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Value::List(items.into_iter().map(Into::into).collect())
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            Value::List(_) => None,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<Vec<String>> for Value {
    fn from(items: Vec<String>) -> Self {
        Value::List(items)
    }
}

/// One child of a tree branch: either a leaf or a nested branch.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TreeValue {
    Leaf(Value),
    Branch(Tree),
}

/// A nested config tree: an ordered mapping whose values are leaves or
/// further trees, arbitrarily deep.
///
/// Trees are value objects; the resolvers never mutate one in place, each
/// transform returns a fresh structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Tree {
    children: IndexMap<String, TreeValue>,
}

impl Tree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a leaf value under `key`, replacing any existing child.
    pub fn insert_leaf(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.children.insert(key.into(), TreeValue::Leaf(value.into()));
    }

    /// Attaches a nested branch under `key`, replacing any existing child.
    pub fn insert_branch(&mut self, key: impl Into<String>, branch: Tree) {
        self.children.insert(key.into(), TreeValue::Branch(branch));
    }

    pub fn get(&self, key: &str) -> Option<&TreeValue> {
        self.children.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TreeValue)> {
        self.children.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub(crate) fn branch_entry_mut(&mut self, key: &str) -> Option<&mut Tree> {
        match self.children.get_mut(key) {
            Some(TreeValue::Branch(branch)) => Some(branch),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_conversions() {
        assert_eq!(Value::from("a"), Value::Str("a".to_string()));
        assert_eq!(
            Value::list(["a", "b"]),
            Value::List(vec!["a".to_string(), "b".to_string()])
        );
        assert_eq!(Value::from("a").as_str(), Some("a"));
        assert_eq!(Value::list(["a"]).as_str(), None);
    }

    #[test]
    fn test_tree_insert_and_get() {
        let mut tree = Tree::new();
        tree.insert_leaf("key1", "value1");
        let mut nested = Tree::new();
        nested.insert_leaf("key2", "value2");
        tree.insert_branch("level1", nested);

        assert_eq!(tree.len(), 2);
        assert!(matches!(tree.get("key1"), Some(TreeValue::Leaf(_))));
        assert!(matches!(tree.get("level1"), Some(TreeValue::Branch(_))));
        assert!(tree.get("missing").is_none());
    }

    #[test]
    fn test_serialize_as_plain_nesting() {
        let mut inner = Tree::new();
        inner.insert_leaf("host", "localhost");
        inner.insert_leaf("ports", Value::list(["80", "443"]));
        let mut tree = Tree::new();
        tree.insert_branch("server", inner);

        let json = serde_json::to_string(&tree).unwrap();
        assert_eq!(
            json,
            r#"{"server":{"host":"localhost","ports":["80","443"]}}"#
        );
    }
}
