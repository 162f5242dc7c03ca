//! The key-chain codec: bidirectional transform between a nested tree and
//! a flat map keyed by key-chains.
//!
//! For example, `{"key1": {"key11": {"key111": "value1"}}}` flattens to
//! `{("key1", "key11", "key111"): "value1"}`. The flat form is the
//! canonical intermediate representation the include and substitution
//! resolvers operate on.

use indexmap::IndexMap;

use crate::key::KeyChain;
use crate::value::{Tree, TreeValue, Value};

/// Flat representation of a config tree: one entry per leaf.
///
/// Invariant: no key-chain is a strict prefix of another. [`flatten`] can
/// never produce a violating map; callers constructing flat maps by hand
/// must uphold this themselves, or [`unflatten`] will silently drop the
/// shorter entry.
pub type FlatMap = IndexMap<KeyChain, Value>;

/// Branch node contract used by [`unflatten`] to reconstruct nesting.
///
/// Implemented by the plain [`Tree`] and by
/// [`ConfigNode`](crate::ConfigNode); any conforming representation works,
/// the reconstruction algorithm never looks inside a node beyond these
/// operations.
pub trait Node: Sized {
    /// Creates an empty branch.
    fn empty() -> Self;

    /// Sets a leaf value under `key`.
    fn set_value(&mut self, key: &str, value: Value);

    /// Attaches a child branch under `key`.
    fn set_branch(&mut self, key: &str, branch: Self);

    /// Returns the existing branch under `key`, if `key` currently holds
    /// a branch rather than a leaf.
    fn branch_mut(&mut self, key: &str) -> Option<&mut Self>;
}

impl Node for Tree {
    fn empty() -> Self {
        Tree::new()
    }

    fn set_value(&mut self, key: &str, value: Value) {
        self.insert_leaf(key, value);
    }

    fn set_branch(&mut self, key: &str, branch: Self) {
        self.insert_branch(key, branch);
    }

    fn branch_mut(&mut self, key: &str) -> Option<&mut Self> {
        self.branch_entry_mut(key)
    }
}

/// Converts a nested tree into a flat key-chain map.
///
/// Depth-first; every leaf of `tree` appears in the result exactly once.
pub fn flatten(tree: &Tree) -> FlatMap {
    let mut flat = FlatMap::new();
    flatten_into(tree, &KeyChain::root(), &mut flat);
    flat
}

fn flatten_into(tree: &Tree, parent: &KeyChain, out: &mut FlatMap) {
    for (key, child) in tree.iter() {
        let chain = parent.child(key);
        match child {
            TreeValue::Leaf(value) => {
                out.insert(chain, value.clone());
            }
            TreeValue::Branch(branch) => flatten_into(branch, &chain, out),
        }
    }
}

/// Reconstructs a nested structure from a flat key-chain map.
///
/// Entries are processed in ascending key-chain length so a branch exists
/// before any of its children are attached. When several leaves share a
/// branch, the first creates it and the rest merge into the existing
/// instance; an existing branch is never overwritten.
pub fn unflatten<N: Node>(flat: &FlatMap) -> N {
    let mut entries: Vec<(&KeyChain, &Value)> = flat.iter().collect();
    entries.sort_by_key(|(chain, _)| chain.len());

    let mut root = N::empty();
    for (chain, value) in entries {
        merge_chain(&mut root, chain.segments(), value);
    }
    root
}

fn merge_chain<N: Node>(node: &mut N, segments: &[String], value: &Value) {
    let Some((first, rest)) = segments.split_first() else {
        return;
    };

    if rest.is_empty() {
        node.set_value(first, value.clone());
        return;
    }

    if node.branch_mut(first).is_none() {
        node.set_branch(first, N::empty());
    }
    let branch = node.branch_mut(first).expect("branch was just attached");
    merge_chain(branch, rest, value);
}
