//! Recursive trie operations shared by [`FrozenMap`](crate::FrozenMap) and
//! [`MapMutation`](crate::MapMutation).

use std::sync::Arc;

use crate::adhash;
use crate::node::{Entry, Node, NodeRef};

pub mod get;
pub mod insert;
pub mod remove;

/// Looks up `key` starting at an optional root.
pub fn get_root<'a, K: std::hash::Hash + Eq, V>(
    root: Option<&'a NodeRef<K, V>>,
    key: &K,
) -> Option<&'a V> {
    get::get_recursive(root?, adhash::hash_one(key), key, 0)
}

/// Inserts `entry` under an optional root, creating the root if needed.
///
/// Returns the replaced value if the key was present.
pub fn insert_root<K: Eq + Clone, V: Clone>(
    root: &mut Option<NodeRef<K, V>>,
    entry: Entry<K, V>,
) -> Option<V> {
    if let Some(node) = root {
        insert::insert_recursive(node, entry, 0)
    } else {
        *root = Some(Arc::new(Node::leaf(entry, 0)));
        None
    }
}

/// Removes `key` under an optional root, dropping the root once empty.
///
/// The caller guarantees that `key` is present.
pub fn remove_root<K: Eq + Clone, V: Clone>(
    root: &mut Option<NodeRef<K, V>>,
    hash: u64,
    key: &K,
) -> Option<V> {
    let node = root.as_mut()?;
    let removed = remove::remove_recursive(node, hash, key, 0)?;
    if node.is_empty() {
        *root = None;
    }
    Some(removed)
}
