//! Removal operation — COW path-copy delete with canonical inlining.

use std::sync::Arc;

use crate::node::{self, Node, NodeRef};

/// Removes `key` from the subtree rooted at `node` via COW path-copy.
///
/// Callers check presence first: the path is copied before the key is
/// located, so a miss would copy nodes for nothing.
///
/// After a child loses an entry and is left holding a single entry with no
/// children, that entry is pulled up into the parent. Repeating this at every
/// level keeps the trie canonical.
pub fn remove_recursive<K, V>(node: &mut NodeRef<K, V>, hash: u64, key: &K, shift: u32) -> Option<V>
where
    K: Eq + Clone,
    V: Clone,
{
    match Arc::make_mut(node) {
        Node::Inner {
            data_map,
            node_map,
            entries,
            children,
        } => {
            let bit = node::mask(node::fragment(hash, shift));

            if *data_map & bit != 0 {
                let pos = node::index(*data_map, bit);
                let e = &entries[pos];
                if e.hash != hash || e.key != *key {
                    return None;
                }
                *data_map &= !bit;
                Some(entries.remove(pos).value)
            } else if *node_map & bit != 0 {
                let pos = node::index(*node_map, bit);
                let removed =
                    remove_recursive(&mut children[pos], hash, key, shift + node::BITS_PER_LEVEL)?;

                if let Some(inlined) = children[pos].singleton().cloned() {
                    children.remove(pos);
                    *node_map &= !bit;
                    *data_map |= bit;
                    entries.insert(node::index(*data_map, bit), inlined);
                }
                Some(removed)
            } else {
                None
            }
        }
        Node::Collision {
            hash: node_hash,
            entries,
        } => {
            if hash != *node_hash {
                return None;
            }
            let pos = entries.iter().position(|e| e.key == *key)?;
            Some(entries.remove(pos).value)
        }
    }
}
