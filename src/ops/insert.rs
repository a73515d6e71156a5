//! Insertion operation — COW path-copy insert.

use std::mem;
use std::sync::Arc;

use crate::node::{self, Entry, Node, NodeRef};

/// Inserts `entry` into the subtree rooted at `node` via COW path-copy.
///
/// Every node on the path is obtained through [`Arc::make_mut`]: a node still
/// shared with another map version is copied (its children stay shared), a
/// node already owned by this writer is updated in place.
///
/// Returns the replaced value if the key was present.
pub fn insert_recursive<K, V>(node: &mut NodeRef<K, V>, entry: Entry<K, V>, shift: u32) -> Option<V>
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
            let bit = node::mask(node::fragment(entry.hash, shift));

            if *data_map & bit != 0 {
                let pos = node::index(*data_map, bit);
                let existing = &mut entries[pos];
                if existing.hash == entry.hash && existing.key == entry.key {
                    // Same key → update value.
                    return Some(mem::replace(&mut existing.value, entry.value));
                }

                // Different key at same position → push both into a subtree.
                let existing = entries.remove(pos);
                let subtree = create_subtree(existing, entry, shift + node::BITS_PER_LEVEL);
                *data_map &= !bit;
                *node_map |= bit;
                children.insert(node::index(*node_map, bit), Arc::new(subtree));
                None
            } else if *node_map & bit != 0 {
                let pos = node::index(*node_map, bit);
                insert_recursive(&mut children[pos], entry, shift + node::BITS_PER_LEVEL)
            } else {
                // Position empty → add inline entry.
                *data_map |= bit;
                entries.insert(node::index(*data_map, bit), entry);
                None
            }
        }
        Node::Collision { entries, .. } => {
            if let Some(existing) = entries.iter_mut().find(|e| e.key == entry.key) {
                return Some(mem::replace(&mut existing.value, entry.value));
            }
            entries.push(entry);
            None
        }
    }
}

/// Creates a subtree from two entries that collide at the current depth.
///
/// Recursively descends until hash fragments differ, or creates a collision
/// node once all hash bits are consumed.
fn create_subtree<K, V>(e1: Entry<K, V>, e2: Entry<K, V>, shift: u32) -> Node<K, V> {
    if shift > node::MAX_SHIFT {
        return Node::Collision {
            hash: e1.hash,
            entries: vec![e1, e2],
        };
    }

    let f1 = node::fragment(e1.hash, shift);
    let f2 = node::fragment(e2.hash, shift);

    if f1 == f2 {
        let child = create_subtree(e1, e2, shift + node::BITS_PER_LEVEL);
        Node::Inner {
            data_map: 0,
            node_map: node::mask(f1),
            entries: Vec::new(),
            children: vec![Arc::new(child)],
        }
    } else {
        let entries = if f1 < f2 { vec![e1, e2] } else { vec![e2, e1] };
        Node::Inner {
            data_map: node::mask(f1) | node::mask(f2),
            node_map: 0,
            entries,
            children: Vec::new(),
        }
    }
}
