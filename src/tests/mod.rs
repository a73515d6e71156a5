mod basic;
mod canonical;
mod traits;

use std::collections::HashSet;
use std::fmt::Write;
use std::sync::Arc;

use crate::FrozenMap;
use crate::node::Node;

/// Addresses of every node reachable from the map's root.
pub fn node_ptrs<K, V>(map: &FrozenMap<K, V>) -> HashSet<usize> {
    fn walk<K, V>(node: &Arc<Node<K, V>>, out: &mut HashSet<usize>) {
        out.insert(Arc::as_ptr(node) as usize);
        if let Node::Inner { children, .. } = &**node {
            for child in children {
                walk(child, out);
            }
        }
    }
    let mut out = HashSet::new();
    if let Some(root) = map.root() {
        walk(root, &mut out);
    }
    out
}

/// Textual rendering of the trie shape (bitmaps and collision sizes only).
pub fn shape<K, V>(map: &FrozenMap<K, V>) -> String {
    fn walk<K, V>(node: &Node<K, V>, out: &mut String) {
        match node {
            Node::Inner {
                data_map,
                node_map,
                children,
                ..
            } => {
                let _ = write!(out, "I({data_map:x},{node_map:x})[");
                for child in children {
                    walk(child, out);
                }
                out.push(']');
            }
            Node::Collision { hash, entries } => {
                let _ = write!(out, "C({hash:x},{})", entries.len());
            }
        }
    }
    let mut out = String::new();
    if let Some(root) = map.root() {
        walk(root, &mut out);
    }
    out
}
