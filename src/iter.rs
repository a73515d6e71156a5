//! Iterator types for [`FrozenMap`](crate::FrozenMap).
//!
//! Iteration order follows the trie layout and is unspecified; it is not
//! part of a map's identity.

use std::iter::FusedIterator;
use std::slice;

use crate::node::{Entry, Node, NodeRef};

/// Iterator over references to key-value pairs in a [`FrozenMap`](crate::FrozenMap).
///
/// Walks the trie depth-first with an explicit stack, inline entries of a
/// node before its children.
pub struct Iter<'a, K, V> {
    entries: slice::Iter<'a, Entry<K, V>>,
    pending: Vec<&'a Node<K, V>>,
    remaining: usize,
}

impl<'a, K, V> Iter<'a, K, V> {
    pub(crate) fn new(root: Option<&'a NodeRef<K, V>>, len: usize) -> Self {
        Self {
            entries: <&[Entry<K, V>]>::default().iter(),
            pending: root.map(|r| &**r).into_iter().collect(),
            remaining: len,
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(e) = self.entries.next() {
                self.remaining -= 1;
                return Some((&e.key, &e.value));
            }
            match self.pending.pop()? {
                Node::Inner {
                    entries, children, ..
                } => {
                    self.entries = entries.iter();
                    self.pending.extend(children.iter().rev().map(|c| &**c));
                }
                Node::Collision { entries, .. } => self.entries = entries.iter(),
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

/// Iterator over the keys of a [`FrozenMap`](crate::FrozenMap).
pub struct Keys<'a, K, V>(pub(crate) Iter<'a, K, V>);

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<&'a K> {
        self.0.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {}

impl<K, V> FusedIterator for Keys<'_, K, V> {}

/// Iterator over the values of a [`FrozenMap`](crate::FrozenMap).
pub struct Values<'a, K, V>(pub(crate) Iter<'a, K, V>);

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<&'a V> {
        self.0.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {}

impl<K, V> FusedIterator for Values<'_, K, V> {}
