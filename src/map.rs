//! Frozen (persistent) CHAMP map.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::hash::{BuildHasher, Hash, Hasher};
use std::ops;
use std::sync::{Arc, OnceLock};

use crate::adhash;
use crate::error::{Error, Result};
use crate::iter::{Iter, Keys, Values};
use crate::mutation::{Editor, MapMutation};
use crate::node::{Entry, NodeRef};
use crate::ops::{get_root, insert_root, remove_root};

/// Immutable hash map based on a CHAMP trie.
///
/// Every "mutating" operation returns a new map and leaves the receiver
/// untouched. The new map shares all subtrees off the modified path with the
/// old one, so an update costs O(log₃₂ n) node copies.
///
/// Same set of key-value pairs always produces the same trie structure
/// (canonical form). Equality and [`content_hash`](Self::content_hash) depend
/// only on the pairs, never on insertion history.
pub struct FrozenMap<K, V> {
    root: Option<NodeRef<K, V>>,
    size: usize,
    content_hash: OnceLock<u64>,
}

// ---------------------------------------------------------------------------
// Construction & accessors — no trait bounds
// ---------------------------------------------------------------------------

impl<K, V> FrozenMap<K, V> {
    /// Creates an empty map.
    #[must_use]
    pub const fn new() -> Self {
        Self::from_parts(None, 0)
    }

    pub(crate) const fn from_parts(root: Option<NodeRef<K, V>>, size: usize) -> Self {
        Self {
            root,
            size,
            content_hash: OnceLock::new(),
        }
    }

    #[cfg(test)]
    pub(crate) const fn root(&self) -> Option<&NodeRef<K, V>> {
        self.root.as_ref()
    }

    /// Returns the number of key-value pairs.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.size
    }

    /// Returns `true` if the map contains no entries.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Returns `true` if both maps share the same root node.
    ///
    /// Implies equality; the converse does not hold.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (&self.root, &other.root) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        }
    }

    /// Returns an iterator over `(&K, &V)` pairs in unspecified order.
    #[must_use]
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(self.root.as_ref(), self.size)
    }

    /// Returns an iterator over the keys.
    #[must_use]
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys(self.iter())
    }

    /// Returns an iterator over the values.
    #[must_use]
    pub fn values(&self) -> Values<'_, K, V> {
        Values(self.iter())
    }

    /// Opens a copy-on-write mutation view over this map.
    ///
    /// The view shares every node with `self` until it writes to a path.
    #[must_use]
    pub fn mutate(&self) -> MapMutation<K, V> {
        MapMutation::new(Editor::new(self.root.clone(), self.size))
    }
}

// ---------------------------------------------------------------------------
// Read operations — K: Hash + Eq
// ---------------------------------------------------------------------------

impl<K: Hash + Eq, V> FrozenMap<K, V> {
    /// Returns a reference to the value associated with `key`.
    #[must_use]
    pub fn get(&self, key: &K) -> Option<&V> {
        get_root(self.root.as_ref(), key)
    }

    /// Returns the value associated with `key`, failing if it is absent.
    ///
    /// # Errors
    ///
    /// [`Error::KeyNotFound`] if `key` is not in the map.
    pub fn lookup(&self, key: &K) -> Result<&V> {
        self.get(key).ok_or(Error::KeyNotFound)
    }

    /// Returns `true` if the map contains the given key.
    #[must_use]
    pub fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }
}

// ---------------------------------------------------------------------------
// Persistent updates — K: Hash + Eq + Clone, V: Clone
// ---------------------------------------------------------------------------

impl<K: Hash + Eq + Clone, V: Clone> FrozenMap<K, V> {
    /// Returns a new map with `key` bound to `value`.
    ///
    /// Inserting a pair that is already present yields a map equal to `self`.
    #[must_use]
    pub fn insert(&self, key: K, value: V) -> Self {
        let mut root = self.root.clone();
        let entry = Entry {
            hash: adhash::hash_one(&key),
            key,
            value,
        };
        let added = insert_root(&mut root, entry).is_none();
        Self::from_parts(root, self.size + usize::from(added))
    }

    /// Returns a new map without `key`.
    ///
    /// # Errors
    ///
    /// [`Error::KeyNotFound`] if `key` is not in the map.
    pub fn remove(&self, key: &K) -> Result<Self> {
        if !self.contains_key(key) {
            return Err(Error::KeyNotFound);
        }
        let mut root = self.root.clone();
        remove_root(&mut root, adhash::hash_one(key), key);
        Ok(Self::from_parts(root, self.size - 1))
    }

    /// Returns the right-biased union of `self` and `other`.
    ///
    /// Pairs from `other` win on key conflicts. All writes go through a
    /// single mutation session, so nodes are copied at most once.
    #[must_use]
    pub fn merge<I: IntoIterator<Item = (K, V)>>(&self, other: I) -> Self {
        let mut editor = Editor::new(self.root.clone(), self.size);
        for (k, v) in other {
            editor.set(k, v);
        }
        editor.into_map()
    }

    /// Applies `f` to a fresh mutation view and publishes the result.
    ///
    /// The view is finished when `f` returns `Ok`, and closed with all edits
    /// discarded when `f` returns `Err` or panics. `self` is never altered.
    ///
    /// # Errors
    ///
    /// Any error returned by `f`, or [`Error::MutationClosed`] if `f` closed
    /// the view itself.
    pub fn with_mutation<F>(&self, f: F) -> Result<Self>
    where
        F: FnOnce(&mut MapMutation<K, V>) -> Result<()>,
    {
        let mut view = self.mutate();
        match f(&mut view) {
            Ok(()) => view.finish(),
            Err(e) => {
                view.close();
                Err(e)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Content hash — K: Hash, V: Hash
// ---------------------------------------------------------------------------

impl<K: Hash, V: Hash> FrozenMap<K, V> {
    /// Returns the order-independent `AdHash` of the map contents.
    ///
    /// Computed on first use and cached for the lifetime of this map value.
    #[must_use]
    pub fn content_hash(&self) -> u64 {
        *self.content_hash.get_or_init(|| {
            adhash::fold(
                self.iter()
                    .map(|(k, v)| (adhash::hash_one(k), adhash::hash_one(v))),
            )
        })
    }
}

// ---------------------------------------------------------------------------
// Trait impls
// ---------------------------------------------------------------------------

impl<K, V> Clone for FrozenMap<K, V> {
    fn clone(&self) -> Self {
        Self {
            root: self.root.clone(),
            size: self.size,
            content_hash: self.content_hash.clone(),
        }
    }
}

impl<K, V> Default for FrozenMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for FrozenMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: Hash + Eq, V: PartialEq> PartialEq for FrozenMap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        if self.size != other.size {
            return false;
        }
        if self.ptr_eq(other) {
            return true;
        }
        // Differing cached content hashes settle it without a walk.
        if let (Some(a), Some(b)) = (self.content_hash.get(), other.content_hash.get())
            && a != b
        {
            return false;
        }
        self.iter().all(|(k, v)| other.get(k) == Some(v))
    }
}

impl<K: Hash + Eq, V: Eq> Eq for FrozenMap<K, V> {}

impl<K: Hash, V: Hash> Hash for FrozenMap<K, V> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_usize(self.size);
        state.write_u64(self.content_hash());
    }
}

impl<K: Hash + Eq + Clone, V: Clone> FromIterator<(K, V)> for FrozenMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::new().merge(iter)
    }
}

impl<K: Hash + Eq + Clone, V: Clone, const N: usize> From<[(K, V); N]> for FrozenMap<K, V> {
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

impl<K: Hash + Eq + Clone, V: Clone, S: BuildHasher> From<HashMap<K, V, S>> for FrozenMap<K, V> {
    fn from(map: HashMap<K, V, S>) -> Self {
        map.into_iter().collect()
    }
}

impl<K: Hash + Eq + Clone, V: Clone> From<BTreeMap<K, V>> for FrozenMap<K, V> {
    fn from(map: BTreeMap<K, V>) -> Self {
        map.into_iter().collect()
    }
}

impl<K: Hash + Eq, V> ops::Index<&K> for FrozenMap<K, V> {
    type Output = V;

    fn index(&self, key: &K) -> &V {
        self.get(key).expect("key not found")
    }
}

impl<'a, K, V> IntoIterator for &'a FrozenMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}
