//! Copy-on-write mutation view over a [`FrozenMap`].
//!
//! A view starts out sharing every node with the map it was opened from.
//! The first write to a path copies the nodes along it; those copies are
//! owned by the view alone, so later writes through the same nodes happen in
//! place. [`MapMutation::finish`] hands the working root to a new map without
//! copying anything.

use std::fmt;
use std::hash::Hash;

use tracing::debug;

use crate::FrozenMap;
use crate::adhash;
use crate::error::{Error, Result};
use crate::node::{Entry, NodeRef};
use crate::ops::{get_root, insert_root, remove_root};

/// Working state of an open mutation session.
pub struct Editor<K, V> {
    root: Option<NodeRef<K, V>>,
    size: usize,
}

impl<K, V> Editor<K, V> {
    pub(crate) const fn new(root: Option<NodeRef<K, V>>, size: usize) -> Self {
        Self { root, size }
    }

    pub(crate) fn into_map(self) -> FrozenMap<K, V> {
        FrozenMap::from_parts(self.root, self.size)
    }
}

impl<K: Hash + Eq, V> Editor<K, V> {
    fn get(&self, key: &K) -> Option<&V> {
        get_root(self.root.as_ref(), key)
    }
}

impl<K: Hash + Eq + Clone, V: Clone> Editor<K, V> {
    pub(crate) fn set(&mut self, key: K, value: V) -> Option<V> {
        let entry = Entry {
            hash: adhash::hash_one(&key),
            key,
            value,
        };
        let old = insert_root(&mut self.root, entry);
        if old.is_none() {
            self.size += 1;
        }
        old
    }

    pub(crate) fn remove(&mut self, key: &K) -> Option<V> {
        self.get(key)?;
        let removed = remove_root(&mut self.root, adhash::hash_one(key), key);
        if removed.is_some() {
            self.size -= 1;
        }
        removed
    }
}

/// Batch editor over a snapshot of a [`FrozenMap`].
///
/// Obtained from [`FrozenMap::mutate`]. Once [`close`](Self::close) or
/// [`finish`](Self::finish) has been called, every operation fails with
/// [`Error::MutationClosed`].
pub struct MapMutation<K, V> {
    editor: Option<Editor<K, V>>,
}

impl<K, V> MapMutation<K, V> {
    pub(crate) const fn new(editor: Editor<K, V>) -> Self {
        Self {
            editor: Some(editor),
        }
    }

    fn editor(&self) -> Result<&Editor<K, V>> {
        self.editor.as_ref().ok_or_else(closed)
    }

    fn editor_mut(&mut self) -> Result<&mut Editor<K, V>> {
        self.editor.as_mut().ok_or_else(closed)
    }

    /// Returns `true` once the view has been closed or finished.
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        self.editor.is_none()
    }

    /// Returns the number of entries in the working map.
    ///
    /// # Errors
    ///
    /// [`Error::MutationClosed`] after `close`/`finish`.
    pub fn len(&self) -> Result<usize> {
        Ok(self.editor()?.size)
    }

    /// Returns `true` if the working map is empty.
    ///
    /// # Errors
    ///
    /// [`Error::MutationClosed`] after `close`/`finish`.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.editor()?.size == 0)
    }

    /// Publishes the working state as a new map in O(1) and closes the view.
    ///
    /// # Errors
    ///
    /// [`Error::MutationClosed`] if the view was already closed or finished.
    pub fn finish(&mut self) -> Result<FrozenMap<K, V>> {
        self.editor.take().map(Editor::into_map).ok_or_else(closed)
    }

    /// Closes the view, discarding unpublished edits. Idempotent.
    pub fn close(&mut self) {
        self.editor = None;
    }
}

impl<K: Hash + Eq, V> MapMutation<K, V> {
    /// Returns a reference to the value bound to `key` in the working map.
    ///
    /// # Errors
    ///
    /// [`Error::MutationClosed`] after `close`/`finish`.
    pub fn get(&self, key: &K) -> Result<Option<&V>> {
        Ok(self.editor()?.get(key))
    }

    /// Returns `true` if the working map contains `key`.
    ///
    /// # Errors
    ///
    /// [`Error::MutationClosed`] after `close`/`finish`.
    pub fn contains_key(&self, key: &K) -> Result<bool> {
        Ok(self.editor()?.get(key).is_some())
    }
}

impl<K: Hash + Eq + Clone, V: Clone> MapMutation<K, V> {
    /// Binds `key` to `value`, returning the previous value if any.
    ///
    /// # Errors
    ///
    /// [`Error::MutationClosed`] after `close`/`finish`.
    pub fn set(&mut self, key: K, value: V) -> Result<Option<V>> {
        Ok(self.editor_mut()?.set(key, value))
    }

    /// Removes `key`, which must be present.
    ///
    /// # Errors
    ///
    /// [`Error::KeyNotFound`] if `key` is absent (nothing is copied), or
    /// [`Error::MutationClosed`] after `close`/`finish`.
    pub fn delete(&mut self, key: &K) -> Result<()> {
        self.editor_mut()?
            .remove(key)
            .map(drop)
            .ok_or(Error::KeyNotFound)
    }

    /// Removes `key` if present and returns its value.
    ///
    /// # Errors
    ///
    /// [`Error::MutationClosed`] after `close`/`finish`.
    pub fn pop(&mut self, key: &K) -> Result<Option<V>> {
        Ok(self.editor_mut()?.remove(key))
    }

    /// Binds every pair from `pairs`, later pairs winning.
    ///
    /// # Errors
    ///
    /// [`Error::MutationClosed`] after `close`/`finish`.
    pub fn update<I: IntoIterator<Item = (K, V)>>(&mut self, pairs: I) -> Result<()> {
        let editor = self.editor_mut()?;
        for (k, v) in pairs {
            editor.set(k, v);
        }
        Ok(())
    }
}

fn closed() -> Error {
    debug!("operation on a finalized mutation view");
    Error::MutationClosed
}

impl<K, V> fmt::Debug for MapMutation<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.editor {
            Some(editor) => f
                .debug_struct("MapMutation")
                .field("len", &editor.size)
                .finish_non_exhaustive(),
            None => f.write_str("MapMutation(closed)"),
        }
    }
}
