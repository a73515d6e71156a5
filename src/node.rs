//! CHAMP trie node types and bitmap helpers.

use std::fmt;
use std::sync::Arc;

/// Bits per trie level (5 → 32-way branching).
pub const BITS_PER_LEVEL: u32 = 5;

/// Maximum bit-shift value (depth 12, last level uses 4 bits).
pub const MAX_SHIFT: u32 = 60;

/// Inline entry storing a key-value pair with its precomputed hash.
#[derive(Clone)]
pub struct Entry<K, V> {
    /// Precomputed 64-bit hash of the key.
    pub hash: u64,
    /// The key.
    pub key: K,
    /// The value.
    pub value: V,
}

/// Shared reference to a trie node.
///
/// Published nodes are never written through a shared reference; writers go
/// through [`Arc::make_mut`], which copies a node only while it is shared.
pub type NodeRef<K, V> = Arc<Node<K, V>>;

/// CHAMP trie node.
///
/// Two variants maintain the canonical form invariant:
/// - [`Inner`](Self::Inner) — bitmap-compressed node at depth `d < D`
/// - [`Collision`](Self::Collision) — linear node for full 64-bit hash collisions
#[derive(Clone)]
pub enum Node<K, V> {
    /// Bitmap-compressed inner node.
    ///
    /// Invariants: `data_map & node_map == 0`,
    /// `entries.len() == data_map.count_ones()`,
    /// `children.len() == node_map.count_ones()`.
    Inner {
        /// Bitmap of positions occupied by inline entries.
        data_map: u32,
        /// Bitmap of positions occupied by child subtrees.
        node_map: u32,
        /// Inline entries, ordered by position.
        entries: Vec<Entry<K, V>>,
        /// Child subtrees, ordered by position.
        children: Vec<NodeRef<K, V>>,
    },
    /// Collision node for keys sharing the same 64-bit hash.
    ///
    /// Invariant: `entries.len() >= 2` once published.
    Collision {
        /// The shared 64-bit hash value.
        hash: u64,
        /// Colliding entries in insertion order.
        entries: Vec<Entry<K, V>>,
    },
}

// ---------------------------------------------------------------------------
// Bitmap helpers
// ---------------------------------------------------------------------------

/// Extracts the 5-bit hash fragment at the given bit-shift depth.
#[inline]
#[must_use]
pub const fn fragment(hash: u64, shift: u32) -> u32 {
    ((hash >> shift) & 0x1F) as u32
}

/// Returns the single-bit mask for the given fragment (0..31).
#[inline]
#[must_use]
pub const fn mask(frag: u32) -> u32 {
    1 << frag
}

/// Returns the compact index of `bit` within `bitmap`.
///
/// Counts the number of set bits below `bit`.
#[inline]
#[must_use]
pub const fn index(bitmap: u32, bit: u32) -> usize {
    (bitmap & (bit - 1)).count_ones() as usize
}

// ---------------------------------------------------------------------------
// Construction & accessors
// ---------------------------------------------------------------------------

impl<K, V> Node<K, V> {
    /// Creates an inner node holding a single inline entry.
    #[must_use]
    pub fn leaf(entry: Entry<K, V>, shift: u32) -> Self {
        Self::Inner {
            data_map: mask(fragment(entry.hash, shift)),
            node_map: 0,
            entries: vec![entry],
            children: Vec::new(),
        }
    }

    /// Returns the number of inline data entries.
    #[must_use]
    pub const fn data_len(&self) -> usize {
        match self {
            Self::Inner { entries, .. } | Self::Collision { entries, .. } => entries.len(),
        }
    }

    /// Returns the number of child subtrees (always 0 for collision nodes).
    #[must_use]
    pub const fn children_len(&self) -> usize {
        match self {
            Self::Inner { children, .. } => children.len(),
            Self::Collision { .. } => 0,
        }
    }

    /// Returns `true` for a node with no entries and no children.
    ///
    /// Only a root can reach this state, after its last entry is removed.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.data_len() == 0 && self.children_len() == 0
    }

    /// Returns the sole entry of a node that holds exactly one entry and no
    /// children. Such a node must be inlined into its parent.
    #[must_use]
    pub fn singleton(&self) -> Option<&Entry<K, V>> {
        match self {
            Self::Inner {
                entries, children, ..
            } if entries.len() == 1 && children.is_empty() => entries.first(),
            Self::Collision { entries, .. } if entries.len() == 1 => entries.first(),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Manual trait impls — avoid false `K: Debug, V: Debug` bounds.
// ---------------------------------------------------------------------------

impl<K, V> fmt::Debug for Node<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inner {
                data_map, node_map, ..
            } => f
                .debug_struct("Inner")
                .field("data_map", &format_args!("{data_map:#034b}"))
                .field("node_map", &format_args!("{node_map:#034b}"))
                .finish_non_exhaustive(),
            Self::Collision { hash, entries } => f
                .debug_struct("Collision")
                .field("hash", hash)
                .field("entries_len", &entries.len())
                .finish(),
        }
    }
}
