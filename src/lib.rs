//! Frozen persistent hash map and layered context variables.
//!
//! [`FrozenMap`] is an immutable map backed by a CHAMP trie
//! (Compressed Hash-Array Mapped Prefix-tree), the canonical-form refinement
//! of the HAMT: the same set of key-value pairs always produces the same trie
//! structure, regardless of insertion order.
//!
//! [`ContextStack`], [`Context`] and [`ContextVar`] build dynamically scoped
//! variables on top of it: each layer's bindings are a `FrozenMap`, so
//! snapshotting a layer is O(1).
//!
//! # Key properties
//!
//! - **Persistence**: updates return new maps, old versions stay valid
//! - **COW structural sharing**: an update copies one root-to-leaf path
//! - **Batch edits**: [`MapMutation`] copies each path at most once per session
//! - **Shape-independent equality and hashing**: via `AdHash`
//! - **Zero `unsafe`**: enforced by `#![forbid(unsafe_code)]`
//!
//! # References
//!
//! - Steindorfer & Vinju, 2015 — "Optimizing Hash-Array Mapped Tries
//!   for Fast and Lean Immutable JVM Collections", OOPSLA 2015
//! - Bagwell, 2001 — "Ideal Hash Trees"

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![allow(clippy::module_name_repetitions)]

pub mod adhash;
pub mod context;
pub mod iter;

mod error;
mod map;
mod mutation;
mod node;
mod ops;

#[cfg(test)]
mod tests;

pub use context::{Context, ContextStack, ContextVar, LazyScope, Token, VarId};
pub use error::{Error, Result};
pub use map::FrozenMap;
pub use mutation::MapMutation;
