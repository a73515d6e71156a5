//! Context variables: dynamically scoped bindings layered on a stack.
//!
//! A [`Context`] is one scope layer: a [`FrozenMap`] from variable identity
//! to value, plus an in-use flag that keeps the same layer from being active
//! on two stacks (or twice on one stack) at the same time. A
//! [`ContextStack`] is the chain of layers owned by one logical thread of
//! control. [`ContextVar`] reads walk the stack top to bottom; writes only
//! ever touch the top layer.

use std::any::Any;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use tracing::debug;

use crate::FrozenMap;
use crate::error::{Error, Result};

mod scope;
mod stack;
mod var;

pub use scope::LazyScope;
pub use stack::ContextStack;
pub use var::{ContextVar, Token, VarId};

/// Type-erased variable value stored in a layer.
pub(crate) type Value = Arc<dyn Any + Send + Sync>;

/// Bindings of one layer.
pub(crate) type Bindings = FrozenMap<VarId, Value>;

struct Layer {
    bindings: Mutex<Bindings>,
    in_use: AtomicBool,
}

/// A single scope layer of context-variable bindings.
///
/// Cloning a `Context` yields another handle to the *same* layer; use
/// [`copy`](Self::copy) for an independent layer with the same bindings.
#[derive(Clone)]
pub struct Context {
    layer: Arc<Layer>,
}

impl Context {
    /// Creates an empty layer that is not in use.
    #[must_use]
    pub fn new() -> Self {
        Self::with_bindings(Bindings::new(), false)
    }

    fn with_bindings(bindings: Bindings, in_use: bool) -> Self {
        Self {
            layer: Arc::new(Layer {
                bindings: Mutex::new(bindings),
                in_use: AtomicBool::new(in_use),
            }),
        }
    }

    pub(crate) fn from_bindings(bindings: Bindings) -> Self {
        Self::with_bindings(bindings, false)
    }

    /// Creates an empty layer already marked in use, for a new stack's base.
    pub(crate) fn entered() -> Self {
        Self::with_bindings(Bindings::new(), true)
    }

    /// Returns the value bound to `var` in this layer alone.
    ///
    /// Neither other layers nor the variable's default are consulted.
    #[must_use]
    pub fn get<T: Clone + 'static>(&self, var: &ContextVar<T>) -> Option<T> {
        self.lookup(var.id())
            .and_then(|v| v.downcast_ref::<T>().cloned())
    }

    /// Returns `true` if this layer binds `var`.
    #[must_use]
    pub fn contains<T>(&self, var: &ContextVar<T>) -> bool {
        self.layer.bindings.lock().contains_key(&var.id())
    }

    /// Returns the number of variables bound in this layer.
    #[must_use]
    pub fn len(&self) -> usize {
        self.layer.bindings.lock().len()
    }

    /// Returns `true` if this layer binds no variables.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` while the layer is active on some stack.
    #[must_use]
    pub fn is_in_use(&self) -> bool {
        self.layer.in_use.load(Ordering::Acquire)
    }

    /// Returns an independent layer holding the same bindings.
    ///
    /// O(1): the persistent bindings map is shared, not copied.
    #[must_use]
    pub fn copy(&self) -> Self {
        Self::from_bindings(self.bindings())
    }

    /// Returns `true` if both handles refer to the same layer.
    #[must_use]
    pub fn same_layer(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.layer, &other.layer)
    }

    /// Snapshot of this layer's bindings.
    pub(crate) fn bindings(&self) -> Bindings {
        self.layer.bindings.lock().clone()
    }

    pub(crate) fn lookup(&self, id: VarId) -> Option<Value> {
        self.layer.bindings.lock().get(&id).cloned()
    }

    /// Replaces the binding of `id` (`None` unbinds it) and returns the
    /// previous one.
    pub(crate) fn rebind(&self, id: VarId, value: Option<Value>) -> Option<Value> {
        let mut bindings = self.layer.bindings.lock();
        let old = bindings.get(&id).cloned();
        let next = match value {
            Some(v) => bindings.insert(id, v),
            None => match bindings.remove(&id) {
                Ok(next) => next,
                Err(_) => return old,
            },
        };
        *bindings = next;
        old
    }

    /// Marks the layer as active.
    ///
    /// # Errors
    ///
    /// [`Error::Reentrancy`] if the layer is already active.
    pub(crate) fn enter(&self) -> Result<()> {
        self.layer
            .in_use
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map(drop)
            .map_err(|_| {
                debug!("rejected entering a context that is already in use");
                Error::Reentrancy
            })
    }

    pub(crate) fn exit(&self) {
        self.layer.in_use.store(false, Ordering::Release);
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("len", &self.len())
            .field("in_use", &self.is_in_use())
            .finish()
    }
}
