//! The per-thread stack of context layers.

use std::cell::RefCell;
use std::fmt;
use std::iter;
use std::mem;

use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use super::{Context, Value, VarId};
use crate::error::Result;

/// The chain of [`Context`] layers active for one logical thread of control.
///
/// The stack always holds at least its base layer. Layers it holds are
/// marked in use and are released when they leave the stack or when the
/// stack is dropped.
///
/// Reads are served from a per-stack cache that is dropped whenever the set
/// of layers changes; [`generation`](Self::generation) counts those changes.
pub struct ContextStack {
    base: Context,
    /// Layers above `base`, innermost last.
    nested: Vec<Context>,
    cache: RefCell<FxHashMap<VarId, Option<Value>>>,
    generation: u64,
}

impl ContextStack {
    /// Creates a stack holding one fresh, empty layer.
    #[must_use]
    pub fn new() -> Self {
        Self::from_base(Context::entered())
    }

    /// Creates a stack whose base layer is `ctx`.
    ///
    /// # Errors
    ///
    /// [`Error::Reentrancy`](crate::Error::Reentrancy) if `ctx` is already in
    /// use.
    pub fn with_base(ctx: &Context) -> Result<Self> {
        ctx.enter()?;
        Ok(Self::from_base(ctx.clone()))
    }

    fn from_base(base: Context) -> Self {
        Self {
            base,
            nested: Vec::new(),
            cache: RefCell::default(),
            generation: 0,
        }
    }

    /// Returns the number of layers.
    #[must_use]
    pub const fn depth(&self) -> usize {
        self.nested.len() + 1
    }

    /// Returns the top layer, the one `set` writes to.
    #[must_use]
    pub fn top(&self) -> &Context {
        self.nested.last().unwrap_or(&self.base)
    }

    /// Returns the number of shape changes (push, pop, run enter and exit)
    /// this stack has gone through.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Runs `body` with the whole stack replaced by the single layer `ctx`.
    ///
    /// The previous layers are restored when `body` returns or unwinds. They
    /// stay in use meanwhile, so `body` cannot enter any of them again.
    ///
    /// # Errors
    ///
    /// [`Error::Reentrancy`](crate::Error::Reentrancy) if `ctx` is already in
    /// use; `body` is not run.
    pub fn run<R>(&mut self, ctx: &Context, body: impl FnOnce(&mut Self) -> R) -> Result<R> {
        ctx.enter()?;
        let base = mem::replace(&mut self.base, ctx.clone());
        let nested = mem::take(&mut self.nested);
        trace!(saved_depth = nested.len() + 1, "entering isolated context");
        self.invalidate();

        let guard = Restore {
            stack: self,
            entered: ctx.clone(),
            saved: Some((base, nested)),
        };
        Ok(body(guard.stack))
    }

    /// Runs `body` with `ctx` pushed on top of the current layers.
    ///
    /// `ctx` is popped when `body` returns or unwinds. Writes made by `body`
    /// land in `ctx`; reads still see the layers below.
    ///
    /// # Errors
    ///
    /// [`Error::Reentrancy`](crate::Error::Reentrancy) if `ctx` is already in
    /// use; `body` is not run.
    pub fn push<R>(&mut self, ctx: &Context, body: impl FnOnce(&mut Self) -> R) -> Result<R> {
        ctx.enter()?;
        self.nested.push(ctx.clone());
        trace!(depth = self.depth(), "pushed context");
        self.invalidate();

        let guard = Restore {
            stack: self,
            entered: ctx.clone(),
            saved: None,
        };
        Ok(body(guard.stack))
    }

    /// Flattens all layers into a fresh layer that is not in use.
    ///
    /// Inner layers win on conflicts. With a single layer this is O(1);
    /// otherwise it costs one batch merge per extra layer.
    #[must_use]
    pub fn copy_context(&self) -> Context {
        let flat = self.nested.iter().fold(self.base.bindings(), |acc, layer| {
            let bindings = layer.bindings();
            acc.merge(bindings.iter().map(|(k, v)| (*k, v.clone())))
        });
        Context::from_bindings(flat)
    }

    /// Resolves `id` top to bottom, serving repeated reads from the cache.
    pub(crate) fn lookup(&self, id: VarId) -> Option<Value> {
        if let Some(hit) = self.cache.borrow().get(&id) {
            return hit.clone();
        }
        trace!(var = id.get(), "context lookup cache miss");
        let found = self.layers_top_down().find_map(|layer| layer.lookup(id));
        self.cache.borrow_mut().insert(id, found.clone());
        found
    }

    /// Binds `id` in the top layer. Returns that layer and its prior value.
    pub(crate) fn bind_top(&mut self, id: VarId, value: Value) -> (Context, Option<Value>) {
        let top = self.top().clone();
        let old = top.rebind(id, Some(value.clone()));
        self.cache.get_mut().insert(id, Some(value));
        (top, old)
    }

    /// Puts `old` back as the top layer's binding of `id`.
    pub(crate) fn restore_top(&mut self, id: VarId, old: Option<Value>) {
        self.top().rebind(id, old);
        // A lower layer may now be the one that answers.
        self.cache.get_mut().remove(&id);
    }

    fn layers_top_down(&self) -> impl Iterator<Item = &Context> {
        self.nested.iter().rev().chain(iter::once(&self.base))
    }

    fn invalidate(&mut self) {
        self.cache.get_mut().clear();
        self.generation += 1;
    }
}

/// Undoes a `run`/`push` on drop, so the stack is restored on unwind too.
///
/// Only a layer that is still on top is removed and released. If the body
/// swapped its stack for another one, the entered layer stays in use on the
/// stack now holding it, and layers displaced by `run` are released.
struct Restore<'a> {
    stack: &'a mut ContextStack,
    entered: Context,
    /// Layers displaced by `run`; `None` for `push`.
    saved: Option<(Context, Vec<Context>)>,
}

impl Drop for Restore<'_> {
    fn drop(&mut self) {
        let owned = self.stack.top().same_layer(&self.entered);
        match self.saved.take() {
            Some((base, nested)) if owned => {
                self.stack.base = base;
                self.stack.nested = nested;
                self.entered.exit();
                trace!(depth = self.stack.depth(), "left isolated context");
            }
            Some((base, nested)) => {
                for layer in nested.iter().chain(iter::once(&base)) {
                    layer.exit();
                }
                debug!("isolated context left its stack; released displaced layers");
            }
            None if owned => {
                self.stack.nested.pop();
                self.entered.exit();
                trace!(depth = self.stack.depth(), "popped context");
            }
            None => debug!("pushed context left its stack; nothing popped"),
        }
        self.stack.invalidate();
    }
}

impl Default for ContextStack {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for ContextStack {
    fn drop(&mut self) {
        for layer in self.layers_top_down() {
            layer.exit();
        }
    }
}

impl fmt::Debug for ContextStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContextStack")
            .field("depth", &self.depth())
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}
