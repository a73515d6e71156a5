//! Private layers for suspendable nested computations.

use super::{Context, ContextStack};
use crate::error::Result;

/// The context layer of a computation that runs in several resumptions,
/// such as a generator or a coroutine.
///
/// The owner of the computation (a scheduler, an iterator adapter) calls
/// [`resume`](Self::resume) around every step. The scope's layer sits on top
/// of the resumer's stack for exactly that step: reads see the enclosing
/// bindings, writes stay in the scope and are seen again on the next step.
#[derive(Debug, Default)]
pub struct LazyScope {
    context: Context,
}

impl LazyScope {
    /// Creates a scope with an empty private layer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a scope whose private layer is `context`.
    #[must_use]
    pub const fn with_context(context: Context) -> Self {
        Self { context }
    }

    /// Returns the private layer.
    #[must_use]
    pub const fn context(&self) -> &Context {
        &self.context
    }

    /// Runs one step of the computation with the private layer pushed.
    ///
    /// # Errors
    ///
    /// [`Error::Reentrancy`](crate::Error::Reentrancy) if the scope is
    /// resumed from inside one of its own steps.
    pub fn resume<R>(
        &self,
        stack: &mut ContextStack,
        step: impl FnOnce(&mut ContextStack) -> R,
    ) -> Result<R> {
        stack.push(&self.context, step)
    }
}
