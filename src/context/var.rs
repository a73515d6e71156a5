//! Context variables and restoration tokens.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::debug;

use super::{Context, ContextStack, Value};
use crate::error::{Error, Result};

static NEXT_VAR_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a [`ContextVar`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VarId(u64);

impl VarId {
    fn next() -> Self {
        Self(NEXT_VAR_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the raw identifier.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// A dynamically scoped variable.
///
/// The variable itself holds no value; values live in the [`Context`] layers
/// of a [`ContextStack`]. Clones share the identity, so they name the same
/// variable.
pub struct ContextVar<T> {
    id: VarId,
    name: Arc<str>,
    default: Option<T>,
}

impl<T> ContextVar<T> {
    /// Creates a variable without a default.
    #[must_use]
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self {
            id: VarId::next(),
            name: name.into(),
            default: None,
        }
    }

    /// Creates a variable whose reads fall back to `default`.
    #[must_use]
    pub fn with_default(name: impl Into<Arc<str>>, default: T) -> Self {
        Self {
            default: Some(default),
            ..Self::new(name)
        }
    }

    /// Returns the variable's identity.
    #[must_use]
    pub const fn id(&self) -> VarId {
        self.id
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the default value, if any.
    #[must_use]
    pub const fn default_value(&self) -> Option<&T> {
        self.default.as_ref()
    }

    fn no_value(&self) -> Error {
        Error::NoValue {
            name: self.name.to_string(),
        }
    }
}

impl<T: Clone + Send + Sync + 'static> ContextVar<T> {
    /// Returns the innermost binding on `stack`, else the default.
    ///
    /// # Errors
    ///
    /// [`Error::NoValue`] if no layer binds the variable and it has no
    /// default.
    pub fn get(&self, stack: &ContextStack) -> Result<T> {
        stack.lookup(self.id).and_then(|v| downcast::<T>(&v)).map_or_else(
            || self.default.clone().ok_or_else(|| self.no_value()),
            Ok,
        )
    }

    /// Returns the innermost binding on `stack`, else `fallback`.
    ///
    /// The variable's own default is not consulted.
    pub fn get_or(&self, stack: &ContextStack, fallback: T) -> T {
        stack
            .lookup(self.id)
            .and_then(|v| downcast::<T>(&v))
            .unwrap_or(fallback)
    }

    /// Binds the variable in the top layer of `stack`.
    ///
    /// Lower layers are never written. The returned token restores the top
    /// layer's previous state through [`reset`](Self::reset).
    pub fn set(&self, stack: &mut ContextStack, value: T) -> Token<T> {
        let (layer, old) = stack.bind_top(self.id, Arc::new(value));
        Token {
            var: self.id,
            layer,
            old,
            _marker: PhantomData,
        }
    }

    /// Restores the binding captured by `token`.
    ///
    /// The token is consumed, so each token restores at most once.
    ///
    /// # Errors
    ///
    /// - [`Error::TokenMismatch`] if `token` was issued by another variable.
    /// - [`Error::StaleToken`] if the layer `token` was issued against is not
    ///   the top layer of `stack`.
    pub fn reset(&self, stack: &mut ContextStack, token: Token<T>) -> Result<()> {
        if token.var != self.id {
            debug!(var = %self.name, "rejected token issued by another variable");
            return Err(Error::TokenMismatch {
                name: self.name.to_string(),
            });
        }
        if !stack.top().same_layer(&token.layer) {
            debug!(var = %self.name, "rejected token from an inactive layer");
            return Err(Error::StaleToken {
                name: self.name.to_string(),
            });
        }
        stack.restore_top(self.id, token.old);
        Ok(())
    }
}

fn downcast<T: Clone + 'static>(value: &Value) -> Option<T> {
    value.downcast_ref::<T>().cloned()
}

impl<T: Clone> Clone for ContextVar<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            name: Arc::clone(&self.name),
            default: self.default.clone(),
        }
    }
}

impl<T> fmt::Debug for ContextVar<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContextVar")
            .field("name", &self.name)
            .field("id", &self.id.0)
            .finish_non_exhaustive()
    }
}

/// Restores a variable's prior binding in the layer it was set in.
///
/// Issued by [`ContextVar::set`], consumed by [`ContextVar::reset`].
pub struct Token<T> {
    var: VarId,
    layer: Context,
    old: Option<Value>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Token<T> {
    /// Returns the identity of the variable that issued the token.
    #[must_use]
    pub const fn var_id(&self) -> VarId {
        self.var
    }

    /// Returns `true` if the variable was unbound in the layer before `set`.
    #[must_use]
    pub const fn was_unbound(&self) -> bool {
        self.old.is_none()
    }
}

impl<T: Clone + 'static> Token<T> {
    /// Returns the value the layer held before `set`, if any.
    #[must_use]
    pub fn old_value(&self) -> Option<T> {
        self.old.as_ref().and_then(downcast::<T>)
    }
}

impl<T> fmt::Debug for Token<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Token")
            .field("var", &self.var.0)
            .field("was_unbound", &self.old.is_none())
            .finish_non_exhaustive()
    }
}
