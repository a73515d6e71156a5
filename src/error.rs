//! Error type shared by the map and the context stack.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors reported by map, mutation view and context operations.
///
/// Every failing operation leaves existing maps and contexts untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A required key is absent from the map.
    #[error("key not found")]
    KeyNotFound,

    /// A context variable has no binding in any layer and no default.
    #[error("context variable '{name}' has no value")]
    NoValue {
        /// Display name of the variable.
        name: String,
    },

    /// A context layer is already active on some stack.
    #[error("context is already entered")]
    Reentrancy,

    /// The mutation view was closed or finished.
    #[error("mutation view has been finalized")]
    MutationClosed,

    /// The token's layer is no longer the top of the stack.
    #[error("token for '{name}' was created in a different context")]
    StaleToken {
        /// Display name of the variable the token belongs to.
        name: String,
    },

    /// The token was issued by another variable.
    #[error("token was created by a different variable than '{name}'")]
    TokenMismatch {
        /// Display name of the variable `reset` was called on.
        name: String,
    },
}
