//! Errors surfaced by external collaborators (user/role lookups).

use thiserror::Error;

/// Result type returned by lookup collaborators.
pub type LookupResult<T> = Result<T, LookupError>;

/// Failure of a user or role lookup.
///
/// "Not found" is a normal outcome and must stay distinguishable from a
/// failure of the backing store.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LookupError {
    /// No record matches the requested key.
    #[error("not found")]
    NotFound,

    /// The backing store could not answer.
    #[error("store failure: {0}")]
    Store(String),
}

impl LookupError {
    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store(msg.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }
}
