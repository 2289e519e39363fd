use alloc::string::String;

/// A specialized `Result` for tree operations.
pub type Result<T, E = RedBlackError> = core::result::Result<T, E>;

/// Errors reported by [`RedBlackTree`](crate::RedBlackTree) and the collections built on it.
///
/// Every variant describes a caller error against the tree's current state. The
/// tree is left untouched and fully balanced when one is returned.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, thiserror::Error)]
pub enum RedBlackError {
    /// The key is already present; the map never overwrites on insert.
    #[error("key already exists in the tree")]
    DuplicateKey,
    /// No entry has the requested key.
    #[error("key not found in the tree")]
    KeyNotFound,
    /// A minimum or maximum was requested from an empty tree.
    #[error("tree is empty")]
    EmptyTree,
    /// An argument cannot be used as given.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
}

/// Failure reported by a [`TreeObserver`](crate::TreeObserver) callback.
///
/// Observer failures are logged and dropped; they never reach the caller of the
/// mutation that triggered them.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error("tree observer failed: {message}")]
pub struct ObserverError {
    message: String,
}

impl ObserverError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}
