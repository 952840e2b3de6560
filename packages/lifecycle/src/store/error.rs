use thiserror::Error;

/// Errors reported by an [`EntityStore`](super::EntityStore) implementation.
///
/// Backends translate their own driver errors into these variants so the engine
/// never inspects driver-specific error codes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// A uniqueness constraint rejected the write.
    #[error("{0}")]
    Conflict(String),
    /// The record addressed by an update does not exist.
    #[error("{0} not found")]
    NotFound(&'static str),
    /// Any other backend failure.
    #[error("storage backend error: {0}")]
    Backend(String),
}
