use thiserror::Error;

use crate::gate::{Denial, RoleReason};
use crate::notify::NotifyError;
use crate::store::StoreError;

/// Failure of an engine operation.
///
/// Validation and authorization failures are raised before anything is written.
/// `Unavailable` may be raised after earlier writes or deliveries already happened;
/// those are never rolled back.
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("authentication required")]
    Unauthenticated,
    #[error("{0}")]
    Forbidden(Denial),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Unavailable(#[from] Unavailable),
}

/// Which collaborator let an operation down.
#[derive(Debug, Error)]
pub enum Unavailable {
    #[error("storage unavailable: {0}")]
    Storage(String),
    #[error("notification delivery failed: {0}")]
    Notification(#[from] NotifyError),
}

impl LifecycleError {
    pub fn not_found(what: &str) -> Self {
        LifecycleError::NotFound(format!("{what} not found"))
    }
}

impl From<Denial> for LifecycleError {
    fn from(denial: Denial) -> Self {
        match denial {
            Denial::Role(RoleReason::AlreadyParticipating) => {
                LifecycleError::Conflict(denial.to_string())
            }
            other => LifecycleError::Forbidden(other),
        }
    }
}

impl From<StoreError> for LifecycleError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(msg) => LifecycleError::Conflict(msg),
            StoreError::NotFound(what) => LifecycleError::not_found(what),
            StoreError::Backend(msg) => LifecycleError::Unavailable(Unavailable::Storage(msg)),
        }
    }
}

impl From<NotifyError> for LifecycleError {
    fn from(err: NotifyError) -> Self {
        LifecycleError::Unavailable(Unavailable::Notification(err))
    }
}

pub type Result<T> = std::result::Result<T, LifecycleError>;
