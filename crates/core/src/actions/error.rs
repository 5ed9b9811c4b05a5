use thiserror::Error;

use crate::auth::AuthError;
use crate::entry::ValidationError;
use crate::store::StoreError;

/// Why a user action was refused or failed. Every failure is final for
/// that action; nothing is retried.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ActionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("You must be signed in to do that")]
    Unauthorized,
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Auth(#[from] AuthError),
}
