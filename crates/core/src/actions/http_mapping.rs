//! Pure functions for mapping action errors to HTTP status codes.

use crate::auth::AuthError;
use crate::store::StoreError;

use super::ActionError;

/// Maps an [`ActionError`] to an HTTP status code.
///
/// - `Validation` -> 400
/// - `Unauthorized` and auth failures -> 401
/// - `Store(PermissionDenied)` -> 403
/// - `Store(NotFound)` -> 404
/// - `Store(Unavailable)` -> 503
/// - everything else -> 500
///
/// # Examples
///
/// ```
/// use journal_core::actions::{action_error_to_status_code, ActionError};
///
/// assert_eq!(action_error_to_status_code(&ActionError::Unauthorized), 401);
/// ```
pub fn action_error_to_status_code(error: &ActionError) -> u16 {
    match error {
        ActionError::Validation(_) => 400,
        ActionError::Unauthorized => 401,
        ActionError::Auth(AuthError::Storage(_) | AuthError::Provider(_)) => 500,
        ActionError::Auth(_) => 401,
        ActionError::Store(StoreError::PermissionDenied(_)) => 403,
        ActionError::Store(StoreError::NotFound(_)) => 404,
        ActionError::Store(StoreError::Unavailable(_)) => 503,
        ActionError::Store(StoreError::InvalidData(_)) => 500,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::ValidationError;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            action_error_to_status_code(&ValidationError::EmptyTag.into()),
            400
        );
        assert_eq!(
            action_error_to_status_code(&AuthError::InvalidCredentials.into()),
            401
        );
        assert_eq!(
            action_error_to_status_code(&StoreError::PermissionDenied("ro".into()).into()),
            403
        );
        assert_eq!(
            action_error_to_status_code(&StoreError::NotFound("x".into()).into()),
            404
        );
        assert_eq!(
            action_error_to_status_code(&StoreError::Unavailable("down".into()).into()),
            503
        );
        assert_eq!(
            action_error_to_status_code(&AuthError::Storage("db".into()).into()),
            500
        );
    }
}
