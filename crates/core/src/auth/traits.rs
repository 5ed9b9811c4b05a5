use async_trait::async_trait;
use tokio::sync::watch;

use super::{AuthError, Credentials, Identity, Session, SessionId};

/// Result type for auth operations.
pub type Result<T> = std::result::Result<T, AuthError>;

/// Identity service as seen from one open page.
#[async_trait]
pub trait AuthClient: Send + Sync {
    /// Signs in with email and password.
    async fn sign_in(&self, credentials: &Credentials) -> Result<Identity>;

    /// Signs the current user out.
    async fn sign_out(&self) -> Result<()>;

    /// The signed-in user, if any. Read fresh on every call.
    fn current_user(&self) -> Option<Identity>;

    /// Fires on every sign-in and sign-out.
    fn on_auth_state_changed(&self) -> watch::Receiver<Option<Identity>>;
}

/// Session storage abstraction.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Store a new session.
    async fn create_session(&self, session: &Session) -> Result<()>;

    /// Retrieve session by ID.
    async fn get_session(&self, id: &SessionId) -> Result<Option<Session>>;

    /// Delete a specific session.
    async fn delete_session(&self, id: &SessionId) -> Result<()>;
}
