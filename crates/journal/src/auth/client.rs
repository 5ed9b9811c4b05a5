use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use tokio::sync::{broadcast, watch};

use journal_core::auth::{
    is_session_expired, new_session, AuthClient, AuthError, Credentials, Identity, Result,
    Session, SessionId, SessionRepository,
};

use super::{AdminDirectory, SessionStore};

/// [`AuthClient`] for one browser, seeded with the session its cookie named.
///
/// Signing in opens a new session in the shared [`SessionStore`]; the caller
/// reads it back with [`SessionAuth::session`] to set the cookie.
pub struct SessionAuth {
    directory: Arc<AdminDirectory>,
    sessions: Arc<SessionStore>,
    ttl: Duration,
    session: watch::Sender<Option<Session>>,
    identity: watch::Sender<Option<Identity>>,
}

impl SessionAuth {
    pub fn new(
        directory: Arc<AdminDirectory>,
        sessions: Arc<SessionStore>,
        ttl: Duration,
        session: Option<Session>,
    ) -> Self {
        let identity = session.as_ref().map(|s| s.identity.clone());
        Self {
            directory,
            sessions,
            ttl,
            session: watch::Sender::new(session),
            identity: watch::Sender::new(identity),
        }
    }

    /// The session currently held, if signed in.
    pub fn session(&self) -> Option<Session> {
        self.session.borrow().clone()
    }

    /// Drops the held session once it expires or is deleted elsewhere (another
    /// tab signing out), notifying [`AuthClient::on_auth_state_changed`].
    ///
    /// The watcher ends with the last reference to `self`.
    pub fn watch_revocation(self: &Arc<Self>) {
        let Some(session) = self.session() else {
            return;
        };

        let auth = Arc::downgrade(self);
        let sessions = Arc::clone(&self.sessions);
        let mut deletions = sessions.subscribe_deletions();
        let mut identity = self.identity.subscribe();
        let remaining = (session.expires_at - Utc::now())
            .to_std()
            .unwrap_or_default();

        tokio::spawn(async move {
            let expiry = tokio::time::sleep(remaining);
            tokio::pin!(expiry);

            loop {
                tokio::select! {
                    _ = &mut expiry => {
                        tracing::debug!(email = %session.identity.email, "Session expired");
                        break;
                    }
                    deleted = deletions.recv() => match deleted {
                        Ok(id) if id == session.id => {
                            tracing::debug!(email = %session.identity.email, "Session deleted elsewhere");
                            break;
                        }
                        Ok(_) => {}
                        Err(broadcast::error::RecvError::Lagged(_)) => {
                            if !matches!(sessions.get_session(&session.id).await, Ok(Some(_))) {
                                break;
                            }
                        }
                        Err(broadcast::error::RecvError::Closed) => return,
                    },
                    changed = identity.changed() => {
                        if changed.is_err() || identity.borrow_and_update().is_none() {
                            return;
                        }
                    }
                }
            }

            if let Some(auth) = auth.upgrade() {
                auth.revoke(&session.id);
            }
        });
    }

    fn revoke(&self, id: &SessionId) {
        let dropped = self.session.send_if_modified(|held| {
            if held.as_ref().is_some_and(|s| &s.id == id) {
                *held = None;
                true
            } else {
                false
            }
        });
        if dropped {
            self.identity.send_replace(None);
        }
    }
}

#[async_trait]
impl AuthClient for SessionAuth {
    async fn sign_in(&self, credentials: &Credentials) -> Result<Identity> {
        let directory = Arc::clone(&self.directory);
        let credentials = credentials.clone();
        let identity = tokio::task::spawn_blocking(move || directory.verify(&credentials))
            .await
            .map_err(|e| AuthError::Provider(e.to_string()))??;

        let session = new_session(identity.clone(), Utc::now(), self.ttl);
        self.sessions.create_session(&session).await?;
        tracing::debug!(email = %identity.email, "Session opened");

        self.session.send_replace(Some(session));
        self.identity.send_replace(Some(identity.clone()));
        Ok(identity)
    }

    async fn sign_out(&self) -> Result<()> {
        if let Some(session) = self.session.send_replace(None) {
            self.sessions.delete_session(&session.id).await?;
            tracing::debug!(email = %session.identity.email, "Session closed");
        }
        self.identity.send_replace(None);
        Ok(())
    }

    fn current_user(&self) -> Option<Identity> {
        let session = self.session.borrow();
        session
            .as_ref()
            .filter(|session| !is_session_expired(session, Utc::now()))
            .map(|session| session.identity.clone())
    }

    fn on_auth_state_changed(&self) -> watch::Receiver<Option<Identity>> {
        self.identity.subscribe()
    }
}
