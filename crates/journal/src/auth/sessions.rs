//! In-memory session storage.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{broadcast, RwLock};

use journal_core::auth::{Result, Session, SessionId, SessionRepository};

/// Sessions keyed by id in a `HashMap` behind `Arc<RwLock<_>>`.
/// Nothing survives a restart.
///
/// Every deletion is announced to [`SessionStore::subscribe_deletions`] so open
/// pages holding that session can drop it.
#[derive(Debug, Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<String, Session>>>,
    deletions: broadcast::Sender<SessionId>,
}

impl SessionStore {
    pub fn new() -> Self {
        let (deletions, _) = broadcast::channel(64);
        Self {
            sessions: Arc::default(),
            deletions,
        }
    }

    /// Ids of sessions deleted from now on.
    pub fn subscribe_deletions(&self) -> broadcast::Receiver<SessionId> {
        self.deletions.subscribe()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionRepository for SessionStore {
    async fn create_session(&self, session: &Session) -> Result<()> {
        let mut sessions = self.sessions.write().await;
        sessions.insert(session.id.as_str().to_string(), session.clone());
        Ok(())
    }

    async fn get_session(&self, id: &SessionId) -> Result<Option<Session>> {
        let sessions = self.sessions.read().await;
        Ok(sessions.get(id.as_str()).cloned())
    }

    async fn delete_session(&self, id: &SessionId) -> Result<()> {
        let removed = self.sessions.write().await.remove(id.as_str());
        if removed.is_some() {
            // No page may be listening.
            let _ = self.deletions.send(id.clone());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use journal_core::auth::{new_session, Identity};

    fn session() -> Session {
        new_session(
            Identity {
                email: "admin@example.com".to_string(),
            },
            Utc::now(),
            Duration::hours(1),
        )
    }

    #[tokio::test]
    async fn test_session_create_and_get() {
        let store = SessionStore::new();
        let session = session();

        store.create_session(&session).await.unwrap();

        let retrieved = store.get_session(&session.id).await.unwrap().unwrap();
        assert_eq!(retrieved.id, session.id);
        assert_eq!(retrieved.identity.email, "admin@example.com");
    }

    #[tokio::test]
    async fn test_session_get_nonexistent() {
        let store = SessionStore::new();

        let result = store
            .get_session(&SessionId::new("nonexistent".to_string()))
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_session_delete() {
        let store = SessionStore::new();
        let session = session();

        store.create_session(&session).await.unwrap();
        store.delete_session(&session.id).await.unwrap();

        assert!(store.get_session(&session.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_session_delete_is_announced() {
        let store = SessionStore::new();
        let session = session();
        store.create_session(&session).await.unwrap();
        let mut deletions = store.subscribe_deletions();

        store.delete_session(&session.id).await.unwrap();
        store.delete_session(&session.id).await.unwrap();

        assert_eq!(deletions.recv().await.unwrap(), session.id);
        assert!(deletions.try_recv().is_err());
    }
}
