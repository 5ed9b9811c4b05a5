//! Shared application state.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::broadcast;

use journal_core::actions::ActionError;
use journal_core::auth::Session;
use journal_core::controller::JournalController;
use journal_core::state::{JournalEvent, JournalState};
use journal_core::store::EntryStore;

use crate::auth::{AdminDirectory, SessionAuth, SessionStore};
use crate::config::Config;
use crate::mock_data::demo_documents;
use crate::storage::InMemoryEntryStore;

/// Controller driving one request or one live page.
pub type Controller = JournalController<dyn EntryStore, SessionAuth>;

/// Shared application state.
///
/// Cloned for each request handler.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn EntryStore>,
    pub directory: Arc<AdminDirectory>,
    pub sessions: Arc<SessionStore>,
    pub config: Arc<Config>,
    /// Shutdown signal sender for SSE connections.
    pub shutdown_tx: broadcast::Sender<()>,
}

impl AppState {
    /// Builds the state for a running server. Hashes the admin password.
    pub fn from_config(config: Config) -> anyhow::Result<Self> {
        let directory = AdminDirectory::new(config.admin_email.clone(), &config.admin_password)?;
        Ok(Self::build(config, directory, Utc::now()))
    }

    fn build(config: Config, directory: AdminDirectory, now: DateTime<Utc>) -> Self {
        let documents = if config.seed_demo_data {
            demo_documents(now)
        } else {
            Vec::new()
        };
        let mut store = InMemoryEntryStore::new(documents);
        if config.read_only_store {
            tracing::warn!("Entry store is read-only; every mutation will be rejected");
            store = store.read_only();
        }

        let (shutdown_tx, _) = broadcast::channel(1);

        Self {
            store: Arc::new(store),
            directory: Arc::new(directory),
            sessions: Arc::new(SessionStore::new()),
            config: Arc::new(config),
            shutdown_tx,
        }
    }

    /// An auth client for the browser holding `session`.
    pub fn auth_for(&self, session: Option<Session>) -> SessionAuth {
        SessionAuth::new(
            Arc::clone(&self.directory),
            Arc::clone(&self.sessions),
            self.config.session_ttl(),
            session,
        )
    }

    /// A controller already reconciled with the store's current snapshot.
    pub async fn controller(
        &self,
        auth: Arc<SessionAuth>,
        journal: JournalState,
    ) -> Result<Controller, ActionError> {
        let snapshot = self.store.subscribe().await?.borrow().clone();
        let mut controller = JournalController::new(Arc::clone(&self.store), auth, journal);
        controller.dispatch(JournalEvent::SnapshotReceived(snapshot));
        Ok(controller)
    }

    /// Subscribe to the shutdown signal.
    pub fn subscribe_shutdown(&self) -> broadcast::Receiver<()> {
        self.shutdown_tx.subscribe()
    }

    /// Signal all SSE connections to close.
    pub fn signal_shutdown(&self) {
        // Ignore error if no receivers are listening
        let _ = self.shutdown_tx.send(());
    }
}

#[cfg(test)]
impl AppState {
    /// State with a cheap password hash, for tests.
    pub fn for_tests(config: Config) -> Self {
        let directory =
            AdminDirectory::with_cost(config.admin_email.clone(), &config.admin_password, 4)
                .expect("hash test password");
        Self::build(config, directory, Utc::now())
    }
}
