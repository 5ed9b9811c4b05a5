use async_trait::async_trait;
use tokio::sync::watch;

use crate::entry::{EntryId, EntryPatch, NewEntry, Snapshot};

use super::Result;

/// A document store holding journal entries.
///
/// Mutations only acknowledge; their effect reaches readers through the next
/// snapshot on the subscription.
#[async_trait]
pub trait EntryStore: Send + Sync {
    /// Subscribes to full snapshots ordered by date, newest first.
    ///
    /// The receiver already holds the current snapshot.
    async fn subscribe(&self) -> Result<watch::Receiver<Snapshot>>;

    /// Creates an entry and returns the id the store assigned.
    async fn add(&self, entry: NewEntry) -> Result<EntryId>;

    /// Merges a partial update into an existing entry.
    async fn update(&self, id: &EntryId, patch: EntryPatch) -> Result<()>;

    /// Deletes an entry.
    async fn delete(&self, id: &EntryId) -> Result<()>;
}
