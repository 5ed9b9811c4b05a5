//! In-memory entry store with push subscriptions.

use async_trait::async_trait;
use tokio::sync::{watch, Mutex};
use uuid::Uuid;

use journal_core::entry::{EntryDocument, EntryId, EntryPatch, NewEntry, Snapshot};
use journal_core::store::{order_by_date_desc, EntryStore, Result, StoreError};

/// In-process document store.
///
/// Documents live in a `Vec` behind a mutex; every mutation publishes a
/// complete, re-ordered snapshot on a `watch` channel, so subscribers always
/// see the latest full collection.
#[derive(Debug)]
pub struct InMemoryEntryStore {
    documents: Mutex<Vec<EntryDocument>>,
    snapshots: watch::Sender<Snapshot>,
    read_only: bool,
}

impl Default for InMemoryEntryStore {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl InMemoryEntryStore {
    /// Creates a store holding `documents`.
    pub fn new(mut documents: Vec<EntryDocument>) -> Self {
        order_by_date_desc(&mut documents);
        let (snapshots, _) = watch::channel(Snapshot {
            version: 1,
            documents: documents.clone(),
        });
        Self {
            documents: Mutex::new(documents),
            snapshots,
            read_only: false,
        }
    }

    /// Makes every mutation fail with [`StoreError::PermissionDenied`].
    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    fn check_writable(&self) -> Result<()> {
        if self.read_only {
            return Err(StoreError::PermissionDenied(
                "the entry store is read-only".to_string(),
            ));
        }
        Ok(())
    }

    /// Re-orders and publishes. Called with the documents lock held so
    /// versions follow mutation order.
    fn publish(&self, documents: &mut [EntryDocument]) {
        order_by_date_desc(documents);
        let documents = documents.to_vec();
        self.snapshots.send_modify(|snapshot| {
            snapshot.version += 1;
            snapshot.documents = documents;
        });
        tracing::debug!(
            version = self.snapshots.borrow().version,
            subscribers = self.snapshots.receiver_count(),
            "Published snapshot"
        );
    }
}

#[async_trait]
impl EntryStore for InMemoryEntryStore {
    async fn subscribe(&self) -> Result<watch::Receiver<Snapshot>> {
        Ok(self.snapshots.subscribe())
    }

    async fn add(&self, entry: NewEntry) -> Result<EntryId> {
        self.check_writable()?;
        let id = EntryId::new(Uuid::new_v4().to_string());

        let mut documents = self.documents.lock().await;
        documents.push(EntryDocument {
            id: id.clone(),
            fields: entry.into(),
        });
        self.publish(&mut documents);

        Ok(id)
    }

    async fn update(&self, id: &EntryId, patch: EntryPatch) -> Result<()> {
        self.check_writable()?;

        let mut documents = self.documents.lock().await;
        let document = documents
            .iter_mut()
            .find(|doc| &doc.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        patch.apply_to(&mut document.fields);
        self.publish(&mut documents);

        Ok(())
    }

    async fn delete(&self, id: &EntryId) -> Result<()> {
        self.check_writable()?;

        let mut documents = self.documents.lock().await;
        let before = documents.len();
        documents.retain(|doc| &doc.id != id);
        if documents.len() == before {
            return Err(StoreError::NotFound(id.to_string()));
        }
        self.publish(&mut documents);

        Ok(())
    }
}
