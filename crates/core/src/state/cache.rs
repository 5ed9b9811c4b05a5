use crate::entry::{normalize_snapshot, Entry, EntryId, Snapshot};
use crate::palette::tag_palette;

/// In-memory mirror of the latest store snapshot.
///
/// Built in one go from a snapshot and never patched afterwards, so readers
/// never see old and new entries side by side.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryCache {
    version: u64,
    entries: Vec<Entry>,
    palette: Vec<String>,
}

impl EntryCache {
    /// Normalizes every document and derives the tag palette.
    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        let version = snapshot.version;
        let entries = normalize_snapshot(snapshot);
        let palette = tag_palette(&entries);
        Self {
            version,
            entries,
            palette,
        }
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Entries in store order (date descending).
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Sorted distinct tags of the whole cache.
    pub fn palette(&self) -> &[String] {
        &self.palette
    }

    pub fn get(&self, id: &EntryId) -> Option<&Entry> {
        self.entries.iter().find(|entry| &entry.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
