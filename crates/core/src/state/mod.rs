mod cache;
mod journal;

pub use cache::EntryCache;
pub use journal::{JournalEvent, JournalState};
