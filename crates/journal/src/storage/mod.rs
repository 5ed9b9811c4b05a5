//! Entry store backends.

mod inmemory;

pub use inmemory::InMemoryEntryStore;
