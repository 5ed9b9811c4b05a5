mod store;

pub use store::InMemoryEntryStore;
