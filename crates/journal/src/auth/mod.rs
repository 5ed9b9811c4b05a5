//! Email/password sign-in backed by in-memory sessions.

mod client;
mod directory;
mod extractors;
mod sessions;

pub use client::SessionAuth;
pub use directory::AdminDirectory;
pub use extractors::SessionUser;
pub use sessions::SessionStore;
