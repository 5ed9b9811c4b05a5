//! Functional core of the journal.
//!
//! Everything here is either pure (normalization, filtering, rendering,
//! calendar math, command planning) or a trait seam the server fills in
//! ([`store::EntryStore`], [`auth::AuthClient`]). The
//! [`controller::JournalController`] ties them together into the
//! reconciliation loop of one open page.

pub mod actions;
pub mod auth;
pub mod calendar;
pub mod controller;
pub mod entry;
pub mod filter;
pub mod palette;
pub mod preferences;
pub mod serde;
pub mod state;
pub mod store;
pub mod view;
