mod heading;
mod predicate;
mod types;

pub use heading::heading;
pub use predicate::{filter_entries, matches};
pub use types::{Filter, FilterChange};
