//! Tag palette derived from the full, unfiltered cache.
//!
//! Identity is case-sensitive here even though filtering compares tags
//! ignoring case: `"X"` and `"x"` are two palette buttons that select the
//! same entries.

use std::collections::BTreeSet;

use crate::entry::Entry;

/// Distinct tags across all entries, sorted lexicographically.
pub fn tag_palette(entries: &[Entry]) -> Vec<String> {
    entries
        .iter()
        .flat_map(|entry| entry.tags.iter())
        .cloned()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
