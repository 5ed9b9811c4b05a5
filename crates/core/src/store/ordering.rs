use std::cmp::Reverse;

use crate::entry::{normalize_date, EntryDocument};

/// Orders documents by date, newest first; undated documents go last.
///
/// Dates are compared on their normalized text, so text and native
/// timestamps interleave correctly.
pub fn order_by_date_desc(documents: &mut [EntryDocument]) {
    documents.sort_by_cached_key(|doc| Reverse(doc.fields.date.as_ref().and_then(normalize_date)));
}
