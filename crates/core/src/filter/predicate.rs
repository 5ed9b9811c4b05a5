use crate::entry::Entry;

use super::types::Filter;

/// True iff the entry satisfies every active condition of the filter.
///
/// - date: the first ten characters of the entry date equal the day.
/// - tag: some entry tag equals the filter tag, ignoring case.
/// - text: title, content and space-joined tags contain the text, ignoring case.
///
/// An entry without a date never matches a date condition.
pub fn matches(entry: &Entry, filter: &Filter) -> bool {
    if let Some(date) = filter.date {
        let day = date.format("%Y-%m-%d").to_string();
        if entry.day() != Some(day.as_str()) {
            return false;
        }
    }

    if let Some(tag) = filter.active_tag() {
        let wanted = tag.to_lowercase();
        if !entry.tags.iter().any(|t| t.to_lowercase() == wanted) {
            return false;
        }
    }

    if !filter.text.is_empty() {
        let haystack = format!("{} {} {}", entry.title, entry.content, entry.tags.join(" "));
        if !haystack
            .to_lowercase()
            .contains(&filter.text.to_lowercase())
        {
            return false;
        }
    }

    true
}

/// Applies the filter, keeping cache order.
pub fn filter_entries<'a>(entries: &'a [Entry], filter: &Filter) -> Vec<&'a Entry> {
    entries.iter().filter(|e| matches(e, filter)).collect()
}
