use super::types::Filter;

/// Heading for the entry list. Priority: date, then tag, then text.
pub fn heading(filter: &Filter) -> String {
    if let Some(date) = filter.date {
        format!("Entries for {}", date.format("%A, %B %-d, %Y"))
    } else if let Some(tag) = filter.active_tag() {
        format!("Entries tagged \"{tag}\"")
    } else if !filter.text.is_empty() {
        format!("Results for \"{}\"", filter.text)
    } else {
        "All entries".to_string()
    }
}
