use chrono::{DateTime, Duration, Utc};

use journal_core::entry::{format_iso, DocumentFields, EntryDocument, EntryId, RawDate};

/// Demo journal entries spread over the days before `now`.
///
/// Some dates are stored as native timestamps and one entry has no date at
/// all, so every normalization path shows up on the page.
pub fn demo_documents(now: DateTime<Utc>) -> Vec<EntryDocument> {
    let text = |days: i64, hours: i64| {
        Some(RawDate::Text(format_iso(
            now - Duration::days(days) - Duration::hours(hours),
        )))
    };
    let native = |days: i64| Some(RawDate::timestamp(now - Duration::days(days)));
    let tags = |tags: &[&str]| Some(tags.iter().map(|t| t.to_string()).collect());

    vec![
        document(
            "demo-morning-run",
            Some("Morning run"),
            Some("Five kilometres along the river before breakfast."),
            tags(&["health", "outside"]),
            text(0, 2),
        ),
        document(
            "demo-book-notes",
            Some("Book notes"),
            Some("Finished the chapter on habits. Worth re-reading."),
            tags(&["reading"]),
            native(1),
        ),
        document(
            "demo-untitled",
            None,
            Some("Quick thought: call the plumber about the kitchen sink."),
            tags(&["home", "Home"]),
            text(2, 5),
        ),
        document(
            "demo-trip",
            Some("Weekend trip"),
            Some("Train to the coast, fish and chips, long walk on the cliffs."),
            tags(&["travel", "outside"]),
            native(5),
        ),
        document(
            "demo-empty",
            Some("Empty page"),
            None,
            None,
            text(9, 0),
        ),
        document(
            "demo-undated",
            Some("Someday"),
            Some("Ideas without a date."),
            tags(&["ideas"]),
            None,
        ),
    ]
}

fn document(
    id: &str,
    title: Option<&str>,
    content: Option<&str>,
    tags: Option<Vec<String>>,
    date: Option<RawDate>,
) -> EntryDocument {
    EntryDocument {
        id: EntryId::new(id),
        fields: DocumentFields {
            title: title.map(str::to_string),
            content: content.map(str::to_string),
            tags,
            date,
        },
    }
}
