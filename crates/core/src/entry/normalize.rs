//! Date normalization for ingested documents.
//!
//! Stores may hand back either text or native timestamps. Everything that
//! compares dates downstream works on the canonical text form produced here,
//! so normalization runs exactly once per document, when a snapshot arrives.

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};

use super::types::{Entry, EntryDocument, RawDate, Snapshot};

/// Formats an instant in the canonical form, e.g. `2024-03-05T10:00:00.000Z`.
pub fn format_iso(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parses RFC 3339 text into a UTC instant.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Parses a form date: RFC 3339, or `YYYY-MM-DDTHH:MM` read as UTC.
pub fn parse_datetime_input(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    parse_timestamp(value).or_else(|| {
        NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M")
            .ok()
            .map(|naive| naive.and_utc())
    })
}

/// Normalizes a stored date. Text is accepted as-is.
pub fn normalize_date(raw: &RawDate) -> Option<String> {
    match raw {
        RawDate::Text(text) => Some(text.clone()),
        RawDate::Timestamp { seconds, nanos } => {
            DateTime::from_timestamp(*seconds, *nanos).map(format_iso)
        }
    }
}

/// Turns a stored document into a cache entry.
pub fn normalize_document(document: EntryDocument) -> Entry {
    let EntryDocument { id, fields } = document;

    let date = fields.date.as_ref().and_then(|raw| {
        let normalized = normalize_date(raw);
        if normalized.is_none() {
            tracing::warn!(entry_id = %id, ?raw, "Dropping unrepresentable timestamp");
        }
        normalized
    });

    Entry {
        id,
        title: fields.title.unwrap_or_default(),
        content: fields.content.unwrap_or_default(),
        tags: fields.tags.unwrap_or_default(),
        date,
    }
}

/// Normalizes every document of a snapshot, keeping store order.
pub fn normalize_snapshot(snapshot: Snapshot) -> Vec<Entry> {
    snapshot
        .documents
        .into_iter()
        .map(normalize_document)
        .collect()
}
