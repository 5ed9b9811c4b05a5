use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::normalize::parse_timestamp;

/// Title shown (and stored on create) when an entry has none.
pub const UNTITLED: &str = "(untitled)";

/// Opaque document identifier assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(String);

impl EntryId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for EntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for EntryId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// A document date as the store holds it: either text or a native timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawDate {
    Text(String),
    Timestamp {
        seconds: i64,
        #[serde(default)]
        nanos: u32,
    },
}

impl RawDate {
    /// Builds a native timestamp value from a UTC instant.
    pub fn timestamp(at: DateTime<Utc>) -> Self {
        Self::Timestamp {
            seconds: at.timestamp(),
            nanos: at.timestamp_subsec_nanos(),
        }
    }
}

/// Document fields exactly as stored. Every field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<RawDate>,
}

/// A stored document with its id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryDocument {
    pub id: EntryId,
    #[serde(flatten)]
    pub fields: DocumentFields,
}

/// A full, ordered copy of every document the store currently holds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Monotonic change counter; the initial empty snapshot is version 0.
    pub version: u64,
    pub documents: Vec<EntryDocument>,
}

/// A journal entry after ingestion: the date is canonical ISO 8601 text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub id: EntryId,
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
    pub date: Option<String>,
}

impl Entry {
    /// The `YYYY-MM-DD` prefix of the normalized date.
    pub fn day(&self) -> Option<&str> {
        self.date.as_deref().and_then(|d| d.get(..10))
    }

    /// The date parsed as an instant, when it is valid RFC 3339.
    pub fn instant(&self) -> Option<DateTime<Utc>> {
        self.date.as_deref().and_then(parse_timestamp)
    }

    pub fn has_tag_exact(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// Fields sent to the store to create an entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEntry {
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
    pub date: String,
}

impl From<NewEntry> for DocumentFields {
    fn from(entry: NewEntry) -> Self {
        Self {
            title: Some(entry.title),
            content: Some(entry.content),
            tags: Some(entry.tags),
            date: Some(RawDate::Text(entry.date)),
        }
    }
}

/// A partial update: only the fields set here are written.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

impl EntryPatch {
    pub fn tags(tags: Vec<String>) -> Self {
        Self {
            tags: Some(tags),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none() && self.tags.is_none() && self.date.is_none()
    }

    /// Merges the patch into stored fields.
    pub fn apply_to(self, fields: &mut DocumentFields) {
        if let Some(title) = self.title {
            fields.title = Some(title);
        }
        if let Some(content) = self.content {
            fields.content = Some(content);
        }
        if let Some(tags) = self.tags {
            fields.tags = Some(tags);
        }
        if let Some(date) = self.date {
            fields.date = Some(RawDate::Text(date));
        }
    }
}
