//! Drafts hold user input until an explicit save turns them into store calls.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::error::ValidationError;
use super::normalize::{format_iso, parse_datetime_input};
use super::types::{Entry, EntryId, EntryPatch, NewEntry, UNTITLED};

/// Format used by `datetime-local` inputs.
const INPUT_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Splits a comma-separated tag input, trimming and dropping empty parts.
pub fn parse_tags_input(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

/// Rejects a tag list containing the same tag twice (exact comparison).
pub fn ensure_unique_tags(tags: &[String]) -> Result<(), ValidationError> {
    for (index, tag) in tags.iter().enumerate() {
        if tags[..index].contains(tag) {
            return Err(ValidationError::DuplicateTag(tag.clone()));
        }
    }
    Ok(())
}

/// The "new entry" form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NewEntryDraft {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    /// Comma-separated tags.
    #[serde(default)]
    pub tags: String,
}

impl NewEntryDraft {
    /// Validates the form and stamps it with `now`.
    pub fn into_new_entry(self, now: DateTime<Utc>) -> Result<NewEntry, ValidationError> {
        let title = self.title.trim();
        let content = self.content.trim();

        if title.is_empty() && content.is_empty() {
            return Err(ValidationError::MissingTitleOrContent);
        }

        let tags = parse_tags_input(&self.tags);
        ensure_unique_tags(&tags)?;

        Ok(NewEntry {
            title: if title.is_empty() { UNTITLED } else { title }.to_string(),
            content: content.to_string(),
            tags,
            date: format_iso(now),
        })
    }
}

/// An inline edit of one entry. Saving a clean draft writes nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditDraft {
    id: EntryId,
    title: String,
    content: String,
    date: String,
    dirty: bool,
    date_changed: bool,
}

impl EditDraft {
    /// Opens a draft pre-filled from a cached entry.
    pub fn open(entry: &Entry) -> Self {
        Self {
            id: entry.id.clone(),
            title: entry.title.clone(),
            content: entry.content.clone(),
            date: entry
                .instant()
                .map(|at| at.format(INPUT_DATE_FORMAT).to_string())
                .unwrap_or_default(),
            dirty: false,
            date_changed: false,
        }
    }

    pub fn id(&self) -> &EntryId {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// The date in `YYYY-MM-DDTHH:MM` form, empty when the entry has none.
    pub fn date(&self) -> &str {
        &self.date
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        let title = title.into();
        if title != self.title {
            self.title = title;
            self.dirty = true;
        }
    }

    pub fn set_content(&mut self, content: impl Into<String>) {
        let content = content.into();
        if content != self.content {
            self.content = content;
            self.dirty = true;
        }
    }

    pub fn set_date(&mut self, date: impl Into<String>) {
        let date = date.into();
        if date != self.date {
            self.date = date;
            self.dirty = true;
            self.date_changed = true;
        }
    }

    /// Turns the draft into a patch. `Ok(None)` means nothing changed.
    pub fn commit(self) -> Result<Option<EntryPatch>, ValidationError> {
        if !self.dirty {
            return Ok(None);
        }

        let date = if self.date_changed && !self.date.trim().is_empty() {
            let at = parse_datetime_input(&self.date)
                .ok_or_else(|| ValidationError::InvalidDate(self.date.clone()))?;
            Some(format_iso(at))
        } else {
            None
        };

        let title = self.title.trim();

        Ok(Some(EntryPatch {
            title: Some(if title.is_empty() { UNTITLED } else { title }.to_string()),
            content: Some(self.content.trim().to_string()),
            tags: None,
            date,
        }))
    }
}
