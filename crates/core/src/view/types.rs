use chrono::NaiveDate;
use serde::Serialize;

use crate::calendar::CalendarGrid;
use crate::entry::EntryId;
use crate::filter::Filter;

/// Placeholder shown when the filter leaves nothing.
pub const NO_RESULTS: &str = "No entries found.";

/// Placeholder for entries without content.
pub const NO_CONTENT: &str = "(no content)";

/// Ambient inputs read at render time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderContext {
    /// Re-evaluated on every render; never cached in the view.
    pub authenticated: bool,
    pub today: NaiveDate,
}

/// Everything a page shows, derived from cache and filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JournalView {
    pub heading: String,
    pub body: ViewBody,
    pub palette: Vec<String>,
    pub calendar: CalendarGrid,
    pub filter: Filter,
    pub authenticated: bool,
}

impl JournalView {
    /// Cards on display; empty when the placeholder is shown.
    pub fn cards(&self) -> &[EntryCard] {
        match &self.body {
            ViewBody::Entries { cards } => cards,
            ViewBody::Empty { .. } => &[],
        }
    }

    /// The placeholder text when nothing matches.
    pub fn empty_message(&self) -> Option<&str> {
        match &self.body {
            ViewBody::Empty { message } => Some(message),
            ViewBody::Entries { .. } => None,
        }
    }

    pub fn visible_ids(&self) -> Vec<&EntryId> {
        self.cards().iter().map(|card| &card.id).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ViewBody {
    Empty { message: String },
    Entries { cards: Vec<EntryCard> },
}

/// One rendered entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryCard {
    pub id: EntryId,
    pub title: String,
    pub display_date: String,
    pub content: String,
    pub tags: Vec<TagChip>,
    /// Edit, delete and add-tag actions; empty when signed out.
    pub actions: Vec<Affordance>,
    /// Values the editor opens with; `None` when signed out.
    pub edit: Option<EditFields>,
}

/// Raw entry fields for the edit form, placeholders left out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EditFields {
    pub title: String,
    pub content: String,
    /// `YYYY-MM-DDTHH:MM`, empty when the entry has no valid date.
    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagChip {
    pub label: String,
    pub remove: Option<Affordance>,
}

/// A clickable action bound to one entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Affordance {
    pub action: AffordanceAction,
    pub label: String,
    /// Question to confirm before acting, if any.
    pub confirm: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AffordanceAction {
    Edit { entry_id: EntryId },
    Delete { entry_id: EntryId },
    AddTag { entry_id: EntryId },
    RemoveTag { entry_id: EntryId, tag: String },
}

impl AffordanceAction {
    pub fn entry_id(&self) -> &EntryId {
        match self {
            Self::Edit { entry_id }
            | Self::Delete { entry_id }
            | Self::AddTag { entry_id }
            | Self::RemoveTag { entry_id, .. } => entry_id,
        }
    }

    /// Short name used for CSS classes and data attributes.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Edit { .. } => "edit",
            Self::Delete { .. } => "delete",
            Self::AddTag { .. } => "add-tag",
            Self::RemoveTag { .. } => "remove-tag",
        }
    }
}
