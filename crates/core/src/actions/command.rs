use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::Identity;
use crate::entry::{EditDraft, EntryId, EntryPatch, NewEntry, NewEntryDraft, ValidationError};
use crate::state::EntryCache;

use super::ActionError;

/// Fields submitted from the inline editor. Missing fields keep their value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct EditChanges {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    /// A blank date keeps the stored one.
    #[serde(default, deserialize_with = "crate::serde::deserialize_optional_string")]
    pub date: Option<String>,
}

/// A mutating user action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryCommand {
    Create(NewEntryDraft),
    Edit { id: EntryId, changes: EditChanges },
    Delete { id: EntryId },
    AddTag { id: EntryId, tag: String },
    RemoveTag { id: EntryId, tag: String },
}

/// A store call ready to be issued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    Add(NewEntry),
    Update { id: EntryId, patch: EntryPatch },
    Delete { id: EntryId },
}

/// Why a command produced no store call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The entry id is not in the cache.
    NotFound,
    /// The command would not change anything.
    Unchanged,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Plan {
    Apply(Mutation),
    Skip(SkipReason),
}

/// Checks a command against the signed-in identity and the cache.
///
/// Unauthenticated commands and invalid input fail before any store call.
/// Commands on ids the cache no longer holds are skipped silently.
pub fn plan_command(
    command: EntryCommand,
    cache: &EntryCache,
    identity: Option<&Identity>,
    now: DateTime<Utc>,
) -> Result<Plan, ActionError> {
    if identity.is_none() {
        return Err(ActionError::Unauthorized);
    }

    let plan = match command {
        EntryCommand::Create(draft) => Plan::Apply(Mutation::Add(draft.into_new_entry(now)?)),
        EntryCommand::Edit { id, changes } => {
            let Some(entry) = cache.get(&id) else {
                return Ok(Plan::Skip(SkipReason::NotFound));
            };
            let mut draft = EditDraft::open(entry);
            if let Some(title) = changes.title {
                draft.set_title(title);
            }
            if let Some(content) = changes.content {
                draft.set_content(content);
            }
            if let Some(date) = changes.date {
                draft.set_date(date);
            }
            match draft.commit()? {
                Some(patch) => Plan::Apply(Mutation::Update { id, patch }),
                None => Plan::Skip(SkipReason::Unchanged),
            }
        }
        EntryCommand::Delete { id } => {
            if cache.get(&id).is_none() {
                return Ok(Plan::Skip(SkipReason::NotFound));
            }
            Plan::Apply(Mutation::Delete { id })
        }
        EntryCommand::AddTag { id, tag } => {
            let Some(entry) = cache.get(&id) else {
                return Ok(Plan::Skip(SkipReason::NotFound));
            };
            let tag = tag.trim();
            if tag.is_empty() {
                return Err(ValidationError::EmptyTag.into());
            }
            if entry.has_tag_exact(tag) {
                return Err(ValidationError::DuplicateTag(tag.to_string()).into());
            }
            let mut tags = entry.tags.clone();
            tags.push(tag.to_string());
            Plan::Apply(Mutation::Update {
                id,
                patch: EntryPatch::tags(tags),
            })
        }
        EntryCommand::RemoveTag { id, tag } => {
            let Some(entry) = cache.get(&id) else {
                return Ok(Plan::Skip(SkipReason::NotFound));
            };
            if !entry.has_tag_exact(&tag) {
                return Ok(Plan::Skip(SkipReason::Unchanged));
            }
            let tags = entry.tags.iter().filter(|t| **t != tag).cloned().collect();
            Plan::Apply(Mutation::Update {
                id,
                patch: EntryPatch::tags(tags),
            })
        }
    };

    Ok(plan)
}
