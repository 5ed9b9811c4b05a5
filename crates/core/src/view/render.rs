use crate::calendar::build_grid;
use crate::entry::{EditDraft, Entry, UNTITLED};
use crate::filter::{filter_entries, heading};
use crate::state::JournalState;

use super::types::{
    Affordance, AffordanceAction, EditFields, EntryCard, JournalView, RenderContext, TagChip,
    ViewBody, NO_CONTENT, NO_RESULTS,
};

const DISPLAY_DATE_FORMAT: &str = "%B %-d, %Y %H:%M";

/// Derives the whole view from state. Pure: equal inputs give equal views.
///
/// The tree is rebuilt from scratch each time, affordances included, so
/// nothing from a previous render survives into the next one.
pub fn render(state: &JournalState, context: RenderContext) -> JournalView {
    let visible = filter_entries(state.cache.entries(), &state.filter);

    let body = if visible.is_empty() {
        ViewBody::Empty {
            message: NO_RESULTS.to_string(),
        }
    } else {
        ViewBody::Entries {
            cards: visible
                .into_iter()
                .map(|entry| entry_card(entry, context.authenticated))
                .collect(),
        }
    };

    JournalView {
        heading: heading(&state.filter),
        body,
        palette: state.cache.palette().to_vec(),
        calendar: build_grid(state.month, state.cache.entries(), context.today),
        filter: state.filter.clone(),
        authenticated: context.authenticated,
    }
}

fn entry_card(entry: &Entry, authenticated: bool) -> EntryCard {
    let tags = entry
        .tags
        .iter()
        .map(|tag| TagChip {
            label: tag.clone(),
            remove: authenticated.then(|| Affordance {
                action: AffordanceAction::RemoveTag {
                    entry_id: entry.id.clone(),
                    tag: tag.clone(),
                },
                label: "×".to_string(),
                confirm: Some(format!("Really remove the tag \"{tag}\"?")),
            }),
        })
        .collect();

    let actions = if authenticated {
        vec![
            Affordance {
                action: AffordanceAction::Edit {
                    entry_id: entry.id.clone(),
                },
                label: "Edit".to_string(),
                confirm: None,
            },
            Affordance {
                action: AffordanceAction::Delete {
                    entry_id: entry.id.clone(),
                },
                label: "Delete".to_string(),
                confirm: Some("Really delete this entry?".to_string()),
            },
            Affordance {
                action: AffordanceAction::AddTag {
                    entry_id: entry.id.clone(),
                },
                label: "+ Add a tag".to_string(),
                confirm: None,
            },
        ]
    } else {
        Vec::new()
    };

    EntryCard {
        id: entry.id.clone(),
        title: if entry.title.is_empty() {
            UNTITLED.to_string()
        } else {
            entry.title.clone()
        },
        display_date: display_date(entry),
        content: if entry.content.is_empty() {
            NO_CONTENT.to_string()
        } else {
            entry.content.clone()
        },
        tags,
        actions,
        edit: authenticated.then(|| edit_fields(entry)),
    }
}

fn edit_fields(entry: &Entry) -> EditFields {
    let draft = EditDraft::open(entry);
    EditFields {
        title: draft.title().to_string(),
        content: draft.content().to_string(),
        date: draft.date().to_string(),
    }
}

fn display_date(entry: &Entry) -> String {
    match entry.instant() {
        Some(at) => at.format(DISPLAY_DATE_FORMAT).to_string(),
        None => entry.date.clone().unwrap_or_default(),
    }
}
