//! Entry mutations.
//!
//! Every handler plans the command against the store's current snapshot and
//! answers as soon as the store acknowledges. Pages see the result through
//! their event stream, not through the response.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Form,
};
use chrono::Utc;

use journal_core::actions::{EditChanges, EntryCommand};
use journal_core::controller::CommandOutcome;
use journal_core::entry::{EntryId, NewEntryDraft};
use journal_core::state::JournalState;

use crate::{auth::SessionUser, handlers::AppError, models::TagForm, state::AppState};

async fn execute(
    state: &AppState,
    session: SessionUser,
    command: EntryCommand,
) -> Result<StatusCode, AppError> {
    let auth = Arc::new(state.auth_for(session.0));
    let journal = JournalState::starting_on(Utc::now().date_naive());
    let mut controller = state.controller(auth, journal).await?;

    let status = match controller.execute(command).await? {
        CommandOutcome::Submitted { .. } => StatusCode::ACCEPTED,
        CommandOutcome::Skipped(_) => StatusCode::NO_CONTENT,
    };
    Ok(status)
}

/// POST /api/entries
pub async fn create_entry(
    State(state): State<AppState>,
    session: SessionUser,
    Form(draft): Form<NewEntryDraft>,
) -> Result<StatusCode, AppError> {
    execute(&state, session, EntryCommand::Create(draft)).await
}

/// PUT /api/entries/{id}
pub async fn update_entry(
    State(state): State<AppState>,
    session: SessionUser,
    Path(id): Path<String>,
    Form(changes): Form<EditChanges>,
) -> Result<StatusCode, AppError> {
    let command = EntryCommand::Edit {
        id: EntryId::new(id),
        changes,
    };
    execute(&state, session, command).await
}

/// DELETE /api/entries/{id}
pub async fn delete_entry(
    State(state): State<AppState>,
    session: SessionUser,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let command = EntryCommand::Delete {
        id: EntryId::new(id),
    };
    execute(&state, session, command).await
}

/// POST /api/entries/{id}/tags
pub async fn add_tag(
    State(state): State<AppState>,
    session: SessionUser,
    Path(id): Path<String>,
    Form(form): Form<TagForm>,
) -> Result<StatusCode, AppError> {
    let command = EntryCommand::AddTag {
        id: EntryId::new(id),
        tag: form.tag,
    };
    execute(&state, session, command).await
}

/// DELETE /api/entries/{id}/tags/{tag}
pub async fn remove_tag(
    State(state): State<AppState>,
    session: SessionUser,
    Path((id, tag)): Path<(String, String)>,
) -> Result<StatusCode, AppError> {
    let command = EntryCommand::RemoveTag {
        id: EntryId::new(id),
        tag,
    };
    execute(&state, session, command).await
}
