//! Read-only JSON endpoints.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::Utc;

use journal_core::calendar::CalendarGrid;
use journal_core::entry::Entry;
use journal_core::view::JournalView;

use crate::{
    auth::SessionUser,
    handlers::AppError,
    models::JournalQuery,
    state::{AppState, Controller},
};

async fn controller_for(
    state: &AppState,
    session: SessionUser,
    query: &JournalQuery,
) -> Result<Controller, AppError> {
    let today = Utc::now().date_naive();
    let auth = Arc::new(state.auth_for(session.0));
    Ok(state.controller(auth, query.journal_state(today)).await?)
}

/// GET /api/entries - every cached entry, newest first.
pub async fn list_entries(
    State(state): State<AppState>,
    session: SessionUser,
) -> Result<Json<Vec<Entry>>, AppError> {
    let controller = controller_for(&state, session, &JournalQuery::default()).await?;
    Ok(Json(controller.state().cache.entries().to_vec()))
}

/// GET /api/view - the rendered view for the query's filter.
pub async fn get_view(
    State(state): State<AppState>,
    session: SessionUser,
    Query(query): Query<JournalQuery>,
) -> Result<Json<JournalView>, AppError> {
    let controller = controller_for(&state, session, &query).await?;
    Ok(Json(controller.render()))
}

/// GET /api/tags - the tag palette.
pub async fn list_tags(
    State(state): State<AppState>,
    session: SessionUser,
) -> Result<Json<Vec<String>>, AppError> {
    let controller = controller_for(&state, session, &JournalQuery::default()).await?;
    Ok(Json(controller.state().cache.palette().to_vec()))
}

/// GET /api/calendar?year=&month= - the month grid with entry markers.
pub async fn get_calendar(
    State(state): State<AppState>,
    session: SessionUser,
    Query(query): Query<JournalQuery>,
) -> Result<Json<CalendarGrid>, AppError> {
    let controller = controller_for(&state, session, &query).await?;
    Ok(Json(controller.render().calendar))
}
