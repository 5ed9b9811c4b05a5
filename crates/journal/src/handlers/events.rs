//! SSE stream of re-rendered entry lists.
//!
//! Each connection runs its own reconciliation loop: the store's snapshot
//! pushes go through the controller and every resulting view is sent to the
//! browser as HTML for the connection's filter.

use std::convert::Infallible;
use std::sync::Arc;

use askama::Template;
use axum::{
    extract::{Query, State},
    response::sse::{Event, KeepAlive, Sse},
};
use chrono::Utc;
use serde::Serialize;
use tokio::sync::mpsc;

use journal_core::controller::{JournalController, Update};

use crate::{
    auth::SessionUser, handlers::pages::LiveTemplate, models::JournalQuery, state::AppState,
};

#[derive(Debug, Serialize)]
struct ViewPayload<'a> {
    heading: &'a str,
    html: String,
}

/// GET /api/events
///
/// Sends a `view` event for the current snapshot and one per push after that.
/// Closes when the server shuts down.
pub async fn events_sse(
    State(state): State<AppState>,
    SessionUser(session): SessionUser,
    Query(query): Query<JournalQuery>,
) -> Sse<impl tokio_stream::Stream<Item = Result<Event, Infallible>>> {
    let journal = query.journal_state(Utc::now().date_naive());
    let auth = Arc::new(state.auth_for(session));
    auth.watch_revocation();
    let controller = JournalController::new(Arc::clone(&state.store), auth, journal);

    let (inputs_tx, inputs_rx) = mpsc::channel(1);
    let (updates_tx, mut updates_rx) = mpsc::channel(16);
    tokio::spawn(async move {
        if let Err(err) = controller.run(inputs_rx, updates_tx).await {
            tracing::warn!(error = %err, "Live view loop failed");
        }
    });

    let mut shutdown_rx = state.subscribe_shutdown();

    let stream = async_stream::stream! {
        // Dropping the input sender stops the loop once the client goes away.
        let _inputs = inputs_tx;

        loop {
            let update = tokio::select! {
                update = updates_rx.recv() => update,
                _ = shutdown_rx.recv() => {
                    tracing::info!("SSE session received shutdown signal");
                    break;
                }
            };

            let Some(update) = update else {
                break;
            };

            match update {
                Update::View(view) => {
                    let heading = view.heading.clone();
                    let html = match (LiveTemplate { view: *view }).render() {
                        Ok(html) => html,
                        Err(err) => {
                            tracing::error!(error = %err, "Failed to render live view");
                            continue;
                        }
                    };
                    match Event::default().event("view").json_data(ViewPayload { heading: &heading, html }) {
                        Ok(event) => yield Ok(event),
                        Err(err) => tracing::error!(error = %err, "Failed to encode view event"),
                    }
                }
                Update::Rejected(err) => {
                    tracing::debug!(error = %err, "Live view input rejected");
                }
            }
        }
    };

    Sse::new(stream).keep_alive(KeepAlive::default())
}
