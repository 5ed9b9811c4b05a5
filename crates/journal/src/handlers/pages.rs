use std::sync::Arc;

use askama::Template;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use axum_extra::extract::CookieJar;
use chrono::Utc;

use journal_core::preferences::{DarkMode, DARK_MODE_KEY};
use journal_core::view::JournalView;

use crate::{auth::SessionUser, handlers::AppError, models::JournalQuery, state::AppState};

/// Template wrapper that converts Askama templates into HTML responses.
pub struct HtmlTemplate<T>(pub T);

impl<T> IntoResponse for HtmlTemplate<T>
where
    T: Template,
{
    fn into_response(self) -> Response {
        match self.0.render() {
            Ok(html) => Html(html).into_response(),
            Err(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to render template: {err}"),
            )
                .into_response(),
        }
    }
}

/// The whole journal page.
#[derive(Template)]
#[template(path = "journal.html")]
pub struct JournalTemplate {
    pub view: JournalView,
    pub dark_mode: DarkMode,
    pub signed_in_as: Option<String>,
}

/// The part of the page that follows store pushes: calendar, tag palette
/// and entry list.
#[derive(Template)]
#[template(path = "live.html")]
pub struct LiveTemplate {
    pub view: JournalView,
}

/// Handler for the journal page (GET /).
pub async fn index(
    State(state): State<AppState>,
    SessionUser(session): SessionUser,
    Query(query): Query<JournalQuery>,
    jar: CookieJar,
) -> Result<impl IntoResponse, AppError> {
    let today = Utc::now().date_naive();
    let signed_in_as = session.as_ref().map(|s| s.identity.email.clone());
    let auth = Arc::new(state.auth_for(session));
    let controller = state.controller(auth, query.journal_state(today)).await?;

    Ok(HtmlTemplate(JournalTemplate {
        view: controller.render(),
        dark_mode: DarkMode::from_stored(jar.get(DARK_MODE_KEY).map(|c| c.value())),
        signed_in_as,
    }))
}
