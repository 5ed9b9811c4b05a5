//! Sign-in and sign-out.

use std::sync::Arc;

use axum::{
    extract::State,
    response::{IntoResponse, Redirect},
    Form,
};
use axum_extra::extract::cookie::{Cookie, SameSite};
use axum_extra::extract::CookieJar;
use chrono::Utc;

use journal_core::actions::ActionError;
use journal_core::auth::{AuthError, Credentials};
use journal_core::state::JournalState;

use crate::{auth::SessionUser, handlers::AppError, state::AppState};

/// POST /auth/login - checks the credentials and sets the session cookie.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(credentials): Form<Credentials>,
) -> Result<impl IntoResponse, AppError> {
    let auth = Arc::new(state.auth_for(None));
    let journal = JournalState::starting_on(Utc::now().date_naive());
    let controller = state.controller(Arc::clone(&auth), journal).await?;

    controller.sign_in(credentials).await?;
    let session = auth.session().ok_or(ActionError::Auth(AuthError::SessionNotFound))?;

    let cookie = Cookie::build((state.config.cookie_name.clone(), session.id.to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build();

    Ok((jar.add(cookie), Redirect::to("/")))
}

/// POST /auth/logout - ends the session and clears the cookie.
pub async fn logout(
    State(state): State<AppState>,
    SessionUser(session): SessionUser,
    jar: CookieJar,
) -> Result<impl IntoResponse, AppError> {
    let auth = Arc::new(state.auth_for(session));
    let journal = JournalState::starting_on(Utc::now().date_naive());
    let controller = state.controller(auth, journal).await?;

    controller.sign_out().await?;

    let jar = jar.remove(Cookie::build(state.config.cookie_name.clone()).path("/"));
    Ok((jar, Redirect::to("/")))
}
