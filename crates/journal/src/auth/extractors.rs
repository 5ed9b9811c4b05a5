//! Axum extractors for authentication.

use std::convert::Infallible;

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::extract::CookieJar;
use chrono::Utc;

use journal_core::auth::{is_session_expired, Session, SessionId, SessionRepository};

use crate::state::AppState;

/// The session named by the request's cookie, if it exists and is live.
///
/// Never rejects: a missing, unknown or expired session reads as `None`,
/// and authorization is decided later by the command planner.
pub struct SessionUser(pub Option<Session>);

impl<S> FromRequestParts<S> for SessionUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);

        let jar = CookieJar::from_headers(&parts.headers);
        let Some(cookie) = jar.get(&state.config.cookie_name) else {
            return Ok(SessionUser(None));
        };
        let session_id = SessionId::new(cookie.value().to_string());

        let session = match state.sessions.get_session(&session_id).await {
            Ok(Some(session)) => session,
            Ok(None) => return Ok(SessionUser(None)),
            Err(err) => {
                tracing::warn!(error = %err, "Session lookup failed");
                return Ok(SessionUser(None));
            }
        };

        if is_session_expired(&session, Utc::now()) {
            tracing::debug!("Ignoring expired session");
            return Ok(SessionUser(None));
        }

        Ok(SessionUser(Some(session)))
    }
}
