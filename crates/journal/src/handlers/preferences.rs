use axum::response::{IntoResponse, Redirect};
use axum_extra::extract::cookie::{Cookie, SameSite};
use axum_extra::extract::CookieJar;

use journal_core::preferences::{DarkMode, DARK_MODE_KEY};

/// POST /preferences/dark-mode - flips the stored dark-mode flag.
pub async fn toggle_dark_mode(jar: CookieJar) -> impl IntoResponse {
    let current = DarkMode::from_stored(jar.get(DARK_MODE_KEY).map(|c| c.value()));
    let next = current.toggled();
    tracing::debug!(enabled = next.is_enabled(), "Dark mode toggled");

    let cookie = Cookie::build((DARK_MODE_KEY, next.stored_value()))
        .path("/")
        .same_site(SameSite::Lax)
        .build();

    (jar.add(cookie), Redirect::to("/"))
}
