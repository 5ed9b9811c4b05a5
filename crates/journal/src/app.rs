use std::time::Duration;

use axum::{
    http::{header, Method, StatusCode},
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::{
    handlers::{
        api::{get_calendar, get_view, list_entries, list_tags},
        entries::{add_tag, create_entry, delete_entry, remove_tag, update_entry},
        events::events_sse,
        health::livez,
        login::{login, logout},
        pages::index,
        preferences::toggle_dark_mode,
    },
    state::AppState,
};

/// Create the application router with all routes and middleware.
pub fn create_app(state: AppState) -> Router {
    // CORS configuration for API endpoints
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE]);

    let api_routes = Router::new()
        .route("/entries", get(list_entries).post(create_entry))
        .route("/entries/{id}", put(update_entry).delete(delete_entry))
        .route("/entries/{id}/tags", post(add_tag))
        .route("/entries/{id}/tags/{tag}", delete(remove_tag))
        .route("/view", get(get_view))
        .route("/tags", get(list_tags))
        .route("/calendar", get(get_calendar))
        .layer(cors);

    // The event stream is long-lived, so it stays outside the timeout layer.
    let stream_routes = Router::new().route("/api/events", get(events_sse));

    Router::new()
        .route("/", get(index))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .route("/preferences/dark-mode", post(toggle_dark_mode))
        .route("/livez", get(livez))
        .nest("/api", api_routes)
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(10),
        ))
        .merge(stream_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{header::COOKIE, header::SET_COOKIE, Request, StatusCode},
        response::Response,
    };
    use chrono::{Datelike, NaiveDate};
    use http_body_util::BodyExt;
    use journal_core::entry::Entry;
    use tower::ServiceExt;

    use crate::config::Config;

    fn state() -> AppState {
        AppState::for_tests(Config {
            admin_email: "admin@example.com".to_string(),
            admin_password: "secret".to_string(),
            ..Config::default()
        })
    }

    async fn body_string(response: Response) -> String {
        let body = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(body.to_vec()).unwrap()
    }

    async fn entries(app: &Router) -> Vec<Entry> {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/entries")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&body).unwrap()
    }

    /// Signs in and returns the `name=value` cookie pair.
    async fn sign_in(app: &Router) -> String {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/auth/login")
                    .header("Content-Type", "application/x-www-form-urlencoded")
                    .body(Body::from("email=admin%40example.com&password=secret"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let set_cookie = response
            .headers()
            .get(SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap();
        set_cookie.split(';').next().unwrap().to_string()
    }

    fn form_request(method: &str, uri: &str, cookie: Option<&str>, body: &str) -> Request<Body> {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("Content-Type", "application/x-www-form-urlencoded");
        if let Some(cookie) = cookie {
            builder = builder.header(COOKIE, cookie);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    #[tokio::test]
    async fn test_index_page_signed_out() {
        let app = create_app(state());

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = body_string(response).await;
        assert!(html.contains("All entries"));
        assert!(html.contains("Morning run"));
        assert!(html.contains("Sign in"));
        assert!(!html.contains("data-action=\"delete\""));
    }

    #[tokio::test]
    async fn test_index_page_signed_in_shows_affordances() {
        let app = create_app(state());
        let cookie = sign_in(&app).await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/")
                    .header(COOKIE, cookie)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let html = body_string(response).await;
        assert!(html.contains("admin@example.com"));
        assert!(html.contains("data-action=\"delete\""));
        assert!(html.contains("id=\"new-entry\""));
        assert!(html.contains("data-edit-title=\"\""));
        assert!(html.contains("data-edit-date=\"20"));
        assert!(html.contains("list=\"existing-tags\""));
    }

    #[tokio::test]
    async fn test_index_page_offers_palette_as_tag_suggestions() {
        let app = create_app(state());

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let html = body_string(response).await;
        assert!(html.contains("<datalist id=\"existing-tags\">"));
        for tag in ["Home", "health", "home", "ideas", "outside", "reading", "travel"] {
            assert!(html.contains(&format!("<option value=\"{tag}\">")), "{tag}");
        }
        assert!(!html.contains("data-edit-title"));
    }

    #[tokio::test]
    async fn test_index_page_filters_by_tag() {
        let app = create_app(state());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/?tag=READING")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let html = body_string(response).await;
        assert!(html.contains("Entries tagged &#34;READING&#34;"));
        assert!(html.contains("Book notes"));
        assert!(!html.contains("Morning run"));
    }

    #[tokio::test]
    async fn test_view_json_no_results() {
        let app = create_app(state());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/view?text=nothing-matches-this")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["heading"], "Results for \"nothing-matches-this\"");
        assert_eq!(json["body"]["kind"], "empty");
        assert_eq!(json["body"]["message"], "No entries found.");
    }

    #[tokio::test]
    async fn test_tags_are_sorted_and_case_sensitive() {
        let app = create_app(state());

        let response = app
            .oneshot(Request::builder().uri("/api/tags").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let tags: Vec<String> = serde_json::from_slice(&body).unwrap();
        assert_eq!(
            tags,
            vec!["Home", "health", "home", "ideas", "outside", "reading", "travel"]
        );
    }

    #[tokio::test]
    async fn test_calendar_json() {
        let app = create_app(state());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/calendar?year=2024&month=2")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["title"], "February 2024");
        assert_eq!(json["cells"].as_array().unwrap().len() % 7, 0);
    }

    #[tokio::test]
    async fn test_index_page_at_the_earliest_month_falls_back_to_today() {
        let app = create_app(state());
        let uri = format!("/?year={}&month=1", NaiveDate::MIN.year());

        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = body_string(response).await;
        assert!(html.contains("All entries"));
    }

    #[tokio::test]
    async fn test_create_requires_sign_in() {
        let app = create_app(state());
        let before = entries(&app).await.len();

        let response = app
            .clone()
            .oneshot(form_request("POST", "/api/entries", None, "title=Hi&content=&tags="))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(entries(&app).await.len(), before);
    }

    #[tokio::test]
    async fn test_create_entry() {
        let app = create_app(state());
        let cookie = sign_in(&app).await;

        let response = app
            .clone()
            .oneshot(form_request(
                "POST",
                "/api/entries",
                Some(&cookie),
                "title=&content=Lunch+with+Sam&tags=food%2C+friends",
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::ACCEPTED);
        let all = entries(&app).await;
        let created = &all[0];
        assert_eq!(created.title, "(untitled)");
        assert_eq!(created.content, "Lunch with Sam");
        assert_eq!(created.tags, vec!["food", "friends"]);
    }

    #[tokio::test]
    async fn test_create_rejects_empty_entry_and_duplicate_tags() {
        let app = create_app(state());
        let cookie = sign_in(&app).await;

        let response = app
            .clone()
            .oneshot(form_request(
                "POST",
                "/api/entries",
                Some(&cookie),
                "title=+&content=",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = app
            .oneshot(form_request(
                "POST",
                "/api/entries",
                Some(&cookie),
                "title=T&tags=a%2Ca",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_edit_and_tag_lifecycle() {
        let app = create_app(state());
        let cookie = sign_in(&app).await;

        let response = app
            .clone()
            .oneshot(form_request(
                "PUT",
                "/api/entries/demo-morning-run",
                Some(&cookie),
                "title=Evening+run&date=2024-03-05T18%3A30",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::ACCEPTED);

        let response = app
            .clone()
            .oneshot(form_request(
                "POST",
                "/api/entries/demo-morning-run/tags",
                Some(&cookie),
                "tag=Health",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::ACCEPTED);

        let response = app
            .clone()
            .oneshot(form_request(
                "POST",
                "/api/entries/demo-morning-run/tags",
                Some(&cookie),
                "tag=health",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = app
            .clone()
            .oneshot(form_request(
                "DELETE",
                "/api/entries/demo-morning-run/tags/outside",
                Some(&cookie),
                "",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::ACCEPTED);

        let all = entries(&app).await;
        let run = all
            .iter()
            .find(|e| e.id.as_str() == "demo-morning-run")
            .unwrap();
        assert_eq!(run.title, "Evening run");
        assert_eq!(run.date.as_deref(), Some("2024-03-05T18:30:00.000Z"));
        assert_eq!(run.tags, vec!["health", "Health"]);
    }

    #[tokio::test]
    async fn test_unknown_id_is_no_content() {
        let app = create_app(state());
        let cookie = sign_in(&app).await;

        let response = app
            .oneshot(form_request(
                "DELETE",
                "/api/entries/does-not-exist",
                Some(&cookie),
                "",
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_delete_entry() {
        let app = create_app(state());
        let cookie = sign_in(&app).await;
        let before = entries(&app).await.len();

        let response = app
            .clone()
            .oneshot(form_request(
                "DELETE",
                "/api/entries/demo-trip",
                Some(&cookie),
                "",
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::ACCEPTED);
        let after = entries(&app).await;
        assert_eq!(after.len(), before - 1);
        assert!(after.iter().all(|e| e.id.as_str() != "demo-trip"));
    }

    #[tokio::test]
    async fn test_read_only_store_is_forbidden() {
        let app = create_app(AppState::for_tests(Config {
            admin_password: "secret".to_string(),
            read_only_store: true,
            ..Config::default()
        }));
        let cookie = sign_in(&app).await;

        let response = app
            .oneshot(form_request(
                "DELETE",
                "/api/entries/demo-trip",
                Some(&cookie),
                "",
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_login_rejects_bad_credentials() {
        let app = create_app(state());

        let response = app
            .clone()
            .oneshot(form_request(
                "POST",
                "/auth/login",
                None,
                "email=admin%40example.com&password=wrong",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = app
            .oneshot(form_request("POST", "/auth/login", None, "email=&password="))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_login_keeps_surrounding_spaces_in_password() {
        let app = create_app(AppState::for_tests(Config {
            admin_email: "admin@example.com".to_string(),
            admin_password: " two words ".to_string(),
            ..Config::default()
        }));

        let response = app
            .clone()
            .oneshot(form_request(
                "POST",
                "/auth/login",
                None,
                "email=+admin%40example.com+&password=two+words",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = app
            .oneshot(form_request(
                "POST",
                "/auth/login",
                None,
                "email=+admin%40example.com+&password=+two+words+",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
    }

    #[tokio::test]
    async fn test_logout_ends_session() {
        let app = create_app(state());
        let cookie = sign_in(&app).await;

        let response = app
            .clone()
            .oneshot(form_request("POST", "/auth/logout", Some(&cookie), ""))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        let response = app
            .oneshot(form_request(
                "DELETE",
                "/api/entries/demo-trip",
                Some(&cookie),
                "",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_dark_mode_toggle_sets_cookie() {
        let app = create_app(state());

        let response = app
            .clone()
            .oneshot(form_request("POST", "/preferences/dark-mode", None, ""))
            .await
            .unwrap();
        let set_cookie = response.headers().get(SET_COOKIE).unwrap().to_str().unwrap();
        assert!(set_cookie.starts_with("journal-dark=1"));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/")
                    .header(COOKIE, "journal-dark=1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let html = body_string(response).await;
        assert!(html.contains("<body class=\"dark\">"));
    }

    #[tokio::test]
    async fn test_livez() {
        let app = create_app(state());

        let response = app
            .oneshot(Request::builder().uri("/livez").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
