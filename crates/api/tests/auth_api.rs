//! HTTP-level integration tests for sign-in, the page guard, sign-out and
//! the session watch stream.

mod common;

use std::time::Duration;

use axum::body::Body;
use axum::http::header::{ACCEPT, COOKIE, LOCATION, SET_COOKIE};
use axum::http::{Request, StatusCode};
use common::{
    body_json, body_text, get, get_auth, login, post_auth, post_json, send, ADMIN_EMAIL, ADMIN_UID,
    ENTRY_PAGE,
};
use serde_json::json;

// ---------------------------------------------------------------------------
// Login
// ---------------------------------------------------------------------------

#[tokio::test]
async fn login_success_returns_token_and_cookie() {
    let t = common::build_test_app();
    let body = json!({ "email": ADMIN_EMAIL, "password": common::ADMIN_PASSWORD });
    let response = post_json(&t.app, "/api/v1/auth/login", body).await;

    assert_eq!(response.status(), StatusCode::OK);
    let cookie = response
        .headers()
        .get(SET_COOKIE)
        .expect("login must set the session cookie")
        .to_str()
        .unwrap()
        .to_string();
    assert!(cookie.starts_with("qtrace_session="));
    assert!(cookie.contains("HttpOnly"));

    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert!(json["token"].is_string());
    assert_eq!(json["user"]["uid"], ADMIN_UID);
    assert_eq!(json["user"]["email"], ADMIN_EMAIL);
    assert!(json.get("error").is_none());
    assert_eq!(t.state.sessions.len().await, 1);
}

#[tokio::test]
async fn login_failure_passes_service_message_through() {
    let t = common::build_test_app();
    let body = json!({ "email": ADMIN_EMAIL, "password": "wrong" });
    let response = post_json(&t.app, "/api/v1/auth/login", body).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["error"], "INVALID_LOGIN_CREDENTIALS");
    assert!(json.get("token").is_none());
    assert!(t.state.sessions.is_empty().await);
}

// ---------------------------------------------------------------------------
// Page guard
// ---------------------------------------------------------------------------

#[tokio::test]
async fn api_call_without_session_gets_401_naming_entry_page() {
    let t = common::build_test_app();
    let response = get(&t.app, "/api/v1/projects").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["code"], "UNAUTHORIZED");
    assert_eq!(json["redirect"], ENTRY_PAGE);
}

#[tokio::test]
async fn page_load_without_session_is_redirected() {
    let t = common::build_test_app();
    let request = Request::get("/api/v1/dashboard")
        .header(ACCEPT, "text/html,application/xhtml+xml")
        .body(Body::empty())
        .unwrap();
    let response = send(&t.app, request).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers().get(LOCATION).unwrap(), ENTRY_PAGE);
}

#[tokio::test]
async fn unknown_token_is_refused() {
    let t = common::build_test_app();
    let response = get_auth(&t.app, "/api/v1/projects", "not-a-session").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn session_cookie_is_accepted() {
    let t = common::build_test_app();
    let token = login(&t.app).await;

    let request = Request::get("/api/v1/projects")
        .header(COOKIE, format!("qtrace_session={token}"))
        .body(Body::empty())
        .unwrap();
    let response = send(&t.app, request).await;
    assert_eq!(response.status(), StatusCode::OK);
}

// ---------------------------------------------------------------------------
// Logout
// ---------------------------------------------------------------------------

#[tokio::test]
async fn logout_ends_session_and_redirects() {
    let t = common::build_test_app();
    let token = login(&t.app).await;

    let response = post_auth(&t.app, "/api/v1/auth/logout", &token).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers().get(LOCATION).unwrap(), ENTRY_PAGE);
    let cookie = response.headers().get(SET_COOKIE).unwrap().to_str().unwrap();
    assert!(cookie.contains("Max-Age=0"));

    let response = get_auth(&t.app, "/api/v1/projects", &token).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ---------------------------------------------------------------------------
// Session watch (SSE)
// ---------------------------------------------------------------------------

#[tokio::test]
async fn watch_requires_a_session() {
    let t = common::build_test_app();
    let response = get(&t.app, "/api/v1/auth/watch").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn watch_sends_redirect_once_session_ends() {
    let t = common::build_test_app();
    let token = login(&t.app).await;

    let response = get_auth(&t.app, "/api/v1/auth/watch", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "text/event-stream"
    );

    let response_after_logout = post_auth(&t.app, "/api/v1/auth/logout", &token).await;
    assert_eq!(response_after_logout.status(), StatusCode::SEE_OTHER);

    // The stream closes after the redirect event, so the body completes.
    let text = tokio::time::timeout(Duration::from_secs(5), body_text(response))
        .await
        .expect("watch stream should close after the session ends");
    assert!(text.contains("event: redirect"), "got: {text}");
    assert!(text.contains(&format!("data: {ENTRY_PAGE}")), "got: {text}");
}
