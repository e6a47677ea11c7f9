//! Redirect-if-unauthenticated for every protected route.

use axum::extract::{Request, State};
use axum::http::header::ACCEPT;
use axum::http::{HeaderMap, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use axum::Json;
use serde_json::json;

use crate::middleware::auth::{session_token, AuthSession};
use crate::state::AppState;

/// Let the request through only with a live session.
///
/// Otherwise a browser page load (`Accept: text/html`) gets a 303 to the
/// entry page, and anything else a 401 whose body names the entry page in
/// `redirect`. On success the [`AuthSession`] is stored in the request
/// extensions for handlers to extract.
pub async fn page_guard(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    if let Some(token) = session_token(request.headers()) {
        if let Some(session) = state.sessions.validate(&token).await {
            request
                .extensions_mut()
                .insert(AuthSession { token, session });
            return next.run(request).await;
        }
    }

    let entry_page = state.config.entry_page.as_str();
    tracing::debug!(path = %request.uri().path(), entry_page, "No session, sending to entry page");

    if wants_html(request.headers()) {
        return Redirect::to(entry_page).into_response();
    }
    let body = json!({
        "error": "Not signed in",
        "code": "UNAUTHORIZED",
        "redirect": entry_page,
    });
    (StatusCode::UNAUTHORIZED, Json(body)).into_response()
}

fn wants_html(headers: &HeaderMap) -> bool {
    headers
        .get(ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.contains("text/html"))
}
