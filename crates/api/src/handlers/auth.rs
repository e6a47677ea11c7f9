//! Handlers for the `/auth` resource (login, logout, session watch).

use std::convert::Infallible;

use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::http::StatusCode;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::{IntoResponse, Redirect, Response};
use axum::Json;
use futures::stream::{self, Stream, StreamExt};
use serde::{Deserialize, Serialize};
use tokio_stream::wrappers::WatchStream;

use crate::auth::session::{Session, SESSION_COOKIE};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthSession;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login outcome. On failure `error` carries the identity service's own
/// message, unchanged.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<Session>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

fn session_cookie(token: &str, max_age_secs: i64) -> String {
    format!("{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age_secs}")
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/login
///
/// Check the credentials with the identity service and open a session.
/// The token is returned in the body and set as the session cookie.
pub async fn login(State(state): State<AppState>, Json(input): Json<LoginRequest>) -> Response {
    match state
        .identity
        .sign_in(input.email.trim(), &input.password)
        .await
    {
        Ok(user) => {
            let (token, session) = state.sessions.open(user).await;
            tracing::info!(uid = %session.uid, "Admin signed in");

            let cookie = session_cookie(&token, state.config.session_ttl_hours * 3600);
            let body = LoginResponse {
                success: true,
                token: Some(token),
                user: Some(session),
                error: None,
            };
            ([(SET_COOKIE, cookie)], Json(body)).into_response()
        }
        Err(e) => {
            tracing::warn!(email = %input.email, error = %e, "Sign-in refused");
            let body = LoginResponse {
                success: false,
                token: None,
                user: None,
                error: Some(e.to_string()),
            };
            (StatusCode::UNAUTHORIZED, Json(body)).into_response()
        }
    }
}

/// POST /api/v1/auth/logout
///
/// End the session, wake its watchers and send the browser to the entry page.
pub async fn logout(State(state): State<AppState>, auth: AuthSession) -> Response {
    state.sessions.close(&auth.token).await;
    tracing::info!(uid = %auth.session.uid, "Admin signed out");

    (
        [(SET_COOKIE, session_cookie("", 0))],
        Redirect::to(&state.config.entry_page),
    )
        .into_response()
}

/// GET /api/v1/auth/watch
///
/// Server-sent events for the life of the session: `session` events while
/// it is active, then one `redirect` event naming the entry page once it
/// ends (logout, expiry), after which the stream closes.
pub async fn watch(
    State(state): State<AppState>,
    auth: AuthSession,
) -> AppResult<Sse<impl Stream<Item = Result<Event, Infallible>>>> {
    let rx = state
        .sessions
        .subscribe(&auth.token)
        .await
        .ok_or_else(|| AppError::unauthorized("Invalid or expired session"))?;
    let entry_page = state.config.entry_page.clone();

    let live = WatchStream::new(rx)
        .take_while(|active| futures::future::ready(*active))
        .map(|_| Ok(Event::default().event("session").data(r#"{"active":true}"#)));
    let ended = stream::once(async move { Ok(Event::default().event("redirect").data(entry_page)) });

    Ok(Sse::new(live.chain(ended)).keep_alive(KeepAlive::default()))
}
