//! Route definitions for the `/auth` resource.
//!
//! Login is public; logout and the session watch sit behind the page guard,
//! so the two halves are mounted separately.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// Public routes.
///
/// ```text
/// POST /auth/login   -> login
/// ```
pub fn public_router() -> Router<AppState> {
    Router::new().route("/auth/login", post(auth::login))
}

/// Routes that need a live session.
///
/// ```text
/// POST /auth/logout  -> logout
/// GET  /auth/watch   -> watch (server-sent events)
/// ```
pub fn session_router() -> Router<AppState> {
    Router::new()
        .route("/auth/logout", post(auth::logout))
        .route("/auth/watch", get(auth::watch))
}
