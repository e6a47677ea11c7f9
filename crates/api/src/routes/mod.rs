pub mod article;
pub mod auth;
pub mod contractor;
pub mod dashboard;
pub mod geocode;
pub mod health;
pub mod project;
pub mod user;

use axum::extract::DefaultBodyLimit;
use axum::middleware::from_fn_with_state;
use axum::Router;

use crate::middleware::page_guard::page_guard;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                                   login (public)
/// /auth/logout                                  logout
/// /auth/watch                                   session events (SSE)
///
/// /projects                                     list (?status=), create (multipart)
/// /projects/options                             dropdown for the article form
/// /projects/draft                               blank registration form
/// /projects/{id}                                get, update, delete
///
/// /contractors                                  list, create (multipart)
/// /contractors/options                          dropdown for the project form
/// /contractors/{id}                             get, update (multipart), delete
///
/// /articles                                     list (?status=), create (multipart)
/// /articles/{id}                                get, update (multipart), delete
///
/// /users                                        list, create
/// /users/{id}                                   get, update, delete
///
/// /dashboard                                    every section
/// /dashboard/{stats,projects,milestones,activity,alerts}
///
/// /geocode/pin                                  map click (POST)
/// ```
///
/// Everything except login is behind the page guard.
pub fn api_routes(state: &AppState) -> Router<AppState> {
    let guarded = Router::new()
        .merge(auth::session_router())
        .nest("/projects", project::router())
        .nest("/contractors", contractor::router())
        .nest("/articles", article::router())
        .nest("/users", user::router())
        .nest("/dashboard", dashboard::router())
        .nest("/geocode", geocode::router())
        .route_layer(from_fn_with_state(state.clone(), page_guard));

    Router::new()
        .merge(auth::public_router())
        .merge(guarded)
        .layer(DefaultBodyLimit::max(state.config.max_upload_bytes))
}
