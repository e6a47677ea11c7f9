//! Route definitions for the `/geocode` resource.

use axum::routing::post;
use axum::Router;

use crate::handlers::geocode;
use crate::state::AppState;

/// Routes mounted at `/geocode`.
///
/// ```text
/// POST /pin   -> pin
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/pin", post(geocode::pin))
}
