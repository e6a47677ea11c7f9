//! Route definitions for the `/contractors` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::contractor;
use crate::state::AppState;

/// Routes mounted at `/contractors`.
///
/// ```text
/// GET    /            -> list
/// POST   /            -> create (multipart)
/// GET    /options     -> options
/// GET    /{id}        -> get_by_id
/// PUT    /{id}        -> update (multipart)
/// DELETE /{id}        -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(contractor::list).post(contractor::create))
        .route("/options", get(contractor::options))
        .route(
            "/{id}",
            get(contractor::get_by_id)
                .put(contractor::update)
                .delete(contractor::delete),
        )
}
