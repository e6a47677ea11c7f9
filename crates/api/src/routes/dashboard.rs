//! Route definitions for the dashboard.

use axum::routing::get;
use axum::Router;

use crate::handlers::dashboard;
use crate::state::AppState;

/// Routes mounted at `/dashboard`.
///
/// ```text
/// GET /             -> overview (every section)
/// GET /stats        -> stats
/// GET /projects     -> active_projects
/// GET /milestones   -> milestones
/// GET /activity     -> activity
/// GET /alerts       -> alerts
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(dashboard::overview))
        .route("/stats", get(dashboard::stats))
        .route("/projects", get(dashboard::active_projects))
        .route("/milestones", get(dashboard::milestones))
        .route("/activity", get(dashboard::activity))
        .route("/alerts", get(dashboard::alerts))
}
