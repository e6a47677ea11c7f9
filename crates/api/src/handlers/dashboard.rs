//! Handlers for the dashboard.
//!
//! The full view runs every section concurrently. A section that fails is
//! reported in place (`{"error": ...}`) while the others still render.

use axum::extract::State;
use axum::Json;
use chrono::NaiveDate;
use qtrace_core::format::format_today_label;
use qtrace_db::repositories::dashboard_repo::{
    ActiveProjectRow, ActivityItem, AlertSummary, DashboardStats, MilestoneFeedRow,
};
use qtrace_db::repositories::DashboardRepo;
use qtrace_db::store::StoreError;
use serde::Serialize;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// One dashboard widget: its data, or the error that kept it from loading.
#[derive(Debug, Serialize)]
pub struct Section<T: Serialize> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: Serialize> Section<T> {
    fn from_result(section: &'static str, result: Result<T, StoreError>) -> Self {
        match result {
            Ok(data) => Section {
                data: Some(data),
                error: None,
            },
            Err(e) => {
                tracing::error!(section, error = %e, "Dashboard section failed");
                Section {
                    data: None,
                    error: Some(e.to_string()),
                }
            }
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DashboardView {
    /// e.g. "Saturday, Oct 17, 2026".
    pub today: String,
    pub stats: DashboardStats,
    pub projects: Section<Vec<ActiveProjectRow>>,
    pub milestones: Section<Vec<MilestoneFeedRow>>,
    pub activity: Section<Vec<ActivityItem>>,
    pub alerts: Section<AlertSummary>,
}

/// The local calendar day alerts are measured from.
fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/dashboard
pub async fn overview(State(state): State<AppState>) -> Json<DataResponse<DashboardView>> {
    let store = state.store.as_ref();
    let today = today();

    let (stats, projects, milestones, activity, alerts) = futures::join!(
        DashboardRepo::stats(store),
        DashboardRepo::active_projects(store),
        DashboardRepo::milestones(store),
        DashboardRepo::activity(store),
        DashboardRepo::alerts(store, today),
    );

    Json(DataResponse {
        data: DashboardView {
            today: format_today_label(today),
            stats,
            projects: Section::from_result("projects", projects),
            milestones: Section::from_result("milestones", milestones),
            activity: Section::from_result("activity", activity),
            alerts: Section::from_result("alerts", alerts),
        },
    })
}

/// GET /api/v1/dashboard/stats
pub async fn stats(State(state): State<AppState>) -> Json<DataResponse<DashboardStats>> {
    Json(DataResponse {
        data: DashboardRepo::stats(state.store.as_ref()).await,
    })
}

/// GET /api/v1/dashboard/projects
pub async fn active_projects(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<ActiveProjectRow>>>> {
    let rows = DashboardRepo::active_projects(state.store.as_ref()).await?;
    Ok(Json(DataResponse { data: rows }))
}

/// GET /api/v1/dashboard/milestones
pub async fn milestones(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<MilestoneFeedRow>>>> {
    let rows = DashboardRepo::milestones(state.store.as_ref()).await?;
    Ok(Json(DataResponse { data: rows }))
}

/// GET /api/v1/dashboard/activity
pub async fn activity(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<ActivityItem>>>> {
    let items = DashboardRepo::activity(state.store.as_ref()).await?;
    Ok(Json(DataResponse { data: items }))
}

/// GET /api/v1/dashboard/alerts
pub async fn alerts(State(state): State<AppState>) -> AppResult<Json<DataResponse<AlertSummary>>> {
    let summary = DashboardRepo::alerts(state.store.as_ref(), today()).await?;
    Ok(Json(DataResponse { data: summary }))
}
