//! Handlers for the `/projects` resource.

use std::sync::Arc;

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use qtrace_core::address::{GeoPoint, ResolvedAddress, DEFAULT_CITY};
use qtrace_core::error::CoreError;
use qtrace_core::forms::ProjectDraft;
use qtrace_core::project::{MilestoneType, ProjectStatus};
use qtrace_core::validation::parse_form_date;
use qtrace_db::models::project::Project;
use qtrace_db::repositories::{Entity, ProjectRepo, Record, SelectOption};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthSession;
use crate::multipart::{row_field, FormData};
use crate::registry::options::project_options;
use crate::registry::rows::{project_rows, ProjectRow};
use crate::response::DataResponse;
use crate::state::AppState;
use crate::workflows::project::{
    edit_project, register_project, MilestoneUpload, NewProject, ProjectCreated, ProjectEdit,
};

/// Multipart group of the repeatable milestone rows:
/// `milestones[0][type]`, `milestones[0][image]`, ...
pub const MILESTONE_GROUP: &str = "milestones";

/// `?status=` filter shared by the project and article listings.
#[derive(Debug, Default, Deserialize)]
pub struct StatusFilter {
    pub status: Option<String>,
}

impl StatusFilter {
    pub fn get(&self) -> Option<&str> {
        self.status.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }
}

/// GET /api/v1/projects
pub async fn list(
    State(state): State<AppState>,
    Query(filter): Query<StatusFilter>,
) -> AppResult<Json<DataResponse<Vec<ProjectRow>>>> {
    let records = ProjectRepo::list(state.store.as_ref()).await?;
    let rows = project_rows(Arc::clone(&state.store), records, filter.get()).await;
    Ok(Json(DataResponse { data: rows }))
}

/// GET /api/v1/projects/options
///
/// Project choices for the article form.
pub async fn options(State(state): State<AppState>) -> AppResult<Json<DataResponse<Vec<SelectOption>>>> {
    let options = project_options(state.store.as_ref()).await?;
    Ok(Json(DataResponse { data: options }))
}

/// GET /api/v1/projects/draft
///
/// A blank registration form centred on the city.
pub async fn draft() -> Json<DataResponse<ProjectDraft>> {
    Json(DataResponse {
        data: ProjectDraft::default(),
    })
}

/// POST /api/v1/projects (multipart)
pub async fn create(
    State(state): State<AppState>,
    auth: AuthSession,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<DataResponse<ProjectCreated>>)> {
    let _ticket = state.submissions.begin(&auth.key(), "projects/create")?;

    let form = FormData::read(multipart).await?;
    let project = read_new_project(form)?;
    let created = register_project(
        state.store.as_ref(),
        state.image_host.as_ref(),
        &state.config.default_author_id,
        project,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

/// GET /api/v1/projects/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<DataResponse<Record<Project>>>> {
    let project = ProjectRepo::find_by_id(state.store.as_ref(), &id)
        .await?
        .ok_or_else(|| AppError::not_found(Project::NAME, &id))?;
    Ok(Json(DataResponse { data: project }))
}

/// PUT /api/v1/projects/{id}
pub async fn update(
    State(state): State<AppState>,
    auth: AuthSession,
    Path(id): Path<String>,
    Json(edit): Json<ProjectEdit>,
) -> AppResult<StatusCode> {
    let _ticket = state.submissions.begin(&auth.key(), format!("projects/{id}"))?;
    edit_project(state.store.as_ref(), &id, edit).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/projects/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> AppResult<StatusCode> {
    if ProjectRepo::delete(state.store.as_ref(), &id).await? {
        tracing::info!(project_id = %id, "Project deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found(Project::NAME, &id))
    }
}

fn read_new_project(mut form: FormData) -> Result<NewProject, CoreError> {
    let location = match (form.number("lat")?, form.number("lng")?) {
        (Some(lat), Some(lng)) => Some(GeoPoint::new(lat, lng)?),
        _ => None,
    };
    let status = match form.text("status").as_str() {
        "" => ProjectStatus::default(),
        status => ProjectStatus::parse(status)?,
    };
    let city = form.text("city");
    let address = ResolvedAddress {
        street: form.text("street"),
        barangay: form.text("barangay"),
        zip_code: form.text("zipCode"),
        city: if city.is_empty() { DEFAULT_CITY.to_string() } else { city },
    };

    let mut milestones = Vec::new();
    for index in form.row_indexes(MILESTONE_GROUP) {
        let milestone_type = match form.text(&row_field(MILESTONE_GROUP, index, "type")).as_str() {
            "" => MilestoneType::default(),
            kind => MilestoneType::parse(kind)?,
        };
        let image = form.take_file(&row_field(MILESTONE_GROUP, index, "image"));
        milestones.push(MilestoneUpload {
            milestone_type,
            image,
        });
    }

    Ok(NewProject {
        title: form.text("title"),
        category: form.text("category"),
        contractor_id: form.text("contractorId"),
        budget: form.number("budget")?.unwrap_or_default(),
        status,
        description: form.text("description"),
        location,
        address,
        started: form_date(&form, "startDate")?,
        end: form_date(&form, "endDate")?,
        milestones,
    })
}

fn form_date(form: &FormData, field: &str) -> Result<Option<chrono::NaiveDate>, CoreError> {
    match form.text(field).as_str() {
        "" => Ok(None),
        text => parse_form_date(field, text).map(Some),
    }
}
