//! Handlers for the `/contractors` resource.

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;
use qtrace_db::models::contractor::Contractor;
use qtrace_db::repositories::{ContractorRepo, Entity, Record, SelectOption};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthSession;
use crate::multipart::FormData;
use crate::registry::options::contractor_options;
use crate::registry::rows::ContractorRow;
use crate::response::{Created, DataResponse};
use crate::state::AppState;
use crate::workflows::contractor::{edit_contractor, register_contractor, ContractorEdit, NewContractor};

/// GET /api/v1/contractors
pub async fn list(State(state): State<AppState>) -> AppResult<Json<DataResponse<Vec<ContractorRow>>>> {
    let rows = ContractorRepo::list(state.store.as_ref())
        .await?
        .into_iter()
        .map(ContractorRow::from)
        .collect();
    Ok(Json(DataResponse { data: rows }))
}

/// GET /api/v1/contractors/options
///
/// Contractor choices for the project form.
pub async fn options(State(state): State<AppState>) -> AppResult<Json<DataResponse<Vec<SelectOption>>>> {
    let options = contractor_options(state.store.as_ref()).await?;
    Ok(Json(DataResponse { data: options }))
}

/// POST /api/v1/contractors (multipart)
pub async fn create(
    State(state): State<AppState>,
    auth: AuthSession,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<DataResponse<Created>>)> {
    let _ticket = state.submissions.begin(&auth.key(), "contractors/create")?;

    let mut form = FormData::read(multipart).await?;
    let contractor = NewContractor {
        name: form.text("name"),
        contact_person: form.text("contactPerson"),
        email: form.text("email"),
        phone: form.text("phone"),
        experience: form.text("experience"),
        address: form.text("address"),
        expertise: form.text("expertise"),
        logo: form.take_file("logo"),
    };
    let id = register_contractor(state.store.as_ref(), state.image_host.as_ref(), contractor).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: Created { id } })))
}

/// GET /api/v1/contractors/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<DataResponse<Record<Contractor>>>> {
    let contractor = ContractorRepo::find_by_id(state.store.as_ref(), &id)
        .await?
        .ok_or_else(|| AppError::not_found(Contractor::NAME, &id))?;
    Ok(Json(DataResponse { data: contractor }))
}

/// PUT /api/v1/contractors/{id} (multipart)
///
/// Fields left out of the form keep their stored values.
pub async fn update(
    State(state): State<AppState>,
    auth: AuthSession,
    Path(id): Path<String>,
    multipart: Multipart,
) -> AppResult<StatusCode> {
    let _ticket = state.submissions.begin(&auth.key(), format!("contractors/{id}"))?;

    let mut form = FormData::read(multipart).await?;
    let edit = ContractorEdit {
        name: form.opt_text("name"),
        contact_person: form.opt_text("contactPerson"),
        email: form.opt_text("email"),
        phone: form.opt_text("phone"),
        experience: form.opt_text("experience"),
        address: form.opt_text("address"),
        expertise: form.opt_text("expertise"),
        logo: form.take_file("logo"),
    };
    edit_contractor(state.store.as_ref(), state.image_host.as_ref(), &id, edit).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/contractors/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> AppResult<StatusCode> {
    if ContractorRepo::delete(state.store.as_ref(), &id).await? {
        tracing::info!(contractor_id = %id, "Contractor deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found(Contractor::NAME, &id))
    }
}
