//! Handlers for the `/users` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use qtrace_db::models::user::{CreateUser, UpdateUser, User};
use qtrace_db::repositories::{Entity, Record, UserRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthSession;
use crate::registry::rows::UserRow;
use crate::response::DataResponse;
use crate::state::AppState;
use crate::workflows::user::{edit_user, register_user, UserCreated};

/// GET /api/v1/users
pub async fn list(State(state): State<AppState>) -> AppResult<Json<DataResponse<Vec<UserRow>>>> {
    let rows = UserRepo::list(state.store.as_ref())
        .await?
        .into_iter()
        .map(UserRow::from)
        .collect();
    Ok(Json(DataResponse { data: rows }))
}

/// POST /api/v1/users
///
/// The qcId is allocated by the server.
pub async fn create(
    State(state): State<AppState>,
    auth: AuthSession,
    Json(input): Json<CreateUser>,
) -> AppResult<(StatusCode, Json<DataResponse<UserCreated>>)> {
    let _ticket = state.submissions.begin(&auth.key(), "users/create")?;
    let created = register_user(state.store.as_ref(), input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

/// GET /api/v1/users/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<DataResponse<Record<User>>>> {
    let user = UserRepo::find_by_id(state.store.as_ref(), &id)
        .await?
        .ok_or_else(|| AppError::not_found(User::NAME, &id))?;
    Ok(Json(DataResponse { data: user }))
}

/// PUT /api/v1/users/{id}
pub async fn update(
    State(state): State<AppState>,
    auth: AuthSession,
    Path(id): Path<String>,
    Json(patch): Json<UpdateUser>,
) -> AppResult<StatusCode> {
    let _ticket = state.submissions.begin(&auth.key(), format!("users/{id}"))?;
    edit_user(state.store.as_ref(), &id, patch).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/users/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> AppResult<StatusCode> {
    if UserRepo::delete(state.store.as_ref(), &id).await? {
        tracing::info!(user_id = %id, "User deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found(User::NAME, &id))
    }
}
