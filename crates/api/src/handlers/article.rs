//! Handlers for the `/articles` resource.

use std::sync::Arc;

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use qtrace_core::article::ArticleStatus;
use qtrace_db::models::article::Article;
use qtrace_db::repositories::{ArticleRepo, Entity, Record};

use crate::error::{AppError, AppResult};
use crate::handlers::project::StatusFilter;
use crate::middleware::auth::AuthSession;
use crate::multipart::FormData;
use crate::registry::rows::{article_rows, ArticleRow};
use crate::response::{Created, DataResponse};
use crate::state::AppState;
use crate::workflows::article::{edit_article, publish_article, ArticleEdit, NewArticle};

/// GET /api/v1/articles
pub async fn list(
    State(state): State<AppState>,
    Query(filter): Query<StatusFilter>,
) -> AppResult<Json<DataResponse<Vec<ArticleRow>>>> {
    let records = ArticleRepo::list_by_status(state.store.as_ref(), filter.get()).await?;
    let rows = article_rows(Arc::clone(&state.store), records).await;
    Ok(Json(DataResponse { data: rows }))
}

/// POST /api/v1/articles (multipart)
///
/// The signed-in admin is recorded as the author.
pub async fn create(
    State(state): State<AppState>,
    auth: AuthSession,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<DataResponse<Created>>)> {
    let _ticket = state.submissions.begin(&auth.key(), "articles/create")?;

    let mut form = FormData::read(multipart).await?;
    let status = match form.text("status").as_str() {
        "" => ArticleStatus::default(),
        status => ArticleStatus::parse(status)?,
    };
    let article = NewArticle {
        project_id: form.text("projectId"),
        title: form.text("title"),
        article_type: form.text("type"),
        description: form.text("description"),
        status,
        photo_file: form.take_file("photo"),
        photo_url: form.text("photoUrl"),
    };
    let id = publish_article(
        state.store.as_ref(),
        state.image_host.as_ref(),
        &auth.session.uid,
        article,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: Created { id } })))
}

/// GET /api/v1/articles/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<DataResponse<Record<Article>>>> {
    let article = ArticleRepo::find_by_id(state.store.as_ref(), &id)
        .await?
        .ok_or_else(|| AppError::not_found(Article::NAME, &id))?;
    Ok(Json(DataResponse { data: article }))
}

/// PUT /api/v1/articles/{id} (multipart)
pub async fn update(
    State(state): State<AppState>,
    auth: AuthSession,
    Path(id): Path<String>,
    multipart: Multipart,
) -> AppResult<StatusCode> {
    let _ticket = state.submissions.begin(&auth.key(), format!("articles/{id}"))?;

    let mut form = FormData::read(multipart).await?;
    let status = form
        .opt_text("status")
        .filter(|s| !s.is_empty())
        .map(|s| ArticleStatus::parse(&s))
        .transpose()?;
    let edit = ArticleEdit {
        project_id: form.opt_text("projectId"),
        title: form.opt_text("title"),
        article_type: form.opt_text("type"),
        description: form.opt_text("description"),
        status,
        photo_file: form.take_file("photo"),
        photo_url: form.text("photoUrl"),
    };
    edit_article(state.store.as_ref(), state.image_host.as_ref(), &id, edit).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/articles/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> AppResult<StatusCode> {
    if ArticleRepo::delete(state.store.as_ref(), &id).await? {
        tracing::info!(article_id = %id, "Article deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found(Article::NAME, &id))
    }
}
