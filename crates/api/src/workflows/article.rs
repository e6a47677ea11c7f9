//! Article publishing and editing.

use qtrace_cloud::image_host::{ImageHost, ImageUpload};
use qtrace_core::article::{ArticleStatus, DEFAULT_ARTICLE_TYPE};
use qtrace_core::format::DateValue;
use qtrace_core::forms::PhotoChoice;
use qtrace_core::types::DocId;
use qtrace_db::models::article::{Article, CreateArticle, UpdateArticle};
use qtrace_db::repositories::{ArticleRepo, Entity, Validated};
use qtrace_db::store::DocumentStore;

use crate::error::{AppError, AppResult};
use crate::workflows::uploads::{resolve_photo, UploadPolicy};

/// A submitted article form. An empty `project_id` makes it general news.
#[derive(Debug, Clone, Default)]
pub struct NewArticle {
    pub project_id: String,
    pub title: String,
    pub article_type: String,
    pub description: String,
    pub status: ArticleStatus,
    pub photo_file: Option<ImageUpload>,
    pub photo_url: String,
}

#[derive(Debug, Clone, Default)]
pub struct ArticleEdit {
    pub project_id: Option<String>,
    pub title: Option<String>,
    pub article_type: Option<String>,
    pub description: Option<String>,
    pub status: Option<ArticleStatus>,
    pub photo_file: Option<ImageUpload>,
    pub photo_url: String,
}

/// Publish an article authored by `author_id`.
///
/// A chosen file is uploaded and wins over a typed URL. Upload failures
/// abort the submission.
pub async fn publish_article(
    store: &dyn DocumentStore,
    host: &dyn ImageHost,
    author_id: &str,
    form: NewArticle,
) -> AppResult<DocId> {
    let article_type = if form.article_type.trim().is_empty() {
        DEFAULT_ARTICLE_TYPE.to_string()
    } else {
        form.article_type
    };
    let now = DateValue::now();
    let mut input = CreateArticle {
        project_id: form.project_id.trim().to_string(),
        user_id: author_id.to_string(),
        article_title: Some(form.title),
        article_type,
        article_description: form.description,
        article_photo_url: String::new(),
        article_status: form.status,
        article_created_at: now.clone(),
        article_updated_at: now,
    };
    Validated::new(input.clone())?;

    let choice = PhotoChoice::choose(form.photo_file, &form.photo_url, "");
    input.article_photo_url = resolve_photo(host, choice, UploadPolicy::Strict).await?;

    let id = ArticleRepo::create(store, &Validated::new(input)?).await?;
    tracing::info!(article_id = %id, author = %author_id, "Article published");
    Ok(id)
}

/// Apply an edit. With no new file and no typed URL the stored photo stays.
pub async fn edit_article(
    store: &dyn DocumentStore,
    host: &dyn ImageHost,
    id: &str,
    edit: ArticleEdit,
) -> AppResult<()> {
    let stored: Article = ArticleRepo::find_by_id(store, id)
        .await?
        .ok_or_else(|| AppError::not_found(Article::NAME, id))?
        .entity;

    let mut patch = UpdateArticle {
        project_id: edit.project_id.map(|p| p.trim().to_string()),
        article_title: edit.title,
        article_type: edit.article_type,
        article_description: edit.description,
        article_photo_url: None,
        article_status: edit.status,
        article_updated_at: Some(DateValue::now()),
    };
    Validated::new(patch.clone())?;

    let choice = PhotoChoice::choose(edit.photo_file, &edit.photo_url, &stored.article_photo_url);
    patch.article_photo_url = Some(resolve_photo(host, choice, UploadPolicy::Strict).await?);

    if !ArticleRepo::update(store, id, &Validated::new(patch)?).await? {
        return Err(AppError::not_found(Article::NAME, id));
    }
    tracing::info!(article_id = %id, "Article updated");
    Ok(())
}
