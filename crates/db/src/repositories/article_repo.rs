//! Article registry.

use qtrace_core::article::display_title;
use qtrace_core::error::CoreError;
use qtrace_core::validation::require_non_empty;
use serde_json::Value;

use crate::collections::ARTICLES;
use crate::models::article::{Article, CreateArticle, UpdateArticle};
use crate::repositories::registry::{Entity, Input, Record, Registry};
use crate::store::{DocumentStore, StoreError};

/// Field articles are ordered by on the dashboard.
pub const ARTICLE_CREATED_AT_FIELD: &str = "article_created_at";

/// Field the registry's status filter matches on.
pub const ARTICLE_STATUS_FIELD: &str = "article_status";

pub type ArticleRepo = Registry<Article>;

impl ArticleRepo {
    /// Articles whose stored status is exactly `status`; every article when
    /// there is no filter.
    pub async fn list_by_status(
        store: &dyn DocumentStore,
        status: Option<&str>,
    ) -> Result<Vec<Record<Article>>, StoreError> {
        match status {
            Some(status) => {
                Self::list_where(store, ARTICLE_STATUS_FIELD, &Value::from(status)).await
            }
            None => Self::list(store).await,
        }
    }
}

impl Entity for Article {
    const COLLECTION: &'static str = ARTICLES;
    const NAME: &'static str = "Article";

    type Create = CreateArticle;
    type Patch = UpdateArticle;

    fn label(&self) -> String {
        display_title(self.article_title.as_deref(), &self.article_type)
    }
}

impl Input for CreateArticle {
    fn validate(&self) -> Result<(), CoreError> {
        require_non_empty("article_type", &self.article_type)
    }
}

impl Input for UpdateArticle {
    fn validate(&self) -> Result<(), CoreError> {
        if let Some(article_type) = &self.article_type {
            require_non_empty("article_type", article_type)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use qtrace_core::article::ArticleStatus;
    use qtrace_core::format::DateValue;

    use super::*;
    use crate::repositories::registry::Validated;
    use crate::store::MemoryStore;

    fn new_article(status: ArticleStatus) -> CreateArticle {
        CreateArticle {
            project_id: String::new(),
            user_id: "admin".into(),
            article_title: Some("Road closure".into()),
            article_type: "Advisory".into(),
            article_description: "Closed until Friday".into(),
            article_photo_url: String::new(),
            article_status: status,
            article_created_at: DateValue::now(),
            article_updated_at: DateValue::now(),
        }
    }

    #[tokio::test]
    async fn status_filter_uses_stored_text() {
        let store = MemoryStore::new();
        for status in [ArticleStatus::Draft, ArticleStatus::Published, ArticleStatus::Draft] {
            let input = Validated::new(new_article(status)).unwrap();
            ArticleRepo::create(&store, &input).await.unwrap();
        }

        let drafts = ArticleRepo::list_by_status(&store, Some("Draft")).await.unwrap();
        assert_eq!(drafts.len(), 2);
        assert!(drafts.iter().all(|r| r.entity.article_status == "Draft"));

        let published = ArticleRepo::list_by_status(&store, Some("Published")).await.unwrap();
        assert_eq!(published.len(), 1);
        assert!(ArticleRepo::list_by_status(&store, Some("draft")).await.unwrap().is_empty());
        assert_eq!(ArticleRepo::list_by_status(&store, None).await.unwrap().len(), 3);
    }

    #[test]
    fn label_falls_back_to_type() {
        let article = Article {
            article_type: "News".into(),
            ..Default::default()
        };
        assert_eq!(article.label(), "News");
    }
}
