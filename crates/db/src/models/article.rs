//! Article documents (`articles` collection).
//!
//! Articles keep the snake_case `article_*` field names the mobile app reads.

use qtrace_core::article::ArticleStatus;
use qtrace_core::format::DateValue;
use qtrace_core::types::DocId;
use serde::{Deserialize, Serialize};

use super::lenient_string;

/// A stored article. An empty `project_id` marks general news.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Article {
    #[serde(deserialize_with = "lenient_string")]
    pub project_id: String,
    #[serde(deserialize_with = "lenient_string")]
    pub user_id: String,
    /// Absent on articles written before titles existed.
    pub article_title: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub article_type: String,
    #[serde(deserialize_with = "lenient_string")]
    pub article_description: String,
    #[serde(deserialize_with = "lenient_string")]
    pub article_photo_url: String,
    #[serde(deserialize_with = "lenient_string")]
    pub article_status: String,
    pub article_created_at: Option<DateValue>,
    pub article_updated_at: Option<DateValue>,
}

impl Article {
    /// The referenced project id, if the article is tied to one.
    pub fn project_ref(&self) -> Option<&str> {
        let id = self.project_id.trim();
        (!id.is_empty()).then_some(id)
    }
}

/// DTO for writing a new article document.
#[derive(Debug, Clone, Serialize)]
pub struct CreateArticle {
    pub project_id: String,
    pub user_id: DocId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub article_title: Option<String>,
    pub article_type: String,
    pub article_description: String,
    pub article_photo_url: String,
    pub article_status: ArticleStatus,
    pub article_created_at: DateValue,
    pub article_updated_at: DateValue,
}

/// Patch for an existing article. Callers refresh `article_updated_at`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateArticle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub article_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub article_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub article_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub article_photo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub article_status: Option<ArticleStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub article_updated_at: Option<DateValue>,
}
