//! Article statuses and the labels used when rendering article rows.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Type preselected on the edit form when a document has none.
pub const DEFAULT_ARTICLE_TYPE: &str = "News";

/// Project cell of an article that is not tied to a project.
pub const GENERAL_NEWS_LABEL: &str = "General";

/// Project cell of an article whose project no longer exists.
pub const DELETED_PROJECT_LABEL: &str = "Deleted Project";

/// Number of description characters shown in the registry.
pub const EXCERPT_CHARS: usize = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ArticleStatus {
    #[default]
    Draft,
    Published,
}

impl ArticleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArticleStatus::Draft => "Draft",
            ArticleStatus::Published => "Published",
        }
    }

    pub fn parse(value: &str) -> Result<Self, CoreError> {
        match value {
            "Draft" => Ok(ArticleStatus::Draft),
            "Published" => Ok(ArticleStatus::Published),
            other => Err(CoreError::Validation(format!(
                "Unknown article status '{other}'. Expected Draft or Published"
            ))),
        }
    }
}

/// Older articles have no title; they are listed under their type.
pub fn display_title(title: Option<&str>, article_type: &str) -> String {
    match title {
        Some(t) if !t.is_empty() => t.to_string(),
        _ => article_type.to_string(),
    }
}

/// First [`EXCERPT_CHARS`] characters of a description followed by `...`.
pub fn excerpt(description: &str) -> String {
    let head: String = description.chars().take(EXCERPT_CHARS).collect();
    format!("{head}...")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_falls_back_to_type() {
        assert_eq!(display_title(Some("Bridge opens"), "News"), "Bridge opens");
        assert_eq!(display_title(Some(""), "Advisory"), "Advisory");
        assert_eq!(display_title(None, "Project Launch"), "Project Launch");
    }

    #[test]
    fn excerpt_is_char_based() {
        let long = "\u{00F1}".repeat(60);
        let ex = excerpt(&long);
        assert_eq!(ex.chars().count(), EXCERPT_CHARS + 3);
        assert_eq!(excerpt("short"), "short...");
    }

    #[test]
    fn status_parse() {
        assert_eq!(ArticleStatus::parse("Published").unwrap(), ArticleStatus::Published);
        assert!(ArticleStatus::parse("published").is_err());
    }
}
