//! Project status, milestone types and the derived launch article.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Category preselected on the edit form when a document has none.
pub const DEFAULT_CATEGORY: &str = "Infrastructure";

/// `article_type` of the article written alongside every new project.
pub const ARTICLE_TYPE_PROJECT_LAUNCH: &str = "Project Launch";

pub const UNTITLED_PROJECT: &str = "Untitled Project";

/// Display label for an absent barangay or contractor.
pub const NOT_AVAILABLE: &str = "N/A";

/// Contractor cell of a project whose contractor no longer exists.
pub const UNKNOWN_CONTRACTOR: &str = "Unknown Contractor";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ProjectStatus {
    #[default]
    Ongoing,
    Delayed,
    Finished,
}

impl ProjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Ongoing => "Ongoing",
            ProjectStatus::Delayed => "Delayed",
            ProjectStatus::Finished => "Finished",
        }
    }

    /// Parse a submitted status. Matching is exact: `"delayed"` is rejected.
    pub fn parse(value: &str) -> Result<Self, CoreError> {
        match value {
            "Ongoing" => Ok(ProjectStatus::Ongoing),
            "Delayed" => Ok(ProjectStatus::Delayed),
            "Finished" => Ok(ProjectStatus::Finished),
            other => Err(CoreError::Validation(format!(
                "Unknown project status '{other}'. Expected Ongoing, Delayed or Finished"
            ))),
        }
    }
}

/// Returns `true` for a stored status that reads as delayed, ignoring case.
pub fn is_delayed(status: &str) -> bool {
    status.eq_ignore_ascii_case(ProjectStatus::Delayed.as_str())
}

/// Colour hint attached to a rendered status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusTone {
    Primary,
    Success,
    Danger,
}

/// Registry tone: finished projects are highlighted, everything else is neutral.
pub fn registry_tone(status: &str) -> StatusTone {
    if status == ProjectStatus::Finished.as_str() {
        StatusTone::Success
    } else {
        StatusTone::Primary
    }
}

/// Dashboard tone: delayed projects stand out.
pub fn dashboard_tone(status: &str) -> StatusTone {
    if status == ProjectStatus::Delayed.as_str() {
        StatusTone::Danger
    } else {
        StatusTone::Primary
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum MilestoneType {
    #[default]
    #[serde(rename = "Pre-Construction")]
    PreConstruction,
    #[serde(rename = "Actual Work")]
    ActualWork,
    Finished,
}

impl MilestoneType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MilestoneType::PreConstruction => "Pre-Construction",
            MilestoneType::ActualWork => "Actual Work",
            MilestoneType::Finished => "Finished",
        }
    }

    /// Parse the display name submitted by a milestone row.
    pub fn parse(value: &str) -> Result<Self, CoreError> {
        match value {
            "Pre-Construction" => Ok(MilestoneType::PreConstruction),
            "Actual Work" => Ok(MilestoneType::ActualWork),
            "Finished" => Ok(MilestoneType::Finished),
            other => Err(CoreError::Validation(format!("Unknown milestone type '{other}'"))),
        }
    }
}

/// Body of the launch article: `PROJECT LAUNCH: {title}.\n\nScope: {description}`.
pub fn launch_article_description(title: &str, description: &str) -> String {
    format!("PROJECT LAUNCH: {title}.\n\nScope: {description}")
}
