//! Read-only queries behind the dashboard widgets.
//!
//! Each section is an independent query. A failure in one section is that
//! section's error only; the caller decides how to show it while the other
//! sections still render.

use std::collections::HashMap;

use chrono::NaiveDate;
use futures::future::join_all;
use qtrace_core::alerts::AlertCounts;
use qtrace_core::format::{format_date, format_peso, DateValue};
use qtrace_core::project::{
    dashboard_tone, ProjectStatus, StatusTone, NOT_AVAILABLE, UNKNOWN_CONTRACTOR, UNTITLED_PROJECT,
};
use qtrace_core::types::DocId;
use serde::Serialize;

use crate::collections::{ARTICLES, CONTRACTORS, PROJECTS, USERS};
use crate::models::project::Project;
use crate::repositories::article_repo::{ArticleRepo, ARTICLE_CREATED_AT_FIELD};
use crate::repositories::contractor_repo::ContractorRepo;
use crate::repositories::project_repo::{ProjectRepo, CREATED_AT_FIELD};
use crate::repositories::user_repo::UserRepo;
use crate::store::{DocumentStore, StoreError};

/// Newest projects considered for the active-projects table.
pub const ACTIVE_PROJECTS_LIMIT: usize = 6;
/// Newest projects whose milestones feed the milestone table.
pub const MILESTONE_SOURCE_LIMIT: usize = 15;
/// Maximum rows in the milestone table, across all projects.
pub const MILESTONE_ROWS_CAP: usize = 8;
/// Newest articles shown in the activity feed.
pub const ACTIVITY_LIMIT: usize = 6;

const MILESTONE_PROJECT_FALLBACK: &str = "Untitled";
const PLANNED_STATUS: &str = "Planned";
const NO_MILESTONE_TYPE: &str = "\u{2014}";
const DEFAULT_MILESTONE_TYPE: &str = "Milestone";
const DEFAULT_MILESTONE_STATUS: &str = "In Progress";
const DEFAULT_ACTIVITY_TEXT: &str = "Article";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub projects: u64,
    pub articles: u64,
    pub contractors: u64,
    pub users: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActiveProjectRow {
    pub id: DocId,
    pub title: String,
    pub status: String,
    pub tone: StatusTone,
    pub contractor: String,
    pub barangay: String,
    pub budget: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MilestoneFeedRow {
    pub project: String,
    #[serde(rename = "type")]
    pub milestone_type: String,
    pub date: String,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityItem {
    pub text: String,
    pub when: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlertSummary {
    pub delayed: usize,
    pub due_soon: usize,
    pub messages: Vec<String>,
}

/// Provides the dashboard's aggregate queries.
pub struct DashboardRepo;

impl DashboardRepo {
    /// Collection sizes, counted concurrently. A failed count reads as 0.
    pub async fn stats(store: &dyn DocumentStore) -> DashboardStats {
        let (projects, articles, contractors, users) = futures::join!(
            ProjectRepo::count(store),
            ArticleRepo::count(store),
            ContractorRepo::count(store),
            UserRepo::count(store),
        );
        DashboardStats {
            projects: count_or_zero(PROJECTS, projects),
            articles: count_or_zero(ARTICLES, articles),
            contractors: count_or_zero(CONTRACTORS, contractors),
            users: count_or_zero(USERS, users),
        }
    }

    /// The newest projects that are not finished.
    pub async fn active_projects(
        store: &dyn DocumentStore,
    ) -> Result<Vec<ActiveProjectRow>, StoreError> {
        let projects = ProjectRepo::latest(store, CREATED_AT_FIELD, ACTIVE_PROJECTS_LIMIT).await?;
        let active: Vec<_> = projects
            .into_iter()
            .filter(|p| p.entity.display_status() != ProjectStatus::Finished.as_str())
            .collect();

        let names = contractor_names(store, active.iter().map(|p| &p.entity)).await;

        Ok(active
            .into_iter()
            .map(|record| {
                let p = record.entity;
                let status = p.display_status().to_string();
                ActiveProjectRow {
                    id: record.id,
                    title: non_empty_or(&p.title, UNTITLED_PROJECT),
                    tone: dashboard_tone(&status),
                    status,
                    contractor: contractor_label(&p, &names),
                    barangay: non_empty_or(&p.address.barangay, NOT_AVAILABLE),
                    budget: format_peso(p.budget),
                }
            })
            .collect())
    }

    /// Milestones of the newest projects, flattened and capped.
    pub async fn milestones(
        store: &dyn DocumentStore,
    ) -> Result<Vec<MilestoneFeedRow>, StoreError> {
        let projects = ProjectRepo::latest(store, CREATED_AT_FIELD, MILESTONE_SOURCE_LIMIT).await?;
        let mut rows = Vec::new();
        for record in projects {
            let p = record.entity;
            let project = non_empty_or(&p.title, MILESTONE_PROJECT_FALLBACK);
            if p.milestones.is_empty() {
                rows.push(MilestoneFeedRow {
                    project,
                    milestone_type: NO_MILESTONE_TYPE.to_string(),
                    date: format_date(p.dates.end.as_ref()),
                    status: PLANNED_STATUS.to_string(),
                });
                continue;
            }
            for m in &p.milestones {
                let date = first_date(&[
                    m.date_uploaded.as_ref(),
                    p.dates.end.as_ref(),
                    p.dates.started.as_ref(),
                ]);
                rows.push(MilestoneFeedRow {
                    project: project.clone(),
                    milestone_type: non_empty_or(&m.milestone_type, DEFAULT_MILESTONE_TYPE),
                    date: format_date(date),
                    status: m
                        .status
                        .as_deref()
                        .filter(|s| !s.is_empty())
                        .unwrap_or(DEFAULT_MILESTONE_STATUS)
                        .to_string(),
                });
            }
        }
        rows.truncate(MILESTONE_ROWS_CAP);
        Ok(rows)
    }

    /// The newest articles as activity lines.
    pub async fn activity(store: &dyn DocumentStore) -> Result<Vec<ActivityItem>, StoreError> {
        let articles = ArticleRepo::latest(store, ARTICLE_CREATED_AT_FIELD, ACTIVITY_LIMIT).await?;
        Ok(articles
            .into_iter()
            .map(|record| {
                let a = record.entity;
                let text = [a.article_description.as_str(), a.article_type.as_str()]
                    .into_iter()
                    .find(|s| !s.is_empty())
                    .unwrap_or(DEFAULT_ACTIVITY_TEXT)
                    .to_string();
                ActivityItem {
                    text,
                    when: format_date(a.article_created_at.as_ref()),
                }
            })
            .collect())
    }

    /// Delayed and due-soon counts over every project.
    pub async fn alerts(
        store: &dyn DocumentStore,
        today: NaiveDate,
    ) -> Result<AlertSummary, StoreError> {
        let projects = ProjectRepo::list(store).await?;
        let mut counts = AlertCounts::default();
        for record in &projects {
            let p = &record.entity;
            let end = p.dates.end.as_ref().and_then(DateValue::to_date);
            counts.observe(&p.status, end, today);
        }
        Ok(AlertSummary {
            delayed: counts.delayed,
            due_soon: counts.due_soon,
            messages: counts.messages(),
        })
    }
}

fn count_or_zero(collection: &str, counted: Result<u64, StoreError>) -> u64 {
    match counted {
        Ok(n) => n,
        Err(e) => {
            tracing::warn!(collection, error = %e, "Count failed, reporting 0");
            0
        }
    }
}

/// Look up the names of every contractor referenced by id, concurrently.
/// Lookups that fail and contractors with a blank name are left out.
async fn contractor_names<'a>(
    store: &dyn DocumentStore,
    projects: impl Iterator<Item = &'a Project>,
) -> HashMap<DocId, String> {
    let mut ids: Vec<&DocId> = projects.filter_map(|p| p.contractor_id.as_ref()).collect();
    ids.sort();
    ids.dedup();

    let lookups = ids.into_iter().map(|id| async move {
        match ContractorRepo::find_by_id(store, id).await {
            Ok(found) => found
                .map(|c| c.entity.name)
                .filter(|name| !name.is_empty())
                .map(|name| (id.clone(), name)),
            Err(e) => {
                tracing::warn!(contractor_id = %id, error = %e, "Contractor lookup failed");
                None
            }
        }
    });
    join_all(lookups).await.into_iter().flatten().collect()
}

/// Resolved contractor name, then the legacy name field, then a fallback.
fn contractor_label(project: &Project, names: &HashMap<DocId, String>) -> String {
    let id = project.contractor_id.as_deref().filter(|id| !id.is_empty());
    if let Some(name) = id.and_then(|id| names.get(id)) {
        return name.clone();
    }
    if let Some(name) = project.contractor.as_deref().filter(|n| !n.is_empty()) {
        return name.to_string();
    }
    match id {
        Some(_) => UNKNOWN_CONTRACTOR.to_string(),
        None => NOT_AVAILABLE.to_string(),
    }
}

fn first_date<'a>(candidates: &[Option<&'a DateValue>]) -> Option<&'a DateValue> {
    candidates.iter().flatten().copied().next()
}

fn non_empty_or(value: &str, fallback: &str) -> String {
    if value.is_empty() {
        fallback.to_string()
    } else {
        value.to_string()
    }
}
