//! Row view models of the four registry tables.

use std::sync::Arc;

use qtrace_core::article::{display_title, excerpt, DELETED_PROJECT_LABEL, GENERAL_NEWS_LABEL};
use qtrace_core::format::{format_date, format_peso};
use qtrace_core::project::{registry_tone, StatusTone, NOT_AVAILABLE, UNKNOWN_CONTRACTOR};
use qtrace_core::types::DocId;
use qtrace_db::models::article::Article;
use qtrace_db::models::contractor::Contractor;
use qtrace_db::models::project::Project;
use qtrace_db::models::user::User;
use qtrace_db::repositories::{Entity, Record};
use qtrace_db::store::DocumentStore;
use serde::Serialize;

use super::{resolve_references, PendingReference, ReferenceCell, ReferenceKind, ReferenceRow};

pub const NO_LOGO: &str = "No Logo";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectRow {
    pub id: DocId,
    pub title: String,
    pub category: String,
    pub contractor: ReferenceCell,
    pub barangay: String,
    pub budget: String,
    pub status: String,
    pub tone: StatusTone,
    pub started: String,
    pub end: String,
    pub milestones: usize,
}

impl ProjectRow {
    pub fn skeleton(record: Record<Project>) -> Self {
        let project = record.entity;
        let status = project.display_status().to_string();
        Self {
            title: project.label(),
            contractor: contractor_cell(&project),
            barangay: non_empty_or(&project.address.barangay, NOT_AVAILABLE),
            budget: format_peso(project.budget),
            tone: registry_tone(&status),
            started: format_date(project.dates.started.as_ref()),
            end: format_date(project.dates.end.as_ref()),
            milestones: project.milestones.len(),
            category: project.category,
            status,
            id: record.id,
        }
    }
}

impl ReferenceRow for ProjectRow {
    fn reference_mut(&mut self) -> &mut ReferenceCell {
        &mut self.contractor
    }
}

/// Contractor id when present, else the legacy name, else "N/A".
fn contractor_cell(project: &Project) -> ReferenceCell {
    let legacy = project
        .contractor
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty());

    match project.contractor_id.as_deref().map(str::trim) {
        Some(id) if !id.is_empty() => ReferenceCell::Pending(PendingReference {
            kind: ReferenceKind::Contractor,
            id: id.to_string(),
            fallback: legacy.unwrap_or(UNKNOWN_CONTRACTOR).to_string(),
        }),
        _ => ReferenceCell::Label(legacy.unwrap_or(NOT_AVAILABLE).to_string()),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContractorRow {
    pub id: DocId,
    /// Logo URL, or "No Logo".
    pub logo: String,
    pub has_logo: bool,
    pub name: String,
    pub contact_person: String,
    pub email: String,
    pub phone: String,
    pub experience: String,
    pub address: String,
    pub expertise: Vec<String>,
}

impl From<Record<Contractor>> for ContractorRow {
    fn from(record: Record<Contractor>) -> Self {
        let contractor = record.entity;
        let logo_url = contractor.logo_url().to_string();
        Self {
            id: record.id,
            has_logo: !logo_url.is_empty(),
            logo: non_empty_or(&logo_url, NO_LOGO),
            name: contractor.name,
            contact_person: contractor.contact_person,
            email: contractor.email,
            phone: contractor.phone,
            experience: contractor.experience,
            address: contractor.address,
            expertise: contractor.expertise,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArticleRow {
    pub id: DocId,
    pub title: String,
    pub excerpt: String,
    pub project: ReferenceCell,
    pub article_type: String,
    pub status: String,
    pub photo_url: String,
    pub created: String,
    pub updated: String,
}

impl ArticleRow {
    pub fn skeleton(record: Record<Article>) -> Self {
        let article = record.entity;
        let project = match article.project_ref() {
            Some(id) => ReferenceCell::Pending(PendingReference {
                kind: ReferenceKind::Project,
                id: id.to_string(),
                fallback: DELETED_PROJECT_LABEL.to_string(),
            }),
            None => ReferenceCell::Label(GENERAL_NEWS_LABEL.to_string()),
        };
        Self {
            id: record.id,
            title: display_title(article.article_title.as_deref(), &article.article_type),
            excerpt: excerpt(&article.article_description),
            project,
            created: format_date(article.article_created_at.as_ref()),
            updated: format_date(article.article_updated_at.as_ref()),
            article_type: article.article_type,
            status: article.article_status,
            photo_url: article.article_photo_url,
        }
    }
}

impl ReferenceRow for ArticleRow {
    fn reference_mut(&mut self) -> &mut ReferenceCell {
        &mut self.project
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserRow {
    pub id: DocId,
    pub qc_id: String,
    pub name: String,
    pub email: String,
    pub role: String,
    pub contact: String,
}

impl From<Record<User>> for UserRow {
    fn from(record: Record<User>) -> Self {
        let user = record.entity;
        Self {
            id: record.id,
            qc_id: user.qc_id,
            name: user.full_name.listing(),
            email: user.email,
            role: user.role,
            contact: user.details.contact,
        }
    }
}

/// Project rows, optionally only those whose status is exactly `status`.
pub async fn project_rows(
    store: Arc<dyn DocumentStore>,
    records: Vec<Record<Project>>,
    status: Option<&str>,
) -> Vec<ProjectRow> {
    let rows = records
        .into_iter()
        .filter(|r| status.map_or(true, |s| r.entity.display_status() == s))
        .map(ProjectRow::skeleton)
        .collect();
    resolve_references(store, rows).await
}

/// Article rows with their project labels resolved.
pub async fn article_rows(
    store: Arc<dyn DocumentStore>,
    records: Vec<Record<Article>>,
) -> Vec<ArticleRow> {
    let rows = records.into_iter().map(ArticleRow::skeleton).collect();
    resolve_references(store, rows).await
}

fn non_empty_or(value: &str, fallback: &str) -> String {
    if value.trim().is_empty() {
        fallback.to_string()
    } else {
        value.to_string()
    }
}
