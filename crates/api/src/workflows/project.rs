//! Project registration and editing.
//!
//! Registering a project also publishes a "Project Launch" article that
//! links back to it. The two writes are independent: if the article write
//! fails the project stays, and the failure is reported alongside its id.

use chrono::NaiveDate;
use qtrace_cloud::image_host::{ImageHost, ImageHostError, ImageUpload};
use qtrace_core::address::{GeoPoint, ResolvedAddress};
use qtrace_core::article::ArticleStatus;
use qtrace_core::error::CoreError;
use qtrace_core::format::DateValue;
use qtrace_core::project::{
    launch_article_description, MilestoneType, ProjectStatus, ARTICLE_TYPE_PROJECT_LAUNCH,
    DEFAULT_CATEGORY,
};
use qtrace_core::types::DocId;
use qtrace_core::validation::parse_form_date;
use qtrace_db::models::article::CreateArticle;
use qtrace_db::models::project::{CreateProject, Milestone, Project, ProjectDates, UpdateProject};
use qtrace_db::repositories::{ArticleRepo, Entity, ProjectRepo, Validated};
use qtrace_db::store::DocumentStore;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::workflows::uploads::{upload_sequentially, UploadPolicy};

pub const MISSING_PIN: &str = "Please pin a location on the map!";

/// One milestone row as submitted. Rows without an image are not saved.
#[derive(Debug, Clone)]
pub struct MilestoneUpload {
    pub milestone_type: MilestoneType,
    pub image: Option<ImageUpload>,
}

/// A submitted registration form.
#[derive(Debug, Clone, Default)]
pub struct NewProject {
    pub title: String,
    pub category: String,
    pub contractor_id: DocId,
    pub budget: f64,
    pub status: ProjectStatus,
    pub description: String,
    pub location: Option<GeoPoint>,
    pub address: ResolvedAddress,
    pub started: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub milestones: Vec<MilestoneUpload>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectCreated {
    pub id: DocId,
    pub milestones: usize,
    pub launch_article_id: Option<DocId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub launch_article_error: Option<String>,
}

/// Register a project and publish its launch article.
///
/// Milestone images are uploaded one at a time before anything is written;
/// any upload failure aborts the registration. The launch article takes
/// its photo from the first saved milestone.
pub async fn register_project(
    store: &dyn DocumentStore,
    host: &dyn ImageHost,
    author_id: &str,
    project: NewProject,
) -> AppResult<ProjectCreated> {
    let location = project
        .location
        .ok_or_else(|| CoreError::Validation(MISSING_PIN.into()))?;

    let category = if project.category.is_empty() {
        DEFAULT_CATEGORY.to_string()
    } else {
        project.category
    };
    let mut input = CreateProject {
        title: project.title,
        category,
        contractor_id: project.contractor_id,
        budget: project.budget,
        status: project.status,
        description: project.description,
        location,
        address: project.address,
        dates: ProjectDates {
            started: project.started.map(DateValue::from_date),
            end: project.end.map(DateValue::from_date),
        },
        milestones: Vec::new(),
        created_at: DateValue::now(),
    };
    // Rejected forms cost no uploads.
    Validated::new(input.clone())?;

    input.milestones = upload_milestones(host, project.milestones).await?;
    let photo = input
        .milestones
        .first()
        .map(|m| m.image_url.clone())
        .unwrap_or_default();
    let description = launch_article_description(&input.title, &input.description);
    let milestones = input.milestones.len();

    let id = ProjectRepo::create(store, &Validated::new(input)?).await?;
    tracing::info!(project_id = %id, milestones, "Project registered");

    let now = DateValue::now();
    let article = CreateArticle {
        project_id: id.clone(),
        user_id: author_id.to_string(),
        article_title: None,
        article_type: ARTICLE_TYPE_PROJECT_LAUNCH.to_string(),
        article_description: description,
        article_photo_url: photo,
        article_status: ArticleStatus::Published,
        article_created_at: now.clone(),
        article_updated_at: now,
    };

    let (launch_article_id, launch_article_error) = match publish(store, article).await {
        Ok(article_id) => (Some(article_id), None),
        Err(e) => {
            tracing::error!(project_id = %id, error = %e, "Launch article was not written");
            (None, Some(e.to_string()))
        }
    };

    Ok(ProjectCreated {
        id,
        milestones,
        launch_article_id,
        launch_article_error,
    })
}

async fn publish(store: &dyn DocumentStore, article: CreateArticle) -> AppResult<DocId> {
    let article = Validated::new(article)?;
    Ok(ArticleRepo::create(store, &article).await?)
}

async fn upload_milestones(
    host: &dyn ImageHost,
    rows: Vec<MilestoneUpload>,
) -> Result<Vec<Milestone>, ImageHostError> {
    let (types, images): (Vec<_>, Vec<_>) = rows
        .into_iter()
        .filter_map(|row| row.image.map(|image| (row.milestone_type, image)))
        .unzip();

    let urls = upload_sequentially(host, images, UploadPolicy::Strict).await?;
    Ok(types
        .into_iter()
        .zip(urls)
        .map(|(milestone_type, image_url)| Milestone {
            milestone_type: milestone_type.as_str().to_string(),
            image_url,
            date_uploaded: Some(DateValue::now()),
            status: None,
        })
        .collect())
}

/// A project edit. Absent fields keep their stored values.
///
/// Address parts are merged into the stored address. A blank date clears
/// it. The location is replaced only when both `lat` and `lng` are given.
/// Milestones and `createdAt` are never touched by an edit.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectEdit {
    pub title: Option<String>,
    pub category: Option<String>,
    pub contractor_id: Option<DocId>,
    pub budget: Option<f64>,
    pub status: Option<String>,
    pub description: Option<String>,
    pub street: Option<String>,
    pub barangay: Option<String>,
    pub zip_code: Option<String>,
    pub city: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

impl ProjectEdit {
    fn address(&self, stored: &ResolvedAddress) -> Option<ResolvedAddress> {
        if self.street.is_none()
            && self.barangay.is_none()
            && self.zip_code.is_none()
            && self.city.is_none()
        {
            return None;
        }
        let pick = |new: &Option<String>, old: &str| {
            new.as_deref().map(str::trim).unwrap_or(old).to_string()
        };
        Some(ResolvedAddress {
            street: pick(&self.street, &stored.street),
            barangay: pick(&self.barangay, &stored.barangay),
            zip_code: pick(&self.zip_code, &stored.zip_code),
            city: match self.city.as_deref().map(str::trim) {
                Some(city) if !city.is_empty() => city.to_string(),
                _ => stored.city.clone(),
            },
        })
    }

    fn dates(&self, stored: &ProjectDates) -> Result<Option<ProjectDates>, CoreError> {
        if self.start_date.is_none() && self.end_date.is_none() {
            return Ok(None);
        }
        Ok(Some(ProjectDates {
            started: edited_date("startDate", self.start_date.as_deref(), &stored.started)?,
            end: edited_date("endDate", self.end_date.as_deref(), &stored.end)?,
        }))
    }

    fn location(&self) -> Result<Option<GeoPoint>, CoreError> {
        match (self.lat, self.lng) {
            (Some(lat), Some(lng)) => GeoPoint::new(lat, lng).map(Some),
            _ => Ok(None),
        }
    }
}

fn edited_date(
    field: &str,
    submitted: Option<&str>,
    stored: &Option<DateValue>,
) -> Result<Option<DateValue>, CoreError> {
    match submitted.map(str::trim) {
        None => Ok(stored.clone()),
        Some("") => Ok(None),
        Some(text) => parse_form_date(field, text).map(|d| Some(DateValue::from_date(d))),
    }
}

pub async fn edit_project(store: &dyn DocumentStore, id: &str, edit: ProjectEdit) -> AppResult<()> {
    let stored: Project = ProjectRepo::find_by_id(store, id)
        .await?
        .ok_or_else(|| AppError::not_found(Project::NAME, id))?
        .entity;

    let status = edit
        .status
        .as_deref()
        .map(|s| ProjectStatus::parse(s.trim()))
        .transpose()?;
    let patch = UpdateProject {
        address: edit.address(&stored.address),
        dates: edit.dates(&stored.dates)?,
        location: edit.location()?,
        title: edit.title.map(|t| t.trim().to_string()),
        category: edit.category,
        contractor_id: edit.contractor_id,
        budget: edit.budget,
        status,
        description: edit.description,
    };

    if !ProjectRepo::update(store, id, &Validated::new(patch)?).await? {
        return Err(AppError::not_found(Project::NAME, id));
    }
    tracing::info!(project_id = %id, "Project updated");
    Ok(())
}
