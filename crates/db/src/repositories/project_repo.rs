//! Project registry.

use qtrace_core::address::GeoPoint;
use qtrace_core::error::CoreError;
use qtrace_core::project::UNTITLED_PROJECT;
use qtrace_core::validation::{require_non_empty, validate_budget};

use crate::collections::PROJECTS;
use crate::models::project::{CreateProject, Project, UpdateProject};
use crate::repositories::registry::{Entity, Input, Registry};

/// Field projects are ordered by on the dashboard.
pub const CREATED_AT_FIELD: &str = "createdAt";

pub type ProjectRepo = Registry<Project>;

impl Entity for Project {
    const COLLECTION: &'static str = PROJECTS;
    const NAME: &'static str = "Project";

    type Create = CreateProject;
    type Patch = UpdateProject;

    fn label(&self) -> String {
        if self.title.is_empty() {
            UNTITLED_PROJECT.to_string()
        } else {
            self.title.clone()
        }
    }
}

fn check_location(point: &GeoPoint) -> Result<(), CoreError> {
    GeoPoint::new(point.lat, point.lng).map(|_| ())
}

impl Input for CreateProject {
    fn validate(&self) -> Result<(), CoreError> {
        require_non_empty("title", &self.title)?;
        validate_budget(self.budget)?;
        check_location(&self.location)
    }
}

impl Input for UpdateProject {
    fn validate(&self) -> Result<(), CoreError> {
        if let Some(title) = &self.title {
            require_non_empty("title", title)?;
        }
        if let Some(budget) = self.budget {
            validate_budget(budget)?;
        }
        if let Some(location) = &self.location {
            check_location(location)?;
        }
        Ok(())
    }
}
