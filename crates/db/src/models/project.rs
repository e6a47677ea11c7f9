//! Project documents (`projects` collection).

use qtrace_core::address::{GeoPoint, ResolvedAddress};
use qtrace_core::format::DateValue;
use qtrace_core::project::ProjectStatus;
use qtrace_core::types::DocId;
use serde::{Deserialize, Serialize};

use super::{lenient_f64, lenient_string};

/// A stored project.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Project {
    #[serde(deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(deserialize_with = "lenient_string")]
    pub category: String,
    /// Contractor document id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contractor_id: Option<DocId>,
    /// Contractor name, as written by older revisions of the console.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contractor: Option<String>,
    #[serde(deserialize_with = "lenient_f64")]
    pub budget: f64,
    /// Kept as text: older documents hold values outside [`ProjectStatus`].
    #[serde(deserialize_with = "lenient_string")]
    pub status: String,
    #[serde(deserialize_with = "lenient_string")]
    pub description: String,
    pub location: Option<GeoPoint>,
    pub address: ResolvedAddress,
    pub dates: ProjectDates,
    pub milestones: Vec<Milestone>,
    pub created_at: Option<DateValue>,
}

impl Project {
    /// Status as shown in lists; blank reads as [`ProjectStatus::Ongoing`].
    pub fn display_status(&self) -> &str {
        if self.status.is_empty() {
            ProjectStatus::Ongoing.as_str()
        } else {
            &self.status
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectDates {
    pub started: Option<DateValue>,
    pub end: Option<DateValue>,
}

/// A progress photo embedded in a project.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Milestone {
    #[serde(rename = "type", deserialize_with = "lenient_string")]
    pub milestone_type: String,
    #[serde(deserialize_with = "lenient_string")]
    pub image_url: String,
    pub date_uploaded: Option<DateValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// DTO for writing a new project document.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProject {
    pub title: String,
    pub category: String,
    pub contractor_id: DocId,
    pub budget: f64,
    pub status: ProjectStatus,
    pub description: String,
    pub location: GeoPoint,
    pub address: ResolvedAddress,
    pub dates: ProjectDates,
    pub milestones: Vec<Milestone>,
    pub created_at: DateValue,
}

/// Patch for an existing project. Milestones and `createdAt` are never
/// touched by an edit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProject {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contractor_id: Option<DocId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ProjectStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<GeoPoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<ResolvedAddress>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dates: Option<ProjectDates>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn legacy_document_decodes_with_defaults() {
        let project: Project = serde_json::from_value(json!({
            "title": "Drainage upgrade",
            "contractor": "Acme Builders",
            "budget": "1500000",
            "dates": {"end": {"seconds": 1_700_000_000, "nanoseconds": 0}},
            "milestones": [{"type": "Actual Work", "imageUrl": "https://i.ibb.co/x.png"}]
        }))
        .unwrap();

        assert_eq!(project.contractor.as_deref(), Some("Acme Builders"));
        assert!(project.contractor_id.is_none());
        assert_eq!(project.budget, 1_500_000.0);
        assert_eq!(project.display_status(), "Ongoing");
        assert_eq!(project.address.city, "Quezon City");
        assert_eq!(project.milestones[0].milestone_type, "Actual Work");
        assert!(project.location.is_none());
        assert!(project.dates.end.is_some());
    }

    #[test]
    fn patch_serializes_only_named_fields() {
        let patch = UpdateProject {
            title: Some("New title".into()),
            status: Some(ProjectStatus::Delayed),
            ..Default::default()
        };
        let value = serde_json::to_value(&patch).unwrap();
        assert_eq!(value, json!({"title": "New title", "status": "Delayed"}));
    }

    #[test]
    fn create_dto_uses_stored_field_names() {
        let dto = CreateProject {
            title: "Bridge".into(),
            category: "Infrastructure".into(),
            contractor_id: "c1".into(),
            budget: 10.0,
            status: ProjectStatus::Ongoing,
            description: "".into(),
            location: GeoPoint { lat: 14.6, lng: 121.0 },
            address: ResolvedAddress::default(),
            dates: ProjectDates::default(),
            milestones: vec![],
            created_at: DateValue::now(),
        };
        let value = serde_json::to_value(&dto).unwrap();
        assert_eq!(value["contractorId"], "c1");
        assert_eq!(value["address"]["zipCode"], "");
        assert!(value["createdAt"].is_string());
    }
}
