//! Contractor documents (`contractors` collection).

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{lenient_string, list_or_comma_string};

/// A stored contractor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Contractor {
    #[serde(deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(deserialize_with = "lenient_string")]
    pub contact_person: String,
    #[serde(deserialize_with = "lenient_string")]
    pub email: String,
    #[serde(deserialize_with = "lenient_string")]
    pub phone: String,
    /// Years of experience, stored as text.
    #[serde(deserialize_with = "lenient_string")]
    pub experience: String,
    #[serde(deserialize_with = "lenient_string")]
    pub address: String,
    #[serde(deserialize_with = "list_or_comma_string")]
    pub expertise: Vec<String>,
    pub logo: Option<Logo>,
    pub documents: Vec<Value>,
}

impl Contractor {
    /// URL of the logo, or empty when none is set.
    pub fn logo_url(&self) -> &str {
        self.logo.as_ref().map(Logo::url).unwrap_or_default()
    }
}

/// Contractor logo: a hosted-image record, or a bare URL from older documents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Logo {
    Hosted {
        #[serde(alias = "url")]
        path: String,
        #[serde(default)]
        name: String,
        #[serde(default)]
        phone: String,
    },
    Legacy(String),
}

impl Logo {
    pub fn url(&self) -> &str {
        match self {
            Logo::Hosted { path, .. } => path,
            Logo::Legacy(url) => url,
        }
    }

    /// A hosted record carrying the contractor's current name and phone.
    pub fn hosted(path: impl Into<String>, name: &str, phone: &str) -> Self {
        Logo::Hosted {
            path: path.into(),
            name: name.to_string(),
            phone: phone.to_string(),
        }
    }
}

/// DTO for writing a new contractor document.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateContractor {
    pub name: String,
    pub contact_person: String,
    pub email: String,
    pub phone: String,
    pub experience: String,
    pub address: String,
    pub expertise: Vec<String>,
    pub logo: Logo,
    /// Always empty on creation; filled in by other clients.
    pub documents: Vec<Value>,
}

/// Patch for an existing contractor. `documents` is never touched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateContractor {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_person: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experience: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expertise: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<Logo>,
}
