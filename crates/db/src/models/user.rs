//! Citizen and admin user documents (`users` collection).

use qtrace_core::format::DateValue;
use serde::{Deserialize, Serialize};

use super::lenient_string;

/// A stored user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct User {
    pub full_name: FullName,
    #[serde(deserialize_with = "lenient_string")]
    pub qc_id: String,
    #[serde(deserialize_with = "lenient_string")]
    pub role: String,
    #[serde(deserialize_with = "lenient_string")]
    pub email: String,
    pub details: UserDetails,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FullName {
    #[serde(deserialize_with = "lenient_string")]
    pub first: String,
    #[serde(deserialize_with = "lenient_string")]
    pub middle: String,
    #[serde(deserialize_with = "lenient_string")]
    pub last: String,
}

impl FullName {
    /// `Last, First` as listed in the registry.
    pub fn listing(&self) -> String {
        format!("{}, {}", self.last, self.first)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserDetails {
    #[serde(deserialize_with = "lenient_string")]
    pub sex: String,
    pub birth_date: Option<DateValue>,
    #[serde(deserialize_with = "lenient_string")]
    pub contact: String,
    #[serde(deserialize_with = "lenient_string")]
    pub address: String,
}

/// DTO for writing a new user. The qcId is assigned by the repository.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUser {
    pub full_name: FullName,
    pub role: String,
    pub email: String,
    pub details: UserDetails,
}

/// Patch for an existing user. The qcId is not editable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUser {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<FullName>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<UserDetails>,
}
