//! Dropdown sources for the project and article forms.

use qtrace_db::repositories::{ContractorRepo, ProjectRepo, SelectOption};
use qtrace_db::store::{DocumentStore, StoreError};

pub const CONTRACTOR_PLACEHOLDER: &str = "Select Contractor";
pub const GENERAL_NEWS_OPTION: &str = "-- General News (No Project) --";

fn placeholder(label: &str) -> SelectOption {
    SelectOption {
        value: String::new(),
        label: label.to_string(),
    }
}

/// Contractor choices for the project form, after a blank placeholder.
pub async fn contractor_options(store: &dyn DocumentStore) -> Result<Vec<SelectOption>, StoreError> {
    let mut options = vec![placeholder(CONTRACTOR_PLACEHOLDER)];
    options.extend(ContractorRepo::options(store).await?);
    Ok(options)
}

/// Project choices for the article form. The blank first entry files the
/// article as general news.
pub async fn project_options(store: &dyn DocumentStore) -> Result<Vec<SelectOption>, StoreError> {
    let mut options = vec![placeholder(GENERAL_NEWS_OPTION)];
    options.extend(ProjectRepo::options(store).await?);
    Ok(options)
}
