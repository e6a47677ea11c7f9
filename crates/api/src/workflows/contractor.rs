//! Contractor registration and editing.
//!
//! Logo uploads are lenient: a failed upload saves the contractor without
//! a logo rather than refusing the form.

use qtrace_cloud::image_host::{ImageHost, ImageUpload};
use qtrace_core::forms::parse_expertise;
use qtrace_core::types::DocId;
use qtrace_db::models::contractor::{Contractor, CreateContractor, Logo, UpdateContractor};
use qtrace_db::repositories::{ContractorRepo, Entity, Validated};
use qtrace_db::store::DocumentStore;

use crate::error::{AppError, AppResult};
use crate::workflows::uploads::{upload_image, UploadPolicy};

/// A submitted contractor form. `expertise` is the raw comma-separated text.
#[derive(Debug, Clone, Default)]
pub struct NewContractor {
    pub name: String,
    pub contact_person: String,
    pub email: String,
    pub phone: String,
    pub experience: String,
    pub address: String,
    pub expertise: String,
    pub logo: Option<ImageUpload>,
}

/// A contractor edit. `None` fields keep their stored values.
#[derive(Debug, Clone, Default)]
pub struct ContractorEdit {
    pub name: Option<String>,
    pub contact_person: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub experience: Option<String>,
    pub address: Option<String>,
    pub expertise: Option<String>,
    pub logo: Option<ImageUpload>,
}

async fn upload_logo(host: &dyn ImageHost, logo: Option<ImageUpload>) -> AppResult<String> {
    match logo {
        Some(image) => Ok(upload_image(host, image, UploadPolicy::Lenient).await?),
        None => Ok(String::new()),
    }
}

pub async fn register_contractor(
    store: &dyn DocumentStore,
    host: &dyn ImageHost,
    form: NewContractor,
) -> AppResult<DocId> {
    let mut input = CreateContractor {
        logo: Logo::hosted("", &form.name, &form.phone),
        name: form.name,
        contact_person: form.contact_person,
        email: form.email,
        phone: form.phone,
        experience: form.experience,
        address: form.address,
        expertise: parse_expertise(&form.expertise),
        documents: Vec::new(),
    };
    Validated::new(input.clone())?;

    let path = upload_logo(host, form.logo).await?;
    input.logo = Logo::hosted(path, &input.name, &input.phone);

    let id = ContractorRepo::create(store, &Validated::new(input)?).await?;
    tracing::info!(contractor_id = %id, "Contractor registered");
    Ok(id)
}

/// Apply an edit. The logo record is always rewritten so it carries the
/// current name and phone; its path changes only when a new file uploads.
pub async fn edit_contractor(
    store: &dyn DocumentStore,
    host: &dyn ImageHost,
    id: &str,
    edit: ContractorEdit,
) -> AppResult<()> {
    let stored: Contractor = ContractorRepo::find_by_id(store, id)
        .await?
        .ok_or_else(|| AppError::not_found(Contractor::NAME, id))?
        .entity;

    let mut patch = UpdateContractor {
        name: edit.name,
        contact_person: edit.contact_person,
        email: edit.email,
        phone: edit.phone,
        experience: edit.experience,
        address: edit.address,
        expertise: edit.expertise.as_deref().map(parse_expertise),
        logo: None,
    };
    Validated::new(patch.clone())?;

    let uploaded = upload_logo(host, edit.logo).await?;
    // A failed upload of a replacement keeps the current logo.
    let path = if uploaded.is_empty() {
        stored.logo_url().to_string()
    } else {
        uploaded
    };
    let name = patch.name.as_deref().unwrap_or(&stored.name);
    let phone = patch.phone.as_deref().unwrap_or(&stored.phone);
    patch.logo = Some(Logo::hosted(path, name, phone));

    if !ContractorRepo::update(store, id, &Validated::new(patch)?).await? {
        return Err(AppError::not_found(Contractor::NAME, id));
    }
    tracing::info!(contractor_id = %id, "Contractor updated");
    Ok(())
}
