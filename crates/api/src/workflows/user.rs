//! Citizen and admin accounts.

use qtrace_core::error::CoreError;
use qtrace_core::types::DocId;
use qtrace_db::models::user::{CreateUser, UpdateUser, User};
use qtrace_db::repositories::{Entity, UserRepo, Validated};
use qtrace_db::store::DocumentStore;
use serde::Serialize;

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserCreated {
    pub id: DocId,
    pub qc_id: String,
}

/// Create a user under a newly allocated qcId.
pub async fn register_user(store: &dyn DocumentStore, input: CreateUser) -> AppResult<UserCreated> {
    let input = Validated::new(input)?;
    let (id, qc_id) = UserRepo::create_with_qc_id(store, &input)
        .await?
        .ok_or_else(|| CoreError::Conflict("Could not allocate a unique qcId".into()))?;

    tracing::info!(user_id = %id, qc_id = %qc_id, "User registered");
    Ok(UserCreated { id, qc_id })
}

/// Patch a user. The qcId cannot be changed.
pub async fn edit_user(store: &dyn DocumentStore, id: &str, patch: UpdateUser) -> AppResult<()> {
    let patch = Validated::new(patch)?;
    if !UserRepo::update(store, id, &patch).await? {
        return Err(AppError::not_found(User::NAME, id));
    }
    Ok(())
}
