//! User registry and qcId allocation.

use qtrace_core::error::CoreError;
use qtrace_core::qc_id::{generate_qc_id, MAX_QC_ID_ATTEMPTS};
use qtrace_core::roles::is_known_role;
use qtrace_core::types::DocId;
use qtrace_core::validation::{require_non_empty, validate_email};
use serde_json::Value;

use crate::collections::USERS;
use crate::models::user::{CreateUser, FullName, UpdateUser, User};
use crate::repositories::registry::{to_fields, Entity, Input, Registry, Validated};
use crate::store::{DocumentStore, StoreError};

/// Field holding the citizen identifier.
pub const QC_ID_FIELD: &str = "qcId";

pub type UserRepo = Registry<User>;

impl Entity for User {
    const COLLECTION: &'static str = USERS;
    const NAME: &'static str = "User";

    type Create = CreateUser;
    type Patch = UpdateUser;

    fn label(&self) -> String {
        self.qc_id.clone()
    }
}

fn check_name(name: &FullName) -> Result<(), CoreError> {
    require_non_empty("first name", &name.first)?;
    require_non_empty("last name", &name.last)
}

fn check_role(role: &str) -> Result<(), CoreError> {
    if is_known_role(role) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Unknown role '{role}'. Expected admin or user"
        )))
    }
}

impl Input for CreateUser {
    fn validate(&self) -> Result<(), CoreError> {
        check_name(&self.full_name)?;
        validate_email("email", &self.email)?;
        check_role(&self.role)
    }
}

impl Input for UpdateUser {
    fn validate(&self) -> Result<(), CoreError> {
        if let Some(name) = &self.full_name {
            check_name(name)?;
        }
        if let Some(email) = &self.email {
            validate_email("email", email)?;
        }
        if let Some(role) = &self.role {
            check_role(role)?;
        }
        Ok(())
    }
}

impl Registry<User> {
    /// Insert a user under a freshly generated qcId.
    ///
    /// The conditional insert is the uniqueness gate: a colliding id is
    /// simply regenerated. Returns the document id and qcId, or `None` once
    /// [`MAX_QC_ID_ATTEMPTS`] ids have all been taken.
    pub async fn create_with_qc_id(
        store: &dyn DocumentStore,
        input: &Validated<CreateUser>,
    ) -> Result<Option<(DocId, String)>, StoreError> {
        let base = to_fields(USERS, input.get())?;
        for attempt in 1..=MAX_QC_ID_ATTEMPTS {
            let qc_id = generate_qc_id();
            let mut data = base.clone();
            data.insert(QC_ID_FIELD.to_string(), Value::String(qc_id.clone()));

            let created = store
                .create_unique(
                    USERS,
                    QC_ID_FIELD,
                    &Value::String(qc_id.clone()),
                    Value::Object(data),
                )
                .await?;
            match created {
                Some(id) => return Ok(Some((id, qc_id))),
                None => tracing::debug!(attempt, qc_id = %qc_id, "qcId already taken, retrying"),
            }
        }
        Ok(None)
    }
}
