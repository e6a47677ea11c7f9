//! Contractor registry.

use qtrace_core::error::CoreError;
use qtrace_core::validation::{require_non_empty, validate_email};

use crate::collections::CONTRACTORS;
use crate::models::contractor::{Contractor, CreateContractor, UpdateContractor};
use crate::repositories::registry::{Entity, Input, Registry};

pub type ContractorRepo = Registry<Contractor>;

impl Entity for Contractor {
    const COLLECTION: &'static str = CONTRACTORS;
    const NAME: &'static str = "Contractor";

    type Create = CreateContractor;
    type Patch = UpdateContractor;

    fn label(&self) -> String {
        self.name.clone()
    }
}

/// E-mail is optional on contractor forms, but must be well formed if given.
fn check_optional_email(email: &str) -> Result<(), CoreError> {
    if email.trim().is_empty() {
        Ok(())
    } else {
        validate_email("email", email)
    }
}

impl Input for CreateContractor {
    fn validate(&self) -> Result<(), CoreError> {
        require_non_empty("name", &self.name)?;
        check_optional_email(&self.email)
    }
}

impl Input for UpdateContractor {
    fn validate(&self) -> Result<(), CoreError> {
        if let Some(name) = &self.name {
            require_non_empty("name", name)?;
        }
        if let Some(email) = &self.email {
            check_optional_email(email)?;
        }
        Ok(())
    }
}
