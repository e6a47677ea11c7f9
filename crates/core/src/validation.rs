//! Field checks applied to submitted forms before anything is written.

use chrono::NaiveDate;
use validator::ValidateEmail;

use crate::error::CoreError;

pub fn require_non_empty(field: &str, value: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::Validation(format!("{field} is required")));
    }
    Ok(())
}

pub fn validate_email(field: &str, value: &str) -> Result<(), CoreError> {
    if !value.to_string().validate_email() {
        return Err(CoreError::Validation(format!(
            "{field} must be a valid email address"
        )));
    }
    Ok(())
}

/// Budgets are non-negative finite amounts.
pub fn validate_budget(budget: f64) -> Result<(), CoreError> {
    if !budget.is_finite() || budget < 0.0 {
        return Err(CoreError::Validation(format!(
            "budget must be a non-negative amount, got {budget}"
        )));
    }
    Ok(())
}

/// Parse a date input value (`YYYY-MM-DD`).
pub fn parse_form_date(field: &str, value: &str) -> Result<NaiveDate, CoreError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        CoreError::Validation(format!("{field} must be a date in YYYY-MM-DD form, got '{value}'"))
    })
}
