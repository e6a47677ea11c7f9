//! Document shapes of each collection.
//!
//! Each submodule contains:
//! - An entity struct decoded from a stored document (every field defaults
//!   when absent, since the store enforces no schema)
//! - A create DTO written as a whole new document
//! - An update patch (all `Option` fields, `None` fields are not written)

pub mod article;
pub mod contractor;
pub mod project;
pub mod user;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Accept a number or a numeric string; anything else reads as zero.
///
/// Budgets were written both as numbers and as raw form text.
pub(crate) fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    })
}

/// Accept a string or a number as text; `null` reads as empty.
pub(crate) fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    })
}

/// Accept a list of strings or a legacy comma-separated string.
pub(crate) fn list_or_comma_string<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        Value::String(s) => qtrace_core::forms::parse_expertise(&s),
        _ => Vec::new(),
    })
}
