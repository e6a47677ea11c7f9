//! Domain rules for the QTrace admin console.
//!
//! Everything in this crate is pure: no I/O, no async. The storage layer
//! (`qtrace-db`), the external HTTP collaborators (`qtrace-cloud`) and the
//! HTTP server (`qtrace-api`) all build on these types.

pub mod address;
pub mod alerts;
pub mod article;
pub mod error;
pub mod format;
pub mod forms;
pub mod project;
pub mod qc_id;
pub mod roles;
pub mod types;
pub mod validation;
