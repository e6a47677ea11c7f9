//! Form submissions that take more than one step.
//!
//! A submission uploads its images first, then writes its documents. The
//! image host and the store are passed in as trait objects so each
//! workflow can be driven without the HTTP layer.

pub mod article;
pub mod contractor;
pub mod project;
pub mod uploads;
pub mod user;
