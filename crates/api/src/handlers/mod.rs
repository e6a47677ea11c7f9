//! Request handlers.
//!
//! Each submodule serves one resource. Registry handlers delegate reads to
//! the repositories in `qtrace_db` and multi-step writes to
//! [`workflows`](crate::workflows); errors map through [`AppError`](crate::error::AppError).

pub mod article;
pub mod auth;
pub mod contractor;
pub mod dashboard;
pub mod geocode;
pub mod project;
pub mod user;
