//! Authentication middleware and extractors.
//!
//! - [`auth::AuthSession`] -- the signed-in admin behind a request.
//! - [`page_guard::page_guard`] -- sends requests without a live session
//!   back to the entry page.

pub mod auth;
pub mod page_guard;
