//! Collection names. These are the wire-level names shared with the mobile
//! client, so they must not change.

pub const PROJECTS: &str = "projects";
pub const CONTRACTORS: &str = "contractors";
pub const ARTICLES: &str = "articles";
pub const USERS: &str = "users";
