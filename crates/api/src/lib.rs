//! QTrace admin API server library.
//!
//! Exposes the building blocks (config, state, error handling, auth gate,
//! registry rendering, workflows, routes) so integration tests and the
//! binary entrypoint can both access them.

pub mod auth;
pub mod config;
pub mod error;
pub mod guard;
pub mod handlers;
pub mod middleware;
pub mod multipart;
pub mod registry;
pub mod response;
pub mod routes;
pub mod state;
pub mod workflows;
