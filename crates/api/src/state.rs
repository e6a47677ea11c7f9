use std::sync::Arc;

use qtrace_cloud::{IdentityProvider, ImageHost, ReverseGeocoder};
use qtrace_db::store::DocumentStore;

use crate::auth::session::SessionStore;
use crate::config::ServerConfig;
use crate::guard::SubmissionGuard;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Document store (Postgres, or in-memory for dev runs and tests).
    pub store: Arc<dyn DocumentStore>,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Image host used for milestone photos, article photos and logos.
    pub image_host: Arc<dyn ImageHost>,
    /// Reverse geocoder behind the map pin.
    pub geocoder: Arc<dyn ReverseGeocoder>,
    /// Identity service that checks admin credentials.
    pub identity: Arc<dyn IdentityProvider>,
    /// Active admin sessions.
    pub sessions: Arc<SessionStore>,
    /// In-flight form submissions.
    pub submissions: Arc<SubmissionGuard>,
}
