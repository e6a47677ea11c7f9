#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use qtrace_api::auth::session::SessionStore;
use qtrace_api::config::ServerConfig;
use qtrace_api::guard::SubmissionGuard;
use qtrace_api::routes;
use qtrace_api::state::AppState;
use qtrace_cloud::geocoder::GeocodeError;
use qtrace_cloud::identity::IdentityError;
use qtrace_cloud::image_host::ImageHostError;
use qtrace_cloud::{IdentityProvider, ImageHost, ImageUpload, ReverseGeocoder, SignedInUser};
use qtrace_core::address::{GeoPoint, ResolvedAddress};
use qtrace_db::store::MemoryStore;

pub const ADMIN_EMAIL: &str = "admin@qc.gov.ph";
pub const ADMIN_PASSWORD: &str = "correct-horse";
pub const ADMIN_UID: &str = "admin-uid";
pub const ENTRY_PAGE: &str = "/index.html";

/// Build a test `ServerConfig` with safe defaults and no database.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        max_upload_bytes: 1024 * 1024,
        entry_page: ENTRY_PAGE.to_string(),
        session_ttl_hours: 12,
        default_author_id: "admin".to_string(),
        database_url: None,
    }
}

// ---------------------------------------------------------------------------
// Fake external services
// ---------------------------------------------------------------------------

/// Image host that answers `https://img.test/<file name>`, or fails on demand.
/// Uploads can be slowed down to keep a submission in flight.
#[derive(Default)]
pub struct FakeImageHost {
    fail: AtomicBool,
    uploads: AtomicUsize,
    delay_ms: AtomicU64,
}

impl FakeImageHost {
    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn set_delay(&self, delay: Duration) {
        self.delay_ms.store(delay.as_millis() as u64, Ordering::SeqCst);
    }

    pub fn uploads(&self) -> usize {
        self.uploads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ImageHost for FakeImageHost {
    async fn upload(&self, image: ImageUpload) -> Result<String, ImageHostError> {
        let delay = self.delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
        if self.fail.load(Ordering::SeqCst) {
            return Err(ImageHostError::Api {
                status: 503,
                body: "host down".into(),
            });
        }
        self.uploads.fetch_add(1, Ordering::SeqCst);
        Ok(format!("https://img.test/{}", image.file_name))
    }
}

/// Geocoder that knows one barangay and nothing at sea (negative longitude).
pub struct FakeGeocoder;

#[async_trait]
impl ReverseGeocoder for FakeGeocoder {
    async fn reverse(&self, point: GeoPoint) -> Result<ResolvedAddress, GeocodeError> {
        if point.lng < 0.0 {
            return Err(GeocodeError::NoAddress("Unable to geocode".into()));
        }
        Ok(ResolvedAddress {
            street: "Mindanao Avenue".into(),
            barangay: "Bahay Toro".into(),
            zip_code: "1106".into(),
            city: "Quezon City".into(),
        })
    }
}

/// Identity service with a single admin account.
pub struct FakeIdentity;

#[async_trait]
impl IdentityProvider for FakeIdentity {
    async fn sign_in(&self, email: &str, password: &str) -> Result<SignedInUser, IdentityError> {
        if email == ADMIN_EMAIL && password == ADMIN_PASSWORD {
            Ok(SignedInUser {
                uid: ADMIN_UID.into(),
                email: email.into(),
                display_name: Some("City Admin".into()),
            })
        } else {
            Err(IdentityError::Rejected {
                status: 400,
                message: "INVALID_LOGIN_CREDENTIALS".into(),
            })
        }
    }
}

// ---------------------------------------------------------------------------
// App construction
// ---------------------------------------------------------------------------

/// The router plus handles on the fakes behind it.
pub struct TestApp {
    pub app: Router,
    pub state: AppState,
    pub store: Arc<MemoryStore>,
    pub image_host: Arc<FakeImageHost>,
}

/// Build the full application router with all middleware layers over an
/// in-memory store and fake external services.
///
/// This mirrors the router construction in `main.rs` so integration tests
/// exercise the same middleware stack (CORS, request ID, timeout, tracing,
/// panic recovery, page guard) that production uses.
pub fn build_test_app() -> TestApp {
    let config = test_config();
    let store = Arc::new(MemoryStore::new());
    let image_host = Arc::new(FakeImageHost::default());

    let state = AppState {
        store: store.clone(),
        config: Arc::new(config),
        image_host: image_host.clone(),
        geocoder: Arc::new(FakeGeocoder),
        identity: Arc::new(FakeIdentity),
        sessions: Arc::new(SessionStore::new(chrono::Duration::hours(12))),
        submissions: Arc::new(SubmissionGuard::new()),
    };

    let cors = CorsLayer::new()
        .allow_origin(["http://localhost:5173".parse().unwrap()])
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600));

    let request_id_header = HeaderName::from_static("x-request-id");

    let app = Router::new()
        .merge(routes::health::router())
        .nest("/api/v1", routes::api_routes(&state))
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(30),
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(cors)
        .with_state(state.clone());

    TestApp {
        app,
        state,
        store,
        image_host,
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(app: &Router, request: Request<Body>) -> Response {
    app.clone().oneshot(request).await.unwrap()
}

pub async fn get(app: &Router, uri: &str) -> Response {
    let request = Request::get(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn get_auth(app: &Router, uri: &str, token: &str) -> Response {
    let request = Request::get(uri)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: &Router, uri: &str, body: serde_json::Value) -> Response {
    let request = Request::post(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn send_json_auth(
    app: &Router,
    method: Method,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn post_auth(app: &Router, uri: &str, token: &str) -> Response {
    let request = Request::post(uri)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn delete_auth(app: &Router, uri: &str, token: &str) -> Response {
    let request = Request::delete(uri)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Collect a response body as text.
pub async fn body_text(response: Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Sign in as the admin and return the session token.
pub async fn login(app: &Router) -> String {
    let body = serde_json::json!({ "email": ADMIN_EMAIL, "password": ADMIN_PASSWORD });
    let response = post_json(app, "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    json["token"].as_str().unwrap().to_string()
}

// ---------------------------------------------------------------------------
// Multipart bodies
// ---------------------------------------------------------------------------

const BOUNDARY: &str = "qtrace-test-boundary";

/// A `multipart/form-data` body built field by field.
#[derive(Default)]
pub struct MultipartForm {
    body: Vec<u8>,
}

impl MultipartForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
        self
    }

    pub fn file(mut self, name: &str, file_name: &str, bytes: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: image/png\r\n\r\n"
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(bytes);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    pub fn into_request(mut self, method: Method, uri: &str, token: &str) -> Request<Body> {
        self.body
            .extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        Request::builder()
            .method(method)
            .uri(uri)
            .header(AUTHORIZATION, format!("Bearer {token}"))
            .header(
                CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(self.body))
            .unwrap()
    }
}

// ---------------------------------------------------------------------------
// Seeding
// ---------------------------------------------------------------------------

/// Register a contractor through the API and return its id.
pub async fn create_contractor(app: &Router, token: &str, name: &str) -> String {
    let request = MultipartForm::new()
        .text("name", name)
        .text("contactPerson", "Juan Dela Cruz")
        .text("email", "info@builder.ph")
        .text("phone", "0917-000-0000")
        .text("experience", "12")
        .text("address", "Diliman")
        .text("expertise", "Roads, Bridges")
        .into_request(Method::POST, "/api/v1/contractors", token);
    let response = send(app, request).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"]
        .as_str()
        .unwrap()
        .to_string()
}

/// A complete project registration form with one milestone photo.
pub fn project_form(title: &str, contractor_id: &str) -> MultipartForm {
    MultipartForm::new()
        .text("title", title)
        .text("category", "Roads")
        .text("contractorId", contractor_id)
        .text("budget", "2500000")
        .text("status", "Ongoing")
        .text("description", "Road widening")
        .text("lat", "14.6760")
        .text("lng", "121.0437")
        .text("street", "Mindanao Avenue")
        .text("barangay", "Bahay Toro")
        .text("zipCode", "1106")
        .text("startDate", "2024-05-01")
        .text("endDate", "2025-05-01")
        .text("milestones[0][type]", "Pre-Construction")
        .file("milestones[0][image]", "before.png", b"png")
}

/// Register a project through the API and return the created payload.
pub async fn create_project(app: &Router, token: &str, title: &str, contractor_id: &str) -> serde_json::Value {
    let request = project_form(title, contractor_id).into_request(Method::POST, "/api/v1/projects", token);
    let response = send(app, request).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"].clone()
}
