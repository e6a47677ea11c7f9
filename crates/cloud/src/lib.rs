//! HTTP clients for the services the console depends on.
//!
//! - [`image_host`] -- photo and logo uploads (ImgBB).
//! - [`geocoder`] -- reverse geocoding of map pins (Nominatim).
//! - [`identity`] -- password sign-in (Firebase Identity Toolkit).
//!
//! Each service sits behind a trait so the server and its tests can swap in
//! other implementations.

use std::time::Duration;

pub mod geocoder;
pub mod identity;
pub mod image_host;

pub use geocoder::{GeocoderConfig, NominatimClient, ReverseGeocoder};
pub use identity::{FirebaseIdentityClient, IdentityConfig, IdentityProvider, SignedInUser};
pub use image_host::{ImageHost, ImageHostConfig, ImageUpload, ImgbbClient};

/// Default request timeout for outbound calls, in seconds.
pub const DEFAULT_EXTERNAL_TIMEOUT_SECS: u64 = 30;

/// Build the shared outbound HTTP client.
///
/// Reads `EXTERNAL_TIMEOUT_SECS` (default 30).
///
/// # Panics
///
/// Panics if the TLS backend cannot be initialised.
pub fn http_client_from_env() -> reqwest::Client {
    let timeout_secs: u64 = std::env::var("EXTERNAL_TIMEOUT_SECS")
        .unwrap_or_else(|_| DEFAULT_EXTERNAL_TIMEOUT_SECS.to_string())
        .parse()
        .expect("EXTERNAL_TIMEOUT_SECS must be a valid u64");

    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .expect("Failed to build HTTP client")
}

/// Read a non-2xx response body for an error message.
pub(crate) async fn error_body(response: reqwest::Response) -> String {
    response
        .text()
        .await
        .unwrap_or_else(|_| "<unreadable body>".to_string())
}
