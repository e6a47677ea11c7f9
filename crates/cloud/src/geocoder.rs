//! Reverse geocoding client.
//!
//! A map click yields a point; the geocoder turns it into street, barangay
//! and zip code suggestions. Failure is never fatal: callers use
//! [`ReverseGeocoder::resolve`] and leave the address fields as they were.

use async_trait::async_trait;
use qtrace_core::address::{GeoPoint, GeocodedParts, ResolvedAddress};
use serde::Deserialize;

use crate::error_body;

pub const DEFAULT_GEOCODER_URL: &str = "https://nominatim.openstreetmap.org";
pub const DEFAULT_GEOCODER_USER_AGENT: &str = "qtrace-admin/0.1";

#[derive(Debug, thiserror::Error)]
pub enum GeocodeError {
    #[error("Geocoding request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Geocoder error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("Geocoder returned an unreadable response: {0}")]
    Decode(#[from] serde_json::Error),

    /// A 2xx response with no `address` object, e.g. a point at sea.
    #[error("No address found: {0}")]
    NoAddress(String),
}

#[async_trait]
pub trait ReverseGeocoder: Send + Sync {
    /// Look up the address at `point`.
    async fn reverse(&self, point: GeoPoint) -> Result<ResolvedAddress, GeocodeError>;

    /// Like [`reverse`](Self::reverse), but failures are logged and read
    /// as "no suggestion".
    async fn resolve(&self, point: GeoPoint) -> Option<ResolvedAddress> {
        match self.reverse(point).await {
            Ok(address) => Some(address),
            Err(e) => {
                tracing::warn!(lat = point.lat, lng = point.lng, error = %e, "Reverse geocoding failed");
                None
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct GeocoderConfig {
    pub base_url: String,
    pub user_agent: String,
}

impl GeocoderConfig {
    /// Load from environment variables.
    ///
    /// | Env var               | Default                                |
    /// |-----------------------|----------------------------------------|
    /// | `GEOCODER_URL`        | `https://nominatim.openstreetmap.org`  |
    /// | `GEOCODER_USER_AGENT` | `qtrace-admin/0.1`                     |
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var("GEOCODER_URL")
                .unwrap_or_else(|_| DEFAULT_GEOCODER_URL.to_string()),
            user_agent: std::env::var("GEOCODER_USER_AGENT")
                .unwrap_or_else(|_| DEFAULT_GEOCODER_USER_AGENT.to_string()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ReverseResponse {
    address: Option<GeocodedParts>,
    error: Option<String>,
}

/// Decode a `/reverse?format=jsonv2` body and apply the address fallback chain.
pub fn parse_reverse(body: &str) -> Result<ResolvedAddress, GeocodeError> {
    let parsed: ReverseResponse = serde_json::from_str(body)?;
    match parsed.address {
        Some(parts) => Ok(parts.resolve()),
        None => Err(GeocodeError::NoAddress(
            parsed.error.unwrap_or_else(|| "empty response".to_string()),
        )),
    }
}

/// HTTP client for a Nominatim-compatible reverse endpoint.
pub struct NominatimClient {
    client: reqwest::Client,
    config: GeocoderConfig,
}

impl NominatimClient {
    pub fn new(config: GeocoderConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    pub fn with_client(client: reqwest::Client, config: GeocoderConfig) -> Self {
        Self { client, config }
    }
}

#[async_trait]
impl ReverseGeocoder for NominatimClient {
    /// `GET {base_url}/reverse?format=jsonv2&lat={lat}&lon={lng}`.
    async fn reverse(&self, point: GeoPoint) -> Result<ResolvedAddress, GeocodeError> {
        let response = self
            .client
            .get(format!("{}/reverse", self.config.base_url))
            .header(reqwest::header::USER_AGENT, &self.config.user_agent)
            .query(&[
                ("format", "jsonv2".to_string()),
                ("lat", point.lat.to_string()),
                ("lon", point.lng.to_string()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(GeocodeError::Api {
                status: status.as_u16(),
                body: error_body(response).await,
            });
        }
        parse_reverse(&response.text().await?)
    }
}
