//! Image hosting client.
//!
//! Uploads go to an ImgBB-compatible endpoint as a multipart `image` field
//! with the account key in the query string. The key is a single shared
//! credential: every caller uploads under the same account.

use async_trait::async_trait;
use serde::Deserialize;

use crate::error_body;

pub const DEFAULT_IMGBB_API_URL: &str = "https://api.imgbb.com/1/upload";

/// An image received from a form, ready to be forwarded.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

#[derive(Debug, thiserror::Error)]
pub enum ImageHostError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("Image upload request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The host returned a non-2xx status code.
    #[error("Image host error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("Image host returned an unreadable response: {0}")]
    Decode(#[from] serde_json::Error),

    /// A 2xx response without `data.url`.
    #[error("Image host response did not include a URL")]
    MissingUrl,
}

/// Somewhere images can be uploaded to, returning a public URL.
#[async_trait]
pub trait ImageHost: Send + Sync {
    async fn upload(&self, image: ImageUpload) -> Result<String, ImageHostError>;
}

/// Image host endpoint and credential.
#[derive(Debug, Clone)]
pub struct ImageHostConfig {
    pub api_url: String,
    pub api_key: String,
}

impl ImageHostConfig {
    /// Load from environment variables.
    ///
    /// | Env var         | Default                            |
    /// |-----------------|------------------------------------|
    /// | `IMGBB_API_URL` | `https://api.imgbb.com/1/upload`   |
    /// | `IMGBB_API_KEY` | **required**                       |
    ///
    /// # Panics
    ///
    /// Panics if `IMGBB_API_KEY` is not set.
    pub fn from_env() -> Self {
        let api_url =
            std::env::var("IMGBB_API_URL").unwrap_or_else(|_| DEFAULT_IMGBB_API_URL.to_string());
        let api_key = std::env::var("IMGBB_API_KEY").expect("IMGBB_API_KEY must be set");
        Self { api_url, api_key }
    }
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    data: Option<UploadData>,
}

#[derive(Debug, Deserialize)]
struct UploadData {
    url: Option<String>,
}

/// Extract `data.url` from a successful upload response body.
pub fn hosted_url(body: &str) -> Result<String, ImageHostError> {
    let parsed: UploadResponse = serde_json::from_str(body)?;
    parsed
        .data
        .and_then(|d| d.url)
        .filter(|url| !url.is_empty())
        .ok_or(ImageHostError::MissingUrl)
}

/// HTTP client for an ImgBB-compatible upload endpoint.
pub struct ImgbbClient {
    client: reqwest::Client,
    config: ImageHostConfig,
}

impl ImgbbClient {
    pub fn new(config: ImageHostConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, config: ImageHostConfig) -> Self {
        Self { client, config }
    }
}

#[async_trait]
impl ImageHost for ImgbbClient {
    /// `POST {api_url}?key={api_key}` with the multipart field `image`.
    /// No retry and no size or type checks.
    async fn upload(&self, image: ImageUpload) -> Result<String, ImageHostError> {
        let size = image.bytes.len();
        let mut part = reqwest::multipart::Part::bytes(image.bytes).file_name(image.file_name);
        if let Some(content_type) = image.content_type.as_deref() {
            part = part.mime_str(content_type)?;
        }
        let form = reqwest::multipart::Form::new().part("image", part);

        let response = self
            .client
            .post(&self.config.api_url)
            .query(&[("key", self.config.api_key.as_str())])
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ImageHostError::Api {
                status: status.as_u16(),
                body: error_body(response).await,
            });
        }

        let url = hosted_url(&response.text().await?)?;
        tracing::debug!(size, url = %url, "Image uploaded");
        Ok(url)
    }
}
