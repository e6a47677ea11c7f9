//! Password sign-in against the hosted identity service.
//!
//! Credentials are checked by the service, never locally. When it refuses,
//! its own message (e.g. `INVALID_LOGIN_CREDENTIALS`) is passed through
//! unchanged.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error_body;

pub const DEFAULT_IDENTITY_API_URL: &str = "https://identitytoolkit.googleapis.com/v1";

#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("Identity request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The service refused the sign-in. Displays the service's message only.
    #[error("{message}")]
    Rejected { status: u16, message: String },

    #[error("Identity service returned an unreadable response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// The account a successful sign-in belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedInUser {
    #[serde(alias = "localId")]
    pub uid: String,
    pub email: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn sign_in(&self, email: &str, password: &str) -> Result<SignedInUser, IdentityError>;
}

#[derive(Debug, Clone)]
pub struct IdentityConfig {
    pub api_url: String,
    pub api_key: String,
}

impl IdentityConfig {
    /// Load from environment variables.
    ///
    /// | Env var            | Default                                      |
    /// |--------------------|----------------------------------------------|
    /// | `IDENTITY_API_URL` | `https://identitytoolkit.googleapis.com/v1`  |
    /// | `IDENTITY_API_KEY` | **required**                                 |
    ///
    /// # Panics
    ///
    /// Panics if `IDENTITY_API_KEY` is not set.
    pub fn from_env() -> Self {
        Self {
            api_url: std::env::var("IDENTITY_API_URL")
                .unwrap_or_else(|_| DEFAULT_IDENTITY_API_URL.to_string()),
            api_key: std::env::var("IDENTITY_API_KEY").expect("IDENTITY_API_KEY must be set"),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

/// The service's own message from an error body, or the raw body when it
/// is not the usual `{"error": {"message": ...}}` shape.
pub fn rejection_message(body: &str) -> String {
    serde_json::from_str::<ErrorEnvelope>(body)
        .map(|envelope| envelope.error.message)
        .unwrap_or_else(|_| body.to_string())
}

/// Client for the `accounts:signInWithPassword` endpoint.
pub struct FirebaseIdentityClient {
    client: reqwest::Client,
    config: IdentityConfig,
}

impl FirebaseIdentityClient {
    pub fn new(config: IdentityConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    pub fn with_client(client: reqwest::Client, config: IdentityConfig) -> Self {
        Self { client, config }
    }
}

#[async_trait]
impl IdentityProvider for FirebaseIdentityClient {
    async fn sign_in(&self, email: &str, password: &str) -> Result<SignedInUser, IdentityError> {
        let body = serde_json::json!({
            "email": email,
            "password": password,
            "returnSecureToken": true,
        });

        let response = self
            .client
            .post(format!("{}/accounts:signInWithPassword", self.config.api_url))
            .query(&[("key", self.config.api_key.as_str())])
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(IdentityError::Rejected {
                status: status.as_u16(),
                message: rejection_message(&error_body(response).await),
            });
        }
        Ok(serde_json::from_str(&response.text().await?)?)
    }
}
