//! Backend HTTP Client
//!
//! Thin wrapper over the placement backend's three endpoints. Every call goes
//! to the single configured origin; the profile endpoint carries the session's
//! bearer token. Any non-2xx answer is a failure, and nothing is retried.

pub mod types;

pub use types::{LoginRequest, LoginResponse, RegisterRequest, Role};

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

use crate::config::BackendConfig;
use crate::error::ErrorCode;
use crate::profile::SubmissionPayload;

const LOGIN_PATH: &str = "/auth/login";
const REGISTER_PATH: &str = "/auth/register";
const PROFILE_PATH: &str = "/student/profile";
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("backend returned status {status}")]
    Status { status: u16, message: Option<String> },

    #[error("backend did not respond in time")]
    Timeout,

    #[error("could not reach backend: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("not logged in")]
    NotAuthenticated,

    #[error("invalid backend url: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Status { .. } => ErrorCode::Backend,
            Self::Timeout | Self::Transport(_) => ErrorCode::Network,
            Self::NotAuthenticated => ErrorCode::Session,
            Self::InvalidUrl(_) => ErrorCode::Config,
        }
    }

    /// Message the backend supplied, if any.
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Status { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Transport(err)
        }
    }
}

/// Operations the screens need from the backend.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PlacementBackend: Send + Sync {
    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError>;

    async fn register(&self, request: &RegisterRequest) -> Result<(), ApiError>;

    async fn submit_profile(
        &self,
        token: &str,
        payload: &SubmissionPayload,
    ) -> Result<(), ApiError>;
}

/// reqwest-backed client for the placement backend
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    client: Client,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let base_url = base_url.trim().trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ApiError::InvalidUrl(base_url));
        }

        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(DEFAULT_CONNECT_TIMEOUT.min(timeout))
            .user_agent(concat!("placement-hub/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ApiError::Transport)?;

        Ok(Self { base_url, client })
    }

    pub fn from_config(config: &BackendConfig) -> Result<Self, ApiError> {
        Self::new(&config.base_url, config.timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn post_json<T: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
        bearer: Option<&str>,
    ) -> Result<String, ApiError> {
        let mut request = self.client.post(self.url(path)).json(body);
        if let Some(token) = bearer {
            request = request.bearer_auth(token);
        }

        tracing::debug!("POST {}", path);
        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        tracing::debug!("POST {} -> {}", path, status);

        if !status.is_success() {
            let message = extract_error_message(&text);
            tracing::warn!(
                "POST {} failed with {}: {}",
                path,
                status,
                message.as_deref().unwrap_or("<no message>")
            );
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        Ok(text)
    }
}

#[async_trait]
impl PlacementBackend for ApiClient {
    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError> {
        let body = self.post_json(LOGIN_PATH, request, None).await?;
        if body.trim().is_empty() {
            return Ok(LoginResponse::default());
        }
        match serde_json::from_str(&body) {
            Ok(parsed) => Ok(parsed),
            Err(e) => {
                tracing::warn!("Login response was not the expected JSON: {}", e);
                Ok(LoginResponse::default())
            }
        }
    }

    async fn register(&self, request: &RegisterRequest) -> Result<(), ApiError> {
        self.post_json(REGISTER_PATH, request, None).await?;
        Ok(())
    }

    async fn submit_profile(
        &self,
        token: &str,
        payload: &SubmissionPayload,
    ) -> Result<(), ApiError> {
        if token.is_empty() {
            return Err(ApiError::NotAuthenticated);
        }
        self.post_json(PROFILE_PATH, payload, Some(token)).await?;
        Ok(())
    }
}

/// Best-effort extraction of a human-readable message from an error body.
///
/// Understands `{"detail": "..."}`, FastAPI-style `{"detail": [{"msg": "..."}]}`,
/// `{"message": "..."}` and `{"error": "..."}`.
pub fn extract_error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;

    let from_detail = match value.get("detail") {
        Some(serde_json::Value::String(s)) => Some(s.clone()),
        Some(serde_json::Value::Array(items)) => items
            .iter()
            .find_map(|item| item.get("msg").and_then(|m| m.as_str()))
            .map(str::to_string),
        _ => None,
    };

    from_detail
        .or_else(|| value.get("message").and_then(|m| m.as_str()).map(str::to_string))
        .or_else(|| value.get("error").and_then(|m| m.as_str()).map(str::to_string))
        .filter(|m| !m.trim().is_empty())
}
