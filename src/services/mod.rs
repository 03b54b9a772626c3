//! Backend service clients used by the editing session.
//!
//! ARCHITECTURE
//! ============
//! Each external collaborator sits behind an async trait (`HintSource`,
//! `AssetBackend`) so the session can be driven by mocks in tests.
//! `HttpBackend` is the production implementation of both; it talks to the
//! studio backend when an API URL is configured and still fetches absolute
//! and `data:` asset references when it is not.

pub mod assets;
pub mod hint;
pub mod types;

use std::time::Duration;

use reqwest::Response;

use crate::config::{HttpTimeouts, StudioConfig};
use types::ServiceError;

/// HTTP client for the studio backend.
pub struct HttpBackend {
    http: reqwest::Client,
    base_url: Option<String>,
}

impl HttpBackend {
    /// Build a client with the given timeouts. `base_url` should already be
    /// trimmed of trailing slashes.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::HttpClientBuild`] if the HTTP client fails to build.
    pub fn new(base_url: Option<String>, timeouts: HttpTimeouts) -> Result<Self, ServiceError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeouts.request_secs))
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .build()
            .map_err(|e| ServiceError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, base_url })
    }

    /// Build a client from parsed config.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::HttpClientBuild`] if the HTTP client fails to build.
    pub fn from_config(config: &StudioConfig) -> Result<Self, ServiceError> {
        Self::new(config.api_url.clone(), config.timeouts)
    }

    #[must_use]
    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    fn endpoint(&self, path: &str) -> Result<String, ServiceError> {
        let base = self.base_url.as_deref().ok_or(ServiceError::NotConfigured)?;
        Ok(format!("{base}{path}"))
    }
}

/// Fail on non-success status, otherwise hand the response back.
async fn check_status(response: Response) -> Result<Response, ServiceError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response
        .text()
        .await
        .map_err(|e| ServiceError::Request(e.to_string()))?;
    Err(ServiceError::Response { status: status.as_u16(), body })
}

async fn read_text(response: Response) -> Result<String, ServiceError> {
    check_status(response)
        .await?
        .text()
        .await
        .map_err(|e| ServiceError::Request(e.to_string()))
}

async fn read_bytes(response: Response) -> Result<Vec<u8>, ServiceError> {
    let bytes = check_status(response)
        .await?
        .bytes()
        .await
        .map_err(|e| ServiceError::Request(e.to_string()))?;
    Ok(bytes.to_vec())
}
