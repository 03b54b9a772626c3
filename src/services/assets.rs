//! Asset fetch, decode, metadata, and background removal.
//!
//! Asset references are either inline `data:` URLs, absolute `http(s)` URLs,
//! or paths relative to the backend API. Decoding only reads the image
//! header; the intrinsic size is all placement needs.

use std::io::Cursor;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::Deserialize;

use super::types::ServiceError;
use super::{HttpBackend, read_bytes, read_text};

/// Optional description of an asset, used to enrich the hint request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AssetMetadata {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

/// Fetches assets and runs backend image services.
#[async_trait::async_trait]
pub trait AssetBackend: Send + Sync {
    /// Raw bytes of the asset behind `reference`.
    async fn fetch(&self, reference: &str) -> Result<Vec<u8>, ServiceError>;

    async fn metadata(&self, reference: &str) -> Result<AssetMetadata, ServiceError>;

    /// Send image bytes for background removal and return the processed PNG.
    async fn remove_background(&self, bytes: Vec<u8>) -> Result<Vec<u8>, ServiceError>;

    /// Whether backend-only services (metadata, background removal) can be reached.
    fn api_configured(&self) -> bool;
}

// =============================================================================
// DECODING
// =============================================================================

/// Decode the payload of a base64 `data:` URL.
///
/// # Errors
///
/// Returns [`ServiceError::Decode`] if the URL is not a base64 `data:` URL.
pub fn decode_data_url(url: &str) -> Result<Vec<u8>, ServiceError> {
    let rest = url
        .strip_prefix("data:")
        .ok_or_else(|| ServiceError::Decode("not a data: URL".into()))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| ServiceError::Decode("data: URL has no payload".into()))?;
    if !header.ends_with(";base64") {
        return Err(ServiceError::Decode(format!("unsupported data: URL encoding '{header}'")));
    }
    STANDARD.decode(payload.trim()).map_err(|e| ServiceError::Decode(e.to_string()))
}

/// Encode bytes as a base64 `data:` URL.
#[must_use]
pub fn to_data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", STANDARD.encode(bytes))
}

/// Intrinsic `(width, height)` of an encoded image.
///
/// # Errors
///
/// Returns [`ServiceError::Decode`] if the format is unknown, the header is
/// unreadable, or either dimension is zero.
pub fn decode_dimensions(bytes: &[u8]) -> Result<(u32, u32), ServiceError> {
    let (width, height) = image::ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| ServiceError::Decode(e.to_string()))?
        .into_dimensions()
        .map_err(|e| ServiceError::Decode(e.to_string()))?;
    if width == 0 || height == 0 {
        return Err(ServiceError::Decode(format!("image has empty size {width}x{height}")));
    }
    Ok((width, height))
}

/// Width over height.
#[must_use]
pub fn aspect_ratio((width, height): (u32, u32)) -> f64 {
    f64::from(width) / f64::from(height)
}

// =============================================================================
// HTTP BACKEND
// =============================================================================

impl HttpBackend {
    fn asset_url(&self, reference: &str) -> Result<String, ServiceError> {
        if reference.starts_with("http://") || reference.starts_with("https://") {
            return Ok(reference.to_string());
        }
        let path = if reference.starts_with('/') { reference.to_string() } else { format!("/{reference}") };
        self.endpoint(&path)
    }
}

#[async_trait::async_trait]
impl AssetBackend for HttpBackend {
    async fn fetch(&self, reference: &str) -> Result<Vec<u8>, ServiceError> {
        if reference.starts_with("data:") {
            return decode_data_url(reference);
        }
        let url = self.asset_url(reference)?;
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| ServiceError::Request(e.to_string()))?;
        read_bytes(response).await
    }

    async fn metadata(&self, reference: &str) -> Result<AssetMetadata, ServiceError> {
        let url = self.endpoint("/assets/metadata")?;
        let response = self
            .http
            .get(url)
            .query(&[("reference", reference)])
            .send()
            .await
            .map_err(|e| ServiceError::Request(e.to_string()))?;
        let text = read_text(response).await?;
        serde_json::from_str(&text).map_err(|e| ServiceError::Parse(e.to_string()))
    }

    async fn remove_background(&self, bytes: Vec<u8>) -> Result<Vec<u8>, ServiceError> {
        let url = self.endpoint("/remove-background")?;
        let response = self
            .http
            .post(url)
            .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
            .body(bytes)
            .send()
            .await
            .map_err(|e| ServiceError::Request(e.to_string()))?;
        read_bytes(response).await
    }

    fn api_configured(&self) -> bool {
        self.base_url.is_some()
    }
}

#[cfg(test)]
#[path = "assets_test.rs"]
mod tests;
