//! Service error type shared by every backend client.

/// Errors produced by configuration and backend service calls.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// A configuration value could not be parsed.
    #[error("config parse failed: {0}")]
    ConfigParse(String),

    /// The call needs the backend API and no API URL is configured.
    #[error("Backend API URL not configured")]
    NotConfigured,

    /// The HTTP request failed before a response arrived.
    #[error("request failed: {0}")]
    Request(String),

    /// The backend returned a non-success HTTP status.
    #[error("response error: status {status}")]
    Response { status: u16, body: String },

    /// The response body could not be deserialized.
    #[error("response parse failed: {0}")]
    Parse(String),

    /// Asset bytes or a `data:` URL could not be decoded.
    #[error("decode failed: {0}")]
    Decode(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}
