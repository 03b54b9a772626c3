//! Studio configuration parsed from environment variables.

use crate::services::types::ServiceError;

pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Default for HttpTimeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudioConfig {
    /// Backend base URL without a trailing slash. `None` disables the
    /// hint, metadata, and background-removal services.
    pub api_url: Option<String>,
    pub timeouts: HttpTimeouts,
    pub placement_hints: bool,
    pub placement_seed: Option<u64>,
    pub background: Option<String>,
}

impl StudioConfig {
    /// Build typed config from environment variables.
    ///
    /// Optional:
    /// - `STUDIO_API_URL`: backend base URL
    /// - `STUDIO_REQUEST_TIMEOUT_SECS`: default 30
    /// - `STUDIO_CONNECT_TIMEOUT_SECS`: default 10
    /// - `STUDIO_PLACEMENT_HINTS`: `on` (default) or `off`
    /// - `STUDIO_PLACEMENT_SEED`: seed for the random placement search
    /// - `STUDIO_BACKGROUND`: background reference loaded at startup
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::ConfigParse`] for any value that does not parse.
    pub fn from_env() -> Result<Self, ServiceError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build typed config from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::ConfigParse`] for any value that does not parse.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ServiceError> {
        let api_url = non_empty(lookup("STUDIO_API_URL")).map(|url| url.trim_end_matches('/').to_string());
        let timeouts = HttpTimeouts {
            request_secs: parse_u64(&lookup, "STUDIO_REQUEST_TIMEOUT_SECS")?.unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_secs: parse_u64(&lookup, "STUDIO_CONNECT_TIMEOUT_SECS")?.unwrap_or(DEFAULT_CONNECT_TIMEOUT_SECS),
        };
        let placement_hints = parse_switch(lookup("STUDIO_PLACEMENT_HINTS").as_deref())?;
        let placement_seed = parse_u64(&lookup, "STUDIO_PLACEMENT_SEED")?;
        let background = non_empty(lookup("STUDIO_BACKGROUND"));

        Ok(Self { api_url, timeouts, placement_hints, placement_seed, background })
    }
}

fn non_empty(raw: Option<String>) -> Option<String> {
    raw.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn parse_u64(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<u64>, ServiceError> {
    match non_empty(lookup(key)) {
        None => Ok(None),
        Some(raw) => raw
            .parse::<u64>()
            .map(Some)
            .map_err(|e| ServiceError::ConfigParse(format!("{key}='{raw}': {e}"))),
    }
}

fn parse_switch(raw: Option<&str>) -> Result<bool, ServiceError> {
    match raw.map(str::trim).unwrap_or("on") {
        "on" | "" => Ok(true),
        "off" => Ok(false),
        other => Err(ServiceError::ConfigParse(format!(
            "unsupported STUDIO_PLACEMENT_HINTS '{other}' (expected 'on' or 'off')"
        ))),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
