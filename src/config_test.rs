use std::collections::HashMap;

use super::*;

fn config_from(pairs: &[(&str, &str)]) -> Result<StudioConfig, ServiceError> {
    let vars: HashMap<String, String> = pairs.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect();
    StudioConfig::from_lookup(|key| vars.get(key).cloned())
}

#[test]
fn defaults_when_nothing_is_set() {
    let cfg = config_from(&[]).unwrap();
    assert_eq!(cfg.api_url, None);
    assert_eq!(
        cfg.timeouts,
        HttpTimeouts { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    );
    assert!(cfg.placement_hints);
    assert_eq!(cfg.placement_seed, None);
    assert_eq!(cfg.background, None);
}

#[test]
fn parses_overrides() {
    let cfg = config_from(&[
        ("STUDIO_API_URL", "https://studio.test/api/"),
        ("STUDIO_REQUEST_TIMEOUT_SECS", "42"),
        ("STUDIO_CONNECT_TIMEOUT_SECS", "7"),
        ("STUDIO_PLACEMENT_HINTS", "off"),
        ("STUDIO_PLACEMENT_SEED", "1234"),
        ("STUDIO_BACKGROUND", "backgrounds/sunset.png"),
    ])
    .unwrap();
    assert_eq!(cfg.api_url.as_deref(), Some("https://studio.test/api"));
    assert_eq!(cfg.timeouts, HttpTimeouts { request_secs: 42, connect_secs: 7 });
    assert!(!cfg.placement_hints);
    assert_eq!(cfg.placement_seed, Some(1234));
    assert_eq!(cfg.background.as_deref(), Some("backgrounds/sunset.png"));
}

#[test]
fn blank_api_url_counts_as_unset() {
    let cfg = config_from(&[("STUDIO_API_URL", "   ")]).unwrap();
    assert_eq!(cfg.api_url, None);
}

#[test]
fn bad_timeout_errors() {
    let err = config_from(&[("STUDIO_REQUEST_TIMEOUT_SECS", "soon")]).unwrap_err().to_string();
    assert!(err.contains("STUDIO_REQUEST_TIMEOUT_SECS"));
}

#[test]
fn bad_seed_errors() {
    let err = config_from(&[("STUDIO_PLACEMENT_SEED", "-1")]).unwrap_err();
    assert!(matches!(err, ServiceError::ConfigParse(_)));
}

#[test]
fn unknown_hint_switch_errors() {
    let err = config_from(&[("STUDIO_PLACEMENT_HINTS", "maybe")]).unwrap_err().to_string();
    assert!(err.contains("unsupported STUDIO_PLACEMENT_HINTS"));
}
