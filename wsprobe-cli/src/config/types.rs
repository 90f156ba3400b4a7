use std::time::Duration;

use serde::{Deserialize, Serialize};
use wsprobe_core::{
    DEFAULT_CONNECT_TIMEOUT, DEFAULT_EVENT, DEFAULT_URL, DEFAULT_WINDOW, ProbeConfig,
    duration_millis,
};

/// Configuration as stored in TOML files (with optional fields for merging)
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawWsProbeConfig {
    #[serde(default)]
    pub probe: RawProbeSection,
}

/// Probe section as stored in TOML (optional fields for proper merging)
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawProbeSection {
    pub url: Option<String>,
    pub event: Option<String>,
    pub window_ms: Option<u64>,
    pub connect_timeout_ms: Option<u64>,
}

/// Final configuration with defaults applied
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct WsProbeConfig {
    #[serde(default)]
    pub probe: ProbeSection,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProbeSection {
    /// WebSocket endpoint to probe
    pub url: String,

    /// Event name sent as `{"evt": ...}`
    pub event: String,

    /// Observation window after the connection opens
    pub window_ms: u64,

    /// Upper bound on the connection attempt
    pub connect_timeout_ms: u64,
}

impl Default for ProbeSection {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            event: DEFAULT_EVENT.to_string(),
            window_ms: duration_millis(DEFAULT_WINDOW),
            connect_timeout_ms: duration_millis(DEFAULT_CONNECT_TIMEOUT),
        }
    }
}

impl From<&ProbeSection> for ProbeConfig {
    fn from(section: &ProbeSection) -> Self {
        ProbeConfig {
            url: section.url.clone(),
            event: section.event.clone(),
            window: Duration::from_millis(section.window_ms),
            connect_timeout: Duration::from_millis(section.connect_timeout_ms),
        }
    }
}
