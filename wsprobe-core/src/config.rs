//! Probe configuration

use std::time::Duration;

use url::Url;

use crate::error::ProbeError;

/// Endpoint probed when nothing else is configured
pub const DEFAULT_URL: &str = "ws://127.0.0.1:9624";

/// Event name sent in the request payload
pub const DEFAULT_EVENT: &str = "Freadall";

/// Observation window, measured from connection open
pub const DEFAULT_WINDOW: Duration = Duration::from_secs(15);

/// Upper bound on the single connection attempt
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Whole milliseconds in `duration`, saturating at `u64::MAX`
pub fn duration_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Settings for a single probe run
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeConfig {
    /// WebSocket endpoint (`ws://` only)
    pub url: String,
    /// Value of the `evt` field in the request payload
    pub event: String,
    /// How long to count messages after the connection opens
    pub window: Duration,
    /// How long the connection attempt may take
    pub connect_timeout: Duration,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            event: DEFAULT_EVENT.to_string(),
            window: DEFAULT_WINDOW,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }
}

impl ProbeConfig {
    /// Config for the given endpoint with every other setting at its default
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// Check the endpoint is a plaintext WebSocket URL with a host
    pub fn validate(&self) -> Result<(), ProbeError> {
        let invalid = |reason: String| ProbeError::InvalidEndpoint {
            url: self.url.clone(),
            reason,
        };

        let url = Url::parse(&self.url).map_err(|e| invalid(e.to_string()))?;
        match url.scheme() {
            "ws" => {}
            "wss" => return Err(invalid("TLS endpoints are not supported".to_string())),
            other => return Err(invalid(format!("unsupported scheme '{}'", other))),
        }
        if url.host_str().is_none_or(str::is_empty) {
            return Err(invalid("missing host".to_string()));
        }
        Ok(())
    }
}
