//! Outbound request payload

use serde::{Deserialize, Serialize};

/// Event message sent to the server once, right after the connection opens
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestEvent {
    pub evt: String,
}

impl RequestEvent {
    pub fn new(evt: impl Into<String>) -> Self {
        Self { evt: evt.into() }
    }

    /// Encode as the JSON text frame body
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
