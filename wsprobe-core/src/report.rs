//! Outcome of a probe run

use serde::{Deserialize, Serialize};

use crate::error::ProbeError;

/// Where in the session a connection error happened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Connecting,
    Open,
}

/// Why a session ended. The first of these to happen wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Termination {
    /// The observation window ran out while the connection was still open
    WindowElapsed,
    /// The server closed the connection (close frame, EOF or reset)
    ClosedByPeer { code: Option<u16> },
    /// Transport failure
    ConnectionError { phase: Phase, message: String },
}

/// Result of one probe run, returned instead of exiting the process
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbeReport {
    pub url: String,
    pub event: String,
    pub message_count: u64,
    pub payload_sent: bool,
    pub termination: Termination,
    /// Milliseconds between connection open and the end of the session
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observed_ms: Option<u64>,
}

impl ProbeReport {
    /// Pass or fail.
    ///
    /// An elapsed window passes even with zero messages; a peer close only
    /// passes if at least one message arrived.
    pub fn verdict(&self) -> Result<(), ProbeError> {
        match &self.termination {
            Termination::ConnectionError { phase, message } => Err(ProbeError::Connection {
                phase: *phase,
                message: message.clone(),
            }),
            Termination::ClosedByPeer { .. } if self.message_count == 0 => {
                Err(ProbeError::NoMessagesReceived)
            }
            Termination::WindowElapsed | Termination::ClosedByPeer { .. } => Ok(()),
        }
    }

    pub fn passed(&self) -> bool {
        self.verdict().is_ok()
    }

    /// Process exit code for this report: 0 on pass, 1 on failure
    pub fn exit_code(&self) -> u8 {
        if self.passed() { 0 } else { 1 }
    }
}
