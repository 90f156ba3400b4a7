//! Session state machine
//!
//! A session covers one connection lifecycle, from the connect attempt to the
//! end of the observation window. It owns the message counter and guards the
//! single send of the request payload.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::SessionError;
use crate::report::Termination;

/// Connection state of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionState {
    /// Not started
    Idle,
    /// Handshake in flight
    Connecting,
    /// Handshake done, counting messages
    Open,
    /// Terminal
    Closed,
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Connecting => "connecting",
            Self::Open => "open",
            Self::Closed => "closed",
        };
        f.write_str(name)
    }
}

/// State and counters for a single probe connection
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    state: ConnectionState,
    message_count: u64,
    payload_sent: bool,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            state: ConnectionState::Idle,
            message_count: 0,
            payload_sent: false,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn message_count(&self) -> u64 {
        self.message_count
    }

    pub fn payload_sent(&self) -> bool {
        self.payload_sent
    }

    /// Idle -> Connecting
    pub fn begin_connect(&mut self) -> Result<(), SessionError> {
        self.transition(ConnectionState::Idle, ConnectionState::Connecting)
    }

    /// Connecting -> Open
    pub fn open(&mut self) -> Result<(), SessionError> {
        self.transition(ConnectionState::Connecting, ConnectionState::Open)
    }

    /// Record that the request payload went out. Allowed once, while open.
    pub fn mark_payload_sent(&mut self) -> Result<(), SessionError> {
        self.require(ConnectionState::Open)?;
        if self.payload_sent {
            return Err(SessionError::PayloadAlreadySent);
        }
        self.payload_sent = true;
        Ok(())
    }

    /// Count an inbound message and return its 1-based sequence number
    pub fn record_message(&mut self) -> Result<u64, SessionError> {
        self.require(ConnectionState::Open)?;
        self.message_count += 1;
        Ok(self.message_count)
    }

    /// Move to Closed for the given reason.
    ///
    /// Errors can end a session that is still connecting; the timer and a
    /// peer close only apply once the connection is open.
    pub fn close(&mut self, termination: &Termination) -> Result<(), SessionError> {
        let allowed = match termination {
            Termination::ConnectionError { .. } => matches!(
                self.state,
                ConnectionState::Connecting | ConnectionState::Open
            ),
            Termination::WindowElapsed | Termination::ClosedByPeer { .. } => {
                self.state == ConnectionState::Open
            }
        };
        if !allowed {
            return Err(SessionError::InvalidStateTransition {
                from: self.state,
                to: ConnectionState::Closed,
            });
        }
        self.state = ConnectionState::Closed;
        Ok(())
    }

    fn transition(
        &mut self,
        from: ConnectionState,
        to: ConnectionState,
    ) -> Result<(), SessionError> {
        if self.state != from {
            return Err(SessionError::InvalidStateTransition {
                from: self.state,
                to,
            });
        }
        self.state = to;
        Ok(())
    }

    fn require(&self, expected: ConnectionState) -> Result<(), SessionError> {
        if self.state != expected {
            return Err(SessionError::InvalidState {
                expected,
                actual: self.state,
            });
        }
        Ok(())
    }
}
