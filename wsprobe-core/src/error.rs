//! Error types for wsprobe-core

use thiserror::Error;

use crate::report::Phase;
use crate::session::ConnectionState;

/// Top-level error type for wsprobe-core
#[derive(Error, Debug)]
pub enum ProbeError {
    /// Transport-level failure reported by the WebSocket client
    #[error("{message}")]
    Connection { phase: Phase, message: String },

    /// The server closed the connection before sending anything
    #[error("No messages received from server")]
    NoMessagesReceived,

    #[error("Invalid endpoint {url}: {reason}")]
    InvalidEndpoint { url: String, reason: String },

    #[error("Failed to encode request payload: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),
}

/// Errors related to the session state machine
#[derive(Error, Debug, PartialEq)]
pub enum SessionError {
    #[error("Invalid state transition from {from} to {to}")]
    InvalidStateTransition {
        from: ConnectionState,
        to: ConnectionState,
    },

    #[error("Invalid state: expected {expected}, got {actual}")]
    InvalidState {
        expected: ConnectionState,
        actual: ConnectionState,
    },

    #[error("Request payload was already sent")]
    PayloadAlreadySent,
}
