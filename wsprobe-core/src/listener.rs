//! Hooks for observing a probe run as it happens

use crate::report::ProbeReport;

/// Receives probe progress in order: `connected`, then `message` per inbound
/// message, then `finished` exactly once.
///
/// `connected` is never called when the connection attempt fails.
pub trait ProbeListener: Send {
    /// The WebSocket handshake completed
    fn connected(&mut self, _url: &str) {}

    /// An inbound message arrived; `index` starts at 1
    fn message(&mut self, _index: u64, _text: &str) {}

    /// The session ended
    fn finished(&mut self, _report: &ProbeReport) {}
}

/// Listener that ignores everything
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentListener;

impl ProbeListener for SilentListener {}
