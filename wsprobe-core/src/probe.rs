//! The probe loop
//!
//! One task owns the connection and the observation timer and reacts to
//! whichever fires first: the timer, an inbound frame, a close, or an error.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::time::{self, Instant};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::error::ProtocolError;
use tokio_tungstenite::tungstenite::{Error as WsError, Message};
use tracing::{debug, warn};

use crate::config::{ProbeConfig, duration_millis};
use crate::error::ProbeError;
use crate::listener::{ProbeListener, SilentListener};
use crate::payload::RequestEvent;
use crate::report::{Phase, ProbeReport, Termination};
use crate::session::Session;

/// How long to wait for our close frame to be flushed when the window ends
const CLOSE_GRACE: Duration = Duration::from_secs(1);

/// WebSocket reachability probe
#[derive(Debug, Clone)]
pub struct Probe {
    config: ProbeConfig,
}

impl Probe {
    /// Create a probe, rejecting endpoints it cannot connect to
    pub fn new(config: ProbeConfig) -> Result<Self, ProbeError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ProbeConfig {
        &self.config
    }

    /// Run one session without observing progress
    pub async fn run(&self) -> Result<ProbeReport, ProbeError> {
        self.run_with(&mut SilentListener).await
    }

    /// Run one session, reporting progress to `listener`.
    ///
    /// Connection failures and zero-message closes are described by the
    /// returned report; `Err` is reserved for problems that prevent a session
    /// from running at all.
    pub async fn run_with(
        &self,
        listener: &mut dyn ProbeListener,
    ) -> Result<ProbeReport, ProbeError> {
        let request = RequestEvent::new(&self.config.event).to_json()?;
        let mut session = Session::new();
        session.begin_connect()?;

        debug!(url = %self.config.url, "Connecting");
        let attempt = time::timeout(
            self.config.connect_timeout,
            connect_async(self.config.url.as_str()),
        )
        .await;

        let ws_stream = match attempt {
            Ok(Ok((ws_stream, _response))) => ws_stream,
            Ok(Err(e)) => {
                let termination = connection_error(Phase::Connecting, &e);
                return self.finish(session, termination, None, listener);
            }
            Err(_) => {
                let termination = Termination::ConnectionError {
                    phase: Phase::Connecting,
                    message: format!(
                        "Connection attempt timed out after {}ms",
                        duration_millis(self.config.connect_timeout)
                    ),
                };
                return self.finish(session, termination, None, listener);
            }
        };

        session.open()?;
        let opened_at = Instant::now();
        listener.connected(&self.config.url);

        let (mut ws_sender, mut ws_receiver) = ws_stream.split();

        debug!("Sending: {}", request);
        if let Err(e) = ws_sender.send(Message::text(request)).await {
            let termination = connection_error(Phase::Open, &e);
            return self.finish(session, termination, Some(opened_at), listener);
        }
        session.mark_payload_sent()?;

        let window = time::sleep(self.config.window);
        tokio::pin!(window);

        let termination = loop {
            tokio::select! {
                _ = &mut window => {
                    debug!(count = session.message_count(), "Observation window elapsed");
                    match time::timeout(CLOSE_GRACE, ws_sender.close()).await {
                        Ok(Ok(())) => {}
                        Ok(Err(e)) => warn!("Failed to close WebSocket: {}", e),
                        Err(_) => warn!("Timed out sending close frame"),
                    }
                    break Termination::WindowElapsed;
                }
                frame = ws_receiver.next() => match frame {
                    Some(Ok(Message::Text(text))) => {
                        let index = session.record_message()?;
                        debug!(index, "Received text message");
                        listener.message(index, text.as_str());
                    }
                    Some(Ok(Message::Binary(data))) => {
                        let index = session.record_message()?;
                        debug!(index, len = data.len(), "Received binary message");
                        listener.message(index, &String::from_utf8_lossy(&data));
                    }
                    Some(Ok(Message::Close(frame))) => {
                        debug!("Received close message: {:?}", frame);
                        break Termination::ClosedByPeer {
                            code: frame.map(|f| u16::from(f.code)),
                        };
                    }
                    Some(Ok(Message::Ping(_) | Message::Pong(_) | Message::Frame(_))) => {
                        // Pong is automatically sent by tungstenite
                    }
                    Some(Err(e)) if is_peer_close(&e) => {
                        debug!("Connection closed by peer: {}", e);
                        break Termination::ClosedByPeer { code: None };
                    }
                    Some(Err(e)) => break connection_error(Phase::Open, &e),
                    None => break Termination::ClosedByPeer { code: None },
                }
            }
        };

        self.finish(session, termination, Some(opened_at), listener)
    }

    fn finish(
        &self,
        mut session: Session,
        termination: Termination,
        opened_at: Option<Instant>,
        listener: &mut dyn ProbeListener,
    ) -> Result<ProbeReport, ProbeError> {
        session.close(&termination)?;

        let report = ProbeReport {
            url: self.config.url.clone(),
            event: self.config.event.clone(),
            message_count: session.message_count(),
            payload_sent: session.payload_sent(),
            termination,
            observed_ms: opened_at.map(|at| duration_millis(at.elapsed())),
        };
        debug!(
            count = report.message_count,
            passed = report.passed(),
            "Probe finished"
        );
        listener.finished(&report);
        Ok(report)
    }
}

fn connection_error(phase: Phase, e: &WsError) -> Termination {
    Termination::ConnectionError {
        phase,
        message: e.to_string(),
    }
}

/// Errors that mean the peer went away rather than the transport failing
fn is_peer_close(e: &WsError) -> bool {
    matches!(
        e,
        WsError::ConnectionClosed
            | WsError::AlreadyClosed
            | WsError::Protocol(ProtocolError::ResetWithoutClosingHandshake)
    )
}
