//! Shared test utilities for wsprobe-core integration tests
//!
//! Provides a scripted WebSocket server on an ephemeral port and a listener
//! that records probe progress.

use std::net::SocketAddr;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::io::AsyncWriteExt;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use wsprobe_core::{ProbeListener, ProbeReport};

/// What the server does after replying to the request
#[allow(dead_code)]
#[derive(Debug, Clone, Copy)]
pub enum Ending {
    /// Keep the connection open until the client closes it
    Hold,
    /// Send a close frame
    Close,
    /// Drop the TCP connection without a closing handshake
    Drop,
    /// Write a text frame with invalid UTF-8, then wait for the client to leave
    Corrupt,
}

/// Invalid UTF-8 in an unmasked text frame
const CORRUPT_TEXT_FRAME: [u8; 4] = [0x81, 0x02, 0xff, 0xfe];

/// What the server observed from the client
#[derive(Debug, Default)]
pub struct ServerLog {
    /// Text frames received, in order
    pub received: Vec<String>,
    /// Whether the client sent a close frame
    pub saw_close: bool,
}

/// Server behaviour for a single accepted connection
#[derive(Debug, Clone)]
pub struct Script {
    pub replies: Vec<String>,
    pub ending: Ending,
}

impl Script {
    #[allow(dead_code)]
    pub fn new(replies: &[&str], ending: Ending) -> Self {
        Self {
            replies: replies.iter().map(|r| r.to_string()).collect(),
            ending,
        }
    }
}

/// Scripted WebSocket server accepting exactly one connection
pub struct TestServer {
    pub addr: SocketAddr,
    handle: JoinHandle<ServerLog>,
}

impl TestServer {
    pub fn url(&self) -> String {
        format!("ws://{}", self.addr)
    }

    /// Waits for the connection to end and returns what the server saw
    pub async fn log(self) -> ServerLog {
        tokio::time::timeout(Duration::from_secs(5), self.handle)
            .await
            .expect("Test server did not finish")
            .expect("Test server panicked")
    }
}

/// Spawns the server in a background task, returns once it is listening
pub async fn spawn_server(script: Script) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut ws = tokio_tungstenite::accept_async(stream).await.unwrap();
        let mut log = ServerLog::default();

        // Wait for the request before replying
        while let Some(Ok(msg)) = ws.next().await {
            if let Message::Text(text) = msg {
                log.received.push(text.to_string());
                break;
            }
        }

        for reply in script.replies {
            ws.send(Message::text(reply)).await.unwrap();
        }

        match script.ending {
            Ending::Hold => {
                while let Some(Ok(msg)) = ws.next().await {
                    match msg {
                        Message::Text(text) => log.received.push(text.to_string()),
                        Message::Close(_) => {
                            log.saw_close = true;
                            break;
                        }
                        _ => {}
                    }
                }
            }
            Ending::Close => {
                let _ = ws.close(None).await;
            }
            Ending::Drop => {}
            Ending::Corrupt => {
                ws.get_mut().write_all(&CORRUPT_TEXT_FRAME).await.unwrap();
                ws.get_mut().flush().await.unwrap();
                while let Some(Ok(_)) = ws.next().await {}
            }
        }

        log
    });

    TestServer { addr, handle }
}

/// Returns a loopback address with nothing listening on it
#[allow(dead_code)]
pub async fn unused_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

/// Listener that keeps everything the probe reports
#[derive(Debug, Default)]
pub struct RecordingListener {
    pub connected: Vec<String>,
    pub messages: Vec<(u64, String)>,
    pub finished: Vec<ProbeReport>,
}

impl ProbeListener for RecordingListener {
    fn connected(&mut self, url: &str) {
        self.connected.push(url.to_string());
    }

    fn message(&mut self, index: u64, text: &str) {
        self.messages.push((index, text.to_string()));
    }

    fn finished(&mut self, report: &ProbeReport) {
        self.finished.push(report.clone());
    }
}
