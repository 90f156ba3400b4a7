//! Human-readable console output for a probe run

use std::io::{self, Write};

use wsprobe_core::{ProbeError, ProbeListener, ProbeReport, Termination};

/// Prints probe progress: progress lines to `out`, failures to `err`
pub struct ConsoleListener<O, E> {
    out: O,
    err: E,
    json: bool,
}

impl ConsoleListener<io::Stdout, io::Stderr> {
    pub fn stdio(json: bool) -> Self {
        Self::new(io::stdout(), io::stderr(), json)
    }
}

impl<O: Write, E: Write> ConsoleListener<O, E> {
    /// With `json` set, the final report is also printed as one JSON line
    pub fn new(out: O, err: E, json: bool) -> Self {
        Self { out, err, json }
    }

    #[cfg(test)]
    fn into_parts(self) -> (O, E) {
        (self.out, self.err)
    }
}

impl<O: Write + Send, E: Write + Send> ProbeListener for ConsoleListener<O, E> {
    fn connected(&mut self, _url: &str) {
        let _ = writeln!(self.out, "Connected to server");
    }

    fn message(&mut self, index: u64, text: &str) {
        let _ = writeln!(self.out, "Message {}: {}", index, text);
    }

    fn finished(&mut self, report: &ProbeReport) {
        if report.termination == Termination::WindowElapsed {
            let _ = writeln!(
                self.out,
                "Received {} message(s) in total",
                report.message_count
            );
        }

        match report.verdict() {
            Ok(()) => {}
            Err(ProbeError::NoMessagesReceived) => {
                let _ = writeln!(self.err, "FAILED: No messages received from server");
            }
            Err(e) => {
                let _ = writeln!(self.err, "Error: {}", e);
            }
        }

        if self.json {
            match serde_json::to_string(report) {
                Ok(json) => {
                    let _ = writeln!(self.out, "{}", json);
                }
                Err(e) => tracing::warn!("Failed to serialize report: {}", e),
            }
        }
    }
}
