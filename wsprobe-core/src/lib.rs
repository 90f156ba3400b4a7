//! wsprobe-core: WebSocket reachability probe
//!
//! This crate provides the probe harness used by the `wsprobe` binary:
//!
//! - **Probe** - [`Probe`] connects once, sends one [`RequestEvent`], and counts
//!   inbound messages for a bounded observation window
//! - **Session** - [`Session`] tracks the connection state machine and message count
//! - **Report** - [`ProbeReport`] describes how the session ended and carries the verdict
//!
//! The harness never exits the process. Hosts turn a [`ProbeReport`] into an
//! exit code with [`ProbeReport::exit_code`].
//!
//! # Quick Start
//!
//! ```no_run
//! use wsprobe_core::{Probe, ProbeConfig};
//!
//! async fn example() -> Result<(), wsprobe_core::ProbeError> {
//!     let probe = Probe::new(ProbeConfig::default())?;
//!     let report = probe.run().await?;
//!     println!("received {} message(s)", report.message_count);
//!     std::process::exit(report.exit_code().into());
//! }
//! ```

pub mod config;
pub mod error;
pub mod listener;
pub mod payload;
pub mod probe;
pub mod report;
pub mod session;

pub use config::{
    DEFAULT_CONNECT_TIMEOUT, DEFAULT_EVENT, DEFAULT_URL, DEFAULT_WINDOW, ProbeConfig,
    duration_millis,
};
pub use error::{ProbeError, SessionError};
pub use listener::{ProbeListener, SilentListener};
pub use payload::RequestEvent;
pub use probe::Probe;
pub use report::{Phase, ProbeReport, Termination};
pub use session::{ConnectionState, Session};
