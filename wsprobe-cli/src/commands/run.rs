//! Run command: probe the configured endpoint once

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Args;
use tracing::debug;
use wsprobe_core::{Probe, ProbeConfig};

use crate::config::{ConfigLoader, ProbeSection};
use crate::console::ConsoleListener;

/// Arguments for the `run` command; anything unset comes from config files
#[derive(Debug, Default, Args)]
pub struct RunArgs {
    /// WebSocket endpoint
    #[arg(short, long)]
    pub url: Option<String>,

    /// Event name sent as {"evt": ...}
    #[arg(short, long)]
    pub event: Option<String>,

    /// Observation window in milliseconds
    #[arg(short, long)]
    pub window_ms: Option<u64>,

    /// Connection attempt timeout in milliseconds
    #[arg(long)]
    pub connect_timeout_ms: Option<u64>,

    /// Print the final report as a JSON line
    #[arg(long)]
    pub json: bool,
}

impl RunArgs {
    /// Overlay command-line values onto the loaded section
    fn apply(&self, section: &mut ProbeSection) {
        if let Some(url) = &self.url {
            section.url = url.clone();
        }
        if let Some(event) = &self.event {
            section.event = event.clone();
        }
        if let Some(window_ms) = self.window_ms {
            section.window_ms = window_ms;
        }
        if let Some(timeout_ms) = self.connect_timeout_ms {
            section.connect_timeout_ms = timeout_ms;
        }
    }
}

/// Run the probe and map its report to an exit code
pub async fn run(args: RunArgs) -> Result<ExitCode> {
    let mut config = ConfigLoader::load().context("Failed to load configuration")?;
    args.apply(&mut config.probe);

    let probe = Probe::new(ProbeConfig::from(&config.probe))?;
    debug!(?config, "Starting probe");

    let mut console = ConsoleListener::stdio(args.json);
    let report = probe.run_with(&mut console).await?;

    Ok(ExitCode::from(report.exit_code()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        run: RunArgs,
    }

    #[test]
    fn parses_all_overrides() {
        let cli = TestCli::try_parse_from([
            "wsprobe",
            "--url",
            "ws://localhost:7000",
            "--event",
            "Fstatus",
            "--window-ms",
            "2000",
            "--connect-timeout-ms",
            "300",
            "--json",
        ])
        .unwrap();

        assert_eq!(cli.run.url.as_deref(), Some("ws://localhost:7000"));
        assert_eq!(cli.run.event.as_deref(), Some("Fstatus"));
        assert_eq!(cli.run.window_ms, Some(2000));
        assert_eq!(cli.run.connect_timeout_ms, Some(300));
        assert!(cli.run.json);
    }

    #[test]
    fn no_flags_leaves_config_untouched() {
        let cli = TestCli::try_parse_from(["wsprobe"]).unwrap();
        let mut section = ProbeSection::default();

        cli.run.apply(&mut section);

        assert_eq!(section, ProbeSection::default());
    }

    #[test]
    fn flags_override_loaded_values() {
        let cli = TestCli::try_parse_from(["wsprobe", "-u", "ws://10.1.1.1:9624", "-w", "500"])
            .unwrap();
        let mut section = ProbeSection {
            event: "Fcustom".to_string(),
            ..ProbeSection::default()
        };

        cli.run.apply(&mut section);

        assert_eq!(section.url, "ws://10.1.1.1:9624");
        assert_eq!(section.window_ms, 500);
        // Not given on the command line
        assert_eq!(section.event, "Fcustom");
    }

    #[test]
    fn rejects_non_numeric_window() {
        assert!(TestCli::try_parse_from(["wsprobe", "--window-ms", "soon"]).is_err());
    }
}
