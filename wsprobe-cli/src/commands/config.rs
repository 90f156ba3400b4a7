//! Config command: inspect the merged configuration

use anyhow::Result;
use clap::{Args, Subcommand};
use wsprobe_core::ProbeConfig;

use crate::config::{ConfigLoader, ProbeSection};

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show current configuration (merged) and whether its endpoint is usable
    Show,
    /// Show configuration file paths
    Path,
}

pub fn run(args: ConfigArgs) -> Result<()> {
    match args.command {
        ConfigCommands::Show => show_config(),
        ConfigCommands::Path => show_paths(),
    }
}

fn show_config() -> Result<()> {
    let config = ConfigLoader::load()?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{}", toml_str);
    println!("{}", endpoint_status(&config.probe));
    Ok(())
}

/// One-line summary of whether `run` would accept the configured endpoint
fn endpoint_status(section: &ProbeSection) -> String {
    match ProbeConfig::from(section).validate() {
        Ok(()) => format!("Endpoint: {} (ok)", section.url),
        Err(e) => format!("Endpoint: {} (invalid: {})", section.url, e),
    }
}

fn show_paths() -> Result<()> {
    println!("User config:    {:?}", ConfigLoader::user_config_path());
    println!("Project config: {:?}", ConfigLoader::project_config_path());
    Ok(())
}
