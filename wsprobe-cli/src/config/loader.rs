use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use tracing::debug;

use super::types::{ProbeSection, RawProbeSection, RawWsProbeConfig, WsProbeConfig};

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load merged configuration (user + project)
    pub fn load() -> Result<WsProbeConfig> {
        let mut layers = Vec::new();
        if let Some(user_path) = Self::user_config_path() {
            layers.push(user_path);
        }
        layers.push(Self::project_config_path());
        Self::load_layers(&layers)
    }

    /// Load and merge config files in order; later files win, missing files are skipped
    pub fn load_layers(paths: &[PathBuf]) -> Result<WsProbeConfig> {
        let mut raw = RawWsProbeConfig::default();

        for path in paths {
            if !path.exists() {
                continue;
            }
            debug!("Loading config from {}", path.display());
            let layer = Self::read_raw(path)?;
            raw = Self::merge_raw(raw, layer);
        }

        Ok(Self::finalize(raw))
    }

    /// Get user config path (platform-specific)
    pub fn user_config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "wsprobe").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Get project config path
    /// Can be overridden with WSPROBE_PROJECT_CONFIG_DIR env var (useful for isolated tests)
    pub fn project_config_path() -> PathBuf {
        if let Ok(dir) = std::env::var("WSPROBE_PROJECT_CONFIG_DIR") {
            PathBuf::from(dir).join("config.toml")
        } else {
            PathBuf::from(".wsprobe/config.toml")
        }
    }

    fn read_raw(path: &Path) -> Result<RawWsProbeConfig> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        toml::from_str(&contents).with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// Merge two raw configs (overlay values override base only if explicitly set)
    fn merge_raw(base: RawWsProbeConfig, overlay: RawWsProbeConfig) -> RawWsProbeConfig {
        RawWsProbeConfig {
            probe: RawProbeSection {
                url: overlay.probe.url.or(base.probe.url),
                event: overlay.probe.event.or(base.probe.event),
                window_ms: overlay.probe.window_ms.or(base.probe.window_ms),
                connect_timeout_ms: overlay
                    .probe
                    .connect_timeout_ms
                    .or(base.probe.connect_timeout_ms),
            },
        }
    }

    /// Convert raw config to final config with defaults applied
    fn finalize(raw: RawWsProbeConfig) -> WsProbeConfig {
        let defaults = ProbeSection::default();
        WsProbeConfig {
            probe: ProbeSection {
                url: raw.probe.url.unwrap_or(defaults.url),
                event: raw.probe.event.unwrap_or(defaults.event),
                window_ms: raw.probe.window_ms.unwrap_or(defaults.window_ms),
                connect_timeout_ms: raw
                    .probe
                    .connect_timeout_ms
                    .unwrap_or(defaults.connect_timeout_ms),
            },
        }
    }
}
