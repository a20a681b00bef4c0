use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Probe timeouts (optional section in config.toml).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbeConfig {
    /// Connect timeout in seconds for HTTP(S) probes.
    pub connect_timeout_secs: u64,
    /// Whole-request timeout in seconds for HTTP(S) probes.
    pub timeout_secs: u64,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 15,
            timeout_secs: 30,
        }
    }
}

/// Global configuration loaded from `~/.config/resload/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoaderConfig {
    /// Document base URL requests are resolved against. When unset, the CLI
    /// uses the current directory as a `file://` URL.
    #[serde(default)]
    pub base_url: Option<String>,
    /// Resources declared present from the start (e.g. inlined at build time).
    #[serde(default)]
    pub preloaded: Vec<String>,
    /// Emit the loader's diagnostic trace at debug level.
    #[serde(default)]
    pub debug_trace: bool,
    /// Optional probe timeouts; if missing, built-in defaults are used.
    #[serde(default)]
    pub probe: Option<ProbeConfig>,
}

impl LoaderConfig {
    /// Probe settings, falling back to defaults.
    pub fn probe_or_default(&self) -> ProbeConfig {
        self.probe.clone().unwrap_or_default()
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("resload")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<LoaderConfig> {
    load_or_init_at(&config_path()?)
}

/// Like [`load_or_init`] but at an explicit path.
pub fn load_or_init_at(path: &std::path::Path) -> Result<LoaderConfig> {
    if !path.exists() {
        let default_cfg = LoaderConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(path)?;
    let cfg: LoaderConfig = toml::from_str(&data)?;
    Ok(cfg)
}
