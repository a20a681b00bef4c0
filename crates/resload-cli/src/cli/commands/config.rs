//! `resload config` – show config path and effective values.

use anyhow::Result;
use resload_core::config::{self, LoaderConfig};
use resload_core::logging;

pub fn run_config(cfg: &LoaderConfig) -> Result<()> {
    println!("path: {}", config::config_path()?.display());
    println!("log: {}", logging::log_path()?.display());
    println!(
        "base_url: {}",
        cfg.base_url.as_deref().unwrap_or("(current directory)")
    );
    if cfg.preloaded.is_empty() {
        println!("preloaded: (none)");
    } else {
        println!("preloaded:");
        for url in &cfg.preloaded {
            println!("  {url}");
        }
    }
    println!("debug_trace: {}", cfg.debug_trace);
    let probe = cfg.probe_or_default();
    println!(
        "probe: connect_timeout={}s timeout={}s",
        probe.connect_timeout_secs, probe.timeout_secs
    );
    Ok(())
}
