//! CLI command handlers, one file per command.

mod config;
mod load;
mod resolve;

pub use config::run_config;
pub use load::{run_load, LoadOptions};
pub use resolve::run_resolve;

use anyhow::{anyhow, Context, Result};
use url::Url;

/// Base URL for a command: `--base`, then config, then the current directory.
pub(crate) fn base_url(flag: Option<&str>, configured: Option<&str>) -> Result<Url> {
    if let Some(b) = flag.or(configured) {
        return Url::parse(b).with_context(|| format!("invalid base URL: {b}"));
    }
    let cwd = std::env::current_dir()?;
    Url::from_directory_path(&cwd)
        .map_err(|()| anyhow!("cannot express {} as a file URL", cwd.display()))
}
