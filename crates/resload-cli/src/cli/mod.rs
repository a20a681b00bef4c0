//! CLI for the resload resource loader.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use resload_core::config;

use commands::{run_config, run_load, run_resolve, LoadOptions};

/// Top-level CLI for the resload resource loader.
#[derive(Debug, Parser)]
#[command(name = "resload")]
#[command(about = "resload: load scripts and stylesheets into a page, each at most once", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Load resources into a headless page and report each outcome.
    Load {
        /// Script (.js/.mjs) or stylesheet (.css) URLs, relative to the base.
        #[arg(required = true)]
        urls: Vec<String>,

        /// Document base URL (overrides `base_url` in config).
        #[arg(long, value_name = "URL")]
        base: Option<String>,

        /// Declare a resource as already present. Repeatable.
        #[arg(long = "preload", value_name = "URL")]
        preload: Vec<String>,

        /// Emit the loader's diagnostic trace.
        #[arg(long)]
        trace: bool,

        /// Print results as JSON instead of a table.
        #[arg(long)]
        json: bool,
    },

    /// Print the canonical URL and resource kind of each input.
    Resolve {
        #[arg(required = true)]
        urls: Vec<String>,

        /// Document base URL (overrides `base_url` in config).
        #[arg(long, value_name = "URL")]
        base: Option<String>,
    },

    /// Show the config file path and effective values.
    Config,
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Load {
                urls,
                base,
                preload,
                trace,
                json,
            } => {
                let opts = LoadOptions {
                    base,
                    preload,
                    trace,
                    json,
                };
                run_load(&cfg, &urls, opts).await?;
            }
            CliCommand::Resolve { urls, base } => run_resolve(&cfg, &urls, base.as_deref())?,
            CliCommand::Config => run_config(&cfg)?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
