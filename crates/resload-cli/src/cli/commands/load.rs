//! `resload load` – load resources into a headless page and report outcomes.

use std::rc::Rc;

use anyhow::{bail, Result};
use resload_core::config::LoaderConfig;
use resload_core::headless::{HeadlessDocument, HeadlessHistory, NodeState};
use resload_core::probe::settle_pending;
use resload_core::{ResourceLoader, UrlResolver};
use serde::Serialize;

use super::base_url;

/// Name of the script the page is assumed to have loaded the loader from.
const ANCHOR_SCRIPT: &str = "resload.js";

/// Command-line overrides for `resload load`.
#[derive(Debug, Default)]
pub struct LoadOptions {
    pub base: Option<String>,
    pub preload: Vec<String>,
    pub trace: bool,
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct Report<'a> {
    request: &'a str,
    url: Option<String>,
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

pub async fn run_load(cfg: &LoaderConfig, urls: &[String], opts: LoadOptions) -> Result<()> {
    let base = base_url(opts.base.as_deref(), cfg.base_url.as_deref())?;
    let mut cfg = cfg.clone();
    cfg.base_url = Some(base.to_string());
    cfg.preloaded.extend(opts.preload);
    cfg.debug_trace |= opts.trace;

    let history = Rc::new(HeadlessHistory::new());
    let document = Rc::new(HeadlessDocument::with_history(
        Rc::clone(&history),
        UrlResolver::new(base.clone()),
    ));
    document.seed_head_script(ANCHOR_SCRIPT, NodeState::Loaded);
    let loader = ResourceLoader::from_config(Rc::clone(&document), history, &cfg, base)?;

    let batch = loader.load_many(urls);
    let summary = settle_pending(&document, &cfg.probe_or_default()).await?;
    tracing::info!(
        loaded = summary.loaded,
        failed = summary.failed,
        bytes = summary.bytes,
        "settled inserted resources"
    );
    let results = batch.await;

    let reports: Vec<Report<'_>> = urls
        .iter()
        .zip(&results)
        .map(|(request, result)| Report {
            request: request.as_str(),
            url: loader.resolver().resolve(request).ok().map(|u| u.to_string()),
            status: result.status(),
            error: result.reason().map(|e| e.to_string()),
        })
        .collect();

    if opts.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        println!("{:<10} {}", "STATUS", "URL");
        for r in &reports {
            println!("{:<10} {}", r.status, r.url.as_deref().unwrap_or(r.request));
            if let Some(error) = &r.error {
                println!("{:<10} {}", "", error);
            }
        }
        println!(
            "\nfetched {} resources ({} bytes), {} failed\n",
            summary.loaded, summary.bytes, summary.failed
        );
        print!("{}", document.render());
    }

    let rejected = results.iter().filter(|r| r.is_rejected()).count();
    if rejected > 0 {
        bail!("{} of {} resources failed to load", rejected, results.len());
    }
    Ok(())
}
