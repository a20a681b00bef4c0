//! `resload resolve` – show canonical URL and kind without loading.

use anyhow::Result;
use resload_core::config::LoaderConfig;
use resload_core::{classify, UrlResolver};

use super::base_url;

pub fn run_resolve(cfg: &LoaderConfig, urls: &[String], base: Option<&str>) -> Result<()> {
    let resolver = UrlResolver::new(base_url(base, cfg.base_url.as_deref())?);
    println!("{:<8} {}", "KIND", "URL");
    for request in urls {
        match resolver.resolve(request) {
            Ok(url) => {
                let kind = classify(&url)
                    .map(|k| k.to_string())
                    .unwrap_or_else(|_| "-".to_string());
                println!("{:<8} {}", kind, url);
            }
            Err(e) => println!("{:<8} {} ({})", "invalid", request, e),
        }
    }
    Ok(())
}
