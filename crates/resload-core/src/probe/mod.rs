//! Resource probing: does a URL actually serve something?
//!
//! HTTP(S) URLs get a HEAD request through the curl crate (libcurl); a 2xx
//! answer counts as loaded unless its Content-Type is one a browser refuses
//! for the node's kind. `file://` URLs are checked on the filesystem.
//! Headless documents use this to settle the nodes a loader inserted.

mod driver;
mod parse;

pub use driver::{settle_pending, SettleSummary};

use anyhow::{bail, Context, Result};
use std::str;
use std::time::Duration;
use url::Url;

use crate::config::ProbeConfig;
use crate::url_model::ResourceKind;

/// What a probe learned about a resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResult {
    /// Size in bytes, if known.
    pub content_length: Option<u64>,
    /// `Content-Type` value if present; never set for `file://` URLs.
    pub content_type: Option<String>,
}

/// Probes `url`. Blocking; call from `spawn_blocking` in async code.
pub fn probe(url: &str, cfg: &ProbeConfig) -> Result<ProbeResult> {
    let parsed = Url::parse(url).with_context(|| format!("invalid URL for probe: {url}"))?;
    match parsed.scheme() {
        "http" | "https" => probe_http(url, cfg),
        "file" => probe_file(&parsed),
        other => bail!("unsupported scheme {other:?} for {url}"),
    }
}

/// Probes `url` and checks the response is usable as a `kind` node.
pub fn probe_resource(url: &str, kind: ResourceKind, cfg: &ProbeConfig) -> Result<ProbeResult> {
    let result = probe(url, cfg)?;
    if let Some(content_type) = &result.content_type {
        check_content_type(kind, content_type)
            .with_context(|| format!("refused {url}"))?;
    }
    Ok(result)
}

/// Stylesheets must be `text/css`; scripts may not be media or CSV, which
/// browsers block even without a `nosniff` header.
fn check_content_type(kind: ResourceKind, content_type: &str) -> Result<()> {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();
    let refused = match kind {
        ResourceKind::Style => essence != "text/css",
        ResourceKind::Script => {
            ["image/", "audio/", "video/"]
                .iter()
                .any(|p| essence.starts_with(p))
                || essence == "text/csv"
        }
    };
    if refused {
        bail!("MIME type {essence:?} is not allowed for a {kind}");
    }
    Ok(())
}

fn probe_http(url: &str, cfg: &ProbeConfig) -> Result<ProbeResult> {
    let mut headers: Vec<String> = Vec::new();

    let mut easy = curl::easy::Easy::new();
    easy.url(url).context("invalid URL")?;
    easy.nobody(true)?; // HEAD request
    easy.follow_location(true)?;
    easy.connect_timeout(Duration::from_secs(cfg.connect_timeout_secs))?;
    easy.timeout(Duration::from_secs(cfg.timeout_secs))?;

    {
        let mut transfer = easy.transfer();
        transfer.header_function(|data| {
            if let Ok(s) = str::from_utf8(data) {
                headers.push(s.trim_end().to_string());
            }
            true
        })?;
        transfer.perform().context("HEAD request failed")?;
    }

    let code = easy.response_code().context("no response code")?;
    if !(200..300).contains(&code) {
        bail!("HEAD {} returned HTTP {}", url, code);
    }

    Ok(parse::parse_headers(&headers))
}

fn probe_file(url: &Url) -> Result<ProbeResult> {
    let path = url
        .to_file_path()
        .map_err(|_| anyhow::anyhow!("not a local file URL: {url}"))?;
    let meta = std::fs::metadata(&path)
        .with_context(|| format!("cannot read {}", path.display()))?;
    if !meta.is_file() {
        bail!("{} is not a regular file", path.display());
    }
    Ok(ProbeResult {
        content_length: Some(meta.len()),
        content_type: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn file_probe_reports_size() {
        let mut f = tempfile::Builder::new().suffix(".js").tempfile().unwrap();
        f.write_all(b"console.log(1);").unwrap();
        f.flush().unwrap();
        let url = Url::from_file_path(f.path()).unwrap();

        let r = probe_resource(url.as_str(), ResourceKind::Script, &ProbeConfig::default())
            .unwrap();
        assert_eq!(r.content_length, Some(15));
        assert!(r.content_type.is_none());
    }

    #[test]
    fn missing_file_is_an_error_event() {
        let dir = tempfile::tempdir().unwrap();
        let url = Url::from_file_path(dir.path().join("missing.css")).unwrap();
        assert!(probe_resource(url.as_str(), ResourceKind::Style, &ProbeConfig::default()).is_err());
    }

    #[test]
    fn directories_are_not_resources() {
        let dir = tempfile::tempdir().unwrap();
        let url = Url::from_directory_path(dir.path()).unwrap();
        assert!(probe(url.as_str(), &ProbeConfig::default()).is_err());
    }

    #[test]
    fn unsupported_scheme() {
        let err = probe("ftp://example.com/a.js", &ProbeConfig::default()).unwrap_err();
        assert!(err.to_string().contains("unsupported scheme"));
    }

    #[test]
    fn stylesheets_need_text_css() {
        assert!(check_content_type(ResourceKind::Style, "text/css; charset=utf-8").is_ok());
        assert!(check_content_type(ResourceKind::Style, "TEXT/CSS").is_ok());
        let err = check_content_type(ResourceKind::Style, "text/html").unwrap_err();
        assert!(err.to_string().contains("\"text/html\""));
    }

    #[test]
    fn scripts_refuse_media_and_csv() {
        assert!(check_content_type(ResourceKind::Script, "text/javascript").is_ok());
        assert!(check_content_type(ResourceKind::Script, "application/octet-stream").is_ok());
        assert!(check_content_type(ResourceKind::Script, "image/png").is_err());
        assert!(check_content_type(ResourceKind::Script, "text/csv").is_err());
    }
}
