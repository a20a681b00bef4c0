//! Settle a headless document's pending nodes by probing their URLs.

use anyhow::Result;
use futures::future::join_all;

use super::probe_resource;
use crate::config::ProbeConfig;
use crate::document::NodeEvent;
use crate::headless::HeadlessDocument;

/// Outcome counts of one settle pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SettleSummary {
    pub loaded: usize,
    pub failed: usize,
    /// Sum of the sizes reported for loaded resources.
    pub bytes: u64,
}

/// Probes every pending node concurrently, then dispatches the results in
/// document order. Probes run on the blocking pool; dispatch stays on the
/// calling thread, which owns the document.
pub async fn settle_pending(document: &HeadlessDocument, cfg: &ProbeConfig) -> Result<SettleSummary> {
    let pending = document.pending();
    let probes = pending.iter().map(|(_, kind, url)| {
        let (kind, url, cfg) = (*kind, url.clone(), cfg.clone());
        tokio::task::spawn_blocking(move || probe_resource(&url, kind, &cfg))
    });
    let outcomes = join_all(probes).await;

    let mut summary = SettleSummary::default();
    for ((id, _, url), outcome) in pending.into_iter().zip(outcomes) {
        let outcome = outcome.map_err(|e| anyhow::anyhow!("probe task join: {}", e))?;
        let event = match outcome {
            Ok(result) => {
                tracing::debug!(%url, ?result, "resource available");
                summary.loaded += 1;
                summary.bytes += result.content_length.unwrap_or(0);
                NodeEvent::Load
            }
            Err(err) => {
                let reason = format!("{err:#}");
                tracing::warn!(%url, %reason, "resource failed to load");
                summary.failed += 1;
                NodeEvent::Error(reason)
            }
        };
        document.dispatch(id, event);
    }
    Ok(summary)
}
