//! Single-shot completion signals built from node events.
//!
//! A signal is a cloneable future that settles exactly once. Every clone sees
//! the same outcome, which is how joiners of an in-flight load share the
//! first caller's result.

use futures::channel::oneshot;
use futures::future::{FutureExt, LocalBoxFuture, Shared};

use crate::document::{NodeEvent, NodeListener};
use crate::error::LoadError;

/// Shared outcome of one resource load.
pub type CompletionSignal = Shared<LocalBoxFuture<'static, Result<(), LoadError>>>;

/// Already-settled success.
pub fn fulfilled() -> CompletionSignal {
    futures::future::ready(Ok(())).boxed_local().shared()
}

/// Creates a node listener and the signal it settles.
///
/// The first event wins; anything the node fires afterwards is ignored.
/// `guard` is dropped right before the outcome is delivered, or when the
/// listener itself is dropped unfired, so RAII cleanup always runs before
/// any awaiting caller resumes.
pub fn channel<G: 'static>(url: String, guard: G) -> (NodeListener, CompletionSignal) {
    let (tx, rx) = oneshot::channel::<NodeEvent>();
    let mut pending = Some((tx, guard));
    let listener_url = url.clone();

    let listener: NodeListener = Box::new(move |event| {
        let Some((tx, guard)) = pending.take() else {
            tracing::debug!(
                url = %listener_url,
                event = event_name(&event),
                "ignoring event after settlement"
            );
            return;
        };
        drop(guard);
        let _ = tx.send(event);
    });

    let signal = async move {
        match rx.await {
            Ok(NodeEvent::Load) => Ok(()),
            Ok(NodeEvent::Error(reason)) => Err(LoadError::ResourceLoadFailed { url, reason }),
            Err(oneshot::Canceled) => Err(LoadError::SignalDropped { url }),
        }
    }
    .boxed_local()
    .shared();

    (listener, signal)
}

fn event_name(event: &NodeEvent) -> &'static str {
    match event {
        NodeEvent::Load => "load",
        NodeEvent::Error(_) => "error",
    }
}
