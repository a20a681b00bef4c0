//! In-flight registry: at most one insertion per canonical URL.
//!
//! An entry exists from the moment this loader decides to insert a URL until
//! that node fires load or error. The entry is removed before the outcome
//! reaches anyone awaiting it, whatever the outcome, so a failed load can be
//! requested again and gets a fresh insertion.
//!
//! URLs whose node reported an error are remembered until a later load of
//! the same URL succeeds. The failed node stays in the document and will
//! never fire again, so the loader must not adopt it on retry.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::{Rc, Weak};

use crate::document::{Document, NodeEvent, NodeListener};
use crate::error::LoadError;
use crate::insert::insert_resource;
use crate::signal::{self, CompletionSignal};
use crate::url_model::{CanonicalUrl, ResourceKind};

type Entries = RefCell<HashMap<CanonicalUrl, CompletionSignal>>;
type Failed = RefCell<HashSet<CanonicalUrl>>;

/// Canonical URL -> pending signal of a load this loader started.
#[derive(Default)]
pub struct InFlightRegistry {
    entries: Rc<Entries>,
    failed: Rc<Failed>,
}

/// Removes its entry when dropped.
struct EntryGuard {
    entries: Weak<Entries>,
    url: CanonicalUrl,
}

impl Drop for EntryGuard {
    fn drop(&mut self) {
        if let Some(entries) = self.entries.upgrade() {
            entries.borrow_mut().remove(&self.url);
        }
    }
}

impl InFlightRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Signal of the load in flight for `url`, if any.
    pub fn get(&self, url: &CanonicalUrl) -> Option<CompletionSignal> {
        self.entries.borrow().get(url).cloned()
    }

    pub fn contains(&self, url: &CanonicalUrl) -> bool {
        self.entries.borrow().contains_key(url)
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Whether the last node this registry inserted for `url` reported an error.
    pub fn has_failed(&self, url: &CanonicalUrl) -> bool {
        self.failed.borrow().contains(url)
    }

    /// Joins the load in flight for `url`, or starts one.
    ///
    /// Starting means: insert the node, register the signal, then subscribe.
    /// The whole call is synchronous, so two requests for the same URL can
    /// never both reach the insertion. If the insertion fails nothing is
    /// registered.
    pub fn obtain<D: Document>(
        &self,
        document: &D,
        url: &CanonicalUrl,
        kind: ResourceKind,
    ) -> Result<CompletionSignal, LoadError> {
        if let Some(signal) = self.get(url) {
            return Ok(signal);
        }

        let node = insert_resource(document, kind, url)?;
        let guard = EntryGuard {
            entries: Rc::downgrade(&self.entries),
            url: url.clone(),
        };
        let (listener, signal) = signal::channel(url.to_string(), guard);
        let listener = track_failure(Rc::downgrade(&self.failed), url.clone(), listener);
        self.entries
            .borrow_mut()
            .insert(url.clone(), signal.clone());
        document.subscribe(&node, listener);
        Ok(signal)
    }
}

/// Records the first event's outcome for `url`, then forwards it.
fn track_failure(failed: Weak<Failed>, url: CanonicalUrl, mut inner: NodeListener) -> NodeListener {
    let mut seen = false;
    Box::new(move |event| {
        if !seen {
            seen = true;
            if let Some(failed) = failed.upgrade() {
                match &event {
                    NodeEvent::Load => failed.borrow_mut().remove(&url),
                    NodeEvent::Error(_) => failed.borrow_mut().insert(url.clone()),
                };
            }
        }
        inner(event)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::NodeEvent;
    use crate::headless::{HeadlessDocument, NodeState};
    use crate::url_model::UrlResolver;

    fn setup() -> (HeadlessDocument, UrlResolver) {
        let doc = HeadlessDocument::new();
        doc.seed_head_script("https://example.com/boot.js", NodeState::Loaded);
        let resolver = UrlResolver::from_base_str("https://example.com/").unwrap();
        (doc, resolver)
    }

    #[tokio::test]
    async fn second_obtain_joins_without_inserting() {
        let (doc, resolver) = setup();
        let registry = InFlightRegistry::new();
        let url = resolver.resolve("app.js").unwrap();

        let a = registry.obtain(&doc, &url, ResourceKind::Script).unwrap();
        let b = registry.obtain(&doc, &url, ResourceKind::Script).unwrap();
        assert_eq!(doc.insertions(), 1);
        assert!(registry.contains(&url));

        doc.settle_url(url.as_str(), NodeEvent::Load);
        assert!(registry.is_empty(), "entry removed on settlement");
        assert_eq!(a.await, Ok(()));
        assert_eq!(b.await, Ok(()));
    }

    #[tokio::test]
    async fn failure_clears_entry_for_retry() {
        let (doc, resolver) = setup();
        let registry = InFlightRegistry::new();
        let url = resolver.resolve("site.css").unwrap();

        let first = registry.obtain(&doc, &url, ResourceKind::Style).unwrap();
        doc.settle_url(url.as_str(), NodeEvent::Error("404".to_string()));
        assert!(!registry.contains(&url));
        assert!(matches!(
            first.await,
            Err(LoadError::ResourceLoadFailed { .. })
        ));

        assert!(registry.has_failed(&url));

        let retry = registry.obtain(&doc, &url, ResourceKind::Style).unwrap();
        assert_eq!(doc.insertions(), 2);
        assert_eq!(registry.len(), 1);

        doc.settle_url(url.as_str(), NodeEvent::Load);
        assert_eq!(retry.await, Ok(()));
        assert!(!registry.has_failed(&url));
    }

    #[test]
    fn failed_insertion_leaves_no_entry() {
        let doc = HeadlessDocument::new();
        let registry = InFlightRegistry::new();
        let url = UrlResolver::from_base_str("https://example.com/")
            .unwrap()
            .resolve("app.js")
            .unwrap();

        let err = registry
            .obtain(&doc, &url, ResourceKind::Script)
            .unwrap_err();
        assert!(matches!(err, LoadError::Document { .. }));
        assert!(registry.is_empty());
    }

    #[test]
    fn entry_removed_when_document_drops_listener() {
        let (doc, resolver) = setup();
        let registry = InFlightRegistry::new();
        let url = resolver.resolve("app.js").unwrap();

        let _signal = registry.obtain(&doc, &url, ResourceKind::Script).unwrap();
        assert!(registry.contains(&url));
        drop(doc);
        assert!(registry.is_empty());
    }
}
