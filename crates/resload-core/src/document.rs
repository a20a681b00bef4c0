//! Capabilities the loader needs from its hosting environment.
//!
//! The loader never touches a node tree directly. A host (a browser binding,
//! or [`crate::headless::HeadlessDocument`]) implements [`Document`] for node
//! creation, insertion, lookup and load/error events, and [`LoadHistory`] for
//! the resource-timing style log of what has already been fetched.

use std::fmt;
use std::rc::Rc;

use thiserror::Error;

use crate::url_model::ResourceKind;

/// Event a node reports once its resource is fetched (or not).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeEvent {
    Load,
    Error(String),
}

/// Callback registered for a node's load/error events.
pub type NodeListener = Box<dyn FnMut(NodeEvent)>;

/// A document mutation the host refused to perform.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct DocumentError(pub String);

/// How a node must be configured before insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeSpec {
    pub kind: ResourceKind,
    /// Value of `src` (scripts) or `href` (stylesheet links).
    pub url: String,
    pub is_async: bool,
    pub defer: bool,
    /// `rel` attribute; only set on stylesheet links.
    pub rel: Option<&'static str>,
}

impl NodeSpec {
    /// Non-blocking script: `async` and `defer` both set.
    pub fn script(url: impl Into<String>) -> Self {
        Self {
            kind: ResourceKind::Script,
            url: url.into(),
            is_async: true,
            defer: true,
            rel: None,
        }
    }

    /// `<link rel="stylesheet">`.
    pub fn stylesheet(url: impl Into<String>) -> Self {
        Self {
            kind: ResourceKind::Style,
            url: url.into(),
            is_async: false,
            defer: false,
            rel: Some("stylesheet"),
        }
    }
}

/// Selector equivalent: a `kind` node whose URL attribute equals any of `urls`.
///
/// For scripts that is `script[src="..."]`, for stylesheets `link[href="..."]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeQuery {
    pub kind: ResourceKind,
    pub urls: Vec<String>,
}

impl NodeQuery {
    pub fn matches(&self, kind: ResourceKind, url: &str) -> bool {
        self.kind == kind && self.urls.iter().any(|u| u == url)
    }
}

/// Node tree operations the loader calls.
///
/// Implementations must never invoke a listener from inside `subscribe`:
/// load/error events are delivered later, from the host's own event
/// dispatch, the same way a browser queues them.
pub trait Document {
    type Node: Clone + fmt::Debug;

    /// Create a detached node configured per `spec`.
    fn create_node(&self, spec: &NodeSpec) -> Result<Self::Node, DocumentError>;

    /// Insert `node` immediately before the first script node in the document.
    fn insert_before_first_script(&self, node: &Self::Node) -> Result<(), DocumentError>;

    /// Append `node` as the last child of head.
    fn append_to_head(&self, node: &Self::Node) -> Result<(), DocumentError>;

    /// First node (document order) matching `query`.
    fn find_node(&self, query: &NodeQuery) -> Option<Self::Node>;

    /// Register `listener` for the node's load and error events.
    fn subscribe(&self, node: &Self::Node, listener: NodeListener);
}

/// Resource-timing style log of fetched resources, keyed by absolute URL.
///
/// Some hosts never record a resource whose fetch failed. Callers treat a
/// miss as "unknown", not as "not loaded".
pub trait LoadHistory {
    fn contains(&self, name: &str) -> bool;
}

impl<T: Document + ?Sized> Document for Rc<T> {
    type Node = T::Node;

    fn create_node(&self, spec: &NodeSpec) -> Result<Self::Node, DocumentError> {
        (**self).create_node(spec)
    }

    fn insert_before_first_script(&self, node: &Self::Node) -> Result<(), DocumentError> {
        (**self).insert_before_first_script(node)
    }

    fn append_to_head(&self, node: &Self::Node) -> Result<(), DocumentError> {
        (**self).append_to_head(node)
    }

    fn find_node(&self, query: &NodeQuery) -> Option<Self::Node> {
        (**self).find_node(query)
    }

    fn subscribe(&self, node: &Self::Node, listener: NodeListener) {
        (**self).subscribe(node, listener)
    }
}

impl<T: LoadHistory + ?Sized> LoadHistory for Rc<T> {
    fn contains(&self, name: &str) -> bool {
        (**self).contains(name)
    }
}

/// History that never reports anything; every request falls through to the
/// document search.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHistory;

impl LoadHistory for NoHistory {
    fn contains(&self, _name: &str) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_spec_is_non_blocking() {
        let spec = NodeSpec::script("https://example.com/a.js");
        assert_eq!(spec.kind, ResourceKind::Script);
        assert!(spec.is_async);
        assert!(spec.defer);
        assert!(spec.rel.is_none());
    }

    #[test]
    fn stylesheet_spec_has_rel() {
        let spec = NodeSpec::stylesheet("https://example.com/a.css");
        assert_eq!(spec.kind, ResourceKind::Style);
        assert_eq!(spec.rel, Some("stylesheet"));
        assert!(!spec.is_async);
    }

    #[test]
    fn query_matches_kind_and_any_url() {
        let q = NodeQuery {
            kind: ResourceKind::Script,
            urls: vec!["a.js".to_string(), "https://example.com/a.js".to_string()],
        };
        assert!(q.matches(ResourceKind::Script, "a.js"));
        assert!(q.matches(ResourceKind::Script, "https://example.com/a.js"));
        assert!(!q.matches(ResourceKind::Style, "a.js"));
        assert!(!q.matches(ResourceKind::Script, "b.js"));
    }

    #[test]
    fn no_history_is_empty() {
        assert!(!NoHistory.contains("https://example.com/a.js"));
    }
}
