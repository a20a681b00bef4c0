//! Node locator: adopt nodes that were placed outside the loader's control.

use crate::document::{Document, NodeQuery};
use crate::url_model::{CanonicalUrl, ResourceKind};

/// Builds the lookup for `request`: the literal spelling, plus the canonical
/// form when it differs (markup often carries relative URLs).
pub fn node_query(request: &str, canonical: &CanonicalUrl, kind: ResourceKind) -> NodeQuery {
    let mut urls = vec![request.to_string()];
    if canonical.as_str() != request {
        urls.push(canonical.to_string());
    }
    NodeQuery { kind, urls }
}

/// First script/link node whose URL attribute matches `request` or its
/// canonical form.
pub fn find_existing_node<D: Document>(
    document: &D,
    request: &str,
    canonical: &CanonicalUrl,
    kind: ResourceKind,
) -> Option<D::Node> {
    document.find_node(&node_query(request, canonical, kind))
}
