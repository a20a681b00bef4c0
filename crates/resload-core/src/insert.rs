//! Insertion strategy: how a node of each kind enters the document.

use crate::document::{Document, DocumentError, NodeSpec};
use crate::error::LoadError;
use crate::url_model::{CanonicalUrl, ResourceKind};

/// Creates and inserts the node for `url`, returning its handle.
///
/// Scripts go immediately before the first script already in the document,
/// so markup that came before keeps its relative order. Stylesheet links
/// are appended to the end of head.
pub fn insert_resource<D: Document>(
    document: &D,
    kind: ResourceKind,
    url: &CanonicalUrl,
) -> Result<D::Node, LoadError> {
    let to_load_error = |e: DocumentError| LoadError::Document {
        url: url.to_string(),
        message: e.0,
    };

    match kind {
        ResourceKind::Script => {
            let node = document
                .create_node(&NodeSpec::script(url.as_str()))
                .map_err(to_load_error)?;
            document
                .insert_before_first_script(&node)
                .map_err(to_load_error)?;
            Ok(node)
        }
        ResourceKind::Style => {
            let node = document
                .create_node(&NodeSpec::stylesheet(url.as_str()))
                .map_err(to_load_error)?;
            document.append_to_head(&node).map_err(to_load_error)?;
            Ok(node)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::{HeadlessDocument, NodeState};
    use crate::url_model::UrlResolver;

    fn canon(s: &str) -> CanonicalUrl {
        UrlResolver::from_base_str("https://example.com/")
            .unwrap()
            .resolve(s)
            .unwrap()
    }

    #[test]
    fn script_goes_before_first_script() {
        let doc = HeadlessDocument::new();
        doc.seed_head_stylesheet("https://example.com/base.css", NodeState::Loaded);
        let first = doc.seed_head_script("https://example.com/boot.js", NodeState::Loaded);

        let node = insert_resource(&doc, ResourceKind::Script, &canon("app.js")).unwrap();

        let head = doc.head_children();
        let pos_new = head.iter().position(|n| *n == node).unwrap();
        let pos_first = head.iter().position(|n| *n == first).unwrap();
        assert_eq!(pos_new + 1, pos_first);
        let info = doc.node(node).unwrap();
        assert!(info.is_async);
        assert!(info.defer);
        assert_eq!(info.url, "https://example.com/app.js");
    }

    #[test]
    fn stylesheet_appends_to_head() {
        let doc = HeadlessDocument::new();
        doc.seed_head_script("https://example.com/boot.js", NodeState::Loaded);

        let node = insert_resource(&doc, ResourceKind::Style, &canon("site.css")).unwrap();

        assert_eq!(doc.head_children().last(), Some(&node));
        let info = doc.node(node).unwrap();
        assert_eq!(info.rel.as_deref(), Some("stylesheet"));
    }

    #[test]
    fn script_without_anchor_is_a_document_error() {
        let doc = HeadlessDocument::new();
        let err = insert_resource(&doc, ResourceKind::Script, &canon("app.js")).unwrap_err();
        assert!(matches!(err, LoadError::Document { .. }));
        assert_eq!(doc.insertions(), 0);
    }
}
