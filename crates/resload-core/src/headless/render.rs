//! Markup rendering for headless documents.

use std::fmt::Write;

use super::{NodeInfo, NodeState};
use crate::url_model::ResourceKind;

pub(super) fn render_document(head: &[&NodeInfo], body: &[&NodeInfo]) -> String {
    let mut out = String::from("<head>\n");
    for node in head {
        render_node(&mut out, node);
    }
    out.push_str("</head>\n<body>\n");
    for node in body {
        render_node(&mut out, node);
    }
    out.push_str("</body>\n");
    out
}

fn render_node(out: &mut String, node: &NodeInfo) {
    let tag = node.kind.tag();
    let _ = write!(out, "  <{tag}");
    if let Some(rel) = &node.rel {
        let _ = write!(out, " rel=\"{}\"", escape_attr(rel));
    }
    let _ = write!(
        out,
        " {}=\"{}\"",
        node.kind.url_attribute(),
        escape_attr(&node.url)
    );
    if node.is_async {
        out.push_str(" async");
    }
    if node.defer {
        out.push_str(" defer");
    }
    out.push('>');
    // <link> is a void element.
    if node.kind == ResourceKind::Script {
        let _ = write!(out, "</{tag}>");
    }
    match &node.state {
        NodeState::Pending => out.push_str(" <!-- pending -->"),
        NodeState::Loaded => {}
        NodeState::Failed(reason) => {
            let _ = write!(out, " <!-- failed: {} -->", reason.replace("--", "- -"));
        }
    }
    out.push('\n');
}

fn escape_attr(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
}
