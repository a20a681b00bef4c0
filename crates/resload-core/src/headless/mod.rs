//! In-memory document and load history.
//!
//! `HeadlessDocument` keeps a head and a body list of script and stylesheet
//! nodes, queues listeners per node and only fires them when the owner calls
//! [`HeadlessDocument::dispatch`] or [`HeadlessDocument::settle_url`], which
//! is how a browser delivers load/error events from its own event loop.
//! Listeners added to a node that already settled never fire, as in a
//! browser. History names are absolute: attributes are resolved against the
//! document base before they are recorded or probed.

mod history;
mod render;

pub use history::HeadlessHistory;

use std::cell::RefCell;
use std::rc::Rc;

use crate::document::{Document, DocumentError, NodeEvent, NodeListener, NodeQuery, NodeSpec};
use crate::url_model::{ResourceKind, UrlResolver};

/// Handle to a node in a [`HeadlessDocument`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// Fetch state of a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeState {
    Pending,
    Loaded,
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Parent {
    Detached,
    Head,
    Body,
}

#[derive(Debug, Clone, Copy)]
enum Container {
    Head,
    Body,
}

/// Snapshot of one node's attributes and state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeInfo {
    pub kind: ResourceKind,
    pub url: String,
    pub is_async: bool,
    pub defer: bool,
    pub rel: Option<String>,
    pub state: NodeState,
}

struct NodeData {
    info: NodeInfo,
    parent: Parent,
    listeners: Vec<NodeListener>,
}

#[derive(Default)]
struct Tree {
    nodes: Vec<NodeData>,
    head: Vec<NodeId>,
    body: Vec<NodeId>,
    insertions: usize,
    searches: usize,
}

impl Tree {
    fn attached(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.head.iter().chain(self.body.iter()).copied()
    }

    fn data(&self, id: NodeId) -> Result<&NodeData, DocumentError> {
        self.nodes
            .get(id.0)
            .ok_or_else(|| DocumentError(format!("unknown node {:?}", id)))
    }

    /// Container and index of the first script in document order.
    fn first_script(&self) -> Option<(Container, usize)> {
        let is_script = |id: &NodeId| self.nodes[id.0].info.kind == ResourceKind::Script;
        if let Some(pos) = self.head.iter().position(is_script) {
            return Some((Container::Head, pos));
        }
        self.body
            .iter()
            .position(is_script)
            .map(|pos| (Container::Body, pos))
    }

    fn ensure_detached(&self, id: NodeId) -> Result<(), DocumentError> {
        if self.data(id)?.parent != Parent::Detached {
            return Err(DocumentError(format!("node {:?} is already attached", id)));
        }
        Ok(())
    }
}

/// Document model with no rendering engine behind it.
#[derive(Default)]
pub struct HeadlessDocument {
    tree: RefCell<Tree>,
    history: Option<Rc<HeadlessHistory>>,
    base: Option<UrlResolver>,
}

impl HeadlessDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record successful loads into `history` under their URL resolved
    /// against `base`. Failed loads are not recorded.
    pub fn with_history(history: Rc<HeadlessHistory>, base: UrlResolver) -> Self {
        Self {
            tree: RefCell::default(),
            history: Some(history),
            base: Some(base),
        }
    }

    /// `raw` resolved against the document base. Left as is when there is
    /// no base or it does not parse.
    pub fn absolute_url(&self, raw: &str) -> String {
        self.base
            .as_ref()
            .and_then(|base| base.resolve(raw).ok())
            .map(|url| url.to_string())
            .unwrap_or_else(|| raw.to_string())
    }

    /// Put a script into head as if it came with the page markup.
    pub fn seed_head_script(&self, url: &str, state: NodeState) -> NodeId {
        self.seed(NodeSpec::script(url), Parent::Head, state)
    }

    /// Put a script at the end of body as if it came with the page markup.
    pub fn seed_body_script(&self, url: &str, state: NodeState) -> NodeId {
        self.seed(NodeSpec::script(url), Parent::Body, state)
    }

    /// Put a stylesheet link into head as if it came with the page markup.
    pub fn seed_head_stylesheet(&self, url: &str, state: NodeState) -> NodeId {
        self.seed(NodeSpec::stylesheet(url), Parent::Head, state)
    }

    fn seed(&self, mut spec: NodeSpec, parent: Parent, state: NodeState) -> NodeId {
        // Markup scripts block unless told otherwise.
        if spec.kind == ResourceKind::Script {
            spec.is_async = false;
            spec.defer = false;
        }
        if state == NodeState::Loaded {
            if let Some(history) = &self.history {
                history.record(&self.absolute_url(&spec.url));
            }
        }
        let mut tree = self.tree.borrow_mut();
        let id = NodeId(tree.nodes.len());
        tree.nodes.push(NodeData {
            info: info_from_spec(&spec, state),
            parent,
            listeners: Vec::new(),
        });
        match parent {
            Parent::Head => tree.head.push(id),
            Parent::Body => tree.body.push(id),
            Parent::Detached => {}
        }
        id
    }

    /// Deliver `event` to a pending node and its listeners.
    ///
    /// Returns false if the node is unknown or already settled.
    pub fn dispatch(&self, id: NodeId, event: NodeEvent) -> bool {
        let (listeners, url) = {
            let mut tree = self.tree.borrow_mut();
            let Some(data) = tree.nodes.get_mut(id.0) else {
                return false;
            };
            if data.info.state != NodeState::Pending {
                return false;
            }
            data.info.state = match &event {
                NodeEvent::Load => NodeState::Loaded,
                NodeEvent::Error(reason) => NodeState::Failed(reason.clone()),
            };
            (std::mem::take(&mut data.listeners), data.info.url.clone())
        };

        if event == NodeEvent::Load {
            if let Some(history) = &self.history {
                history.record(&self.absolute_url(&url));
            }
        }
        tracing::debug!(%url, ?event, listeners = listeners.len(), "dispatching node event");
        for mut listener in listeners {
            listener(event.clone());
        }
        true
    }

    /// Dispatch `event` to every pending attached node whose URL attribute,
    /// as written or resolved, equals `url`.
    pub fn settle_url(&self, url: &str, event: NodeEvent) -> usize {
        let targets: Vec<NodeId> = {
            let tree = self.tree.borrow();
            tree.attached()
                .filter(|id| {
                    let info = &tree.nodes[id.0].info;
                    info.state == NodeState::Pending
                        && (info.url == url || self.absolute_url(&info.url) == url)
                })
                .collect()
        };
        targets
            .into_iter()
            .filter(|id| self.dispatch(*id, event.clone()))
            .count()
    }

    /// Attached nodes still waiting for load or error, in document order,
    /// with their absolute URL.
    pub fn pending(&self) -> Vec<(NodeId, ResourceKind, String)> {
        let tree = self.tree.borrow();
        tree.attached()
            .filter_map(|id| {
                let info = &tree.nodes[id.0].info;
                (info.state == NodeState::Pending)
                    .then(|| (id, info.kind, self.absolute_url(&info.url)))
            })
            .collect()
    }

    pub fn node(&self, id: NodeId) -> Option<NodeInfo> {
        self.tree.borrow().nodes.get(id.0).map(|d| d.info.clone())
    }

    pub fn head_children(&self) -> Vec<NodeId> {
        self.tree.borrow().head.clone()
    }

    pub fn body_children(&self) -> Vec<NodeId> {
        self.tree.borrow().body.clone()
    }

    /// Number of nodes inserted through [`Document`] (seeding excluded).
    pub fn insertions(&self) -> usize {
        self.tree.borrow().insertions
    }

    /// Number of [`Document::find_node`] calls.
    pub fn searches(&self) -> usize {
        self.tree.borrow().searches
    }

    /// Attached nodes matching `kind` and `url`.
    pub fn count_nodes(&self, kind: ResourceKind, url: &str) -> usize {
        let tree = self.tree.borrow();
        tree.attached()
            .filter(|id| {
                let info = &tree.nodes[id.0].info;
                info.kind == kind && info.url == url
            })
            .count()
    }

    /// Head and body as markup.
    pub fn render(&self) -> String {
        let tree = self.tree.borrow();
        let head: Vec<&NodeInfo> = tree.head.iter().map(|id| &tree.nodes[id.0].info).collect();
        let body: Vec<&NodeInfo> = tree.body.iter().map(|id| &tree.nodes[id.0].info).collect();
        render::render_document(&head, &body)
    }
}

fn info_from_spec(spec: &NodeSpec, state: NodeState) -> NodeInfo {
    NodeInfo {
        kind: spec.kind,
        url: spec.url.clone(),
        is_async: spec.is_async,
        defer: spec.defer,
        rel: spec.rel.map(str::to_string),
        state,
    }
}

impl Document for HeadlessDocument {
    type Node = NodeId;

    fn create_node(&self, spec: &NodeSpec) -> Result<NodeId, DocumentError> {
        let mut tree = self.tree.borrow_mut();
        let id = NodeId(tree.nodes.len());
        tree.nodes.push(NodeData {
            info: info_from_spec(spec, NodeState::Pending),
            parent: Parent::Detached,
            listeners: Vec::new(),
        });
        Ok(id)
    }

    fn insert_before_first_script(&self, node: &NodeId) -> Result<(), DocumentError> {
        let mut tree = self.tree.borrow_mut();
        tree.ensure_detached(*node)?;

        let Some((container, pos)) = tree.first_script() else {
            return Err(DocumentError("no script node to insert before".to_string()));
        };
        let parent = match container {
            Container::Head => {
                tree.head.insert(pos, *node);
                Parent::Head
            }
            Container::Body => {
                tree.body.insert(pos, *node);
                Parent::Body
            }
        };
        tree.nodes[node.0].parent = parent;
        tree.insertions += 1;
        Ok(())
    }

    fn append_to_head(&self, node: &NodeId) -> Result<(), DocumentError> {
        let mut tree = self.tree.borrow_mut();
        tree.ensure_detached(*node)?;
        tree.head.push(*node);
        tree.nodes[node.0].parent = Parent::Head;
        tree.insertions += 1;
        Ok(())
    }

    fn find_node(&self, query: &NodeQuery) -> Option<NodeId> {
        let mut tree = self.tree.borrow_mut();
        tree.searches += 1;
        let found = tree.attached().find(|id| {
            let info = &tree.nodes[id.0].info;
            query.matches(info.kind, &info.url)
        });
        found
    }

    fn subscribe(&self, node: &NodeId, listener: NodeListener) {
        // Settled nodes keep the listener but never dispatch again.
        if let Some(data) = self.tree.borrow_mut().nodes.get_mut(node.0) {
            data.listeners.push(listener);
        }
    }
}
