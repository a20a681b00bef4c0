//! Loader facade: the public entry point.
//!
//! For every request the loader runs a fixed decision procedure, without
//! yielding, at the moment `load_one` is called:
//!
//! 1. resolve the request to its canonical URL;
//! 2. already loaded (preloaded set or load history)? settled success;
//! 3. classify the URL (unknown extension fails this request only);
//! 4. a matching node already in the document? listen to that node
//!    (skipped when this loader's own node for the URL reported an error);
//! 5. otherwise join the in-flight load for the URL, or insert a node.
//!
//! Because nothing between step 1 and the registry update awaits, a second
//! request for the same URL always sees the first one's registry entry,
//! which is what keeps insertion at most once per URL.
//!
//! Failures never escape: each request settles to a [`LoadResult`].

use std::cell::{Cell, RefCell};
use std::fmt;

use anyhow::Context;
use futures::future::{join_all, FutureExt, JoinAll, LocalBoxFuture};
use url::Url;

use crate::config::LoaderConfig;
use crate::detect::{detect_loaded, LoadedBy, PreloadedSet};
use crate::document::{Document, LoadHistory};
use crate::error::LoadError;
use crate::locate::find_existing_node;
use crate::registry::InFlightRegistry;
use crate::signal::{self, CompletionSignal};
use crate::url_model::{classify, CanonicalUrl, UrlResolver};

const TRACE_TARGET: &str = "resload::loader";

/// Settled outcome of one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadResult {
    Fulfilled,
    Rejected(LoadError),
}

impl LoadResult {
    pub fn is_fulfilled(&self) -> bool {
        matches!(self, LoadResult::Fulfilled)
    }

    pub fn is_rejected(&self) -> bool {
        !self.is_fulfilled()
    }

    /// Failure reason, if rejected.
    pub fn reason(&self) -> Option<&LoadError> {
        match self {
            LoadResult::Fulfilled => None,
            LoadResult::Rejected(e) => Some(e),
        }
    }

    /// `"fulfilled"` or `"rejected"`.
    pub fn status(&self) -> &'static str {
        match self {
            LoadResult::Fulfilled => "fulfilled",
            LoadResult::Rejected(_) => "rejected",
        }
    }
}

impl From<Result<(), LoadError>> for LoadResult {
    fn from(r: Result<(), LoadError>) -> Self {
        match r {
            Ok(()) => LoadResult::Fulfilled,
            Err(e) => LoadResult::Rejected(e),
        }
    }
}

impl fmt::Display for LoadResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadResult::Fulfilled => f.write_str("fulfilled"),
            LoadResult::Rejected(e) => write!(f, "rejected: {}", e),
        }
    }
}

/// Loads scripts and stylesheets into a document, each at most once.
///
/// Single-threaded: the loader and the futures it returns are `!Send` and
/// must be driven on the thread that owns the document.
pub struct ResourceLoader<D: Document, H: LoadHistory> {
    document: D,
    history: H,
    resolver: UrlResolver,
    preloaded: RefCell<PreloadedSet>,
    registry: InFlightRegistry,
    trace: Cell<bool>,
}

impl<D: Document, H: LoadHistory> ResourceLoader<D, H> {
    /// Loader with an empty preloaded set and tracing off.
    pub fn new(document: D, history: H, resolver: UrlResolver) -> Self {
        Self {
            document,
            history,
            resolver,
            preloaded: RefCell::new(PreloadedSet::default()),
            registry: InFlightRegistry::new(),
            trace: Cell::new(false),
        }
    }

    /// Build a loader from config. `fallback_base` is used when the config
    /// has no `base_url`.
    pub fn from_config(
        document: D,
        history: H,
        cfg: &LoaderConfig,
        fallback_base: Url,
    ) -> anyhow::Result<Self> {
        let base = match &cfg.base_url {
            Some(b) => Url::parse(b).with_context(|| format!("invalid base_url in config: {b}"))?,
            None => fallback_base,
        };
        let loader = Self::new(document, history, UrlResolver::new(base));
        loader
            .configure_preloaded(&cfg.preloaded)
            .context("invalid preloaded URL in config")?;
        loader.set_debug_trace(cfg.debug_trace);
        Ok(loader)
    }

    pub fn document(&self) -> &D {
        &self.document
    }

    pub fn history(&self) -> &H {
        &self.history
    }

    pub fn resolver(&self) -> &UrlResolver {
        &self.resolver
    }

    pub fn registry(&self) -> &InFlightRegistry {
        &self.registry
    }

    /// Replace the preloaded set with the canonical forms of `urls`.
    ///
    /// If any URL fails to resolve, the previous set is kept.
    pub fn configure_preloaded<I, S>(&self, urls: I) -> Result<(), LoadError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let resolved = urls
            .into_iter()
            .map(|u| self.resolver.resolve(u.as_ref()))
            .collect::<Result<Vec<CanonicalUrl>, LoadError>>()?;
        self.preloaded.borrow_mut().replace(resolved);
        Ok(())
    }

    pub fn preloaded_len(&self) -> usize {
        self.preloaded.borrow().len()
    }

    /// Toggle the loader's diagnostic trace. Loading behavior is unaffected.
    pub fn set_debug_trace(&self, enabled: bool) {
        self.trace.set(enabled);
    }

    pub fn debug_trace(&self) -> bool {
        self.trace.get()
    }

    /// Whether `request` is already usable, per preloaded set and history.
    pub fn is_loaded(&self, request: &str) -> Result<bool, LoadError> {
        let url = self.resolver.resolve(request)?;
        Ok(self.loaded_by(request, &url).is_some())
    }

    /// Load one resource. The decision procedure runs now; the returned
    /// future only waits for the outcome.
    pub fn load_one(&self, request: &str) -> LocalBoxFuture<'static, LoadResult> {
        let signal = self.loading_signal(request);
        let request = request.to_string();
        let trace = self.trace.get();
        async move {
            let result = match signal {
                Ok(signal) => LoadResult::from(signal.await),
                Err(e) => LoadResult::Rejected(e),
            };
            if let (true, LoadResult::Rejected(e)) = (trace, &result) {
                tracing::debug!(target: TRACE_TARGET, "{request} is rejected: {e}");
            }
            result
        }
        .boxed_local()
    }

    /// Load every request concurrently. Results are in input order; one
    /// failure never drops the others.
    pub fn load_many<I, S>(&self, requests: I) -> JoinAll<LocalBoxFuture<'static, LoadResult>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let pending: Vec<_> = requests
            .into_iter()
            .map(|r| self.load_one(r.as_ref()))
            .collect();
        join_all(pending)
    }

    fn loading_signal(&self, request: &str) -> Result<CompletionSignal, LoadError> {
        let url = self.resolver.resolve(request)?;

        if self.loaded_by(request, &url).is_some() {
            return Ok(signal::fulfilled());
        }

        let kind = classify(&url)?;

        if !self.registry.has_failed(&url) {
            if let Some(node) = find_existing_node(&self.document, request, &url, kind) {
                self.trace(format_args!("{request} is found as a node"));
                let (listener, signal) = signal::channel(url.to_string(), ());
                self.document.subscribe(&node, listener);
                return Ok(signal);
            }
        }

        if self.registry.contains(&url) {
            self.trace(format_args!("{request} joins the load in flight"));
        } else {
            self.trace(format_args!("{request} will be inserted"));
        }
        self.registry.obtain(&self.document, &url, kind)
    }

    fn loaded_by(&self, request: &str, url: &CanonicalUrl) -> Option<LoadedBy> {
        let found = detect_loaded(&self.preloaded.borrow(), &self.history, url);
        if found == Some(LoadedBy::History) {
            self.trace(format_args!("{request} is already loaded"));
        }
        found
    }

    fn trace(&self, message: fmt::Arguments<'_>) {
        if self.trace.get() {
            tracing::debug!(target: TRACE_TARGET, "{}", message);
        }
    }
}
