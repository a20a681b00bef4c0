//! Loaded-state detection: is a resource already usable?
//!
//! This is a heuristic. It can miss a resource that was loaded by means the
//! history does not record, and on some hosts a failed load never shows up
//! there at all. It never reports a resource that is not loaded.

use std::collections::HashSet;

use crate::document::LoadHistory;
use crate::url_model::CanonicalUrl;

/// Why a resource counts as loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadedBy {
    /// The caller declared it preloaded.
    Preloaded,
    /// The load history has an entry for it.
    History,
}

/// Caller-declared set of resources that are already present.
#[derive(Debug, Clone, Default)]
pub struct PreloadedSet {
    urls: HashSet<CanonicalUrl>,
}

impl PreloadedSet {
    pub fn new(urls: impl IntoIterator<Item = CanonicalUrl>) -> Self {
        Self {
            urls: urls.into_iter().collect(),
        }
    }

    pub fn contains(&self, url: &CanonicalUrl) -> bool {
        self.urls.contains(url)
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    /// Replace the whole set.
    pub fn replace(&mut self, urls: impl IntoIterator<Item = CanonicalUrl>) {
        self.urls = urls.into_iter().collect();
    }
}

/// Checks the preloaded set first, then the load history.
pub fn detect_loaded<H: LoadHistory + ?Sized>(
    preloaded: &PreloadedSet,
    history: &H,
    url: &CanonicalUrl,
) -> Option<LoadedBy> {
    if preloaded.contains(url) {
        return Some(LoadedBy::Preloaded);
    }
    if history.contains(url.as_str()) {
        return Some(LoadedBy::History);
    }
    None
}
