//! In-memory resource-timing log.

use std::cell::RefCell;
use std::collections::BTreeSet;

use crate::document::LoadHistory;

/// Names (absolute URLs) of resources that finished loading.
#[derive(Debug, Default)]
pub struct HeadlessHistory {
    entries: RefCell<BTreeSet<String>>,
}

impl HeadlessHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, name: &str) {
        self.entries.borrow_mut().insert(name.to_string());
    }

    pub fn contains_name(&self, name: &str) -> bool {
        self.entries.borrow().contains(name)
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Recorded names in sorted order.
    pub fn names(&self) -> Vec<String> {
        self.entries.borrow().iter().cloned().collect()
    }
}

impl LoadHistory for HeadlessHistory {
    fn contains(&self, name: &str) -> bool {
        self.contains_name(name)
    }
}
