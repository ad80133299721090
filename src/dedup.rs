//! Per-run registry of emitted brochure identities.

use std::collections::HashSet;

/// Identity keys already emitted during one crawl.
///
/// Owned by a single [`Crawler`](crate::crawler::Crawler); a fresh index per
/// run keeps runs (and tests) isolated from each other.
#[derive(Debug, Default)]
pub struct DeduplicationIndex {
    seen: HashSet<String>,
}

impl DeduplicationIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `key`. Returns `false` if it was already present.
    pub fn insert(&mut self, key: String) -> bool {
        self.seen.insert(key)
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
